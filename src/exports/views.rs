use super::models::CsvExport;
use super::services::{echo_protocol, harvest_template, pin_tracking};
use crate::common::errors::TrackingResult;
use crate::common::state::AppState;
use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_echo_protocol))
        .routes(routes!(get_harvest_template))
        .routes(routes!(get_pin_tracking))
        .with_state(state.clone())
}

fn csv_attachment(export: CsvExport) -> Response {
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.body,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/{id}/echo",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = OK, description = "Echo dispense protocol", content_type = "text/csv", body = String),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn get_echo_protocol(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> TrackingResult<Response> {
    Ok(csv_attachment(echo_protocol(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/{id}/harvest_template",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = OK, description = "Shifter harvest template", content_type = "text/csv", body = String),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn get_harvest_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> TrackingResult<Response> {
    Ok(csv_attachment(harvest_template(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/{id}/pin_tracking",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = OK, description = "Pins mounted from this batch", content_type = "text/csv", body = String),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn get_pin_tracking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> TrackingResult<Response> {
    Ok(csv_attachment(pin_tracking(&state.db, id).await?))
}
