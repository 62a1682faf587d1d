use super::models::{HARVEST_COLUMNS, HarvestReport};
use super::services::ingest_harvest_log;
use crate::common::auth::protect;
use crate::common::errors::TrackingResult;
use crate::common::state::AppState;
use crate::common::upload::UploadForm;
use crate::services::log_reader::read_prefixed_log;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(upload_harvest_log))
        .with_state(state.clone());

    protect(router, state, "harvests")
}

#[utoipa::path(
    post,
    path = "/",
    request_body(content = String, description = "Multipart form with a shifter harvest log `file`", content_type = "multipart/form-data"),
    responses(
        (status = OK, description = "Every row was committed or skipped", body = HarvestReport),
        (status = BAD_REQUEST, description = "Malformed log or more than one plate"),
        (status = NOT_FOUND, description = "Plate named in the log does not exist"),
        (status = CONFLICT, description = "Ingestion stopped at a conflicting row; earlier rows stay committed", body = HarvestReport)
    ),
    tag = "harvests"
)]
pub async fn upload_harvest_log(
    State(state): State<AppState>,
    multipart: Multipart,
) -> TrackingResult<(StatusCode, Json<HarvestReport>)> {
    let form = UploadForm::read(multipart).await?;
    let table = read_prefixed_log(form.require_file("file")?, &HARVEST_COLUMNS)
        .map_err(|e| crate::input_shape_error!("file", format!("{e:#}")))?;

    let report = ingest_harvest_log(&state.db, &table).await?;
    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(report)))
}
