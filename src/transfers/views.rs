use super::models::{Batch, BatchCreate, BatchListItem, BatchTimestampUpdate};
use super::services::{create_batch, get_batch, list_batches, update_batch_timestamp};
use crate::common::auth::protect;
use crate::common::errors::TrackingResult;
use crate::common::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(post_batch, get_batches))
        .routes(routes!(get_one_batch))
        .routes(routes!(patch_batch_timestamp))
        .with_state(state.clone())
        .merge(crate::exports::views::router(state));

    protect(router, state, "batches")
}

#[utoipa::path(
    post,
    path = "/",
    request_body = BatchCreate,
    responses(
        (status = CREATED, description = "Batch and all of its transfers", body = Batch),
        (status = BAD_REQUEST, description = "Count, volume list or solvent series does not fit the pools"),
        (status = NOT_FOUND, description = "Unknown project, plate or solvent well"),
        (status = CONFLICT, description = "Volume outside [5, 150] nL or a well already transferred")
    ),
    tag = "batches"
)]
pub async fn post_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchCreate>,
) -> TrackingResult<(StatusCode, Json<Batch>)> {
    let batch = create_batch(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = OK, body = Vec<BatchListItem>)),
    tag = "batches"
)]
pub async fn get_batches(State(state): State<AppState>) -> TrackingResult<Json<Vec<BatchListItem>>> {
    Ok(Json(list_batches(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = OK, body = Batch),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn get_one_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> TrackingResult<Json<Batch>> {
    Ok(Json(get_batch(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}/timestamp",
    params(("id" = Uuid, Path, description = "Batch ID")),
    request_body = BatchTimestampUpdate,
    responses(
        (status = OK, body = Batch),
        (status = BAD_REQUEST, description = "Timestamp not in MM/DD/YYYY HH:MM:SS"),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn patch_batch_timestamp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<BatchTimestampUpdate>,
) -> TrackingResult<Json<Batch>> {
    Ok(Json(update_batch_timestamp(&state.db, id, &update.timestamp).await?))
}
