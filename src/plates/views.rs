use super::ingestion::{
    IMAGING_COLUMNS, create_library_plate, create_xtal_plate, list_library_plates,
    list_xtal_plates,
};
use super::models::{LibraryWell, PlateIngestionReport, PlateSummary, XtalWell};
use super::pools::{available_library_wells, available_xtal_wells};
use crate::common::auth::protect;
use crate::common::errors::TrackingResult;
use crate::common::state::AppState;
use crate::common::upload::UploadForm;
use crate::services::log_reader::{read_library_csv, read_prefixed_log};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;
use xtal_entity::{library_plates, xtal_plates};

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(upload_library_plate, get_library_plates))
        .routes(routes!(upload_xtal_plate, get_xtal_plates))
        .routes(routes!(get_available_library_wells))
        .routes(routes!(get_available_xtal_wells))
        .with_state(state.clone());

    protect(router, state, "plates")
}

#[utoipa::path(
    post,
    path = "/library",
    request_body(content = String, description = "Multipart form with `plate_name`, `plate_type` and a `file` CSV (well, catalog_id, smiles)", content_type = "multipart/form-data"),
    responses(
        (status = CREATED, body = PlateIngestionReport),
        (status = BAD_REQUEST, description = "Missing field or malformed CSV"),
        (status = NOT_FOUND, description = "Unknown plate type"),
        (status = CONFLICT, description = "Plate name already exists")
    ),
    tag = "plates"
)]
pub async fn upload_library_plate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> TrackingResult<(StatusCode, Json<PlateIngestionReport>)> {
    let form = UploadForm::read(multipart).await?;
    let plate_name = form.require_text("plate_name")?;
    let plate_type = form.require_text("plate_type")?;
    let rows = read_library_csv(form.require_file("file")?)
        .map_err(|e| crate::input_shape_error!("file", format!("{e:#}")))?;

    let report = create_library_plate(&state.db, &plate_name, &plate_type, rows).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    get,
    path = "/library",
    responses((status = OK, body = Vec<PlateSummary>)),
    tag = "plates"
)]
pub async fn get_library_plates(
    State(state): State<AppState>,
) -> TrackingResult<Json<Vec<PlateSummary>>> {
    Ok(Json(list_library_plates(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/xtal",
    request_body(content = String, description = "Multipart form with an imaging log `file` and optional `plate_type`", content_type = "multipart/form-data"),
    responses(
        (status = CREATED, body = PlateIngestionReport),
        (status = BAD_REQUEST, description = "Malformed log or more than one plate"),
        (status = NOT_FOUND, description = "Unknown plate type or drop position"),
        (status = CONFLICT, description = "Plate name already exists"),
        (status = UNPROCESSABLE_ENTITY, description = "Unrecognised drop-zone code")
    ),
    tag = "plates"
)]
pub async fn upload_xtal_plate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> TrackingResult<(StatusCode, Json<PlateIngestionReport>)> {
    let form = UploadForm::read(multipart).await?;
    let table = read_prefixed_log(form.require_file("file")?, &IMAGING_COLUMNS)
        .map_err(|e| crate::input_shape_error!("file", format!("{e:#}")))?;
    let plate_type = form.text("plate_type");

    let report = create_xtal_plate(&state.db, plate_type.as_deref(), &table).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    get,
    path = "/xtal",
    responses((status = OK, body = Vec<PlateSummary>)),
    tag = "plates"
)]
pub async fn get_xtal_plates(State(state): State<AppState>) -> TrackingResult<Json<Vec<PlateSummary>>> {
    Ok(Json(list_xtal_plates(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/library/{id}/available_wells",
    params(("id" = Uuid, Path, description = "Library plate ID")),
    responses(
        (status = OK, description = "Unused wells in sequence order", body = Vec<LibraryWell>),
        (status = NOT_FOUND, description = "Unknown plate")
    ),
    tag = "plates"
)]
pub async fn get_available_library_wells(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> TrackingResult<Json<Vec<LibraryWell>>> {
    library_plates::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| crate::not_found!("library plate", id))?;
    let wells = available_library_wells(&state.db, id).await?;
    Ok(Json(wells.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/xtal/{id}/available_wells",
    params(("id" = Uuid, Path, description = "Xtal plate ID")),
    responses(
        (status = OK, description = "Untransferred, unharvested wells in sequence order", body = Vec<XtalWell>),
        (status = NOT_FOUND, description = "Unknown plate")
    ),
    tag = "plates"
)]
pub async fn get_available_xtal_wells(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> TrackingResult<Json<Vec<XtalWell>>> {
    xtal_plates::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| crate::not_found!("xtal plate", id))?;
    let wells = available_xtal_wells(&state.db, id).await?;
    Ok(Json(wells.into_iter().map(Into::into).collect()))
}
