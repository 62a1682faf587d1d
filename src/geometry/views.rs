use super::services::{list_drop_positions, resolve_drop_position};
use crate::common::errors::TrackingResult;
use crate::common::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;
use xtal_entity::drop_positions;

#[derive(Debug, Serialize, ToSchema)]
pub struct DropPosition {
    pub id: Uuid,
    pub name: String,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl From<drop_positions::Model> for DropPosition {
    fn from(model: drop_positions::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            x_offset: model.x_offset,
            y_offset: model.y_offset,
        }
    }
}

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_drop_positions))
        .routes(routes!(get_drop_position))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/drop_positions",
    responses((status = OK, body = Vec<DropPosition>)),
    tag = "catalog"
)]
pub async fn get_drop_positions(
    State(state): State<AppState>,
) -> TrackingResult<Json<Vec<DropPosition>>> {
    let positions = list_drop_positions(&state.db).await?;
    Ok(Json(positions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/drop_positions/{code}",
    params(("code" = String, Path, description = "Drop-zone code, e.g. `ul` or `[LU]`")),
    responses(
        (status = OK, body = DropPosition),
        (status = UNPROCESSABLE_ENTITY, description = "Unrecognised drop-zone code"),
        (status = NOT_FOUND, description = "Code not seeded")
    ),
    tag = "catalog"
)]
pub async fn get_drop_position(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> TrackingResult<Json<DropPosition>> {
    Ok(Json(resolve_drop_position(&state.db, &code).await?.into()))
}
