use super::services::{CatalogSummary, seed_standard_catalog};
use crate::common::auth::protect;
use crate::common::errors::TrackingResult;
use crate::common::state::AppState;
use axum::{Json, extract::State};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let mutating_router = protect(
        OpenApiRouter::new()
            .routes(routes!(seed_catalog))
            .with_state(state.clone()),
        state,
        "catalog",
    );

    OpenApiRouter::new()
        .merge(crate::geometry::views::router(state))
        .merge(mutating_router)
}

#[utoipa::path(
    post,
    path = "/seed",
    responses(
        (status = OK, description = "Counts of newly created reference rows; zero when already seeded", body = CatalogSummary)
    ),
    tag = "catalog"
)]
pub async fn seed_catalog(State(state): State<AppState>) -> TrackingResult<Json<CatalogSummary>> {
    let summary = seed_standard_catalog(&state.db, state.config.drop_zone_offset_microns).await?;
    Ok(Json(summary))
}
