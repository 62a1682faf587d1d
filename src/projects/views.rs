use super::models::{Project, ProjectCreate, ProjectList, ProjectUpdate};
use crate::common::auth::protect;
use crate::common::errors::{DbErrorExt, TrackingResult};
use crate::common::state::AppState;
use crudcrate::{CRUDResource, crud_handlers};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use utoipa_axum::{router::OpenApiRouter, routes};

crud_handlers!(Project, ProjectUpdate, ProjectCreate, ProjectList);

pub fn router(state: &AppState) -> OpenApiRouter
where
    Project: CRUDResource,
{
    protect(
        OpenApiRouter::new()
            .routes(routes!(get_one_handler))
            .routes(routes!(get_all_handler))
            .routes(routes!(create_project_handler))
            .routes(routes!(update_one_handler))
            .routes(routes!(delete_one_handler))
            .routes(routes!(delete_many_handler))
            .with_state(state.db.clone()),
        state,
        Project::RESOURCE_NAME_PLURAL,
    )
}

/// Out-of-range schedules are input errors, duplicate targets conflicts.
#[utoipa::path(
    post,
    path = "/",
    request_body = ProjectCreate,
    responses(
        (status = CREATED, description = "Project created", body = Project),
        (status = BAD_REQUEST, description = "Year, cycle or visit out of range"),
        (status = CONFLICT, description = "A project with this target already exists")
    ),
    operation_id = "create_one_project",
    summary = "Create one project"
)]
pub async fn create_project_handler(
    State(db): State<DatabaseConnection>,
    Json(data): Json<ProjectCreate>,
) -> TrackingResult<(StatusCode, Json<Project>)> {
    let project = Project::create(&db, data)
        .await
        .map_err(|err| err.to_tracking_error("projects"))?;
    Ok((StatusCode::CREATED, Json(project)))
}
