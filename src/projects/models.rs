use chrono::{DateTime, Datelike, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{ActiveValue::Set, entity::prelude::*};

pub const FIRST_PROJECT_YEAR: i32 = 2023;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, EntityToModels)]
#[sea_orm(table_name = "projects")]
#[crudcrate(
    api_struct = "Project",
    name_singular = "project",
    name_plural = "projects",
    description = "Projects group batches under a crystallization target and record the beamtime proposal, year, cycle and visit they belong to.",
    fn_create = create_project,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable, fulltext)]
    pub target: String,
    #[crudcrate(sortable, filterable)]
    pub proposal_id: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub year: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub cycle: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub visit: Option<i32>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model=false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable, list_model=false)]
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Year must fall between the first beamtime year and `current_year`, cycle
/// in 1..=3, visit at least 1. Unset fields are not checked.
pub fn validate_schedule(
    year: Option<i32>,
    cycle: Option<i32>,
    visit: Option<i32>,
    current_year: i32,
) -> Result<(), String> {
    if let Some(year) = year {
        if !(FIRST_PROJECT_YEAR..=current_year).contains(&year) {
            return Err(format!(
                "year must be between {FIRST_PROJECT_YEAR} and {current_year}, got {year}"
            ));
        }
    }
    if let Some(cycle) = cycle {
        if !(1..=3).contains(&cycle) {
            return Err(format!("cycle must be between 1 and 3, got {cycle}"));
        }
    }
    if let Some(visit) = visit {
        if visit < 1 {
            return Err(format!("visit must be at least 1, got {visit}"));
        }
    }
    Ok(())
}

pub(super) async fn create_project(
    db: &DatabaseConnection,
    data: ProjectCreate,
) -> Result<Project, DbErr> {
    validate_schedule(data.year, data.cycle, data.visit, Utc::now().year())
        .map_err(|message| DbErr::Custom(format!("Validation failed: {message}")))?;

    let now = Utc::now();
    let project = ActiveModel {
        id: Set(Uuid::new_v4()),
        target: Set(data.target),
        proposal_id: Set(data.proposal_id),
        year: Set(data.year),
        cycle: Set(data.cycle),
        visit: Set(data.visit),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!(project = %project.target, "Created project");
    Ok(project.into())
}
