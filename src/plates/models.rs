use crate::common::models::SkippedRow;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use xtal_entity::{library_wells, xtal_wells};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlateSummary {
    pub id: Uuid,
    pub name: String,
    pub plate_type: String,
    pub wells: usize,
    pub available_wells: usize,
}

/// Result of creating a plate from an uploaded file
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlateIngestionReport {
    pub plate: PlateSummary,
    pub wells_created: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryWell {
    pub id: Uuid,
    pub plate_id: Uuid,
    pub well_type_id: Uuid,
    pub sequence: i32,
    pub used: bool,
    pub catalog_id: String,
    pub smiles: String,
}

impl From<library_wells::Model> for LibraryWell {
    fn from(model: library_wells::Model) -> Self {
        Self {
            id: model.id,
            plate_id: model.plate_id,
            well_type_id: model.well_type_id,
            sequence: model.sequence,
            used: model.used,
            catalog_id: model.catalog_id,
            smiles: model.smiles,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct XtalWell {
    pub id: Uuid,
    pub plate_id: Uuid,
    pub well_type_id: Uuid,
    pub sequence: i32,
    pub drop_position_id: Option<Uuid>,
    pub harvesting_status: bool,
}

impl From<xtal_wells::Model> for XtalWell {
    fn from(model: xtal_wells::Model) -> Self {
        Self {
            id: model.id,
            plate_id: model.plate_id,
            well_type_id: model.well_type_id,
            sequence: model.sequence,
            drop_position_id: model.drop_position_id,
            harvesting_status: model.harvesting_status,
        }
    }
}
