use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use xtal_entity::{batches, transfers};

pub const MIN_TRANSFER_VOLUME: i32 = 5;
pub const MAX_TRANSFER_VOLUME: i32 = 150;

/// Arithmetic volume series dispensed from a single solvent well
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SolventSeries {
    pub start: i32,
    pub stop: i32,
    pub step: i32,
    pub replicates: u32,
    /// Defaults to the first available well of the library plate
    pub library_well_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BatchCreate {
    pub library_plate_id: Uuid,
    pub xtal_plate_id: Uuid,
    pub project_id: Uuid,
    pub name: Option<String>,
    /// Number of transfers; derived from the series in solvent mode
    pub count: Option<usize>,
    pub volume: Option<i32>,
    pub volumes: Option<Vec<i32>>,
    pub solvent: Option<SolventSeries>,
}

/// How transfer volumes are assigned across a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumePlan {
    Constant(i32),
    PerTransfer(Vec<i32>),
}

/// One source/destination pairing ready to be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTransfer {
    pub from_well_id: Uuid,
    pub to_well_id: Uuid,
    pub volume: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Transfer {
    pub id: Uuid,
    pub from_well_id: Uuid,
    pub to_well_id: Uuid,
    pub transfer_volume: i32,
    pub timestamp: Option<NaiveDateTime>,
}

impl From<transfers::Model> for Transfer {
    fn from(model: transfers::Model) -> Self {
        Self {
            id: model.id,
            from_well_id: model.from_well_id,
            to_well_id: model.to_well_id,
            transfer_volume: model.transfer_volume,
            timestamp: model.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Batch {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub transfers: Vec<Transfer>,
}

impl Batch {
    pub fn from_parts(batch: batches::Model, transfers: Vec<transfers::Model>) -> Self {
        Self {
            id: batch.id,
            name: batch.name,
            project_id: batch.project_id,
            timestamp: batch.timestamp,
            transfers: transfers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchListItem {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub transfer_count: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BatchTimestampUpdate {
    /// `MM/DD/YYYY HH:MM:SS`
    pub timestamp: String,
}
