use crate::common::models::SkippedRow;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HARVEST_COLUMNS: [&str; 6] = [
    "PlateID",
    "PlateRow",
    "PlateColumn",
    "PositionSubWell",
    "Comment",
    "TimeArrival",
];

/// Row at which an ingestion run stopped on a conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AbortedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct HarvestReport {
    pub plate_name: String,
    pub rows_read: usize,
    pub rows_committed: usize,
    /// Wells marked harvested without a pin
    pub wells_observed: usize,
    pub pins_created: usize,
    pub skipped: Vec<SkippedRow>,
    pub aborted: Option<AbortedRow>,
}

impl HarvestReport {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}
