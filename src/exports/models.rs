use serde::Serialize;

/// Rows serialize in field order; the header row is written separately so
/// that an empty export still carries its columns.
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoRow {
    pub batch: String,
    pub source_plate_name: String,
    pub source_well: String,
    pub destination_plate_name: String,
    pub destination_well: String,
    pub transfer_volume: i32,
    pub destination_well_x_offset: i32,
    pub destination_well_y_offset: i32,
}

impl CsvRow for EchoRow {
    const HEADERS: &'static [&'static str] = &[
        "Batch",
        "Source Plate Name",
        "Source Well",
        "Destination Plate Name",
        "Destination Well",
        "Transfer Volume",
        "Destination Well X Offset",
        "Destination Well Y Offset",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestTemplateRow {
    pub plate_type: String,
    pub plate_id: String,
    pub plate_row: String,
    pub plate_column: String,
    pub position_sub_well: String,
    pub external_comment: String,
    pub catalog_id: String,
    pub smiles: String,
    pub transfer_volume: i32,
}

impl CsvRow for HarvestTemplateRow {
    const HEADERS: &'static [&'static str] = &[
        "PlateType",
        "PlateID",
        "PlateRow",
        "PlateColumn",
        "PositionSubWell",
        "ExternalComment",
        "CatalogId",
        "Smiles",
        "TransferVolume",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinTrackingRow {
    pub puck_name: String,
    pub position: i32,
    pub sample_name: String,
    pub proposal_num: Option<i32>,
    pub catalog_id: String,
    pub smiles: String,
    pub time_departure: Option<String>,
    pub harvest_comment: Option<String>,
}

impl CsvRow for PinTrackingRow {
    const HEADERS: &'static [&'static str] = &[
        "puckName",
        "position",
        "sampleName",
        "proposalNum",
        "catalogId",
        "smiles",
        "timeDeparture",
        "harvestComment",
    ];
}

/// A rendered file ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub body: Vec<u8>,
}
