/// Shared fixtures for the test suite.
///
/// Every test gets its own in-memory SQLite database with the full schema
/// migrated. Reference data follows the real hierarchy:
/// catalog → plates → batches → harvest logs.
use crate::catalog::services::{
    LIBRARY_PLATE_TYPE, XTAL_PLATE_TYPE, library_well_names, mrc_2d_well_map,
    seed_standard_catalog,
};
use crate::config::{Config, DEFAULT_DROP_ZONE_OFFSET_MICRONS};
use crate::plates::ingestion::{create_library_plate, create_xtal_plate};
use crate::projects::models as projects;
use crate::routes::build_router;
use crate::services::log_reader::{LibraryRow, LogTable, read_prefixed_log};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use uuid::Uuid;

pub const BOUNDARY: &str = "----xtal-test-boundary";

pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run database migrations");
    db
}

/// Router wired exactly as in production, minus Keycloak
pub async fn setup_test_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let config = Config::for_tests();
    (build_router(&db, &config), db)
}

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}

pub async fn extract_text_body(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// `multipart/form-data` body with plain text fields and one `file` part
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str)>) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some((filename, content)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub fn multipart_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn seed_catalog(db: &DatabaseConnection) {
    seed_standard_catalog(db, DEFAULT_DROP_ZONE_OFFSET_MICRONS)
        .await
        .expect("Failed to seed catalog");
}

pub async fn create_test_project(db: &DatabaseConnection, target: &str) -> projects::Model {
    let now = chrono::Utc::now();
    projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        target: Set(target.to_string()),
        proposal_id: Set(Some(20_241_234)),
        year: Set(Some(2024)),
        cycle: Set(Some(2)),
        visit: Set(Some(1)),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create project")
}

pub fn library_rows(count: usize) -> Vec<LibraryRow> {
    library_well_names()
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(index, well)| LibraryRow {
            well,
            catalog_id: format!("Z{:04}", index + 1),
            smiles: "CCO".to_string(),
        })
        .collect()
}

/// Library plate whose first `count` wells (`A01`, `A02`, ...) hold compounds
pub async fn create_test_library_plate(
    db: &DatabaseConnection,
    name: &str,
    count: usize,
) -> Uuid {
    create_library_plate(db, name, LIBRARY_PLATE_TYPE, library_rows(count))
        .await
        .expect("Failed to create library plate")
        .plate
        .id
}

/// Shifter positions in catalog order: `A1a`, `A2a`, ..., `A12a`, `A1b`, ...
pub fn xtal_positions(count: usize) -> Vec<(String, String, String)> {
    mrc_2d_well_map()
        .into_iter()
        .take(count)
        .map(|entry| {
            let shifter = entry.shifter;
            let column_start = shifter
                .find(|c: char| c.is_ascii_digit())
                .expect("shifter name has a column");
            let row = shifter[..column_start].to_string();
            let subwell = shifter[shifter.len() - 1..].to_string();
            let column = shifter[column_start..shifter.len() - 1].to_string();
            (row, column, subwell)
        })
        .collect()
}

/// Imaging log with a `;` preamble. Drop codes are written bracketed, as the
/// imager exports them; an empty code leaves the cell blank.
pub fn imaging_log(plate_name: &str, wells: &[(String, String, String, &str)]) -> String {
    let mut log = String::from(
        "; Rock Imager export\n;PlateType,PlateID,PlateRow,PlateColumn,PositionSubWell,ExternalComment\n",
    );
    for (row, column, subwell, drop) in wells {
        let drop = if drop.is_empty() {
            String::new()
        } else {
            format!("[{drop}]")
        };
        log.push_str(&format!(
            "{XTAL_PLATE_TYPE},{plate_name},{row},{column},{subwell},{drop}\n"
        ));
    }
    log
}

pub fn parse_log(text: &str) -> LogTable {
    read_prefixed_log(text.as_bytes(), &["PlateID"]).expect("Failed to parse test log")
}

/// Crystal plate with `count` wells, all in drop zone `drop`
pub async fn create_test_xtal_plate(
    db: &DatabaseConnection,
    name: &str,
    count: usize,
    drop: &str,
) -> Uuid {
    let wells: Vec<_> = xtal_positions(count)
        .into_iter()
        .map(|(row, column, subwell)| (row, column, subwell, drop))
        .collect();
    create_xtal_plate(db, None, &parse_log(&imaging_log(name, &wells)))
        .await
        .expect("Failed to create xtal plate")
        .plate
        .id
}

/// One harvest log line
#[derive(Debug, Clone, Default)]
pub struct HarvestLine {
    pub plate: String,
    pub row: String,
    pub column: String,
    pub subwell: String,
    pub comment: String,
    pub time_arrival: String,
    pub time_departure: String,
    pub destination_name: String,
    pub destination_location: String,
    pub duration: String,
}

impl HarvestLine {
    pub fn new(plate: &str, (row, column, subwell): &(String, String, String)) -> Self {
        Self {
            plate: plate.to_string(),
            row: row.clone(),
            column: column.clone(),
            subwell: subwell.clone(),
            comment: "OK".to_string(),
            time_arrival: "13/07/2024 09:05:01".to_string(),
            ..Self::default()
        }
    }

    pub fn pinned(mut self, puck: &str, location: u32) -> Self {
        self.destination_name = puck.to_string();
        self.destination_location = location.to_string();
        self.time_departure = "13/07/2024 09:06:30".to_string();
        self.duration = "00:01:29".to_string();
        self
    }
}

pub fn harvest_log(lines: &[HarvestLine]) -> String {
    let mut log = String::from(
        "; Shifter harvest log\n;PlateType,PlateID,PlateRow,PlateColumn,PositionSubWell,Comment,TimeArrival,TimeDeparture,DestinationName,DestinationLocation,Duration\n",
    );
    for line in lines {
        log.push_str(&format!(
            "{XTAL_PLATE_TYPE},{},{},{},{},{},{},{},{},{},{}\n",
            line.plate,
            line.row,
            line.column,
            line.subwell,
            line.comment,
            line.time_arrival,
            line.time_departure,
            line.destination_name,
            line.destination_location,
            line.duration
        ));
    }
    log
}
