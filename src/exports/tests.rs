use super::services::{echo_protocol, harvest_template, pin_tracking, split_shifter_position};
use crate::harvesting::services::ingest_harvest_log;
use crate::plates::ingestion::create_xtal_plate;
use crate::test_helpers::{
    HarvestLine, create_test_library_plate, create_test_project, extract_text_body, get_request,
    harvest_log, imaging_log, parse_log, seed_catalog, setup_test_app, setup_test_db,
};
use crate::transfers::models::BatchCreate;
use crate::transfers::services::create_batch;
use axum::http::{StatusCode, header::CONTENT_DISPOSITION, header::CONTENT_TYPE};
use rstest::rstest;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use tower::ServiceExt;
use uuid::Uuid;
use xtal_entity::{drop_positions, pins, xtal_wells};

const ECHO_HEADER: &str = "Batch,Source Plate Name,Source Well,Destination Plate Name,Destination Well,Transfer Volume,Destination Well X Offset,Destination Well Y Offset";

fn position(row: &str, column: &str, subwell: &str) -> (String, String, String) {
    (row.to_string(), column.to_string(), subwell.to_string())
}

/// Batch of two transfers into `A1a` (drop `ul`) and `A1b` (no drop position)
async fn export_fixture(db: &DatabaseConnection) -> Uuid {
    seed_catalog(db).await;
    let project = create_test_project(db, "Endothiapepsin").await;
    let library_plate_id = create_test_library_plate(db, "LIB-1", 2).await;
    let log = imaging_log(
        "P1",
        &[
            ("A".to_string(), "1".to_string(), "a".to_string(), "ul"),
            ("A".to_string(), "1".to_string(), "b".to_string(), "c"),
        ],
    );
    let xtal_plate_id = create_xtal_plate(db, None, &parse_log(&log))
        .await
        .unwrap()
        .plate
        .id;

    // Simulate a well created before drop positions were recorded
    let legacy = xtal_wells::Entity::find()
        .filter(xtal_wells::Column::PlateId.eq(xtal_plate_id))
        .filter(xtal_wells::Column::Sequence.eq(2))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut legacy: xtal_wells::ActiveModel = legacy.into();
    legacy.drop_position_id = Set(None);
    legacy.update(db).await.unwrap();

    create_batch(
        db,
        BatchCreate {
            library_plate_id,
            xtal_plate_id,
            project_id: project.id,
            name: None,
            count: Some(2),
            volume: Some(25),
            volumes: None,
            solvent: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[rstest]
#[case("A1a", Some(("A", "1", "a")))]
#[case("H12b", Some(("H", "12", "b")))]
#[case("AB7", Some(("AB", "7", "")))]
#[case("12a", None)]
#[case("Ab", None)]
fn test_split_shifter_position(#[case] name: &str, #[case] expected: Option<(&str, &str, &str)>) {
    assert_eq!(split_shifter_position(name), expected);
}

#[tokio::test]
async fn test_scenario_echo_export_backfills_centre_drop() {
    let db = setup_test_db().await;
    let batch_id = export_fixture(&db).await;

    let export = echo_protocol(&db, batch_id).await.unwrap();
    let text = String::from_utf8(export.body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(export.filename, "echo_protocol_P1-Batch 1.csv");
    assert_eq!(
        lines,
        vec![
            ECHO_HEADER,
            "Batch 1,LIB-1,A01,P1,A1,25,-300,-300",
            "Batch 1,LIB-1,A02,P1,A13,25,0,1350",
        ]
    );

    let centre = drop_positions::Entity::find()
        .filter(drop_positions::Column::Name.eq("c"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let backfilled = xtal_wells::Entity::find()
        .filter(xtal_wells::Column::Sequence.eq(2))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(backfilled.drop_position_id, Some(centre.id));
}

#[tokio::test]
async fn test_harvest_template_export() {
    let db = setup_test_db().await;
    let batch_id = export_fixture(&db).await;

    let export = harvest_template(&db, batch_id).await.unwrap();
    let text = String::from_utf8(export.body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(export.filename, "harvesting_Batch 1.csv");
    assert_eq!(
        lines[0],
        "PlateType,PlateID,PlateRow,PlateColumn,PositionSubWell,ExternalComment,CatalogId,Smiles,TransferVolume"
    );
    assert_eq!(lines[1], "SwissCI-MRC-2d,P1,A,1,a,ul,Z0001,CCO,25");
    assert_eq!(lines[2], "SwissCI-MRC-2d,P1,A,1,b,c,Z0002,CCO,25");
}

#[tokio::test]
async fn test_pin_tracking_export() {
    let db = setup_test_db().await;
    let batch_id = export_fixture(&db).await;

    let empty = pin_tracking(&db, batch_id).await.unwrap();
    assert_eq!(
        String::from_utf8(empty.body).unwrap().trim_end(),
        "puckName,position,sampleName,proposalNum,catalogId,smiles,timeDeparture,harvestComment"
    );

    let mut line = HarvestLine::new("P1", &position("A", "1", "b")).pinned("PUCK-03", 5);
    line.comment = "nice crystal".to_string();
    ingest_harvest_log(&db, &parse_log(&harvest_log(&[line])))
        .await
        .unwrap();
    let pin = pins::Entity::find().one(&db).await.unwrap().unwrap();

    let export = pin_tracking(&db, batch_id).await.unwrap();
    let text = String::from_utf8(export.body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(export.filename, "pins_Batch 1.csv");
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        format!(
            "PUCK-03,5,Endothiapepsin-{},20241234,Z0002,CCO,13/07/2024 09:06:30,nice crystal",
            pin.id
        )
    );
}

#[tokio::test]
async fn test_export_routes() {
    let (app, db) = setup_test_app().await;
    let batch_id = export_fixture(&db).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/batches/{batch_id}/echo")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"echo_protocol_P1-Batch 1.csv\""
    );
    let (_, text) = extract_text_body(response).await;
    assert!(text.starts_with(ECHO_HEADER));

    for export in ["harvest_template", "pin_tracking"] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/batches/{batch_id}/{export}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{export}");
    }

    let response = app
        .oneshot(get_request(&format!("/api/batches/{}/echo", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
