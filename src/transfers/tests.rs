use super::models::{BatchCreate, PlannedTransfer, SolventSeries, VolumePlan};
use super::services::{build_batch, create_batch, plan_transfers, solvent_volumes};
use crate::common::errors::TrackingError;
use crate::plates::pools::{available_library_wells, available_xtal_wells};
use crate::test_helpers::{
    create_test_library_plate, create_test_project, create_test_xtal_plate, extract_response_body,
    get_request, json_request, seed_catalog, setup_test_app, setup_test_db,
};
use axum::http::StatusCode;
use rstest::rstest;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use xtal_entity::{batches, library_wells, transfers, xtal_wells};

struct Fixture {
    project_id: Uuid,
    library_plate_id: Uuid,
    xtal_plate_id: Uuid,
}

async fn fixture(db: &DatabaseConnection, library_count: usize, xtal_count: usize) -> Fixture {
    seed_catalog(db).await;
    Fixture {
        project_id: create_test_project(db, "Endothiapepsin").await.id,
        library_plate_id: create_test_library_plate(db, "LIB-1", library_count).await,
        xtal_plate_id: create_test_xtal_plate(db, "P1", xtal_count, "c").await,
    }
}

fn request(fixture: &Fixture) -> BatchCreate {
    BatchCreate {
        library_plate_id: fixture.library_plate_id,
        xtal_plate_id: fixture.xtal_plate_id,
        project_id: fixture.project_id,
        name: None,
        count: None,
        volume: None,
        volumes: None,
        solvent: None,
    }
}

fn series(start: i32, stop: i32, step: i32, replicates: u32) -> SolventSeries {
    SolventSeries {
        start,
        stop,
        step,
        replicates,
        library_well_id: None,
    }
}

#[test]
fn test_solvent_series_repeats_each_volume() {
    let volumes = solvent_volumes(&series(5, 20, 5, 2), 96).unwrap();
    assert_eq!(volumes, vec![5, 5, 10, 10, 15, 15, 20, 20]);
}

#[test]
fn test_solvent_series_stops_before_overshooting() {
    assert_eq!(solvent_volumes(&series(10, 25, 10, 1), 96).unwrap(), vec![10, 20]);
}

#[rstest]
#[case(series(5, 20, 0, 1))]
#[case(series(5, 20, -5, 1))]
#[case(series(30, 20, 5, 1))]
#[case(series(5, 20, 5, 0))]
fn test_invalid_solvent_series(#[case] series: SolventSeries) {
    assert!(matches!(
        solvent_volumes(&series, 96),
        Err(TrackingError::InputShape { .. })
    ));
}

#[rstest]
#[case(series(5, 20, 5, 4_000_000_000), 96)]
#[case(series(i32::MIN, i32::MAX, 1, u32::MAX), 4096)]
#[case(series(5, 20, 5, 2), 7)]
fn test_solvent_series_larger_than_pool_is_rejected(
    #[case] series: SolventSeries,
    #[case] capacity: usize,
) {
    assert!(matches!(
        solvent_volumes(&series, capacity),
        Err(TrackingError::InputShape { .. })
    ));
}

#[test]
fn test_solvent_series_exactly_filling_pool() {
    assert_eq!(solvent_volumes(&series(5, 20, 5, 2), 8).unwrap().len(), 8);
}

fn library_well(sequence: i32) -> library_wells::Model {
    library_wells::Model {
        id: Uuid::new_v4(),
        plate_id: Uuid::nil(),
        well_type_id: Uuid::nil(),
        used: false,
        catalog_id: format!("Z{sequence}"),
        smiles: "C".to_string(),
        sequence,
    }
}

fn xtal_well(sequence: i32) -> xtal_wells::Model {
    xtal_wells::Model {
        id: Uuid::new_v4(),
        plate_id: Uuid::nil(),
        well_type_id: Uuid::nil(),
        drop_position_id: None,
        harvesting_status: false,
        sequence,
        time_arrival: None,
        harvest_comment: None,
    }
}

#[rstest]
#[case(VolumePlan::Constant(4))]
#[case(VolumePlan::Constant(151))]
#[case(VolumePlan::PerTransfer(vec![25, 200]))]
fn test_volume_outside_range_is_constraint_violation(#[case] plan: VolumePlan) {
    let sources = [library_well(1), library_well(2)];
    let destinations = [xtal_well(1), xtal_well(2)];

    assert!(matches!(
        plan_transfers(&sources, &destinations, 2, &plan),
        Err(TrackingError::ConstraintViolation { .. })
    ));
}

#[rstest]
#[case(VolumePlan::Constant(5))]
#[case(VolumePlan::Constant(150))]
#[case(VolumePlan::PerTransfer(vec![5, 150]))]
fn test_volume_bounds_are_inclusive(#[case] plan: VolumePlan) {
    let sources = [library_well(1), library_well(2)];
    let destinations = [xtal_well(1), xtal_well(2)];

    assert_eq!(plan_transfers(&sources, &destinations, 2, &plan).unwrap().len(), 2);
}

#[test]
fn test_volume_list_must_match_count() {
    let sources = [library_well(1), library_well(2)];
    let destinations = [xtal_well(1), xtal_well(2)];

    assert!(matches!(
        plan_transfers(&sources, &destinations, 2, &VolumePlan::PerTransfer(vec![25])),
        Err(TrackingError::InputShape { .. })
    ));
}

#[tokio::test]
async fn test_scenario_constant_volume_pairs_in_sequence_order() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 3, 3).await;

    let batch = create_batch(
        &db,
        BatchCreate {
            count: Some(3),
            volume: Some(25),
            ..request(&fixture)
        },
    )
    .await
    .unwrap();

    let sources = available_library_wells(&db, fixture.library_plate_id)
        .await
        .unwrap();
    assert_eq!(sources.len(), 0, "every source well is now part of a transfer");

    let library = library_wells::Entity::find()
        .all(&db)
        .await
        .unwrap();
    let xtal = xtal_wells::Entity::find().all(&db).await.unwrap();
    let sequence_of_source = |id: Uuid| library.iter().find(|w| w.id == id).unwrap().sequence;
    let sequence_of_destination = |id: Uuid| xtal.iter().find(|w| w.id == id).unwrap().sequence;

    assert_eq!(batch.transfers.len(), 3);
    let pairs: Vec<(i32, i32, i32)> = batch
        .transfers
        .iter()
        .map(|t| {
            (
                sequence_of_source(t.from_well_id),
                sequence_of_destination(t.to_well_id),
                t.transfer_volume,
            )
        })
        .collect();
    assert_eq!(pairs, vec![(1, 1, 25), (2, 2, 25), (3, 3, 25)]);
}

#[tokio::test]
async fn test_count_is_truncation_of_both_pools() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 5, 4).await;

    let batch = create_batch(
        &db,
        BatchCreate {
            count: Some(2),
            volumes: Some(vec![10, 40]),
            ..request(&fixture)
        },
    )
    .await
    .unwrap();

    let volumes: Vec<i32> = batch.transfers.iter().map(|t| t.transfer_volume).collect();
    assert_eq!(volumes, vec![10, 40]);
    assert_eq!(
        available_library_wells(&db, fixture.library_plate_id).await.unwrap().len(),
        3
    );
    assert_eq!(
        available_xtal_wells(&db, fixture.xtal_plate_id).await.unwrap().len(),
        2
    );
}

#[rstest]
#[case(series(5, 20, 5, 2))]
#[case(series(5, 20, 5, 4_000_000_000))]
#[tokio::test]
async fn test_scenario_solvent_series_larger_than_pool_is_rejected(#[case] series: SolventSeries) {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 2, 6).await;

    let result = create_batch(
        &db,
        BatchCreate {
            solvent: Some(series),
            ..request(&fixture)
        },
    )
    .await;

    assert!(matches!(result, Err(TrackingError::InputShape { .. })));
    assert_eq!(batches::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(transfers::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_solvent_batch_repeats_one_source() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 2, 8).await;

    let batch = create_batch(
        &db,
        BatchCreate {
            solvent: Some(series(5, 20, 5, 2)),
            ..request(&fixture)
        },
    )
    .await
    .unwrap();

    let first_source = available_library_wells(&db, fixture.library_plate_id)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(first_source.sequence, 2, "solvent well left the pool");

    assert_eq!(batch.transfers.len(), 8);
    let sources: std::collections::HashSet<Uuid> =
        batch.transfers.iter().map(|t| t.from_well_id).collect();
    assert_eq!(sources.len(), 1);
    let volumes: Vec<i32> = batch.transfers.iter().map(|t| t.transfer_volume).collect();
    assert_eq!(volumes, vec![5, 5, 10, 10, 15, 15, 20, 20]);
}

#[tokio::test]
async fn test_solvent_well_from_another_plate_is_rejected() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 2, 8).await;
    let other_plate = create_test_library_plate(&db, "LIB-2", 1).await;
    let foreign_well = available_library_wells(&db, other_plate).await.unwrap()[0].id;

    let result = create_batch(
        &db,
        BatchCreate {
            solvent: Some(SolventSeries {
                library_well_id: Some(foreign_well),
                ..series(5, 10, 5, 1)
            }),
            ..request(&fixture)
        },
    )
    .await;

    assert!(matches!(result, Err(TrackingError::InputShape { .. })));
}

#[rstest]
#[case(Some(4), 25, "count")]
#[case(Some(0), 25, "count")]
#[case(Some(2), 4, "volume")]
#[case(Some(2), 151, "volume")]
#[tokio::test]
async fn test_rejected_batches_write_nothing(
    #[case] count: Option<usize>,
    #[case] volume: i32,
    #[case] reason: &str,
) {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 3, 3).await;

    let err = create_batch(
        &db,
        BatchCreate {
            count,
            volume: Some(volume),
            ..request(&fixture)
        },
    )
    .await
    .unwrap_err();

    match (reason, &err) {
        ("count", TrackingError::InputShape { .. })
        | ("volume", TrackingError::ConstraintViolation { .. }) => {}
        _ => panic!("unexpected error for {reason}: {err:?}"),
    }
    assert_eq!(batches::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_more_than_one_volume_mode_is_rejected() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 3, 3).await;

    let result = create_batch(
        &db,
        BatchCreate {
            count: Some(2),
            volume: Some(25),
            volumes: Some(vec![25, 25]),
            ..request(&fixture)
        },
    )
    .await;

    assert!(matches!(result, Err(TrackingError::InputShape { .. })));
}

#[tokio::test]
async fn test_batch_with_conflicting_destination_is_atomic() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 3, 2).await;
    let sources = available_library_wells(&db, fixture.library_plate_id).await.unwrap();
    let destinations = available_xtal_wells(&db, fixture.xtal_plate_id).await.unwrap();

    let planned = [
        PlannedTransfer {
            from_well_id: sources[0].id,
            to_well_id: destinations[0].id,
            volume: 25,
        },
        PlannedTransfer {
            from_well_id: sources[1].id,
            to_well_id: destinations[1].id,
            volume: 25,
        },
        PlannedTransfer {
            from_well_id: sources[2].id,
            to_well_id: destinations[0].id,
            volume: 25,
        },
    ];
    let result = build_batch(&db, fixture.project_id, None, &planned).await;

    assert!(matches!(result, Err(TrackingError::ConstraintViolation { .. })));
    assert_eq!(batches::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(transfers::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_default_batch_names_count_up() {
    let db = setup_test_db().await;
    let fixture = fixture(&db, 4, 4).await;

    let first = create_batch(
        &db,
        BatchCreate {
            count: Some(1),
            volume: Some(25),
            ..request(&fixture)
        },
    )
    .await
    .unwrap();
    let second = create_batch(
        &db,
        BatchCreate {
            name: Some("   ".to_string()),
            count: Some(1),
            volume: Some(25),
            ..request(&fixture)
        },
    )
    .await
    .unwrap();
    let named = create_batch(
        &db,
        BatchCreate {
            name: Some("Fragment screen".to_string()),
            count: Some(1),
            volume: Some(25),
            ..request(&fixture)
        },
    )
    .await
    .unwrap();

    assert_eq!(first.name, "Batch 1");
    assert_eq!(second.name, "Batch 2");
    assert_eq!(named.name, "Fragment screen");
}

#[tokio::test]
async fn test_batch_routes() {
    let (app, db) = setup_test_app().await;
    let fixture = fixture(&db, 3, 3).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/batches",
            &json!({
                "library_plate_id": fixture.library_plate_id,
                "xtal_plate_id": fixture.xtal_plate_id,
                "project_id": fixture.project_id,
                "name": "HTTP batch",
                "count": 2,
                "volume": 30
            }),
        ))
        .await
        .unwrap();
    let (status, batch) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::CREATED, "{batch}");
    assert_eq!(batch["transfers"].as_array().unwrap().len(), 2);
    let batch_id = batch["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request("/api/batches"))
        .await
        .unwrap();
    let (status, list) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["transfer_count"], 2);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/batches/{batch_id}/timestamp"),
            &json!({"timestamp": "07/13/2024 09:05:01"}),
        ))
        .await
        .unwrap();
    let (status, updated) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["timestamp"], "2024-07-13T09:05:01");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/batches/{batch_id}/timestamp"),
            &json!({"timestamp": "2024-07-13 09:05"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/batches/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/batches",
            &json!({
                "library_plate_id": fixture.library_plate_id,
                "xtal_plate_id": fixture.xtal_plate_id,
                "project_id": fixture.project_id,
                "count": 1,
                "volume": 500
            }),
        ))
        .await
        .unwrap();
    let (status, error) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "{error}");
    assert_eq!(error["error"]["type"], "ConstraintViolation");
}
