use super::services::{
    LIBRARY_PLATE_COLUMNS, LIBRARY_PLATE_ROWS, LIBRARY_PLATE_TYPE, XTAL_PLATE_TYPE,
    library_well_names, mrc_2d_well_map, row_label,
    seed_standard_catalog,
};
use crate::geometry::DROP_POSITION_CODES;
use crate::test_helpers::{extract_response_body, setup_test_app, setup_test_db};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rstest::rstest;
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter};
use std::collections::HashSet;
use tower::ServiceExt;
use xtal_entity::{
    library_plate_type_well_types, library_plate_types, library_well_types, well_maps,
    xtal_plate_type_well_types, xtal_plate_types, xtal_well_types,
};

#[rstest]
#[case(0, "A")]
#[case(25, "Z")]
#[case(26, "AA")]
#[case(31, "AF")]
fn test_row_labels(#[case] index: usize, #[case] expected: &str) {
    assert_eq!(row_label(index), expected);
}

#[test]
fn test_library_well_names_cover_1536_wells() {
    let names = library_well_names();

    assert_eq!(names.len(), LIBRARY_PLATE_ROWS * LIBRARY_PLATE_COLUMNS);
    assert_eq!(names[0], "A01");
    assert_eq!(names[47], "A48");
    assert_eq!(names[48], "B01");
    assert_eq!(names.last().unwrap(), "AF48");
    assert_eq!(names.iter().collect::<HashSet<_>>().len(), names.len());
}

#[test]
fn test_mrc_2d_map_pairs_shifter_with_echo_in_order() {
    let map = mrc_2d_well_map();

    assert_eq!(map.len(), 192);
    assert_eq!((map[0].shifter.as_str(), map[0].echo.as_str()), ("A1a", "A1"));
    assert_eq!((map[11].shifter.as_str(), map[11].echo.as_str()), ("A12a", "A12"));
    assert_eq!((map[12].shifter.as_str(), map[12].echo.as_str()), ("A1b", "A13"));
    assert_eq!((map[24].shifter.as_str(), map[24].echo.as_str()), ("B1a", "B9"));
    assert_eq!((map[191].shifter.as_str(), map[191].echo.as_str()), ("H12b", "L16"));

    for entry in &map {
        let expected_y = if entry.shifter.ends_with('b') { 1350 } else { 0 };
        assert_eq!((entry.x, entry.y), (0, expected_y), "{}", entry.shifter);
    }
}

#[tokio::test]
async fn test_seed_standard_catalog_is_idempotent() {
    let db = setup_test_db().await;

    let first = seed_standard_catalog(&db, 300).await.unwrap();
    assert_eq!(first.library_plate_types_created, 1);
    assert_eq!(first.library_well_types_created, 1536);
    assert_eq!(first.xtal_plate_types_created, 1);
    assert_eq!(first.xtal_well_types_created, 192);
    assert_eq!(first.drop_positions_created, DROP_POSITION_CODES.len());

    let second = seed_standard_catalog(&db, 300).await.unwrap();
    assert_eq!(second.library_plate_types_created, 0);
    assert_eq!(second.xtal_well_types_created, 0);
    assert_eq!(second.drop_positions_created, 0);

    assert_eq!(library_well_types::Entity::find().count(&db).await.unwrap(), 1536);
    assert_eq!(xtal_well_types::Entity::find().count(&db).await.unwrap(), 192);
    assert_eq!(well_maps::Entity::find().count(&db).await.unwrap(), 192);
}

#[tokio::test]
async fn test_plate_types_reach_their_well_types_through_join_tables() {
    let db = setup_test_db().await;
    seed_standard_catalog(&db, 300).await.unwrap();

    let library_type = library_plate_types::Entity::find()
        .filter(library_plate_types::Column::Name.eq(LIBRARY_PLATE_TYPE))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let library_links = library_type
        .find_related(library_plate_type_well_types::Entity)
        .count(&db)
        .await
        .unwrap();
    let library_wells = library_type
        .find_related(library_well_types::Entity)
        .count(&db)
        .await
        .unwrap();
    assert_eq!(library_links, 1536);
    assert_eq!(library_wells, 1536);

    let (link, well_type) = xtal_plate_type_well_types::Entity::find()
        .find_also_related(xtal_well_types::Entity)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let well_type = well_type.unwrap();
    assert_eq!(link.well_type_id, well_type.id);

    let plate_types = well_type
        .find_related(xtal_plate_types::Entity)
        .all(&db)
        .await
        .unwrap();
    assert_eq!(plate_types.len(), 1);
    assert_eq!(plate_types[0].name, XTAL_PLATE_TYPE);
}

#[tokio::test]
async fn test_seed_route() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/catalog/seed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["xtal_well_types_created"], 192);
}
