use super::models::{self as projects, FIRST_PROJECT_YEAR, validate_schedule};
use crate::test_helpers::{extract_response_body, get_request, json_request, setup_test_app};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rstest::rstest;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use tower::ServiceExt;

#[rstest]
#[case(Some(2023), Some(1), Some(1))]
#[case(Some(2025), Some(3), Some(4))]
#[case(None, None, None)]
#[case(Some(2024), None, None)]
fn test_valid_schedules(
    #[case] year: Option<i32>,
    #[case] cycle: Option<i32>,
    #[case] visit: Option<i32>,
) {
    assert!(validate_schedule(year, cycle, visit, 2025).is_ok());
}

#[rstest]
#[case(Some(2022), Some(1), Some(1), "year")]
#[case(Some(2026), Some(1), Some(1), "year")]
#[case(Some(2024), Some(0), Some(1), "cycle")]
#[case(Some(2024), Some(4), Some(1), "cycle")]
#[case(Some(2024), Some(2), Some(0), "visit")]
fn test_invalid_schedules(
    #[case] year: Option<i32>,
    #[case] cycle: Option<i32>,
    #[case] visit: Option<i32>,
    #[case] field: &str,
) {
    let message = validate_schedule(year, cycle, visit, 2025).unwrap_err();
    assert!(message.starts_with(field), "{message}");
}

#[test]
fn test_first_year_is_lower_bound() {
    assert!(validate_schedule(Some(FIRST_PROJECT_YEAR), None, None, FIRST_PROJECT_YEAR).is_ok());
    assert!(validate_schedule(Some(FIRST_PROJECT_YEAR - 1), None, None, FIRST_PROJECT_YEAR).is_err());
}

#[tokio::test]
async fn test_project_crud_operations() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/projects",
            &json!({
                "target": "Endothiapepsin",
                "proposal_id": 20_241_234,
                "year": 2024,
                "cycle": 2,
                "visit": 1
            }),
        ))
        .await
        .unwrap();
    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create project: {body}");
    assert_eq!(body["target"], "Endothiapepsin");
    assert_eq!(body["cycle"], 2);
    let project_id = body["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/projects/{project_id}")))
        .await
        .unwrap();
    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], project_id);
    assert_eq!(body["proposal_id"], 20_241_234);

    let response = app
        .clone()
        .oneshot(get_request("/api/projects"))
        .await
        .unwrap();
    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array(), "Project listing should be an array");
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/projects/{project_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_success(), "Delete failed: {}", response.status());

    let response = app
        .oneshot(get_request(&format!("/api/projects/{project_id}")))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[rstest]
#[case(json!({"target": "Too early", "year": 2020, "cycle": 1, "visit": 1}))]
#[case(json!({"target": "Bad cycle", "year": 2024, "cycle": 4, "visit": 1}))]
#[case(json!({"target": "Bad visit", "year": 2024, "cycle": 1, "visit": 0}))]
#[tokio::test]
async fn test_invalid_project_is_rejected_without_write(#[case] payload: serde_json::Value) {
    let (app, db) = setup_test_app().await;

    let response = app
        .oneshot(json_request("POST", "/api/projects", &payload))
        .await
        .unwrap();

    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"]["code"], "INPUT_SHAPE_ERROR");
    assert_eq!(projects::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_target_is_rejected() {
    let (app, db) = setup_test_app().await;
    let payload = json!({"target": "Lysozyme", "year": 2024, "cycle": 1, "visit": 1});

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/projects", &payload))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request("POST", "/api/projects", &payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(projects::Entity::find().count(&db).await.unwrap(), 1);
}
