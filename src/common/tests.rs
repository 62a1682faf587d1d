use super::models::UIConfiguration;
use crate::config::Config;
use crate::test_helpers::{extract_response_body, setup_test_app};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

#[test]
fn test_ui_configuration_from_config() {
    let config = Config::for_tests();
    let ui = UIConfiguration::from(&config);

    assert_eq!(ui.client_id, "test-ui");
    assert_eq!(ui.realm, "test-realm");
    assert_eq!(ui.deployment, "test");
}

#[test]
fn test_ui_configuration_serializes_client_id_in_camel_case() {
    let ui = UIConfiguration {
        client_id: "test-client".to_string(),
        realm: "test-realm".to_string(),
        url: "http://localhost:8080".to_string(),
        deployment: "test".to_string(),
    };

    let json = serde_json::to_string(&ui).unwrap();
    assert!(json.contains("\"clientId\":\"test-client\""));
    assert!(!json.contains("client_id"));
}

#[tokio::test]
async fn test_healthz_reports_ok() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ui_config_endpoint() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientId"], "test-ui");
    assert_eq!(body["realm"], "test-realm");
}
