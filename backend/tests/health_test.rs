//! Integration tests for health check endpoints

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("healthy"));
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alive"));
}

#[tokio::test]
async fn test_readiness_endpoint() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ready"));
    assert!(body.contains("memory"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_readiness_endpoint_with_database() {
    let app = common::TestApp::with_database().await;

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("postgres"));
}

#[tokio::test]
async fn test_api_root() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Diet Tracker API"));
}
