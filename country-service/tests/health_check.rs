//! Integration tests for the health and readiness endpoints.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{router_with, TestApp};
use country_service::services::providers::mock::MockTextProvider;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_fixed_payload() {
    let app = TestApp::spawn(MockTextProvider::replying("FRA")).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!({"status": "healthy", "service": "LLM Map API"})
    );
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn health_check_ignores_unhealthy_provider() {
    let router = router_with(Arc::new(MockTextProvider::replying("FRA").unhealthy()));

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_reflects_provider_health() {
    let ready = router_with(Arc::new(MockTextProvider::replying("FRA")))
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);

    let unavailable = router_with(Arc::new(MockTextProvider::replying("FRA").unhealthy()))
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = unavailable.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = router_with(Arc::new(MockTextProvider::replying("FRA")))
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "probe-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "probe-1");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let response = router_with(Arc::new(MockTextProvider::replying("FRA")))
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}
