//! Integration tests for `POST /get-country`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use common::{router_with, TestApp};
use country_service::services::providers::mock::MockTextProvider;
use country_service::services::providers::ProviderError;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/get-country")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

async fn send(provider: &Arc<MockTextProvider>, request: Request<Body>) -> (StatusCode, Value) {
    let response = router_with(provider.clone())
        .oneshot(request)
        .await
        .expect("Router failed");
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn identifies_country_from_description() {
    let provider = Arc::new(MockTextProvider::replying("FRA"));

    let (status, body) = send(&provider, json_request(r#"{"message": "I live in Paris"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"country_code": "FRA", "success": true}));
    assert_eq!(provider.call_count(), 1);
    assert!(provider
        .last_prompt()
        .unwrap()
        .contains("Description: I live in Paris"));
}

#[tokio::test]
async fn lowercase_reply_is_uppercased() {
    let provider = Arc::new(MockTextProvider::replying("  deu \n"));

    let (status, body) = send(&provider, json_request(r#"{"message": "Berlin wall"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country_code"], "DEU");
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn none_reply_is_reported_as_no_match() {
    let provider = Arc::new(MockTextProvider::replying("NONE"));

    let (status, body) = send(
        &provider,
        json_request(r#"{"message": "somewhere on the moon"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "country_code": null,
            "success": false,
            "message": "No country identified"
        })
    );
}

#[tokio::test]
async fn malformed_replies_are_no_match() {
    for reply in ["", "FR", "FRANCE", "FR4", "France.", "USA\nGBR"] {
        let provider = Arc::new(MockTextProvider::replying(reply));

        let (status, body) = send(&provider, json_request(r#"{"message": "Europe"}"#)).await;

        assert_eq!(status, StatusCode::OK, "reply {:?}", reply);
        assert_eq!(body["success"], false, "reply {:?}", reply);
        assert_eq!(body["country_code"], Value::Null, "reply {:?}", reply);
    }
}

#[tokio::test]
async fn empty_message_is_rejected_without_backend_call() {
    let provider = Arc::new(MockTextProvider::replying("FRA"));

    for body in [
        r#"{"message": ""}"#,
        r#"{"message": "   \n\t "}"#,
        r#"{"message": null}"#,
        r#"{}"#,
    ] {
        let (status, json) = send(&provider, json_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(
            json,
            json!({"error": "Message field is required", "success": false})
        );
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn non_json_body_is_rejected_without_backend_call() {
    let provider = Arc::new(MockTextProvider::replying("FRA"));

    let plain_text = Request::builder()
        .method("POST")
        .uri("/get-country")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("I live in Paris"))
        .unwrap();

    let requests = vec![
        plain_text,
        json_request("{not json"),
        json_request(r#""I live in Paris""#),
        json_request(r#"{"message": 42}"#),
        json_request(r#"["I live in Paris"]"#),
        json_request("[]"),
        json_request("null"),
    ];

    for request in requests {
        let (status, body) = send(&provider, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Request must be JSON", "success": false}));
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn backend_failure_is_generic_internal_error() {
    let provider = Arc::new(MockTextProvider::failing(ProviderError::NetworkError(
        "connection reset by peer".to_string(),
    )));

    let (status, body) = send(&provider, json_request(r#"{"message": "I live in Paris"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Internal server error", "success": false})
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn every_provider_error_maps_to_500() {
    let errors = [
        ProviderError::Timeout,
        ProviderError::RateLimited,
        ProviderError::ContentFiltered,
        ProviderError::EmptyResponse,
        ProviderError::ApiError("Gemini API error 503".to_string()),
    ];

    for error in errors {
        let provider = Arc::new(MockTextProvider::failing(error.clone()));
        let (status, _) = send(&provider, json_request(r#"{"message": "Lisbon"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "error {:?}", error);
    }
}

#[tokio::test]
async fn identical_inputs_give_identical_results() {
    let provider = Arc::new(MockTextProvider::replying("ita"));

    let (_, first) = send(&provider, json_request(r#"{"message": "Rome"}"#)).await;
    let (_, second) = send(&provider, json_request(r#"{"message": "Rome"}"#)).await;

    assert_eq!(first, second);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let provider = Arc::new(MockTextProvider::replying("FRA"));

    let response = router_with(provider)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/get-country")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn spawned_app_serves_country_lookup() {
    let app = TestApp::spawn(MockTextProvider::replying("JPN")).await;

    let response = app
        .post_country(json!({"message": "Mount Fuji at sunrise"}))
        .await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({"country_code": "JPN", "success": true}));
    assert_eq!(app.provider.call_count(), 1);
}

#[tokio::test]
async fn spawned_app_rejects_blank_message() {
    let app = TestApp::spawn(MockTextProvider::replying("JPN")).await;

    let response = app.post_country(json!({"message": "  "})).await;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(app.provider.call_count(), 0);
}
