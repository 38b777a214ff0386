use crate::models::{ExtractionRequest, ExtractionResult};
use crate::services::{extract_country, ExtractionError};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

/// Client-facing text for a body that is not a JSON object.
pub const REQUEST_MUST_BE_JSON: &str = "Request must be JSON";

/// Only a JSON object is a valid request body; arrays are never read
/// positionally.
fn parse_request(body: Value) -> Result<ExtractionRequest, AppError> {
    if !body.is_object() {
        tracing::warn!("Rejected non-object JSON body");
        return Err(AppError::bad_request(REQUEST_MUST_BE_JSON));
    }

    serde_json::from_value(body).map_err(|e| {
        tracing::warn!(reason = %e, "Rejected request body");
        AppError::bad_request(REQUEST_MUST_BE_JSON)
    })
}

/// `POST /get-country`
///
/// Body rejections are mapped here instead of using axum's defaults so every
/// failure shares the `{"error", "success": false}` shape.
pub async fn get_country(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExtractionResult>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(reason = %rejection.body_text(), "Rejected request body");
        AppError::bad_request(REQUEST_MUST_BE_JSON)
    })?;
    let request = parse_request(body)?;

    let message = request.message.as_deref().unwrap_or_default();

    let result = extract_country(state.text_provider.as_ref(), message)
        .await
        .map_err(|e| {
            if matches!(e, ExtractionError::EmptyMessage) {
                tracing::warn!("Rejected request without a message");
            }
            AppError::from(e)
        })?;

    Ok(Json(result))
}
