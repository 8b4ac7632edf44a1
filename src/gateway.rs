//! Axum gateway exposing the Unkey client over three inbound routes.
//!
//! Each handler decodes the minimal required fields, delegates to
//! [`UnkeyClient`], and maps the outcome onto plain `{"error": ...}` /
//! `{"message": ...}` JSON bodies. Client failures surface as HTTP 500; no
//! internal error codes leak to inbound callers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{UnkeyClient, UnkeyError};

/// Shared state for the gateway routes.
#[derive(Clone)]
pub struct GatewayState {
    pub client: UnkeyClient,
}

/// Builds the axum router for the gateway.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/create", post(create_key))
        .route("/key", get(key_info))
        .route("/protected", get(protected))
        .with_state(state)
}

/// `POST /create` — creates a key under an API namespace.
///
/// Only `apiId` and `name` are forwarded; anything else in the body is
/// dropped.
async fn create_key(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body = parse_json(&body);
    let (Some(api_id), Some(name)) = (body.get("apiId"), body.get("name")) else {
        return bad_request("Missing apiId or name");
    };

    let payload = json!({ "apiId": api_id, "name": name });
    match state.client.create_key(payload).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// `GET /key` — looks up a key by the `keyId` field of the JSON body.
async fn key_info(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body = parse_json(&body);
    let key_id = body
        .get("keyId")
        .filter(|value| !value.is_null())
        .cloned();
    let Some(key_id) = key_id else {
        // Error text is part of the public contract for existing consumers.
        return bad_request("No authorization header found");
    };

    match state.client.get_key(json!({ "keyId": key_id })).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// `GET /protected` — verifies the `x-api-key` header against the remote API
/// and gates access on the reported `valid` flag.
async fn protected(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let Some(api_key) = headers.get("x-api-key").and_then(|value| value.to_str().ok()) else {
        return bad_request("No authorization header found");
    };

    match state.client.verify_key(json!({ "key": api_key })).await {
        Ok(result) if result.get("valid").and_then(Value::as_bool) == Some(true) => (
            StatusCode::OK,
            Json(json!({ "message": "You can access" })),
        )
            .into_response(),
        Ok(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "You can not access" })),
        )
            .into_response(),
        Err(err) => internal_error(err),
    }
}

/// Lenient body parse: an undecodable or absent body counts as no fields.
fn parse_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn internal_error(err: UnkeyError) -> Response {
    tracing::error!(error = %err, "upstream call failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::{bad_request, internal_error, parse_json};
    use crate::UnkeyError;

    #[test]
    fn undecodable_body_counts_as_absent() {
        assert_eq!(parse_json(b"not json"), serde_json::Value::Null);
        assert_eq!(parse_json(b""), serde_json::Value::Null);
    }

    #[test]
    fn missing_field_maps_to_400() {
        let resp = bad_request("No authorization header found");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn client_errors_map_to_500() {
        let resp = internal_error(UnkeyError::Fetch {
            message: "boom".to_owned(),
        });
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
