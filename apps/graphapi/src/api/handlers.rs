//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{ApisResponse, HealthResponse, RpcResponse, StatusResponse},
};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{BytesRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use graphapi_core::{Envelope, GraphError, StatusCode as RpcCode};
use serde_json::Value;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get store status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.node_count().into_result() {
        Ok(node_count) => (StatusCode::OK, Json(StatusResponse { node_count })).into_response(),
        Err(status) => {
            tracing::error!("Status query failed: {}", status);
            (StatusCode::INTERNAL_SERVER_ERROR, status.to_string()).into_response()
        }
    }
}

// =============================================================================
// APIS HANDLER
// =============================================================================

/// List every callable operation.
pub async fn apis_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApisResponse::new(state.engine.apis()))
}

// =============================================================================
// RPC HANDLER
// =============================================================================

/// Invoke one engine operation.
///
/// The request body is the operation's single JSON argument; an empty body
/// is passed as `null`. The response body is always an envelope, including
/// when the path or body cannot be extracted.
pub async fn rpc_handler(
    State(state): State<AppState>,
    method: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<RpcResponse>) {
    let Path(method) = match method {
        Ok(method) => method,
        Err(rejection) => {
            return rejected("rpc_bad_path", rejection.status(), rejection.body_text());
        }
    };
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            return rejected("rpc_bad_body", rejection.status(), rejection.body_text());
        }
    };

    let args = match parse_args(&body) {
        Ok(args) => args,
        Err(e) => {
            tracing::warn!(event = "rpc_bad_body", method = %method, error = %e, "Malformed RPC body");
            let envelope: RpcResponse = Envelope::from_error(&e);
            return (StatusCode::BAD_REQUEST, Json(envelope));
        }
    };

    let envelope = state.engine.call(&method, args);
    (http_status(envelope.status().code()), Json(envelope))
}

/// Wrap an extractor rejection in an `INVALID_ARGUMENT` envelope, keeping its
/// HTTP status.
fn rejected(event: &str, status: StatusCode, reason: String) -> (StatusCode, Json<RpcResponse>) {
    tracing::warn!(event, status = %status, error = %reason, "Rejected RPC request");
    let envelope: RpcResponse = Envelope::from_error(&GraphError::InvalidArgument(reason));
    (status, Json(envelope))
}

/// Decode the raw request body into the call argument.
fn parse_args(body: &[u8]) -> Result<Value, GraphError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| GraphError::InvalidArgument(format!("request body is not JSON: {}", e)))
}

/// HTTP status mirroring an envelope status code.
pub fn http_status(code: RpcCode) -> StatusCode {
    match code {
        RpcCode::Ok => StatusCode::OK,
        RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
        RpcCode::NotFound | RpcCode::Unimplemented => StatusCode::NOT_FOUND,
        RpcCode::ResourceExhausted => StatusCode::SERVICE_UNAVAILABLE,
        RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_null_argument() {
        assert_eq!(parse_args(b"").expect("parse"), Value::Null);
        assert_eq!(parse_args(b"  \n").expect("parse"), Value::Null);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(
            parse_args(br#""node_1000""#).expect("parse"),
            Value::String("node_1000".into())
        );
    }

    #[test]
    fn garbage_body_is_invalid_argument() {
        let err = parse_args(b"{not json").expect_err("should fail");
        assert!(matches!(err, GraphError::InvalidArgument(_)));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(http_status(RpcCode::Ok), StatusCode::OK);
        assert_eq!(http_status(RpcCode::Unimplemented), StatusCode::NOT_FOUND);
        assert_eq!(
            http_status(RpcCode::ResourceExhausted),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
