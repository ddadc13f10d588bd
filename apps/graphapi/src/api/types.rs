//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. RPC calls
//! themselves answer with the engine's `Envelope`; the types here cover the
//! service routes around them.

use graphapi_core::{ApiInfo, ENVELOPE_VERSION, Envelope};
use serde::{Deserialize, Serialize};

/// Body of every `POST /rpc/{method}` response.
pub type RpcResponse = Envelope<serde_json::Value>;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Store status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub node_count: usize,
}

// =============================================================================
// APIS RESPONSE
// =============================================================================

/// One operation as listed by `GET /apis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfoJson {
    pub name: String,
    pub req: String,
    pub resp: String,
}

impl From<&ApiInfo> for ApiInfoJson {
    fn from(info: &ApiInfo) -> Self {
        Self {
            name: info.name.to_string(),
            req: info.req.to_string(),
            resp: info.resp.to_string(),
        }
    }
}

/// Operation listing, tagged with the envelope contract version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApisResponse {
    pub version: u32,
    pub apis: Vec<ApiInfoJson>,
}

impl ApisResponse {
    /// Build the listing from registry entries.
    pub fn new<'a>(apis: impl IntoIterator<Item = &'a ApiInfo>) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            apis: apis.into_iter().map(ApiInfoJson::from).collect(),
        }
    }

    /// Names only, in listing order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.apis.iter().map(|a| a.name.as_str()).collect()
    }
}
