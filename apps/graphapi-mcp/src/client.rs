//! # graphapi HTTP Client
//!
//! Wrapper around the graphapi RPC routes for use by the MCP server.

use serde_json::Value;

/// Errors from the HTTP client layer.
///
/// Engine-level failures are not errors here: they arrive as envelopes with
/// `ok: false` and are rendered like any other response.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Cannot reach the graphapi server.
    #[error("Cannot connect to graphapi at {0}")]
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing API key.
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,
    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,
    /// Non-success status without an envelope body.
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// HTTP client for a graphapi server.
#[derive(Clone)]
pub struct GraphApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GraphApiClient {
    /// Create a new client pointing at the given server URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Check transport-level status codes, then parse the JSON body.
    ///
    /// RPC failures come back as 4xx/5xx with an envelope body, so any status
    /// other than 401/429 is parsed before being treated as an error.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(ClientError::ServerError(status.as_u16(), body)),
            Err(e) => Err(ClientError::ParseError(e.to_string())),
        }
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// GET /health
    pub async fn health(&self) -> Result<Value, ClientError> {
        let req = self.request(reqwest::Method::GET, "/health");
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    /// GET /apis → operation listing.
    pub async fn apis(&self) -> Result<Value, ClientError> {
        let req = self.request(reqwest::Method::GET, "/apis");
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    /// POST /rpc/{method} → the operation's envelope.
    pub async fn call(&self, method: &str, args: &Value) -> Result<Value, ClientError> {
        let req = self
            .request(reqwest::Method::POST, &format!("/rpc/{method}"))
            .json(args);
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = GraphApiClient::new("http://localhost:8080/", None);
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn empty_api_key_means_no_auth() {
        let client = GraphApiClient::new("http://localhost:8080", Some(String::new()));
        assert!(client.api_key.is_none());
    }

    #[test]
    fn error_messages_name_the_failure() {
        let err = ClientError::ServerError(503, "busy".to_string());
        assert_eq!(err.to_string(), "Server error (503): busy");
        assert!(
            ClientError::ConnectionFailed("http://x".to_string())
                .to_string()
                .contains("http://x")
        );
    }
}
