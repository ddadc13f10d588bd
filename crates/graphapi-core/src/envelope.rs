//! # Envelope Protocol
//!
//! Every engine operation returns exactly one `Envelope`:
//!
//! ```json
//! { "ok": true,  "status": { "code": "OK", "message": "ok" }, "data": "node_1000" }
//! { "ok": false, "status": { "code": "INVALID_ARGUMENT", "message": "..." } }
//! ```
//!
//! - `ok` is true iff the operation completed without an engine-level failure.
//! - `status` is the canonical success value, or a diagnostic code + message.
//! - `data` is the operation payload and is omitted on failure.
//!
//! Envelopes are immutable once built. Callers branch on `ok` before
//! trusting `data`.

use crate::primitives::OK_MESSAGE;
use crate::types::GraphError;
use serde::de::IgnoredAny;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// STATUS
// =============================================================================

/// Machine-readable outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// The operation completed.
    Ok,
    /// A required argument was missing or malformed.
    InvalidArgument,
    /// The addressed node does not exist.
    NotFound,
    /// No operation is registered under the requested name.
    Unimplemented,
    /// The engine ran out of a finite resource (the id space).
    ResourceExhausted,
    /// An engine invariant could not be upheld for this call.
    Internal,
}

impl StatusCode {
    /// Wire spelling of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured status carried by every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// The canonical success status.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: StatusCode::Ok,
            message: OK_MESSAGE.to_string(),
        }
    }

    /// A status with an explicit code and message.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> StatusCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

// =============================================================================
// VOID
// =============================================================================

/// Payload marker for operations that take or return nothing.
///
/// Serializes as an empty object `{}`. Deserializes from any value, so an
/// operation taking `Void` ignores whatever the caller sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Void;

impl Serialize for Void {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_map(Some(0))?.end()
    }
}

impl<'de> Deserialize<'de> for Void {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self)
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Uniform result of an engine operation.
///
/// Decoding goes through the same rules as the constructors: `ok` must agree
/// with the status code, a success carries `data` and a failure does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawEnvelope<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Envelope<T> {
    ok: bool,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// Envelope as it appears on the wire, before validation.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawEnvelope<T> {
    ok: bool,
    status: Status,
    #[serde(default, deserialize_with = "present")]
    data: Option<T>,
}

/// A `data` key that is present yields `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<T> TryFrom<RawEnvelope<T>> for Envelope<T> {
    type Error = GraphError;

    fn try_from(raw: RawEnvelope<T>) -> Result<Self, Self::Error> {
        let RawEnvelope { ok, status, data } = raw;
        if ok != status.is_ok() {
            return Err(GraphError::Serialization(format!(
                "envelope ok={} disagrees with status code {}",
                ok,
                status.code()
            )));
        }
        match (ok, data.is_some()) {
            (true, false) => Err(GraphError::Serialization(
                "ok envelope without data".to_string(),
            )),
            (false, true) => Err(GraphError::Serialization(
                "failed envelope carries data".to_string(),
            )),
            _ => Ok(Self { ok, status, data }),
        }
    }
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    pub fn make_ok(data: T) -> Self {
        Self {
            ok: true,
            status: Status::ok(),
            data: Some(data),
        }
    }

    /// Failed envelope with a diagnostic status and no data.
    ///
    /// `StatusCode::Ok` is not a failure code; it is reported as `Internal` so
    /// that `ok == false` always pairs with a non-OK status.
    pub fn make_error(code: StatusCode, message: impl Into<String>) -> Self {
        let code = if code == StatusCode::Ok {
            StatusCode::Internal
        } else {
            code
        };
        Self {
            ok: false,
            status: Status::new(code, message),
            data: None,
        }
    }

    /// Failed envelope describing `err`.
    pub fn from_error(err: &GraphError) -> Self {
        Self::make_error(err.status_code(), err.to_string())
    }

    /// Fold an internal result into an envelope.
    pub fn from_result(result: Result<T, GraphError>) -> Self {
        match result {
            Ok(data) => Self::make_ok(data),
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The payload, present only on success.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Split into the payload or the failing status.
    pub fn into_result(self) -> Result<T, Status> {
        match (self.ok, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(Status::new(StatusCode::Internal, "ok envelope without data")),
            (false, _) => Err(self.status),
        }
    }

    /// Transform the payload, keeping the status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            ok: self.ok,
            status: self.status,
            data: self.data.map(f),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Erase the payload type for the dynamic dispatch path.
    ///
    /// A payload that cannot be represented as plain data turns the envelope
    /// into an `Internal` failure.
    pub fn into_value(self) -> Envelope<serde_json::Value> {
        match self.data {
            None => Envelope {
                ok: self.ok,
                status: self.status,
                data: None,
            },
            Some(data) => match serde_json::to_value(data) {
                Ok(value) => Envelope {
                    ok: self.ok,
                    status: self.status,
                    data: Some(value),
                },
                Err(e) => Envelope::from_error(&GraphError::Serialization(e.to_string())),
            },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_wire_shape() {
        let env = Envelope::make_ok("node_1000".to_string());
        let json = serde_json::to_value(&env).expect("serialize");
        assert_eq!(
            json,
            json!({
                "ok": true,
                "status": { "code": "OK", "message": "ok" },
                "data": "node_1000"
            })
        );
    }

    #[test]
    fn error_envelope_omits_data() {
        let env: Envelope<bool> = Envelope::make_error(StatusCode::InvalidArgument, "missing id");
        let json = serde_json::to_value(&env).expect("serialize");
        assert_eq!(
            json,
            json!({
                "ok": false,
                "status": { "code": "INVALID_ARGUMENT", "message": "missing id" }
            })
        );
        assert!(env.data().is_none());
    }

    #[test]
    fn make_error_never_reports_ok_code() {
        let env: Envelope<Void> = Envelope::make_error(StatusCode::Ok, "confused caller");
        assert!(!env.is_ok());
        assert_eq!(env.status().code(), StatusCode::Internal);
    }

    #[test]
    fn void_serializes_as_empty_object() {
        let json = serde_json::to_value(Envelope::make_ok(Void)).expect("serialize");
        assert_eq!(json["data"], json!({}));
    }

    #[test]
    fn void_accepts_any_argument() {
        for v in [json!({}), json!(null), json!({ "x": 1 }), json!([1, 2]), json!("s")] {
            assert_eq!(serde_json::from_value::<Void>(v).expect("void"), Void);
        }
    }

    #[test]
    fn false_payload_is_kept_distinct_from_failure() {
        let env = Envelope::make_ok(false);
        assert!(env.is_ok());
        assert_eq!(env.data(), Some(&false));
        assert!(!env.into_result().expect("ok"));
    }

    #[test]
    fn from_result_maps_error_code() {
        let env: Envelope<bool> = Envelope::from_result(Err(GraphError::IdSpaceExhausted));
        assert!(!env.is_ok());
        assert_eq!(env.status().code(), StatusCode::ResourceExhausted);
        assert!(env.status().message().contains("exhausted"));
    }

    #[test]
    fn into_value_preserves_status_and_payload() {
        let env = Envelope::make_ok(true).into_value();
        assert_eq!(env.data(), Some(&json!(true)));
        assert!(env.status().is_ok());

        let failed: Envelope<bool> = Envelope::make_error(StatusCode::NotFound, "gone");
        let erased = failed.into_value();
        assert_eq!(erased.status().code(), StatusCode::NotFound);
        assert!(erased.data().is_none());
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let text = r#"{"ok":true,"status":{"code":"OK","message":"ok"},"data":{}}"#;
        let env: Envelope<Void> = serde_json::from_str(text).expect("deserialize");
        assert!(env.is_ok());
        assert_eq!(env.into_data(), Some(Void));
    }

    #[test]
    fn decoding_rejects_ok_flag_that_contradicts_code() {
        let text = r#"{"ok":false,"status":{"code":"OK","message":"ok"},"data":5}"#;
        assert!(serde_json::from_str::<Envelope<serde_json::Value>>(text).is_err());

        let text = r#"{"ok":true,"status":{"code":"NOT_FOUND","message":"gone"},"data":5}"#;
        assert!(serde_json::from_str::<Envelope<serde_json::Value>>(text).is_err());
    }

    #[test]
    fn decoding_rejects_data_on_failure() {
        let text = r#"{"ok":false,"status":{"code":"NOT_FOUND","message":"gone"},"data":5}"#;
        assert!(serde_json::from_str::<Envelope<serde_json::Value>>(text).is_err());
    }

    #[test]
    fn decoding_rejects_success_without_data() {
        let text = r#"{"ok":true,"status":{"code":"OK","message":"ok"}}"#;
        assert!(serde_json::from_str::<Envelope<bool>>(text).is_err());
    }

    #[test]
    fn decoding_keeps_null_payload_on_success() {
        let text = r#"{"ok":true,"status":{"code":"OK","message":"ok"},"data":null}"#;
        let env: Envelope<serde_json::Value> = serde_json::from_str(text).expect("deserialize");
        assert_eq!(env.into_result().expect("ok"), serde_json::Value::Null);
    }

    #[test]
    fn decoding_accepts_failure_without_data() {
        let text = r#"{"ok":false,"status":{"code":"NOT_FOUND","message":"gone"}}"#;
        let env: Envelope<bool> = serde_json::from_str(text).expect("deserialize");
        assert_eq!(env.status().code(), StatusCode::NotFound);
        assert!(env.data().is_none());
    }

    #[test]
    fn status_display_includes_code_and_message() {
        let status = Status::new(StatusCode::NotFound, "node not found: node_7");
        assert_eq!(status.to_string(), "NOT_FOUND: node not found: node_7");
    }
}
