//! # API Error Types
//!
//! Error types for backend communication.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Transport failure (reqwest::Error)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (this module) ← Categorized: rejection / transport / decode  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CommandError (in Tauri app) ← Serialized for frontend                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend shows one notification per message                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rejection Bodies
//! The backend reports validation failures as a JSON object keyed by field:
//!
//! ```json
//! { "cus_phone": ["customer with this cus phone already exists."] }
//! ```
//!
//! [`parse_error_body`] flattens that into one message per entry so the
//! caller can surface each independently.

use thiserror::Error;

/// Errors from talking to the store backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the request (4xx/5xx with a parseable body).
    ///
    /// ## When This Occurs
    /// - Validation failure (`400` with per-field messages)
    /// - Missing resource (`404` with a `detail` message)
    /// - Backend bug (`500`)
    #[error("backend rejected the request ({status}): {}", messages.join("; "))]
    Rejected {
        status: u16,
        /// One entry per field/message pair, ready to surface individually.
        messages: Vec<String>,
    },

    /// The backend answered with a success status other than the one the
    /// operation expects (e.g. `200` where a create expects `201`).
    ///
    /// Treated as a soft failure: the caller logs a warning instead of
    /// assuming the write happened as specified.
    #[error("unexpected status {status} (expected {expected})")]
    UnexpectedStatus { status: u16, expected: u16 },

    /// No valid session: either no login happened, the backend answered
    /// `401`, or a token refresh failed.
    #[error("not authenticated")]
    Unauthorized,

    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    /// Creates a Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode(message.into())
    }

    /// Whether this error is a backend rejection with the given status.
    pub fn is_status(&self, status: u16) -> bool {
        matches!(self, ApiError::Rejected { status: s, .. } if *s == status)
    }

    /// The individual messages to surface, one notification each.
    ///
    /// Rejections carry their per-field messages; every other variant
    /// surfaces as a single generic message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Rejected { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Convert transport errors to ApiError.
///
/// ## Error Mapping
/// ```text
/// body decode failure      → ApiError::Decode
/// connect/timeout/DNS/TLS  → ApiError::Network
/// ```
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Parses a rejection body into an [`ApiError::Rejected`].
///
/// The backend emits `{ field: [messages...] }` objects for validation
/// failures and `{ "detail": "..." }` for lookup failures. Field messages
/// are prefixed with the field name; `detail` is surfaced bare. Anything
/// that is not a JSON object falls back to a single generic message.
///
/// Keys are walked in sorted order so the message list is deterministic.
pub fn parse_error_body(status: u16, body: &str) -> ApiError {
    let mut messages = Vec::new();

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
        for (key, value) in &map {
            match value {
                serde_json::Value::Array(entries) => {
                    for entry in entries {
                        messages.push(format_entry(key, entry));
                    }
                }
                other => messages.push(format_entry(key, other)),
            }
        }
    }

    if messages.is_empty() {
        messages.push(format!("request failed with status {status}"));
    }

    ApiError::Rejected { status, messages }
}

fn format_entry(key: &str, value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if key == "detail" {
        text
    } else {
        format!("{key}: {text}")
    }
}

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_messages_are_prefixed() {
        let err = parse_error_body(400, r#"{"cus_phone": ["This field is required."]}"#);
        match err {
            ApiError::Rejected { status, messages } => {
                assert_eq!(status, 400);
                assert_eq!(messages, vec!["cus_phone: This field is required."]);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_message_is_bare() {
        let err = parse_error_body(404, r#"{"detail": "No inventory found."}"#);
        assert_eq!(err.messages(), vec!["No inventory found."]);
        assert!(err.is_status(404));
    }

    #[test]
    fn test_multiple_fields_sorted_deterministically() {
        let body = r#"{"sup_phone": ["Ensure this field has no more than 11 characters."],
                       "contact_person": ["This field may not be blank."]}"#;
        let err = parse_error_body(400, body);
        // serde_json maps iterate in key order
        assert_eq!(
            err.messages(),
            vec![
                "contact_person: This field may not be blank.",
                "sup_phone: Ensure this field has no more than 11 characters.",
            ]
        );
    }

    #[test]
    fn test_multiple_messages_per_field() {
        let body = r#"{"code": ["This field is required.", "Ensure this field has no more than 20 characters."]}"#;
        let err = parse_error_body(400, body);
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_non_object_body_falls_back_to_generic() {
        let err = parse_error_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.messages(), vec!["request failed with status 502"]);
    }

    #[test]
    fn test_non_string_entry_is_rendered() {
        let err = parse_error_body(400, r#"{"qty": [0]}"#);
        assert_eq!(err.messages(), vec!["qty: 0"]);
    }

    #[test]
    fn test_rejection_display_joins_messages() {
        let err = parse_error_body(400, r#"{"a": ["x"], "b": ["y"]}"#);
        assert_eq!(
            err.to_string(),
            "backend rejected the request (400): a: x; b: y"
        );
    }

    #[test]
    fn test_non_rejection_messages_are_single() {
        assert_eq!(ApiError::Unauthorized.messages().len(), 1);
        assert_eq!(
            ApiError::network("connection refused").messages(),
            vec!["network error: connection refused"]
        );
    }
}
