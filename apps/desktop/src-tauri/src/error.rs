//! # Command Error Type
//!
//! Unified error type for Tauri commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Error Flow in Atlas Back Office                         │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  invoke('submit_order')                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, CommandError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Backend Error? ─── ApiError::Rejected { messages } ──┐         │  │
//! │  │         │                                             │         │  │
//! │  │         ▼                                             ▼         │  │
//! │  │  Gate Blocked? ─── CoreError::InsufficientStock ── CommandError │  │
//! │  │         │                                                   │   │  │
//! │  │         ▼                                                   ▼   │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await invoke('submit_order')                                         │
//! │  } catch (e) {                                                          │
//! │    // e.code = "VALIDATION_ERROR"                                       │
//! │    // e.messages = ["Select a customer", "Not enough stock for Cola"]   │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tauri Error Serialization
//! Tauri requires errors to be serializable. We implement `Serialize`
//! and include a machine-readable `code`, a joined `message`, and the
//! individual `messages` so the frontend can show one notification per
//! violation or per rejected field.

use atlas_api::ApiError;
use atlas_core::{CoreError, ValidationError};
use serde::Serialize;

/// Command error returned from Tauri commands.
///
/// ## Serialization
/// This is what the frontend receives when a command fails:
/// ```json
/// {
///   "code": "BACKEND_REJECTED",
///   "message": "cus_phone: This field may not be blank.",
///   "messages": ["cus_phone: This field may not be blank."]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable summary for a single notification
    pub message: String,

    /// One entry per violation or per rejected backend field
    pub messages: Vec<String>,
}

/// Error codes for command responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await invoke('submit_order');
/// } catch (e) {
///   switch (e.code) {
///     case 'VALIDATION_ERROR':
///       e.messages.forEach(showNotification);
///       break;
///     case 'NETWORK_ERROR':
///       showError('Could not reach the store backend');
///       break;
///     default:
///       showError(e.message);
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed before any request was sent
    ValidationError,

    /// Business rule violated (status transitions, pending lookups)
    BusinessLogic,

    /// Insufficient stock for a requested line
    InsufficientStock,

    /// Editor draft operation failed (unknown line key, line limit)
    EditorError,

    /// No session, or the session could not be refreshed
    Unauthorized,

    /// The signed-in role may not perform this operation
    Forbidden,

    /// The backend rejected the request (4xx with field messages)
    BackendRejected,

    /// The backend could not be reached
    NetworkError,

    /// Unexpected internal error
    Internal,
}

impl CommandError {
    /// Creates a new command error with a single message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        CommandError {
            code,
            messages: vec![message.clone()],
            message,
        }
    }

    /// Creates a command error carrying one entry per notification.
    pub fn with_messages(code: ErrorCode, messages: Vec<String>) -> Self {
        let message = if messages.is_empty() {
            "Request failed".to_string()
        } else {
            messages.join("; ")
        };
        CommandError {
            code,
            message,
            messages,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        CommandError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized() -> Self {
        CommandError::new(ErrorCode::Unauthorized, "Sign in to continue")
    }

    /// Creates a forbidden error naming the missing role.
    pub fn forbidden(action: &str) -> Self {
        CommandError::new(
            ErrorCode::Forbidden,
            format!("Your role may not {}", action),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Internal, message)
    }

    /// Bundles every submission blocker into one error, one message per
    /// violation, so the frontend can toast them all.
    pub fn submission_blocked(blockers: Vec<CoreError>) -> Self {
        let messages: Vec<String> = blockers
            .into_iter()
            .map(|blocker| CommandError::from(blocker).message)
            .collect();
        CommandError::with_messages(ErrorCode::ValidationError, messages)
    }
}

/// Converts REST client errors to command errors.
impl From<ApiError> for CommandError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { status, messages } => {
                let code = if status == 404 {
                    ErrorCode::NotFound
                } else {
                    ErrorCode::BackendRejected
                };
                CommandError::with_messages(code, messages)
            }
            ApiError::UnexpectedStatus { status, expected } => {
                tracing::warn!(status, expected, "unexpected backend status");
                CommandError::new(
                    ErrorCode::BackendRejected,
                    format!("Backend answered with status {}", status),
                )
            }
            ApiError::Unauthorized => CommandError::unauthorized(),
            ApiError::Network(detail) => {
                // Log the transport detail but return a generic message
                tracing::error!("Backend request failed: {}", detail);
                CommandError::new(
                    ErrorCode::NetworkError,
                    "Could not reach the store backend",
                )
            }
            ApiError::Decode(detail) => {
                tracing::error!("Backend response could not be decoded: {}", detail);
                CommandError::new(
                    ErrorCode::Internal,
                    "Backend answered with an unreadable response",
                )
            }
        }
    }
}

/// Converts core errors to command errors.
impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                variant_name,
                available,
                requested,
            } => CommandError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Not enough stock for {}: {} available, {} requested",
                    variant_name, available, requested
                ),
            ),
            CoreError::StockPending { variant_name } => CommandError::new(
                ErrorCode::BusinessLogic,
                format!("Stock for {} is still being checked", variant_name),
            ),
            CoreError::LineNotFound(key) => CommandError::new(
                ErrorCode::EditorError,
                format!("Line {} is no longer in the draft", key),
            ),
            CoreError::TooManyLines { max } => CommandError::new(
                ErrorCode::EditorError,
                format!("A draft cannot have more than {} lines", max),
            ),
            CoreError::PurchaseNotEditable { current_status } => CommandError::new(
                ErrorCode::BusinessLogic,
                format!(
                    "Only PENDING purchase orders can be edited (current status: {})",
                    current_status
                ),
            ),
            CoreError::InvalidTransition { from, to } => CommandError::new(
                ErrorCode::BusinessLogic,
                format!("A {} purchase order cannot become {}", from, to),
            ),
            CoreError::OrderNotEditable {
                order_id,
                current_status,
            } => CommandError::new(
                ErrorCode::BusinessLogic,
                format!(
                    "Order {} is in {} status and can no longer be edited",
                    order_id, current_status
                ),
            ),
            CoreError::Validation(e) => CommandError::validation(e.to_string()),
        }
    }
}

/// Converts field validation errors to command errors.
impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::validation(err.to_string())
    }
}

/// Makes CommandError work as a Tauri command error.
///
/// Tauri requires the error type to implement `Into<tauri::ipc::InvokeError>`.
/// Since we implement `Serialize`, we can convert to JSON string.
impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_blocked_keeps_one_message_per_violation() {
        let err = CommandError::submission_blocked(vec![
            CoreError::Validation(ValidationError::Required {
                field: "customer".to_string(),
            }),
            CoreError::InsufficientStock {
                variant_name: "Cola 330ml".to_string(),
                available: 2,
                requested: 5,
            },
        ]);

        assert!(matches!(err.code, ErrorCode::ValidationError));
        assert_eq!(err.messages.len(), 2);
        assert!(err.messages[1].contains("Cola 330ml"));
        assert!(err.message.contains("; "));
    }

    #[test]
    fn rejected_404_maps_to_not_found() {
        let err = CommandError::from(ApiError::Rejected {
            status: 404,
            messages: vec!["No PurchaseOrder matches the given query.".to_string()],
        });
        assert!(matches!(err.code, ErrorCode::NotFound));
    }

    #[test]
    fn rejected_400_carries_field_messages_individually() {
        let err = CommandError::from(ApiError::Rejected {
            status: 400,
            messages: vec![
                "cus_name: This field may not be blank.".to_string(),
                "cus_phone: This field may not be blank.".to_string(),
            ],
        });
        assert!(matches!(err.code, ErrorCode::BackendRejected));
        assert_eq!(err.messages.len(), 2);
    }

    #[test]
    fn network_failure_hides_transport_detail() {
        let err = CommandError::from(ApiError::network("connection refused (os error 111)"));
        assert!(matches!(err.code, ErrorCode::NetworkError));
        assert!(!err.message.contains("os error"));
    }
}
