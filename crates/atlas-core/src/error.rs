//! # Error Types
//!
//! Domain-specific error types for atlas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  atlas-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  atlas-api errors (separate crate)                                     │
//! │  └── ApiError         - HTTP and backend rejection failures            │
//! │                                                                         │
//! │  Tauri command errors (in app)                                         │
//! │  └── CommandError     - What frontend sees (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CommandError → Frontend           │
//! │                           ApiError ─┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (variant name, status, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to cover an order line.
    ///
    /// ## When This Occurs
    /// - A line's quantity exceeds the freshest stock snapshot
    ///
    /// ## User Workflow
    /// ```text
    /// Set quantity: 3
    ///      │
    ///      ▼
    /// Snapshot says: balance=2
    ///      │
    ///      ▼
    /// InsufficientStock { variant_name: "Espresso Beans", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for Espresso Beans"
    /// ```
    #[error("Insufficient stock for {variant_name}: available {available}, requested {requested}")]
    InsufficientStock {
        variant_name: String,
        available: i64,
        requested: i64,
    },

    /// A line's stock lookup has not returned yet.
    ///
    /// Submission is blocked until every line has a settled snapshot.
    #[error("Stock lookup still pending for {variant_name}")]
    StockPending { variant_name: String },

    /// A keyed line does not exist in the editor.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Order has exceeded maximum allowed lines.
    #[error("Order cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Purchase is not in a state that allows line edits.
    ///
    /// ## When This Occurs
    /// - Editing lines on a received purchase
    /// - Editing lines on a cancelled purchase
    #[error("Purchase is {current_status:?}, lines can no longer change")]
    PurchaseNotEditable { current_status: String },

    /// Requested status transition is not allowed.
    ///
    /// ## When This Occurs
    /// - Receiving an already-received purchase
    /// - Reopening a cancelled purchase
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Order is not in a state that allows the requested operation.
    #[error("Order {order_id} is {current_status:?}, cannot perform operation")]
    OrderNotEditable {
        order_id: i64,
        current_status: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid date, invalid phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date window whose end precedes its start.
    #[error("{field}: end date must not precede start date")]
    InvertedDateWindow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            variant_name: "Espresso Beans 1kg".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Espresso Beans 1kg: available 2, requested 3"
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidTransition {
            from: "RECEIVE".to_string(),
            to: "PENDING".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot transition from RECEIVE to PENDING");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "supplier".to_string(),
        };
        assert_eq!(err.to_string(), "supplier is required");

        let err = ValidationError::TooLong {
            field: "code".to_string(),
            max: 20,
        };
        assert_eq!(err.to_string(), "code must be at most 20 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
