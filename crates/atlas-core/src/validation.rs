//! # Validation Module
//!
//! Input validation utilities for Atlas Back Office.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Tauri Command (Rust)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend (DRF)                                                │
//! │  ├── Serializer field validation                                       │
//! │  ├── UNIQUE constraints (phone, coupon code)                           │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Checking here keeps a doomed request off the wire                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use atlas_core::validation::{validate_coupon_code, validate_quantity};
//!
//! // Validate before building the request payload
//! validate_coupon_code("SUMMER25").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::COUPON_CODE_MAX_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a coupon code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters (backend column width)
///
/// ## Example
/// ```rust
/// use atlas_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("SUMMER25").is_ok());
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code(&"X".repeat(30)).is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > COUPON_CODE_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: COUPON_CODE_MAX_LEN,
        });
    }

    Ok(())
}

/// Validates a display name (product, discount, customer, supplier).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters (backend column width)
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits only
/// - At most 10 digits (backend column width)
///
/// ## Example
/// ```rust
/// use atlas_core::validation::validate_phone;
///
/// assert!(validate_phone("0912345678").is_ok());
/// assert!(validate_phone("091-234").is_err());
/// assert!(validate_phone("09123456789").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > 10 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 10,
        });
    }

    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order line: set quantity                                               │
/// │                                                                         │
/// │  User enters quantity: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       └── OK → Proceed with set_line_quantity                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price or amount in whole currency units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, gift lines)
///
/// ## Example
/// ```rust
/// use atlas_core::validation::validate_price;
///
/// assert!(validate_price(100_000).is_ok());
/// assert!(validate_price(0).is_ok());
/// assert!(validate_price(-100).is_err());
/// ```
pub fn validate_price(amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage discount value in whole percents.
///
/// ## Rules
/// - Must be between 0 and 100
pub fn validate_percentage(value: i64) -> ValidationResult<()> {
    if !(0..=100).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "promotion value".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a usage limit.
///
/// ## Rules
/// - `None` means unlimited and is always valid
/// - A set limit must be non-negative (zero means depleted, still storable)
pub fn validate_usage_limit(limit: Option<i64>) -> ValidationResult<()> {
    if let Some(limit) = limit {
        if limit < 0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "usage limit".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a promotion date window.
///
/// ## Rules
/// - Either bound may be absent (open-ended window)
/// - When both are set, the end must not precede the start
///
/// ## Example
/// ```rust
/// use atlas_core::validation::validate_date_window;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 6, 1);
/// let end = NaiveDate::from_ymd_opt(2025, 6, 30);
/// assert!(validate_date_window(start, end).is_ok());
/// assert!(validate_date_window(end, start).is_err());
/// ```
pub fn validate_date_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::InvertedDateWindow {
                field: "promotion window".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("SUMMER25").is_ok());
        assert!(validate_coupon_code("  SUMMER25  ").is_ok());

        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("   ").is_err());
        assert!(validate_coupon_code(&"X".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("discount name", "Summer Sale").is_ok());
        assert!(validate_name("discount name", "").is_err());
        assert!(validate_name("discount name", &"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("091234").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("091-234-56").is_err());
        assert!(validate_phone("09123456789").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(100_000).is_ok());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(0).is_ok());
        assert!(validate_percentage(100).is_ok());

        assert!(validate_percentage(-1).is_err());
        assert!(validate_percentage(101).is_err());
    }

    #[test]
    fn test_validate_usage_limit() {
        assert!(validate_usage_limit(None).is_ok());
        assert!(validate_usage_limit(Some(0)).is_ok());
        assert!(validate_usage_limit(Some(50)).is_ok());
        assert!(validate_usage_limit(Some(-1)).is_err());
    }

    #[test]
    fn test_validate_date_window() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1);
        let end = NaiveDate::from_ymd_opt(2025, 6, 30);

        assert!(validate_date_window(start, end).is_ok());
        assert!(validate_date_window(start, start).is_ok());
        assert!(validate_date_window(None, end).is_ok());
        assert!(validate_date_window(start, None).is_ok());
        assert!(validate_date_window(None, None).is_ok());

        assert!(validate_date_window(end, start).is_err());
    }
}
