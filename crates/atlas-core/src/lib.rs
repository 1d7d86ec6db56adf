//! # atlas-core: Pure Business Logic for Atlas Back Office
//!
//! This crate is the **heart** of Atlas Back Office. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Atlas Back Office Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Catalog UI ──► Order UI ──► Payment UI ──► Dashboard UI     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Tauri IPC                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Tauri Commands                               │   │
//! │  │    search_variants, set_line_quantity, submit_order, etc.      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atlas-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ promotion │  │   │
//! │  │   │  Variant  │  │   Money   │  │  line     │  │ lifecycle │  │   │
//! │  │   │  statuses │  │  percent  │  │  totals   │  │  diffing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    atlas-api (REST Client)                      │   │
//! │  │           reqwest calls against the store backend               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Variant, statuses, discount offers)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Line pricing: discounts, totals, reconciliation
//! - [`promotion`] - Promotion lifecycle and condition-set diffing
//! - [`payment`] - Invoice payment math (change, remaining, status)
//! - [`session`] - Session context decoded once at login
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network and file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use atlas_core::money::Money;
//!
//! // Create money from whole units (never from floats!)
//! let price = Money::new(100_000);
//!
//! // A 10% discount using basis points
//! let discount = price.percentage(1_000);
//!
//! assert_eq!(discount.amount(), 10_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod promotion;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use atlas_core::Money` instead of
// `use atlas_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order under edit
///
/// ## Business Reason
/// Prevents runaway orders and keeps a single submission reviewable.
/// Can be made configurable per-store in future versions.
pub const MAX_ORDER_LINES: usize = 100;

/// Minimum trimmed length before an incremental search hits the backend
///
/// ## Business Reason
/// One-character queries return most of the catalog; the cached bulk
/// slice serves those instead.
pub const MIN_SEARCH_LEN: usize = 2;

/// Maximum length of a coupon code
pub const COUPON_CODE_MAX_LEN: usize = 20;

/// Days ahead of expiry at which a stock batch enters the warning list
pub const EXPIRY_WARNING_DAYS: i64 = 10;
