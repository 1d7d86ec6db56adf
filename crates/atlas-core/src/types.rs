//! # Domain Types
//!
//! Core domain types used throughout Atlas Back Office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Variant      │   │ DiscountOffer   │   │ StockSnapshot   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  variant_id     │       │
//! │  │  name           │   │  value_type     │   │  balance        │       │
//! │  │  price          │   │  value          │   │                 │       │
//! │  │  cost_price     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderStatus    │   │ PurchaseStatus  │   │ PaymentStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Pending        │   │  Pending        │   │  Unpaid         │       │
//! │  │  Complete       │   │  Receive        │   │  Paid           │       │
//! │  │  Cancel         │   │  Canceled       │   │  PartiallyPaid  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Fidelity
//! Enum serde renames match the backend's stored strings exactly
//! (`PENDING`, `RECEIVE`, `PARTIALLY_PAID`, `FIX`, ...). Changing a rename
//! here breaks every request that carries the enum.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// The status of a sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order is open and may still be edited.
    Pending,
    /// Order has been invoiced and counts toward revenue.
    Complete,
    /// Order was cancelled.
    Cancel,
}

impl OrderStatus {
    /// Only pending orders accept line or customer changes.
    #[inline]
    pub const fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// The backend's stored string for this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Complete => "COMPLETE",
            OrderStatus::Cancel => "CANCEL",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Purchase Status
// =============================================================================

/// The status of a purchase order.
///
/// ## State Machine
/// ```text
///            ┌──────────► Receive   (stock enters inventory)
///   Pending ─┤
///            └──────────► Canceled
///
///   Receive and Canceled are terminal.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    /// Purchase is open: lines may be edited, status may advance.
    Pending,
    /// Goods arrived; the backend created inventory batches.
    Receive,
    /// Purchase was abandoned before goods arrived.
    Canceled,
}

impl PurchaseStatus {
    /// Whether this status permits line edits.
    #[inline]
    pub const fn is_editable(&self) -> bool {
        matches!(self, PurchaseStatus::Pending)
    }

    /// Whether no further transitions are possible.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !self.is_editable()
    }

    /// Validates a status transition.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_core::types::PurchaseStatus;
    ///
    /// assert!(PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Receive));
    /// assert!(!PurchaseStatus::Receive.can_transition_to(PurchaseStatus::Pending));
    /// ```
    pub const fn can_transition_to(&self, target: PurchaseStatus) -> bool {
        matches!(
            (self, target),
            (PurchaseStatus::Pending, PurchaseStatus::Receive)
                | (PurchaseStatus::Pending, PurchaseStatus::Canceled)
        )
    }

    /// The backend's stored string for this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "PENDING",
            PurchaseStatus::Receive => "RECEIVE",
            PurchaseStatus::Canceled => "CANCELED",
        }
    }
}

impl Default for PurchaseStatus {
    fn default() -> Self {
        PurchaseStatus::Pending
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// How much of an invoice has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing received.
    Unpaid,
    /// Received covers the full total.
    Paid,
    /// Something received, but less than the total (customer debt).
    PartiallyPaid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Bank transfer.
    Transfer,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Promotion Value Type
// =============================================================================

/// How a promotion's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionValueType {
    /// `value` is a flat amount taken off the line once.
    Fix,
    /// `value` is a whole percent (10 = 10%) of quantity × unit price.
    Percentage,
}

// =============================================================================
// Discount Kind
// =============================================================================

/// The two promotion families the backend stores in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Price reduction (flat or percentage).
    Discount,
    /// Buy X of a product, get Y of another as a gift.
    BuyXGetY,
}

// =============================================================================
// Variant
// =============================================================================

/// A sellable product variant.
///
/// This is the snapshot the editors carry: enough to price a line and
/// name it in error messages. The full catalog rows live in the API layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    /// Backend primary key.
    pub id: i64,

    /// Display name shown in line pickers and stock errors.
    pub name: String,

    /// Selling price in whole currency units.
    pub price: i64,

    /// Cost price in whole currency units (purchase lines use this).
    pub cost_price: i64,
}

impl Variant {
    /// Returns the selling price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.price)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::new(self.cost_price)
    }
}

// =============================================================================
// Discount Offer
// =============================================================================

/// A discount applicable to a specific variant.
///
/// `value` follows the backend's integer column: whole percents for
/// [`PromotionValueType::Percentage`], a flat amount for
/// [`PromotionValueType::Fix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountOffer {
    pub id: i64,
    pub value_type: PromotionValueType,
    pub value: i64,
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// The most recent known stock balance for a variant.
///
/// A fresh snapshot SUPERSEDES the previous one; balances are never
/// merged or accumulated client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockSnapshot {
    pub variant_id: i64,
    pub balance: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_editable() {
        assert!(OrderStatus::Pending.is_editable());
        assert!(!OrderStatus::Complete.is_editable());
        assert!(!OrderStatus::Cancel.is_editable());
    }

    #[test]
    fn test_purchase_transitions() {
        assert!(PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Receive));
        assert!(PurchaseStatus::Pending.can_transition_to(PurchaseStatus::Canceled));
        assert!(!PurchaseStatus::Receive.can_transition_to(PurchaseStatus::Pending));
        assert!(!PurchaseStatus::Receive.can_transition_to(PurchaseStatus::Canceled));
        assert!(!PurchaseStatus::Canceled.can_transition_to(PurchaseStatus::Receive));
    }

    #[test]
    fn test_purchase_terminal() {
        assert!(!PurchaseStatus::Pending.is_terminal());
        assert!(PurchaseStatus::Receive.is_terminal());
        assert!(PurchaseStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_wire_strings_match_backend() {
        // The backend stores these exact strings; serde renames must not drift
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"PENDING\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Cancel).unwrap(), "\"CANCEL\"");
        assert_eq!(serde_json::to_string(&PurchaseStatus::Receive).unwrap(), "\"RECEIVE\"");
        assert_eq!(serde_json::to_string(&PurchaseStatus::Canceled).unwrap(), "\"CANCELED\"");
        assert_eq!(
            serde_json::to_string(&PaymentStatus::PartiallyPaid).unwrap(),
            "\"PARTIALLY_PAID\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"CASH\"");
        assert_eq!(serde_json::to_string(&PromotionValueType::Fix).unwrap(), "\"FIX\"");
        assert_eq!(
            serde_json::to_string(&PromotionValueType::Percentage).unwrap(),
            "\"PERCENTAGE\""
        );
        assert_eq!(
            serde_json::to_string(&DiscountKind::BuyXGetY).unwrap(),
            "\"BUY_X_GET_Y\""
        );
    }

    #[test]
    fn test_wire_strings_parse_back() {
        let status: OrderStatus = serde_json::from_str("\"COMPLETE\"").unwrap();
        assert_eq!(status, OrderStatus::Complete);
        let method: PaymentMethod = serde_json::from_str("\"TRANSFER\"").unwrap();
        assert_eq!(method, PaymentMethod::Transfer);
    }

    #[test]
    fn test_variant_money_accessors() {
        let variant = Variant {
            id: 7,
            name: "Espresso Beans 1kg".into(),
            price: 100_000,
            cost_price: 60_000,
        };
        assert_eq!(variant.price().amount(), 100_000);
        assert_eq!(variant.cost_price().amount(), 60_000);
    }
}
