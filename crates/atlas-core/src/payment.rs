//! # Invoice Payment Math
//!
//! Pure helpers behind the payment screen: change due, amount remaining,
//! and the settlement status preview.
//!
//! ## Payment Screen Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Payment Screen                                     │
//! │                                                                         │
//! │  Order total: 350.000₫                                                  │
//! │                                                                         │
//! │  Received: [ 400.000 ]   [+50k] [+100k] [+200k] [+500k] [Exact]        │
//! │                              │ additive      │                          │
//! │                              ▼               ▼                          │
//! │                   received += denom    received = total                 │
//! │                                                                         │
//! │  Change due: 50.000₫          ← change_due()                            │
//! │  Status preview: PAID         ← derive_status()                         │
//! │                                                                         │
//! │  [Submit] ──► POST /api/invoices/ { order, total_amount,               │
//! │                                     amount_received }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend owns the stored `payment_status` and `amount_change`
//! columns (both read-only on the wire); these helpers reproduce its rules
//! so the screen can show the outcome before submitting.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::PaymentStatus;

/// Cash denominations offered as one-tap additions to the received amount.
pub const QUICK_CASH_DENOMINATIONS: [i64; 4] = [50_000, 100_000, 200_000, 500_000];

// =============================================================================
// Settlement Functions
// =============================================================================

/// Derives the settlement status the backend will store.
///
/// ## Rules
/// - nothing received → `Unpaid`
/// - received covers the total → `Paid` (the order then completes)
/// - anything in between → `PartiallyPaid` (shortfall becomes customer debt)
pub fn derive_status(total: Money, received: Money) -> PaymentStatus {
    if !received.is_positive() {
        PaymentStatus::Unpaid
    } else if received >= total {
        PaymentStatus::Paid
    } else {
        PaymentStatus::PartiallyPaid
    }
}

/// Change handed back to the customer. Never negative.
pub fn change_due(total: Money, received: Money) -> Money {
    (received - total).saturating_non_negative()
}

/// Shortfall still owed on the invoice. Never negative.
pub fn amount_remaining(total: Money, received: Money) -> Money {
    (total - received).saturating_non_negative()
}

// =============================================================================
// Payment Preview
// =============================================================================

/// Everything the payment screen renders for a candidate received amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPreview {
    pub total: Money,
    pub received: Money,
    pub change: Money,
    pub remaining: Money,
    pub status: PaymentStatus,
}

/// Builds the full preview in one step.
///
/// ## Example
/// ```rust
/// use atlas_core::payment::preview;
/// use atlas_core::types::PaymentStatus;
/// use atlas_core::Money;
///
/// let p = preview(Money::new(350_000), Money::new(400_000));
/// assert_eq!(p.change.amount(), 50_000);
/// assert_eq!(p.status, PaymentStatus::Paid);
/// ```
pub fn preview(total: Money, received: Money) -> PaymentPreview {
    PaymentPreview {
        total,
        received,
        change: change_due(total, received),
        remaining: amount_remaining(total, received),
        status: derive_status(total, received),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_received_is_unpaid() {
        assert_eq!(
            derive_status(Money::new(350_000), Money::zero()),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_full_payment_is_paid() {
        assert_eq!(
            derive_status(Money::new(350_000), Money::new(350_000)),
            PaymentStatus::Paid
        );
        assert_eq!(
            derive_status(Money::new(350_000), Money::new(400_000)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_partial_payment_is_partially_paid() {
        assert_eq!(
            derive_status(Money::new(350_000), Money::new(200_000)),
            PaymentStatus::PartiallyPaid
        );
    }

    #[test]
    fn test_change_clamps_at_zero() {
        assert_eq!(change_due(Money::new(350_000), Money::new(400_000)).amount(), 50_000);
        assert_eq!(change_due(Money::new(350_000), Money::new(200_000)).amount(), 0);
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        assert_eq!(
            amount_remaining(Money::new(350_000), Money::new(200_000)).amount(),
            150_000
        );
        assert_eq!(amount_remaining(Money::new(350_000), Money::new(400_000)).amount(), 0);
    }

    #[test]
    fn test_preview_quick_cash_sequence() {
        // Customer taps +200k then +200k against a 350k order
        let total = Money::new(350_000);
        let mut received = Money::zero();
        received += Money::new(QUICK_CASH_DENOMINATIONS[2]);
        received += Money::new(QUICK_CASH_DENOMINATIONS[2]);

        let p = preview(total, received);
        assert_eq!(p.received.amount(), 400_000);
        assert_eq!(p.change.amount(), 50_000);
        assert_eq!(p.remaining.amount(), 0);
        assert_eq!(p.status, PaymentStatus::Paid);
    }
}
