//! # Line Pricing Engine
//!
//! Pure pricing math for order lines: discount application, line totals,
//! and reconciliation of a selected discount against a fresh offer list.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Line Pricing Pipeline                               │
//! │                                                                         │
//! │  unit_price ──┬──► quantity × unit_price ──► gross                     │
//! │               │                                │                        │
//! │  offer ───────┴──► discount_amount ────────────┤                        │
//! │                    (percentage or flat)        ▼                        │
//! │                                        max(0, gross − discount)        │
//! │                                                │                        │
//! │                                                ▼                        │
//! │  line totals ──────────────────────────► grand_total (Σ)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - A percentage offer takes `value`% of quantity × unit price.
//! - A flat (`FIX`) offer takes `value` off the line ONCE, regardless of
//!   quantity. That mirrors how the backend redeems it.
//! - A discount only applies when the line has a variant, a positive price,
//!   and a positive quantity.
//! - A line never goes negative: totals clamp at zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DiscountOffer, PromotionValueType};

// =============================================================================
// Line Pricing Result
// =============================================================================

/// The two derived amounts a priced line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePricing {
    /// Amount taken off the line by the applied offer (zero if none).
    pub discount_amount: Money,
    /// Final line total after the discount, clamped at zero.
    pub line_total: Money,
}

// =============================================================================
// Pricing Functions
// =============================================================================

/// Computes the discount an offer takes off a line.
///
/// Returns zero when there is no offer, or when the line cannot carry a
/// discount (non-positive price or quantity).
///
/// ## Example
/// ```rust
/// use atlas_core::pricing::discount_amount;
/// use atlas_core::types::{DiscountOffer, PromotionValueType};
/// use atlas_core::Money;
///
/// let ten_percent = DiscountOffer {
///     id: 1,
///     value_type: PromotionValueType::Percentage,
///     value: 10,
/// };
/// let off = discount_amount(Money::new(100_000), 3, Some(&ten_percent));
/// assert_eq!(off.amount(), 30_000);
/// ```
pub fn discount_amount(unit_price: Money, quantity: i64, offer: Option<&DiscountOffer>) -> Money {
    let Some(offer) = offer else {
        return Money::zero();
    };

    if !unit_price.is_positive() || quantity <= 0 {
        return Money::zero();
    }

    match offer.value_type {
        PromotionValueType::Percentage => {
            // Whole percents on the wire; 10 → 1000 bps
            let bps = offer.value.clamp(0, 100) as u32 * 100;
            unit_price.multiply_quantity(quantity).percentage(bps)
        }
        // Flat value, taken once per line
        PromotionValueType::Fix => Money::new(offer.value.max(0)),
    }
}

/// Computes a line total from its parts, clamping at zero.
///
/// ## Example
/// ```rust
/// use atlas_core::pricing::line_total;
/// use atlas_core::Money;
///
/// let total = line_total(Money::new(50_000), 2, Money::new(20_000));
/// assert_eq!(total.amount(), 80_000);
/// ```
pub fn line_total(unit_price: Money, quantity: i64, discount: Money) -> Money {
    (unit_price.multiply_quantity(quantity) - discount).saturating_non_negative()
}

/// Prices a line in one step: discount plus clamped total.
///
/// ## User Workflow
/// ```text
/// Line: 3 × 100.000₫, 10% offer selected
///      │
///      ▼
/// price_line(...) ← THIS FUNCTION
///      │
///      ▼
/// LinePricing { discount_amount: 30.000₫, line_total: 270.000₫ }
/// ```
pub fn price_line(unit_price: Money, quantity: i64, offer: Option<&DiscountOffer>) -> LinePricing {
    let discount = discount_amount(unit_price, quantity, offer);
    LinePricing {
        discount_amount: discount,
        line_total: line_total(unit_price, quantity, discount),
    }
}

/// Sums line totals into an order's grand total.
pub fn grand_total<I>(line_totals: I) -> Money
where
    I: IntoIterator<Item = Money>,
{
    line_totals.into_iter().sum()
}

/// Reconciles a selected discount against a fresh offer list.
///
/// A selection only survives if the fresh list still contains it; anything
/// else clears to `None`. Running this twice over the same list changes
/// nothing.
///
/// ## Why
/// Offers are re-fetched whenever the line's variant changes, and the
/// previously selected offer may not exist for the new variant. A stale
/// `applied_discount_id` would price the line with an offer the backend
/// will refuse to redeem.
pub fn reconcile_discount(applied: Option<i64>, offers: &[DiscountOffer]) -> Option<i64> {
    applied.filter(|id| offers.iter().any(|o| o.id == *id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage(id: i64, value: i64) -> DiscountOffer {
        DiscountOffer {
            id,
            value_type: PromotionValueType::Percentage,
            value,
        }
    }

    fn fixed(id: i64, value: i64) -> DiscountOffer {
        DiscountOffer {
            id,
            value_type: PromotionValueType::Fix,
            value,
        }
    }

    #[test]
    fn test_percentage_discount_scales_with_quantity() {
        // 3 × 100000 at 10% → 30000 off, 270000 line total
        let pricing = price_line(Money::new(100_000), 3, Some(&percentage(1, 10)));
        assert_eq!(pricing.discount_amount.amount(), 30_000);
        assert_eq!(pricing.line_total.amount(), 270_000);
    }

    #[test]
    fn test_fixed_discount_applies_once_per_line() {
        // 2 × 50000 with a flat 20000 → 80000 line total
        let pricing = price_line(Money::new(50_000), 2, Some(&fixed(2, 20_000)));
        assert_eq!(pricing.discount_amount.amount(), 20_000);
        assert_eq!(pricing.line_total.amount(), 80_000);

        // Quantity does not scale a flat offer
        let pricing = price_line(Money::new(50_000), 5, Some(&fixed(2, 20_000)));
        assert_eq!(pricing.discount_amount.amount(), 20_000);
        assert_eq!(pricing.line_total.amount(), 230_000);
    }

    #[test]
    fn test_grand_total_over_mixed_lines() {
        let a = price_line(Money::new(100_000), 3, Some(&percentage(1, 10)));
        let b = price_line(Money::new(50_000), 2, Some(&fixed(2, 20_000)));
        let grand = grand_total([a.line_total, b.line_total]);
        assert_eq!(grand.amount(), 350_000);
    }

    #[test]
    fn test_no_offer_means_no_discount() {
        let pricing = price_line(Money::new(100_000), 2, None);
        assert_eq!(pricing.discount_amount.amount(), 0);
        assert_eq!(pricing.line_total.amount(), 200_000);
    }

    #[test]
    fn test_discount_needs_positive_price_and_quantity() {
        let offer = percentage(1, 10);
        assert_eq!(discount_amount(Money::zero(), 3, Some(&offer)).amount(), 0);
        assert_eq!(discount_amount(Money::new(100_000), 0, Some(&offer)).amount(), 0);
        assert_eq!(discount_amount(Money::new(100_000), -1, Some(&offer)).amount(), 0);
    }

    #[test]
    fn test_line_total_clamps_at_zero() {
        // Flat 100000 off a 60000 line settles at zero, not -40000
        let pricing = price_line(Money::new(30_000), 2, Some(&fixed(3, 100_000)));
        assert_eq!(pricing.line_total.amount(), 0);
    }

    #[test]
    fn test_full_percentage_zeroes_the_line() {
        let pricing = price_line(Money::new(100_000), 2, Some(&percentage(1, 100)));
        assert_eq!(pricing.discount_amount.amount(), 200_000);
        assert_eq!(pricing.line_total.amount(), 0);
    }

    #[test]
    fn test_reconcile_keeps_offer_still_listed() {
        let offers = vec![percentage(1, 10), fixed(2, 20_000)];
        assert_eq!(reconcile_discount(Some(2), &offers), Some(2));
    }

    #[test]
    fn test_reconcile_clears_missing_offer() {
        let offers = vec![percentage(1, 10)];
        assert_eq!(reconcile_discount(Some(99), &offers), None);
        assert_eq!(reconcile_discount(Some(99), &[]), None);
        assert_eq!(reconcile_discount(None, &offers), None);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let offers = vec![percentage(1, 10)];
        let once = reconcile_discount(Some(1), &offers);
        let twice = reconcile_discount(once, &offers);
        assert_eq!(once, twice);
    }
}
