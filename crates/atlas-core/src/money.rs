//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    100000 × 3 × 10% = 30000.000000000004  → Phantom fractions!          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Units                                            │
//! │    The store currency (VND) has no minor unit, so every amount is a    │
//! │    whole i64. Percentages go through basis points, never floats.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use atlas_core::money::Money;
//!
//! // Create from whole units (preferred)
//! let price = Money::new(100_000);
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::new(50_000);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(99999.9); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole currency units (VND).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Variant.price ──┬──► OrderLine.unit_price ──► OrderLine.line_total    │
/// │                  │                                                      │
/// │                  └──► Displayed as "100.000₫" in UI                     │
/// │                                                                         │
/// │  Line totals ──► Grand Total ──► Invoice.total_amount ──► Change due   │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_core::money::Money;
    ///
    /// let price = Money::new(100_000);
    /// assert_eq!(price.amount(), 100_000);
    /// ```
    ///
    /// ## Why Whole Units?
    /// The store currency has no fractional coin. The backend, calculations,
    /// and API all exchange whole integers. Only the UI adds digit grouping.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert_eq!(zero.amount(), 0);
    /// assert!(zero.is_zero());
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// Discounts can exceed a line's worth; the line then settles at zero
    /// rather than crediting the customer.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_core::money::Money;
    ///
    /// let overshoot = Money::new(80_000) - Money::new(100_000);
    /// assert_eq!(overshoot.saturating_non_negative().amount(), 0);
    /// ```
    #[inline]
    pub const fn saturating_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Takes a percentage of this amount, expressed in basis points.
    ///
    /// ## Arguments
    /// * `bps` - Basis points (1000 = 10%)
    ///
    /// ## Implementation
    /// Integer math with round-half-up: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5). i128 widening
    /// prevents overflow on large order totals.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_core::money::Money;
    ///
    /// let line = Money::new(300_000);
    /// let discount = line.percentage(1_000); // 10%
    /// assert_eq!(discount.amount(), 30_000);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Line: 3 × 100.000₫ = 300.000₫
    ///      │
    ///      ▼
    /// percentage(1000) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Discount: 30.000₫ → Line Total: 270.000₫
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::new(part as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use atlas_core::money::Money;
    ///
    /// let unit_price = Money::new(100_000);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.amount(), 300_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle digit grouping properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}₫", self.0)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over an iterator of Money values (for grand totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_amount() {
        let money = Money::new(100_000);
        assert_eq!(money.amount(), 100_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(100_000)), "100000₫");
        assert_eq!(format!("{}", Money::new(-550)), "-550₫");
        assert_eq!(format!("{}", Money::new(0)), "0₫");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(500);

        assert_eq!((a + b).amount(), 1500);
        assert_eq!((a - b).amount(), 500);
        let result: Money = a * 3;
        assert_eq!(result.amount(), 3000);
    }

    #[test]
    fn test_percentage_basic() {
        // 300000 at 10% = 30000
        let amount = Money::new(300_000);
        assert_eq!(amount.percentage(1_000).amount(), 30_000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 125 at 5% = 6.25 → 6; 150 at 5% = 7.5 → 8
        assert_eq!(Money::new(125).percentage(500).amount(), 6);
        assert_eq!(Money::new(150).percentage(500).amount(), 8);
    }

    #[test]
    fn test_percentage_large_amount_no_overflow() {
        // A billion-unit order times 10000 bps would overflow i64 without
        // the i128 widening
        let amount = Money::new(1_000_000_000_000);
        assert_eq!(amount.percentage(10_000).amount(), 1_000_000_000_000);
    }

    #[test]
    fn test_saturating_non_negative() {
        assert_eq!(Money::new(-20_000).saturating_non_negative().amount(), 0);
        assert_eq!(Money::new(0).saturating_non_negative().amount(), 0);
        assert_eq!(Money::new(42).saturating_non_negative().amount(), 42);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::new(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::new(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::new(50_000);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.amount(), 100_000);
    }

    #[test]
    fn test_sum() {
        let lines = vec![Money::new(270_000), Money::new(80_000)];
        let grand: Money = lines.into_iter().sum();
        assert_eq!(grand.amount(), 350_000);
    }
}
