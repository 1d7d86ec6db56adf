//! # Promotion Lifecycle and Condition Diffing
//!
//! Derived state for discounts and coupons, plus the change-set computation
//! that turns an edited condition list into the requests the backend needs.
//!
//! ## Lifecycle Derivation
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │              promotion_state(start, end, limit, today)           │
//! │                                                                  │
//! │  usage_limit == Some(0) ──────────────────────────► DEPLETED     │
//! │  today < start (when start is set) ───────────────► SCHEDULED    │
//! │  today > end   (when end is set) ─────────────────► EXPIRED      │
//! │  otherwise ───────────────────────────────────────► ACTIVE       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checks run in that order: an exhausted promotion reports DEPLETED
//! even when its date window has also passed. A `None` date or limit skips
//! its check entirely, so an open-ended promotion stays ACTIVE.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Lifecycle State
// =============================================================================

/// Client-derived state of a discount or coupon.
///
/// The backend stores only the raw window and usage limit; what a row means
/// *today* is derived here, once, and rendered as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PromotionState {
    /// Start date is in the future.
    Scheduled,
    /// Inside the window (or the window is open-ended) with uses left.
    Active,
    /// End date has passed.
    Expired,
    /// Usage limit has reached zero.
    Depleted,
}

impl PromotionState {
    /// Whether the promotion can be applied to an order right now.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, PromotionState::Active)
    }
}

/// Derives a promotion's state from its window and remaining uses.
///
/// ## Example
/// ```rust
/// use atlas_core::promotion::{promotion_state, PromotionState};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
///
/// let state = promotion_state(Some(start), Some(end), Some(40), today);
/// assert_eq!(state, PromotionState::Active);
/// ```
pub fn promotion_state(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    usage_limit: Option<i64>,
    today: NaiveDate,
) -> PromotionState {
    if usage_limit == Some(0) {
        return PromotionState::Depleted;
    }
    if let Some(start) = start {
        if today < start {
            return PromotionState::Scheduled;
        }
    }
    if let Some(end) = end {
        if today > end {
            return PromotionState::Expired;
        }
    }
    PromotionState::Active
}

/// Extracts the calendar date from a backend date string.
///
/// The backend emits promotion windows as datetimes (`2025-06-01T00:00:00Z`)
/// but compares them at day granularity when redeeming, so only the
/// `YYYY-MM-DD` prefix matters here. Plain date strings parse as-is.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

// =============================================================================
// Condition Rows
// =============================================================================

/// One editable condition row of a discount.
///
/// Rows loaded from the backend carry their `id` and parent `discount`;
/// rows the user just added carry neither. Empty inputs stay `None` so a
/// row the user never touched can be told apart from one holding zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionRow {
    pub id: Option<i64>,
    pub min_purchase_qty: Option<i64>,
    pub min_purchase_amount: Option<i64>,
    pub discount: Option<i64>,
}

impl ConditionRow {
    /// A row with no content at all. Blank rows are UI scaffolding and are
    /// dropped before diffing.
    pub fn is_blank(&self) -> bool {
        self.min_purchase_qty.is_none()
            && self.min_purchase_amount.is_none()
            && self.discount.is_none()
    }

    /// The comparable shape of a row: absent thresholds read as zero and a
    /// zero parent id reads as absent, matching how the backend round-trips
    /// defaults.
    fn normalized(&self) -> (i64, i64, Option<i64>) {
        (
            self.min_purchase_qty.unwrap_or(0),
            self.min_purchase_amount.unwrap_or(0),
            self.discount.filter(|id| *id != 0),
        )
    }
}

/// Wire payload for creating or updating one condition.
///
/// `discount` always names the parent: the backend attaches a condition to
/// its discount through this field and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionPayload {
    pub min_purchase_qty: i64,
    pub min_purchase_amount: i64,
    pub discount: Option<i64>,
}

/// The three request groups an edited condition list fans out into.
///
/// Each group maps to its own endpoint; the requests are independent and a
/// failure in one does not roll back the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionChanges {
    /// Rows without an id: POST.
    pub create: Vec<ConditionPayload>,
    /// Rows whose content changed, keyed by condition id: PUT.
    pub update: Vec<(i64, ConditionPayload)>,
    /// Ids present initially but gone from the edited list: DELETE.
    pub delete: Vec<i64>,
}

impl ConditionChanges {
    /// True when saving the discount needs no condition requests at all.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Diffs an edited condition list against the list as it was loaded.
///
/// Blank rows are dropped first. A surviving row without an id becomes a
/// create; a row with an id becomes an update only when its normalized
/// content differs from the loaded row; loaded ids missing from the edited
/// list become deletes. An unchanged row produces no request.
///
/// `discount_id` is stamped onto every outgoing payload so new rows attach
/// to their parent.
///
/// ## User Workflow
/// ```text
/// Loaded:  [#7 (qty 2, 100.000₫)]  [#9 (qty 5, 300.000₫)]
/// Edited:  [#7 (qty 3, 100.000₫)]  [new (qty 1, 50.000₫)]  [blank]
///      │
///      ▼
/// diff_conditions(...) ← THIS FUNCTION
///      │
///      ▼
/// update: [(7, qty 3)]   create: [(qty 1)]   delete: [9]
/// ```
pub fn diff_conditions(
    initial: &[ConditionRow],
    edited: &[ConditionRow],
    discount_id: i64,
) -> ConditionChanges {
    let active: Vec<&ConditionRow> = edited.iter().filter(|row| !row.is_blank()).collect();

    let mut changes = ConditionChanges::default();

    for row in &active {
        let (min_purchase_qty, min_purchase_amount, _) = row.normalized();
        let payload = ConditionPayload {
            min_purchase_qty,
            min_purchase_amount,
            discount: Some(discount_id),
        };

        match row.id {
            Some(id) => {
                let loaded = initial.iter().find(|init| init.id == Some(id));
                let changed = match loaded {
                    Some(loaded) => loaded.normalized() != row.normalized(),
                    // An id the loaded list never had counts as changed
                    None => true,
                };
                if changed {
                    changes.update.push((id, payload));
                }
            }
            None => changes.create.push(payload),
        }
    }

    let kept: Vec<i64> = active.iter().filter_map(|row| row.id).collect();
    for loaded in initial {
        if let Some(id) = loaded.id {
            if !kept.contains(&id) {
                changes.delete.push(id);
            }
        }
    }

    changes
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loaded(id: i64, qty: i64, amount: i64, discount: i64) -> ConditionRow {
        ConditionRow {
            id: Some(id),
            min_purchase_qty: Some(qty),
            min_purchase_amount: Some(amount),
            discount: Some(discount),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    #[test]
    fn test_active_inside_window() {
        let state = promotion_state(
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
            Some(10),
            date(2025, 6, 15),
        );
        assert_eq!(state, PromotionState::Active);
        assert!(state.is_active());
    }

    #[test]
    fn test_scheduled_before_start() {
        let state = promotion_state(
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
            Some(10),
            date(2025, 5, 20),
        );
        assert_eq!(state, PromotionState::Scheduled);
    }

    #[test]
    fn test_expired_after_end() {
        let state = promotion_state(
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
            Some(10),
            date(2025, 7, 1),
        );
        assert_eq!(state, PromotionState::Expired);
    }

    #[test]
    fn test_depleted_wins_over_expired() {
        // Out of uses AND past the window reports DEPLETED
        let state = promotion_state(
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 30)),
            Some(0),
            date(2025, 7, 15),
        );
        assert_eq!(state, PromotionState::Depleted);
    }

    #[test]
    fn test_unlimited_usage_never_depletes() {
        let state = promotion_state(None, None, None, date(2025, 7, 15));
        assert_eq!(state, PromotionState::Active);
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let start = Some(date(2025, 6, 1));
        let end = Some(date(2025, 6, 30));
        assert_eq!(
            promotion_state(start, end, Some(5), date(2025, 6, 1)),
            PromotionState::Active
        );
        assert_eq!(
            promotion_state(start, end, Some(5), date(2025, 6, 30)),
            PromotionState::Active
        );
    }

    #[test]
    fn test_missing_start_skips_scheduled_check() {
        let state = promotion_state(None, Some(date(2025, 6, 30)), Some(5), date(2025, 1, 1));
        assert_eq!(state, PromotionState::Active);
    }

    #[test]
    fn test_parse_wire_date_accepts_datetime_and_date() {
        assert_eq!(
            parse_wire_date("2025-06-01T00:00:00Z"),
            Some(date(2025, 6, 1))
        );
        assert_eq!(parse_wire_date("2025-06-01"), Some(date(2025, 6, 1)));
        assert_eq!(parse_wire_date("not a date"), None);
        assert_eq!(parse_wire_date(""), None);
    }

    // ------------------------------------------------------------------
    // Condition diffing
    // ------------------------------------------------------------------

    #[test]
    fn test_blank_rows_produce_no_requests() {
        let blank = ConditionRow {
            id: None,
            min_purchase_qty: None,
            min_purchase_amount: None,
            discount: None,
        };
        let changes = diff_conditions(&[], &[blank], 3);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_unchanged_row_produces_no_request() {
        let initial = [loaded(7, 2, 100_000, 3)];
        let changes = diff_conditions(&initial, &initial, 3);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_changed_row_becomes_update() {
        let initial = [loaded(7, 2, 100_000, 3)];
        let edited = [loaded(7, 3, 100_000, 3)];

        let changes = diff_conditions(&initial, &edited, 3);
        assert_eq!(changes.create, vec![]);
        assert_eq!(changes.delete, Vec::<i64>::new());
        assert_eq!(
            changes.update,
            vec![(
                7,
                ConditionPayload {
                    min_purchase_qty: 3,
                    min_purchase_amount: 100_000,
                    discount: Some(3),
                }
            )]
        );
    }

    #[test]
    fn test_new_row_becomes_create_with_parent_attached() {
        let new_row = ConditionRow {
            id: None,
            min_purchase_qty: Some(1),
            min_purchase_amount: Some(50_000),
            discount: None,
        };
        let changes = diff_conditions(&[], &[new_row], 42);
        assert_eq!(
            changes.create,
            vec![ConditionPayload {
                min_purchase_qty: 1,
                min_purchase_amount: 50_000,
                discount: Some(42),
            }]
        );
    }

    #[test]
    fn test_removed_row_becomes_delete() {
        let initial = [loaded(7, 2, 100_000, 3), loaded(9, 5, 300_000, 3)];
        let edited = [loaded(7, 2, 100_000, 3)];

        let changes = diff_conditions(&initial, &edited, 3);
        assert!(changes.create.is_empty());
        assert!(changes.update.is_empty());
        assert_eq!(changes.delete, vec![9]);
    }

    #[test]
    fn test_mixed_edit_partitions_all_three_groups() {
        let initial = [loaded(7, 2, 100_000, 3), loaded(9, 5, 300_000, 3)];
        let edited = [
            loaded(7, 3, 100_000, 3),
            ConditionRow {
                id: None,
                min_purchase_qty: Some(1),
                min_purchase_amount: Some(50_000),
                discount: None,
            },
            ConditionRow {
                id: None,
                min_purchase_qty: None,
                min_purchase_amount: None,
                discount: None,
            },
        ];

        let changes = diff_conditions(&initial, &edited, 3);
        assert_eq!(changes.create.len(), 1);
        assert_eq!(changes.update.len(), 1);
        assert_eq!(changes.update[0].0, 7);
        assert_eq!(changes.delete, vec![9]);
    }

    #[test]
    fn test_absent_threshold_equals_zero() {
        // Loaded row came back with zeros; the editor shows them as empty.
        // That round-trip is not a change.
        let initial = [loaded(7, 0, 0, 3)];
        let edited = [ConditionRow {
            id: Some(7),
            min_purchase_qty: None,
            min_purchase_amount: None,
            discount: Some(3),
        }];

        let changes = diff_conditions(&initial, &edited, 3);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_diff_is_idempotent() {
        let initial = [loaded(7, 2, 100_000, 3)];
        let edited = [loaded(7, 4, 100_000, 3)];

        let first = diff_conditions(&initial, &edited, 3);
        let second = diff_conditions(&initial, &edited, 3);
        assert_eq!(first, second);
    }
}
