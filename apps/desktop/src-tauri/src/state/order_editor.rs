//! # Order Editor State
//!
//! Draft state for the order create/edit page.
//!
//! ## Line Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Order Line Lookup Lifecycle                             │
//! │                                                                         │
//! │  User picks variant                                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  begin_variant_lookup(key)                                              │
//! │    stock := None, applied_discount := None                              │
//! │    lookup_pending := true, token := next_token                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  command fetches stock + offers concurrently  (tokio::join!)            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  apply_lookup(key, token, stock, offers)                                │
//! │    token matches?  ──no──► result dropped, line untouched               │
//! │        │ yes                                                            │
//! │        ▼                                                                │
//! │    stock stored, offers replaced, applied discount reconciled,          │
//! │    lookup_pending := false                                              │
//! │                                                                         │
//! │  NOTE: Picking a variant again before the first round lands bumps the   │
//! │        token, so the slower (stale) round can never overwrite the       │
//! │        fresher one.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use atlas_api::{OrderCreatePayload, OrderLinePayload};
use atlas_core::error::CoreResult;
use atlas_core::pricing::{self, LinePricing};
use atlas_core::validation::validate_quantity;
use atlas_core::{
    CoreError, DiscountOffer, Money, OrderStatus, PaymentMethod, StockSnapshot, ValidationError,
    Variant,
};

/// Backend unit row every store is seeded with. Lines submitted without
/// an explicit unit fall back to it; the backend refuses unitless rows.
const FALLBACK_UNIT_ID: i64 = 1;

// =============================================================================
// Order Line
// =============================================================================

/// One draft line in the order editor.
///
/// ## Design Notes
/// - `key`: Stable identity for async lookup results. Lines are addressed
///   by key, never by index, so removing a line mid-flight cannot route a
///   result to a neighbour.
/// - `variant`: Frozen snapshot of the picked variant (name and price at
///   selection time).
/// - `lookup_token`: The lookup round this line last accepted. Stale
///   rounds carry an older token and are dropped.
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// Stable line key for async results and frontend list rendering
    pub key: Uuid,

    /// Selected variant, `None` until the user picks one
    pub variant: Option<Variant>,

    /// Quantity to sell
    pub quantity: i64,

    /// Selected sale unit (0 = not chosen yet)
    pub unit_id: i64,

    /// Offer picked from `offers`, if any
    pub applied_discount_id: Option<i64>,

    /// Offers known for the selected variant
    pub offers: Vec<DiscountOffer>,

    /// Latest stock snapshot, `None` while unknown
    pub stock: Option<StockSnapshot>,

    /// True from variant selection until the lookup round lands
    pub lookup_pending: bool,

    /// Lookup round this line last accepted
    pub lookup_token: u64,
}

impl OrderLine {
    /// Creates an empty line with a fresh key.
    pub fn new() -> Self {
        OrderLine {
            key: Uuid::new_v4(),
            variant: None,
            quantity: 1,
            unit_id: 0,
            applied_discount_id: None,
            offers: Vec::new(),
            stock: None,
            lookup_pending: false,
            lookup_token: 0,
        }
    }

    /// Unit price of the selected variant (zero while unselected).
    pub fn unit_price(&self) -> Money {
        self.variant.as_ref().map(Variant::price).unwrap_or_default()
    }

    /// The applied offer, resolved against the current offer list.
    pub fn applied_offer(&self) -> Option<&DiscountOffer> {
        let applied = self.applied_discount_id?;
        self.offers.iter().find(|o| o.id == applied)
    }

    /// Prices the line with the current variant, quantity, and offer.
    pub fn pricing(&self) -> LinePricing {
        pricing::price_line(self.unit_price(), self.quantity, self.applied_offer())
    }

    /// Display name of the line's variant for messages.
    pub fn variant_name(&self) -> String {
        self.variant
            .as_ref()
            .map(|v| v.name.clone())
            .unwrap_or_else(|| "unselected variant".to_string())
    }

    /// A line counts toward submission once it has a variant and a
    /// positive quantity.
    pub fn is_valid(&self) -> bool {
        self.variant.is_some() && self.quantity > 0
    }
}

impl Default for OrderLine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// The order under edit.
///
/// ## Invariants
/// - Lines are unique by `key`.
/// - `applied_discount_id` always names an entry of the same line's
///   `offers` list (reconciled on every offer refresh).
/// - `next_token` only ever grows; a line's `lookup_token` equals the
///   most recent round started for it.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Backend id when editing an existing PENDING order
    pub order_id: Option<i64>,

    /// Selected customer (required for submission)
    pub customer_id: Option<i64>,

    /// Optional coupon applied to the whole order
    pub coupon_id: Option<i64>,

    /// Optional order-level discount
    pub discount_id: Option<i64>,

    /// How the customer pays
    pub payment_method: PaymentMethod,

    /// Draft lines
    pub lines: Vec<OrderLine>,

    /// Monotonic lookup-round counter
    next_token: u64,
}

impl OrderDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything and starts over.
    pub fn reset(&mut self) {
        *self = OrderDraft::default();
    }

    /// Appends an empty line and returns its key.
    pub fn add_line(&mut self) -> CoreResult<Uuid> {
        if self.lines.len() >= atlas_core::MAX_ORDER_LINES {
            return Err(CoreError::TooManyLines {
                max: atlas_core::MAX_ORDER_LINES,
            });
        }
        let line = OrderLine::new();
        let key = line.key;
        self.lines.push(line);
        Ok(key)
    }

    /// Returns the line with the given key.
    pub fn line(&self, key: Uuid) -> CoreResult<&OrderLine> {
        self.lines
            .iter()
            .find(|l| l.key == key)
            .ok_or_else(|| CoreError::LineNotFound(key.to_string()))
    }

    fn line_mut(&mut self, key: Uuid) -> CoreResult<&mut OrderLine> {
        self.lines
            .iter_mut()
            .find(|l| l.key == key)
            .ok_or_else(|| CoreError::LineNotFound(key.to_string()))
    }

    /// Removes the line with the given key.
    pub fn remove_line(&mut self, key: Uuid) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.key != key);
        if self.lines.len() == before {
            return Err(CoreError::LineNotFound(key.to_string()));
        }
        Ok(())
    }

    /// Starts a lookup round for a line whose variant is being changed.
    ///
    /// Clears the stale stock snapshot and applied discount immediately so
    /// the line never prices against data from the previous variant, and
    /// stamps the line with a fresh token.
    pub fn begin_variant_lookup(&mut self, key: Uuid) -> CoreResult<u64> {
        self.next_token += 1;
        let token = self.next_token;

        let line = self.line_mut(key)?;
        line.stock = None;
        line.applied_discount_id = None;
        line.lookup_pending = true;
        line.lookup_token = token;
        Ok(token)
    }

    /// Records the variant picked for a lookup round.
    ///
    /// Returns `false` (line untouched) when the round is stale.
    pub fn apply_variant(&mut self, key: Uuid, token: u64, variant: Variant) -> CoreResult<bool> {
        let line = self.line_mut(key)?;
        if line.lookup_token != token {
            return Ok(false);
        }
        line.variant = Some(variant);
        Ok(true)
    }

    /// Lands the stock and offer results of a lookup round.
    ///
    /// Returns `false` (line untouched) when the line is gone or the
    /// round is stale. On a match the offer list is replaced and the
    /// applied discount reconciled against it.
    pub fn apply_lookup(
        &mut self,
        key: Uuid,
        token: u64,
        stock: StockSnapshot,
        offers: Vec<DiscountOffer>,
    ) -> bool {
        let Ok(line) = self.line_mut(key) else {
            return false;
        };
        if line.lookup_token != token {
            return false;
        }

        line.stock = Some(stock);
        line.offers = offers;
        line.applied_discount_id =
            pricing::reconcile_discount(line.applied_discount_id, &line.offers);
        line.lookup_pending = false;
        true
    }

    /// Changes a line's quantity.
    pub fn update_quantity(&mut self, key: Uuid, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let line = self.line_mut(key)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Changes a line's sale unit.
    pub fn set_unit(&mut self, key: Uuid, unit_id: i64) -> CoreResult<()> {
        let line = self.line_mut(key)?;
        line.unit_id = unit_id;
        Ok(())
    }

    /// Applies (or clears) one of the line's offers.
    pub fn apply_discount(&mut self, key: Uuid, offer_id: Option<i64>) -> CoreResult<()> {
        let line = self.line_mut(key)?;
        if let Some(id) = offer_id {
            if !line.offers.iter().any(|o| o.id == id) {
                return Err(CoreError::Validation(ValidationError::InvalidFormat {
                    field: "discount".to_string(),
                    reason: format!("offer {} is not available for this variant", id),
                }));
            }
        }
        line.applied_discount_id = offer_id;
        Ok(())
    }

    /// Selects the customer.
    pub fn set_customer(&mut self, customer_id: Option<i64>) {
        self.customer_id = customer_id;
    }

    /// Selects the coupon.
    pub fn set_coupon(&mut self, coupon_id: Option<i64>) {
        self.coupon_id = coupon_id;
    }

    /// Selects the order-level discount.
    pub fn set_discount(&mut self, discount_id: Option<i64>) {
        self.discount_id = discount_id;
    }

    /// Selects the payment method.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Lines that count toward submission.
    pub fn valid_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|l| l.is_valid())
    }

    /// Grand total over the valid lines.
    pub fn grand_total(&self) -> Money {
        pricing::grand_total(self.valid_lines().map(|l| l.pricing().line_total))
    }

    /// Collects every reason this draft cannot be submitted.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Save Order"
    ///      │
    ///      ▼
    /// submission_blockers() ── empty? ──► POST /api/orders/
    ///      │
    ///      ▼ non-empty
    /// one notification PER blocker:
    ///   "customer is required"
    ///   "Stock lookup still pending for Cola 330ml"
    ///   "Insufficient stock for Pepsi 1.5L: available 2, requested 5"
    /// ```
    pub fn submission_blockers(&self) -> Vec<CoreError> {
        let mut blockers = Vec::new();

        if self.customer_id.is_none() {
            blockers.push(CoreError::Validation(ValidationError::Required {
                field: "customer".to_string(),
            }));
        }

        let valid: Vec<&OrderLine> = self.valid_lines().collect();
        if valid.is_empty() {
            blockers.push(CoreError::Validation(ValidationError::Required {
                field: "at least one order line".to_string(),
            }));
        }

        for line in valid {
            match (line.lookup_pending, line.stock) {
                (true, _) | (false, None) => blockers.push(CoreError::StockPending {
                    variant_name: line.variant_name(),
                }),
                (false, Some(stock)) if stock.balance < line.quantity => {
                    blockers.push(CoreError::InsufficientStock {
                        variant_name: line.variant_name(),
                        available: stock.balance,
                        requested: line.quantity,
                    })
                }
                (false, Some(_)) => {}
            }
        }

        blockers
    }

    /// Builds the create payload from the valid lines.
    ///
    /// Line totals carry the discounted amount; unitless lines fall back
    /// to the seeded base unit.
    pub fn to_payload(&self) -> OrderCreatePayload {
        let details: Vec<OrderLinePayload> = self
            .valid_lines()
            .filter_map(|line| {
                let variant = line.variant.as_ref()?;
                Some(OrderLinePayload {
                    variant: variant.id,
                    qty: line.quantity,
                    total: line.pricing().line_total.amount(),
                    unit: if line.unit_id > 0 {
                        line.unit_id
                    } else {
                        FALLBACK_UNIT_ID
                    },
                })
            })
            .collect();

        OrderCreatePayload {
            total_amount: self.grand_total().amount(),
            payment_method: self.payment_method,
            status: OrderStatus::Pending,
            customer: self.customer_id,
            coupon: self.coupon_id,
            discount: self.discount_id,
            employee: None,
            details,
        }
    }
}

impl Default for OrderDraft {
    fn default() -> Self {
        OrderDraft {
            order_id: None,
            customer_id: None,
            coupon_id: None,
            discount_id: None,
            payment_method: PaymentMethod::Cash,
            lines: Vec::new(),
            next_token: 0,
        }
    }
}

// =============================================================================
// Tauri State Wrapper
// =============================================================================

/// Tauri-managed order draft state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<OrderDraft>>` because lookup commands land results
/// while the user keeps editing other lines.
#[derive(Debug)]
pub struct OrderEditorState {
    draft: Arc<Mutex<OrderDraft>>,
}

impl OrderEditorState {
    /// Creates a new empty editor state.
    pub fn new() -> Self {
        OrderEditorState {
            draft: Arc::new(Mutex::new(OrderDraft::new())),
        }
    }

    /// Executes a function with read access to the draft.
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderDraft) -> R,
    {
        let draft = self.draft.lock().expect("Order draft mutex poisoned");
        f(&draft)
    }

    /// Executes a function with write access to the draft.
    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderDraft) -> R,
    {
        let mut draft = self.draft.lock().expect("Order draft mutex poisoned");
        f(&mut draft)
    }
}

impl Default for OrderEditorState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::PromotionValueType;

    fn test_variant(id: i64, name: &str, price: i64) -> Variant {
        Variant {
            id,
            name: name.to_string(),
            price,
            cost_price: price / 2,
        }
    }

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

    fn stock(variant_id: i64, balance: i64) -> StockSnapshot {
        StockSnapshot {
            variant_id,
            balance,
        }
    }

    /// Runs the full selection flow for one line.
    fn select_variant(
        draft: &mut OrderDraft,
        key: Uuid,
        variant: Variant,
        balance: i64,
        offers: Vec<DiscountOffer>,
    ) {
        let variant_id = variant.id;
        let token = draft.begin_variant_lookup(key).unwrap();
        assert!(draft.apply_variant(key, token, variant).unwrap());
        assert!(draft.apply_lookup(key, token, stock(variant_id, balance), offers));
    }

    #[test]
    fn test_percentage_discount_prices_the_line() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();

        select_variant(
            &mut draft,
            key,
            test_variant(1, "Cola 330ml", 100_000),
            10,
            vec![percentage(7, 10)],
        );
        draft.update_quantity(key, 3).unwrap();
        draft.apply_discount(key, Some(7)).unwrap();

        let pricing = draft.line(key).unwrap().pricing();
        assert_eq!(pricing.discount_amount.amount(), 30_000);
        assert_eq!(pricing.line_total.amount(), 270_000);
    }

    #[test]
    fn test_flat_discount_ignores_quantity() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();

        select_variant(
            &mut draft,
            key,
            test_variant(2, "Pepsi 1.5L", 50_000),
            10,
            vec![fixed(9, 20_000)],
        );
        draft.update_quantity(key, 2).unwrap();
        draft.apply_discount(key, Some(9)).unwrap();

        let pricing = draft.line(key).unwrap().pricing();
        assert_eq!(pricing.discount_amount.amount(), 20_000);
        assert_eq!(pricing.line_total.amount(), 80_000);
    }

    #[test]
    fn test_grand_total_sums_valid_lines_only() {
        let mut draft = OrderDraft::new();

        let a = draft.add_line().unwrap();
        select_variant(
            &mut draft,
            a,
            test_variant(1, "Cola 330ml", 100_000),
            10,
            vec![percentage(7, 10)],
        );
        draft.update_quantity(a, 3).unwrap();
        draft.apply_discount(a, Some(7)).unwrap();

        let b = draft.add_line().unwrap();
        select_variant(
            &mut draft,
            b,
            test_variant(2, "Pepsi 1.5L", 50_000),
            10,
            vec![fixed(9, 20_000)],
        );
        draft.update_quantity(b, 2).unwrap();
        draft.apply_discount(b, Some(9)).unwrap();

        // An unselected line contributes nothing
        draft.add_line().unwrap();

        assert_eq!(draft.grand_total().amount(), 350_000);
    }

    #[test]
    fn test_stale_lookup_round_is_dropped() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();

        // First round starts, then the user picks again before it lands
        let stale = draft.begin_variant_lookup(key).unwrap();
        let fresh = draft.begin_variant_lookup(key).unwrap();
        assert!(fresh > stale);

        // The slow first round arrives late and is dropped
        assert!(!draft
            .apply_variant(key, stale, test_variant(1, "Stale", 1_000))
            .unwrap());
        assert!(!draft.apply_lookup(key, stale, stock(1, 99), vec![percentage(1, 10)]));

        let line = draft.line(key).unwrap();
        assert!(line.variant.is_none());
        assert!(line.stock.is_none());
        assert!(line.lookup_pending);

        // The fresh round lands normally
        assert!(draft
            .apply_variant(key, fresh, test_variant(2, "Fresh", 2_000))
            .unwrap());
        assert!(draft.apply_lookup(key, fresh, stock(2, 5), vec![]));
        let line = draft.line(key).unwrap();
        assert_eq!(line.variant.as_ref().map(|v| v.id), Some(2));
        assert!(!line.lookup_pending);
    }

    #[test]
    fn test_reselecting_variant_clears_stock_and_discount() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();

        select_variant(
            &mut draft,
            key,
            test_variant(1, "Cola 330ml", 100_000),
            10,
            vec![percentage(7, 10)],
        );
        draft.apply_discount(key, Some(7)).unwrap();

        // Picking a new variant immediately invalidates the old data
        draft.begin_variant_lookup(key).unwrap();
        let line = draft.line(key).unwrap();
        assert!(line.stock.is_none());
        assert!(line.applied_discount_id.is_none());
        assert!(line.lookup_pending);
    }

    #[test]
    fn test_lookup_replaces_offers_and_reconciles() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();

        select_variant(
            &mut draft,
            key,
            test_variant(1, "Cola 330ml", 100_000),
            10,
            vec![percentage(7, 10), fixed(9, 5_000)],
        );
        draft.apply_discount(key, Some(7)).unwrap();

        // New round for another variant returns a list without offer 7
        let token = draft.begin_variant_lookup(key).unwrap();
        draft
            .apply_variant(key, token, test_variant(2, "Pepsi 1.5L", 50_000))
            .unwrap();
        assert!(draft.apply_lookup(key, token, stock(2, 5), vec![fixed(9, 5_000)]));

        let line = draft.line(key).unwrap();
        assert_eq!(line.offers.len(), 1);
        assert!(line.applied_discount_id.is_none());
    }

    #[test]
    fn test_apply_discount_rejects_unknown_offer() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();
        select_variant(
            &mut draft,
            key,
            test_variant(1, "Cola 330ml", 100_000),
            10,
            vec![percentage(7, 10)],
        );

        assert!(draft.apply_discount(key, Some(42)).is_err());
        assert!(draft.apply_discount(key, Some(7)).is_ok());
        assert!(draft.apply_discount(key, None).is_ok());
    }

    #[test]
    fn test_submission_blockers_report_every_violation() {
        let mut draft = OrderDraft::new();

        // No customer selected
        // Line A: enough data, but short on stock
        let a = draft.add_line().unwrap();
        select_variant(&mut draft, a, test_variant(1, "Cola 330ml", 100_000), 2, vec![]);
        draft.update_quantity(a, 5).unwrap();

        // Line B: lookup still in flight
        let b = draft.add_line().unwrap();
        let token = draft.begin_variant_lookup(b).unwrap();
        draft
            .apply_variant(b, token, test_variant(2, "Pepsi 1.5L", 50_000))
            .unwrap();

        let blockers = draft.submission_blockers();
        assert_eq!(blockers.len(), 3);
        assert!(blockers
            .iter()
            .any(|e| matches!(e, CoreError::Validation(ValidationError::Required { field }) if field == "customer")));
        assert!(blockers.iter().any(
            |e| matches!(e, CoreError::InsufficientStock { variant_name, available: 2, requested: 5 } if variant_name == "Cola 330ml")
        ));
        assert!(blockers
            .iter()
            .any(|e| matches!(e, CoreError::StockPending { variant_name } if variant_name == "Pepsi 1.5L")));
    }

    #[test]
    fn test_clean_draft_has_no_blockers() {
        let mut draft = OrderDraft::new();
        draft.set_customer(Some(4));

        let key = draft.add_line().unwrap();
        select_variant(&mut draft, key, test_variant(1, "Cola 330ml", 100_000), 10, vec![]);
        draft.update_quantity(key, 3).unwrap();

        assert!(draft.submission_blockers().is_empty());
    }

    #[test]
    fn test_payload_maps_unset_unit_to_base_unit() {
        let mut draft = OrderDraft::new();
        draft.set_customer(Some(4));

        let a = draft.add_line().unwrap();
        select_variant(&mut draft, a, test_variant(1, "Cola 330ml", 100_000), 10, vec![]);
        draft.update_quantity(a, 3).unwrap();

        let b = draft.add_line().unwrap();
        select_variant(&mut draft, b, test_variant(2, "Pepsi 1.5L", 50_000), 10, vec![]);
        draft.set_unit(b, 4).unwrap();

        let payload = draft.to_payload();
        assert_eq!(payload.details.len(), 2);
        assert_eq!(payload.details[0].unit, 1);
        assert_eq!(payload.details[1].unit, 4);
        assert_eq!(payload.total_amount, 350_000);
        assert_eq!(payload.customer, Some(4));
        assert!(matches!(payload.status, OrderStatus::Pending));
    }

    #[test]
    fn test_line_limit_is_enforced() {
        let mut draft = OrderDraft::new();
        for _ in 0..atlas_core::MAX_ORDER_LINES {
            draft.add_line().unwrap();
        }
        assert!(matches!(
            draft.add_line(),
            Err(CoreError::TooManyLines { max: 100 })
        ));
    }

    #[test]
    fn test_unknown_line_key_errors() {
        let mut draft = OrderDraft::new();
        let ghost = Uuid::new_v4();

        assert!(matches!(
            draft.remove_line(ghost),
            Err(CoreError::LineNotFound(_))
        ));
        assert!(matches!(
            draft.update_quantity(ghost, 2),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let mut draft = OrderDraft::new();
        let key = draft.add_line().unwrap();
        assert!(draft.update_quantity(key, 0).is_err());
        assert!(draft.update_quantity(key, -3).is_err());
        assert!(draft.update_quantity(key, 2).is_ok());
    }
}
