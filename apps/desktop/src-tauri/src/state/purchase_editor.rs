//! # Purchase Editor State
//!
//! Draft state for the purchase order create/edit page.
//!
//! ## Purchase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Purchase Order Lifecycle                               │
//! │                                                                         │
//! │   create draft ──► POST /api/purchases/ ──► PENDING                     │
//! │                                               │                         │
//! │        load for edit (PENDING only) ◄─────────┤                         │
//! │        qty / cost / expiry edits              │                         │
//! │                                               │                         │
//! │        ┌──────────────────────────────────────┴────────────┐           │
//! │        ▼                                                   ▼           │
//! │   RECEIVE: one PUT carrying the full                  CANCELED: one    │
//! │   edited line set (id + variant per row,              PUT with an      │
//! │   expiry stamps the inventory batches)                empty line set   │
//! │                                                                         │
//! │   Both targets are terminal; a second transition is refused             │
//! │   client-side before any request goes out.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! Existing lines keep their backend detail id; the backend matches
//! update rows by it and refuses rows without one. Lines therefore
//! cannot be added to or removed from a loaded purchase, only edited.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use uuid::Uuid;

use atlas_api::{
    PurchaseCreatePayload, PurchaseLinePayload, PurchaseLineUpdate, PurchaseRow,
    PurchaseUpdatePayload,
};
use atlas_core::error::CoreResult;
use atlas_core::validation::{validate_price, validate_quantity};
use atlas_core::{CoreError, Money, PurchaseStatus, ValidationError, Variant};

// =============================================================================
// Purchase Line
// =============================================================================

/// One draft line in the purchase editor.
#[derive(Debug, Clone)]
pub struct PurchaseLine {
    /// Stable line key for async results and frontend list rendering
    pub key: Uuid,

    /// Backend detail row id (present when editing an existing purchase)
    pub detail_id: Option<i64>,

    /// Selected variant, `None` until picked or resolved
    pub variant: Option<Variant>,

    /// Quantity to buy
    pub quantity: i64,

    /// Cost per unit; defaults from the variant's cost price, user-editable
    pub cost_price: i64,

    /// Purchase unit (0 = not chosen yet; required for submission)
    pub unit_id: i64,

    /// Optional expiry for the inventory batch, `YYYY-MM-DD`
    pub expiry_date: Option<String>,

    /// Lookup round this line last accepted for its variant snapshot
    pub lookup_token: u64,
}

impl PurchaseLine {
    /// Creates an empty line with a fresh key.
    pub fn new() -> Self {
        PurchaseLine {
            key: Uuid::new_v4(),
            detail_id: None,
            variant: None,
            quantity: 1,
            cost_price: 0,
            unit_id: 0,
            expiry_date: None,
            lookup_token: 0,
        }
    }

    /// Line total at the current cost and quantity.
    pub fn line_total(&self) -> Money {
        Money::new(self.cost_price).multiply_quantity(self.quantity)
    }

    /// Display name of the line's variant for messages.
    pub fn variant_name(&self) -> String {
        self.variant
            .as_ref()
            .map(|v| v.name.clone())
            .unwrap_or_else(|| "unselected variant".to_string())
    }

    /// A line counts toward submission once it has a variant, a positive
    /// quantity, and a unit.
    pub fn is_valid(&self) -> bool {
        self.variant.is_some() && self.quantity > 0 && self.unit_id > 0
    }
}

impl Default for PurchaseLine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Purchase Draft
// =============================================================================

/// The purchase order under edit.
///
/// ## Invariants
/// - Lines are unique by `key`.
/// - A loaded draft (`purchase_id` set) keeps exactly the backend's line
///   set; only quantities, costs, and expiry dates change.
/// - `status` tracks the backend's view and advances when a transition
///   request succeeds.
#[derive(Debug, Clone)]
pub struct PurchaseDraft {
    /// Backend id when editing an existing PENDING purchase
    pub purchase_id: Option<i64>,

    /// Selected supplier (required for submission)
    pub supplier_id: Option<i64>,

    /// Employee carried over from the loaded purchase
    pub employee_id: Option<i64>,

    /// Last known backend status
    pub status: PurchaseStatus,

    /// Draft lines
    pub lines: Vec<PurchaseLine>,

    /// Monotonic lookup-round counter
    next_token: u64,
}

impl PurchaseDraft {
    /// Creates an empty draft for a new purchase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything and starts over.
    pub fn reset(&mut self) {
        *self = PurchaseDraft::default();
    }

    /// Loads an existing purchase into the draft.
    ///
    /// Only PENDING purchases may be edited. Returns one entry per line
    /// that needs its variant snapshot resolved: `(key, token, variant_id)`.
    pub fn load_from_row(&mut self, row: &PurchaseRow) -> CoreResult<Vec<(Uuid, u64, i64)>> {
        if !row.status.is_editable() {
            return Err(CoreError::PurchaseNotEditable {
                current_status: row.status.as_str().to_string(),
            });
        }

        self.reset();
        self.purchase_id = Some(row.id);
        self.supplier_id = Some(row.supplier);
        self.employee_id = row.employee;
        self.status = row.status;

        let mut pending = Vec::new();
        for detail in &row.purchase_details {
            let mut line = PurchaseLine::new();
            line.detail_id = Some(detail.id);
            line.quantity = detail.qty;
            line.cost_price = if detail.qty > 0 {
                detail.total / detail.qty
            } else {
                0
            };
            line.unit_id = detail.unit;
            line.expiry_date = detail.expiry_date.clone();

            if let Some(variant_id) = detail.variant {
                self.next_token += 1;
                line.lookup_token = self.next_token;
                pending.push((line.key, line.lookup_token, variant_id));
            }

            self.lines.push(line);
        }

        Ok(pending)
    }

    /// Appends an empty line and returns its key.
    pub fn add_line(&mut self) -> CoreResult<Uuid> {
        self.ensure_line_set_open()?;
        if self.lines.len() >= atlas_core::MAX_ORDER_LINES {
            return Err(CoreError::TooManyLines {
                max: atlas_core::MAX_ORDER_LINES,
            });
        }
        let line = PurchaseLine::new();
        let key = line.key;
        self.lines.push(line);
        Ok(key)
    }

    /// Returns the line with the given key.
    pub fn line(&self, key: Uuid) -> CoreResult<&PurchaseLine> {
        self.lines
            .iter()
            .find(|l| l.key == key)
            .ok_or_else(|| CoreError::LineNotFound(key.to_string()))
    }

    fn line_mut(&mut self, key: Uuid) -> CoreResult<&mut PurchaseLine> {
        self.lines
            .iter_mut()
            .find(|l| l.key == key)
            .ok_or_else(|| CoreError::LineNotFound(key.to_string()))
    }

    /// Removes the line with the given key.
    pub fn remove_line(&mut self, key: Uuid) -> CoreResult<()> {
        self.ensure_line_set_open()?;
        let before = self.lines.len();
        self.lines.retain(|l| l.key != key);
        if self.lines.len() == before {
            return Err(CoreError::LineNotFound(key.to_string()));
        }
        Ok(())
    }

    /// The backend matches update rows by detail id, so a loaded purchase
    /// keeps its exact line set.
    fn ensure_line_set_open(&self) -> CoreResult<()> {
        if self.purchase_id.is_some() {
            return Err(CoreError::Validation(ValidationError::InvalidFormat {
                field: "purchase lines".to_string(),
                reason: "lines cannot be added to or removed from an existing purchase order"
                    .to_string(),
            }));
        }
        Ok(())
    }

    /// Starts a variant lookup round for a line.
    pub fn begin_variant_lookup(&mut self, key: Uuid) -> CoreResult<u64> {
        self.next_token += 1;
        let token = self.next_token;

        let line = self.line_mut(key)?;
        line.lookup_token = token;
        Ok(token)
    }

    /// Records the variant resolved for a lookup round and defaults the
    /// line's cost to the variant's cost price.
    ///
    /// Returns `false` (line untouched) when the round is stale.
    pub fn apply_variant(&mut self, key: Uuid, token: u64, variant: Variant) -> CoreResult<bool> {
        let line = self.line_mut(key)?;
        if line.lookup_token != token {
            return Ok(false);
        }
        // Loaded lines already carry their true cost from the backend row
        if line.detail_id.is_none() {
            line.cost_price = variant.cost_price;
        }
        line.variant = Some(variant);
        Ok(true)
    }

    /// Changes a line's quantity.
    pub fn update_quantity(&mut self, key: Uuid, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let line = self.line_mut(key)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Changes a line's unit cost.
    pub fn set_cost(&mut self, key: Uuid, cost_price: i64) -> CoreResult<()> {
        validate_price(cost_price)?;
        let line = self.line_mut(key)?;
        line.cost_price = cost_price;
        Ok(())
    }

    /// Changes a line's purchase unit.
    pub fn set_unit(&mut self, key: Uuid, unit_id: i64) -> CoreResult<()> {
        let line = self.line_mut(key)?;
        line.unit_id = unit_id;
        Ok(())
    }

    /// Sets or clears a line's expiry date (`YYYY-MM-DD`).
    pub fn set_expiry(&mut self, key: Uuid, expiry_date: Option<String>) -> CoreResult<()> {
        if let Some(raw) = &expiry_date {
            if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_err() {
                return Err(CoreError::Validation(ValidationError::InvalidFormat {
                    field: "expiry date".to_string(),
                    reason: "expected YYYY-MM-DD".to_string(),
                }));
            }
        }
        let line = self.line_mut(key)?;
        line.expiry_date = expiry_date;
        Ok(())
    }

    /// Selects the supplier.
    pub fn set_supplier(&mut self, supplier_id: Option<i64>) {
        self.supplier_id = supplier_id;
    }

    /// Lines that count toward submission.
    pub fn valid_lines(&self) -> impl Iterator<Item = &PurchaseLine> {
        self.lines.iter().filter(|l| l.is_valid())
    }

    /// Total over the valid lines at cost.
    pub fn total_amount(&self) -> Money {
        self.valid_lines().map(|l| l.line_total()).sum()
    }

    /// Collects every reason this draft cannot be submitted.
    pub fn submission_blockers(&self) -> Vec<CoreError> {
        let mut blockers = Vec::new();

        if self.supplier_id.is_none() {
            blockers.push(CoreError::Validation(ValidationError::Required {
                field: "supplier".to_string(),
            }));
        }

        if self.valid_lines().next().is_none() {
            blockers.push(CoreError::Validation(ValidationError::Required {
                field: "at least one purchase line".to_string(),
            }));
        }

        // Name the lines that only miss a unit
        for line in &self.lines {
            if line.variant.is_some() && line.quantity > 0 && line.unit_id <= 0 {
                blockers.push(CoreError::Validation(ValidationError::Required {
                    field: format!("a unit for {}", line.variant_name()),
                }));
            }
        }

        blockers
    }

    /// Builds the create payload from the valid lines.
    pub fn to_create_payload(&self) -> CoreResult<PurchaseCreatePayload> {
        let supplier = self
            .supplier_id
            .ok_or_else(|| ValidationError::Required {
                field: "supplier".to_string(),
            })
            .map_err(CoreError::Validation)?;

        let purchase_details: Vec<PurchaseLinePayload> = self
            .valid_lines()
            .filter_map(|line| {
                let variant = line.variant.as_ref()?;
                Some(PurchaseLinePayload {
                    qty: line.quantity,
                    total: line.line_total().amount(),
                    unit: line.unit_id,
                    variant: variant.id,
                    expiry_date: line.expiry_date.clone(),
                })
            })
            .collect();

        Ok(PurchaseCreatePayload {
            total_amount: self.total_amount().amount(),
            status: PurchaseStatus::Pending,
            supplier,
            employee: self.employee_id,
            purchase_details,
        })
    }

    /// Builds the single update request for a status transition.
    ///
    /// RECEIVE carries the full edited line set so quantity and expiry
    /// edits land together with the transition; CANCELED carries an empty
    /// set since the lines are discarded.
    pub fn transition_payload(
        &self,
        target: PurchaseStatus,
    ) -> CoreResult<PurchaseUpdatePayload> {
        if !self.status.can_transition_to(target) {
            return Err(CoreError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }

        let supplier = self
            .supplier_id
            .ok_or_else(|| ValidationError::Required {
                field: "supplier".to_string(),
            })
            .map_err(CoreError::Validation)?;

        let purchase_details: Vec<PurchaseLineUpdate> = match target {
            PurchaseStatus::Receive => self
                .valid_lines()
                .filter_map(|line| {
                    let id = line.detail_id?;
                    let variant = line.variant.as_ref()?;
                    Some(PurchaseLineUpdate {
                        id,
                        qty: line.quantity,
                        total: line.line_total().amount(),
                        unit: line.unit_id,
                        variant: variant.id,
                        expiry_date: line.expiry_date.clone(),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(PurchaseUpdatePayload {
            total_amount: self.total_amount().amount(),
            status: target,
            supplier,
            employee: self.employee_id,
            purchase_details,
        })
    }

    /// Advances the draft's status after a transition request succeeded.
    pub fn mark_transitioned(&mut self, target: PurchaseStatus) {
        self.status = target;
    }
}

impl Default for PurchaseDraft {
    fn default() -> Self {
        PurchaseDraft {
            purchase_id: None,
            supplier_id: None,
            employee_id: None,
            status: PurchaseStatus::Pending,
            lines: Vec::new(),
            next_token: 0,
        }
    }
}

// =============================================================================
// Tauri State Wrapper
// =============================================================================

/// Tauri-managed purchase draft state.
#[derive(Debug)]
pub struct PurchaseEditorState {
    draft: Arc<Mutex<PurchaseDraft>>,
}

impl PurchaseEditorState {
    /// Creates a new empty editor state.
    pub fn new() -> Self {
        PurchaseEditorState {
            draft: Arc::new(Mutex::new(PurchaseDraft::new())),
        }
    }

    /// Executes a function with read access to the draft.
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PurchaseDraft) -> R,
    {
        let draft = self.draft.lock().expect("Purchase draft mutex poisoned");
        f(&draft)
    }

    /// Executes a function with write access to the draft.
    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PurchaseDraft) -> R,
    {
        let mut draft = self.draft.lock().expect("Purchase draft mutex poisoned");
        f(&mut draft)
    }
}

impl Default for PurchaseEditorState {
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
    use atlas_api::PurchaseDetailRow;

    fn test_variant(id: i64, name: &str, cost: i64) -> Variant {
        Variant {
            id,
            name: name.to_string(),
            price: cost * 2,
            cost_price: cost,
        }
    }

    fn pending_row() -> PurchaseRow {
        PurchaseRow {
            id: 31,
            total_amount: 150_000,
            status: PurchaseStatus::Pending,
            supplier: 6,
            supplier_name: Some("Delta Beverages".to_string()),
            status_display: Some("Pending".to_string()),
            employee: Some(2),
            purchase_details: vec![
                PurchaseDetailRow {
                    id: 301,
                    qty: 10,
                    total: 100_000,
                    unit: 1,
                    variant: Some(5),
                    expiry_date: None,
                },
                PurchaseDetailRow {
                    id: 302,
                    qty: 5,
                    total: 50_000,
                    unit: 2,
                    variant: Some(8),
                    expiry_date: None,
                },
            ],
            create_at: "2026-07-01T10:00:00Z".to_string(),
        }
    }

    fn select_variant(draft: &mut PurchaseDraft, key: Uuid, variant: Variant) {
        let token = draft.begin_variant_lookup(key).unwrap();
        assert!(draft.apply_variant(key, token, variant).unwrap());
    }

    #[test]
    fn test_variant_selection_defaults_the_cost() {
        let mut draft = PurchaseDraft::new();
        let key = draft.add_line().unwrap();

        select_variant(&mut draft, key, test_variant(5, "Cola 330ml", 7_000));
        draft.update_quantity(key, 10).unwrap();
        draft.set_unit(key, 1).unwrap();

        let line = draft.line(key).unwrap();
        assert_eq!(line.cost_price, 7_000);
        assert_eq!(line.line_total().amount(), 70_000);

        // The defaulted cost stays editable
        draft.set_cost(key, 6_500).unwrap();
        assert_eq!(draft.line(key).unwrap().line_total().amount(), 65_000);
    }

    #[test]
    fn test_stale_variant_result_is_dropped() {
        let mut draft = PurchaseDraft::new();
        let key = draft.add_line().unwrap();

        let stale = draft.begin_variant_lookup(key).unwrap();
        let fresh = draft.begin_variant_lookup(key).unwrap();

        assert!(!draft
            .apply_variant(key, stale, test_variant(1, "Stale", 1_000))
            .unwrap());
        assert!(draft.line(key).unwrap().variant.is_none());

        assert!(draft
            .apply_variant(key, fresh, test_variant(2, "Fresh", 2_000))
            .unwrap());
        assert_eq!(
            draft.line(key).unwrap().variant.as_ref().map(|v| v.id),
            Some(2)
        );
    }

    #[test]
    fn test_blockers_name_missing_supplier_and_units() {
        let mut draft = PurchaseDraft::new();

        let key = draft.add_line().unwrap();
        select_variant(&mut draft, key, test_variant(5, "Cola 330ml", 7_000));
        draft.update_quantity(key, 10).unwrap();
        // No supplier, no unit on the only line

        let blockers = draft.submission_blockers();
        assert_eq!(blockers.len(), 3);
        assert!(blockers
            .iter()
            .any(|e| matches!(e, CoreError::Validation(ValidationError::Required { field }) if field == "supplier")));
        assert!(blockers
            .iter()
            .any(|e| matches!(e, CoreError::Validation(ValidationError::Required { field }) if field.contains("Cola 330ml"))));
    }

    #[test]
    fn test_create_payload_prices_lines_at_cost() {
        let mut draft = PurchaseDraft::new();
        draft.set_supplier(Some(6));

        let a = draft.add_line().unwrap();
        select_variant(&mut draft, a, test_variant(5, "Cola 330ml", 7_000));
        draft.update_quantity(a, 10).unwrap();
        draft.set_unit(a, 1).unwrap();
        draft
            .set_expiry(a, Some("2026-12-31".to_string()))
            .unwrap();

        let b = draft.add_line().unwrap();
        select_variant(&mut draft, b, test_variant(8, "Pepsi 1.5L", 9_000));
        draft.update_quantity(b, 5).unwrap();
        draft.set_unit(b, 2).unwrap();

        let payload = draft.to_create_payload().unwrap();
        assert_eq!(payload.supplier, 6);
        assert!(matches!(payload.status, PurchaseStatus::Pending));
        assert_eq!(payload.total_amount, 115_000);
        assert_eq!(payload.purchase_details.len(), 2);
        assert_eq!(
            payload.purchase_details[0].expiry_date.as_deref(),
            Some("2026-12-31")
        );
        assert_eq!(payload.purchase_details[1].expiry_date, None);
    }

    #[test]
    fn test_create_payload_requires_supplier() {
        let draft = PurchaseDraft::new();
        assert!(draft.to_create_payload().is_err());
    }

    #[test]
    fn test_expiry_date_format_is_checked() {
        let mut draft = PurchaseDraft::new();
        let key = draft.add_line().unwrap();

        assert!(draft.set_expiry(key, Some("31/12/2026".to_string())).is_err());
        assert!(draft.set_expiry(key, Some("2026-12-31".to_string())).is_ok());
        assert!(draft.set_expiry(key, None).is_ok());
    }

    #[test]
    fn test_load_keeps_ids_and_derives_costs() {
        let mut draft = PurchaseDraft::new();
        let pending = draft.load_from_row(&pending_row()).unwrap();

        assert_eq!(draft.purchase_id, Some(31));
        assert_eq!(draft.supplier_id, Some(6));
        assert_eq!(pending.len(), 2);

        let line = &draft.lines[0];
        assert_eq!(line.detail_id, Some(301));
        assert_eq!(line.cost_price, 10_000);
        assert_eq!(line.unit_id, 1);
    }

    #[test]
    fn test_load_rejects_non_pending() {
        let mut row = pending_row();
        row.status = PurchaseStatus::Receive;

        let mut draft = PurchaseDraft::new();
        let err = draft.load_from_row(&row).unwrap_err();
        assert!(
            matches!(err, CoreError::PurchaseNotEditable { current_status } if current_status == "RECEIVE")
        );
    }

    #[test]
    fn test_loaded_line_set_is_closed() {
        let mut draft = PurchaseDraft::new();
        draft.load_from_row(&pending_row()).unwrap();

        let key = draft.lines[0].key;
        assert!(draft.add_line().is_err());
        assert!(draft.remove_line(key).is_err());

        // Edits remain allowed
        assert!(draft.update_quantity(key, 12).is_ok());
    }

    #[test]
    fn test_receive_payload_carries_edited_lines() {
        let mut draft = PurchaseDraft::new();
        let pending = draft.load_from_row(&pending_row()).unwrap();

        // Resolve the variant snapshots the way the load command would
        for (key, token, variant_id) in pending {
            let variant = test_variant(variant_id, "Resolved", 1_000);
            draft.apply_variant(key, token, variant).unwrap();
        }

        let key = draft.lines[0].key;
        draft.update_quantity(key, 12).unwrap();
        draft
            .set_expiry(key, Some("2026-11-30".to_string()))
            .unwrap();

        let payload = draft.transition_payload(PurchaseStatus::Receive).unwrap();
        assert!(matches!(payload.status, PurchaseStatus::Receive));
        assert_eq!(payload.purchase_details.len(), 2);

        let row = &payload.purchase_details[0];
        assert_eq!(row.id, 301);
        assert_eq!(row.qty, 12);
        assert_eq!(row.total, 120_000);
        assert_eq!(row.expiry_date.as_deref(), Some("2026-11-30"));
        assert_eq!(payload.total_amount, 170_000);
    }

    #[test]
    fn test_cancel_payload_sends_no_lines() {
        let mut draft = PurchaseDraft::new();
        let pending = draft.load_from_row(&pending_row()).unwrap();
        for (key, token, variant_id) in pending {
            draft
                .apply_variant(key, token, test_variant(variant_id, "Resolved", 1_000))
                .unwrap();
        }

        let payload = draft.transition_payload(PurchaseStatus::Canceled).unwrap();
        assert!(matches!(payload.status, PurchaseStatus::Canceled));
        assert!(payload.purchase_details.is_empty());
    }

    #[test]
    fn test_terminal_status_refuses_further_transitions() {
        let mut draft = PurchaseDraft::new();
        draft.load_from_row(&pending_row()).unwrap();
        draft.mark_transitioned(PurchaseStatus::Receive);

        let err = draft
            .transition_payload(PurchaseStatus::Canceled)
            .unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidTransition { from, to } if from == "RECEIVE" && to == "CANCELED")
        );
    }
}
