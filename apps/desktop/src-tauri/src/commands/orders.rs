//! # Sales Order Commands
//!
//! The sale screen end to end: reference data for the pickers, the line
//! editor, pricing, submission, payment, and the stored order list.
//!
//! ## Editing Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  load_sale_references      bulk customers / variants / units /       │
//! │        │                   coupons into the reference caches         │
//! │        ▼                                                             │
//! │  start_order ──► add_order_line ──► select_order_variant             │
//! │                                          │                           │
//! │                                          ▼                           │
//! │                      variant applied, then stock and offers          │
//! │                      fetched concurrently and landed only when       │
//! │                      the line's lookup token still matches           │
//! │                                          │                           │
//! │   quantity / unit / discount edits       ▼                           │
//! │  ─────────────────────────────► submit_order ──► POST api/orders/    │
//! │                                          │                           │
//! │                                          ▼                           │
//! │                                   mark_order_paid                    │
//! │                      PUT status COMPLETE, then POST the invoice      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Editing a stored PENDING order reuses the same draft: `load_order_for_edit`
//! pulls it into the editor and `submit_order` cancels the stored order
//! before creating its replacement. The backend restocks and wipes lines on
//! any PENDING update it receives, so line edits never go through PUT.

use serde::Serialize;
use tauri::State;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::auth::require_store_role;
use crate::commands::promotions::window_state;
use crate::error::CommandError;
use crate::state::{ApiState, OrderDraft, OrderEditorState, OrderLine, ReferenceState};
use atlas_core::payment::{self, PaymentPreview, QUICK_CASH_DENOMINATIONS};
use atlas_core::promotion::PromotionState;
use atlas_core::types::{
    DiscountKind, DiscountOffer, Money, OrderStatus, PaymentMethod, PaymentStatus,
    PromotionValueType, StockSnapshot, Variant,
};
use atlas_core::validation::validate_price;
use atlas_core::{CoreError, CoreResult};

use atlas_api::{
    ApiClient, CouponRow, CustomerFilter, CustomerRow, DiscountFilter, DiscountRow, InvoicePayload,
    InvoiceRow, ListQuery, NoFilter, OrderDetailRow, OrderRow, OrderUpdatePayload, UnitRow,
    VariantFilter, VariantRow,
};

// =============================================================================
// Reference DTOs
// =============================================================================

/// A customer as the sale picker needs it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRefDto {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

impl From<&CustomerRow> for CustomerRefDto {
    fn from(row: &CustomerRow) -> Self {
        CustomerRefDto {
            id: row.id,
            name: row.cus_name.clone(),
            phone: row.cus_phone.clone(),
        }
    }
}

/// A sellable variant as the sale and purchase pickers need it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRefDto {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub cost_price: i64,
}

impl From<&VariantRow> for VariantRefDto {
    fn from(row: &VariantRow) -> Self {
        VariantRefDto {
            id: row.id,
            name: variant_display_name(row),
            price: row.variant_price,
            cost_price: row.variant_cost_price,
        }
    }
}

/// A sale unit as the line unit picker needs it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRefDto {
    pub id: i64,
    pub name: String,
}

impl From<&UnitRow> for UnitRefDto {
    fn from(row: &UnitRow) -> Self {
        UnitRefDto {
            id: row.id,
            name: row.unit_name.clone(),
        }
    }
}

/// A coupon option with its derived state badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponOptionDto {
    pub id: i64,
    pub code: String,
    pub value: Option<i64>,
    pub value_type: Option<PromotionValueType>,
    pub state: PromotionState,
}

impl From<CouponRow> for CouponOptionDto {
    fn from(row: CouponRow) -> Self {
        let state = window_state(
            row.start_date.as_deref(),
            row.end_date.as_deref(),
            row.usage_limit,
        );
        CouponOptionDto {
            id: row.id,
            code: row.code,
            value: row.promotion_value,
            value_type: row.promotion_value_type,
            state,
        }
    }
}

/// Everything the sale screen's pickers need, in one round trip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReferencesDto {
    pub customers: Vec<CustomerRefDto>,
    pub variants: Vec<VariantRefDto>,
    pub units: Vec<UnitRefDto>,
    pub coupons: Vec<CouponOptionDto>,
    /// Present when one or more bulk loads failed. The screen stays
    /// usable: searches still hit the backend directly.
    pub warning: Option<String>,
}

// =============================================================================
// Draft DTOs
// =============================================================================

/// A per-line discount offer ready for the line's offer picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDto {
    pub id: i64,
    pub value_type: PromotionValueType,
    pub value: i64,
}

impl From<&DiscountOffer> for OfferDto {
    fn from(offer: &DiscountOffer) -> Self {
        OfferDto {
            id: offer.id,
            value_type: offer.value_type,
            value: offer.value,
        }
    }
}

/// One draft line with its resolved pricing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDto {
    pub key: Uuid,
    pub variant_id: Option<i64>,
    pub variant_name: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub unit_id: i64,
    /// `None` until a stock lookup has landed for the current variant.
    pub stock_balance: Option<i64>,
    pub stock_pending: bool,
    pub offers: Vec<OfferDto>,
    pub applied_discount_id: Option<i64>,
    pub discount_amount: i64,
    pub line_total: i64,
}

impl From<&OrderLine> for OrderLineDto {
    fn from(line: &OrderLine) -> Self {
        let pricing = line.pricing();
        OrderLineDto {
            key: line.key,
            variant_id: line.variant.as_ref().map(|v| v.id),
            variant_name: line.variant_name(),
            unit_price: line.unit_price().amount(),
            quantity: line.quantity,
            unit_id: line.unit_id,
            stock_balance: line.stock.map(|s| s.balance),
            stock_pending: line.lookup_pending,
            offers: line.offers.iter().map(OfferDto::from).collect(),
            applied_discount_id: line.applied_discount_id,
            discount_amount: pricing.discount_amount.amount(),
            line_total: pricing.line_total.amount(),
        }
    }
}

/// The full editor state, returned by every draft mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraftDto {
    /// Set when the draft was loaded from a stored order.
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub coupon_id: Option<i64>,
    pub discount_id: Option<i64>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<OrderLineDto>,
    pub grand_total: i64,
}

impl From<&OrderDraft> for OrderDraftDto {
    fn from(draft: &OrderDraft) -> Self {
        OrderDraftDto {
            order_id: draft.order_id,
            customer_id: draft.customer_id,
            coupon_id: draft.coupon_id,
            discount_id: draft.discount_id,
            payment_method: draft.payment_method,
            lines: draft.lines.iter().map(OrderLineDto::from).collect(),
            grand_total: draft.grand_total().amount(),
        }
    }
}

// =============================================================================
// Stored Order DTOs
// =============================================================================

/// One stored order line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailDto {
    pub id: i64,
    pub variant_id: Option<i64>,
    pub quantity: i64,
    pub total: i64,
    pub unit_id: i64,
}

impl From<&OrderDetailRow> for OrderDetailDto {
    fn from(row: &OrderDetailRow) -> Self {
        OrderDetailDto {
            id: row.id,
            variant_id: row.variant,
            quantity: row.qty,
            total: row.total,
            unit_id: row.unit,
        }
    }
}

/// A stored order for the order list and detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i64,
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    pub order_date: String,
    pub status: OrderStatus,
    pub customer_id: Option<i64>,
    pub coupon_id: Option<i64>,
    pub discount_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub details: Vec<OrderDetailDto>,
}

impl From<OrderRow> for OrderDto {
    fn from(row: OrderRow) -> Self {
        OrderDto {
            id: row.id,
            total_amount: row.total_amount,
            payment_method: row.payment_method,
            order_date: row.order_date,
            status: row.status,
            customer_id: row.customer,
            coupon_id: row.coupon,
            discount_id: row.discount,
            employee_id: row.employee,
            details: row.details.iter().map(OrderDetailDto::from).collect(),
        }
    }
}

/// A settlement invoice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: i64,
    pub order_id: i64,
    pub payment_status: PaymentStatus,
    pub created_at: String,
    pub total_amount: i64,
    pub amount_received: i64,
    pub amount_change: i64,
}

impl From<InvoiceRow> for InvoiceDto {
    fn from(row: InvoiceRow) -> Self {
        InvoiceDto {
            id: row.id,
            order_id: row.order,
            payment_status: row.payment_status,
            created_at: row.create_at,
            total_amount: row.total_amount,
            amount_received: row.amount_received,
            amount_change: row.amount_change,
        }
    }
}

/// Result of a submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmitDto {
    pub order_id: i64,
    pub total_amount: i64,
    /// The cancelled order this submission replaced, if any.
    pub recreated_from: Option<i64>,
}

/// Result of marking an order paid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResultDto {
    pub order_id: i64,
    pub status: PaymentStatus,
    pub received: i64,
    pub change: i64,
    pub remaining: i64,
    /// Present when the order completed but the invoice POST failed.
    pub invoice_warning: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Shortest search text that goes to the backend. Anything shorter
/// answers from the reference cache instead.
pub(crate) const MIN_SEARCH_LEN: usize = 2;

/// Display name for a variant row. Unnamed single variants fall back to
/// their SKU, then to the bare id.
pub(crate) fn variant_display_name(row: &VariantRow) -> String {
    row.variant_name
        .clone()
        .or_else(|| row.sku.clone())
        .unwrap_or_else(|| format!("#{}", row.id))
}

/// Converts a wire variant row into the editor's domain variant.
pub(crate) fn variant_from_row(row: &VariantRow) -> Variant {
    Variant {
        id: row.id,
        name: variant_display_name(row),
        price: row.variant_price,
        cost_price: row.variant_cost_price,
    }
}

/// Resolves a variant by id, from the reference cache when possible.
/// A backend hit also lands the row in the cache.
pub(crate) async fn resolve_variant(
    client: &ApiClient,
    references: &ReferenceState,
    variant_id: i64,
) -> Result<Variant, CommandError> {
    if let Some(row) = references.with_caches(|caches| caches.variants.get(variant_id)) {
        return Ok(variant_from_row(&row));
    }
    let row = client.products().retrieve_variant(variant_id).await?;
    let variant = variant_from_row(&row);
    references.with_caches_mut(|caches| caches.variants.merge(vec![row]));
    Ok(variant)
}

/// Keeps only offers a cashier may apply right now: plain price
/// discounts whose window is active and whose value is fully specified.
fn offers_from_rows(rows: Vec<DiscountRow>) -> Vec<DiscountOffer> {
    rows.into_iter()
        .filter_map(|row| {
            if row.discount_type != DiscountKind::Discount {
                return None;
            }
            let value = row.promotion_value?;
            let value_type = row.promotion_value_type?;
            let state = window_state(
                row.start_date.as_deref(),
                row.end_date.as_deref(),
                row.usage_limit,
            );
            state
                .is_active()
                .then_some(DiscountOffer {
                    id: row.id,
                    value_type,
                    value,
                })
        })
        .collect()
}

/// Runs one full lookup round for a line: variant, then stock and
/// offers concurrently. Stock falls back to zero and offers to empty
/// when their fetches fail; only the variant fetch is fatal.
///
/// Returns `false` when the round went stale before it could land.
async fn resolve_line_lookup(
    client: &ApiClient,
    references: &ReferenceState,
    editor: &OrderEditorState,
    key: Uuid,
    variant_id: i64,
) -> Result<bool, CommandError> {
    let token = editor.with_draft_mut(|draft| draft.begin_variant_lookup(key))?;

    let variant = resolve_variant(client, references, variant_id).await?;

    // The line may have been removed while the fetch was in flight.
    let fresh = match editor.with_draft_mut(|draft| draft.apply_variant(key, token, variant)) {
        Ok(fresh) => fresh,
        Err(CoreError::LineNotFound(_)) => false,
        Err(err) => return Err(err.into()),
    };
    if !fresh {
        debug!(key = %key, "Variant lookup superseded before it landed");
        return Ok(false);
    }

    let offer_query = ListQuery::new().with_filter(DiscountFilter::ForVariant(variant_id));
    let (stock_res, offers_res) = tokio::join!(
        client.inventory().stock_for_variant(variant_id),
        client.discounts().list(&offer_query),
    );

    let balance = match stock_res {
        Ok(rows) => rows.first().map(|row| row.balance).unwrap_or(0),
        Err(err) => {
            warn!(variant_id = %variant_id, error = %err, "Stock lookup failed, showing zero");
            0
        }
    };
    let offers = match offers_res {
        Ok(rows) => offers_from_rows(rows),
        Err(err) => {
            warn!(variant_id = %variant_id, error = %err, "Offer lookup failed, none shown");
            Vec::new()
        }
    };

    let snapshot = StockSnapshot {
        variant_id,
        balance,
    };
    let landed = editor.with_draft_mut(|draft| draft.apply_lookup(key, token, snapshot, offers));
    if !landed {
        debug!(key = %key, "Lookup results discarded as stale");
    }
    Ok(landed)
}

// =============================================================================
// Reference Commands
// =============================================================================

/// Loads the sale screen's reference data in one shot.
///
/// Each collection loads independently: a failed one is reported in
/// `warning` and served from whatever the cache already holds, while
/// the others land normally.
#[tauri::command]
pub async fn load_sale_references(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
) -> Result<SaleReferencesDto, CommandError> {
    debug!("load_sale_references command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let (customers_res, variants_res, units_res, coupons_res) = tokio::join!(
        client.customers().list(&ListQuery::bulk()),
        client.products().list_variants(&ListQuery::bulk()),
        client.units().list(&ListQuery::bulk()),
        client.coupons().list(&ListQuery::bulk()),
    );

    let mut failed = Vec::new();
    references.with_caches_mut(|caches| {
        match customers_res {
            Ok(rows) => caches.customers.merge(rows),
            Err(err) => {
                warn!(error = %err, "Customer reference load failed");
                failed.push("customers");
            }
        }
        match variants_res {
            Ok(rows) => caches.variants.merge(rows),
            Err(err) => {
                warn!(error = %err, "Variant reference load failed");
                failed.push("variants");
            }
        }
        match units_res {
            Ok(rows) => caches.units.merge(rows),
            Err(err) => {
                warn!(error = %err, "Unit reference load failed");
                failed.push("units");
            }
        }
    });

    let coupons = match coupons_res {
        Ok(rows) => rows.into_iter().map(CouponOptionDto::from).collect(),
        Err(err) => {
            warn!(error = %err, "Coupon reference load failed");
            failed.push("coupons");
            Vec::new()
        }
    };

    let warning = if failed.is_empty() {
        None
    } else {
        Some(format!(
            "Could not load {}. Searching will still query the backend directly.",
            failed.join(", ")
        ))
    };

    let (customers, variants, units) = references.with_caches(|caches| {
        (
            caches
                .customers
                .snapshot()
                .iter()
                .map(CustomerRefDto::from)
                .collect::<Vec<_>>(),
            caches
                .variants
                .snapshot()
                .iter()
                .map(VariantRefDto::from)
                .collect::<Vec<_>>(),
            caches
                .units
                .snapshot()
                .iter()
                .map(UnitRefDto::from)
                .collect::<Vec<_>>(),
        )
    });

    info!(
        customers = customers.len(),
        variants = variants.len(),
        units = units.len(),
        coupons = coupons.len(),
        "Sale references loaded"
    );
    Ok(SaleReferencesDto {
        customers,
        variants,
        units,
        coupons,
        warning,
    })
}

/// Searches sellable variants by name.
///
/// Short queries answer from the cache. Backend hits are merged into the
/// cache so a later short query still knows about them. A failed search
/// returns no rows rather than an error: the picker just shows nothing.
#[tauri::command]
pub async fn search_sale_variants(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    query: String,
) -> Result<Vec<VariantRefDto>, CommandError> {
    debug!(query = %query, "search_sale_variants command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let term = query.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Ok(references.with_caches(|caches| {
            caches
                .variants
                .snapshot()
                .iter()
                .map(VariantRefDto::from)
                .collect()
        }));
    }

    let search = ListQuery::search(VariantFilter::Name(term.to_string()));
    match client.products().list_variants(&search).await {
        Ok(rows) => {
            let hits: Vec<VariantRefDto> = rows.iter().map(VariantRefDto::from).collect();
            references.with_caches_mut(|caches| caches.variants.merge(rows));
            Ok(hits)
        }
        Err(err) => {
            warn!(query = %term, error = %err, "Variant search failed");
            Ok(Vec::new())
        }
    }
}

/// Searches customers by name, with the same cache behavior as
/// [`search_sale_variants`].
#[tauri::command]
pub async fn search_order_customers(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    query: String,
) -> Result<Vec<CustomerRefDto>, CommandError> {
    debug!(query = %query, "search_order_customers command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let term = query.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Ok(references.with_caches(|caches| {
            caches
                .customers
                .snapshot()
                .iter()
                .map(CustomerRefDto::from)
                .collect()
        }));
    }

    let search = ListQuery::search(CustomerFilter::Name(term.to_string()));
    match client.customers().list(&search).await {
        Ok(rows) => {
            let hits: Vec<CustomerRefDto> = rows.iter().map(CustomerRefDto::from).collect();
            references.with_caches_mut(|caches| caches.customers.merge(rows));
            Ok(hits)
        }
        Err(err) => {
            warn!(query = %term, error = %err, "Customer search failed");
            Ok(Vec::new())
        }
    }
}

// =============================================================================
// Draft Commands
// =============================================================================

/// Clears the editor and returns the empty draft.
#[tauri::command]
pub fn start_order(order_editor: State<'_, OrderEditorState>) -> OrderDraftDto {
    debug!("start_order command");
    order_editor.with_draft_mut(|draft| {
        draft.reset();
        OrderDraftDto::from(&*draft)
    })
}

/// Returns the draft as it stands.
#[tauri::command]
pub fn get_order_draft(order_editor: State<'_, OrderEditorState>) -> OrderDraftDto {
    debug!("get_order_draft command");
    order_editor.with_draft(|draft| OrderDraftDto::from(&*draft))
}

/// Appends an empty line to the draft.
#[tauri::command]
pub fn add_order_line(
    order_editor: State<'_, OrderEditorState>,
) -> Result<OrderDraftDto, CommandError> {
    debug!("add_order_line command");
    order_editor.with_draft_mut(|draft| {
        draft.add_line()?;
        Ok(OrderDraftDto::from(&*draft))
    })
}

/// Removes a line from the draft.
#[tauri::command]
pub fn remove_order_line(
    order_editor: State<'_, OrderEditorState>,
    key: Uuid,
) -> Result<OrderDraftDto, CommandError> {
    debug!(key = %key, "remove_order_line command");
    order_editor.with_draft_mut(|draft| {
        draft.remove_line(key)?;
        Ok(OrderDraftDto::from(&*draft))
    })
}

/// Changes a line's quantity.
#[tauri::command]
pub fn update_order_quantity(
    order_editor: State<'_, OrderEditorState>,
    key: Uuid,
    quantity: i64,
) -> Result<OrderDraftDto, CommandError> {
    debug!(key = %key, quantity = %quantity, "update_order_quantity command");
    order_editor.with_draft_mut(|draft| {
        draft.update_quantity(key, quantity)?;
        Ok(OrderDraftDto::from(&*draft))
    })
}

/// Changes a line's sale unit.
#[tauri::command]
pub fn set_order_line_unit(
    order_editor: State<'_, OrderEditorState>,
    key: Uuid,
    unit_id: i64,
) -> Result<OrderDraftDto, CommandError> {
    debug!(key = %key, unit_id = %unit_id, "set_order_line_unit command");
    order_editor.with_draft_mut(|draft| {
        draft.set_unit(key, unit_id)?;
        Ok(OrderDraftDto::from(&*draft))
    })
}

/// Applies one of a line's offers, or clears the applied one.
#[tauri::command]
pub fn apply_line_discount(
    order_editor: State<'_, OrderEditorState>,
    key: Uuid,
    offer_id: Option<i64>,
) -> Result<OrderDraftDto, CommandError> {
    debug!(key = %key, offer_id = ?offer_id, "apply_line_discount command");
    order_editor.with_draft_mut(|draft| {
        draft.apply_discount(key, offer_id)?;
        Ok(OrderDraftDto::from(&*draft))
    })
}

/// Attaches or detaches the order's customer.
#[tauri::command]
pub fn set_order_customer(
    order_editor: State<'_, OrderEditorState>,
    customer_id: Option<i64>,
) -> OrderDraftDto {
    debug!(customer_id = ?customer_id, "set_order_customer command");
    order_editor.with_draft_mut(|draft| {
        draft.set_customer(customer_id);
        OrderDraftDto::from(&*draft)
    })
}

/// Attaches or detaches the order's coupon.
#[tauri::command]
pub fn set_order_coupon(
    order_editor: State<'_, OrderEditorState>,
    coupon_id: Option<i64>,
) -> OrderDraftDto {
    debug!(coupon_id = ?coupon_id, "set_order_coupon command");
    order_editor.with_draft_mut(|draft| {
        draft.set_coupon(coupon_id);
        OrderDraftDto::from(&*draft)
    })
}

/// Attaches or detaches the order-level discount reference.
#[tauri::command]
pub fn set_order_discount(
    order_editor: State<'_, OrderEditorState>,
    discount_id: Option<i64>,
) -> OrderDraftDto {
    debug!(discount_id = ?discount_id, "set_order_discount command");
    order_editor.with_draft_mut(|draft| {
        draft.set_discount(discount_id);
        OrderDraftDto::from(&*draft)
    })
}

/// Switches the payment method.
#[tauri::command]
pub fn set_order_payment_method(
    order_editor: State<'_, OrderEditorState>,
    method: PaymentMethod,
) -> OrderDraftDto {
    debug!(method = ?method, "set_order_payment_method command");
    order_editor.with_draft_mut(|draft| {
        draft.set_payment_method(method);
        OrderDraftDto::from(&*draft)
    })
}

// =============================================================================
// Variant Lookup
// =============================================================================

/// Picks a variant for a line and resolves its stock and offers.
///
/// The lookup is token-guarded: when the user re-picks before this round
/// lands, the stale results are dropped and the draft is returned as the
/// newer round left it.
#[tauri::command]
pub async fn select_order_variant(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    order_editor: State<'_, OrderEditorState>,
    key: Uuid,
    variant_id: i64,
) -> Result<OrderDraftDto, CommandError> {
    debug!(key = %key, variant_id = %variant_id, "select_order_variant command");
    let client = (*api).inner();
    require_store_role(client).await?;

    resolve_line_lookup(client, &references, &order_editor, key, variant_id).await?;
    Ok(order_editor.with_draft(|draft| OrderDraftDto::from(&*draft)))
}

// =============================================================================
// Submission and Payment
// =============================================================================

/// Submits the draft as a new PENDING order.
///
/// A draft loaded from a stored order cancels that order first; the
/// backend restocks it, and the submission then recreates it under a new
/// id. When the cancel succeeds but the create fails, the cancel stands
/// and the error surfaces so the cashier can submit again.
#[tauri::command]
pub async fn submit_order(
    api: State<'_, ApiState>,
    order_editor: State<'_, OrderEditorState>,
) -> Result<OrderSubmitDto, CommandError> {
    debug!("submit_order command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let (payload, prior) = order_editor.with_draft(|draft| {
        let blockers = draft.submission_blockers();
        if blockers.is_empty() {
            Ok((draft.to_payload(), draft.order_id))
        } else {
            Err(CommandError::submission_blocked(blockers))
        }
    })?;

    if let Some(old_id) = prior {
        client
            .orders()
            .update(old_id, &OrderUpdatePayload::status(OrderStatus::Cancel))
            .await?;
        // Forget the stored order once it is cancelled so a failed
        // create below does not cancel it a second time on retry.
        order_editor.with_draft_mut(|draft| draft.order_id = None);
        info!(order_id = %old_id, "Stored order cancelled before resubmission");
    }

    let row = client.orders().create(&payload).await?;
    order_editor.with_draft_mut(|draft| draft.order_id = Some(row.id));

    info!(order_id = %row.id, total_amount = %row.total_amount, "Order submitted");
    Ok(OrderSubmitDto {
        order_id: row.id,
        total_amount: row.total_amount,
        recreated_from: prior,
    })
}

/// Previews payment figures for a candidate received amount.
#[tauri::command]
pub fn order_payment_preview(
    order_editor: State<'_, OrderEditorState>,
    amount_received: i64,
) -> Result<PaymentPreview, CommandError> {
    debug!(amount_received = %amount_received, "order_payment_preview command");
    validate_price(amount_received)?;
    let total = order_editor.with_draft(|draft| draft.grand_total());
    Ok(payment::preview(total, Money::new(amount_received)))
}

/// The quick-cash button denominations, smallest first.
#[tauri::command]
pub fn quick_cash_options() -> Vec<i64> {
    QUICK_CASH_DENOMINATIONS.to_vec()
}

/// Completes an order and records its invoice.
///
/// The two writes are not atomic. When the invoice POST fails the order
/// stays COMPLETE and the result carries a warning instead of rolling
/// back.
#[tauri::command]
pub async fn mark_order_paid(
    api: State<'_, ApiState>,
    order_editor: State<'_, OrderEditorState>,
    order_id: i64,
    amount_received: i64,
) -> Result<PaymentResultDto, CommandError> {
    debug!(order_id = %order_id, amount_received = %amount_received, "mark_order_paid command");
    let client = (*api).inner();
    require_store_role(client).await?;
    validate_price(amount_received)?;

    let row = client
        .orders()
        .update(order_id, &OrderUpdatePayload::status(OrderStatus::Complete))
        .await?;
    let preview = payment::preview(Money::new(row.total_amount), Money::new(amount_received));

    let invoice = InvoicePayload {
        order: order_id,
        total_amount: row.total_amount,
        amount_received,
    };
    let invoice_warning = match client.orders().create_invoice(&invoice).await {
        Ok(invoice) => {
            info!(invoice_id = %invoice.id, order_id = %order_id, "Invoice recorded");
            None
        }
        Err(err) => {
            warn!(order_id = %order_id, error = %err, "Order completed but the invoice failed");
            Some(format!(
                "The order was completed but its invoice could not be recorded: {err}"
            ))
        }
    };

    order_editor.with_draft_mut(|draft| {
        if draft.order_id == Some(order_id) {
            draft.reset();
        }
    });

    info!(order_id = %order_id, status = ?preview.status, "Order marked paid");
    Ok(PaymentResultDto {
        order_id,
        status: preview.status,
        received: preview.received.amount(),
        change: preview.change.amount(),
        remaining: preview.remaining.amount(),
        invoice_warning,
    })
}

/// Cancels a PENDING order. The backend restocks its lines.
#[tauri::command]
pub async fn cancel_order(api: State<'_, ApiState>, id: i64) -> Result<OrderDto, CommandError> {
    debug!(id = %id, "cancel_order command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.orders().retrieve(id).await?;
    if !row.status.is_editable() {
        return Err(CoreError::OrderNotEditable {
            order_id: id,
            current_status: row.status.as_str().to_string(),
        }
        .into());
    }

    let updated = client
        .orders()
        .update(id, &OrderUpdatePayload::status(OrderStatus::Cancel))
        .await?;
    info!(order_id = %id, "Order cancelled");
    Ok(OrderDto::from(updated))
}

/// Pulls a stored PENDING order into the editor for line-level changes.
///
/// Every stored line gets a fresh lookup so stock and offers reflect the
/// present, not the order's creation time. A line whose lookup fails
/// stays in the draft without them; picking its variant again retries.
#[tauri::command]
pub async fn load_order_for_edit(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    order_editor: State<'_, OrderEditorState>,
    id: i64,
) -> Result<OrderDraftDto, CommandError> {
    debug!(id = %id, "load_order_for_edit command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.orders().retrieve(id).await?;
    if !row.status.is_editable() {
        return Err(CoreError::OrderNotEditable {
            order_id: id,
            current_status: row.status.as_str().to_string(),
        }
        .into());
    }

    let pending = order_editor.with_draft_mut(|draft| -> CoreResult<Vec<(Uuid, i64)>> {
        draft.reset();
        draft.order_id = Some(row.id);
        draft.set_customer(row.customer);
        draft.set_coupon(row.coupon);
        draft.set_discount(row.discount);
        draft.set_payment_method(row.payment_method);

        let mut pending = Vec::new();
        for detail in &row.details {
            let Some(variant_id) = detail.variant else {
                warn!(detail_id = %detail.id, "Stored line has no variant, skipping");
                continue;
            };
            let key = draft.add_line()?;
            draft.set_unit(key, detail.unit)?;
            draft.update_quantity(key, detail.qty)?;
            pending.push((key, variant_id));
        }
        Ok(pending)
    })?;

    for (key, variant_id) in pending {
        if let Err(err) =
            resolve_line_lookup(client, &references, &order_editor, key, variant_id).await
        {
            warn!(variant_id = %variant_id, error = %err, "Lookup failed while loading the order");
        }
    }

    info!(order_id = %id, "Order loaded for editing");
    Ok(order_editor.with_draft(|draft| OrderDraftDto::from(&*draft)))
}

// =============================================================================
// Stored Orders
// =============================================================================

/// Lists stored orders, newest first as the backend returns them.
#[tauri::command]
pub async fn list_orders(api: State<'_, ApiState>) -> Result<Vec<OrderDto>, CommandError> {
    debug!("list_orders command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let rows = client
        .orders()
        .list(&ListQuery::<NoFilter>::bulk())
        .await?;
    Ok(rows.into_iter().map(OrderDto::from).collect())
}

/// Fetches one stored order with its lines.
#[tauri::command]
pub async fn get_order(api: State<'_, ApiState>, id: i64) -> Result<OrderDto, CommandError> {
    debug!(id = %id, "get_order command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(OrderDto::from(client.orders().retrieve(id).await?))
}

/// Lists settlement invoices.
#[tauri::command]
pub async fn list_invoices(api: State<'_, ApiState>) -> Result<Vec<InvoiceDto>, CommandError> {
    debug!("list_invoices command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let rows = client
        .orders()
        .list_invoices(&ListQuery::<NoFilter>::bulk())
        .await?;
    Ok(rows.into_iter().map(InvoiceDto::from).collect())
}

/// Fetches one invoice.
#[tauri::command]
pub async fn get_invoice(api: State<'_, ApiState>, id: i64) -> Result<InvoiceDto, CommandError> {
    debug!(id = %id, "get_invoice command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(InvoiceDto::from(client.orders().retrieve_invoice(id).await?))
}
