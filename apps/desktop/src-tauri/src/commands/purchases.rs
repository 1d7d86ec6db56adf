//! # Purchase Order Commands
//!
//! Inbound stock: drafting a purchase, receiving it into inventory, or
//! cancelling it. Priced at cost, not sale price.
//!
//! ## Roles
//! Shop owners create purchases; shop owners and warehouse managers view,
//! edit, receive and cancel them. The store roles never see this screen.
//!
//! ## Status Changes
//! A loaded PENDING purchase is edited entirely in the draft. The single
//! update request that flips it to RECEIVE carries the edited lines, so
//! quantity corrections and expiry dates land in the same moment the
//! stock does. CANCELED sends an empty line set.

use serde::Serialize;
use tauri::State;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::auth::{require_purchase_create, require_purchase_view};
use crate::commands::orders::{resolve_variant, UnitRefDto, VariantRefDto, MIN_SEARCH_LEN};
use crate::error::CommandError;
use crate::state::{ApiState, PurchaseDraft, PurchaseEditorState, PurchaseLine, ReferenceState};
use atlas_core::types::PurchaseStatus;
use atlas_core::CoreError;

use atlas_api::{
    ListQuery, NoFilter, PurchaseDetailRow, PurchaseRow, SupplierFilter, SupplierRow, VariantFilter,
};

// =============================================================================
// DTOs
// =============================================================================

/// A supplier as the purchase picker needs it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRefDto {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

impl From<&SupplierRow> for SupplierRefDto {
    fn from(row: &SupplierRow) -> Self {
        SupplierRefDto {
            id: row.id,
            name: row.sup_name.clone(),
            phone: row.sup_phone.clone(),
        }
    }
}

/// Everything the purchase screen's pickers need, in one round trip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReferencesDto {
    pub suppliers: Vec<SupplierRefDto>,
    pub variants: Vec<VariantRefDto>,
    pub units: Vec<UnitRefDto>,
    pub warning: Option<String>,
}

/// One draft line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineDto {
    pub key: Uuid,
    /// Stored row id when the draft was loaded from the backend.
    pub detail_id: Option<i64>,
    pub variant_id: Option<i64>,
    pub variant_name: String,
    pub quantity: i64,
    pub cost_price: i64,
    /// Zero until a purchase unit is chosen.
    pub unit_id: i64,
    pub expiry_date: Option<String>,
    pub line_total: i64,
}

impl From<&PurchaseLine> for PurchaseLineDto {
    fn from(line: &PurchaseLine) -> Self {
        PurchaseLineDto {
            key: line.key,
            detail_id: line.detail_id,
            variant_id: line.variant.as_ref().map(|v| v.id),
            variant_name: line.variant_name(),
            quantity: line.quantity,
            cost_price: line.cost_price,
            unit_id: line.unit_id,
            expiry_date: line.expiry_date.clone(),
            line_total: line.line_total().amount(),
        }
    }
}

/// The full purchase draft, returned by every draft mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraftDto {
    pub purchase_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub status: PurchaseStatus,
    pub lines: Vec<PurchaseLineDto>,
    pub total_amount: i64,
}

impl From<&PurchaseDraft> for PurchaseDraftDto {
    fn from(draft: &PurchaseDraft) -> Self {
        PurchaseDraftDto {
            purchase_id: draft.purchase_id,
            supplier_id: draft.supplier_id,
            employee_id: draft.employee_id,
            status: draft.status,
            lines: draft.lines.iter().map(PurchaseLineDto::from).collect(),
            total_amount: draft.total_amount().amount(),
        }
    }
}

/// One stored purchase line. Expiry dates are write-only on the backend
/// and never appear here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetailDto {
    pub id: i64,
    pub variant_id: Option<i64>,
    pub quantity: i64,
    pub total: i64,
    pub unit_id: i64,
}

impl From<&PurchaseDetailRow> for PurchaseDetailDto {
    fn from(row: &PurchaseDetailRow) -> Self {
        PurchaseDetailDto {
            id: row.id,
            variant_id: row.variant,
            quantity: row.qty,
            total: row.total,
            unit_id: row.unit,
        }
    }
}

/// A stored purchase order for the list and detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub id: i64,
    pub total_amount: i64,
    pub status: PurchaseStatus,
    pub supplier_id: i64,
    pub supplier_name: Option<String>,
    pub employee_id: Option<i64>,
    pub created_at: String,
    pub details: Vec<PurchaseDetailDto>,
}

impl From<PurchaseRow> for PurchaseDto {
    fn from(row: PurchaseRow) -> Self {
        PurchaseDto {
            id: row.id,
            total_amount: row.total_amount,
            status: row.status,
            supplier_id: row.supplier,
            supplier_name: row.supplier_name,
            employee_id: row.employee,
            created_at: row.create_at,
            details: row
                .purchase_details
                .iter()
                .map(PurchaseDetailDto::from)
                .collect(),
        }
    }
}

// =============================================================================
// Reference Commands
// =============================================================================

/// Loads the purchase screen's reference data in one shot. Failed
/// collections are reported in `warning` and served from the cache.
#[tauri::command]
pub async fn load_purchase_references(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
) -> Result<PurchaseReferencesDto, CommandError> {
    debug!("load_purchase_references command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let (suppliers_res, variants_res, units_res) = tokio::join!(
        client.suppliers().list(&ListQuery::bulk()),
        client.products().list_variants(&ListQuery::bulk()),
        client.units().list(&ListQuery::bulk()),
    );

    let mut failed = Vec::new();
    references.with_caches_mut(|caches| {
        match suppliers_res {
            Ok(rows) => caches.suppliers.merge(rows),
            Err(err) => {
                warn!(error = %err, "Supplier reference load failed");
                failed.push("suppliers");
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

    let warning = if failed.is_empty() {
        None
    } else {
        Some(format!(
            "Could not load {}. Searching will still query the backend directly.",
            failed.join(", ")
        ))
    };

    let (suppliers, variants, units) = references.with_caches(|caches| {
        (
            caches
                .suppliers
                .snapshot()
                .iter()
                .map(SupplierRefDto::from)
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
        suppliers = suppliers.len(),
        variants = variants.len(),
        units = units.len(),
        "Purchase references loaded"
    );
    Ok(PurchaseReferencesDto {
        suppliers,
        variants,
        units,
        warning,
    })
}

/// Searches suppliers by name. Short queries answer from the cache;
/// backend hits merge into it; a failed search returns no rows.
#[tauri::command]
pub async fn search_purchase_suppliers(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    query: String,
) -> Result<Vec<SupplierRefDto>, CommandError> {
    debug!(query = %query, "search_purchase_suppliers command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let term = query.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Ok(references.with_caches(|caches| {
            caches
                .suppliers
                .snapshot()
                .iter()
                .map(SupplierRefDto::from)
                .collect()
        }));
    }

    let search = ListQuery::search(SupplierFilter::Name(term.to_string()));
    match client.suppliers().list(&search).await {
        Ok(rows) => {
            let hits: Vec<SupplierRefDto> = rows.iter().map(SupplierRefDto::from).collect();
            references.with_caches_mut(|caches| caches.suppliers.merge(rows));
            Ok(hits)
        }
        Err(err) => {
            warn!(query = %term, error = %err, "Supplier search failed");
            Ok(Vec::new())
        }
    }
}

/// Searches purchasable variants by name, with the same cache behavior
/// as [`search_purchase_suppliers`].
#[tauri::command]
pub async fn search_purchase_variants(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    query: String,
) -> Result<Vec<VariantRefDto>, CommandError> {
    debug!(query = %query, "search_purchase_variants command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

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

// =============================================================================
// Draft Commands
// =============================================================================

/// Clears the editor and returns the empty draft.
#[tauri::command]
pub fn start_purchase(purchase_editor: State<'_, PurchaseEditorState>) -> PurchaseDraftDto {
    debug!("start_purchase command");
    purchase_editor.with_draft_mut(|draft| {
        draft.reset();
        PurchaseDraftDto::from(&*draft)
    })
}

/// Returns the draft as it stands.
#[tauri::command]
pub fn get_purchase_draft(purchase_editor: State<'_, PurchaseEditorState>) -> PurchaseDraftDto {
    debug!("get_purchase_draft command");
    purchase_editor.with_draft(|draft| PurchaseDraftDto::from(&*draft))
}

/// Appends an empty line. Rejected on a draft loaded from a stored
/// purchase, whose line set is fixed.
#[tauri::command]
pub fn add_purchase_line(
    purchase_editor: State<'_, PurchaseEditorState>,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!("add_purchase_line command");
    purchase_editor.with_draft_mut(|draft| {
        draft.add_line()?;
        Ok(PurchaseDraftDto::from(&*draft))
    })
}

/// Removes a line, under the same rule as [`add_purchase_line`].
#[tauri::command]
pub fn remove_purchase_line(
    purchase_editor: State<'_, PurchaseEditorState>,
    key: Uuid,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(key = %key, "remove_purchase_line command");
    purchase_editor.with_draft_mut(|draft| {
        draft.remove_line(key)?;
        Ok(PurchaseDraftDto::from(&*draft))
    })
}

/// Changes a line's quantity.
#[tauri::command]
pub fn update_purchase_quantity(
    purchase_editor: State<'_, PurchaseEditorState>,
    key: Uuid,
    quantity: i64,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(key = %key, quantity = %quantity, "update_purchase_quantity command");
    purchase_editor.with_draft_mut(|draft| {
        draft.update_quantity(key, quantity)?;
        Ok(PurchaseDraftDto::from(&*draft))
    })
}

/// Overrides a line's unit cost.
#[tauri::command]
pub fn set_purchase_cost(
    purchase_editor: State<'_, PurchaseEditorState>,
    key: Uuid,
    cost_price: i64,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(key = %key, cost_price = %cost_price, "set_purchase_cost command");
    purchase_editor.with_draft_mut(|draft| {
        draft.set_cost(key, cost_price)?;
        Ok(PurchaseDraftDto::from(&*draft))
    })
}

/// Changes a line's purchase unit.
#[tauri::command]
pub fn set_purchase_unit(
    purchase_editor: State<'_, PurchaseEditorState>,
    key: Uuid,
    unit_id: i64,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(key = %key, unit_id = %unit_id, "set_purchase_unit command");
    purchase_editor.with_draft_mut(|draft| {
        draft.set_unit(key, unit_id)?;
        Ok(PurchaseDraftDto::from(&*draft))
    })
}

/// Sets or clears a line's expiry date (`YYYY-MM-DD`).
#[tauri::command]
pub fn set_purchase_expiry(
    purchase_editor: State<'_, PurchaseEditorState>,
    key: Uuid,
    expiry_date: Option<String>,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(key = %key, expiry_date = ?expiry_date, "set_purchase_expiry command");
    purchase_editor.with_draft_mut(|draft| {
        draft.set_expiry(key, expiry_date)?;
        Ok(PurchaseDraftDto::from(&*draft))
    })
}

/// Attaches or detaches the supplier.
#[tauri::command]
pub fn set_purchase_supplier(
    purchase_editor: State<'_, PurchaseEditorState>,
    supplier_id: Option<i64>,
) -> PurchaseDraftDto {
    debug!(supplier_id = ?supplier_id, "set_purchase_supplier command");
    purchase_editor.with_draft_mut(|draft| {
        draft.set_supplier(supplier_id);
        PurchaseDraftDto::from(&*draft)
    })
}

/// Picks a variant for a line. New lines take the variant's cost price
/// as their cost; loaded lines keep the stored one.
#[tauri::command]
pub async fn select_purchase_variant(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    purchase_editor: State<'_, PurchaseEditorState>,
    key: Uuid,
    variant_id: i64,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(key = %key, variant_id = %variant_id, "select_purchase_variant command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let token = purchase_editor.with_draft_mut(|draft| draft.begin_variant_lookup(key))?;
    let variant = resolve_variant(client, &references, variant_id).await?;
    match purchase_editor.with_draft_mut(|draft| draft.apply_variant(key, token, variant)) {
        Ok(true) => {}
        Ok(false) => debug!(key = %key, "Variant pick superseded before it landed"),
        Err(CoreError::LineNotFound(_)) => debug!(key = %key, "Line removed during lookup"),
        Err(err) => return Err(err.into()),
    }

    Ok(purchase_editor.with_draft(|draft| PurchaseDraftDto::from(&*draft)))
}

// =============================================================================
// Submission and Transitions
// =============================================================================

/// Submits the draft as a new PENDING purchase. Stock does not move
/// until the purchase is received.
#[tauri::command]
pub async fn submit_purchase(
    api: State<'_, ApiState>,
    purchase_editor: State<'_, PurchaseEditorState>,
) -> Result<PurchaseDto, CommandError> {
    debug!("submit_purchase command");
    let client = (*api).inner();
    require_purchase_create(client).await?;

    let payload = purchase_editor.with_draft(|draft| {
        let blockers = draft.submission_blockers();
        if blockers.is_empty() {
            Ok(draft.to_create_payload()?)
        } else {
            Err(CommandError::submission_blocked(blockers))
        }
    })?;

    let row = client.purchases().create(&payload).await?;
    purchase_editor.with_draft_mut(|draft| draft.reset());

    info!(purchase_id = %row.id, total_amount = %row.total_amount, "Purchase submitted");
    Ok(PurchaseDto::from(row))
}

/// Receives the loaded purchase: one update request carrying the edited
/// lines flips it to RECEIVE, and the backend books one dated inventory
/// batch per line.
#[tauri::command]
pub async fn receive_purchase(
    api: State<'_, ApiState>,
    purchase_editor: State<'_, PurchaseEditorState>,
) -> Result<PurchaseDto, CommandError> {
    debug!("receive_purchase command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let (purchase_id, payload) = purchase_editor.with_draft(|draft| {
        let id = draft
            .purchase_id
            .ok_or_else(|| CommandError::validation("No purchase is loaded"))?;
        let payload = draft.transition_payload(PurchaseStatus::Receive)?;
        Ok::<_, CommandError>((id, payload))
    })?;

    let row = client.purchases().update(purchase_id, &payload).await?;
    purchase_editor.with_draft_mut(|draft| draft.mark_transitioned(PurchaseStatus::Receive));

    info!(purchase_id = %purchase_id, "Purchase received");
    Ok(PurchaseDto::from(row))
}

/// Cancels the loaded purchase. Lines are discarded; stock never moves.
#[tauri::command]
pub async fn cancel_purchase(
    api: State<'_, ApiState>,
    purchase_editor: State<'_, PurchaseEditorState>,
) -> Result<PurchaseDto, CommandError> {
    debug!("cancel_purchase command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let (purchase_id, payload) = purchase_editor.with_draft(|draft| {
        let id = draft
            .purchase_id
            .ok_or_else(|| CommandError::validation("No purchase is loaded"))?;
        let payload = draft.transition_payload(PurchaseStatus::Canceled)?;
        Ok::<_, CommandError>((id, payload))
    })?;

    let row = client.purchases().update(purchase_id, &payload).await?;
    purchase_editor.with_draft_mut(|draft| draft.mark_transitioned(PurchaseStatus::Canceled));

    info!(purchase_id = %purchase_id, "Purchase cancelled");
    Ok(PurchaseDto::from(row))
}

// =============================================================================
// Stored Purchases
// =============================================================================

/// Lists purchase orders.
#[tauri::command]
pub async fn list_purchases(api: State<'_, ApiState>) -> Result<Vec<PurchaseDto>, CommandError> {
    debug!("list_purchases command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let rows = client
        .purchases()
        .list(&ListQuery::<NoFilter>::bulk())
        .await?;
    Ok(rows.into_iter().map(PurchaseDto::from).collect())
}

/// Fetches one purchase with its lines.
#[tauri::command]
pub async fn get_purchase(api: State<'_, ApiState>, id: i64) -> Result<PurchaseDto, CommandError> {
    debug!(id = %id, "get_purchase command");
    let client = (*api).inner();
    require_purchase_view(client).await?;
    Ok(PurchaseDto::from(client.purchases().retrieve(id).await?))
}

/// Pulls a stored PENDING purchase into the editor.
///
/// The line set is fixed from here on: quantities, costs, units and
/// expiry dates may change, but lines cannot be added or removed. A
/// variant whose lookup fails keeps its line; its name just shows as
/// the bare id until the purchase is reloaded.
#[tauri::command]
pub async fn load_purchase_for_edit(
    api: State<'_, ApiState>,
    references: State<'_, ReferenceState>,
    purchase_editor: State<'_, PurchaseEditorState>,
    id: i64,
) -> Result<PurchaseDraftDto, CommandError> {
    debug!(id = %id, "load_purchase_for_edit command");
    let client = (*api).inner();
    require_purchase_view(client).await?;

    let row = client.purchases().retrieve(id).await?;
    let pending = purchase_editor.with_draft_mut(|draft| draft.load_from_row(&row))?;

    for (key, token, variant_id) in pending {
        match resolve_variant(client, &references, variant_id).await {
            Ok(variant) => {
                if let Err(err) =
                    purchase_editor.with_draft_mut(|draft| draft.apply_variant(key, token, variant))
                {
                    warn!(key = %key, error = %err, "Could not apply a loaded line's variant");
                }
            }
            Err(err) => {
                warn!(variant_id = %variant_id, error = %err, "Variant lookup failed while loading the purchase");
            }
        }
    }

    info!(purchase_id = %id, "Purchase loaded for editing");
    Ok(purchase_editor.with_draft(|draft| PurchaseDraftDto::from(&*draft)))
}
