//! # Promotion Commands
//!
//! Discounts (price cuts and buy-x-get-y programs) and coupons.
//!
//! ## Promotion Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Promotion Lifecycle (client-derived)                 │
//! │                                                                         │
//! │   start date in future          inside window,            end date     │
//! │          │                      uses remaining            passed       │
//! │          ▼                           │                       │         │
//! │     SCHEDULED ──────────────────► ACTIVE ────────────────► EXPIRED     │
//! │                                      │                                  │
//! │                                      ▼ usage limit hits 0               │
//! │                                  DEPLETED                               │
//! │                                                                         │
//! │  The backend stores only the raw window and limit; every list          │
//! │  command derives the badge state at read time.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Saving an Edited Discount
//! Head-field edits go out as one PUT carrying the FULL condition set.
//! Condition-only edits skip the PUT and fan out on the condition
//! endpoints instead; each request stands alone and a failure does not
//! roll back the ones that succeeded.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info, warn};

use crate::commands::auth::require_store_role;
use crate::error::CommandError;
use crate::state::ApiState;
use atlas_core::promotion::{
    diff_conditions, parse_wire_date, promotion_state, ConditionPayload, ConditionRow,
    PromotionState,
};
use atlas_core::validation::{
    validate_coupon_code, validate_date_window, validate_name, validate_percentage,
    validate_quantity, validate_usage_limit,
};
use atlas_core::{DiscountKind, PromotionValueType, ValidationError};

use atlas_api::{
    ConditionFilter, CouponFilter, CouponPayload, CouponRow, DiscountFilter, DiscountPayload,
    DiscountRow, ListQuery,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftDto {
    pub id: i64,
    pub variant_id: Option<i64>,
    pub qty: i64,
}

/// Discount list/detail view with the lifecycle badge pre-computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountDto {
    pub id: i64,
    pub name: Option<String>,
    pub kind: DiscountKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub value: Option<i64>,
    pub value_type: Option<PromotionValueType>,
    pub variant_id: Option<i64>,
    pub qty: Option<i64>,
    pub state: PromotionState,
    pub conditions: Vec<ConditionRow>,
    pub gifts: Vec<GiftDto>,
}

impl From<DiscountRow> for DiscountDto {
    fn from(row: DiscountRow) -> Self {
        let state = window_state(
            row.start_date.as_deref(),
            row.end_date.as_deref(),
            row.usage_limit,
        );
        DiscountDto {
            id: row.id,
            name: row.discount_name,
            kind: row.discount_type,
            start_date: row.start_date,
            end_date: row.end_date,
            usage_limit: row.usage_limit,
            value: row.promotion_value,
            value_type: row.promotion_value_type,
            variant_id: row.variant,
            qty: row.qty,
            state,
            conditions: row.conditions,
            gifts: row
                .gift_products
                .into_iter()
                .map(|g| GiftDto {
                    id: g.id,
                    variant_id: g.variant,
                    qty: g.qty,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDto {
    pub id: i64,
    pub code: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub value: Option<i64>,
    pub value_type: Option<PromotionValueType>,
    pub state: PromotionState,
}

impl From<CouponRow> for CouponDto {
    fn from(row: CouponRow) -> Self {
        let state = window_state(
            row.start_date.as_deref(),
            row.end_date.as_deref(),
            row.usage_limit,
        );
        CouponDto {
            id: row.id,
            code: row.code,
            start_date: row.start_date,
            end_date: row.end_date,
            usage_limit: row.usage_limit,
            value: row.promotion_value,
            value_type: row.promotion_value_type,
            state,
        }
    }
}

/// Outcome of a condition fan-out. `failures` carries one message per
/// request that was refused; the rest went through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSyncDto {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failures: Vec<String>,
}

pub(crate) fn window_state(
    start: Option<&str>,
    end: Option<&str>,
    usage_limit: Option<i64>,
) -> PromotionState {
    let today = Local::now().date_naive();
    promotion_state(
        start.and_then(parse_wire_date),
        end.and_then(parse_wire_date),
        usage_limit,
        today,
    )
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountInput {
    pub name: String,
    pub kind: DiscountKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub value: Option<i64>,
    pub value_type: Option<PromotionValueType>,
    pub variant_id: Option<i64>,
    pub qty: Option<i64>,
    #[serde(default)]
    pub conditions: Vec<ConditionRow>,
}

impl DiscountInput {
    /// Validates the head fields and builds the wire payload.
    ///
    /// `discount_id` is stamped onto the nested condition rows on update
    /// so they attach to their parent; create leaves it to the backend.
    fn into_payload(self, discount_id: Option<i64>) -> Result<DiscountPayload, CommandError> {
        validate_name("discount name", &self.name)?;
        validate_date_window(parse_input_date(&self.start_date)?, parse_input_date(&self.end_date)?)?;
        validate_usage_limit(self.usage_limit)?;

        match self.kind {
            DiscountKind::Discount => {
                let value = self.value.ok_or_else(|| ValidationError::Required {
                    field: "promotion value".to_string(),
                })?;
                if self.value_type == Some(PromotionValueType::Percentage) {
                    validate_percentage(value)?;
                }
            }
            DiscountKind::BuyXGetY => {
                if self.variant_id.is_none() {
                    return Err(ValidationError::Required {
                        field: "purchased variant".to_string(),
                    }
                    .into());
                }
                validate_quantity(self.qty.unwrap_or(0))?;
            }
        }

        let conditions = self
            .conditions
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| ConditionPayload {
                min_purchase_qty: row.min_purchase_qty.unwrap_or(0),
                min_purchase_amount: row.min_purchase_amount.unwrap_or(0),
                discount: discount_id,
            })
            .collect();

        Ok(DiscountPayload {
            discount_name: Some(self.name.trim().to_string()),
            discount_type: self.kind,
            start_date: self.start_date,
            end_date: self.end_date,
            usage_limit: self.usage_limit,
            promotion_value: self.value,
            promotion_value_type: self.value_type,
            variant: self.variant_id,
            qty: self.qty,
            conditions,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponInput {
    pub code: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub value: i64,
    pub value_type: PromotionValueType,
}

impl CouponInput {
    fn into_payload(self) -> Result<CouponPayload, CommandError> {
        validate_coupon_code(&self.code)?;
        validate_date_window(parse_input_date(&self.start_date)?, parse_input_date(&self.end_date)?)?;
        validate_usage_limit(self.usage_limit)?;
        if self.value_type == PromotionValueType::Percentage {
            validate_percentage(self.value)?;
        }

        Ok(CouponPayload {
            code: self.code.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            usage_limit: self.usage_limit,
            promotion_value: Some(self.value),
            promotion_value_type: Some(self.value_type),
        })
    }
}

/// Parses an optional `YYYY-MM-DD` form value.
fn parse_input_date(raw: &Option<String>) -> Result<Option<NaiveDate>, CommandError> {
    match raw.as_deref() {
        None => Ok(None),
        Some(text) => parse_wire_date(text)
            .map(Some)
            .ok_or_else(|| {
                CommandError::from(ValidationError::InvalidFormat {
                    field: "date".to_string(),
                    reason: "expected YYYY-MM-DD".to_string(),
                })
            }),
    }
}

// =============================================================================
// Discounts
// =============================================================================

/// Lists discounts, optionally filtered by name.
#[tauri::command]
pub async fn list_discounts(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<DiscountDto>, CommandError> {
    debug!(search = ?search, "list_discounts command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(DiscountFilter::Name(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.discounts().list(&query).await?;
    Ok(rows.into_iter().map(DiscountDto::from).collect())
}

/// Fetches one discount with its conditions and gift rows.
#[tauri::command]
pub async fn get_discount(api: State<'_, ApiState>, id: i64) -> Result<DiscountDto, CommandError> {
    debug!(id = %id, "get_discount command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(DiscountDto::from(client.discounts().retrieve(id).await?))
}

/// Creates a discount with its nested conditions.
#[tauri::command]
pub async fn create_discount(
    api: State<'_, ApiState>,
    input: DiscountInput,
) -> Result<DiscountDto, CommandError> {
    debug!(name = %input.name, kind = ?input.kind, "create_discount command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.discounts().create(&input.into_payload(None)?).await?;
    info!(id = %row.id, "Discount created");
    Ok(DiscountDto::from(row))
}

/// Updates a discount's head fields in one PUT carrying the full active
/// condition set. The backend replaces every stored condition with the
/// submitted rows.
#[tauri::command]
pub async fn update_discount(
    api: State<'_, ApiState>,
    id: i64,
    input: DiscountInput,
) -> Result<DiscountDto, CommandError> {
    debug!(id = %id, "update_discount command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client
        .discounts()
        .update(id, &input.into_payload(Some(id))?)
        .await?;
    info!(id = %id, "Discount updated");
    Ok(DiscountDto::from(row))
}

/// Applies a condition-only edit as independent create/update/delete
/// requests against the condition endpoints.
///
/// The diff base is the stored set, fetched fresh, so rows another
/// session removed in the meantime are not deleted twice.
///
/// ## User Workflow
/// ```text
/// Stored:  [#7 (qty 2)]  [#9 (qty 5)]
/// Edited:  [#7 (qty 3)]  [new (qty 1)]
///      │
///      ▼
/// diff → update #7, create one row, delete #9
///      │
///      ▼ three independent requests
/// ConditionSyncDto { created: 1, updated: 1, deleted: 1, failures: [] }
/// ```
///
/// A failed request is reported in `failures` and does not undo the
/// requests that already landed.
#[tauri::command]
pub async fn sync_discount_conditions(
    api: State<'_, ApiState>,
    id: i64,
    edited: Vec<ConditionRow>,
) -> Result<ConditionSyncDto, CommandError> {
    debug!(id = %id, "sync_discount_conditions command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let stored = client
        .discounts()
        .list_conditions(&ListQuery::new().with_filter(ConditionFilter::Discount(id)))
        .await?;
    let changes = diff_conditions(&stored, &edited, id);
    let mut outcome = ConditionSyncDto {
        created: 0,
        updated: 0,
        deleted: 0,
        failures: Vec::new(),
    };

    for payload in &changes.create {
        match client.discounts().create_condition(payload).await {
            Ok(_) => outcome.created += 1,
            Err(err) => {
                warn!(discount = %id, error = %err, "Condition create refused");
                outcome.failures.push(CommandError::from(err).message);
            }
        }
    }
    for (condition_id, payload) in &changes.update {
        match client.discounts().update_condition(*condition_id, payload).await {
            Ok(_) => outcome.updated += 1,
            Err(err) => {
                warn!(condition = %condition_id, error = %err, "Condition update refused");
                outcome.failures.push(CommandError::from(err).message);
            }
        }
    }
    for condition_id in &changes.delete {
        match client.discounts().delete_condition(*condition_id).await {
            Ok(_) => outcome.deleted += 1,
            Err(err) => {
                warn!(condition = %condition_id, error = %err, "Condition delete refused");
                outcome.failures.push(CommandError::from(err).message);
            }
        }
    }

    info!(
        id = %id,
        created = %outcome.created,
        updated = %outcome.updated,
        deleted = %outcome.deleted,
        failures = %outcome.failures.len(),
        "Conditions synced"
    );
    Ok(outcome)
}

/// Deletes a discount and its conditions.
#[tauri::command]
pub async fn delete_discount(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_discount command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.discounts().delete(id).await?;
    info!(id = %id, "Discount deleted");
    Ok(())
}

// =============================================================================
// Coupons
// =============================================================================

/// Lists coupons, optionally filtered by code.
#[tauri::command]
pub async fn list_coupons(
    api: State<'_, ApiState>,
    search: Option<String>,
) -> Result<Vec<CouponDto>, CommandError> {
    debug!(search = ?search, "list_coupons command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let query = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => ListQuery::search(CouponFilter::Code(term.to_string())),
        _ => ListQuery::bulk(),
    };
    let rows = client.coupons().list(&query).await?;
    Ok(rows.into_iter().map(CouponDto::from).collect())
}

/// Fetches one coupon.
#[tauri::command]
pub async fn get_coupon(api: State<'_, ApiState>, id: i64) -> Result<CouponDto, CommandError> {
    debug!(id = %id, "get_coupon command");
    let client = (*api).inner();
    require_store_role(client).await?;
    Ok(CouponDto::from(client.coupons().retrieve(id).await?))
}

/// Creates a coupon.
#[tauri::command]
pub async fn create_coupon(
    api: State<'_, ApiState>,
    input: CouponInput,
) -> Result<CouponDto, CommandError> {
    debug!(code = %input.code, "create_coupon command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.coupons().create(&input.into_payload()?).await?;
    info!(id = %row.id, "Coupon created");
    Ok(CouponDto::from(row))
}

/// Updates a coupon.
#[tauri::command]
pub async fn update_coupon(
    api: State<'_, ApiState>,
    id: i64,
    input: CouponInput,
) -> Result<CouponDto, CommandError> {
    debug!(id = %id, "update_coupon command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let row = client.coupons().update(id, &input.into_payload()?).await?;
    info!(id = %id, "Coupon updated");
    Ok(CouponDto::from(row))
}

/// Deletes a coupon.
#[tauri::command]
pub async fn delete_coupon(api: State<'_, ApiState>, id: i64) -> Result<(), CommandError> {
    debug!(id = %id, "delete_coupon command");
    let client = (*api).inner();
    require_store_role(client).await?;

    client.coupons().delete(id).await?;
    info!(id = %id, "Coupon deleted");
    Ok(())
}
