//! # Dashboard Commands
//!
//! Revenue buckets for the chart, inventory batches nearing expiry, and
//! the per-variant stock ledger.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::debug;

use crate::commands::auth::require_store_role;
use crate::error::CommandError;
use crate::state::ApiState;
use atlas_core::promotion::parse_wire_date;

use atlas_api::{ExpiryWarningRow, RevenuePeriod, RevenuePoint, RevenueQuery, StockRow};

// =============================================================================
// Ranges
// =============================================================================

/// The chart's range picker.
///
/// Calendar ranges lean on the backend's own bucketing; only the
/// trailing-week range sends an explicit date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevenueRange {
    /// Daily buckets over the trailing seven days, today included.
    #[serde(rename = "LAST_7_DAYS")]
    Last7Days,
    ThisWeek,
    ThisMonth,
    ThisYear,
}

impl RevenueRange {
    fn to_query(self, today: NaiveDate) -> RevenueQuery {
        match self {
            RevenueRange::Last7Days => {
                RevenueQuery::window(RevenuePeriod::Day, today - Duration::days(6), today)
            }
            RevenueRange::ThisWeek => RevenueQuery::period(RevenuePeriod::Week),
            RevenueRange::ThisMonth => RevenueQuery::period(RevenuePeriod::Month),
            RevenueRange::ThisYear => RevenueQuery::period(RevenuePeriod::Year),
        }
    }
}

// =============================================================================
// DTOs
// =============================================================================

/// One revenue bucket for the chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePointDto {
    /// Bucket start date, `YYYY-MM-DD`.
    pub period: String,
    pub total_amount: i64,
}

impl From<RevenuePoint> for RevenuePointDto {
    fn from(point: RevenuePoint) -> Self {
        RevenuePointDto {
            period: point.period,
            total_amount: point.total_amount,
        }
    }
}

/// An inventory batch inside the expiry warning window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryWarningDto {
    pub id: i64,
    pub quantity: i64,
    pub received_date: String,
    pub expiry_date: String,
    pub purchase_price: i64,
    pub variant_name: Option<String>,
    pub unit_name: Option<String>,
    /// Days until expiry; negative once past due, `None` when the
    /// stored date cannot be read.
    pub days_left: Option<i64>,
}

impl ExpiryWarningDto {
    fn from_row(row: ExpiryWarningRow, today: NaiveDate) -> Self {
        let days_left = parse_wire_date(&row.expiry_date).map(|date| (date - today).num_days());
        ExpiryWarningDto {
            id: row.id,
            quantity: row.qty,
            received_date: row.received_date,
            expiry_date: row.expiry_date,
            purchase_price: row.purchase_price,
            variant_name: row.variant_name,
            unit_name: row.unit_name,
            days_left,
        }
    }
}

/// One in/out row of a variant's stock ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDto {
    pub id: i64,
    pub quantity_in: i64,
    pub quantity_out: i64,
    pub balance: i64,
    pub variant_name: Option<String>,
    pub unit_name: Option<String>,
}

impl From<StockRow> for StockDto {
    fn from(row: StockRow) -> Self {
        StockDto {
            id: row.id,
            quantity_in: row.quantity_in,
            quantity_out: row.quantity_out,
            balance: row.balance,
            variant_name: row.variant_name,
            unit_name: row.unit_name,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Revenue buckets for the picked range.
#[tauri::command]
pub async fn revenue_statistics(
    api: State<'_, ApiState>,
    range: RevenueRange,
) -> Result<Vec<RevenuePointDto>, CommandError> {
    debug!(range = ?range, "revenue_statistics command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let today = Local::now().date_naive();
    let points = client.revenue().statistics(&range.to_query(today)).await?;
    Ok(points.into_iter().map(RevenuePointDto::from).collect())
}

/// Inventory batches expiring inside the backend's warning window.
#[tauri::command]
pub async fn expiry_warnings(
    api: State<'_, ApiState>,
) -> Result<Vec<ExpiryWarningDto>, CommandError> {
    debug!("expiry_warnings command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let today = Local::now().date_naive();
    let rows = client.inventory().expiry_warnings().await?;
    Ok(rows
        .into_iter()
        .map(|row| ExpiryWarningDto::from_row(row, today))
        .collect())
}

/// The in/out ledger for one variant. Unknown variants read as an empty
/// ledger, matching the stock endpoint's 404 behavior.
#[tauri::command]
pub async fn variant_stock_ledger(
    api: State<'_, ApiState>,
    variant_id: i64,
) -> Result<Vec<StockDto>, CommandError> {
    debug!(variant_id = %variant_id, "variant_stock_ledger command");
    let client = (*api).inner();
    require_store_role(client).await?;

    let rows = client.inventory().stock_for_variant(variant_id).await?;
    Ok(rows.into_iter().map(StockDto::from).collect())
}
