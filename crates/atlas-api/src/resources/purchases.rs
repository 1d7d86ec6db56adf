//! # Purchase Orders
//!
//! Inbound stock from suppliers.
//!
//! ## Receiving Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST api/purchases/      lines only, stock untouched                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   PENDING ── PUT api/purchases/update/{id}/ ──┬── status RECEIVE       │
//! │       │        rows carry their stored id     │   stock goes up, one   │
//! │       │        and variant; expiry_date is    │   dated batch per line │
//! │       │        consumed at this moment        │                        │
//! │       │                                       └── status CANCELED      │
//! │       ▼                                           nothing moves        │
//! │   RECEIVE / CANCELED are terminal; the backend rejects any further     │
//! │   status change                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `expiry_date` never comes back on reads; the backend only accepts it on
//! the update that flips the order to RECEIVE, where it stamps the new
//! inventory batch.

use atlas_core::types::PurchaseStatus;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{ListQuery, NoFilter};

// =============================================================================
// Wire Shapes
// =============================================================================

/// One stored purchase line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDetailRow {
    pub id: i64,
    pub qty: i64,
    pub total: i64,
    pub unit: i64,
    pub variant: Option<i64>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// A purchase order with its lines.
///
/// `supplier_name` and `status_display` are read-only extras the backend
/// adds to responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRow {
    pub id: i64,
    pub total_amount: i64,
    pub status: PurchaseStatus,
    pub supplier: i64,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub status_display: Option<String>,
    pub employee: Option<i64>,
    #[serde(default)]
    pub purchase_details: Vec<PurchaseDetailRow>,
    pub create_at: String,
}

/// One line in a purchase create. No id yet; the backend assigns one.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseLinePayload {
    pub qty: i64,
    pub total: i64,
    pub unit: i64,
    pub variant: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

/// One line in a purchase update. `id` and `variant` must match a stored
/// row; the backend looks lines up by both and ignores rows it cannot
/// match.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseLineUpdate {
    pub id: i64,
    pub qty: i64,
    pub total: i64,
    pub unit: i64,
    pub variant: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

/// Payload for purchase create.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseCreatePayload {
    pub total_amount: i64,
    pub status: PurchaseStatus,
    pub supplier: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<i64>,
    pub purchase_details: Vec<PurchaseLinePayload>,
}

/// Payload for purchase update.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseUpdatePayload {
    pub total_amount: i64,
    pub status: PurchaseStatus,
    pub supplier: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<i64>,
    pub purchase_details: Vec<PurchaseLineUpdate>,
}

// =============================================================================
// Accessor
// =============================================================================

/// Accessor for the purchase order endpoints.
#[derive(Debug, Clone)]
pub struct Purchases {
    http: HttpClient,
}

impl Purchases {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<NoFilter>) -> ApiResult<Vec<PurchaseRow>> {
        let mut url = self.http.endpoint("api/purchases/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<PurchaseRow> {
        let url = self.http.endpoint(&format!("api/purchases/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &PurchaseCreatePayload) -> ApiResult<PurchaseRow> {
        let url = self.http.endpoint("api/purchases/")?;
        debug!(
            supplier = payload.supplier,
            lines = payload.purchase_details.len(),
            "creating purchase order"
        );
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &PurchaseUpdatePayload) -> ApiResult<PurchaseRow> {
        let url = self.http.endpoint(&format!("api/purchases/update/{id}/"))?;
        debug!(id, status = ?payload.status, "updating purchase order");
        self.http.put(url, payload).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_row_decodes_without_expiry() {
        // Reads never include expiry_date on the lines.
        let body = r#"{
            "id": 8, "total_amount": 480000, "status": "PENDING",
            "supplier": 3, "supplier_name": "Delta Beverages",
            "status_display": "Pending", "employee": null,
            "purchase_details": [
                {"id": 21, "qty": 24, "total": 480000, "unit": 2, "variant": 14}
            ],
            "create_at": "2024-03-02"
        }"#;
        let row: PurchaseRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.status, PurchaseStatus::Pending);
        assert_eq!(row.supplier_name.as_deref(), Some("Delta Beverages"));
        assert!(row.purchase_details[0].expiry_date.is_none());
    }

    #[test]
    fn test_update_line_carries_id_and_expiry() {
        let line = PurchaseLineUpdate {
            id: 21,
            qty: 24,
            total: 480000,
            unit: 2,
            variant: 14,
            expiry_date: Some("2025-01-31".into()),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["id"], 21);
        assert_eq!(json["expiry_date"], "2025-01-31");
    }

    #[test]
    fn test_create_line_omits_absent_expiry() {
        let line = PurchaseLinePayload {
            qty: 24,
            total: 480000,
            unit: 2,
            variant: 14,
            expiry_date: None,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("expiry_date").is_none());
        assert!(json.get("id").is_none());
    }
}
