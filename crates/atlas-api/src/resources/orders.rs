//! # Orders and Invoices
//!
//! Sales orders and their settlement invoices.
//!
//! ## Order Lifecycle on the Wire
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST api/orders/          backend forces status PENDING, reprices     │
//! │       │                    every line from the stored variant price,   │
//! │       ▼                    checks stock, burns promotion usage         │
//! │  PENDING ──────────────┐                                               │
//! │       │                │                                               │
//! │  PUT order/update/{id} │   body {status: "COMPLETE"} plus              │
//! │       │                │   POST api/invoices/ settles payment;        │
//! │       ▼                ▼   body {status: "CANCEL"} restocks            │
//! │   COMPLETE          CANCEL                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order updates never carry the `details` key: the backend assigns the
//! raw list onto the reverse relation and errors out when it is present.
//! Line edits on a pending order go through a delete-and-recreate of the
//! order itself.

use atlas_core::types::{OrderStatus, PaymentMethod, PaymentStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{ListQuery, NoFilter};

// =============================================================================
// Wire Shapes
// =============================================================================

/// One stored order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailRow {
    pub id: i64,
    pub order: Option<i64>,
    pub variant: Option<i64>,
    pub qty: i64,
    pub total: i64,
    pub unit: i64,
}

/// A sales order with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: i64,
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    pub order_date: String,
    pub status: OrderStatus,
    pub customer: Option<i64>,
    pub coupon: Option<i64>,
    pub discount: Option<i64>,
    pub employee: Option<i64>,
    #[serde(default)]
    pub details: Vec<OrderDetailRow>,
}

/// One line in an order create.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLinePayload {
    pub variant: i64,
    pub qty: i64,
    /// Client-side line total. The backend recomputes it from the stored
    /// variant price and keeps its own figure.
    pub total: i64,
    pub unit: i64,
}

/// Payload for order create.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreatePayload {
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub customer: Option<i64>,
    pub coupon: Option<i64>,
    pub discount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<i64>,
    pub details: Vec<OrderLinePayload>,
}

/// Payload for order update. Only the populated fields reach the wire,
/// and there is no `details` slot at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
}

impl OrderUpdatePayload {
    /// The minimal status transition body.
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A settlement invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub id: i64,
    pub order: i64,
    pub payment_status: PaymentStatus,
    pub create_at: String,
    pub total_amount: i64,
    pub amount_received: i64,
    pub amount_change: i64,
}

/// Payload for invoice create. `payment_status` and `amount_change` are
/// read-only and derived server-side.
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePayload {
    pub order: i64,
    pub total_amount: i64,
    pub amount_received: i64,
}

// =============================================================================
// Accessor
// =============================================================================

/// Accessor for the order and invoice endpoints.
#[derive(Debug, Clone)]
pub struct Orders {
    http: HttpClient,
}

impl Orders {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<NoFilter>) -> ApiResult<Vec<OrderRow>> {
        let mut url = self.http.endpoint("api/orders/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<OrderRow> {
        let url = self.http.endpoint(&format!("api/orders/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &OrderCreatePayload) -> ApiResult<OrderRow> {
        let url = self.http.endpoint("api/orders/")?;
        debug!(
            lines = payload.details.len(),
            total = payload.total_amount,
            "creating order"
        );
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &OrderUpdatePayload) -> ApiResult<OrderRow> {
        let url = self.http.endpoint(&format!("api/order/update/{id}/"))?;
        debug!(id, status = ?payload.status, "updating order");
        self.http.put(url, payload).await
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    pub async fn list_invoices(&self, query: &ListQuery<NoFilter>) -> ApiResult<Vec<InvoiceRow>> {
        let mut url = self.http.endpoint("api/invoices/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve_invoice(&self, id: i64) -> ApiResult<InvoiceRow> {
        let url = self.http.endpoint(&format!("api/invoices/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create_invoice(&self, payload: &InvoicePayload) -> ApiResult<InvoiceRow> {
        let url = self.http.endpoint("api/invoices/")?;
        debug!(
            order = payload.order,
            received = payload.amount_received,
            "creating invoice"
        );
        self.http.post(url, payload).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_row_decodes_backend_shape() {
        let body = r#"{
            "id": 31, "total_amount": 86000, "payment_method": "CASH",
            "order_date": "2024-03-07", "status": "PENDING",
            "customer": 12, "coupon": null, "discount": 9, "employee": null,
            "details": [
                {"id": 70, "order": 31, "variant": 14, "qty": 2,
                 "total": 26000, "unit": 1}
            ]
        }"#;
        let row: OrderRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.status, OrderStatus::Pending);
        assert_eq!(row.details[0].variant, Some(14));
    }

    #[test]
    fn test_update_payload_never_includes_details() {
        let payload = OrderUpdatePayload::status(OrderStatus::Complete);
        let json = serde_json::to_value(&payload).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["status"], "COMPLETE");
    }

    #[test]
    fn test_create_payload_carries_lines_and_nullable_heads() {
        let payload = OrderCreatePayload {
            total_amount: 26000,
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Pending,
            customer: None,
            coupon: None,
            discount: None,
            employee: None,
            details: vec![OrderLinePayload {
                variant: 14,
                qty: 2,
                total: 26000,
                unit: 1,
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["customer"].is_null());
        assert!(json.get("employee").is_none());
        assert_eq!(json["details"][0]["variant"], 14);
    }

    #[test]
    fn test_invoice_row_decodes_settlement() {
        let body = r#"{
            "id": 5, "order": 31, "payment_status": "PAID",
            "create_at": "2024-03-07", "total_amount": 86000,
            "amount_received": 90000, "amount_change": 4000
        }"#;
        let row: InvoiceRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.payment_status, PaymentStatus::Paid);
        assert_eq!(row.amount_change, 4000);
    }
}
