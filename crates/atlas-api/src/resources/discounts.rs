//! # Discounts and Conditions
//!
//! Promotion programs and their purchase conditions.
//!
//! ## Saving an Edited Discount
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  discount fields changed            discount fields untouched           │
//! │  ───────────────────────            ─────────────────────────          │
//! │  one PUT discount/update/{id}/      fan-out on condition/* routes      │
//! │  carrying conditions = the FULL     POST new rows, PUT changed rows,   │
//! │  active set. The backend drops      DELETE removed rows, all in        │
//! │  every stored condition and         flight together; each failure      │
//! │  recreates the submitted rows       surfaces on its own               │
//! │  in one transaction.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `gift_products` is read-only from this side: the backend derives the
//! gift row for a buy-x-get-y program from the discount's own variant and
//! quantities, and rejects the key on writes.

use atlas_core::promotion::{ConditionPayload, ConditionRow};
use atlas_core::types::{DiscountKind, PromotionValueType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{ConditionFilter, DiscountFilter, ListQuery};

// =============================================================================
// Wire Shapes
// =============================================================================

/// A gift line attached to a buy-x-get-y discount, backend-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftRow {
    pub id: i64,
    pub variant: Option<i64>,
    pub qty: i64,
}

/// A discount program with its nested conditions and gifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRow {
    pub id: i64,
    pub discount_name: Option<String>,
    pub discount_type: DiscountKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub promotion_value: Option<i64>,
    pub promotion_value_type: Option<PromotionValueType>,
    pub variant: Option<i64>,
    pub qty: Option<i64>,
    #[serde(default)]
    pub conditions: Vec<ConditionRow>,
    #[serde(default)]
    pub gift_products: Vec<GiftRow>,
}

/// Payload for discount create/update.
///
/// `conditions` is the complete active set, not a delta: on update the
/// backend deletes all stored rows and recreates exactly these, so leaving
/// a loaded row out of the list removes it. There is deliberately no
/// `gift_products` field; sending that key makes the backend error out on
/// both create and update.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountPayload {
    pub discount_name: Option<String>,
    pub discount_type: DiscountKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub promotion_value: Option<i64>,
    pub promotion_value_type: Option<PromotionValueType>,
    pub variant: Option<i64>,
    pub qty: Option<i64>,
    /// Rows carry `discount: None`; the backend stamps the parent itself.
    pub conditions: Vec<ConditionPayload>,
}

// =============================================================================
// Accessor
// =============================================================================

/// Accessor for the discount and condition endpoints.
#[derive(Debug, Clone)]
pub struct Discounts {
    http: HttpClient,
}

impl Discounts {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<DiscountFilter>) -> ApiResult<Vec<DiscountRow>> {
        let mut url = self.http.endpoint("api/discounts/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<DiscountRow> {
        let url = self.http.endpoint(&format!("api/discounts/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &DiscountPayload) -> ApiResult<DiscountRow> {
        let url = self.http.endpoint("api/discounts/")?;
        debug!(
            kind = ?payload.discount_type,
            conditions = payload.conditions.len(),
            "creating discount"
        );
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &DiscountPayload) -> ApiResult<DiscountRow> {
        let url = self.http.endpoint(&format!("api/discount/update/{id}/"))?;
        debug!(id, conditions = payload.conditions.len(), "updating discount");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/discount/delete/{id}/"))?;
        debug!(id, "deleting discount");
        self.http.delete(url).await
    }

    // =========================================================================
    // Condition Primitives
    // =========================================================================

    pub async fn list_conditions(
        &self,
        query: &ListQuery<ConditionFilter>,
    ) -> ApiResult<Vec<ConditionRow>> {
        let mut url = self.http.endpoint("api/condition/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn create_condition(&self, payload: &ConditionPayload) -> ApiResult<ConditionRow> {
        let url = self.http.endpoint("api/condition/")?;
        debug!(discount = ?payload.discount, "creating condition");
        self.http.post(url, payload).await
    }

    pub async fn update_condition(
        &self,
        id: i64,
        payload: &ConditionPayload,
    ) -> ApiResult<ConditionRow> {
        let url = self.http.endpoint(&format!("api/condition/update/{id}/"))?;
        debug!(id, "updating condition");
        self.http.put(url, payload).await
    }

    pub async fn delete_condition(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/condition/delete/{id}/"))?;
        debug!(id, "deleting condition");
        self.http.delete(url).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_row_decodes_buy_x_get_y() {
        let body = r#"{
            "id": 9, "discount_name": "Tea Week", "discount_type": "BUY_X_GET_Y",
            "start_date": "2024-03-01", "end_date": "2024-03-08",
            "usage_limit": 2, "promotion_value": null,
            "promotion_value_type": null, "variant": 14, "qty": 3,
            "conditions": [
                {"id": 7, "min_purchase_qty": 3, "min_purchase_amount": 0, "discount": 9}
            ],
            "gift_products": [
                {"id": 4, "variant": 14, "qty": 6}
            ]
        }"#;
        let row: DiscountRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.discount_type, DiscountKind::BuyXGetY);
        assert_eq!(row.conditions[0].min_purchase_qty, Some(3));
        assert_eq!(row.gift_products[0].qty, 6);
    }

    #[test]
    fn test_discount_row_tolerates_bare_program() {
        // Every discount column except the type is nullable.
        let body = r#"{
            "id": 2, "discount_name": null, "discount_type": "DISCOUNT",
            "start_date": null, "end_date": null, "usage_limit": null,
            "promotion_value": null, "promotion_value_type": null,
            "variant": null, "qty": null
        }"#;
        let row: DiscountRow = serde_json::from_str(body).unwrap();
        assert!(row.conditions.is_empty());
        assert!(row.gift_products.is_empty());
    }

    #[test]
    fn test_payload_never_carries_gift_products() {
        let payload = DiscountPayload {
            discount_name: Some("Tea Week".into()),
            discount_type: DiscountKind::BuyXGetY,
            start_date: Some("2024-03-01".into()),
            end_date: Some("2024-03-08".into()),
            usage_limit: Some(2),
            promotion_value: None,
            promotion_value_type: None,
            variant: Some(14),
            qty: Some(3),
            conditions: vec![ConditionPayload {
                min_purchase_qty: 3,
                min_purchase_amount: 0,
                discount: None,
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("gift_products").is_none());
        assert_eq!(json["conditions"].as_array().unwrap().len(), 1);
    }
}
