//! # Products and Variants
//!
//! The catalog's two central resources.
//!
//! ## Variant Expansion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              POST api/products/  (attribute-driven)                     │
//! │                                                                         │
//! │  payload                          backend creates                       │
//! │  ───────                          ───────────────                      │
//! │  prod_name: "Tea"                 Product "Tea"                        │
//! │  prod_price: 10000                  ├─ Variant "Tea (S)"  price 10000  │
//! │  attributes: [                      └─ Variant "Tea (L)"  price 13000  │
//! │    { value: "S", extra 0 },                                            │
//! │    { value: "L", extra 3000 },    (cost price expands the same way)    │
//! │  ]                                                                      │
//! │                                                                         │
//! │  attributes: []              ──►  one variant named after the product  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `attributes` key is write-only and REQUIRED on create and update;
//! an empty list is the no-variants case, not an omission.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{ListQuery, ProductFilter, VariantFilter};

// =============================================================================
// Wire Shapes
// =============================================================================

/// Product kind stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Good,
    Service,
}

impl Default for ProductType {
    fn default() -> Self {
        ProductType::Good
    }
}

/// One expanded attribute value echoed on product reads.
///
/// `default_extra_price` is recomputed by the backend as the variant's
/// price minus the product's base price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDisplayRow {
    pub value: String,
    pub default_extra_price: i64,
    pub order: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: i64,
    pub prod_name: String,
    pub prod_type: ProductType,
    pub barcode: Option<String>,
    pub prod_price: i64,
    pub prod_cost_price: i64,
    pub taxes: i64,
    pub category: i64,
    pub unit: i64,
    pub order: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub total_inventory: i64,
    #[serde(default)]
    pub attributes_display: Vec<AttributeDisplayRow>,
}

/// A sellable variant row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRow {
    pub id: i64,
    pub sku: Option<String>,
    pub variant_name: Option<String>,
    pub variant_price: i64,
    pub variant_cost_price: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub image: Option<String>,
}

/// One attribute value selected for a product write.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeSelection {
    pub value: String,
    pub default_extra_price: i64,
    pub attribute_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for product create/update.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPayload {
    pub prod_name: String,
    pub prod_type: ProductType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub prod_price: i64,
    pub prod_cost_price: i64,
    pub taxes: i64,
    pub category: i64,
    pub unit: i64,
    /// Always sent: the backend requires the key even when empty.
    pub attributes: Vec<AttributeSelection>,
}

/// Payload for direct variant updates.
#[derive(Debug, Clone, Serialize)]
pub struct VariantPayload {
    pub variant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub variant_price: i64,
    pub variant_cost_price: i64,
}

// =============================================================================
// Accessor
// =============================================================================

/// Accessor for the product and variant endpoints.
#[derive(Debug, Clone)]
pub struct Products {
    http: HttpClient,
}

impl Products {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<ProductFilter>) -> ApiResult<Vec<ProductRow>> {
        let mut url = self.http.endpoint("api/products/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<ProductRow> {
        let url = self.http.endpoint(&format!("api/products/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &ProductPayload) -> ApiResult<ProductRow> {
        let url = self.http.endpoint("api/products/")?;
        debug!(name = %payload.prod_name, attributes = payload.attributes.len(), "creating product");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &ProductPayload) -> ApiResult<ProductRow> {
        let url = self.http.endpoint(&format!("api/product/update/{id}/"))?;
        debug!(id, name = %payload.prod_name, "updating product");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/product/delete/{id}/"))?;
        debug!(id, "deleting product");
        self.http.delete(url).await
    }

    pub async fn list_variants(&self, query: &ListQuery<VariantFilter>) -> ApiResult<Vec<VariantRow>> {
        let mut url = self.http.endpoint("api/variants/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve_variant(&self, id: i64) -> ApiResult<VariantRow> {
        let url = self.http.endpoint(&format!("api/variants/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn update_variant(&self, id: i64, payload: &VariantPayload) -> ApiResult<VariantRow> {
        let url = self.http.endpoint(&format!("api/variant/update/{id}/"))?;
        debug!(id, name = %payload.variant_name, "updating variant");
        self.http.put(url, payload).await
    }

    pub async fn delete_variant(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/variant/delete/{id}/"))?;
        debug!(id, "deleting variant");
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
    fn test_product_row_decodes_backend_shape() {
        let body = r#"{
            "id": 3, "prod_name": "Green Tea", "prod_type": "GOOD",
            "barcode": null, "prod_price": 10000, "prod_cost_price": 6000,
            "taxes": 0, "category": 2, "unit": 1, "order": "3", "image": null,
            "total_inventory": 44,
            "attributes_display": [
                {"value": "S", "default_extra_price": 0, "order": "7"},
                {"value": "L", "default_extra_price": 3000, "order": null}
            ]
        }"#;
        let row: ProductRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.prod_type, ProductType::Good);
        assert_eq!(row.total_inventory, 44);
        assert_eq!(row.attributes_display.len(), 2);
        assert_eq!(row.attributes_display[1].default_extra_price, 3000);
    }

    #[test]
    fn test_product_row_tolerates_missing_method_fields() {
        // Create responses may omit the read-only method fields.
        let body = r#"{
            "id": 3, "prod_name": "Green Tea", "prod_type": "SERVICE",
            "barcode": "8934567890123", "prod_price": 10000,
            "prod_cost_price": 6000, "taxes": 8, "category": 2, "unit": 1,
            "order": null, "image": null
        }"#;
        let row: ProductRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.total_inventory, 0);
        assert!(row.attributes_display.is_empty());
    }

    #[test]
    fn test_payload_always_carries_attributes_key() {
        let payload = ProductPayload {
            prod_name: "Plain".into(),
            prod_type: ProductType::Good,
            barcode: None,
            prod_price: 5000,
            prod_cost_price: 3000,
            taxes: 0,
            category: 1,
            unit: 1,
            attributes: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["attributes"], serde_json::json!([]));
        assert!(json.get("barcode").is_none());
    }

    #[test]
    fn test_attribute_selection_serializes_attribute_id() {
        let selection = AttributeSelection {
            value: "L".into(),
            default_extra_price: 3000,
            attribute_id: 4,
            color: None,
        };
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["attribute_id"], 4);
        assert!(json.get("color").is_none());
    }
}
