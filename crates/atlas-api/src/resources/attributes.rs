//! # Attributes
//!
//! Variant-generating attributes (size, sugar level, topping) and their
//! values. Writes are nested: the attribute payload carries the full value
//! list and the backend reconciles by value text, so an update always
//! submits the complete desired set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{AttributeFilter, ListQuery};

/// How the storefront renders the attribute's value picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeDisplay {
    Radio,
    Selection,
    Color,
}

/// One stored attribute value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValueRow {
    pub id: i64,
    pub value: String,
    pub default_extra_price: Option<i64>,
    pub color: Option<String>,
    pub attribute: Option<i64>,
    pub order: Option<String>,
    pub image: Option<String>,
}

/// An attribute with its nested values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRow {
    pub id: i64,
    pub att_name: String,
    pub display_type: AttributeDisplay,
    #[serde(default)]
    pub values: Vec<AttributeValueRow>,
}

/// One value row in an attribute write.
///
/// `color` and `default_extra_price` must be present even when unused;
/// the backend reads both keys unconditionally on create.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeValueInput {
    pub value: String,
    pub default_extra_price: i64,
    pub color: Option<String>,
}

/// Payload for attribute create/update. `values` is the complete desired
/// set; rows absent from it are deleted server-side on update.
#[derive(Debug, Clone, Serialize)]
pub struct AttributePayload {
    pub att_name: String,
    pub display_type: AttributeDisplay,
    pub values: Vec<AttributeValueInput>,
}

/// Accessor for the attribute endpoints.
#[derive(Debug, Clone)]
pub struct Attributes {
    http: HttpClient,
}

impl Attributes {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<AttributeFilter>) -> ApiResult<Vec<AttributeRow>> {
        let mut url = self.http.endpoint("api/attributes/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn create(&self, payload: &AttributePayload) -> ApiResult<AttributeRow> {
        let url = self.http.endpoint("api/attributes/")?;
        debug!(name = %payload.att_name, values = payload.values.len(), "creating attribute");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &AttributePayload) -> ApiResult<AttributeRow> {
        let url = self.http.endpoint(&format!("api/attribute/update/{id}/"))?;
        debug!(id, name = %payload.att_name, values = payload.values.len(), "updating attribute");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/attribute/delete/{id}/"))?;
        debug!(id, "deleting attribute");
        self.http.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_row_decodes_nested_values() {
        let body = r#"{
            "id": 4, "att_name": "Size", "display_type": "RADIO",
            "values": [
                {"id": 7, "value": "S", "default_extra_price": 0,
                 "color": null, "attribute": 4, "order": "7", "image": null},
                {"id": 8, "value": "L", "default_extra_price": 3000,
                 "color": null, "attribute": 4, "order": "8", "image": null}
            ]
        }"#;
        let row: AttributeRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.display_type, AttributeDisplay::Radio);
        assert_eq!(row.values[1].default_extra_price, Some(3000));
    }

    #[test]
    fn test_value_input_always_serializes_color() {
        let input = AttributeValueInput {
            value: "M".into(),
            default_extra_price: 1500,
            color: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json["color"].is_null());
        assert_eq!(json["default_extra_price"], 1500);
    }

    #[test]
    fn test_display_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttributeDisplay::Selection).unwrap(),
            "\"SELECTION\""
        );
        let parsed: AttributeDisplay = serde_json::from_str("\"COLOR\"").unwrap();
        assert_eq!(parsed, AttributeDisplay::Color);
    }
}
