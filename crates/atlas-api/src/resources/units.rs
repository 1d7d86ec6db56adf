//! # Units
//!
//! Units of measure. A unit may reference a base unit with a conversion
//! factor (`contains`), e.g. "box" contains 24 of "can".

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{ListQuery, UnitFilter};

/// A unit of measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRow {
    pub id: i64,
    pub unit_name: String,
    pub contains: Option<f64>,
    pub reference_unit: Option<i64>,
    #[serde(default)]
    pub reference_unit_name: Option<String>,
}

/// Payload for unit create/update.
#[derive(Debug, Clone, Serialize)]
pub struct UnitPayload {
    pub unit_name: String,
    pub contains: Option<f64>,
    pub reference_unit: Option<i64>,
}

/// Accessor for the unit endpoints.
#[derive(Debug, Clone)]
pub struct Units {
    http: HttpClient,
}

impl Units {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<UnitFilter>) -> ApiResult<Vec<UnitRow>> {
        let mut url = self.http.endpoint("api/units/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn create(&self, payload: &UnitPayload) -> ApiResult<UnitRow> {
        let url = self.http.endpoint("api/units/")?;
        debug!(name = %payload.unit_name, "creating unit");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &UnitPayload) -> ApiResult<UnitRow> {
        let url = self.http.endpoint(&format!("api/unit/update/{id}/"))?;
        debug!(id, name = %payload.unit_name, "updating unit");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/unit/delete/{id}/"))?;
        debug!(id, "deleting unit");
        self.http.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_row_decodes_base_unit() {
        let body = r#"{
            "id": 1, "unit_name": "can", "contains": null,
            "reference_unit": null
        }"#;
        let row: UnitRow = serde_json::from_str(body).unwrap();
        assert!(row.contains.is_none());
        assert!(row.reference_unit_name.is_none());
    }

    #[test]
    fn test_unit_row_decodes_derived_unit() {
        let body = r#"{
            "id": 2, "unit_name": "box", "contains": 24.0,
            "reference_unit": 1, "reference_unit_name": "box"
        }"#;
        let row: UnitRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.contains, Some(24.0));
        assert_eq!(row.reference_unit, Some(1));
    }
}
