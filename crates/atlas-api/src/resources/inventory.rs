//! # Inventory
//!
//! Read-only stock views. Stock itself only moves through order and
//! purchase transitions; these endpoints report it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;

/// Running stock totals for one variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    pub id: i64,
    pub quantity_in: i64,
    pub quantity_out: i64,
    pub balance: i64,
    pub variant_name: Option<String>,
    pub unit_name: Option<String>,
}

/// A dated inventory batch inside the expiry warning window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryWarningRow {
    pub id: i64,
    pub qty: i64,
    pub received_date: String,
    pub expiry_date: String,
    pub purchase_price: i64,
    pub variant_name: Option<String>,
    pub unit_name: Option<String>,
}

/// Accessor for the inventory endpoints.
#[derive(Debug, Clone)]
pub struct Inventory {
    http: HttpClient,
}

impl Inventory {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Stock rows for one variant.
    ///
    /// The backend answers 404 when the variant has no inventory record
    /// at all; that reads as zero stock here, not as an error.
    pub async fn stock_for_variant(&self, variant_id: i64) -> ApiResult<Vec<StockRow>> {
        let mut url = self.http.endpoint("api/quantity_by_attribute/")?;
        url.query_pairs_mut()
            .append_pair("variant_id", &variant_id.to_string());

        match self.http.get_array(url).await {
            Ok(rows) => Ok(rows),
            Err(err) if err.is_status(404) => {
                debug!(variant_id, "no inventory record, reporting zero stock");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Batches expiring within the backend's ten-day warning window.
    pub async fn expiry_warnings(&self) -> ApiResult<Vec<ExpiryWarningRow>> {
        let url = self.http.endpoint("api/expiry_warning/")?;
        self.http.get_array(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_row_decodes_backend_shape() {
        let body = r#"{
            "id": 4, "quantity_in": 48, "quantity_out": 4, "balance": 44,
            "variant_name": "Green Tea (L)", "unit_name": "can"
        }"#;
        let row: StockRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.balance, 44);
    }

    #[test]
    fn test_expiry_row_decodes_batch() {
        let body = r#"{
            "id": 11, "qty": 20, "received_date": "2024-03-02",
            "expiry_date": "2024-03-09", "purchase_price": 9000,
            "variant_name": "Green Tea (L)", "unit_name": "can"
        }"#;
        let row: ExpiryWarningRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.expiry_date, "2024-03-09");
        assert_eq!(row.purchase_price, 9000);
    }
}
