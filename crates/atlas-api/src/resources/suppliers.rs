//! # Suppliers
//!
//! Supplier directory feeding the purchase order flow.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{ListQuery, SupplierFilter};

/// A supplier row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRow {
    pub id: i64,
    pub sup_name: String,
    pub contact_person: Option<String>,
    pub sup_phone: String,
    pub sup_mail: String,
    pub sup_add: String,
}

/// Payload for supplier create/update.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierPayload {
    pub sup_name: String,
    pub contact_person: Option<String>,
    pub sup_phone: String,
    pub sup_mail: String,
    pub sup_add: String,
}

/// Accessor for the supplier endpoints.
#[derive(Debug, Clone)]
pub struct Suppliers {
    http: HttpClient,
}

impl Suppliers {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<SupplierFilter>) -> ApiResult<Vec<SupplierRow>> {
        let mut url = self.http.endpoint("api/suppliers/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<SupplierRow> {
        let url = self.http.endpoint(&format!("api/suppliers/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &SupplierPayload) -> ApiResult<SupplierRow> {
        let url = self.http.endpoint("api/suppliers/")?;
        debug!(name = %payload.sup_name, "creating supplier");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &SupplierPayload) -> ApiResult<SupplierRow> {
        let url = self.http.endpoint(&format!("api/supplier/update/{id}/"))?;
        debug!(id, name = %payload.sup_name, "updating supplier");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/supplier/delete/{id}/"))?;
        debug!(id, "deleting supplier");
        self.http.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_row_decodes_backend_shape() {
        let body = r#"{
            "id": 3, "sup_name": "Song Long Beverages",
            "contact_person": null, "sup_phone": "0287779999",
            "sup_mail": "sales@songlong.vn", "sup_add": "KCN Tan Binh"
        }"#;
        let row: SupplierRow = serde_json::from_str(body).unwrap();
        assert!(row.contact_person.is_none());
        assert_eq!(row.sup_name, "Song Long Beverages");
    }
}
