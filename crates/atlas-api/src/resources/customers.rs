//! # Customers
//!
//! Customer directory. Phone numbers are unique on the backend, so a
//! duplicate create surfaces as a rejection on `cus_phone`. There is no
//! delete endpoint; customers with order history are kept forever.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{CustomerFilter, ListQuery};

/// A customer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: i64,
    pub cus_name: String,
    pub cus_phone: String,
    pub cus_mail: Option<String>,
    pub cus_address: Option<String>,
    pub create_at: String,
    pub tier: Option<i64>,
}

/// Payload for customer create/update.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerPayload {
    pub cus_name: String,
    pub cus_phone: String,
    pub cus_mail: Option<String>,
    pub cus_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<i64>,
}

/// Accessor for the customer endpoints.
#[derive(Debug, Clone)]
pub struct Customers {
    http: HttpClient,
}

impl Customers {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<CustomerFilter>) -> ApiResult<Vec<CustomerRow>> {
        let mut url = self.http.endpoint("api/customers/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<CustomerRow> {
        let url = self.http.endpoint(&format!("api/customers/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &CustomerPayload) -> ApiResult<CustomerRow> {
        let url = self.http.endpoint("api/customers/")?;
        debug!(name = %payload.cus_name, "creating customer");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &CustomerPayload) -> ApiResult<CustomerRow> {
        let url = self.http.endpoint(&format!("api/customer/update/{id}/"))?;
        debug!(id, name = %payload.cus_name, "updating customer");
        self.http.put(url, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_row_decodes_backend_shape() {
        let body = r#"{
            "id": 12, "cus_name": "An Binh", "cus_phone": "0901234567",
            "cus_mail": null, "cus_address": "12 Ly Thuong Kiet",
            "create_at": "2024-03-05", "tier": 2
        }"#;
        let row: CustomerRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.cus_phone, "0901234567");
        assert_eq!(row.tier, Some(2));
    }

    #[test]
    fn test_payload_optional_contact_fields_serialize_null() {
        let payload = CustomerPayload {
            cus_name: "An Binh".into(),
            cus_phone: "0901234567".into(),
            cus_mail: None,
            cus_address: None,
            tier: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["cus_mail"].is_null());
        assert!(json.get("tier").is_none());
    }
}
