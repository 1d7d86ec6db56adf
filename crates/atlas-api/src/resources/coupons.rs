//! # Coupons
//!
//! Order-level coupon codes. Unlike discounts, coupon dates are full
//! datetimes on the wire.

use atlas_core::types::PromotionValueType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{CouponFilter, ListQuery};

/// A coupon row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRow {
    pub id: i64,
    pub code: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub promotion_value: Option<i64>,
    pub promotion_value_type: Option<PromotionValueType>,
}

/// Payload for coupon create/update.
#[derive(Debug, Clone, Serialize)]
pub struct CouponPayload {
    pub code: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub usage_limit: Option<i64>,
    pub promotion_value: Option<i64>,
    pub promotion_value_type: Option<PromotionValueType>,
}

/// Accessor for the coupon endpoints.
#[derive(Debug, Clone)]
pub struct Coupons {
    http: HttpClient,
}

impl Coupons {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<CouponFilter>) -> ApiResult<Vec<CouponRow>> {
        let mut url = self.http.endpoint("api/coupons/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn retrieve(&self, id: i64) -> ApiResult<CouponRow> {
        let url = self.http.endpoint(&format!("api/coupons/{id}/"))?;
        self.http.get_one(url).await
    }

    pub async fn create(&self, payload: &CouponPayload) -> ApiResult<CouponRow> {
        let url = self.http.endpoint("api/coupons/")?;
        debug!(code = %payload.code, "creating coupon");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &CouponPayload) -> ApiResult<CouponRow> {
        let url = self.http.endpoint(&format!("api/coupon/update/{id}/"))?;
        debug!(id, code = %payload.code, "updating coupon");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let url = self.http.endpoint(&format!("api/coupon/delete/{id}/"))?;
        debug!(id, "deleting coupon");
        self.http.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_row_decodes_datetime_window() {
        let body = r#"{
            "id": 6, "code": "SUMMER24",
            "start_date": "2024-06-01T00:00:00Z",
            "end_date": "2024-06-30T23:59:59Z",
            "usage_limit": 100, "promotion_value": 10,
            "promotion_value_type": "PERCENTAGE"
        }"#;
        let row: CouponRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.code, "SUMMER24");
        assert_eq!(row.promotion_value_type, Some(PromotionValueType::Percentage));
    }

    #[test]
    fn test_coupon_row_tolerates_bare_code() {
        let body = r#"{
            "id": 7, "code": "VIP", "start_date": null, "end_date": null,
            "usage_limit": null, "promotion_value": null,
            "promotion_value_type": null
        }"#;
        let row: CouponRow = serde_json::from_str(body).unwrap();
        assert!(row.usage_limit.is_none());
    }
}
