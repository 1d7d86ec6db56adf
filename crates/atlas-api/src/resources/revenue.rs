//! # Revenue
//!
//! The dashboard's revenue aggregate over completed orders.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::RevenueQuery;

/// One aggregated revenue bucket. `period` is the bucket's start date in
/// `YYYY-MM-DD` form regardless of granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub period: String,
    pub total_amount: i64,
}

/// Accessor for the revenue endpoint.
#[derive(Debug, Clone)]
pub struct Revenue {
    http: HttpClient,
}

impl Revenue {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Revenue buckets for the query's period and optional date window.
    pub async fn statistics(&self, query: &RevenueQuery) -> ApiResult<Vec<RevenuePoint>> {
        let mut url = self.http.endpoint("api/revenue/")?;
        query.apply(&mut url);
        debug!(period = query.period.as_param(), "loading revenue statistics");
        self.http.get_array(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_point_decodes_bucket() {
        let body = r#"[
            {"period": "2024-02-01", "total_amount": 1250000},
            {"period": "2024-03-01", "total_amount": 980000}
        ]"#;
        let points: Vec<RevenuePoint> = serde_json::from_str(body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].total_amount, 1250000);
    }
}
