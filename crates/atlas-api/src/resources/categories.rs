//! # Categories
//!
//! Flat CRUD over the category tree. Categories nest one level through
//! `parent`; the backend echoes the parent's name read-only.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::query::{CategoryFilter, ListQuery};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: i64,
    pub cate_name: String,
    pub cate_desc: Option<String>,
    pub parent: Option<i64>,
    #[serde(default)]
    pub parent_name: Option<String>,
}

/// Payload for category create/update.
///
/// `parent: None` serializes as `null`, which detaches the category on
/// update rather than leaving it unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub cate_name: String,
    pub cate_desc: Option<String>,
    pub parent: Option<i64>,
}

/// Accessor for the category endpoints.
#[derive(Debug, Clone)]
pub struct Categories {
    http: HttpClient,
}

impl Categories {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery<CategoryFilter>) -> ApiResult<Vec<CategoryRow>> {
        let mut url = self.http.endpoint("api/categories/")?;
        query.apply(&mut url);
        self.http.get_results(url).await
    }

    pub async fn create(&self, payload: &CategoryPayload) -> ApiResult<CategoryRow> {
        let url = self.http.endpoint("api/categories/")?;
        debug!(name = %payload.cate_name, "creating category");
        self.http.post(url, payload).await
    }

    pub async fn update(&self, id: i64, payload: &CategoryPayload) -> ApiResult<CategoryRow> {
        let url = self.http.endpoint(&format!("api/category/update/{id}/"))?;
        debug!(id, name = %payload.cate_name, "updating category");
        self.http.put(url, payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        // The backend route for category delete carries no trailing slash.
        let url = self.http.endpoint(&format!("api/category/delete/{id}"))?;
        debug!(id, "deleting category");
        self.http.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_row_decodes_nested_parent() {
        let body = r#"{
            "id": 5, "cate_name": "Iced Drinks", "cate_desc": null,
            "parent": 1, "parent_name": "Drinks"
        }"#;
        let row: CategoryRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.parent, Some(1));
        assert_eq!(row.parent_name.as_deref(), Some("Drinks"));
    }

    #[test]
    fn test_payload_null_parent_is_explicit() {
        let payload = CategoryPayload {
            cate_name: "Snacks".into(),
            cate_desc: Some("shelf goods".into()),
            parent: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["parent"].is_null());
    }
}
