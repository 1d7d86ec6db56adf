//! # atlas-api: Backend Client for Atlas Back Office
//!
//! This crate is the REST client for the Atlas backend. It owns the
//! endpoint map, the wire structs, authentication, and the translation of
//! backend rejections into typed errors.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Atlas Back Office Data Flow                        │
//! │                                                                         │
//! │  Tauri Command (list_products)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     atlas-api (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   ApiClient   │    │   Resources   │    │   Session    │  │   │
//! │  │   │   (lib.rs)    │    │ (products.rs) │    │ (session.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ HttpClient    │◄───│ Products      │    │ login        │  │   │
//! │  │   │ base URL      │    │ Orders        │    │ refresh      │  │   │
//! │  │   │ bearer slot   │    │ Discounts ... │    │ claims       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Atlas REST Backend (Django)                    │   │
//! │  │   http://<host>/api/...   JWT bearer auth                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`http`] - Shared HTTP client, status discipline, results envelope
//! - [`query`] - List filters and pagination builders
//! - [`session`] - Login, token refresh, decoded session context
//! - [`error`] - API error types and rejection-body parsing
//! - [`resources`] - One accessor per backend resource family
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atlas_api::{ApiClient, ListQuery, ProductFilter};
//!
//! let client = ApiClient::new("http://127.0.0.1:8000")?;
//! client.session().login("admin", "secret").await?;
//!
//! let products = client
//!     .products()
//!     .list(&ListQuery::search(ProductFilter::Name("tea".into())))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod http;
pub mod query;
pub mod resources;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ApiError, ApiResult};
pub use query::{
    AttributeFilter, CategoryFilter, ConditionFilter, CouponFilter, CustomerFilter,
    DiscountFilter, ListQuery, NoFilter, ProductFilter, RevenuePeriod, RevenueQuery,
    SupplierFilter, UnitFilter, VariantFilter, BULK_LIMIT, SEARCH_LIMIT,
};
pub use resources::*;
pub use session::SessionManager;

use http::HttpClient;

// =============================================================================
// Api Client
// =============================================================================

/// Handle to the Atlas backend.
///
/// Cheap to clone; every clone and every accessor shares one connection
/// pool and one bearer token slot, so a login anywhere authenticates
/// requests everywhere.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    session: SessionManager,
}

impl ApiClient {
    /// Creates a client against the given backend base URL.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let client = ApiClient::new("http://127.0.0.1:8000")?;
    /// ```
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let http = HttpClient::new(base_url)?;
        let session = SessionManager::new(http.clone());
        Ok(Self { http, session })
    }

    /// Returns the session manager.
    ///
    /// ## Example
    /// ```rust,ignore
    /// client.session().login("admin", "secret").await?;
    /// ```
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Returns the product and variant accessor.
    pub fn products(&self) -> Products {
        Products::new(self.http.clone())
    }

    /// Returns the category accessor.
    pub fn categories(&self) -> Categories {
        Categories::new(self.http.clone())
    }

    /// Returns the attribute accessor.
    pub fn attributes(&self) -> Attributes {
        Attributes::new(self.http.clone())
    }

    /// Returns the unit accessor.
    pub fn units(&self) -> Units {
        Units::new(self.http.clone())
    }

    /// Returns the customer accessor.
    pub fn customers(&self) -> Customers {
        Customers::new(self.http.clone())
    }

    /// Returns the supplier accessor.
    pub fn suppliers(&self) -> Suppliers {
        Suppliers::new(self.http.clone())
    }

    /// Returns the discount and condition accessor.
    pub fn discounts(&self) -> Discounts {
        Discounts::new(self.http.clone())
    }

    /// Returns the coupon accessor.
    pub fn coupons(&self) -> Coupons {
        Coupons::new(self.http.clone())
    }

    /// Returns the order and invoice accessor.
    pub fn orders(&self) -> Orders {
        Orders::new(self.http.clone())
    }

    /// Returns the purchase order accessor.
    pub fn purchases(&self) -> Purchases {
        Purchases::new(self.http.clone())
    }

    /// Returns the inventory accessor.
    pub fn inventory(&self) -> Inventory {
        Inventory::new(self.http.clone())
    }

    /// Returns the revenue accessor.
    pub fn revenue(&self) -> Revenue {
        Revenue::new(self.http.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_clones_share_bearer_slot() {
        let client = ApiClient::new("http://127.0.0.1:8000").unwrap();
        let clone = client.clone();

        client.http.set_bearer(Some("token-a".into())).await;
        assert_eq!(clone.http.bearer().await.as_deref(), Some("token-a"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
