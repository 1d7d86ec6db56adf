//! # Typed Query Builder
//!
//! List-endpoint queries as data instead of string concatenation.
//!
//! ## Why
//! The backend's list endpoints each accept their own filter parameter
//! names (`name`, `phone`, `prod_id`, `category_name`, ...). Building those
//! by hand invites malformed fragments; here every resource gets a filter
//! enum whose variants KNOW their parameter name, and [`ListQuery`] renders
//! them onto a [`Url`] in one place.
//!
//! ## Example
//! ```rust
//! use atlas_api::query::{CustomerFilter, ListQuery, SEARCH_LIMIT};
//!
//! let query = ListQuery::search(CustomerFilter::Name("an".into()));
//! assert_eq!(query.limit(), Some(SEARCH_LIMIT));
//! ```

use chrono::NaiveDate;
use url::Url;

/// Limit used for bulk reference-data loads.
///
/// The backend paginates everything; pages ask for effectively-all rows
/// once on entry and keep the result cached.
pub const BULK_LIMIT: u32 = 100_000;

/// Limit used for incremental search requests.
pub const SEARCH_LIMIT: u32 = 20;

// =============================================================================
// Filter Trait
// =============================================================================

/// A single filter a list endpoint understands.
///
/// Implementations return the backend's exact query-parameter name plus
/// the rendered value.
pub trait Filter {
    fn key_value(&self) -> (&'static str, String);
}

/// Filter slot for list endpoints that accept none. Uninhabited, so a
/// `ListQuery<NoFilter>` can only ever paginate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoFilter {}

impl Filter for NoFilter {
    fn key_value(&self) -> (&'static str, String) {
        match *self {}
    }
}

// =============================================================================
// List Query
// =============================================================================

/// A list request: at most one filter plus limit/offset pagination.
///
/// The backend applies exactly one filter per request (its querysets
/// check parameters in a fixed order and return on the first match), so
/// the builder models one filter slot rather than a conjunction.
#[derive(Debug, Clone)]
pub struct ListQuery<F: Filter> {
    filter: Option<F>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl<F: Filter> Default for ListQuery<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Filter> ListQuery<F> {
    /// An unfiltered, unpaginated query (backend default page size).
    pub fn new() -> Self {
        Self {
            filter: None,
            limit: None,
            offset: None,
        }
    }

    /// The bulk reference-data load: no filter, [`BULK_LIMIT`] rows.
    pub fn bulk() -> Self {
        Self::new().with_limit(BULK_LIMIT)
    }

    /// An incremental search: the given filter, [`SEARCH_LIMIT`] rows.
    pub fn search(filter: F) -> Self {
        Self::new().with_filter(filter).with_limit(SEARCH_LIMIT)
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Renders the query pairs onto the endpoint URL.
    pub(crate) fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(filter) = &self.filter {
            let (key, value) = filter.key_value();
            pairs.append_pair(key, &value);
        }
        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            pairs.append_pair("offset", &offset.to_string());
        }
    }
}

// =============================================================================
// Per-Resource Filters
// =============================================================================

/// Filters understood by `GET /api/products/`.
#[derive(Debug, Clone)]
pub enum ProductFilter {
    /// Product name, case-insensitive substring.
    Name(String),
    /// Product type (`GOOD` or `SERVICE`).
    Type(String),
    /// Category name, case-insensitive substring.
    Category(String),
    /// Exact price.
    Price(i64),
}

impl Filter for ProductFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            ProductFilter::Name(name) => ("name", name.clone()),
            ProductFilter::Type(kind) => ("type", kind.clone()),
            ProductFilter::Category(name) => ("category", name.clone()),
            ProductFilter::Price(price) => ("price", price.to_string()),
        }
    }
}

/// Filters understood by `GET /api/variants/`.
#[derive(Debug, Clone)]
pub enum VariantFilter {
    /// Variant name, case-insensitive substring.
    Name(String),
    /// Owning product's name, case-insensitive substring.
    Product(String),
}

impl Filter for VariantFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            VariantFilter::Name(name) => ("name", name.clone()),
            VariantFilter::Product(name) => ("product", name.clone()),
        }
    }
}

/// Filters understood by `GET /api/categories/`.
///
/// The parameter names differ from every other resource (`category_name`
/// instead of `name`).
#[derive(Debug, Clone)]
pub enum CategoryFilter {
    Name(String),
    /// Categories containing a product whose name matches.
    Product(String),
}

impl Filter for CategoryFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            CategoryFilter::Name(name) => ("category_name", name.clone()),
            CategoryFilter::Product(name) => ("product_name", name.clone()),
        }
    }
}

/// Filters understood by `GET /api/attributes/`.
#[derive(Debug, Clone)]
pub enum AttributeFilter {
    Name(String),
}

impl Filter for AttributeFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            AttributeFilter::Name(name) => ("name", name.clone()),
        }
    }
}

/// Filters understood by `GET /api/units/`.
#[derive(Debug, Clone)]
pub enum UnitFilter {
    Name(String),
}

impl Filter for UnitFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            UnitFilter::Name(name) => ("name", name.clone()),
        }
    }
}

/// Filters understood by `GET /api/customers/`.
#[derive(Debug, Clone)]
pub enum CustomerFilter {
    /// Name, case-insensitive substring.
    Name(String),
    /// Exact phone number (the column is unique).
    Phone(String),
    /// Address, case-insensitive substring.
    Address(String),
    /// Reward-tier name, case-insensitive substring.
    Tier(String),
}

impl Filter for CustomerFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            CustomerFilter::Name(name) => ("name", name.clone()),
            CustomerFilter::Phone(phone) => ("phone", phone.clone()),
            CustomerFilter::Address(address) => ("address", address.clone()),
            CustomerFilter::Tier(tier) => ("tier", tier.clone()),
        }
    }
}

/// Filters understood by `GET /api/suppliers/`.
#[derive(Debug, Clone)]
pub enum SupplierFilter {
    Name(String),
    /// Exact phone number.
    Phone(String),
    Address(String),
    /// Contact person, case-insensitive substring.
    Contact(String),
}

impl Filter for SupplierFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            SupplierFilter::Name(name) => ("name", name.clone()),
            SupplierFilter::Phone(phone) => ("phone", phone.clone()),
            SupplierFilter::Address(address) => ("address", address.clone()),
            SupplierFilter::Contact(contact) => ("contact", contact.clone()),
        }
    }
}

/// Filters understood by `GET /api/discounts/`.
#[derive(Debug, Clone)]
pub enum DiscountFilter {
    /// Discount name, case-insensitive substring.
    Name(String),
    /// Variant name or SKU, case-insensitive substring.
    Product(String),
    /// Discounts attached to exactly this variant id.
    ///
    /// The line editors use this to fetch the offers for a selected
    /// variant; the backend spells the parameter `prod_id`.
    ForVariant(i64),
}

impl Filter for DiscountFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            DiscountFilter::Name(name) => ("name", name.clone()),
            DiscountFilter::Product(name) => ("product", name.clone()),
            DiscountFilter::ForVariant(variant_id) => ("prod_id", variant_id.to_string()),
        }
    }
}

/// Filters understood by `GET /api/coupons/`.
#[derive(Debug, Clone)]
pub enum CouponFilter {
    /// Coupon code, case-insensitive substring.
    Code(String),
}

impl Filter for CouponFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            CouponFilter::Code(code) => ("code", code.clone()),
        }
    }
}

/// Filters understood by `GET /api/condition/`.
#[derive(Debug, Clone)]
pub enum ConditionFilter {
    /// Conditions belonging to the given discount.
    Discount(i64),
}

impl Filter for ConditionFilter {
    fn key_value(&self) -> (&'static str, String) {
        match self {
            ConditionFilter::Discount(id) => ("discount", id.to_string()),
        }
    }
}

// =============================================================================
// Revenue Query
// =============================================================================

/// Grouping granularity for revenue statistics.
///
/// The backend truncates `COMPLETE` order dates with the matching
/// truncation function; anything it does not recognize (including `day`)
/// falls back to monthly grouping, so a "last 7 days" view narrows the
/// window instead and accepts a single aggregated point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenuePeriod {
    Day,
    Week,
    Month,
    Year,
}

impl RevenuePeriod {
    pub(crate) fn as_param(&self) -> &'static str {
        match self {
            RevenuePeriod::Day => "day",
            RevenuePeriod::Week => "week",
            RevenuePeriod::Month => "month",
            RevenuePeriod::Year => "year",
        }
    }
}

/// Parameters for `GET /api/revenue/`.
#[derive(Debug, Clone)]
pub struct RevenueQuery {
    pub period: RevenuePeriod,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RevenueQuery {
    /// Statistics for the given period with no date bounds.
    pub fn period(period: RevenuePeriod) -> Self {
        Self {
            period,
            start_date: None,
            end_date: None,
        }
    }

    /// Statistics bounded to `[start, end]` inclusive.
    pub fn window(period: RevenuePeriod, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            period,
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("period", self.period.as_param());
        if let Some(start) = self.start_date {
            pairs.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
        }
        if let Some(end) = self.end_date {
            pairs.append_pair("end_date", &end.format("%Y-%m-%d").to_string());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:8000/api/things/").unwrap()
    }

    #[test]
    fn test_bulk_query_renders_limit_only() {
        let mut url = base();
        ListQuery::<CustomerFilter>::bulk().apply(&mut url);
        assert_eq!(url.query(), Some("limit=100000"));
    }

    #[test]
    fn test_search_query_renders_filter_then_limit() {
        let mut url = base();
        ListQuery::search(CustomerFilter::Name("an binh".into())).apply(&mut url);
        assert_eq!(url.query(), Some("name=an+binh&limit=20"));
    }

    #[test]
    fn test_offset_is_rendered_last() {
        let mut url = base();
        ListQuery::<CouponFilter>::new()
            .with_limit(50)
            .with_offset(100)
            .apply(&mut url);
        assert_eq!(url.query(), Some("limit=50&offset=100"));
    }

    #[test]
    fn test_category_filter_uses_its_own_parameter_names() {
        assert_eq!(
            CategoryFilter::Name("drinks".into()).key_value(),
            ("category_name", "drinks".to_string())
        );
        assert_eq!(
            CategoryFilter::Product("cola".into()).key_value(),
            ("product_name", "cola".to_string())
        );
    }

    #[test]
    fn test_discount_variant_filter_uses_prod_id() {
        let mut url = base();
        ListQuery::search(DiscountFilter::ForVariant(42))
            .with_limit(100)
            .apply(&mut url);
        assert_eq!(url.query(), Some("prod_id=42&limit=100"));
    }

    #[test]
    fn test_condition_filter_by_discount() {
        assert_eq!(
            ConditionFilter::Discount(9).key_value(),
            ("discount", "9".to_string())
        );
    }

    #[test]
    fn test_supplier_and_customer_filters_share_names() {
        assert_eq!(
            SupplierFilter::Contact("Ngoc".into()).key_value().0,
            "contact"
        );
        assert_eq!(CustomerFilter::Tier("gold".into()).key_value().0, "tier");
        assert_eq!(
            SupplierFilter::Phone("0901234567".into()).key_value().0,
            "phone"
        );
    }

    #[test]
    fn test_revenue_query_without_window() {
        let mut url = Url::parse("http://127.0.0.1:8000/api/revenue/").unwrap();
        RevenueQuery::period(RevenuePeriod::Month).apply(&mut url);
        assert_eq!(url.query(), Some("period=month"));
    }

    #[test]
    fn test_revenue_query_with_window() {
        let mut url = Url::parse("http://127.0.0.1:8000/api/revenue/").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        RevenueQuery::window(RevenuePeriod::Day, start, end).apply(&mut url);
        assert_eq!(
            url.query(),
            Some("period=day&start_date=2024-03-01&end_date=2024-03-07")
        );
    }

    #[test]
    fn test_filter_values_are_percent_encoded() {
        let mut url = base();
        ListQuery::search(SupplierFilter::Name("Cà Phê & Trà".into())).apply(&mut url);
        let query = url.query().unwrap();
        assert!(query.contains("name=C%C3%A0+Ph%C3%AA+%26+Tr%C3%A0"));
    }
}
