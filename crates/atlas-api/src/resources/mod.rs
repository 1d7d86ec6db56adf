//! # Resource Accessors
//!
//! One accessor per backend resource family. Each accessor is a cheap
//! clone around the shared [`HttpClient`](crate::http::HttpClient) and
//! owns its endpoint paths, wire structs, and write rules.

pub mod attributes;
pub mod categories;
pub mod coupons;
pub mod customers;
pub mod discounts;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod purchases;
pub mod revenue;
pub mod suppliers;
pub mod units;

pub use attributes::{
    AttributeDisplay, AttributePayload, AttributeRow, AttributeValueInput, AttributeValueRow,
    Attributes,
};
pub use categories::{Categories, CategoryPayload, CategoryRow};
pub use coupons::{CouponPayload, CouponRow, Coupons};
pub use customers::{CustomerPayload, CustomerRow, Customers};
pub use discounts::{DiscountPayload, DiscountRow, Discounts, GiftRow};
pub use inventory::{ExpiryWarningRow, Inventory, StockRow};
pub use orders::{
    InvoicePayload, InvoiceRow, OrderCreatePayload, OrderDetailRow, OrderLinePayload, OrderRow,
    OrderUpdatePayload, Orders,
};
pub use products::{
    AttributeDisplayRow, AttributeSelection, ProductPayload, ProductRow, ProductType, Products,
    VariantPayload, VariantRow,
};
pub use purchases::{
    PurchaseCreatePayload, PurchaseDetailRow, PurchaseLinePayload, PurchaseLineUpdate,
    PurchaseRow, PurchaseUpdatePayload, Purchases,
};
pub use revenue::{Revenue, RevenuePoint};
pub use suppliers::{SupplierPayload, SupplierRow, Suppliers};
pub use units::{UnitPayload, UnitRow, Units};
