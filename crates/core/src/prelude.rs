//! Prelude

pub use crate::cart::{Cart, LineItem, NewLineItem, QuantityOutcome};
pub use crate::catalog::{Catalog, CatalogError, Product, ProductFilter, ProductId, SortKey};
pub use crate::checkout::{CheckoutError, CheckoutForm, FieldErrors};
pub use crate::coupons::{Coupon, CouponError};
pub use crate::orders::{Order, OrderNumber, OrderStatus};
pub use crate::pricing::Totals;
pub use crate::shipping::ShippingMethod;
pub use crate::storage::{JsonFileBackend, MemoryBackend, StorageBackend, StorageError};
pub use crate::store::{ApplyCouponError, CompareOutcome, Store, ViewedProduct};
