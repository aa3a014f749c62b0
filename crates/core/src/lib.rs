//! Till
//!
//! Client-side engine of a demo storefront: catalog querying, a persistent
//! shopping cart with coupons, deterministic pricing, checkout validation
//! and an order archive, all behind a pluggable key-value storage boundary.
//!
//! State lives in a [`store::Store`] opened over a [`storage::StorageBackend`];
//! every mutation is written back through the backend immediately, so a
//! reopened store picks up exactly where the previous session stopped.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod fixtures;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod shipping;
pub mod storage;
pub mod store;
