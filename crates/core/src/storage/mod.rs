//! Storage

pub mod file;
pub mod memory;

use mockall::automock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Well-known keys for persisted store state.
pub mod keys {
    /// Cart line items.
    pub const CART: &str = "cart";

    /// Applied coupon, absent when none is applied.
    pub const APPLIED_COUPON: &str = "appliedCoupon";

    /// Wishlist product ids.
    pub const WISHLIST: &str = "wishlist";

    /// Recently viewed product summaries.
    pub const RECENTLY_VIEWED: &str = "recentlyViewed";

    /// Compare-tray product ids.
    pub const COMPARE: &str = "compare";

    /// Last-entered checkout form fields.
    pub const CHECKOUT_DATA: &str = "checkoutData";

    /// Order archive, oldest first.
    pub const ORDERS: &str = "orders";

    /// Most recently placed order.
    pub const LAST_ORDER: &str = "lastOrder";
}

/// Errors raised at the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("storage backend failed: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value could not be encoded or decoded.
    #[error("failed to encode or decode persisted value: {0}")]
    Json(#[from] serde_json::Error),

    /// The key cannot be used with this backend.
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// A keyed blob store holding the persisted storefront state.
#[automock]
pub trait StorageBackend {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Io`] if the backing medium fails.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Io`] if the backing medium fails.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`; removing an absent key is fine.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Io`] if the backing medium fails.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Reads and decodes the JSON value under `key`, if present.
///
/// # Errors
///
/// * [`StorageError::Io`] if the backend fails to read.
/// * [`StorageError::Json`] if the stored value does not decode as `T`.
pub fn get_json<B, T>(backend: &B, key: &str) -> Result<Option<T>, StorageError>
where
    B: StorageBackend + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = backend.read(key)? else {
        return Ok(None);
    };

    Ok(Some(serde_json::from_str(&raw)?))
}

/// Encodes `value` as JSON and writes it under `key`.
///
/// # Errors
///
/// * [`StorageError::Io`] if the backend fails to write.
/// * [`StorageError::Json`] if `value` cannot be encoded.
pub fn put_json<B, T>(backend: &mut B, key: &str, value: &T) -> Result<(), StorageError>
where
    B: StorageBackend + ?Sized,
    T: Serialize,
{
    backend.write(key, &serde_json::to_string(value)?)
}
