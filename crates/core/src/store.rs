//! Store

use jiff::Timestamp;
use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{Span, error, info, warn};

use crate::cart::{Cart, LineItem, MAX_QUANTITY, NewLineItem, QuantityOutcome};
use crate::catalog::{Product, ProductId};
use crate::checkout::{self, CheckoutError, CheckoutForm};
use crate::coupons::{self, Coupon, CouponError};
use crate::orders::{Order, OrderNumber};
use crate::pricing::{self, Totals};
use crate::shipping::ShippingMethod;
use crate::storage::{self, StorageBackend, StorageError, keys};

/// Most entries the recently-viewed list may hold.
pub const RECENTLY_VIEWED_CAP: usize = 10;

/// Most products the compare tray may hold.
pub const COMPARE_CAP: usize = 4;

/// Errors raised while applying a coupon to the cart.
#[derive(Debug, Error)]
pub enum ApplyCouponError {
    /// The code failed lookup or minimum-spend validation.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Persisting the applied coupon failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Summary of a product the customer looked at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedProduct {
    /// Product id.
    pub id: ProductId,

    /// Product name at viewing time.
    pub name: String,

    /// Product image path.
    pub image: String,

    /// Effective price shown to the customer.
    pub price: Decimal,

    /// Category slug.
    pub category: String,
}

impl ViewedProduct {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.effective_price(),
            category: product.category.clone(),
        }
    }
}

/// What adding a product to the compare tray did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOutcome {
    /// The product joined the tray.
    Added,

    /// The product was already in the tray.
    AlreadyListed,

    /// The tray already holds [`COMPARE_CAP`] products.
    TrayFull,
}

/// All mutable storefront state behind one load/save boundary.
///
/// Opened once per session; every mutator writes the affected key back to
/// the backend immediately, so dropping the store loses nothing.
#[derive(Debug)]
pub struct Store<B: StorageBackend> {
    backend: B,
    cart: Cart,
    coupon: Option<Coupon>,
    wishlist: Vec<ProductId>,
    recently_viewed: SmallVec<[ViewedProduct; RECENTLY_VIEWED_CAP]>,
    compare: SmallVec<[ProductId; COMPARE_CAP]>,
}

impl<B: StorageBackend> Store<B> {
    /// Opens a store over `backend`, loading all cached state once.
    ///
    /// Absent keys load as empty state.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if reading or decoding persisted state fails.
    pub fn open(backend: B) -> Result<Self, StorageError> {
        let cart = storage::get_json(&backend, keys::CART)?.unwrap_or_default();
        let coupon = storage::get_json(&backend, keys::APPLIED_COUPON)?;
        let wishlist = storage::get_json(&backend, keys::WISHLIST)?.unwrap_or_default();
        let recently_viewed =
            storage::get_json(&backend, keys::RECENTLY_VIEWED)?.unwrap_or_default();
        let compare = storage::get_json(&backend, keys::COMPARE)?.unwrap_or_default();

        Ok(Self {
            backend,
            cart,
            coupon,
            wishlist,
            recently_viewed,
            compare,
        })
    }

    /// Consumes the store and hands back the backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Returns the cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Returns the live cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns the applied coupon, if any.
    #[must_use]
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Returns the wishlisted product ids in insertion order.
    #[must_use]
    pub fn wishlist(&self) -> &[ProductId] {
        &self.wishlist
    }

    /// Returns the recently viewed products, most recent first.
    #[must_use]
    pub fn recently_viewed(&self) -> &[ViewedProduct] {
        &self.recently_viewed
    }

    /// Returns the compare-tray product ids in insertion order.
    #[must_use]
    pub fn compare(&self) -> &[ProductId] {
        &self.compare
    }

    /// Prices the current cart under the applied coupon and `method`.
    #[must_use]
    pub fn quote(&self, method: ShippingMethod) -> Totals {
        pricing::quote(self.cart.items(), self.coupon.as_ref(), method)
    }

    /// Adds a line to the cart, merging with an existing line for the same
    /// product, and returns the resulting line quantity.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the cart fails.
    #[tracing::instrument(
        name = "till.store.add_item",
        skip(self, new),
        fields(product_id = %new.id),
        err
    )]
    pub fn add_item(&mut self, new: NewLineItem) -> Result<u32, StorageError> {
        let quantity = self.cart.add(new);

        self.persist_cart()?;

        info!(quantity, "added to cart");

        Ok(quantity)
    }

    /// Adds `quantity` of `product` to the cart at its effective price.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the cart fails.
    pub fn add_product(&mut self, product: &Product, quantity: u32) -> Result<u32, StorageError> {
        self.add_item(NewLineItem::from_product(product, quantity))
    }

    /// Sets the quantity of a cart line, clamping to limits.
    ///
    /// A quantity below one removes the line; see [`QuantityOutcome`] for
    /// the clamping rules.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the cart fails.
    pub fn set_quantity(
        &mut self,
        id: ProductId,
        quantity: i64,
    ) -> Result<QuantityOutcome, StorageError> {
        let outcome = self.cart.set_quantity(id, quantity);

        match outcome {
            QuantityOutcome::NotInCart => return Ok(outcome),
            QuantityOutcome::Updated { quantity: updated } => {
                info!(product_id = %id, quantity = updated, "updated quantity");
            }
            QuantityOutcome::Removed => {
                info!(product_id = %id, "removed line on zero quantity");
            }
            QuantityOutcome::ClampedToMax => {
                warn!(product_id = %id, max = MAX_QUANTITY, "clamped quantity to the per-line maximum");
            }
            QuantityOutcome::ClampedToStock { stock } => {
                error!(product_id = %id, stock, "clamped quantity to remaining stock");
            }
        }

        self.persist_cart()?;

        Ok(outcome)
    }

    /// Removes the line for `id`, reporting whether one existed.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the cart fails.
    pub fn remove_item(&mut self, id: ProductId) -> Result<bool, StorageError> {
        if !self.cart.remove(id) {
            return Ok(false);
        }

        self.persist_cart()?;

        info!(product_id = %id, "removed from cart");

        Ok(true)
    }

    /// Empties the cart and drops any applied coupon.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the emptied state fails.
    pub fn clear_cart(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.coupon = None;

        self.persist_cart()?;
        self.persist_coupon()?;

        info!("cleared cart");

        Ok(())
    }

    /// Applies a coupon code to the cart.
    ///
    /// # Errors
    ///
    /// * [`ApplyCouponError::Coupon`] if the code is unknown or the cart
    ///   sits below the coupon's minimum spend.
    /// * [`ApplyCouponError::Storage`] if persisting the coupon fails.
    #[tracing::instrument(
        name = "till.store.apply_coupon",
        skip(self, code),
        fields(code = tracing::field::Empty, subtotal = tracing::field::Empty),
        err
    )]
    pub fn apply_coupon(&mut self, code: &str) -> Result<Coupon, ApplyCouponError> {
        let subtotal = pricing::subtotal(self.cart.items());

        Span::current().record("subtotal", tracing::field::display(subtotal));

        let coupon = coupons::redeem(code, subtotal)?;

        Span::current().record("code", tracing::field::display(&coupon.code));

        self.coupon = Some(coupon.clone());
        self.persist_coupon()?;

        info!(discount = %pricing::discount(subtotal, Some(&coupon)), "applied coupon");

        Ok(coupon)
    }

    /// Drops the applied coupon, reporting whether one was applied.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the removal fails.
    pub fn remove_coupon(&mut self) -> Result<bool, StorageError> {
        if self.coupon.take().is_none() {
            return Ok(false);
        }

        self.persist_coupon()?;

        info!("removed coupon");

        Ok(true)
    }

    /// Moves a cart line into the wishlist.
    ///
    /// Returns `false` when `id` is not in the cart. The wishlist does not
    /// duplicate ids that are already on it.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting either list fails.
    pub fn move_to_wishlist(&mut self, id: ProductId) -> Result<bool, StorageError> {
        if !self.cart.remove(id) {
            return Ok(false);
        }

        if !self.wishlist.contains(&id) {
            self.wishlist.push(id);
            self.persist_wishlist()?;
        }

        self.persist_cart()?;

        info!(product_id = %id, "moved to wishlist");

        Ok(true)
    }

    /// Adds `id` to the wishlist, or removes it if already present.
    ///
    /// Returns `true` when the product ended up wishlisted.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the wishlist fails.
    pub fn toggle_wishlist(&mut self, id: ProductId) -> Result<bool, StorageError> {
        let added = match self.wishlist.iter().position(|entry| *entry == id) {
            Some(position) => {
                self.wishlist.remove(position);
                false
            }
            None => {
                self.wishlist.push(id);
                true
            }
        };

        self.persist_wishlist()?;

        Ok(added)
    }

    /// Records that the customer looked at `product`.
    ///
    /// The list is deduplicated by id, most recent first, and capped at
    /// [`RECENTLY_VIEWED_CAP`] entries.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the list fails.
    pub fn record_view(&mut self, product: &Product) -> Result<(), StorageError> {
        self.recently_viewed.retain(|entry| entry.id != product.id);
        self.recently_viewed
            .insert(0, ViewedProduct::from_product(product));
        self.recently_viewed.truncate(RECENTLY_VIEWED_CAP);

        self.persist_recently_viewed()
    }

    /// Adds `id` to the compare tray unless it is full or already listed.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the tray fails.
    pub fn add_compare(&mut self, id: ProductId) -> Result<CompareOutcome, StorageError> {
        if self.compare.contains(&id) {
            return Ok(CompareOutcome::AlreadyListed);
        }

        if self.compare.len() >= COMPARE_CAP {
            warn!(product_id = %id, "compare tray is full");

            return Ok(CompareOutcome::TrayFull);
        }

        self.compare.push(id);
        self.persist_compare()?;

        Ok(CompareOutcome::Added)
    }

    /// Removes `id` from the compare tray, reporting whether it was there.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the tray fails.
    pub fn remove_compare(&mut self, id: ProductId) -> Result<bool, StorageError> {
        let Some(position) = self.compare.iter().position(|entry| *entry == id) else {
            return Ok(false);
        };

        self.compare.remove(position);
        self.persist_compare()?;

        Ok(true)
    }

    /// Persists the checkout form for the next visit.
    ///
    /// Card details and the terms flag are stripped by the form's wire
    /// format and never reach the backend.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if persisting the form fails.
    pub fn save_checkout_form(&mut self, form: &CheckoutForm) -> Result<(), StorageError> {
        storage::put_json(&mut self.backend, keys::CHECKOUT_DATA, form)
    }

    /// Loads the persisted checkout form, if any.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if reading or decoding the form fails.
    pub fn checkout_form(&self) -> Result<Option<CheckoutForm>, StorageError> {
        storage::get_json(&self.backend, keys::CHECKOUT_DATA)
    }

    /// Loads the order archive, oldest first.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if reading or decoding the archive fails.
    pub fn orders(&self) -> Result<Vec<Order>, StorageError> {
        Ok(storage::get_json(&self.backend, keys::ORDERS)?.unwrap_or_default())
    }

    /// Loads the most recently placed order, if any.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if reading or decoding the order fails.
    pub fn last_order(&self) -> Result<Option<Order>, StorageError> {
        storage::get_json(&self.backend, keys::LAST_ORDER)
    }

    /// Finds an archived order by its human-facing number.
    ///
    /// # Errors
    ///
    /// * [`StorageError`] if reading or decoding the archive fails.
    pub fn find_order(&self, number: &str) -> Result<Option<Order>, StorageError> {
        Ok(self
            .orders()?
            .into_iter()
            .find(|order| order.number.as_str() == number))
    }

    /// Validates the form and turns the cart into an archived order.
    ///
    /// The order is appended to the archive and recorded as the last order
    /// before the cart and coupon are cleared, so the archive always holds
    /// the order first.
    ///
    /// # Errors
    ///
    /// * [`CheckoutError::EmptyCart`] if the cart holds no lines.
    /// * [`CheckoutError::Invalid`] listing every violated form field; the
    ///   cart is left untouched.
    /// * [`CheckoutError::Storage`] if persisting the order fails.
    #[tracing::instrument(
        name = "till.store.place_order",
        skip(self, form, now),
        fields(lines = tracing::field::Empty, order_number = tracing::field::Empty),
        err
    )]
    pub fn place_order(
        &mut self,
        form: &CheckoutForm,
        now: Timestamp,
    ) -> Result<Order, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Span::current().record("lines", tracing::field::display(self.cart.len()));

        let today = now.to_zoned(TimeZone::UTC).date();

        checkout::validate(form, today)?;

        let totals = self.quote(form.shipping_method);
        let number = OrderNumber::generate(&mut rand::thread_rng());
        let order = Order::snapshot(self.cart.items(), totals, form, number, now);

        Span::current().record("order_number", tracing::field::display(&order.number));

        let mut orders = self.orders()?;
        orders.push(order.clone());

        storage::put_json(&mut self.backend, keys::ORDERS, &orders)?;
        storage::put_json(&mut self.backend, keys::LAST_ORDER, &order)?;

        self.cart.clear();
        self.coupon = None;
        self.persist_cart()?;
        self.persist_coupon()?;

        info!(total = %order.totals.total, "placed order");

        Ok(order)
    }

    fn persist_cart(&mut self) -> Result<(), StorageError> {
        storage::put_json(&mut self.backend, keys::CART, &self.cart)
    }

    fn persist_coupon(&mut self) -> Result<(), StorageError> {
        match self.coupon.as_ref() {
            Some(coupon) => storage::put_json(&mut self.backend, keys::APPLIED_COUPON, coupon),
            None => self.backend.remove(keys::APPLIED_COUPON),
        }
    }

    fn persist_wishlist(&mut self) -> Result<(), StorageError> {
        storage::put_json(&mut self.backend, keys::WISHLIST, &self.wishlist)
    }

    fn persist_recently_viewed(&mut self) -> Result<(), StorageError> {
        storage::put_json(&mut self.backend, keys::RECENTLY_VIEWED, &self.recently_viewed)
    }

    fn persist_compare(&mut self) -> Result<(), StorageError> {
        storage::put_json(&mut self.backend, keys::COMPARE, &self.compare)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::{MemoryBackend, MockStorageBackend};

    use super::*;

    fn new_line(id: u32, price: &str, quantity: u32) -> TestResult<NewLineItem> {
        Ok(NewLineItem {
            id: ProductId(id),
            name: format!("Product {id}"),
            unit_price: price.parse()?,
            quantity,
            stock: None,
            image: String::new(),
            sku: None,
        })
    }

    #[test]
    fn an_empty_backend_opens_an_empty_store() -> TestResult {
        let store = Store::open(MemoryBackend::new())?;

        assert!(store.items().is_empty());
        assert_eq!(store.coupon(), None);
        assert!(store.wishlist().is_empty());

        Ok(())
    }

    #[test]
    fn coupons_below_the_minimum_are_not_stored() -> TestResult {
        let mut store = Store::open(MemoryBackend::new())?;

        store.add_item(new_line(1, "80.00", 1)?)?;

        let result = store.apply_coupon("FREE50");

        assert!(matches!(
            result,
            Err(ApplyCouponError::Coupon(CouponError::BelowMinimum { .. }))
        ));
        assert_eq!(store.coupon(), None);

        Ok(())
    }

    #[test]
    fn clearing_the_cart_drops_the_coupon() -> TestResult {
        let mut store = Store::open(MemoryBackend::new())?;

        store.add_item(new_line(1, "60.00", 1)?)?;
        store.apply_coupon("SUMMER25")?;
        store.clear_cart()?;

        assert!(store.items().is_empty());
        assert_eq!(store.coupon(), None);

        Ok(())
    }

    #[test]
    fn quantity_outcomes_pass_through_the_store() -> TestResult {
        let mut store = Store::open(MemoryBackend::new())?;

        store.add_item(new_line(1, "10.00", 1)?)?;

        assert_eq!(
            store.set_quantity(ProductId(1), 150)?,
            QuantityOutcome::ClampedToMax
        );
        assert_eq!(
            store.set_quantity(ProductId(9), 2)?,
            QuantityOutcome::NotInCart
        );

        Ok(())
    }

    #[test]
    fn moving_to_the_wishlist_takes_the_line_out_of_the_cart() -> TestResult {
        let mut store = Store::open(MemoryBackend::new())?;

        store.add_item(new_line(4, "34.99", 1)?)?;

        assert!(store.move_to_wishlist(ProductId(4))?);
        assert!(store.items().is_empty());
        assert_eq!(store.wishlist(), &[ProductId(4)]);

        assert!(!store.move_to_wishlist(ProductId(4))?, "the line is gone now");

        Ok(())
    }

    #[test]
    fn the_compare_tray_enforces_its_cap() -> TestResult {
        let mut store = Store::open(MemoryBackend::new())?;

        for id in 1..=4u32 {
            assert_eq!(store.add_compare(ProductId(id))?, CompareOutcome::Added);
        }

        assert_eq!(
            store.add_compare(ProductId(2))?,
            CompareOutcome::AlreadyListed
        );
        assert_eq!(store.add_compare(ProductId(5))?, CompareOutcome::TrayFull);

        assert!(store.remove_compare(ProductId(2))?);
        assert_eq!(store.add_compare(ProductId(5))?, CompareOutcome::Added);

        Ok(())
    }

    #[test]
    fn backend_write_failures_surface_from_mutators() -> TestResult {
        let mut backend = MockStorageBackend::new();

        backend.expect_read().returning(|_| Ok(None));
        backend
            .expect_write()
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk full"))));

        let mut store = Store::open(backend)?;

        let result = store.add_item(new_line(1, "10.00", 1)?);

        assert!(matches!(result, Err(StorageError::Io(_))));

        Ok(())
    }
}
