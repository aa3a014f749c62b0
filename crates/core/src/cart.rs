//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductId};

/// Highest quantity a single cart line may hold.
pub const MAX_QUANTITY: u32 = 99;

/// A single product line in the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product the line refers to.
    pub id: ProductId,

    /// Product name captured when the line was created.
    pub name: String,

    /// Price per unit at the time the product was added.
    #[serde(rename = "price")]
    pub unit_price: Decimal,

    /// Units of the product in the cart, in `1..=MAX_QUANTITY`.
    pub quantity: u32,

    /// Stock level recorded when the product was added, if tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// Product image path for presentation.
    #[serde(default)]
    pub image: String,

    /// Stock-keeping unit, if the product declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl LineItem {
    /// Returns `unit_price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Fields required to open a new cart line.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLineItem {
    /// Product the line will refer to.
    pub id: ProductId,

    /// Product name to capture on the line.
    pub name: String,

    /// Price per unit to charge.
    pub unit_price: Decimal,

    /// Requested quantity; clamped into `1..=MAX_QUANTITY` on add.
    pub quantity: u32,

    /// Stock level to record on the line, if tracked.
    pub stock: Option<u32>,

    /// Product image path.
    pub image: String,

    /// Stock-keeping unit, if any.
    pub sku: Option<String>,
}

impl NewLineItem {
    /// Builds a line for `product` at its effective (sale) price.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.effective_price(),
            quantity,
            stock: product.stock,
            image: product.image.clone(),
            sku: product.specs.get("sku").cloned(),
        }
    }
}

/// What [`Cart::set_quantity`] did to the targeted line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// No line with the given product id exists.
    NotInCart,

    /// The line now holds the requested quantity.
    Updated {
        /// Quantity the line was set to.
        quantity: u32,
    },

    /// A quantity below one removed the line.
    Removed,

    /// The request exceeded [`MAX_QUANTITY`] and was clamped to it.
    ClampedToMax,

    /// The request exceeded the recorded stock and was clamped to it.
    ClampedToStock {
        /// Stock level the quantity was clamped to.
        stock: u32,
    },
}

/// Ordered collection of cart lines, unique by product id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over the cart lines.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Returns the total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Returns the line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns `true` if a line for `id` exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Adds `new` to the cart and returns the resulting line quantity.
    ///
    /// A line with the same product id absorbs the quantity instead of
    /// duplicating; quantities are clamped into `1..=MAX_QUANTITY`.
    pub fn add(&mut self, new: NewLineItem) -> u32 {
        let increment = new.quantity.clamp(1, MAX_QUANTITY);

        if let Some(item) = self.items.iter_mut().find(|item| item.id == new.id) {
            item.quantity = item.quantity.saturating_add(increment).min(MAX_QUANTITY);

            return item.quantity;
        }

        self.items.push(LineItem {
            id: new.id,
            name: new.name,
            unit_price: new.unit_price,
            quantity: increment,
            stock: new.stock,
            image: new.image,
            sku: new.sku,
        });

        increment
    }

    /// Sets the quantity of the line for `id`, clamping as needed.
    ///
    /// A quantity below one removes the line. Requests above
    /// [`MAX_QUANTITY`], or above the line's recorded stock when that stock
    /// is positive, are clamped rather than rejected; the returned
    /// [`QuantityOutcome`] reports what happened.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> QuantityOutcome {
        let Some(position) = self.items.iter().position(|item| item.id == id) else {
            return QuantityOutcome::NotInCart;
        };

        if quantity < 1 {
            self.items.remove(position);

            return QuantityOutcome::Removed;
        }

        let Some(item) = self.items.get_mut(position) else {
            return QuantityOutcome::NotInCart;
        };

        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let capped = requested.min(MAX_QUANTITY);

        // A recorded stock of zero means the level was unknown at add time,
        // not that nothing can be bought.
        let target = match item.stock.filter(|stock| *stock > 0) {
            Some(stock) => capped.min(stock),
            None => capped,
        };

        item.quantity = target;

        if target < capped {
            QuantityOutcome::ClampedToStock { stock: target }
        } else if capped < requested {
            QuantityOutcome::ClampedToMax
        } else {
            QuantityOutcome::Updated { quantity: target }
        }
    }

    /// Removes the line for `id`, returning whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.id != id);

        self.items.len() < before
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
