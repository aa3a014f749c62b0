//! Catalog

use std::cmp::Reverse;
use std::fmt;
use std::fs;
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use jiff::civil;
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::percent_of;
use crate::shipping::FREE_SHIPPING_THRESHOLD;

/// Number of products shown per listing page.
pub const PAGE_SIZE: usize = 12;

/// Errors raised while loading or querying a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// No product carries the requested id.
    #[error("unknown product id {0}")]
    UnknownProduct(ProductId),
}

/// Identifier of a catalog product.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(
    /// Raw numeric id as it appears in the catalog document.
    pub u32,
);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A single product record from the catalog document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product id.
    pub id: ProductId,

    /// Display name; the first word doubles as the brand.
    pub name: String,

    /// List price before any sale discount.
    pub price: Decimal,

    /// Sale discount in percentage points, zero when not on sale.
    #[serde(default)]
    pub discount: Decimal,

    /// Units in stock, if the catalog tracks them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// Average review rating out of five.
    #[serde(default)]
    pub rating: Decimal,

    /// Number of reviews behind the rating.
    #[serde(default)]
    pub review_count: u32,

    /// Category slug used by filters and related-product lookup.
    pub category: String,

    /// Image path for presentation.
    #[serde(default)]
    pub image: String,

    /// Longer marketing copy, searched alongside the name.
    #[serde(default)]
    pub description: String,

    /// Date the product entered the catalog.
    pub date_added: civil::Date,

    /// Whether the product is pinned to the front of listings.
    #[serde(default)]
    pub featured: bool,

    /// Free-form spec sheet entries (material, weight, sku, ...).
    #[serde(default)]
    pub specs: FxHashMap<String, String>,
}

impl Product {
    /// Returns the price after applying the sale discount, if any.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if self.on_sale() {
            self.price - percent_of(self.discount, self.price)
        } else {
            self.price
        }
    }

    /// Returns `true` if a sale discount is active.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    /// Returns `true` if the product can currently be bought.
    ///
    /// A product without a tracked stock level counts as in stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }

    /// Returns the brand, taken as the first word of the name.
    #[must_use]
    pub fn brand(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Returns `true` if buying this product alone ships for free.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.effective_price() >= FREE_SHIPPING_THRESHOLD
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

/// An ordered product listing with id-based lookup.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Builds a catalog from an already-deserialised product list.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();

        Self { products, index }
    }

    /// Parses a catalog from a JSON document with a `products` field.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::Json`] if the document is not valid catalog JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;

        Ok(Self::from_products(document.products))
    }

    /// Reads and parses a catalog document from `path`.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::Io`] if the file cannot be read.
    /// * [`CatalogError::Json`] if the document is not valid catalog JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Returns the products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns an iterator over the products in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Returns the product with `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|position| self.products.get(*position))
    }

    /// Returns the product with `id`.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::UnknownProduct`] if no product carries `id`.
    pub fn require(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownProduct(id))
    }

    /// Returns the featured products in catalog order.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }

    /// Returns every product accepted by `filter`, in catalog order.
    #[must_use]
    pub fn filter(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.accepts(product))
            .collect()
    }

    /// Searches name, description and category, case-insensitively.
    #[must_use]
    pub fn search(&self, needle: &str) -> Vec<&Product> {
        let needle = needle.to_lowercase();

        self.products
            .iter()
            .filter(|product| matches_needle(product, &needle))
            .collect()
    }

    /// Returns up to `limit` products sharing a category with `id`.
    ///
    /// The product itself is excluded; an unknown id yields nothing.
    #[must_use]
    pub fn related(&self, id: ProductId, limit: usize) -> Vec<&Product> {
        let Some(product) = self.get(id) else {
            return Vec::new();
        };

        self.products
            .iter()
            .filter(|candidate| candidate.id != id && candidate.category == product.category)
            .take(limit)
            .collect()
    }

    /// Draws up to `count` random products, skipping the excluded ids.
    pub fn sample<R>(&self, exclude: &[ProductId], count: usize, rng: &mut R) -> Vec<&Product>
    where
        R: Rng + ?Sized,
    {
        let pool: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| !exclude.contains(&product.id))
            .collect();

        pool.choose_multiple(rng, count).copied().collect()
    }

    /// Returns the distinct category slugs, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .products
            .iter()
            .map(|product| product.category.as_str())
            .collect();

        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Returns the distinct brands, sorted.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = self.products.iter().map(Product::brand).collect();

        brands.sort_unstable();
        brands.dedup();
        brands
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn matches_needle(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
}

/// Conjunctive listing criteria; empty fields accept everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
    /// Accept only these category slugs (case-insensitive).
    pub categories: Vec<String>,

    /// Accept only these brands (case-insensitive).
    pub brands: Vec<String>,

    /// Lowest acceptable effective price.
    pub min_price: Option<Decimal>,

    /// Highest acceptable effective price.
    pub max_price: Option<Decimal>,

    /// Lowest acceptable review rating.
    pub min_rating: Option<Decimal>,

    /// Accept only products currently in stock.
    pub in_stock: bool,

    /// Accept only products with an active sale discount.
    pub on_sale: bool,

    /// Accept only products whose effective price ships free on its own.
    pub free_shipping: bool,

    /// Accept only products matching this text search.
    pub search: Option<String>,
}

impl ProductFilter {
    /// Returns `true` if `product` satisfies every set criterion.
    #[must_use]
    pub fn accepts(&self, product: &Product) -> bool {
        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|category| category.eq_ignore_ascii_case(&product.category))
        {
            return false;
        }

        if !self.brands.is_empty()
            && !self
                .brands
                .iter()
                .any(|brand| brand.eq_ignore_ascii_case(product.brand()))
        {
            return false;
        }

        let price = product.effective_price();

        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }

        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if self.min_rating.is_some_and(|min| product.rating < min) {
            return false;
        }

        if self.in_stock && !product.in_stock() {
            return false;
        }

        if self.on_sale && !product.on_sale() {
            return false;
        }

        if self.free_shipping && !product.ships_free() {
            return false;
        }

        if let Some(search) = &self.search {
            if !matches_needle(product, &search.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

/// Listing sort order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Featured products first, catalog order otherwise.
    #[default]
    Featured,

    /// Cheapest effective price first.
    PriceLow,

    /// Dearest effective price first.
    PriceHigh,

    /// Best rated first.
    Rating,

    /// Most recently added first.
    Newest,

    /// Most reviewed first.
    Popularity,
}

impl SortKey {
    /// Sorts `products` in place; equal keys keep their listing order.
    pub fn apply(self, products: &mut [&Product]) {
        match self {
            Self::Featured => products.sort_by_key(|product| !product.featured),
            Self::PriceLow => products.sort_by_key(|product| product.effective_price()),
            Self::PriceHigh => {
                products.sort_by_key(|product| Reverse(product.effective_price()));
            }
            Self::Rating => products.sort_by_key(|product| Reverse(product.rating)),
            Self::Newest => products.sort_by_key(|product| Reverse(product.date_added)),
            Self::Popularity => products.sort_by_key(|product| Reverse(product.review_count)),
        }
    }

    /// Returns the kebab-case name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
            Self::Popularity => "popularity",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort key name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key `{0}`")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            "newest" => Ok(Self::Newest),
            "popularity" => Ok(Self::Popularity),
            _ => Err(ParseSortKeyError(s.to_owned())),
        }
    }
}

/// One page of a product listing.
#[derive(Debug)]
pub struct Page<'a> {
    /// Products on this page, at most [`PAGE_SIZE`].
    pub items: Vec<&'a Product>,

    /// One-based page number after clamping.
    pub page: usize,

    /// Total number of pages, at least one.
    pub page_count: usize,

    /// Total number of products across all pages.
    pub total: usize,
}

/// Cuts a listing into pages of [`PAGE_SIZE`], clamping `page` into range.
#[must_use]
pub fn paginate<'a>(products: &[&'a Product], page: usize) -> Page<'a> {
    let total = products.len();
    let page_count = total.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, page_count);

    let items = products
        .chunks(PAGE_SIZE)
        .nth(page - 1)
        .map(<[&Product]>::to_vec)
        .unwrap_or_default();

    Page {
        items,
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use testresult::TestResult;

    use super::*;

    fn product(id: u32, name: &str, price: &str, category: &str) -> TestResult<Product> {
        Ok(Product {
            id: ProductId(id),
            name: name.to_owned(),
            price: price.parse()?,
            discount: Decimal::ZERO,
            stock: Some(10),
            rating: "4.0".parse()?,
            review_count: 10,
            category: category.to_owned(),
            image: String::new(),
            description: String::new(),
            date_added: civil::date(2024, 1, 1),
            featured: false,
            specs: FxHashMap::default(),
        })
    }

    fn sample_catalog() -> TestResult<Catalog> {
        let mut speaker = product(1, "Pulse Speaker", "49.99", "audio")?;
        speaker.description = "Room-filling portable sound".to_owned();

        let mut headphones = product(2, "Aurora Headphones", "79.99", "audio")?;
        headphones.discount = Decimal::from(15);
        headphones.featured = true;

        let mut lamp = product(3, "Echo Lamp", "24.99", "home")?;
        lamp.stock = Some(0);
        lamp.rating = "3.9".parse()?;

        let mut watch = product(4, "Nimbus Smartwatch", "199.99", "wearables")?;
        watch.date_added = civil::date(2024, 6, 1);
        watch.review_count = 300;

        Ok(Catalog::from_products(vec![speaker, headphones, lamp, watch]))
    }

    #[test]
    fn parses_a_camel_case_document() -> TestResult {
        let catalog = Catalog::from_json_str(
            r#"{
                "products": [
                    {
                        "id": 9,
                        "name": "Drift Mouse",
                        "price": 59.99,
                        "discount": 25,
                        "stock": 3,
                        "rating": 4.6,
                        "reviewCount": 167,
                        "category": "accessories",
                        "dateAdded": "2024-05-02"
                    }
                ]
            }"#,
        )?;

        let mouse = catalog.require(ProductId(9))?;

        assert_eq!(mouse.review_count, 167);
        assert_eq!(mouse.date_added, civil::date(2024, 5, 2));
        assert_eq!(mouse.effective_price(), "44.99".parse()?);

        Ok(())
    }

    #[test]
    fn effective_price_rounds_the_discount_to_cents() -> TestResult {
        let catalog = sample_catalog()?;
        let headphones = catalog.require(ProductId(2))?;

        // 15% of 79.99 is 11.9985, rounded to 12.00.
        assert_eq!(headphones.effective_price(), "67.99".parse()?);

        Ok(())
    }

    #[test]
    fn unknown_products_are_reported() -> TestResult {
        let catalog = sample_catalog()?;

        let result = catalog.require(ProductId(99));

        assert!(matches!(
            result,
            Err(CatalogError::UnknownProduct(ProductId(99)))
        ));

        Ok(())
    }

    #[test]
    fn brand_is_the_first_word_of_the_name() -> TestResult {
        let catalog = sample_catalog()?;

        assert_eq!(catalog.require(ProductId(4))?.brand(), "Nimbus");

        Ok(())
    }

    #[test]
    fn filters_are_conjunctive() -> TestResult {
        let catalog = sample_catalog()?;

        let filter = ProductFilter {
            categories: vec!["audio".to_owned()],
            on_sale: true,
            ..ProductFilter::default()
        };

        let matched = catalog.filter(&filter);

        assert_eq!(
            matched.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ProductId(2)]
        );

        Ok(())
    }

    #[test]
    fn in_stock_filter_drops_sold_out_products() -> TestResult {
        let catalog = sample_catalog()?;

        let filter = ProductFilter {
            in_stock: true,
            ..ProductFilter::default()
        };

        let ids: Vec<ProductId> = catalog.filter(&filter).iter().map(|p| p.id).collect();

        assert!(!ids.contains(&ProductId(3)), "sold-out lamp must be dropped");
        assert_eq!(ids.len(), 3);

        Ok(())
    }

    #[test]
    fn free_shipping_filter_works_on_the_effective_price() -> TestResult {
        let mut jacket = product(5, "Strato Jacket", "52.00", "apparel")?;
        jacket.discount = Decimal::from(10);

        let catalog = Catalog::from_products(vec![jacket]);

        let filter = ProductFilter {
            free_shipping: true,
            ..ProductFilter::default()
        };

        // 52.00 drops to 46.80 on sale, below the free-shipping threshold.
        assert!(catalog.filter(&filter).is_empty());

        Ok(())
    }

    #[test]
    fn search_is_case_insensitive_across_fields() -> TestResult {
        let catalog = sample_catalog()?;

        let hits = catalog.search("PORTABLE");

        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![
            ProductId(1)
        ]);

        Ok(())
    }

    #[test]
    fn related_shares_a_category_and_excludes_the_product() -> TestResult {
        let catalog = sample_catalog()?;

        let related = catalog.related(ProductId(1), 4);

        assert_eq!(
            related.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ProductId(2)]
        );

        Ok(())
    }

    #[test]
    fn sample_respects_exclusions() -> TestResult {
        let catalog = sample_catalog()?;
        let mut rng = StepRng::new(2, 1);

        let picks = catalog.sample(&[ProductId(1)], 2, &mut rng);

        assert_eq!(picks.len(), 2);
        assert!(
            picks.iter().all(|product| product.id != ProductId(1)),
            "excluded ids must never be drawn"
        );

        Ok(())
    }

    #[test]
    fn price_sort_uses_the_effective_price() -> TestResult {
        let catalog = sample_catalog()?;
        let mut products: Vec<&Product> = catalog.iter().collect();

        SortKey::PriceLow.apply(&mut products);

        // The headphones sell for 67.99, undercutting their 79.99 list price.
        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![
            ProductId(3),
            ProductId(1),
            ProductId(2),
            ProductId(4),
        ]);

        Ok(())
    }

    #[test]
    fn featured_sort_is_stable() -> TestResult {
        let catalog = sample_catalog()?;
        let mut products: Vec<&Product> = catalog.iter().collect();

        SortKey::Featured.apply(&mut products);

        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![
            ProductId(2),
            ProductId(1),
            ProductId(3),
            ProductId(4),
        ]);

        Ok(())
    }

    #[test]
    fn pagination_clamps_out_of_range_pages() -> TestResult {
        let catalog = sample_catalog()?;
        let products: Vec<&Product> = catalog.iter().collect();

        let first = paginate(&products, 0);
        assert_eq!(first.page, 1);
        assert_eq!(first.page_count, 1);
        assert_eq!(first.items.len(), 4);

        let beyond = paginate(&products, 99);
        assert_eq!(beyond.page, 1);
        assert_eq!(beyond.total, 4);

        Ok(())
    }

    #[test]
    fn pagination_splits_at_the_page_size() -> TestResult {
        let mut products = Vec::new();

        for id in 1..=30 {
            products.push(product(id, "Bulk Widget", "1.00", "misc")?);
        }

        let catalog = Catalog::from_products(products);
        let listing: Vec<&Product> = catalog.iter().collect();

        let last = paginate(&listing, 3);

        assert_eq!(last.page_count, 3);
        assert_eq!(last.items.len(), 6);
        assert_eq!(last.items.first().map(|p| p.id), Some(ProductId(25)));

        Ok(())
    }
}
