//! Read-only product catalog.
//!
//! The catalog is seeded once from the bundled `products.json` and never
//! mutated. Lookups return borrowed products; stores that keep a product
//! (cart lines, favorites) clone it.
//!
//! Listing pages compose these helpers through [`ProductQuery`].

mod query;

pub use query::{PriceRange, ProductQuery, SortKey};

use std::collections::HashSet;

use ecoshop_core::{CategoryFilter, Price, ProductId};
use thiserror::Error;

use crate::models::Product;

const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

/// Errors from catalog loading and lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product has this ID.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Two products share an ID.
    #[error("Duplicate product ID in catalog: {0}")]
    DuplicateProduct(ProductId),

    /// The product dataset could not be parsed.
    #[error("Invalid catalog data: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// Unrecognized listing sort key.
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Price range with `min` above `max`.
    #[error("Invalid price range: {min} to {max}")]
    InvalidPriceRange { min: Price, max: Price },
}

/// The product collection and its query helpers.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled dataset is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_PRODUCTS)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidData` if the JSON does not match the
    /// product schema and `CatalogError::DuplicateProduct` if two products
    /// share an ID.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Build a catalog from products in display order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateProduct` if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID.
    pub fn by_id(&self, id: &str) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|product| product.id.as_str() == id)
            .ok_or_else(|| CatalogError::NotFound(ProductId::new(id)))
    }

    /// Products passing `filter`, in catalog order.
    #[must_use]
    pub fn by_category(&self, filter: CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product.category))
            .collect()
    }

    /// Products whose name, description, or a tag contains `query`,
    /// ignoring case. An empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|product| product.matches_text(&needle))
            .collect()
    }

    /// The category filter list: `All` first, then each category.
    #[must_use]
    pub fn categories() -> Vec<CategoryFilter> {
        CategoryFilter::options()
    }

    /// The first `n` products in catalog order.
    #[must_use]
    pub fn featured(&self, n: usize) -> Vec<&Product> {
        self.products.iter().take(n).collect()
    }

    /// The `n` most recently added products, newest first.
    #[must_use]
    pub fn new_arrivals(&self, n: usize) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(n);
        products
    }

    /// Up to `n` other products in the same category as `product`.
    #[must_use]
    pub fn related(&self, product: &Product, n: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(n)
            .collect()
    }

    /// Run a listing query.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        query.apply(self)
    }
}
