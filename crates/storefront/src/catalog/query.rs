//! Listing queries: search or category, then price range, then sort.

use std::fmt;
use std::str::FromStr;

use ecoshop_core::{CategoryFilter, Price};

use super::{Catalog, CatalogError};
use crate::models::Product;

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Most recently added first.
    Newest,
    /// Highest rated first.
    Rating,
}

impl SortKey {
    /// Every sort key, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Featured,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Newest,
        Self::Rating,
    ];

    /// URL slug for the sort key.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
            Self::Rating => "rating",
        }
    }

    fn sort(self, products: &mut [&Product]) {
        match self {
            Self::Featured => {}
            Self::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.slug() == s)
            .ok_or_else(|| CatalogError::UnknownSortKey(s.to_owned()))
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: Price,
    max: Price,
}

impl PriceRange {
    /// A range from `min` to `max`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPriceRange` if `min > max`.
    pub fn new(min: Price, max: Price) -> Result<Self, CatalogError> {
        if min > max {
            return Err(CatalogError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> Price {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Price {
        self.max
    }

    /// Whether `price` lies within the range.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    /// $0 to $2,000, the listing slider's full span.
    fn default() -> Self {
        Self {
            min: Price::ZERO,
            max: Price::from_cents(200_000),
        }
    }
}

/// A product listing request.
///
/// A non-empty search text takes precedence over the category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: CategoryFilter,
    pub search: Option<String>,
    pub price_range: PriceRange,
    pub sort: SortKey,
}

impl ProductQuery {
    /// Everything, in catalog order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub const fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = price_range;
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Run the query against `catalog`.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let mut products = match self.search.as_deref() {
            Some(text) if !text.is_empty() => catalog.search(text),
            _ => catalog.by_category(self.category),
        };
        products.retain(|product| self.price_range.contains(product.price));
        self.sort.sort(&mut products);
        products
    }
}
