//! Product domain types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ecoshop_core::{Category, Price, ProductId, ReviewId, UserId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image URLs, primary image first.
    pub images: Vec<String>,
    /// Category the product is listed under.
    pub category: Category,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Units in stock. Informational only; the cart does not enforce it.
    pub stock: u32,
    /// Aggregate rating from 0 to 5.
    pub rating: f32,
    /// Customer reviews, newest first as authored.
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Technical specifications.
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    /// Date the product was added to the catalog.
    pub created_at: NaiveDate,
}

impl Product {
    /// The first image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether any units are in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the name, description, or any tag contains `needle`.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    /// Author's user ID.
    pub user_id: UserId,
    /// Author's display name at the time of writing.
    pub user_name: String,
    /// Rating from 0 to 5; may be fractional.
    pub rating: f32,
    pub comment: String,
    pub date: NaiveDate,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headphones() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Premium Wireless Headphones",
            "description": "Active noise cancellation.",
            "price": { "amount": "299.99" },
            "images": ["https://img.example.com/a.jpg", "https://img.example.com/b.jpg"],
            "category": "Audio",
            "tags": ["Wireless", "bluetooth"],
            "stock": 45,
            "rating": 4.8,
            "created_at": "2023-08-10"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let product = headphones();
        assert_eq!(product.price, Price::from_cents(29_999));
        assert_eq!(product.category, Category::Audio);
        assert!(product.reviews.is_empty());
        assert!(product.specifications.is_empty());
        assert_eq!(product.created_at, NaiveDate::from_ymd_opt(2023, 8, 10).unwrap());
    }

    #[test]
    fn test_primary_image_and_stock() {
        let mut product = headphones();
        assert_eq!(product.primary_image(), Some("https://img.example.com/a.jpg"));
        assert!(product.in_stock());
        product.stock = 0;
        assert!(!product.in_stock());
    }

    #[test]
    fn test_matches_text_checks_name_description_and_tags() {
        let product = headphones();
        assert!(product.matches_text("premium"));
        assert!(product.matches_text("noise"));
        assert!(product.matches_text("wireless"));
        assert!(!product.matches_text("laptop"));
    }
}
