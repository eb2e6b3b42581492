//! Catalog browsing commands.

use ecoshop_core::{CategoryFilter, Price, ProductId};
use ecoshop_storefront::catalog::{PriceRange, ProductQuery, SortKey};
use ecoshop_storefront::error::Result;
use ecoshop_storefront::models::Product;
use ecoshop_storefront::routes::Route;
use ecoshop_storefront::state::Storefront;

use super::{emit, product_line, require};

const RELATED_LIMIT: usize = 4;

/// Listing filters from the command line.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub category: CategoryFilter,
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort: SortKey,
}

impl ListArgs {
    /// The listing query, with unset price bounds taken from the default range.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPriceRange` if the minimum exceeds the
    /// maximum.
    pub fn to_query(&self) -> Result<ProductQuery> {
        let defaults = PriceRange::default();
        let range = PriceRange::new(
            self.min_price.unwrap_or(defaults.min()),
            self.max_price.unwrap_or(defaults.max()),
        )?;

        let mut query = ProductQuery::new()
            .with_category(self.category)
            .with_price_range(range)
            .with_sort(self.sort);
        if let Some(search) = &self.search {
            query = query.with_search(search.trim());
        }
        Ok(query)
    }
}

/// List products matching the filters.
///
/// # Errors
///
/// Returns an error if the session is anonymous or the price range is invalid.
pub fn list(storefront: &Storefront, args: &ListArgs) -> Result<()> {
    require(storefront, Route::Products)?;

    let query = args.to_query()?;
    let products = storefront.catalog().query(&query);
    tracing::debug!(count = products.len(), sort = %query.sort, "Listed products");

    if products.is_empty() {
        emit(["No products found"]);
    } else {
        emit(products.into_iter().map(product_line));
    }
    Ok(())
}

/// Show a product's detail page.
///
/// # Errors
///
/// Returns an error if the session is anonymous or the product is unknown.
pub fn show(storefront: &Storefront, id: &ProductId) -> Result<()> {
    require(storefront, Route::ProductDetail(id.clone()))?;

    let product = storefront.catalog().by_id(id.as_str())?;
    let mut lines = detail_lines(product);

    if storefront.favorites().is_favorite(&product.id) {
        lines.push("In your favorites".to_owned());
    }
    if let Some(line) = storefront.cart().line(&product.id) {
        lines.push(format!("In your cart: {}", line.quantity));
    }

    let related = storefront.catalog().related(product, RELATED_LIMIT);
    if !related.is_empty() {
        lines.push(String::new());
        lines.push("Related products:".to_owned());
        lines.extend(related.into_iter().map(product_line));
    }

    emit(lines);
    Ok(())
}

fn detail_lines(product: &Product) -> Vec<String> {
    let mut lines = vec![
        product.name.clone(),
        format!(
            "{} | {} | {:.1}/5 ({} reviews)",
            product.price.display(),
            product.category,
            product.rating,
            product.reviews.len()
        ),
        if product.in_stock() {
            format!("In stock: {}", product.stock)
        } else {
            "Out of stock".to_owned()
        },
        String::new(),
        product.description.clone(),
    ];

    if !product.specifications.is_empty() {
        lines.push(String::new());
        lines.push("Specifications:".to_owned());
        lines.extend(
            product
                .specifications
                .iter()
                .map(|(name, value)| format!("  {name}: {value}")),
        );
    }

    if !product.reviews.is_empty() {
        lines.push(String::new());
        lines.push("Reviews:".to_owned());
        for review in &product.reviews {
            lines.push(format!(
                "  {} ({:.1}/5, {}): {}",
                review.user_name, review.rating, review.date, review.comment
            ));
        }
    }

    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecoshop_core::Category;

    use super::*;

    #[test]
    fn test_list_args_default_range() {
        let query = ListArgs::default().to_query().unwrap();
        assert_eq!(query.price_range, PriceRange::default());
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_list_args_build_query() {
        let args = ListArgs {
            category: CategoryFilter::Only(Category::Audio),
            search: Some("  camera ".to_owned()),
            min_price: Some(Price::parse("100").unwrap()),
            max_price: None,
            sort: SortKey::PriceLow,
        };
        let query = args.to_query().unwrap();
        assert_eq!(query.search.as_deref(), Some("camera"));
        assert_eq!(query.price_range.min(), Price::parse("100").unwrap());
        assert_eq!(query.sort, SortKey::PriceLow);
    }

    #[test]
    fn test_list_args_inverted_range() {
        let args = ListArgs {
            min_price: Some(Price::parse("500").unwrap()),
            max_price: Some(Price::parse("100").unwrap()),
            ..ListArgs::default()
        };
        assert!(args.to_query().is_err());
    }

    #[test]
    fn test_detail_lines() {
        let storefront = crate::commands::tests::storefront();
        let laptop = storefront.catalog().by_id("2").unwrap();
        let lines = detail_lines(laptop);
        assert_eq!(lines.first(), Some(&laptop.name));
        assert!(lines.iter().any(|line| line.starts_with("$1,299.99 | Computers")));
        assert!(lines.iter().any(|line| line == "Specifications:"));
    }
}
