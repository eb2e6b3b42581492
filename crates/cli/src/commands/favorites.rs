//! Favorites commands.

use ecoshop_core::ProductId;
use ecoshop_storefront::error::Result;
use ecoshop_storefront::routes::Route;
use ecoshop_storefront::state::Storefront;

use super::{emit, product_line, require};

/// List favorited products, oldest first.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn show(storefront: &Storefront) -> Result<()> {
    require(storefront, Route::Favorites)?;

    let products = storefront.favorites().products();
    if products.is_empty() {
        emit(["No favorites yet"]);
    } else {
        emit(products.iter().map(product_line));
    }
    Ok(())
}

/// Favorite a catalog product.
///
/// # Errors
///
/// Returns an error if the session is anonymous or the product is unknown.
pub fn add(storefront: &mut Storefront, id: &ProductId) -> Result<()> {
    require(storefront, Route::Favorites)?;

    let catalog = storefront.catalog_handle();
    let product = catalog.by_id(id.as_str())?;
    let count = storefront.favorites_mut().add(product).len();
    emit([format!("Added {} to favorites ({count} total)", product.name)]);
    Ok(())
}

/// Unfavorite a product.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn remove(storefront: &mut Storefront, id: &ProductId) -> Result<()> {
    require(storefront, Route::Favorites)?;

    let count = storefront.favorites_mut().remove(id).len();
    emit([format!("Removed {id} from favorites ({count} total)")]);
    Ok(())
}

/// Flip a catalog product's favorite state.
///
/// # Errors
///
/// Returns an error if the session is anonymous or the product is unknown.
pub fn toggle(storefront: &mut Storefront, id: &ProductId) -> Result<()> {
    require(storefront, Route::Favorites)?;

    let catalog = storefront.catalog_handle();
    let product = catalog.by_id(id.as_str())?;
    let message = if storefront.favorites_mut().toggle(product) {
        format!("Added {} to favorites", product.name)
    } else {
        format!("Removed {} from favorites", product.name)
    };
    emit([message]);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::signed_in;

    #[test]
    fn test_toggle_twice_restores() {
        let mut storefront = signed_in();
        let id = ProductId::new("4");
        toggle(&mut storefront, &id).unwrap();
        assert!(storefront.favorites().is_favorite(&id));
        toggle(&mut storefront, &id).unwrap();
        assert!(storefront.favorites().is_empty());
    }

    #[test]
    fn test_unknown_product() {
        let mut storefront = signed_in();
        let err = add(&mut storefront, &ProductId::new("42")).unwrap_err();
        assert_eq!(err.user_message(), "Product not found");
    }
}
