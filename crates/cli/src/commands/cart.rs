//! Cart commands.

use ecoshop_core::ProductId;
use ecoshop_storefront::cart::{Cart, OrderSummary};
use ecoshop_storefront::error::Result;
use ecoshop_storefront::routes::Route;
use ecoshop_storefront::state::Storefront;

use super::{emit, require};

/// Print the cart lines and order summary.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn show(storefront: &Storefront) -> Result<()> {
    require(storefront, Route::Cart)?;
    emit(cart_lines(storefront.cart().cart(), &storefront.summary()));
    Ok(())
}

/// Add `quantity` units of a catalog product.
///
/// # Errors
///
/// Returns an error if the session is anonymous, the product is unknown, or
/// the quantity is zero.
pub fn add(storefront: &mut Storefront, id: &ProductId, quantity: u32) -> Result<()> {
    require(storefront, Route::Cart)?;

    let catalog = storefront.catalog_handle();
    let product = catalog.by_id(id.as_str())?;
    let cart = storefront.cart_mut().add_item(product, quantity)?;
    let in_cart = cart.line(&product.id).map_or(0, |line| line.quantity);

    emit([format!(
        "Added {quantity} x {} ({in_cart} in cart)",
        product.name
    )]);
    Ok(())
}

/// Remove a product's line. Removing an absent product changes nothing.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn remove(storefront: &mut Storefront, id: &ProductId) -> Result<()> {
    require(storefront, Route::Cart)?;

    let had_line = storefront.cart().contains(id);
    let cart = storefront.cart_mut().remove_item(id);
    let message = if had_line {
        format!("Removed {id} ({} items in cart)", cart.total_items())
    } else {
        format!("{id} is not in the cart")
    };
    emit([message]);
    Ok(())
}

/// Set a line's quantity; zero removes the line.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn set(storefront: &mut Storefront, id: &ProductId, quantity: u32) -> Result<()> {
    require(storefront, Route::Cart)?;

    if !storefront.cart().contains(id) {
        emit([format!("{id} is not in the cart")]);
        return Ok(());
    }
    let cart = storefront.cart_mut().set_quantity(id, quantity);
    emit([format!(
        "{id} quantity set to {quantity} ({} items in cart)",
        cart.total_items()
    )]);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn clear(storefront: &mut Storefront) -> Result<()> {
    require(storefront, Route::Cart)?;
    storefront.cart_mut().clear();
    emit(["Cart cleared"]);
    Ok(())
}

fn cart_lines(cart: &Cart, summary: &OrderSummary) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Your cart is empty".to_owned()];
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|line| {
            format!(
                "{:>3}  {:<36} {:>4} x {:>10} = {:>10}",
                line.product.id.as_str(),
                line.product.name,
                line.quantity,
                line.product.price.display(),
                line.line_total().display()
            )
        })
        .collect();

    let shipping = if summary.free_shipping() {
        "Free".to_owned()
    } else {
        summary.shipping.display()
    };
    lines.push(String::new());
    lines.push(format!(
        "Subtotal ({} items): {}",
        cart.total_items(),
        summary.subtotal.display()
    ));
    lines.push(format!("Shipping: {shipping}"));
    lines.push(format!("Tax: {}", summary.tax.display()));
    lines.push(format!("Total: {}", summary.total.display()));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::signed_in;

    #[test]
    fn test_empty_cart_lines() {
        let storefront = signed_in();
        assert_eq!(
            cart_lines(storefront.cart().cart(), &storefront.summary()),
            ["Your cart is empty"]
        );
    }

    #[test]
    fn test_cart_lines_with_summary() {
        let mut storefront = signed_in();
        add(&mut storefront, &ProductId::new("3"), 2).unwrap();

        let lines = cart_lines(storefront.cart().cart(), &storefront.summary());
        assert!(lines.iter().any(|line| line.contains("$299.98")));
        assert!(lines.contains(&"Subtotal (2 items): $299.98".to_owned()));
        assert!(lines.contains(&"Shipping: Free".to_owned()));
        assert!(lines.contains(&"Tax: $24.00".to_owned()));
        assert!(lines.contains(&"Total: $323.98".to_owned()));
    }

    #[test]
    fn test_cart_commands_need_sign_in() {
        let mut storefront = crate::commands::tests::storefront();
        assert!(add(&mut storefront, &ProductId::new("1"), 1).is_err());
        assert!(storefront.cart().is_empty());
    }

    #[test]
    fn test_set_and_remove() {
        let mut storefront = signed_in();
        let id = ProductId::new("1");
        add(&mut storefront, &id, 1).unwrap();
        set(&mut storefront, &id, 4).unwrap();
        assert_eq!(storefront.cart().cart().total_items(), 4);

        remove(&mut storefront, &id).unwrap();
        assert!(storefront.cart().is_empty());
        set(&mut storefront, &id, 2).unwrap();
        assert!(storefront.cart().is_empty());
    }
}
