//! CLI command implementations.
//!
//! Each command runs the route guard for the page it stands in for, then
//! dispatches to the storefront's stores and prints the result.

pub mod account;
pub mod cart;
pub mod favorites;
pub mod products;

use ecoshop_storefront::auth::AuthError;
use ecoshop_storefront::error::Result;
use ecoshop_storefront::models::Product;
use ecoshop_storefront::routes::{Navigation, Route};
use ecoshop_storefront::state::Storefront;

/// Fail with `NotAuthenticated` unless the guard lets the session see `route`.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when the guard redirects.
pub fn require(storefront: &Storefront, route: Route) -> Result<()> {
    match storefront.navigate(route) {
        Navigation::Allow(_) => Ok(()),
        Navigation::Redirect { to, from } => {
            tracing::debug!(
                to = %to,
                from = from.as_ref().map(Route::path).as_deref(),
                "Redirected by route guard"
            );
            Err(AuthError::NotAuthenticated.into())
        }
    }
}

/// One listing row: id, name, price, category, and rating.
#[must_use]
pub fn product_line(product: &Product) -> String {
    format!(
        "{:>3}  {:<36} {:>10}  {:<18} {:.1}/5",
        product.id.as_str(),
        product.name,
        product.price.display(),
        product.category.name(),
        product.rating
    )
}

/// Print lines to stdout.
#[allow(clippy::print_stdout)]
pub fn emit<I, S>(lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        println!("{}", line.as_ref());
    }
}
