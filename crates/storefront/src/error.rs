//! Unified error handling with Sentry integration.
//!
//! Each module defines its own error enum; [`AppError`] aggregates them for
//! front ends. [`AppError::report`] captures internal failures to Sentry and
//! [`AppError::user_message`] gives the text safe to show a shopper.

use thiserror::Error;

use crate::auth::AuthError;
use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::routes::RouteError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog lookup or load failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Navigation to an unknown page.
    #[error("Route error: {0}")]
    Route(#[from] RouteError),
}

impl AppError {
    /// Whether the error is a failure of the storefront itself rather than
    /// a rejected request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Config(_)
                | Self::Catalog(CatalogError::InvalidData(_) | CatalogError::DuplicateProduct(_))
                | Self::Auth(AuthError::InvalidDirectory(_))
        )
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
    }

    /// Message safe to show to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        // Don't expose internal error details
        match self {
            Self::Storage(_) | Self::Config(_) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => "Product not found".to_string(),
                CatalogError::UnknownSortKey(_) | CatalogError::InvalidPriceRange { .. } => {
                    err.to_string()
                }
                CatalogError::InvalidData(_) | CatalogError::DuplicateProduct(_) => {
                    "The catalog is unavailable".to_string()
                }
            },
            Self::Cart(err) => err.to_string(),
            Self::Route(_) => "Page not found".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::NotAuthenticated => "Please sign in to continue".to_string(),
                AuthError::Validation(errors) => errors.to_string(),
                AuthError::InvalidEmail(_) => "Email is invalid".to_string(),
                AuthError::InvalidDirectory(_) => "Sign in is unavailable".to_string(),
            },
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use ecoshop_core::ProductId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(CatalogError::NotFound(ProductId::new("123")));
        assert_eq!(err.to_string(), "Catalog error: Product not found: 123");

        let err = AppError::from(CartError::InvalidQuantity);
        assert_eq!(err.to_string(), "Cart error: Quantity must be at least 1");
    }

    #[test]
    fn test_user_messages_hide_internals() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).user_message(),
            "Invalid email or password"
        );
        assert_eq!(
            AppError::from(StorageError::Poisoned).user_message(),
            "Something went wrong, please try again"
        );
        assert_eq!(
            AppError::from(CatalogError::NotFound(ProductId::new("9"))).user_message(),
            "Product not found"
        );
    }

    #[test]
    fn test_internal_classification() {
        assert!(AppError::from(StorageError::Poisoned).is_internal());
        assert!(!AppError::from(AuthError::UserAlreadyExists).is_internal());
        assert!(!AppError::from(CartError::InvalidQuantity).is_internal());
    }
}
