//! Session and profile commands.
//!
//! Accounts created with `register` live in the process's user directory
//! only. The signed-in session itself persists under the `user` key.

use ecoshop_core::AddressKind;
use ecoshop_storefront::auth::{ProfileUpdate, Registration};
use ecoshop_storefront::error::Result;
use ecoshop_storefront::models::User;
use ecoshop_storefront::routes::{
    Navigation, Route, post_login_destination, post_register_destination,
};
use ecoshop_storefront::state::Storefront;
use secrecy::SecretString;

use super::{emit, require};

/// Sign in, then report where to continue.
///
/// `next` is the page that sent the user to login; unprotected pages fall
/// back to Home.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the email and password do not
/// match an account.
pub fn login(
    storefront: &mut Storefront,
    email: &str,
    password: &SecretString,
    next: Option<Route>,
) -> Result<()> {
    if let Some(user) = already_signed_in(storefront, Route::Login) {
        emit([format!("Already signed in as {}", user.email)]);
        return Ok(());
    }

    let user = storefront.auth_mut().login(email, password)?;
    emit([
        format!("Signed in as {} <{}>", user.full_name(), user.email),
        format!("Continue at {}", post_login_destination(next)),
    ]);
    Ok(())
}

/// Sign out.
pub fn logout(storefront: &mut Storefront) {
    if storefront.auth().is_authenticated() {
        storefront.auth_mut().logout();
        emit(["Signed out"]);
    } else {
        emit(["Not signed in"]);
    }
}

/// Create an account from the registration form.
///
/// # Errors
///
/// Returns `AuthError::Validation` with every failing field, or
/// `AuthError::UserAlreadyExists` if the email is taken.
pub fn register(storefront: &mut Storefront, registration: &Registration) -> Result<()> {
    if let Some(user) = already_signed_in(storefront, Route::Register) {
        emit([format!("Already signed in as {}", user.email)]);
        return Ok(());
    }

    let user = storefront.auth_mut().register(registration)?;
    emit([
        format!("Account created for {}", user.email),
        format!("Continue at {}", post_register_destination()),
    ]);
    Ok(())
}

/// Print the signed-in user's profile.
///
/// # Errors
///
/// Returns an error if the session is anonymous.
pub fn whoami(storefront: &Storefront) -> Result<()> {
    require(storefront, Route::Profile)?;
    if let Some(user) = storefront.auth().current_user() {
        emit(profile_lines(user));
    }
    Ok(())
}

/// Apply profile edits and print the result.
///
/// # Errors
///
/// Returns an error if the session is anonymous or the new email is invalid.
pub fn update_profile(storefront: &mut Storefront, update: ProfileUpdate) -> Result<()> {
    require(storefront, Route::Profile)?;
    let user = storefront.auth_mut().update_profile(update)?;
    emit(profile_lines(user));
    Ok(())
}

fn already_signed_in(storefront: &Storefront, route: Route) -> Option<&User> {
    match storefront.navigate(route) {
        Navigation::Allow(_) => None,
        Navigation::Redirect { .. } => storefront.auth().current_user(),
    }
}

fn profile_lines(user: &User) -> Vec<String> {
    let mut lines = vec![
        format!("{} <{}>", user.full_name(), user.email),
        format!("Avatar: {}", user.avatar_or_default()),
    ];

    for (label, kind) in [
        ("Shipping", AddressKind::Shipping),
        ("Billing", AddressKind::Billing),
    ] {
        if let Some(address) = user.default_address(kind) {
            lines.push(format!(
                "{label}: {}, {}, {}, {} {}, {}",
                address.name,
                address.line1,
                address.city,
                address.state,
                address.postal_code,
                address.country
            ));
        }
    }

    if let Some(method) = user.default_payment_method() {
        lines.push(format!(
            "Payment: {} card ending {} (expires {}/{})",
            method.kind,
            method.last_four(),
            method.expiry_month,
            method.expiry_year
        ));
    }

    if !user.orders.is_empty() {
        lines.push(format!("Orders: {}", user.orders.len()));
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::{signed_in, storefront};

    #[test]
    fn test_login_and_logout() {
        let mut storefront = storefront();
        login(
            &mut storefront,
            "demo@example.com",
            &SecretString::from("password"),
            Some(Route::Cart),
        )
        .unwrap();
        assert!(storefront.auth().is_authenticated());

        logout(&mut storefront);
        assert!(!storefront.auth().is_authenticated());
    }

    #[test]
    fn test_bad_password_message() {
        let mut storefront = storefront();
        let err = login(
            &mut storefront,
            "demo@example.com",
            &SecretString::from("nope"),
            None,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn test_register_rejected_while_signed_in() {
        let mut storefront = signed_in();
        let accounts = storefront.auth().directory().len();
        register(
            &mut storefront,
            &Registration {
                first_name: "Sam".to_owned(),
                last_name: "Rivera".to_owned(),
                email: "sam@example.com".to_owned(),
                password: SecretString::from("secret1"),
                confirm_password: SecretString::from("secret1"),
            },
        )
        .unwrap();
        assert_eq!(storefront.auth().directory().len(), accounts);
    }

    #[test]
    fn test_profile_lines_for_demo_user() {
        let storefront = signed_in();
        let lines = profile_lines(storefront.auth().current_user().unwrap());
        assert_eq!(
            lines.first().map(String::as_str),
            Some("Demo User <demo@example.com>")
        );
        assert!(lines.iter().any(|line| line.starts_with("Shipping: ")));
        assert!(
            lines
                .iter()
                .any(|line| line.starts_with("Payment: ") && line.contains("ending 4242"))
        );
    }

    #[test]
    fn test_update_profile_email() {
        let mut storefront = signed_in();
        update_profile(
            &mut storefront,
            ProfileUpdate {
                email: Some("not-an-email".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap_err();

        update_profile(
            &mut storefront,
            ProfileUpdate {
                first_name: Some("Dana".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(
            storefront.auth().current_user().unwrap().first_name,
            "Dana"
        );
    }
}
