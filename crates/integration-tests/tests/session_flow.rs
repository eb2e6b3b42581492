//! End-to-end session flows across storefront reloads.
//!
//! Each reload opens a new `Storefront` on the same data directory, the way
//! separate CLI invocations do.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use ecoshop_core::{Price, ProductId};
use ecoshop_integration_tests::TestContext;
use ecoshop_storefront::auth::{AuthError, Registration, UserDirectory};
use ecoshop_storefront::config::PricingConfig;
use ecoshop_storefront::error::AppError;
use ecoshop_storefront::routes::{Navigation, Route, post_login_destination};
use secrecy::SecretString;

fn password(s: &str) -> SecretString {
    SecretString::from(s)
}

#[test]
fn test_guarded_cart_flow_survives_reload() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();

    let nav = storefront.navigate(Route::Cart);
    let Navigation::Redirect { to, from } = nav else {
        panic!("anonymous cart visit should redirect");
    };
    assert_eq!(to, Route::Login);
    assert_eq!(from, Some(Route::Cart));

    storefront
        .auth_mut()
        .login("demo@example.com", &password("password"))
        .unwrap();
    let destination = post_login_destination(from);
    assert_eq!(destination, Route::Cart);
    assert_eq!(
        storefront.navigate(destination.clone()),
        Navigation::Allow(destination)
    );

    let catalog = storefront.catalog_handle();
    let headphones = catalog.by_id("1").unwrap();
    let laptop = catalog.by_id("2").unwrap();
    storefront.cart_mut().add_item(headphones, 2).unwrap();
    storefront.cart_mut().add_item(laptop, 1).unwrap();
    storefront.cart_mut().add_item(headphones, 1).unwrap();
    let before = storefront.cart().cart().clone();
    assert_eq!(before.items().len(), 2);
    assert_eq!(before.total_items(), 4);
    assert_eq!(before.subtotal(), Price::parse("2199.96").unwrap());
    drop(storefront);

    let reopened = ctx.open().unwrap();
    assert!(reopened.auth().is_authenticated());
    assert_eq!(
        reopened.auth().current_user().unwrap().email.as_str(),
        "demo@example.com"
    );
    assert_eq!(reopened.cart().cart(), &before);

    let summary = reopened.summary();
    assert!(summary.free_shipping());
    assert_eq!(summary.tax, Price::parse("176.00").unwrap());
    assert_eq!(summary.total, Price::parse("2375.96").unwrap());
}

#[test]
fn test_failed_login_keeps_existing_session() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();
    storefront
        .auth_mut()
        .login("demo@example.com", &password("password"))
        .unwrap();

    let err = storefront
        .auth_mut()
        .login("demo@example.com", &password("wrong"))
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(
        AppError::from(err).user_message(),
        "Invalid email or password"
    );
    assert!(storefront.auth().is_authenticated());

    drop(storefront);
    assert!(ctx.open().unwrap().auth().is_authenticated());
}

#[test]
fn test_logout_clears_saved_session_only() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();
    storefront
        .auth_mut()
        .login("demo@example.com", &password("password"))
        .unwrap();
    let catalog = storefront.catalog_handle();
    let camera = catalog.by_id("5").unwrap();
    storefront.cart_mut().add_item(camera, 1).unwrap();

    storefront.auth_mut().logout();
    assert!(ctx.read_json("user").is_none());
    drop(storefront);

    let reopened = ctx.open().unwrap();
    assert!(!reopened.auth().is_authenticated());
    assert_eq!(reopened.cart().cart().total_items(), 1);
    assert_eq!(
        reopened.navigate(Route::Products).destination(),
        &Route::Login
    );
}

#[test]
fn test_register_then_login() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();

    let registration = Registration {
        first_name: "Riley".to_owned(),
        last_name: "Chen".to_owned(),
        email: "riley@example.com".to_owned(),
        password: password("compost42"),
        confirm_password: password("compost42"),
    };
    let user = storefront.auth_mut().register(&registration).unwrap();
    assert!(!storefront.auth().is_authenticated());
    assert!(user.avatar.is_some());

    let again = storefront.auth_mut().register(&registration).unwrap_err();
    assert!(matches!(again, AuthError::UserAlreadyExists));

    let signed_in = storefront
        .auth_mut()
        .login("riley@example.com", &password("compost42"))
        .unwrap();
    assert_eq!(signed_in.id, user.id);
    assert_eq!(signed_in.full_name(), "Riley Chen");
}

#[test]
fn test_register_seed_email_keeps_record() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();
    let before = storefront
        .auth()
        .directory()
        .find_by_email("demo@example.com")
        .cloned()
        .unwrap();

    let err = storefront
        .auth_mut()
        .register(&Registration {
            first_name: "Other".to_owned(),
            last_name: "Person".to_owned(),
            email: "demo@example.com".to_owned(),
            password: password("different"),
            confirm_password: password("different"),
        })
        .unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists));
    assert_eq!(
        storefront.auth().directory().find_by_email("demo@example.com"),
        Some(&before)
    );
    storefront
        .auth_mut()
        .login("demo@example.com", &password("password"))
        .unwrap();
}

#[test]
fn test_favorites_toggle_persists() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();
    let catalog = storefront.catalog_handle();
    let watch = catalog.by_id("4").unwrap();
    let tv = catalog.by_id("6").unwrap();

    assert!(storefront.favorites_mut().toggle(watch));
    assert!(storefront.favorites_mut().toggle(tv));
    assert!(!storefront.favorites_mut().toggle(watch));
    drop(storefront);

    let reopened = ctx.open().unwrap();
    let ids: Vec<&str> = reopened
        .favorites()
        .products()
        .iter()
        .map(|product| product.id.as_str())
        .collect();
    assert_eq!(ids, ["6"]);
    assert!(reopened.favorites().is_favorite(&ProductId::new("6")));
}

#[test]
fn test_subscribers_see_every_mutation() {
    let ctx = TestContext::new().unwrap();
    let mut storefront = ctx.open().unwrap();
    let seen = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&seen);
    let id = storefront.cart_mut().subscribe(move |cart| {
        counter.store(cart.total_items(), Ordering::SeqCst);
    });

    let catalog = storefront.catalog_handle();
    let camera = catalog.by_id("3").unwrap();
    storefront.cart_mut().add_item(camera, 3).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 3);
    storefront
        .cart_mut()
        .set_quantity(&ProductId::new("3"), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    assert!(storefront.cart_mut().unsubscribe(id));
    storefront.cart_mut().clear();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_custom_pricing_below_threshold() {
    let ctx = TestContext::new().unwrap();
    let pricing = PricingConfig {
        free_shipping_threshold: Price::parse("500").unwrap(),
        ..PricingConfig::default()
    };
    let mut storefront = ctx
        .open_with(UserDirectory::bundled().unwrap(), pricing)
        .unwrap();
    let catalog = storefront.catalog_handle();
    storefront
        .cart_mut()
        .add_item(catalog.by_id("1").unwrap(), 1)
        .unwrap();

    let summary = storefront.summary();
    assert!(!summary.free_shipping());
    assert_eq!(summary.shipping, Price::parse("10").unwrap());
    assert_eq!(summary.tax, Price::parse("24.00").unwrap());
    assert_eq!(summary.total, Price::parse("333.99").unwrap());
}
