//! User domain types.
//!
//! A [`User`] never carries a credential; passwords live only in the user
//! directory's records.

use serde::{Deserialize, Serialize};

use ecoshop_core::{AddressId, AddressKind, Email, PaymentKind, PaymentMethodId, UserId};

use super::Order;

/// Avatar shown for accounts that have not set one.
pub const DEFAULT_AVATAR: &str = "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2";

/// A storefront user as seen by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// User's email address; unique across the directory.
    pub email: Email,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Saved addresses.
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Saved payment methods.
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    /// Past orders.
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl User {
    /// "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// The avatar URL, or [`DEFAULT_AVATAR`] if none is set.
    #[must_use]
    pub fn avatar_or_default(&self) -> &str {
        self.avatar.as_deref().unwrap_or(DEFAULT_AVATAR)
    }

    /// The default address of the given kind.
    #[must_use]
    pub fn default_address(&self, kind: AddressKind) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|address| address.kind == kind && address.is_default)
    }

    /// The default payment method.
    #[must_use]
    pub fn default_payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|method| method.is_default)
    }
}

/// A saved postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    /// Billing or shipping.
    pub kind: AddressKind,
    /// Recipient name.
    pub name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    /// Whether this is the default address of its kind.
    #[serde(default)]
    pub is_default: bool,
}

/// A saved payment card.
///
/// `card_number` holds the masked number as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    /// Credit or debit.
    pub kind: PaymentKind,
    pub card_number: String,
    pub card_holder: String,
    pub expiry_month: String,
    pub expiry_year: String,
    #[serde(default)]
    pub is_default: bool,
}

impl PaymentMethod {
    /// Last four digits of the card number.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits
            .iter()
            .skip(digits.len().saturating_sub(4))
            .collect()
    }
}
