//! Registration form validation.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use ecoshop_core::Email;

const MIN_PASSWORD_LENGTH: usize = 6;

/// A submitted registration form.
///
/// Implements `Debug` manually to redact the passwords.
#[derive(Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
}

impl RegistrationField {
    /// Form field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
        }
    }
}

/// Every failing field and its message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationErrors {
    errors: BTreeMap<RegistrationField, &'static str>,
}

impl RegistrationErrors {
    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (RegistrationField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: RegistrationField, message: &'static str) {
        self.errors.insert(field, message);
    }
}

impl fmt::Display for RegistrationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().copied().collect();
        f.write_str(&messages.join("; "))
    }
}

/// A registration that passed validation.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: SecretString,
}

impl Registration {
    /// Check every field, reporting all failures together.
    ///
    /// Names are trimmed; the email and passwords are taken as typed.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationErrors` listing each failing field.
    pub fn validate(&self) -> Result<ValidRegistration, RegistrationErrors> {
        let mut errors = RegistrationErrors::default();

        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            errors.insert(RegistrationField::FirstName, "First name is required");
        }

        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            errors.insert(RegistrationField::LastName, "Last name is required");
        }

        let email = if self.email.trim().is_empty() {
            errors.insert(RegistrationField::Email, "Email is required");
            None
        } else {
            let parsed = Email::parse(&self.email).ok();
            if parsed.is_none() {
                errors.insert(RegistrationField::Email, "Email is invalid");
            }
            parsed
        };

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.insert(RegistrationField::Password, "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(
                RegistrationField::Password,
                "Password must be at least 6 characters",
            );
        }

        if password != self.confirm_password.expose_secret() {
            errors.insert(RegistrationField::ConfirmPassword, "Passwords do not match");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ValidRegistration {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}
