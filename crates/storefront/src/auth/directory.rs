//! Seeded user directory.
//!
//! Accounts are loaded from the bundled `users.json`. Registrations are
//! appended in memory only; a new process starts from the seed again.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::AuthError;
use crate::models::User;

const BUNDLED_USERS: &str = include_str!("../../data/users.json");

/// A user plus the password they sign in with.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct UserRecord {
    user: User,
    password: SecretString,
}

impl UserRecord {
    #[must_use]
    pub const fn new(user: User, password: SecretString) -> Self {
        Self { user, password }
    }

    /// The account, without its credential.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Exact, case-sensitive match on both email and password.
    #[must_use]
    pub fn matches(&self, email: &str, password: &SecretString) -> bool {
        self.user.email == *email && self.password.expose_secret() == password.expose_secret()
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
struct DirectoryFile {
    users: Vec<SeedRecord>,
}

#[derive(Deserialize)]
struct SeedRecord {
    #[serde(flatten)]
    user: User,
    password: String,
}

/// The set of known accounts, keyed by email.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    records: Vec<UserRecord>,
}

impl UserDirectory {
    /// The directory seeded from the bundled dataset.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidDirectory` if the dataset is invalid.
    pub fn bundled() -> Result<Self, AuthError> {
        Self::from_json(BUNDLED_USERS)
    }

    /// Parse a directory from `{"users": [...]}`, each user carrying a
    /// `password` field.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidDirectory` if the JSON does not match and
    /// `AuthError::UserAlreadyExists` if two records share an email.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let file: DirectoryFile = serde_json::from_str(json)?;
        let mut directory = Self::default();
        for seed in file.users {
            directory.insert(UserRecord::new(seed.user, SecretString::from(seed.password)))?;
        }
        Ok(directory)
    }

    /// The account matching `email` and `password`.
    #[must_use]
    pub fn authenticate(&self, email: &str, password: &SecretString) -> Option<&User> {
        self.records
            .iter()
            .find(|record| record.matches(email, password))
            .map(UserRecord::user)
    }

    /// Whether an account uses `email`.
    #[must_use]
    pub fn contains_email(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    /// The account using `email`.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.records
            .iter()
            .map(UserRecord::user)
            .find(|user| user.email == *email)
    }

    /// Add an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken; the
    /// existing record is left as it was.
    pub fn insert(&mut self, record: UserRecord) -> Result<(), AuthError> {
        if self.contains_email(record.user.email.as_str()) {
            return Err(AuthError::UserAlreadyExists);
        }
        self.records.push(record);
        Ok(())
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[test]
    fn test_bundled_directory_has_demo_account() {
        let directory = UserDirectory::bundled().unwrap();
        assert!(directory.len() >= 1);
        let demo = directory
            .authenticate("demo@example.com", &secret("password"))
            .unwrap();
        assert_eq!(demo.id.as_str(), "u1");
        assert_eq!(demo.first_name, "Demo");
    }

    #[test]
    fn test_authenticate_is_exact() {
        let directory = UserDirectory::bundled().unwrap();
        assert!(
            directory
                .authenticate("demo@example.com", &secret("Password"))
                .is_none()
        );
        assert!(
            directory
                .authenticate("Demo@example.com", &secret("password"))
                .is_none()
        );
        assert!(
            directory
                .authenticate("demo@example.com ", &secret("password"))
                .is_none()
        );
    }

    #[test]
    fn test_insert_rejects_taken_email() {
        let mut directory = UserDirectory::bundled().unwrap();
        let existing = directory.find_by_email("demo@example.com").unwrap().clone();
        let mut impostor = existing.clone();
        impostor.first_name = "Impostor".to_owned();

        let err = directory
            .insert(UserRecord::new(impostor, secret("other")))
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
        assert_eq!(directory.find_by_email("demo@example.com"), Some(&existing));
        assert!(
            directory
                .authenticate("demo@example.com", &secret("password"))
                .is_some()
        );
    }

    #[test]
    fn test_duplicate_seed_emails_rejected() {
        let json = r#"{"users": [
            {"id": "u1", "first_name": "A", "last_name": "B", "email": "a@b.co", "password": "x"},
            {"id": "u2", "first_name": "C", "last_name": "D", "email": "a@b.co", "password": "y"}
        ]}"#;
        assert!(matches!(
            UserDirectory::from_json(json),
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            UserDirectory::from_json("{\"users\": 3}"),
            Err(AuthError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let directory = UserDirectory::bundled().unwrap();
        let debug = format!("{directory:?}");
        assert!(!debug.contains("\"password\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
