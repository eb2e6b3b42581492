//! Authentication error types.

use thiserror::Error;

use super::validation::RegistrationErrors;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ecoshop_core::EmailError),

    /// No account matches the email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with the email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The operation needs a signed-in user.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Registration form failed validation.
    #[error("registration invalid: {0}")]
    Validation(RegistrationErrors),

    /// The user directory dataset could not be parsed.
    #[error("invalid user directory: {0}")]
    InvalidDirectory(#[from] serde_json::Error),
}
