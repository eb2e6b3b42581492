//! Simulated authentication.
//!
//! # Flow
//!
//! 1. `login` matches the email and password against the [`UserDirectory`]
//! 2. The signed-in [`User`] (no credential) is saved under the `user` key
//! 3. A later [`AuthStore::load`] rehydrates the session from that key
//! 4. `logout` removes the key
//!
//! Registration validates the form and appends to the in-memory directory
//! without signing the new account in.

mod directory;
mod error;
mod validation;

pub use directory::{UserDirectory, UserRecord};
pub use error::AuthError;
pub use validation::{Registration, RegistrationErrors, RegistrationField, ValidRegistration};

use tracing::instrument;

use ecoshop_core::{Email, UserId};
use secrecy::SecretString;

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{DEFAULT_AVATAR, User};
use crate::storage::{SharedStorage, keys, load_or_discard, persist_or_log, remove_or_log};
use crate::store::{SubscriptionId, Subscribers};

/// Who is using the storefront.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthSession {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl AuthSession {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Profile edit form. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Session state over the user directory.
pub struct AuthStore {
    session: AuthSession,
    directory: UserDirectory,
    storage: SharedStorage,
    subscribers: Subscribers<AuthSession>,
}

impl AuthStore {
    /// Restore the session saved in `storage`, or start anonymous.
    #[must_use]
    pub fn load(storage: SharedStorage, directory: UserDirectory) -> Self {
        let session = load_or_discard::<User>(storage.as_ref(), keys::USER)
            .map_or(AuthSession::Anonymous, AuthSession::Authenticated);
        if let AuthSession::Authenticated(user) = &session {
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::debug!(user_id = %user.id, "Session restored");
        }

        Self {
            session,
            directory,
            storage,
            subscribers: Subscribers::new(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The accounts known to this store.
    #[must_use]
    pub const fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Sign in with an exact email and password match.
    ///
    /// The session user gets the default avatar if the account has none or
    /// an empty one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches; any
    /// existing session is kept.
    #[instrument(skip_all, fields(email = %email))]
    pub fn login(&mut self, email: &str, password: &SecretString) -> Result<&User, AuthError> {
        let Some(found) = self.directory.authenticate(email, password) else {
            tracing::info!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let mut user = found.clone();
        if user.avatar.as_deref().is_none_or(str::is_empty) {
            user.avatar = Some(DEFAULT_AVATAR.to_owned());
        }

        tracing::info!(user_id = %user.id, "User logged in");
        set_sentry_user(&user.id, Some(user.email.as_str()));
        add_breadcrumb("auth", "Logged in", Some(&[("user_id", user.id.as_str())]));

        self.authenticate(user)
    }

    /// Create an account. Does not sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is invalid and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    #[instrument(skip_all, fields(email = %registration.email))]
    pub fn register(&mut self, registration: &Registration) -> Result<User, AuthError> {
        let valid = registration.validate().map_err(AuthError::Validation)?;
        if self.directory.contains_email(valid.email.as_str()) {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = User {
            id: UserId::generate(),
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email,
            avatar: Some(DEFAULT_AVATAR.to_owned()),
            addresses: Vec::new(),
            payment_methods: Vec::new(),
            orders: Vec::new(),
        };
        self.directory
            .insert(UserRecord::new(user.clone(), valid.password))?;

        tracing::info!(user_id = %user.id, "User registered");
        add_breadcrumb("auth", "Registered", Some(&[("user_id", user.id.as_str())]));
        Ok(user)
    }

    /// Sign out and forget the saved session.
    #[instrument(skip_all)]
    pub fn logout(&mut self) {
        if let AuthSession::Authenticated(user) = &self.session {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.session = AuthSession::Anonymous;
        remove_or_log(self.storage.as_ref(), keys::USER);
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        self.subscribers.notify(&self.session);
    }

    /// Replace the signed-in user's details.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    #[instrument(skip_all, fields(user_id = %updated.id))]
    pub fn update_user(&mut self, updated: User) -> Result<&User, AuthError> {
        if !self.session.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }
        tracing::debug!("User updated");
        self.authenticate(updated)
    }

    /// Merge profile edits into the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in and
    /// `AuthError::InvalidEmail` if a new email does not parse.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User, AuthError> {
        let mut user = self
            .current_user()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)?;
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = update.email {
            user.email = Email::parse(&email)?;
        }
        self.update_user(user)
    }

    /// Call `listener` with the new session after login, logout, and updates.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&AuthSession) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    /// Stop notifying a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn authenticate(&mut self, user: User) -> Result<&User, AuthError> {
        persist_or_log(self.storage.as_ref(), keys::USER, &user);
        self.session = AuthSession::Authenticated(user);
        self.subscribers.notify(&self.session);
        self.session.user().ok_or(AuthError::NotAuthenticated)
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("session", &self.session)
            .field("directory", &self.directory.len())
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
