//! The authentication seam and a local SQLite-backed provider.
//!
//! Screens authenticate against an [AuthProvider] and use the signed-in
//! user's email as the partition key for every store query. The provider
//! publishes current-user changes through a watch channel so screens can
//! react to sign-in and sign-out.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tokio::sync::watch;

use crate::{
    Error,
    store::ExpenseStore,
    user::{UserEmail, create_user, get_password_hash, set_password_hash},
};

/// The operations the app needs from an authentication provider.
pub trait AuthProvider {
    /// Register a new user and sign them in.
    ///
    /// # Errors
    /// Returns [Error::InvalidEmail] if the email fails syntax validation,
    /// or [Error::DuplicateEmail] if it is already registered.
    fn sign_up(&self, email: &str, password: &str) -> Result<UserEmail, Error>;

    /// Sign in an existing user.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] for an unknown email or a wrong
    /// password, without distinguishing the two.
    fn sign_in(&self, email: &str, password: &str) -> Result<UserEmail, Error>;

    /// Sign out the current user, if any.
    fn sign_out(&self);

    /// Replace the password for a registered email.
    ///
    /// Does not require the user to be signed in; this backs the forgot
    /// password flow.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the email is not registered.
    fn reset_password(&self, email: &str, new_password: &str) -> Result<(), Error>;

    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserEmail>;

    /// Subscribe to current-user changes.
    fn subscribe(&self) -> watch::Receiver<Option<UserEmail>>;
}

/// An [AuthProvider] storing users in the same database as the expense store.
///
/// Passwords are stored as bcrypt hashes, never in plain text.
#[derive(Debug)]
pub struct SqliteAuthProvider {
    connection: Arc<Mutex<Connection>>,
    current_user: watch::Sender<Option<UserEmail>>,
}

impl SqliteAuthProvider {
    /// Create a provider sharing the expense store's database.
    ///
    /// Nobody is signed in initially.
    pub fn new(store: &ExpenseStore) -> Self {
        let (current_user, _) = watch::channel(None);

        Self {
            connection: store.connection(),
            current_user,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLock)
    }

    fn hash_password(password: &str) -> Result<String, Error> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AuthProvider for SqliteAuthProvider {
    fn sign_up(&self, email: &str, password: &str) -> Result<UserEmail, Error> {
        let email = UserEmail::new(email)?;
        let password_hash = Self::hash_password(password)?;

        {
            let connection = self.lock()?;
            create_user(&email, &password_hash, &connection)?;
        }

        tracing::info!("registered user {}", email);
        self.current_user.send_replace(Some(email.clone()));

        Ok(email)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<UserEmail, Error> {
        let email = UserEmail::new(email).map_err(|_| Error::InvalidCredentials)?;

        let password_hash = {
            let connection = self.lock()?;
            get_password_hash(&email, &connection).map_err(|error| match error {
                Error::NotFound => Error::InvalidCredentials,
                other => other,
            })?
        };

        let matches = bcrypt::verify(password, &password_hash)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        if !matches {
            return Err(Error::InvalidCredentials);
        }

        tracing::info!("signed in {}", email);
        self.current_user.send_replace(Some(email.clone()));

        Ok(email)
    }

    fn sign_out(&self) {
        if let Some(email) = self.current_user.send_replace(None) {
            tracing::info!("signed out {}", email);
        }
    }

    fn reset_password(&self, email: &str, new_password: &str) -> Result<(), Error> {
        let email = UserEmail::new(email)?;
        let password_hash = Self::hash_password(new_password)?;

        let connection = self.lock()?;
        set_password_hash(&email, &password_hash, &connection)
    }

    fn current_user(&self) -> Option<UserEmail> {
        self.current_user.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserEmail>> {
        self.current_user.subscribe()
    }
}
