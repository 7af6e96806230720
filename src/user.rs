//! The user email type that partitions all store data, and the user table.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated email address identifying a user.
///
/// Every expense and category row is owned by exactly one user email, and
/// every store query is scoped by it so one user's data is never visible to
/// another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    /// Create a user email.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidEmail] if `email` is not a syntactically valid
    /// email address.
    pub fn new(email: &str) -> Result<Self, Error> {
        let email = email.trim();

        if EmailAddress::is_valid(email) {
            Ok(Self(email.to_string()))
        } else {
            Err(Error::InvalidEmail(email.to_string()))
        }
    }

    /// Create a user email without validation.
    ///
    /// The caller should ensure the string is a valid email address. This is
    /// intended for strings read back from the database, which were validated
    /// when they were written.
    pub fn new_unchecked(email: &str) -> Self {
        Self(email.to_string())
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserEmail {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserEmail::new(s)
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Create the user table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub(crate) fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user with a pre-hashed password.
///
/// # Errors
/// Returns [Error::DuplicateEmail] if the email is already registered, or
/// [Error::SqlError] if there is some other SQL error.
pub(crate) fn create_user(
    email: &UserEmail,
    password_hash: &str,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user (email, password_hash) VALUES (?1, ?2)",
        (email.as_ref(), password_hash),
    )?;

    Ok(())
}

/// Get the password hash stored for `email`.
///
/// # Errors
/// Returns [Error::NotFound] if the email is not registered, or
/// [Error::SqlError] if there is some other SQL error.
pub(crate) fn get_password_hash(
    email: &UserEmail,
    connection: &Connection,
) -> Result<String, Error> {
    connection
        .prepare("SELECT password_hash FROM user WHERE email = :email")?
        .query_row(&[(":email", email.as_ref())], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Overwrite the password hash stored for `email`.
///
/// # Errors
/// Returns [Error::NotFound] if the email is not registered, or
/// [Error::SqlError] if there is some other SQL error.
pub(crate) fn set_password_hash(
    email: &UserEmail,
    password_hash: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password_hash = ?1 WHERE email = ?2",
        (password_hash, email.as_ref()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
