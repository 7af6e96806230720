//! Opening the application database and creating its schema.

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, category::create_category_table, expense::create_expense_table,
    user::create_user_table,
};

/// Open the database file at `path`, creating it if it does not exist.
///
/// The connection should be opened once at app start and injected into the
/// [crate::ExpenseStore]; nothing reopens it implicitly.
///
/// # Errors
/// Returns an error if the file cannot be opened as a SQLite database.
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
    let connection = Connection::open(path.as_ref())?;
    tracing::info!("opened database at {}", path.as_ref().display());

    Ok(connection)
}

/// Create the expense, category, and user tables if they do not exist.
///
/// Idempotent and safe to call on every app start. All tables are created in
/// a single exclusive transaction so a partially initialized schema is never
/// left behind.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;
    create_category_table(&transaction)?;
    create_user_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
