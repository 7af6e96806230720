//! Hustle is a personal to-do and expense tracker.
//!
//! This library implements the data layer that the app screens sit on top of:
//! a SQLite-backed expense store partitioned by user email, category budget
//! limits, calendar-window totals, an in-memory task board, and a local
//! authentication provider.

#![warn(missing_docs)]

use time::Date;

mod auth;
mod budget;
mod category;
mod db;
mod expense;
mod store;
mod task;
mod user;
mod view;

pub use auth::{AuthProvider, SqliteAuthProvider};
pub use budget::{CategoryBudgetStatus, WindowBudget, budget_status};
pub use category::{Category, CategoryName, upsert_category};
pub use db::{initialize, open_database};
pub use expense::{
    DateRange, Expense, ExpenseDraft, ExpenseId, Window, YearMonth, total_per_category,
    window_total,
};
pub use store::ExpenseStore;
pub use task::{Task, TaskBoard, TaskDescription, TaskText};
pub use user::UserEmail;
pub use view::ViewToken;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password combination that does not match a
    /// registered user.
    ///
    /// The message deliberately does not distinguish an unknown email from a
    /// wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A string used as an email address failed syntax validation.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email used to sign up already belongs to a registered user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An unexpected error occurred in the underlying password hashing
    /// library.
    ///
    /// The error string should only be logged for debugging, not shown to the
    /// user.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used for an expense item name.
    #[error("item name cannot be empty")]
    EmptyItemName,

    /// A negative unit price was used to create an expense.
    #[error("price must not be negative, got {0}")]
    NegativePrice(f64),

    /// A negative quantity was used to create an expense.
    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(f64),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A date range fetch was requested where the end is not strictly after
    /// the start.
    ///
    /// The range is rejected before any query is issued.
    #[error("invalid date range: {1} must be after {0}")]
    InvalidDateRange(Date, Date),

    /// A month range fetch was requested where the end is not strictly after
    /// the start.
    #[error("invalid month range: {1} must be after {0}")]
    InvalidMonthRange(YearMonth, YearMonth),

    /// A year range fetch was requested where the end is not strictly after
    /// the start.
    #[error("invalid year range: {1} must be after {0}")]
    InvalidYearRange(i32, i32),

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// An empty string was used for a task.
    #[error("task text cannot be empty")]
    EmptyTaskText,

    /// A task longer than the allowed number of characters was added.
    #[error("task text is longer than {} characters", task::TASK_TEXT_LIMIT)]
    TaskTextTooLong,

    /// A task description longer than the allowed number of characters was
    /// set.
    #[error(
        "task description is longer than {} characters",
        task::TASK_DESCRIPTION_LIMIT
    )]
    TaskDescriptionTooLong,

    /// The task board already holds the maximum number of incomplete tasks.
    #[error("cannot add more than {} incomplete tasks", task::TASK_COUNT_LIMIT)]
    TaskLimitReached,

    /// A task index did not refer to a task on the board.
    #[error("no task at index {0}")]
    TaskNotFound(usize),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
