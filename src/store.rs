//! The expense store: an explicitly constructed handle to the database.
//!
//! The store replaces an ambient process-wide connection: it is opened once
//! at app start, owns the connection behind a lock, and is cloned into the
//! screens that need it. Every operation is an async method returning a
//! `Result`, so callers always observe both success values and structured
//! errors.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    budget::{CategoryBudgetStatus, budget_status},
    category::{
        Category, delete_all_categories, delete_categories_for_user, get_all_categories,
        upsert_category,
    },
    db::initialize,
    expense::{
        Expense, ExpenseDraft, ExpenseId, Window, YearMonth, create_expense, delete_expense,
        get_all_expenses, get_expense, get_expenses_in_date_range, get_expenses_in_month,
        get_expenses_in_month_range, get_expenses_in_year, get_expenses_in_year_range,
        get_expenses_on_date, update_expense, window_total,
    },
    user::UserEmail,
};

/// A handle to the expense database shared by all screens.
///
/// All operations are serialized through a single connection; each method
/// holds the lock only for the duration of its own statement.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl ExpenseStore {
    /// Create a store around an opened database connection.
    ///
    /// Initializes the schema, which is idempotent and safe on every app
    /// start.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// The shared connection, for collaborators that live in the same
    /// database (e.g. the local auth provider).
    pub(crate) fn connection(&self) -> Arc<Mutex<Connection>> {
        self.connection.clone()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLock)
    }

    /// Insert a validated expense, returning it with its assigned ID.
    ///
    /// The stored amount is computed as price times quantity at write time.
    ///
    /// # Errors
    /// Returns [Error::SqlError] or [Error::DatabaseLock] if the write fails.
    pub async fn add_expense(&self, draft: ExpenseDraft) -> Result<Expense, Error> {
        let connection = self.lock()?;
        let expense = create_expense(draft, &connection)?;
        tracing::info!("added expense {} for {}", expense.id, expense.user_email);

        Ok(expense)
    }

    /// Retrieve a single expense by ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the ID does not refer to an expense.
    pub async fn expense(&self, id: ExpenseId) -> Result<Expense, Error> {
        let connection = self.lock()?;
        get_expense(id, &connection)
    }

    /// Retrieve every expense owned by `user_email`, unordered.
    pub async fn expenses(&self, user_email: &UserEmail) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_all_expenses(user_email, &connection)
    }

    /// Retrieve the expenses on exactly `date`.
    pub async fn expenses_on_date(
        &self,
        user_email: &UserEmail,
        date: Date,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_expenses_on_date(user_email, date, &connection)
    }

    /// Retrieve the expenses within the calendar `month`.
    pub async fn expenses_in_month(
        &self,
        user_email: &UserEmail,
        month: YearMonth,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_expenses_in_month(user_email, month, &connection)
    }

    /// Retrieve the expenses within the calendar `year`.
    pub async fn expenses_in_year(
        &self,
        user_email: &UserEmail,
        year: i32,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_expenses_in_year(user_email, year, &connection)
    }

    /// Retrieve the expenses with a date between `from` and `to` inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `to` is not strictly after
    /// `from`; the range is rejected before any query is issued.
    pub async fn expenses_in_date_range(
        &self,
        user_email: &UserEmail,
        from: Date,
        to: Date,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_expenses_in_date_range(user_email, from, to, &connection)
    }

    /// Retrieve the expenses in a month between `from` and `to` inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonthRange] if `to` is not strictly after
    /// `from`.
    pub async fn expenses_in_month_range(
        &self,
        user_email: &UserEmail,
        from: YearMonth,
        to: YearMonth,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_expenses_in_month_range(user_email, from, to, &connection)
    }

    /// Retrieve the expenses in a year between `from` and `to` inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidYearRange] if `to` is not strictly after
    /// `from`.
    pub async fn expenses_in_year_range(
        &self,
        user_email: &UserEmail,
        from: i32,
        to: i32,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        get_expenses_in_year_range(user_email, from, to, &connection)
    }

    /// Overwrite the expense row identified by `expense.id`, recomputing the
    /// amount from price and quantity.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingExpense] if the ID does not refer to a
    /// row.
    pub async fn update_expense(&self, expense: &Expense) -> Result<Expense, Error> {
        let connection = self.lock()?;
        update_expense(expense, &connection)
    }

    /// Delete the expense row identified by `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingExpense] if the ID does not refer to a
    /// row.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), Error> {
        let connection = self.lock()?;
        delete_expense(id, &connection)
    }

    /// Insert a category, replacing its limits if the `(user, name)` pair
    /// already exists.
    pub async fn upsert_category(&self, category: &Category) -> Result<(), Error> {
        let connection = self.lock()?;
        upsert_category(category, &connection)
    }

    /// Retrieve every category owned by `user_email`, ordered by name.
    pub async fn categories(&self, user_email: &UserEmail) -> Result<Vec<Category>, Error> {
        let connection = self.lock()?;
        get_all_categories(user_email, &connection)
    }

    /// Delete the categories owned by `user_email`, returning how many were
    /// removed.
    pub async fn delete_categories_for_user(
        &self,
        user_email: &UserEmail,
    ) -> Result<usize, Error> {
        let connection = self.lock()?;
        let removed = delete_categories_for_user(user_email, &connection)?;
        tracing::info!("deleted {} categories for {}", removed, user_email);

        Ok(removed)
    }

    /// Delete every category for every user.
    ///
    /// Administrative operation, not reachable from the app path; the admin
    /// CLI requires explicit confirmation before calling it.
    pub async fn delete_all_categories_global(&self) -> Result<usize, Error> {
        let connection = self.lock()?;
        let removed = delete_all_categories(&connection)?;
        tracing::warn!("deleted all {} categories for all users", removed);

        Ok(removed)
    }

    /// The total spent by `user_email` within `window` anchored to
    /// `anchor_date`.
    pub async fn window_total(
        &self,
        user_email: &UserEmail,
        window: Window,
        anchor_date: Date,
    ) -> Result<f64, Error> {
        let expenses = self.expenses(user_email).await?;

        Ok(window_total(&expenses, window, anchor_date))
    }

    /// Each of the user's categories with its day, month, and year spending
    /// compared against its caps, anchored to `anchor_date`.
    pub async fn budget_status(
        &self,
        user_email: &UserEmail,
        anchor_date: Date,
    ) -> Result<Vec<CategoryBudgetStatus>, Error> {
        let expenses = self.expenses(user_email).await?;
        let categories = self.categories(user_email).await?;

        Ok(budget_status(&expenses, &categories, anchor_date))
    }
}
