//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, user::UserEmail};

/// Alias for the integer type used for expense row IDs.
pub type ExpenseId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A single purchase: an item bought on a date at a unit price and quantity.
///
/// To create a new `Expense`, validate the fields with [ExpenseDraft::new]
/// and insert the draft with [create_expense].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense row.
    pub id: ExpenseId,
    /// The email of the user that owns this expense.
    pub user_email: UserEmail,
    /// The calendar day the purchase was made.
    pub date: Date,
    /// What was bought.
    pub item_name: String,
    /// The unit price of the item.
    pub price: f64,
    /// How many units were bought.
    pub quantity: f64,
    /// The total spent, i.e. price times quantity.
    ///
    /// Stored redundantly at write time and never re-derived on read. Writes
    /// ([create_expense], [update_expense]) always recompute it from price
    /// and quantity.
    pub amount: f64,
    /// The name of the category this expense counts towards.
    ///
    /// Expected to match a [crate::Category] name but not enforced by a
    /// foreign key, so an expense may reference a category that has since
    /// been deleted.
    pub category: String,
}

/// A validated, not-yet-inserted expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// The email of the user that owns this expense.
    pub user_email: UserEmail,
    /// The calendar day the purchase was made.
    pub date: Date,
    /// What was bought.
    pub item_name: String,
    /// The unit price of the item.
    pub price: f64,
    /// How many units were bought.
    pub quantity: f64,
    /// The name of the category this expense counts towards.
    pub category: String,
}

impl ExpenseDraft {
    /// Validate the fields for a new expense.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyItemName] if `item_name` is empty or whitespace,
    /// - [Error::NegativePrice] if `price` is less than zero,
    /// - [Error::NegativeQuantity] if `quantity` is less than zero.
    pub fn new(
        user_email: UserEmail,
        date: Date,
        item_name: &str,
        price: f64,
        quantity: f64,
        category: &str,
    ) -> Result<Self, Error> {
        let item_name = item_name.trim();

        if item_name.is_empty() {
            return Err(Error::EmptyItemName);
        }

        if price < 0.0 {
            return Err(Error::NegativePrice(price));
        }

        if quantity < 0.0 {
            return Err(Error::NegativeQuantity(quantity));
        }

        Ok(Self {
            user_email,
            date,
            item_name: item_name.to_string(),
            price,
            quantity,
            category: category.trim().to_string(),
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a new expense into the database.
///
/// The stored amount is computed here as price times quantity, so the
/// redundant column can never disagree with the other two at write time.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(draft: ExpenseDraft, connection: &Connection) -> Result<Expense, Error> {
    let amount = draft.price * draft.quantity;

    let expense = connection
        .prepare(
            "INSERT INTO expense (user_email, date, item_name, price, quantity, amount, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_email, date, item_name, price, quantity, amount, category",
        )?
        .query_row(
            (
                draft.user_email.as_ref(),
                draft.date,
                draft.item_name,
                draft.price,
                draft.quantity,
                amount,
                draft.category,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Retrieve every expense owned by `user_email`, unordered.
///
/// Ordering is the caller's responsibility downstream.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_expenses(
    user_email: &UserEmail,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = :user_email",
        )?
        .query_map(&[(":user_email", user_email.as_ref())], map_expense_row)?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the expense row identified by `expense.id`.
///
/// The amount is recomputed from price and quantity before writing; the
/// amount field on `expense` is ignored. The write is scoped to exactly the
/// one row with a matching ID, so no other row is ever touched.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `expense.id` does not refer to a row in
///   the database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<Expense, Error> {
    let amount = expense.price * expense.quantity;

    let rows_affected = connection.execute(
        "UPDATE expense
         SET date = ?1, item_name = ?2, price = ?3, quantity = ?4, amount = ?5, category = ?6
         WHERE id = ?7",
        (
            expense.date,
            &expense.item_name,
            expense.price,
            expense.quantity,
            amount,
            &expense.category,
            expense.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(Expense {
        amount,
        ..expense.clone()
    })
}

/// Delete the expense row identified by `id`.
///
/// Scoped to exactly the one row with a matching ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to a row in the
///   database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_email TEXT NOT NULL,
            date TEXT NOT NULL,
            item_name TEXT NOT NULL,
            price REAL NOT NULL,
            quantity REAL NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_email, date);",
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub(crate) fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_email: String = row.get(1)?;
    let date = row.get(2)?;
    let item_name = row.get(3)?;
    let price = row.get(4)?;
    let quantity = row.get(5)?;
    let amount = row.get(6)?;
    let category = row.get(7)?;

    Ok(Expense {
        id,
        user_email: UserEmail::new_unchecked(&raw_email),
        date,
        item_name,
        price,
        quantity,
        amount,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, db::initialize, user::UserEmail};

    use super::{
        Expense, ExpenseDraft, create_expense, delete_expense, get_all_expenses, get_expense,
        update_expense,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn owner() -> UserEmail {
        UserEmail::new_unchecked("alice@example.com")
    }

    fn draft(item_name: &str, price: f64, quantity: f64) -> ExpenseDraft {
        ExpenseDraft::new(
            owner(),
            date!(2024 - 06 - 11),
            item_name,
            price,
            quantity,
            "Groceries",
        )
        .expect("Could not create draft")
    }

    #[test]
    fn create_stores_price_times_quantity_as_amount() {
        let conn = get_test_connection();

        let expense =
            create_expense(draft("Milk", 2.5, 4.0), &conn).expect("Could not create expense");

        assert_eq!(expense.amount, 10.0);
        assert_eq!(get_expense(expense.id, &conn), Ok(expense));
    }

    #[test]
    fn get_expense_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        let result = get_expense(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_all_expenses_only_returns_rows_for_the_given_user() {
        let conn = get_test_connection();
        let mine =
            create_expense(draft("Milk", 2.5, 1.0), &conn).expect("Could not create expense");
        let other_draft = ExpenseDraft::new(
            UserEmail::new_unchecked("bob@example.com"),
            date!(2024 - 06 - 11),
            "Bread",
            3.0,
            1.0,
            "Groceries",
        )
        .expect("Could not create draft");
        create_expense(other_draft, &conn).expect("Could not create expense");

        let got = get_all_expenses(&owner(), &conn).expect("Could not fetch expenses");

        assert_eq!(got, vec![mine]);
    }

    #[test]
    fn update_recomputes_amount_and_leaves_other_rows_unmodified() {
        let conn = get_test_connection();
        let target =
            create_expense(draft("Milk", 2.5, 1.0), &conn).expect("Could not create expense");
        let untouched =
            create_expense(draft("Bread", 3.0, 2.0), &conn).expect("Could not create expense");

        let edited = Expense {
            price: 4.0,
            quantity: 3.0,
            // A stale amount must be ignored and recomputed on write.
            amount: -1.0,
            item_name: "Oat milk".to_string(),
            ..target
        };
        let updated = update_expense(&edited, &conn).expect("Could not update expense");

        assert_eq!(updated.amount, 12.0);
        let fetched = get_expense(updated.id, &conn).expect("Could not fetch expense");
        assert_eq!(fetched, updated);
        assert_eq!(get_expense(untouched.id, &conn), Ok(untouched));
    }

    #[test]
    fn update_with_invalid_id_returns_update_missing_expense() {
        let conn = get_test_connection();
        let expense =
            create_expense(draft("Milk", 2.5, 1.0), &conn).expect("Could not create expense");

        let result = update_expense(
            &Expense {
                id: expense.id + 123,
                ..expense
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn delete_only_removes_the_given_row() {
        let conn = get_test_connection();
        let target =
            create_expense(draft("Milk", 2.5, 1.0), &conn).expect("Could not create expense");
        let kept = create_expense(draft("Bread", 3.0, 2.0), &conn).expect("Could not create expense");

        delete_expense(target.id, &conn).expect("Could not delete expense");

        assert_eq!(get_expense(target.id, &conn), Err(Error::NotFound));
        assert_eq!(get_all_expenses(&owner(), &conn), Ok(vec![kept]));
    }

    #[test]
    fn delete_does_not_affect_other_users_rows() {
        let conn = get_test_connection();
        let mine =
            create_expense(draft("Milk", 2.5, 1.0), &conn).expect("Could not create expense");
        let bob = UserEmail::new_unchecked("bob@example.com");
        let bobs_draft = ExpenseDraft::new(
            bob.clone(),
            date!(2024 - 06 - 11),
            "Bread",
            3.0,
            1.0,
            "Groceries",
        )
        .expect("Could not create draft");
        let bobs = create_expense(bobs_draft, &conn).expect("Could not create expense");

        delete_expense(mine.id, &conn).expect("Could not delete expense");

        assert_eq!(get_all_expenses(&bob, &conn), Ok(vec![bobs]));
    }

    #[test]
    fn delete_with_invalid_id_returns_delete_missing_expense() {
        let conn = get_test_connection();

        let result = delete_expense(999, &conn);

        assert_eq!(result, Err(Error::DeleteMissingExpense));
    }
}
