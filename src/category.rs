//! Spending categories and their optional budget limits.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, user::UserEmail};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A spending category with optional per-day, per-month, and per-year caps.
///
/// Unique per `(user_email, name)` pair; inserting the same pair again
/// replaces the limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The email of the user that owns this category.
    pub user_email: UserEmail,
    /// The category name, unique within the owning user's scope.
    pub name: CategoryName,
    /// The spending cap for a single day, if any.
    pub limit_day: Option<f64>,
    /// The spending cap for a calendar month, if any.
    pub limit_month: Option<f64>,
    /// The spending cap for a calendar year, if any.
    pub limit_year: Option<f64>,
}

/// Insert a category, replacing the limits if the `(user_email, name)` pair
/// already exists.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn upsert_category(category: &Category, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT OR REPLACE INTO category (user_email, name, limit_day, limit_month, limit_year)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            category.user_email.as_ref(),
            category.name.as_ref(),
            category.limit_day,
            category.limit_month,
            category.limit_year,
        ),
    )?;

    Ok(())
}

/// Retrieve every category owned by `user_email`, ordered alphabetically by
/// name.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_categories(
    user_email: &UserEmail,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT user_email, name, limit_day, limit_month, limit_year
             FROM category WHERE user_email = :user_email ORDER BY name ASC",
        )?
        .query_map(&[(":user_email", user_email.as_ref())], map_row)?
        .map(|category_result| category_result.map_err(|error| error.into()))
        .collect()
}

/// Delete the categories owned by `user_email` and return how many were
/// removed.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_categories_for_user(
    user_email: &UserEmail,
    connection: &Connection,
) -> Result<usize, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE user_email = ?1",
        [user_email.as_ref()],
    )?;

    Ok(rows_affected)
}

/// Delete every category for every user and return how many were removed.
///
/// This is an administrative operation: it is deliberately not scoped to a
/// user and is only reachable from the admin CLI, never from the app path.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_all_categories(connection: &Connection) -> Result<usize, Error> {
    let rows_affected = connection.execute("DELETE FROM category", ())?;

    Ok(rows_affected)
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            user_email TEXT NOT NULL,
            name TEXT NOT NULL,
            limit_day REAL,
            limit_month REAL,
            limit_year REAL,
            UNIQUE(user_email, name)
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_email: String = row.get(0)?;
    let raw_name: String = row.get(1)?;

    Ok(Category {
        user_email: UserEmail::new_unchecked(&raw_email),
        name: CategoryName::new_unchecked(&raw_name),
        limit_day: row.get(2)?,
        limit_month: row.get(3)?,
        limit_year: row.get(4)?,
    })
}


#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{db::initialize, user::UserEmail};

    use super::{
        Category, CategoryName, delete_all_categories, delete_categories_for_user,
        get_all_categories, upsert_category,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn category(email: &str, name: &str, limit_day: Option<f64>) -> Category {
        Category {
            user_email: UserEmail::new_unchecked(email),
            name: CategoryName::new_unchecked(name),
            limit_day,
            limit_month: None,
            limit_year: None,
        }
    }

    #[test]
    fn upsert_inserts_new_category() {
        let connection = get_test_connection();
        let groceries = category("alice@example.com", "Groceries", Some(50.0));

        upsert_category(&groceries, &connection).expect("Could not upsert category");

        let got = get_all_categories(&groceries.user_email, &connection)
            .expect("Could not fetch categories");
        assert_eq!(got, vec![groceries]);
    }

    #[test]
    fn upsert_replaces_limits_instead_of_duplicating() {
        let connection = get_test_connection();
        let original = category("alice@example.com", "Groceries", Some(50.0));
        upsert_category(&original, &connection).expect("Could not upsert category");

        let replacement = Category {
            limit_day: Some(75.0),
            limit_month: Some(900.0),
            ..original.clone()
        };
        upsert_category(&replacement, &connection).expect("Could not upsert category");

        let got = get_all_categories(&original.user_email, &connection)
            .expect("Could not fetch categories");
        assert_eq!(got, vec![replacement]);
    }

    #[test]
    fn same_name_is_allowed_for_different_users() {
        let connection = get_test_connection();
        let alices = category("alice@example.com", "Groceries", Some(50.0));
        let bobs = category("bob@example.com", "Groceries", Some(20.0));

        upsert_category(&alices, &connection).expect("Could not upsert category");
        upsert_category(&bobs, &connection).expect("Could not upsert category");

        assert_eq!(
            get_all_categories(&alices.user_email, &connection),
            Ok(vec![alices])
        );
        assert_eq!(
            get_all_categories(&bobs.user_email, &connection),
            Ok(vec![bobs])
        );
    }

    #[test]
    fn get_all_categories_orders_by_name() {
        let connection = get_test_connection();
        let user = UserEmail::new_unchecked("alice@example.com");
        let transport = category("alice@example.com", "Transport", None);
        let groceries = category("alice@example.com", "Groceries", None);
        upsert_category(&transport, &connection).expect("Could not upsert category");
        upsert_category(&groceries, &connection).expect("Could not upsert category");

        let got = get_all_categories(&user, &connection).expect("Could not fetch categories");

        assert_eq!(got, vec![groceries, transport]);
    }

    #[test]
    fn delete_for_user_leaves_other_users_categories() {
        let connection = get_test_connection();
        let alices = category("alice@example.com", "Groceries", None);
        let bobs = category("bob@example.com", "Transport", None);
        upsert_category(&alices, &connection).expect("Could not upsert category");
        upsert_category(&bobs, &connection).expect("Could not upsert category");

        let removed = delete_categories_for_user(&alices.user_email, &connection)
            .expect("Could not delete categories");

        assert_eq!(removed, 1);
        assert_eq!(
            get_all_categories(&alices.user_email, &connection),
            Ok(vec![])
        );
        assert_eq!(
            get_all_categories(&bobs.user_email, &connection),
            Ok(vec![bobs])
        );
    }

    #[test]
    fn delete_all_removes_every_users_categories() {
        let connection = get_test_connection();
        let alices = category("alice@example.com", "Groceries", None);
        let bobs = category("bob@example.com", "Transport", None);
        upsert_category(&alices, &connection).expect("Could not upsert category");
        upsert_category(&bobs, &connection).expect("Could not upsert category");

        let removed = delete_all_categories(&connection).expect("Could not delete categories");

        assert_eq!(removed, 2);
        assert_eq!(
            get_all_categories(&alices.user_email, &connection),
            Ok(vec![])
        );
        assert_eq!(get_all_categories(&bobs.user_email, &connection), Ok(vec![]));
    }
}
