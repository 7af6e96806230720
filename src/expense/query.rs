//! Date, month, and year filtered fetches for expenses.
//!
//! Dates are stored as zero-padded `YYYY-MM-DD` text, so month and year
//! filters compare the `YYYY-MM` and `YYYY` prefixes of the date column and
//! lexical `BETWEEN` comparisons are equivalent to calendar comparisons.

use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{Error, user::UserEmail};

use super::core::{Expense, map_expense_row};

/// A calendar month in a specific year, e.g. June 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The month within the year.
    pub month: Month,
}

impl YearMonth {
    /// Create a year-month pair.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// A sortable key so month ranges can be validated and compared.
    fn key(self) -> (i32, u8) {
        (self.year, u8::from(self.month))
    }
}

impl Display for YearMonth {
    /// Formats as zero-padded `YYYY-MM`, matching the stored date prefix.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got \"{s}\""))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in \"{s}\""))?;
        let month: u8 = month
            .parse()
            .map_err(|_| format!("invalid month in \"{s}\""))?;
        let month = Month::try_from(month).map_err(|error| error.to_string())?;

        Ok(Self { year, month })
    }
}

/// Retrieve the expenses owned by `user_email` on exactly `date`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses_on_date(
    user_email: &UserEmail,
    date: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = ?1 AND date = ?2
             ORDER BY id ASC",
        )?
        .query_map((user_email.as_ref(), date), map_expense_row)?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the expenses owned by `user_email` within the calendar `month`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses_in_month(
    user_email: &UserEmail,
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = ?1 AND substr(date, 1, 7) = ?2
             ORDER BY date ASC, id ASC",
        )?
        .query_map((user_email.as_ref(), month.to_string()), map_expense_row)?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the expenses owned by `user_email` within the calendar `year`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses_in_year(
    user_email: &UserEmail,
    year: i32,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = ?1 AND substr(date, 1, 4) = ?2
             ORDER BY date ASC, id ASC",
        )?
        .query_map((user_email.as_ref(), format!("{year:04}")), map_expense_row)?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the expenses owned by `user_email` with a date between `from` and
/// `to` inclusive.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidDateRange] if `to` is not strictly after `from`; the
///   range is rejected before any query is issued,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_expenses_in_date_range(
    user_email: &UserEmail,
    from: Date,
    to: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    if to <= from {
        return Err(Error::InvalidDateRange(from, to));
    }

    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date ASC, id ASC",
        )?
        .query_map((user_email.as_ref(), from, to), map_expense_row)?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the expenses owned by `user_email` with a date in a month between
/// `from` and `to` inclusive.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidMonthRange] if `to` is not strictly after `from`; the
///   range is rejected before any query is issued,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_expenses_in_month_range(
    user_email: &UserEmail,
    from: YearMonth,
    to: YearMonth,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    if to.key() <= from.key() {
        return Err(Error::InvalidMonthRange(from, to));
    }

    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = ?1 AND substr(date, 1, 7) BETWEEN ?2 AND ?3
             ORDER BY date ASC, id ASC",
        )?
        .query_map(
            (user_email.as_ref(), from.to_string(), to.to_string()),
            map_expense_row,
        )?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the expenses owned by `user_email` with a date in a year between
/// `from` and `to` inclusive.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidYearRange] if `to` is not strictly after `from`; the
///   range is rejected before any query is issued,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_expenses_in_year_range(
    user_email: &UserEmail,
    from: i32,
    to: i32,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    if to <= from {
        return Err(Error::InvalidYearRange(from, to));
    }

    connection
        .prepare(
            "SELECT id, user_email, date, item_name, price, quantity, amount, category
             FROM expense WHERE user_email = ?1 AND substr(date, 1, 4) BETWEEN ?2 AND ?3
             ORDER BY date ASC, id ASC",
        )?
        .query_map(
            (user_email.as_ref(), format!("{from:04}"), format!("{to:04}")),
            map_expense_row,
        )?
        .map(|expense_result| expense_result.map_err(|error| error.into()))
        .collect()
}
