//! Calendar-window totals for the expense summary display.
//!
//! A window is a calendar-relative span (day, week, month, or year) anchored
//! to "now": the day window is today, the week window is the Monday-to-Sunday
//! week containing today, and so on. The summary display cycles through the
//! windows in a fixed order, so [Window::next] wraps year back around to day.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use super::core::Expense;

/// A calendar-relative time span used to bucket expenses for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Window {
    /// The current calendar day.
    Day,
    /// The Monday-to-Sunday week containing the current day.
    Week,
    /// The current calendar month.
    Month,
    /// The current calendar year.
    Year,
}

impl Window {
    /// The window shown when the summary first loads.
    pub fn default_window() -> Self {
        Self::Day
    }

    /// The next window in the toggle cycle: day, week, month, year, and back
    /// to day.
    pub fn next(self) -> Self {
        match self {
            Self::Day => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Year,
            Self::Year => Self::Day,
        }
    }

    /// The display label for the window.
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Today",
            Self::Week => "This week",
            Self::Month => "This month",
            Self::Year => "This year",
        }
    }

    /// The inclusive date range of the window containing `anchor_date`.
    ///
    /// Windows are always anchored to the moment the computation runs, never
    /// to a record's own date.
    pub fn range(self, anchor_date: Date) -> DateRange {
        match self {
            Self::Day => DateRange {
                start: anchor_date,
                end: anchor_date,
            },
            Self::Week => week_bounds(anchor_date),
            Self::Month => month_bounds(anchor_date.year(), anchor_date.month()),
            Self::Year => year_bounds(anchor_date.year()),
        }
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls within the range, inclusive of both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Sum the amounts of the expenses whose date falls in `window` anchored to
/// `anchor_date`.
pub fn window_total(expenses: &[Expense], window: Window, anchor_date: Date) -> f64 {
    total_in_range(expenses, window.range(anchor_date))
}

/// Sum the amounts of the expenses whose date falls in `range`.
pub fn total_in_range(expenses: &[Expense], range: DateRange) -> f64 {
    expenses
        .iter()
        .filter(|expense| range.contains(expense.date))
        .map(|expense| expense.amount)
        .sum()
}

/// Sum expense amounts per category name.
pub fn total_per_category(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    totals
}

fn week_bounds(anchor_date: Date) -> DateRange {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    DateRange { start, end }
}

fn month_bounds(year: i32, month: Month) -> DateRange {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    DateRange { start, end }
}

fn year_bounds(year: i32) -> DateRange {
    DateRange {
        start: Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date"),
        end: Date::from_calendar_date(year, Month::December, 31).expect("invalid year end date"),
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{expense::core::Expense, user::UserEmail};

    use super::{DateRange, Window, total_per_category, window_total};

    fn expense(date: time::Date, amount: f64, category: &str) -> Expense {
        Expense {
            id: 0,
            user_email: UserEmail::new_unchecked("alice@example.com"),
            date,
            item_name: "Item".to_string(),
            price: amount,
            quantity: 1.0,
            amount,
            category: category.to_string(),
        }
    }

    #[test]
    fn window_cycle_wraps_back_to_day() {
        assert_eq!(Window::Day.next(), Window::Week);
        assert_eq!(Window::Week.next(), Window::Month);
        assert_eq!(Window::Month.next(), Window::Year);
        assert_eq!(Window::Year.next(), Window::Day);
    }

    #[test]
    fn day_range_is_the_anchor_date() {
        let range = Window::Day.range(date!(2024 - 06 - 11));

        assert_eq!(
            range,
            DateRange {
                start: date!(2024 - 06 - 11),
                end: date!(2024 - 06 - 11),
            }
        );
    }

    #[test]
    fn week_range_runs_monday_to_sunday() {
        // 2024-06-11 is a Tuesday.
        let range = Window::Week.range(date!(2024 - 06 - 11));

        assert_eq!(
            range,
            DateRange {
                start: date!(2024 - 06 - 10),
                end: date!(2024 - 06 - 16),
            }
        );
    }

    #[test]
    fn month_range_covers_leap_february() {
        let range = Window::Month.range(date!(2024 - 02 - 15));

        assert_eq!(
            range,
            DateRange {
                start: date!(2024 - 02 - 01),
                end: date!(2024 - 02 - 29),
            }
        );
    }

    #[test]
    fn year_range_covers_the_whole_year() {
        let range = Window::Year.range(date!(2024 - 06 - 11));

        assert_eq!(
            range,
            DateRange {
                start: date!(2024 - 01 - 01),
                end: date!(2024 - 12 - 31),
            }
        );
    }

    #[test]
    fn totals_match_for_each_window() {
        let expenses = vec![
            expense(date!(2024 - 06 - 10), 10.0, "Groceries"),
            expense(date!(2024 - 06 - 11), 20.0, "Groceries"),
            expense(date!(2024 - 07 - 01), 40.0, "Transport"),
        ];
        let now = date!(2024 - 06 - 11);

        assert_eq!(window_total(&expenses, Window::Day, now), 20.0);
        assert_eq!(window_total(&expenses, Window::Week, now), 30.0);
        assert_eq!(window_total(&expenses, Window::Month, now), 30.0);
        assert_eq!(window_total(&expenses, Window::Year, now), 70.0);
    }

    #[test]
    fn windows_are_anchored_to_now_not_to_records() {
        let expenses = vec![expense(date!(2024 - 06 - 10), 10.0, "Groceries")];
        // A Monday one week after the record: the record's own week must not
        // count towards this week's total.
        let now = date!(2024 - 06 - 17);

        assert_eq!(window_total(&expenses, Window::Week, now), 0.0);
        assert_eq!(window_total(&expenses, Window::Month, now), 10.0);
    }

    #[test]
    fn per_category_totals_group_by_name() {
        let expenses = vec![
            expense(date!(2024 - 06 - 10), 10.0, "Groceries"),
            expense(date!(2024 - 06 - 11), 20.0, "Groceries"),
            expense(date!(2024 - 06 - 11), 5.0, "Transport"),
        ];

        let totals = total_per_category(&expenses);

        assert_eq!(totals.get("Groceries"), Some(&30.0));
        assert_eq!(totals.get("Transport"), Some(&5.0));
    }
}
