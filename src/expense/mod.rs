//! Expense records: the data model, database queries, and calendar-window
//! aggregation.

mod core;
mod query;
mod window;

pub use core::{
    Expense, ExpenseDraft, ExpenseId, create_expense, create_expense_table, delete_expense,
    get_all_expenses, get_expense, update_expense,
};
pub use query::{
    YearMonth, get_expenses_in_date_range, get_expenses_in_month, get_expenses_in_month_range,
    get_expenses_in_year, get_expenses_in_year_range, get_expenses_on_date,
};
pub use window::{DateRange, Window, total_in_range, total_per_category, window_total};
