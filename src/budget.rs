//! Comparing window spending against category budget limits.

use serde::Serialize;
use time::Date;

use crate::{
    category::Category,
    expense::{Expense, Window},
};

/// Spending within one calendar window compared against an optional cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowBudget {
    /// The amount spent within the window.
    pub spent: f64,
    /// The cap configured for the window, if any.
    pub limit: Option<f64>,
}

impl WindowBudget {
    /// Whether spending has exceeded the cap. Always false without a cap.
    pub fn is_over(&self) -> bool {
        match self.limit {
            Some(limit) => self.spent > limit,
            None => false,
        }
    }
}

/// A category's spending against its day, month, and year caps, anchored to
/// a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudgetStatus {
    /// The category name.
    pub name: String,
    /// Spending on the anchor day against the per-day cap.
    pub day: WindowBudget,
    /// Spending in the anchor day's month against the per-month cap.
    pub month: WindowBudget,
    /// Spending in the anchor day's year against the per-year cap.
    pub year: WindowBudget,
}

/// Compute each category's day, month, and year spending against its caps.
///
/// `anchor_date` is "now": the day, month, and year windows are the ones
/// containing it. Expenses referencing a category name with no category row
/// do not appear; categories with no expenses report zero spending.
pub fn budget_status(
    expenses: &[Expense],
    categories: &[Category],
    anchor_date: Date,
) -> Vec<CategoryBudgetStatus> {
    categories
        .iter()
        .map(|category| {
            let in_category: Vec<Expense> = expenses
                .iter()
                .filter(|expense| expense.category == category.name.as_ref())
                .cloned()
                .collect();

            CategoryBudgetStatus {
                name: category.name.to_string(),
                day: WindowBudget {
                    spent: crate::window_total(&in_category, Window::Day, anchor_date),
                    limit: category.limit_day,
                },
                month: WindowBudget {
                    spent: crate::window_total(&in_category, Window::Month, anchor_date),
                    limit: category.limit_month,
                },
                year: WindowBudget {
                    spent: crate::window_total(&in_category, Window::Year, anchor_date),
                    limit: category.limit_year,
                },
            }
        })
        .collect()
}
