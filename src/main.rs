//! Admin CLI for the Hustle expense database.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use time::{Date, OffsetDateTime, macros::format_description};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use hustle::{
    Category, CategoryName, Error, Expense, ExpenseDraft, ExpenseStore, UserEmail, Window,
    YearMonth, open_database, total_per_category, window_total,
};

/// Inspect and administer a Hustle expense database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "hustle.db")]
    db_path: PathBuf,

    /// The log level to use when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema if it does not exist.
    Init,
    /// Add an expense for a user.
    AddExpense {
        /// The email of the owning user.
        #[arg(long)]
        user: UserEmail,
        /// The purchase date as YYYY-MM-DD. Defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// What was bought.
        #[arg(long)]
        item: String,
        /// The unit price.
        #[arg(long)]
        price: f64,
        /// How many units were bought.
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,
        /// The category the expense counts towards.
        #[arg(long, default_value = "Uncategorised")]
        category: String,
    },
    /// List a user's expenses, optionally filtered by date, month, year, or
    /// an inclusive date range.
    List {
        /// The email of the owning user.
        #[arg(long)]
        user: UserEmail,
        /// Only expenses on this exact date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// Only expenses in this month (YYYY-MM).
        #[arg(long)]
        month: Option<YearMonth>,
        /// Only expenses in this year.
        #[arg(long)]
        year: Option<i32>,
        /// Start of an inclusive date range; requires --to.
        #[arg(long, value_parser = parse_date, requires = "to")]
        from: Option<Date>,
        /// End of an inclusive date range; requires --from.
        #[arg(long, value_parser = parse_date, requires = "from")]
        to: Option<Date>,
        /// Print the expenses as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show a user's day, week, month, and year totals.
    Totals {
        /// The email of the owning user.
        #[arg(long)]
        user: UserEmail,
        /// The anchor date for the windows. Defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Add or replace a category's budget limits.
    SetCategory {
        /// The email of the owning user.
        #[arg(long)]
        user: UserEmail,
        /// The category name.
        #[arg(long)]
        name: CategoryName,
        /// The per-day spending cap.
        #[arg(long)]
        limit_day: Option<f64>,
        /// The per-month spending cap.
        #[arg(long)]
        limit_month: Option<f64>,
        /// The per-year spending cap.
        #[arg(long)]
        limit_year: Option<f64>,
    },
    /// Show a user's spending against their category budget limits.
    Budget {
        /// The email of the owning user.
        #[arg(long)]
        user: UserEmail,
        /// The anchor date for the windows. Defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Delete every category for every user.
    DeleteCategories {
        /// Confirm the deletion. Without this flag nothing is deleted.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logging(&args.log_level);

    if let Err(error) = run(args).await {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let connection = open_database(&args.db_path)?;
    let store = ExpenseStore::new(connection)?;

    match args.command {
        Command::Init => {
            // The schema is created by the store constructor.
            println!("initialised {}", args.db_path.display());
        }
        Command::AddExpense {
            user,
            date,
            item,
            price,
            quantity,
            category,
        } => {
            let date = date.unwrap_or_else(today);
            let draft = ExpenseDraft::new(user, date, &item, price, quantity, &category)?;
            let expense = store.add_expense(draft).await?;
            println!(
                "added expense {}: {} x{} = {:.2}",
                expense.id, expense.item_name, expense.quantity, expense.amount
            );
        }
        Command::List {
            user,
            date,
            month,
            year,
            from,
            to,
            json,
        } => {
            let expenses = if let Some(date) = date {
                store.expenses_on_date(&user, date).await?
            } else if let Some(month) = month {
                store.expenses_in_month(&user, month).await?
            } else if let Some(year) = year {
                store.expenses_in_year(&user, year).await?
            } else if let (Some(from), Some(to)) = (from, to) {
                store.expenses_in_date_range(&user, from, to).await?
            } else {
                store.expenses(&user).await?
            };

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&expenses)
                        .expect("expenses are always serializable")
                );
            } else {
                print_expense_table(&expenses);
            }
        }
        Command::Totals { user, date } => {
            let anchor_date = date.unwrap_or_else(today);
            let expenses = store.expenses(&user).await?;

            for window in [Window::Day, Window::Week, Window::Month, Window::Year] {
                println!(
                    "{:<10} {:>12.2}",
                    window.label(),
                    window_total(&expenses, window, anchor_date)
                );
            }

            println!("\nAll time, by category:");
            for (category, total) in total_per_category(&expenses) {
                println!("{category:<20} {total:>12.2}");
            }
        }
        Command::SetCategory {
            user,
            name,
            limit_day,
            limit_month,
            limit_year,
        } => {
            let category = Category {
                user_email: user,
                name,
                limit_day,
                limit_month,
                limit_year,
            };
            store.upsert_category(&category).await?;
            println!("saved category {}", category.name);
        }
        Command::Budget { user, date } => {
            let anchor_date = date.unwrap_or_else(today);
            let statuses = store.budget_status(&user, anchor_date).await?;

            for status in statuses {
                println!("{}", status.name);
                for (label, budget) in [
                    ("day", &status.day),
                    ("month", &status.month),
                    ("year", &status.year),
                ] {
                    match budget.limit {
                        Some(limit) => println!(
                            "  {label:<6} {:>10.2} / {limit:.2}{}",
                            budget.spent,
                            if budget.is_over() { "  OVER" } else { "" }
                        ),
                        None => println!("  {label:<6} {:>10.2}", budget.spent),
                    }
                }
            }
        }
        Command::DeleteCategories { yes } => {
            if !yes {
                println!("refusing to delete all categories for all users without --yes");
                return Ok(());
            }

            let removed = store.delete_all_categories_global().await?;
            println!("deleted {removed} categories");
        }
    }

    Ok(())
}

fn print_expense_table(expenses: &[Expense]) {
    println!(
        "{:>5}  {:<10}  {:<30}  {:>8}  {:>8}  {:>10}  {}",
        "id", "date", "item", "price", "qty", "amount", "category"
    );
    for expense in expenses {
        println!(
            "{:>5}  {:<10}  {:<30}  {:>8.2}  {:>8}  {:>10.2}  {}",
            expense.id,
            expense.date,
            expense.item_name,
            expense.price,
            expense.quantity,
            expense.amount,
            expense.category
        );
    }
}

fn parse_date(raw: &str) -> Result<Date, String> {
    let format = format_description!("[year]-[month]-[day]");

    Date::parse(raw, &format).map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn setup_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter))
        .init();
}
