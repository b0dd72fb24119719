//! Command-line entry point over `nutriledger_core`.
//!
//! # Responsibility
//! - Provide a local probe for core linkage (`ping`, `version`).
//! - Print summaries and listings for one owner as pretty JSON.

use clap::{Parser, Subcommand};
use log::info;
use nutriledger_core::db::open_db;
use nutriledger_core::{
    default_log_level, expense_categories, init_logging, CoreConfig, ExpenseCategory,
    ExpenseView, LedgerService, LoggingConfig, MealType, RecordQuery, RecordWindow,
    SqliteRecordStore, SummaryService, SystemClock, UserId,
};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nutriledger", version, about = "Meal and expense ledger summaries")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, default_value = "nutriledger.sqlite3")]
    db: PathBuf,

    /// Owner whose records are read.
    #[arg(long, global = true, default_value_t = 1)]
    user: UserId,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Health check
    Ping,
    /// Print the core version
    Version,
    /// Combined meal and expense summary of one day
    Daily {
        #[arg(help = "Date as YYYY-MM-DD")]
        date: String,
    },
    /// Month totals with a full day grid
    Monthly { year: i32, month: u32 },
    /// Today, this month and the last seven days
    Dashboard,
    /// Trailing trend ending today, at most 366 days
    Trend {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// List the expense categories
    Categories,
    /// List the meal types
    MealTypes,
    /// List meals, newest first
    Meals {
        #[command(flatten)]
        filter: WindowArgs,
    },
    /// List expenses, newest first
    Expenses {
        #[command(flatten)]
        filter: WindowArgs,
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    month: Option<u32>,
}

impl WindowArgs {
    fn resolve(&self) -> Result<RecordWindow, Box<dyn Error>> {
        Ok(RecordWindow::from_params(
            self.date.as_deref(),
            self.year,
            self.month,
        )?)
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Ping => {
            println!("nutriledger_core ping={}", nutriledger_core::ping());
            return Ok(());
        }
        Command::Version => {
            println!("nutriledger_core version={}", nutriledger_core::core_version());
            return Ok(());
        }
        Command::Categories => {
            print_json(&expense_categories())?;
            return Ok(());
        }
        Command::MealTypes => {
            let keys: Vec<&str> = MealType::ALL.iter().map(|meal_type| meal_type.key()).collect();
            print_json(&keys)?;
            return Ok(());
        }
        _ => {}
    }

    let config = build_config(&cli)?;
    if let Some(logging) = &config.logging {
        init_logging(logging)?;
    }
    info!("event=cli_start module=cli status=ok");

    let conn = open_db(&config.db_path)?;
    let summaries = SummaryService::new(SqliteRecordStore::new(&conn), SystemClock);
    let ledger = LedgerService::sqlite(&conn);
    let owner = cli.user;

    match cli.command {
        Command::Daily { date } => print_json(&summaries.daily_summary_for(owner, &date)?),
        Command::Monthly { year, month } => {
            print_json(&summaries.monthly_summary(owner, year, month)?)
        }
        Command::Dashboard => print_json(&summaries.dashboard(owner)?),
        Command::Trend { days } => print_json(&summaries.trend(owner, days)?),
        Command::Meals { filter } => {
            let query = RecordQuery {
                window: filter.resolve()?,
                ..RecordQuery::default()
            };
            print_json(&ledger.list_meals(owner, &query)?)
        }
        Command::Expenses { filter, category } => {
            let category = match category.as_deref() {
                Some(key) => Some(
                    ExpenseCategory::parse(key)
                        .ok_or_else(|| format!("unknown expense category `{key}`"))?,
                ),
                None => None,
            };
            let query = RecordQuery {
                window: filter.resolve()?,
                category,
                ..RecordQuery::default()
            };
            let rows: Vec<ExpenseView> = ledger
                .list_expenses(owner, &query)?
                .into_iter()
                .map(ExpenseView::from)
                .collect();
            print_json(&rows)
        }
        Command::Ping | Command::Version | Command::Categories | Command::MealTypes => Ok(()),
    }
}

fn build_config(cli: &Cli) -> Result<CoreConfig, Box<dyn Error>> {
    let mut config = CoreConfig::new(cli.db.clone());
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        config = config.with_logging(LoggingConfig::new(level, log_dir)?.with_stderr());
    }
    Ok(config)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
