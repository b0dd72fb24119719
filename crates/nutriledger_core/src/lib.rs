//! Core domain logic for NutriLedger.
//!
//! Records meals and expenses per owner and folds them into daily, monthly
//! and dashboard summaries.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{default_log_level, ConfigError, CoreConfig, LoggingConfig};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::expense::{
    expense_categories, CategoryEntry, ExpenseCategory, ExpenseRecord, ExpenseView,
};
pub use model::meal::{MealRecord, MealType};
pub use model::validation::RecordValidationError;
pub use model::window::{days_in_month, is_leap_year, RecordWindow, WindowError};
pub use model::{RecordId, UserId};
pub use repo::expense_repo::{ExpenseRepository, SqliteExpenseRepository};
pub use repo::meal_repo::{MealRepository, SqliteMealRepository};
pub use repo::query::{RecordOrder, RecordQuery};
pub use repo::record_store::{RecordStore, SqliteRecordStore};
pub use repo::{RepoError, RepoResult};
pub use service::ledger_service::LedgerService;
pub use service::summary_service::{
    DailySummary, DashboardSummary, DayEntry, ExpenseBreakdown, MealBreakdown, MealDaySummary,
    MonthTotals, MonthlyExpenseStats, MonthlyMealStats, MonthlySummary, SummaryError,
    SummaryResult, SummaryService, TodaySummary, TrendPoint, WindowSummary,
    DASHBOARD_TREND_DAYS, MAX_TREND_DAYS,
};
pub use service::CategoryTotal;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
