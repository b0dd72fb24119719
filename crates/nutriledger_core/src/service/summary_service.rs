//! Aggregation and reporting over one owner's meals and expenses.
//!
//! # Responsibility
//! - Fold store records into daily, monthly and dashboard summaries.
//! - Produce a dense day grid for full months and a trailing-day trend.
//!
//! # Invariants
//! - Read-only: builders never write to the store.
//! - All-or-nothing: a store failure aborts the whole summary.
//! - An empty window yields zero-valued aggregates, never an error.
//! - Day grouping uses `eaten_at` / `spent_at`, never `created_at`.

use crate::clock::Clock;
use crate::model::expense::{ExpenseCategory, ExpenseRecord, ExpenseView};
use crate::model::meal::{MealRecord, MealType};
use crate::model::window::{days_in_month, month_days, parse_date, RecordWindow, WindowError};
use crate::model::UserId;
use crate::repo::query::RecordOrder;
use crate::repo::record_store::RecordStore;
use crate::repo::RepoError;
use crate::service::breakdown::{
    per_day, round_money, tally_by_day, CategoryTotal, ExpenseTally, MealTally,
};
use chrono::{Datelike, Days, NaiveDate};
use log::{error, info};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Number of days covered by the dashboard trend.
pub const DASHBOARD_TREND_DAYS: u32 = 7;

/// Longest trailing trend a caller may request.
pub const MAX_TREND_DAYS: u32 = 366;

/// Service error for summary use-cases.
#[derive(Debug)]
pub enum SummaryError {
    /// Rejected date window; no computation was performed.
    InvalidWindow(WindowError),
    /// Record store failure, propagated unchanged.
    Upstream(RepoError),
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(err) => write!(f, "invalid window: {err}"),
            Self::Upstream(err) => write!(f, "record store unavailable: {err}"),
        }
    }
}

impl Error for SummaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWindow(err) => Some(err),
            Self::Upstream(err) => Some(err),
        }
    }
}

impl From<WindowError> for SummaryError {
    fn from(value: WindowError) -> Self {
        Self::InvalidWindow(value)
    }
}

impl From<RepoError> for SummaryError {
    fn from(value: RepoError) -> Self {
        Self::Upstream(value)
    }
}

pub type SummaryResult<T> = Result<T, SummaryError>;

/// Meal side of a daily or window summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealBreakdown {
    pub total: usize,
    pub total_calories: Decimal,
    pub by_type: BTreeMap<MealType, usize>,
    /// Oldest first.
    pub items: Vec<MealRecord>,
}

/// Expense side of a daily or window summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseBreakdown {
    pub total: Decimal,
    pub count: usize,
    pub by_category: BTreeMap<ExpenseCategory, usize>,
    /// Oldest first, each with its resolved category label.
    pub items: Vec<ExpenseView>,
}

/// Combined summary of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub meals: MealBreakdown,
    pub expenses: ExpenseBreakdown,
}

/// Daily-style summary over an arbitrary window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub window: RecordWindow,
    pub meals: MealBreakdown,
    pub expenses: ExpenseBreakdown,
}

/// Meal-only summary of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealDaySummary {
    pub date: NaiveDate,
    pub total_meals: usize,
    pub total_calories: Decimal,
    pub by_type: BTreeMap<MealType, usize>,
    pub meals: Vec<MealRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyMealStats {
    pub total: usize,
    pub total_calories: Decimal,
    /// Meals per calendar day of the full month, one decimal place.
    pub avg_per_day: Decimal,
    pub by_type: BTreeMap<MealType, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyExpenseStats {
    pub total: Decimal,
    pub count: usize,
    /// Amount per calendar day of the full month, two decimal places.
    pub avg_per_day: Decimal,
    pub by_category: BTreeMap<ExpenseCategory, CategoryTotal>,
}

/// One cell of the monthly day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub total_calories: Decimal,
    pub expense_total: Decimal,
    pub expense_count: usize,
}

/// Month totals plus a dense grid with one entry per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub meals: MonthlyMealStats,
    pub expenses: MonthlyExpenseStats,
    pub daily_breakdown: Vec<DayEntry>,
}

/// Dashboard "today" block: daily aggregates without item lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub total_calories: Decimal,
    pub meals_by_type: BTreeMap<MealType, usize>,
    pub expense_total: Decimal,
    pub expense_count: usize,
    pub expenses_by_category: BTreeMap<ExpenseCategory, usize>,
}

/// Dashboard "this month" block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub year: i32,
    pub month: u32,
    pub total_meals: usize,
    pub total_calories: Decimal,
    pub total_expenses: Decimal,
    pub expense_count: usize,
}

/// One day of the trailing trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub expense_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub today: TodaySummary,
    pub this_month: MonthTotals,
    pub last_7_days: Vec<TrendPoint>,
}

/// Summary builders over a record store and a clock.
pub struct SummaryService<S: RecordStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: RecordStore, C: Clock> SummaryService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Summarizes one calendar day; items are ordered oldest first.
    pub fn daily_summary(&self, owner_id: UserId, date: NaiveDate) -> SummaryResult<DailySummary> {
        let window = RecordWindow::day(date);
        self.observe("daily", &window, || {
            let (meals, expenses) = self.fetch_both(owner_id, &window, RecordOrder::Chronological)?;
            Ok(DailySummary {
                date,
                meals: meal_breakdown(meals),
                expenses: expense_breakdown(expenses),
            })
        })
    }

    /// Same as [`Self::daily_summary`] for a `YYYY-MM-DD` string.
    pub fn daily_summary_for(&self, owner_id: UserId, date: &str) -> SummaryResult<DailySummary> {
        let date = parse_date(date.trim())?;
        self.daily_summary(owner_id, date)
    }

    /// Daily-style fold over any window, typically a whole month.
    pub fn window_summary(
        &self,
        owner_id: UserId,
        window: &RecordWindow,
    ) -> SummaryResult<WindowSummary> {
        self.observe("window", window, || {
            let (meals, expenses) = self.fetch_both(owner_id, window, RecordOrder::Chronological)?;
            Ok(WindowSummary {
                window: *window,
                meals: meal_breakdown(meals),
                expenses: expense_breakdown(expenses),
            })
        })
    }

    /// Meal-only view of one calendar day.
    pub fn meal_day_summary(
        &self,
        owner_id: UserId,
        date: NaiveDate,
    ) -> SummaryResult<MealDaySummary> {
        let window = RecordWindow::day(date);
        self.observe("meal_day", &window, || {
            let meals = self
                .store
                .meals_for(owner_id, &window, RecordOrder::Chronological)?;
            let tally = MealTally::of(&meals);
            Ok(MealDaySummary {
                date,
                total_meals: tally.count,
                total_calories: tally.rounded_calories(),
                by_type: tally.by_type,
                meals,
            })
        })
    }

    /// Month totals and a gap-free day grid.
    ///
    /// # Errors
    /// - `InvalidWindow` when `year` or `month` is out of range.
    /// - `Upstream` when either fetch fails.
    pub fn monthly_summary(
        &self,
        owner_id: UserId,
        year: i32,
        month: u32,
    ) -> SummaryResult<MonthlySummary> {
        let window = RecordWindow::month(year, month)?;
        self.observe("monthly", &window, || {
            let (meals, expenses) = self.fetch_both(owner_id, &window, RecordOrder::Chronological)?;
            Ok(build_monthly(year, month, &meals, &expenses))
        })
    }

    /// Today, this month and the last seven days, relative to the clock.
    pub fn dashboard(&self, owner_id: UserId) -> SummaryResult<DashboardSummary> {
        let today = self.clock.today();
        let today_window = RecordWindow::day(today);
        self.observe("dashboard", &today_window, || {
            let (meals, expenses) =
                self.fetch_both(owner_id, &today_window, RecordOrder::Chronological)?;
            let meal_tally = MealTally::of(&meals);
            let expense_tally = ExpenseTally::of(&expenses);
            let today_block = TodaySummary {
                date: today,
                meal_count: meal_tally.count,
                total_calories: meal_tally.rounded_calories(),
                expense_total: expense_tally.rounded_amount(),
                expense_count: expense_tally.count,
                expenses_by_category: expense_tally.category_counts(),
                meals_by_type: meal_tally.by_type,
            };

            let (year, month) = (today.year(), today.month());
            let month_window = RecordWindow::Month { year, month };
            let (month_meals, month_expenses) =
                self.fetch_both(owner_id, &month_window, RecordOrder::Chronological)?;
            let month_meal_tally = MealTally::of(&month_meals);
            let month_expense_tally = ExpenseTally::of(&month_expenses);
            let this_month = MonthTotals {
                year,
                month,
                total_meals: month_meal_tally.count,
                total_calories: month_meal_tally.rounded_calories(),
                total_expenses: month_expense_tally.rounded_amount(),
                expense_count: month_expense_tally.count,
            };

            Ok(DashboardSummary {
                today: today_block,
                this_month,
                last_7_days: self.trend_points(owner_id, today, DASHBOARD_TREND_DAYS)?,
            })
        })
    }

    /// Trailing `days`-day trend ending today, ascending by date.
    ///
    /// Returns exactly `days` points; `days` above [`MAX_TREND_DAYS`] is
    /// rejected with `InvalidWindow` before any store read.
    pub fn trend(&self, owner_id: UserId, days: u32) -> SummaryResult<Vec<TrendPoint>> {
        let today = self.clock.today();
        self.observe("trend", &RecordWindow::day(today), || {
            self.trend_points(owner_id, today, days)
        })
    }

    fn trend_points(
        &self,
        owner_id: UserId,
        today: NaiveDate,
        days: u32,
    ) -> SummaryResult<Vec<TrendPoint>> {
        let too_long = WindowError::TrendTooLong {
            days,
            max: MAX_TREND_DAYS,
        };
        if days > MAX_TREND_DAYS {
            return Err(too_long.into());
        }
        if days == 0 {
            return Ok(Vec::new());
        }
        let start = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or(too_long)?;

        let mut points = Vec::with_capacity(days as usize);
        for date in start.iter_days().take(days as usize) {
            let (meals, expenses) = self.fetch_both(
                owner_id,
                &RecordWindow::day(date),
                RecordOrder::Chronological,
            )?;
            points.push(TrendPoint {
                date,
                meal_count: meals.len(),
                expense_total: ExpenseTally::of(&expenses).rounded_amount(),
            });
        }
        Ok(points)
    }

    fn fetch_both(
        &self,
        owner_id: UserId,
        window: &RecordWindow,
        order: RecordOrder,
    ) -> SummaryResult<(Vec<MealRecord>, Vec<ExpenseRecord>)> {
        let meals = self.store.meals_for(owner_id, window, order)?;
        let expenses = self.store.expenses_for(owner_id, window, order)?;
        Ok((meals, expenses))
    }

    fn observe<T, F>(&self, builder: &'static str, window: &RecordWindow, build: F) -> SummaryResult<T>
    where
        F: FnOnce() -> SummaryResult<T>,
    {
        let started_at = Instant::now();
        let result = build();
        match &result {
            Ok(_) => info!(
                "event=summary_build module=summary status=ok builder={builder} window={} duration_ms={}",
                window_label(window),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=summary_build module=summary status=error builder={builder} window={} duration_ms={} error={err}",
                window_label(window),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

fn meal_breakdown(meals: Vec<MealRecord>) -> MealBreakdown {
    let tally = MealTally::of(&meals);
    MealBreakdown {
        total: tally.count,
        total_calories: tally.rounded_calories(),
        by_type: tally.by_type,
        items: meals,
    }
}

fn expense_breakdown(expenses: Vec<ExpenseRecord>) -> ExpenseBreakdown {
    let tally = ExpenseTally::of(&expenses);
    ExpenseBreakdown {
        total: tally.rounded_amount(),
        count: tally.count,
        by_category: tally.category_counts(),
        items: expenses.into_iter().map(ExpenseView::from).collect(),
    }
}

fn build_monthly(
    year: i32,
    month: u32,
    meals: &[MealRecord],
    expenses: &[ExpenseRecord],
) -> MonthlySummary {
    let days = days_in_month(year, month);
    let meal_tally = MealTally::of(meals);
    let expense_tally = ExpenseTally::of(expenses);
    let by_day = tally_by_day(meals, expenses);

    let daily_breakdown = month_days(year, month)
        .into_iter()
        .map(|date| {
            let day = by_day.get(&date).cloned().unwrap_or_default();
            DayEntry {
                date,
                meal_count: day.meal_count,
                total_calories: round_money(day.calories),
                expense_total: round_money(day.expense_amount),
                expense_count: day.expense_count,
            }
        })
        .collect();

    MonthlySummary {
        year,
        month,
        meals: MonthlyMealStats {
            total: meal_tally.count,
            total_calories: meal_tally.rounded_calories(),
            avg_per_day: per_day(Decimal::from(meal_tally.count), meal_tally.count, days, 1),
            by_type: meal_tally.by_type.clone(),
        },
        expenses: MonthlyExpenseStats {
            total: expense_tally.rounded_amount(),
            count: expense_tally.count,
            avg_per_day: per_day(expense_tally.amount, expense_tally.count, days, 2),
            by_category: expense_tally.category_totals(),
        },
        daily_breakdown,
    }
}

fn window_label(window: &RecordWindow) -> String {
    match window {
        RecordWindow::All => "all".to_string(),
        RecordWindow::Day { date } => date.to_string(),
        RecordWindow::Month { year, month } => format!("{year:04}-{month:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_monthly, window_label};
    use crate::model::expense::{ExpenseCategory, ExpenseRecord};
    use crate::model::meal::{MealRecord, MealType};
    use crate::model::window::RecordWindow;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn monthly_grid_matches_worked_example() {
        let expenses = vec![
            ExpenseRecord::new(1, "lunch", Decimal::new(1250, 2), ExpenseCategory::Food, date(2, 3)),
            ExpenseRecord::new(
                1,
                "taxi",
                Decimal::new(4000, 2),
                ExpenseCategory::Transport,
                date(2, 3),
            ),
        ];
        let summary = build_monthly(2026, 2, &[], &expenses);

        assert_eq!(summary.daily_breakdown.len(), 28);
        assert_eq!(summary.expenses.total, Decimal::new(5250, 2));
        assert_eq!(summary.expenses.count, 2);
        assert_eq!(summary.expenses.avg_per_day, Decimal::new(188, 2));
        assert_eq!(summary.expenses.by_category[&ExpenseCategory::Food].count, 1);
        assert_eq!(
            summary.expenses.by_category[&ExpenseCategory::Transport].total,
            Decimal::new(4000, 2)
        );
        assert_eq!(summary.meals.avg_per_day, Decimal::ZERO);

        let third = &summary.daily_breakdown[2];
        assert_eq!(third.date, date(2, 3));
        assert_eq!(third.expense_total, Decimal::new(5250, 2));
        assert_eq!(third.expense_count, 2);
        let idle_days = summary
            .daily_breakdown
            .iter()
            .filter(|entry| entry.expense_count == 0 && entry.expense_total.is_zero())
            .count();
        assert_eq!(idle_days, 27);
    }

    #[test]
    fn meal_average_divides_by_full_month_length() {
        let meals: Vec<MealRecord> = (1..=4)
            .map(|day| MealRecord::new(1, "rice", MealType::Dinner, date(4, day)))
            .collect();
        let summary = build_monthly(2026, 4, &meals, &[]);

        // 4 meals over 30 days.
        assert_eq!(summary.meals.avg_per_day, Decimal::new(1, 1));
        assert_eq!(summary.meals.by_type[&MealType::Dinner], 4);
    }

    #[test]
    fn window_label_is_compact() {
        assert_eq!(window_label(&RecordWindow::All), "all");
        assert_eq!(
            window_label(&RecordWindow::Month { year: 2026, month: 2 }),
            "2026-02"
        );
    }
}
