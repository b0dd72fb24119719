//! Single-pass accumulators that fold records into per-key tallies.
//!
//! # Invariants
//! - Sums accumulate at full precision; rounding happens only when a tally
//!   is turned into output.
//! - Keys come from finite types (`MealType`, `ExpenseCategory`,
//!   `NaiveDate`), so output maps are closed and deterministically ordered.

use crate::model::expense::{ExpenseCategory, ExpenseRecord};
use crate::model::meal::{MealRecord, MealType};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rounds half away from zero to `dp` decimal places.
pub(crate) fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round_money(value: Decimal) -> Decimal {
    round_dp(value, 2)
}

/// `total / days`, rounded; zero when nothing was recorded.
pub(crate) fn per_day(total: Decimal, records: usize, days: u32, dp: u32) -> Decimal {
    if records == 0 || days == 0 {
        return Decimal::ZERO;
    }
    round_dp(total / Decimal::from(days), dp)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MealTally {
    pub(crate) count: usize,
    pub(crate) calories: Decimal,
    pub(crate) by_type: BTreeMap<MealType, usize>,
}

impl MealTally {
    pub(crate) fn add(&mut self, meal: &MealRecord) {
        self.count += 1;
        self.calories += meal.calories_or_zero();
        *self.by_type.entry(meal.meal_type).or_insert(0) += 1;
    }

    pub(crate) fn of(meals: &[MealRecord]) -> Self {
        let mut tally = Self::default();
        meals.iter().for_each(|meal| tally.add(meal));
        tally
    }

    pub(crate) fn rounded_calories(&self) -> Decimal {
        round_money(self.calories)
    }
}

/// Per-category `{count, total}` output pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub count: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseTally {
    pub(crate) count: usize,
    pub(crate) amount: Decimal,
    pub(crate) by_category: BTreeMap<ExpenseCategory, CategoryTotal>,
}

impl ExpenseTally {
    pub(crate) fn add(&mut self, expense: &ExpenseRecord) {
        self.count += 1;
        self.amount += expense.amount;
        let slot = self.by_category.entry(expense.category()).or_default();
        slot.count += 1;
        slot.total += expense.amount;
    }

    pub(crate) fn of(expenses: &[ExpenseRecord]) -> Self {
        let mut tally = Self::default();
        expenses.iter().for_each(|expense| tally.add(expense));
        tally
    }

    pub(crate) fn rounded_amount(&self) -> Decimal {
        round_money(self.amount)
    }

    pub(crate) fn category_counts(&self) -> BTreeMap<ExpenseCategory, usize> {
        self.by_category
            .iter()
            .map(|(category, slot)| (*category, slot.count))
            .collect()
    }

    pub(crate) fn category_totals(&self) -> BTreeMap<ExpenseCategory, CategoryTotal> {
        self.by_category
            .iter()
            .map(|(category, slot)| {
                (
                    *category,
                    CategoryTotal {
                        count: slot.count,
                        total: round_money(slot.total),
                    },
                )
            })
            .collect()
    }
}

/// Activity of one calendar day, accumulated from both record kinds.
#[derive(Debug, Clone, Default)]
pub(crate) struct DayTally {
    pub(crate) meal_count: usize,
    pub(crate) calories: Decimal,
    pub(crate) expense_count: usize,
    pub(crate) expense_amount: Decimal,
}

/// Groups both record kinds by exact calendar date in one pass each.
pub(crate) fn tally_by_day(
    meals: &[MealRecord],
    expenses: &[ExpenseRecord],
) -> BTreeMap<NaiveDate, DayTally> {
    let mut days: BTreeMap<NaiveDate, DayTally> = BTreeMap::new();
    for meal in meals {
        let day = days.entry(meal.eaten_at).or_default();
        day.meal_count += 1;
        day.calories += meal.calories_or_zero();
    }
    for expense in expenses {
        let day = days.entry(expense.spent_at).or_default();
        day.expense_count += 1;
        day.expense_amount += expense.amount;
    }
    days
}
