//! Meal record model.
//!
//! # Invariants
//! - `meal_type` is one of the four fixed meal slots.
//! - `calories`, when present, lies in `[0, 99999]`.
//! - A missing calorie value contributes zero to every sum.

use crate::model::validation::{optional_notes, require_text, within_range, RecordValidationError};
use crate::model::{timestamp_now, RecordId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_CALORIES: i64 = 99_999;

/// Fixed meal slot. Extending the set means editing this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All meal types in display order.
    pub const ALL: [MealType; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Stable storage/wire key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|meal_type| meal_type.key() == value)
    }
}

/// One eaten meal owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: RecordId,
    pub owner_id: UserId,
    pub name: String,
    /// Serialized as `type` to match the external schema.
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub notes: Option<String>,
    pub calories: Option<Decimal>,
    /// Calendar day the meal belongs to.
    pub eaten_at: NaiveDate,
    /// Ordering tie-break only; never used for day grouping.
    pub created_at: DateTime<Utc>,
    /// Stamped by the store on every successful update.
    pub updated_at: DateTime<Utc>,
}

impl MealRecord {
    /// Creates a new meal with a generated id and `created_at = now`.
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        meal_type: MealType,
        eaten_at: NaiveDate,
    ) -> Self {
        let created_at = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            meal_type,
            notes: None,
            calories: None,
            eaten_at,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_calories(mut self, calories: Decimal) -> Self {
        self.calories = Some(calories);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Backdates a fresh record; `updated_at` follows `created_at`.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Calories counted by aggregates; `None` counts as zero.
    pub fn calories_or_zero(&self) -> Decimal {
        self.calories.unwrap_or(Decimal::ZERO)
    }

    /// Checks write-path field rules.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("name", &self.name)?;
        optional_notes(self.notes.as_deref())?;
        if let Some(calories) = self.calories {
            within_range(
                "calories",
                calories,
                Decimal::ZERO,
                Decimal::from(MAX_CALORIES),
            )?;
        }
        Ok(())
    }
}
