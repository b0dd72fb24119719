//! Expense record model and the fixed category table.
//!
//! # Invariants
//! - `amount` lies in `[0.01, 9999999.99]` with at most two fractional digits.
//! - New writes use one of the eight known category keys.
//! - Stored keys outside the table are preserved verbatim on read and are
//!   treated as `other` for grouping and display.

use crate::model::validation::{
    optional_notes, require_text, within_range, RecordValidationError,
};
use crate::model::{timestamp_now, RecordId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed expense category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Groceries,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Shopping,
    Other,
}

impl ExpenseCategory {
    /// All categories in table order.
    pub const ALL: [ExpenseCategory; 8] = [
        Self::Food,
        Self::Groceries,
        Self::Transport,
        Self::Utilities,
        Self::Entertainment,
        Self::Health,
        Self::Shopping,
        Self::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Groceries => "groceries",
            Self::Transport => "transport",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Groceries => "Groceries",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health & Medical",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// Strict lookup; `None` for keys outside the table.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }

    /// Lenient lookup used for grouping and display of stored rows.
    pub fn from_key_or_other(key: &str) -> Self {
        Self::parse(key).unwrap_or(Self::Other)
    }
}

/// One `{key, label}` row of the caller-facing category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub key: &'static str,
    pub label: &'static str,
}

/// Returns the complete category table in declaration order.
pub fn expense_categories() -> Vec<CategoryEntry> {
    ExpenseCategory::ALL
        .into_iter()
        .map(|category| CategoryEntry {
            key: category.key(),
            label: category.label(),
        })
        .collect()
}

/// One spending event owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: RecordId,
    pub owner_id: UserId,
    pub title: String,
    pub amount: Decimal,
    /// Raw stored category key. See [`ExpenseRecord::category`].
    pub category: String,
    pub notes: Option<String>,
    /// Calendar day the money was spent.
    pub spent_at: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Stamped by the store on every successful update.
    pub updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Creates a new expense with a generated id and `created_at = now`.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        amount: Decimal,
        category: ExpenseCategory,
        spent_at: NaiveDate,
    ) -> Self {
        let created_at = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            amount,
            category: category.key().to_string(),
            notes: None,
            spent_at,
            created_at,
            updated_at: created_at,
        }
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

    /// Resolved category; unknown keys fall back to `Other`.
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::from_key_or_other(&self.category)
    }

    pub fn category_label(&self) -> &'static str {
        self.category().label()
    }

    /// Checks write-path field rules.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("title", &self.title)?;
        optional_notes(self.notes.as_deref())?;
        within_range(
            "amount",
            self.amount,
            Decimal::new(1, 2),
            Decimal::new(999_999_999, 2),
        )?;
        if self.amount.normalize().scale() > 2 {
            return Err(RecordValidationError::TooPrecise("amount"));
        }
        if ExpenseCategory::parse(&self.category).is_none() {
            return Err(RecordValidationError::UnknownCategory(self.category.clone()));
        }
        Ok(())
    }
}

/// Caller-facing expense row: the stored record plus its resolved label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseView {
    #[serde(flatten)]
    pub record: ExpenseRecord,
    pub category_label: &'static str,
}

impl From<ExpenseRecord> for ExpenseView {
    fn from(record: ExpenseRecord) -> Self {
        let category_label = record.category_label();
        Self {
            record,
            category_label,
        }
    }
}
