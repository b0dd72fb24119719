//! Field-level rules shared by meal and expense write paths.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const MAX_TEXT_CHARS: usize = 255;
pub(crate) const MAX_NOTES_CHARS: usize = 1000;

/// Rejection reasons for a record that cannot be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Required text field is empty after trimming.
    EmptyField(&'static str),
    /// Text field exceeds its character limit.
    TooLong { field: &'static str, max_chars: usize },
    /// Numeric field outside its accepted range.
    OutOfRange {
        field: &'static str,
        min: Decimal,
        max: Decimal,
    },
    /// Amount carries more than two fractional digits.
    TooPrecise(&'static str),
    /// Category key outside the fixed table.
    UnknownCategory(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{field} must be between {min} and {max}")
            }
            Self::TooPrecise(field) => write!(f, "{field} must have at most 2 decimal places"),
            Self::UnknownCategory(key) => write!(f, "unknown expense category `{key}`"),
        }
    }
}

impl Error for RecordValidationError {}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::EmptyField(field));
    }
    limit_chars(field, value, MAX_TEXT_CHARS)
}

pub(crate) fn optional_notes(value: Option<&str>) -> Result<(), RecordValidationError> {
    match value {
        Some(notes) => limit_chars("notes", notes, MAX_NOTES_CHARS),
        None => Ok(()),
    }
}

pub(crate) fn within_range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), RecordValidationError> {
    if value < min || value > max {
        return Err(RecordValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

fn limit_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), RecordValidationError> {
    if value.chars().count() > max_chars {
        return Err(RecordValidationError::TooLong { field, max_chars });
    }
    Ok(())
}
