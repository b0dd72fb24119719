//! Ledger domain model: meal and expense records plus the date windows used
//! to select them.
//!
//! # Invariants
//! - Every record belongs to exactly one owner; ownership never changes.
//! - `eaten_at` / `spent_at` are calendar dates and are the only fields used
//!   for day grouping. `created_at` only breaks ordering ties.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod expense;
pub mod meal;
pub mod validation;
pub mod window;

/// Owner identifier supplied by the identity provider.
pub type UserId = i64;

/// Stable record identifier, assigned when a record is first constructed.
pub type RecordId = Uuid;

/// Current time truncated to millisecond precision, matching storage.
pub(crate) fn timestamp_now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
