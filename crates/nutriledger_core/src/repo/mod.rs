//! Record Store: owner-scoped persistence for meals and expenses.
//!
//! # Responsibility
//! - Define the read contract consumed by the summary builders.
//! - Provide CRUD repositories over the SQLite `meals` / `expenses` tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every query is constrained by `user_id`; another owner's rows are
//!   indistinguishable from missing rows.
//! - Write paths validate records before SQL mutations.
//! - Read paths reject undecodable persisted state instead of masking it.

mod codec;
mod error;
pub mod expense_repo;
pub mod meal_repo;
pub mod query;
pub mod record_store;

pub use error::{RepoError, RepoResult};
