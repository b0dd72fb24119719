//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

mod breakdown;
pub mod ledger_service;
pub mod summary_service;

pub use breakdown::CategoryTotal;
