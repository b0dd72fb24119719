//! Record write-path and listing use-cases.
//!
//! # Invariants
//! - A caller can only touch records it owns; foreign ids behave as missing.
//! - Ownership is fixed at creation and never reassigned by updates.
//! - Listings default to most-recent-first.

use crate::model::expense::{expense_categories, CategoryEntry, ExpenseRecord};
use crate::model::meal::{MealRecord, MealType};
use crate::model::{RecordId, UserId};
use crate::repo::expense_repo::{ExpenseRepository, SqliteExpenseRepository};
use crate::repo::meal_repo::{MealRepository, SqliteMealRepository};
use crate::repo::query::RecordQuery;
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Use-case facade over meal and expense repositories.
pub struct LedgerService<M: MealRepository, E: ExpenseRepository> {
    meals: M,
    expenses: E,
}

impl<'conn> LedgerService<SqliteMealRepository<'conn>, SqliteExpenseRepository<'conn>> {
    /// Builds a service over SQLite repositories sharing one connection.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteMealRepository::new(conn),
            SqliteExpenseRepository::new(conn),
        )
    }
}

impl<M: MealRepository, E: ExpenseRepository> LedgerService<M, E> {
    pub fn new(meals: M, expenses: E) -> Self {
        Self { meals, expenses }
    }

    pub fn create_meal(&self, meal: &MealRecord) -> RepoResult<RecordId> {
        self.meals.create_meal(meal)
    }

    /// Replaces the owner's meal. Returns `NotFound` for foreign records.
    pub fn update_meal(&self, owner_id: UserId, meal: &MealRecord) -> RepoResult<()> {
        if meal.owner_id != owner_id {
            return Err(RepoError::NotFound(meal.id));
        }
        self.meals.update_meal(meal)
    }

    pub fn get_meal(&self, owner_id: UserId, id: RecordId) -> RepoResult<Option<MealRecord>> {
        self.meals.get_meal(owner_id, id)
    }

    pub fn delete_meal(&self, owner_id: UserId, id: RecordId) -> RepoResult<()> {
        self.meals.delete_meal(owner_id, id)
    }

    pub fn list_meals(&self, owner_id: UserId, query: &RecordQuery) -> RepoResult<Vec<MealRecord>> {
        self.meals.list_meals(owner_id, query)
    }

    pub fn create_expense(&self, expense: &ExpenseRecord) -> RepoResult<RecordId> {
        self.expenses.create_expense(expense)
    }

    /// Replaces the owner's expense. Returns `NotFound` for foreign records.
    pub fn update_expense(&self, owner_id: UserId, expense: &ExpenseRecord) -> RepoResult<()> {
        if expense.owner_id != owner_id {
            return Err(RepoError::NotFound(expense.id));
        }
        self.expenses.update_expense(expense)
    }

    pub fn get_expense(
        &self,
        owner_id: UserId,
        id: RecordId,
    ) -> RepoResult<Option<ExpenseRecord>> {
        self.expenses.get_expense(owner_id, id)
    }

    pub fn delete_expense(&self, owner_id: UserId, id: RecordId) -> RepoResult<()> {
        self.expenses.delete_expense(owner_id, id)
    }

    pub fn list_expenses(
        &self,
        owner_id: UserId,
        query: &RecordQuery,
    ) -> RepoResult<Vec<ExpenseRecord>> {
        self.expenses.list_expenses(owner_id, query)
    }

    /// The fixed `{key, label}` category table.
    pub fn categories(&self) -> Vec<CategoryEntry> {
        expense_categories()
    }

    pub fn meal_types(&self) -> [MealType; 4] {
        MealType::ALL
    }
}
