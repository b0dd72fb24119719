//! Read contract consumed by the summary builders.

use crate::model::expense::ExpenseRecord;
use crate::model::meal::MealRecord;
use crate::model::window::RecordWindow;
use crate::model::UserId;
use crate::repo::expense_repo::{ExpenseRepository, SqliteExpenseRepository};
use crate::repo::meal_repo::{MealRepository, SqliteMealRepository};
use crate::repo::query::{RecordOrder, RecordQuery};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Owner-scoped, window-filtered, ordered record source.
///
/// Implementations must only return records owned by `owner_id`.
pub trait RecordStore {
    fn meals_for(
        &self,
        owner_id: UserId,
        window: &RecordWindow,
        order: RecordOrder,
    ) -> RepoResult<Vec<MealRecord>>;

    fn expenses_for(
        &self,
        owner_id: UserId,
        window: &RecordWindow,
        order: RecordOrder,
    ) -> RepoResult<Vec<ExpenseRecord>>;
}

/// Record store over one SQLite connection.
pub struct SqliteRecordStore<'conn> {
    meals: SqliteMealRepository<'conn>,
    expenses: SqliteExpenseRepository<'conn>,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            meals: SqliteMealRepository::new(conn),
            expenses: SqliteExpenseRepository::new(conn),
        }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn meals_for(
        &self,
        owner_id: UserId,
        window: &RecordWindow,
        order: RecordOrder,
    ) -> RepoResult<Vec<MealRecord>> {
        self.meals
            .list_meals(owner_id, &RecordQuery::window(*window, order))
    }

    fn expenses_for(
        &self,
        owner_id: UserId,
        window: &RecordWindow,
        order: RecordOrder,
    ) -> RepoResult<Vec<ExpenseRecord>> {
        self.expenses
            .list_expenses(owner_id, &RecordQuery::window(*window, order))
    }
}
