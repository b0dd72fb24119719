//! Expense repository contract and SQLite implementation.
//!
//! Stored category keys are read back verbatim, including keys that are no
//! longer part of the category table.

use crate::model::expense::ExpenseRecord;
use crate::model::{timestamp_now, RecordId, UserId};
use crate::repo::codec::{
    date_to_db, parse_date, parse_decimal, parse_id, parse_timestamp, timestamp_to_db,
};
use crate::repo::query::{ListSql, RecordQuery};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, params_from_iter, Connection, Row};

const EXPENSE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    amount,
    category,
    notes,
    spent_at,
    created_at,
    updated_at
FROM expenses";

/// Repository interface for expense CRUD and owner-scoped listing.
pub trait ExpenseRepository {
    fn create_expense(&self, expense: &ExpenseRecord) -> RepoResult<RecordId>;
    fn update_expense(&self, expense: &ExpenseRecord) -> RepoResult<()>;
    fn get_expense(&self, owner_id: UserId, id: RecordId) -> RepoResult<Option<ExpenseRecord>>;
    fn delete_expense(&self, owner_id: UserId, id: RecordId) -> RepoResult<()>;
    /// Lists expenses; honours `query.category` in addition to the window.
    fn list_expenses(
        &self,
        owner_id: UserId,
        query: &RecordQuery,
    ) -> RepoResult<Vec<ExpenseRecord>>;
}

/// SQLite-backed expense repository.
pub struct SqliteExpenseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExpenseRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ExpenseRepository for SqliteExpenseRepository<'_> {
    fn create_expense(&self, expense: &ExpenseRecord) -> RepoResult<RecordId> {
        expense.validate()?;

        self.conn.execute(
            "INSERT INTO expenses (
                id,
                user_id,
                title,
                amount,
                category,
                notes,
                spent_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                expense.id.to_string(),
                expense.owner_id,
                expense.title.as_str(),
                expense.amount.to_string(),
                expense.category.as_str(),
                expense.notes.as_deref(),
                date_to_db(expense.spent_at),
                timestamp_to_db(expense.created_at),
                timestamp_to_db(expense.updated_at),
            ],
        )?;

        Ok(expense.id)
    }

    fn update_expense(&self, expense: &ExpenseRecord) -> RepoResult<()> {
        expense.validate()?;

        let changed = self.conn.execute(
            "UPDATE expenses
             SET
                title = ?1,
                amount = ?2,
                category = ?3,
                notes = ?4,
                spent_at = ?5,
                updated_at = ?6
             WHERE id = ?7
               AND user_id = ?8;",
            params![
                expense.title.as_str(),
                expense.amount.to_string(),
                expense.category.as_str(),
                expense.notes.as_deref(),
                date_to_db(expense.spent_at),
                timestamp_to_db(timestamp_now()),
                expense.id.to_string(),
                expense.owner_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(expense.id));
        }

        Ok(())
    }

    fn get_expense(&self, owner_id: UserId, id: RecordId) -> RepoResult<Option<ExpenseRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EXPENSE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_expense_row(row)?));
        }

        Ok(None)
    }

    fn delete_expense(&self, owner_id: UserId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_expenses(
        &self,
        owner_id: UserId,
        query: &RecordQuery,
    ) -> RepoResult<Vec<ExpenseRecord>> {
        let mut builder = ListSql::new(EXPENSE_SELECT_SQL, owner_id);
        builder.window("spent_at", &query.window);
        if let Some(category) = query.category {
            builder.eq_text("category", category.key());
        }
        builder
            .order("spent_at", query.order)
            .paginate(query.limit, query.offset);
        let (sql, bind_values) = builder.finish();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut expenses = Vec::new();

        while let Some(row) = rows.next()? {
            expenses.push(parse_expense_row(row)?);
        }

        Ok(expenses)
    }
}

fn parse_expense_row(row: &Row<'_>) -> RepoResult<ExpenseRecord> {
    let id_text: String = row.get("id")?;
    let amount_text: String = row.get("amount")?;
    let spent_at: String = row.get("spent_at")?;

    Ok(ExpenseRecord {
        id: parse_id(&id_text, "expenses.id")?,
        owner_id: row.get("user_id")?,
        title: row.get("title")?,
        amount: parse_decimal(&amount_text, "expenses.amount")?,
        category: row.get("category")?,
        notes: row.get("notes")?,
        spent_at: parse_date(&spent_at, "expenses.spent_at")?,
        created_at: parse_timestamp(row.get("created_at")?, "expenses.created_at")?,
        updated_at: parse_timestamp(row.get("updated_at")?, "expenses.updated_at")?,
    })
}
