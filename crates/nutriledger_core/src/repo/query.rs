//! List query options and the SQL fragments they translate to.

use crate::model::expense::ExpenseCategory;
use crate::model::window::RecordWindow;
use crate::model::UserId;
use crate::repo::codec::date_to_db;
use rusqlite::types::Value;

/// Ordering of a record listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
    /// Record date descending, then `created_at` descending.
    #[default]
    MostRecentFirst,
    /// `created_at` ascending (oldest first).
    Chronological,
}

/// Query options for listing one owner's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub window: RecordWindow,
    pub order: RecordOrder,
    /// Only applied to expense listings.
    pub category: Option<ExpenseCategory>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            window: RecordWindow::All,
            order: RecordOrder::MostRecentFirst,
            category: None,
            limit: None,
            offset: 0,
        }
    }
}

impl RecordQuery {
    pub fn window(window: RecordWindow, order: RecordOrder) -> Self {
        Self {
            window,
            order,
            ..Self::default()
        }
    }
}

/// Incrementally built `SELECT` with positional bind values.
pub(crate) struct ListSql {
    sql: String,
    binds: Vec<Value>,
}

impl ListSql {
    pub(crate) fn new(select_sql: &str, owner_id: UserId) -> Self {
        Self {
            sql: format!("{select_sql} WHERE user_id = ?"),
            binds: vec![Value::Integer(owner_id)],
        }
    }

    pub(crate) fn window(&mut self, date_column: &str, window: &RecordWindow) -> &mut Self {
        match *window {
            RecordWindow::All => {}
            RecordWindow::Day { date } => {
                self.sql.push_str(&format!(" AND {date_column} = ?"));
                self.binds.push(Value::Text(date_to_db(date)));
            }
            RecordWindow::Month { year, month } => {
                self.sql
                    .push_str(&format!(" AND substr({date_column}, 1, 7) = ?"));
                self.binds
                    .push(Value::Text(format!("{year:04}-{month:02}")));
            }
        }
        self
    }

    pub(crate) fn eq_text(&mut self, column: &str, value: &str) -> &mut Self {
        self.sql.push_str(&format!(" AND {column} = ?"));
        self.binds.push(Value::Text(value.to_string()));
        self
    }

    pub(crate) fn order(&mut self, date_column: &str, order: RecordOrder) -> &mut Self {
        match order {
            RecordOrder::MostRecentFirst => self.sql.push_str(&format!(
                " ORDER BY {date_column} DESC, created_at DESC, rowid DESC"
            )),
            RecordOrder::Chronological => {
                self.sql.push_str(" ORDER BY created_at ASC, rowid ASC")
            }
        }
        self
    }

    pub(crate) fn paginate(&mut self, limit: Option<u32>, offset: u32) -> &mut Self {
        if let Some(limit) = limit {
            self.sql.push_str(" LIMIT ?");
            self.binds.push(Value::Integer(i64::from(limit)));
            if offset > 0 {
                self.sql.push_str(" OFFSET ?");
                self.binds.push(Value::Integer(i64::from(offset)));
            }
        } else if offset > 0 {
            self.sql.push_str(" LIMIT -1 OFFSET ?");
            self.binds.push(Value::Integer(i64::from(offset)));
        }
        self
    }

    pub(crate) fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.binds)
    }
}

#[cfg(test)]
mod tests {
    use super::{ListSql, RecordOrder};
    use crate::model::window::RecordWindow;
    use rusqlite::types::Value;

    #[test]
    fn month_window_binds_zero_padded_prefix() {
        let mut builder = ListSql::new("SELECT * FROM meals", 3);
        builder
            .window("eaten_at", &RecordWindow::Month { year: 2026, month: 2 })
            .order("eaten_at", RecordOrder::MostRecentFirst);
        let (sql, binds) = builder.finish();

        assert!(sql.contains("substr(eaten_at, 1, 7) = ?"));
        assert!(sql.ends_with("ORDER BY eaten_at DESC, created_at DESC, rowid DESC"));
        assert_eq!(
            binds,
            vec![Value::Integer(3), Value::Text("2026-02".to_string())]
        );
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let mut builder = ListSql::new("SELECT * FROM expenses", 1);
        builder.paginate(None, 5);
        let (sql, _) = builder.finish();
        assert!(sql.ends_with("LIMIT -1 OFFSET ?"));
    }
}
