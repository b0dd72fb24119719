//! Meal repository contract and SQLite implementation.

use crate::model::meal::{MealRecord, MealType};
use crate::model::{timestamp_now, RecordId, UserId};
use crate::repo::codec::{
    date_to_db, parse_date, parse_decimal, parse_id, parse_timestamp, timestamp_to_db,
};
use crate::repo::query::{ListSql, RecordQuery};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, params_from_iter, Connection, Row};

const MEAL_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    type,
    notes,
    calories,
    eaten_at,
    created_at,
    updated_at
FROM meals";

/// Repository interface for meal CRUD and owner-scoped listing.
pub trait MealRepository {
    fn create_meal(&self, meal: &MealRecord) -> RepoResult<RecordId>;
    /// Replaces all mutable fields of the owner's meal.
    fn update_meal(&self, meal: &MealRecord) -> RepoResult<()>;
    fn get_meal(&self, owner_id: UserId, id: RecordId) -> RepoResult<Option<MealRecord>>;
    /// Permanently removes the owner's meal.
    fn delete_meal(&self, owner_id: UserId, id: RecordId) -> RepoResult<()>;
    fn list_meals(&self, owner_id: UserId, query: &RecordQuery) -> RepoResult<Vec<MealRecord>>;
}

/// SQLite-backed meal repository.
pub struct SqliteMealRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMealRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MealRepository for SqliteMealRepository<'_> {
    fn create_meal(&self, meal: &MealRecord) -> RepoResult<RecordId> {
        meal.validate()?;

        self.conn.execute(
            "INSERT INTO meals (
                id,
                user_id,
                name,
                type,
                notes,
                calories,
                eaten_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                meal.id.to_string(),
                meal.owner_id,
                meal.name.as_str(),
                meal.meal_type.key(),
                meal.notes.as_deref(),
                meal.calories.map(|calories| calories.to_string()),
                date_to_db(meal.eaten_at),
                timestamp_to_db(meal.created_at),
                timestamp_to_db(meal.updated_at),
            ],
        )?;

        Ok(meal.id)
    }

    fn update_meal(&self, meal: &MealRecord) -> RepoResult<()> {
        meal.validate()?;

        let changed = self.conn.execute(
            "UPDATE meals
             SET
                name = ?1,
                type = ?2,
                notes = ?3,
                calories = ?4,
                eaten_at = ?5,
                updated_at = ?6
             WHERE id = ?7
               AND user_id = ?8;",
            params![
                meal.name.as_str(),
                meal.meal_type.key(),
                meal.notes.as_deref(),
                meal.calories.map(|calories| calories.to_string()),
                date_to_db(meal.eaten_at),
                timestamp_to_db(timestamp_now()),
                meal.id.to_string(),
                meal.owner_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(meal.id));
        }

        Ok(())
    }

    fn get_meal(&self, owner_id: UserId, id: RecordId) -> RepoResult<Option<MealRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEAL_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_meal_row(row)?));
        }

        Ok(None)
    }

    fn delete_meal(&self, owner_id: UserId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM meals WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_meals(&self, owner_id: UserId, query: &RecordQuery) -> RepoResult<Vec<MealRecord>> {
        let mut builder = ListSql::new(MEAL_SELECT_SQL, owner_id);
        builder
            .window("eaten_at", &query.window)
            .order("eaten_at", query.order)
            .paginate(query.limit, query.offset);
        let (sql, bind_values) = builder.finish();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut meals = Vec::new();

        while let Some(row) = rows.next()? {
            meals.push(parse_meal_row(row)?);
        }

        Ok(meals)
    }
}

fn parse_meal_row(row: &Row<'_>) -> RepoResult<MealRecord> {
    let id_text: String = row.get("id")?;
    let type_text: String = row.get("type")?;
    let meal_type = MealType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid meal type `{type_text}` in meals.type"))
    })?;

    let calories = match row.get::<_, Option<String>>("calories")? {
        Some(value) => Some(parse_decimal(&value, "meals.calories")?),
        None => None,
    };
    let eaten_at: String = row.get("eaten_at")?;

    Ok(MealRecord {
        id: parse_id(&id_text, "meals.id")?,
        owner_id: row.get("user_id")?,
        name: row.get("name")?,
        meal_type,
        notes: row.get("notes")?,
        calories,
        eaten_at: parse_date(&eaten_at, "meals.eaten_at")?,
        created_at: parse_timestamp(row.get("created_at")?, "meals.created_at")?,
        updated_at: parse_timestamp(row.get("updated_at")?, "meals.updated_at")?,
    })
}
