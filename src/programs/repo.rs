use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::{Date, OffsetDateTime};

use crate::meals::repo::MealRow;
use crate::nutrition::constants::MealTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramRow {
    pub id: i64,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

/// A scheduled cell joined with its meal.
#[derive(Debug, FromRow)]
pub struct EntryRow {
    pub date: Date,
    pub meal_time: MealTime,
    #[sqlx(flatten)]
    pub meal: MealRow,
}

const COLUMNS: &str = "id, name, start_date, end_date, is_active, created_at";

pub async fn insert(
    db: &SqlitePool,
    name: &str,
    start_date: Date,
    end_date: Date,
) -> sqlx::Result<ProgramRow> {
    sqlx::query_as::<_, ProgramRow>(&format!(
        r#"
        INSERT INTO meal_programs (name, start_date, end_date, is_active, created_at)
        VALUES ($1, $2, $3, 1, $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(name)
    .bind(start_date)
    .bind(end_date)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
}

pub async fn list_active(db: &SqlitePool) -> sqlx::Result<Vec<ProgramRow>> {
    sqlx::query_as::<_, ProgramRow>(&format!(
        "SELECT {COLUMNS} FROM meal_programs WHERE is_active = 1 ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<ProgramRow>> {
    sqlx::query_as::<_, ProgramRow>(&format!("SELECT {COLUMNS} FROM meal_programs WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Program entries cascade with the program.
pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM meal_programs WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Assigns a meal to a (date, slot) cell, replacing any previous assignment
/// in a single statement.
pub async fn upsert_entry(
    db: &SqlitePool,
    program_id: i64,
    date: Date,
    meal_time: MealTime,
    meal_id: i64,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO program_meals (program_id, meal_id, date, meal_time)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (program_id, date, meal_time) DO UPDATE SET meal_id = excluded.meal_id
        "#,
    )
    .bind(program_id)
    .bind(meal_id)
    .bind(date)
    .bind(meal_time)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_entry(
    db: &SqlitePool,
    program_id: i64,
    date: Date,
    meal_time: MealTime,
) -> sqlx::Result<u64> {
    let result =
        sqlx::query("DELETE FROM program_meals WHERE program_id = $1 AND date = $2 AND meal_time = $3")
            .bind(program_id)
            .bind(date)
            .bind(meal_time)
            .execute(db)
            .await?;
    Ok(result.rows_affected())
}

/// Entries in the date window, joined with their meals. Slot ordering within
/// a day happens in Rust via `MealTime`'s declaration order.
pub async fn entries_between(
    db: &SqlitePool,
    program_id: i64,
    start: Date,
    end: Date,
) -> sqlx::Result<Vec<EntryRow>> {
    sqlx::query_as::<_, EntryRow>(
        r#"
        SELECT pm.date, pm.meal_time,
               m.id, m.name, m.category, m.kind,
               m.calories, m.proteins, m.carbs, m.fats, m.created_at
        FROM program_meals pm
        JOIN meals m ON pm.meal_id = m.id
        WHERE pm.program_id = $1 AND pm.date BETWEEN $2 AND $3
        ORDER BY pm.date
        "#,
    )
    .bind(program_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}
