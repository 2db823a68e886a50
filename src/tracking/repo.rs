use sqlx::{FromRow, SqlitePool};
use time::{Date, OffsetDateTime};

use crate::meals::repo::MealRow;
use crate::nutrition::constants::MealTime;

/// Tracking row joined with its meal. The entry id is aliased so the
/// flattened meal keeps the plain `id` column.
#[derive(Debug, FromRow)]
pub struct TrackedRow {
    #[sqlx(rename = "tracking_id")]
    pub id: i64,
    pub date: Date,
    pub meal_time: MealTime,
    pub actual_time: OffsetDateTime,
    pub notes: Option<String>,
    #[sqlx(flatten)]
    pub meal: MealRow,
}

const SELECT_JOINED: &str = r#"
    SELECT mt.id AS tracking_id, mt.date, mt.meal_time, mt.actual_time, mt.notes,
           m.id, m.name, m.category, m.kind,
           m.calories, m.proteins, m.carbs, m.fats, m.created_at
    FROM meal_tracking mt
    JOIN meals m ON mt.meal_id = m.id
"#;

pub async fn insert(
    db: &SqlitePool,
    date: Date,
    meal_id: i64,
    meal_time: MealTime,
    actual_time: OffsetDateTime,
    notes: Option<&str>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO meal_tracking (date, meal_id, meal_time, actual_time, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(date)
    .bind(meal_id)
    .bind(meal_time)
    .bind(actual_time)
    .bind(notes)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
}

pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<TrackedRow>> {
    sqlx::query_as::<_, TrackedRow>(&format!("{SELECT_JOINED} WHERE mt.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn between(db: &SqlitePool, start: Date, end: Date) -> sqlx::Result<Vec<TrackedRow>> {
    sqlx::query_as::<_, TrackedRow>(&format!(
        "{SELECT_JOINED} WHERE mt.date BETWEEN $1 AND $2 ORDER BY mt.date, mt.actual_time"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM meal_tracking WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
