use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use time::OffsetDateTime;

use crate::foods::repo::FoodSource;
use crate::nutrition::aggregate::MacroTotals;
use crate::nutrition::constants::MealCategory;

use super::dto::FoodQuantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    #[sqlx(rename = "regular")]
    Regular,
    #[sqlx(rename = "custom")]
    Custom,
}

/// Raw meals row. Macro columns are only populated for custom meals; regular
/// meals derive their totals from `meal_foods`.
#[derive(Debug, Clone, FromRow)]
pub struct MealRow {
    pub id: i64,
    pub name: String,
    pub category: MealCategory,
    pub kind: MealKind,
    pub calories: Option<f64>,
    pub proteins: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub created_at: OffsetDateTime,
}

impl MealRow {
    /// Stored literal totals; only meaningful for custom meals.
    pub fn stored_macros(&self) -> MacroTotals {
        MacroTotals::new(
            self.calories.unwrap_or(0.0),
            self.proteins.unwrap_or(0.0),
            self.carbs.unwrap_or(0.0),
            self.fats.unwrap_or(0.0),
        )
    }
}

#[derive(Debug, FromRow)]
pub struct ConstituentRow {
    #[sqlx(flatten)]
    pub food: FoodSource,
    pub quantity: f64,
}

const COLUMNS: &str = "id, name, category, kind, calories, proteins, carbs, fats, created_at";

pub async fn list(
    db: &SqlitePool,
    kind: Option<MealKind>,
    category: Option<MealCategory>,
) -> sqlx::Result<Vec<MealRow>> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM meals"));
    let mut prefix = " WHERE ";
    if let Some(kind) = kind {
        qb.push(prefix).push("kind = ").push_bind(kind);
        prefix = " AND ";
    }
    if let Some(category) = category {
        qb.push(prefix).push("category = ").push_bind(category);
    }
    qb.push(" ORDER BY name");
    qb.build_query_as::<MealRow>().fetch_all(db).await
}

pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<MealRow>> {
    sqlx::query_as::<_, MealRow>(&format!("SELECT {COLUMNS} FROM meals WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn constituents(db: &SqlitePool, meal_id: i64) -> sqlx::Result<Vec<ConstituentRow>> {
    sqlx::query_as::<_, ConstituentRow>(
        r#"
        SELECT f.id, f.name, f.category, f.calories, f.proteins, f.carbs, f.fats,
               f.portion_size, f.base_unit, f.conversion_factor, mf.quantity
        FROM food_sources f
        JOIN meal_foods mf ON f.id = mf.food_id
        WHERE mf.meal_id = $1
        ORDER BY mf.id
        "#,
    )
    .bind(meal_id)
    .fetch_all(db)
    .await
}

/// Inserts the meal and its constituents in one transaction.
pub async fn insert(
    db: &SqlitePool,
    name: &str,
    category: MealCategory,
    kind: MealKind,
    macros: Option<&MacroTotals>,
    foods: &[FoodQuantity],
) -> sqlx::Result<MealRow> {
    let mut tx = db.begin().await?;
    let row = sqlx::query_as::<_, MealRow>(&format!(
        r#"
        INSERT INTO meals (name, category, kind, calories, proteins, carbs, fats, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(name)
    .bind(category)
    .bind(kind)
    .bind(macros.map(|m| m.calories))
    .bind(macros.map(|m| m.proteins))
    .bind(macros.map(|m| m.carbs))
    .bind(macros.map(|m| m.fats))
    .bind(OffsetDateTime::now_utc())
    .fetch_one(&mut *tx)
    .await?;

    for food in foods {
        sqlx::query("INSERT INTO meal_foods (meal_id, food_id, quantity) VALUES ($1, $2, $3)")
            .bind(row.id)
            .bind(food.food_id)
            .bind(food.quantity)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(row)
}

/// Updates name/category (and macros for custom meals) and, when a
/// constituent list is given, replaces it atomically in the same transaction.
pub async fn update(
    db: &SqlitePool,
    id: i64,
    name: &str,
    category: MealCategory,
    macros: Option<&MacroTotals>,
    foods: Option<&[FoodQuantity]>,
) -> sqlx::Result<Option<MealRow>> {
    let mut tx = db.begin().await?;
    let row = match macros {
        Some(m) => {
            sqlx::query_as::<_, MealRow>(&format!(
                r#"
                UPDATE meals
                SET name = $1, category = $2, calories = $3, proteins = $4, carbs = $5, fats = $6
                WHERE id = $7
                RETURNING {COLUMNS}
                "#
            ))
            .bind(name)
            .bind(category)
            .bind(m.calories)
            .bind(m.proteins)
            .bind(m.carbs)
            .bind(m.fats)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_as::<_, MealRow>(&format!(
                "UPDATE meals SET name = $1, category = $2 WHERE id = $3 RETURNING {COLUMNS}"
            ))
            .bind(name)
            .bind(category)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        }
    };

    if let (Some(row), Some(foods)) = (&row, foods) {
        sqlx::query("DELETE FROM meal_foods WHERE meal_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        for food in foods {
            sqlx::query("INSERT INTO meal_foods (meal_id, food_id, quantity) VALUES ($1, $2, $3)")
                .bind(row.id)
                .bind(food.food_id)
                .bind(food.quantity)
                .execute(&mut *tx)
                .await?;
        }
    }
    tx.commit().await?;
    Ok(row)
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Names of programs that schedule the meal, for conflict reporting.
pub async fn programs_using(db: &SqlitePool, meal_id: i64) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT p.name
        FROM meal_programs p
        JOIN program_meals pm ON p.id = pm.program_id
        WHERE pm.meal_id = $1
        ORDER BY p.name
        "#,
    )
    .bind(meal_id)
    .fetch_all(db)
    .await
}

pub async fn tracking_count(db: &SqlitePool, meal_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meal_tracking WHERE meal_id = $1")
        .bind(meal_id)
        .fetch_one(db)
        .await
}
