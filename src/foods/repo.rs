use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::nutrition::aggregate::{FoodPortion, MacroTotals};
use crate::nutrition::constants::{BaseUnit, FoodCategory};

use super::dto::FoodPayload;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodSource {
    pub id: i64,
    pub name: String,
    pub category: FoodCategory,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
    pub portion_size: f64,
    pub base_unit: BaseUnit,
    pub conversion_factor: f64,
}

impl FoodSource {
    pub fn per_hundred(&self) -> MacroTotals {
        MacroTotals::new(self.calories, self.proteins, self.carbs, self.fats)
    }

    pub fn portion(&self, quantity: f64) -> FoodPortion {
        FoodPortion {
            per_hundred: self.per_hundred(),
            base_unit: self.base_unit,
            conversion_factor: self.conversion_factor,
            quantity,
        }
    }
}

const COLUMNS: &str = "id, name, category, calories, proteins, carbs, fats, \
                       portion_size, base_unit, conversion_factor";

pub async fn list(
    db: &SqlitePool,
    category: Option<FoodCategory>,
) -> sqlx::Result<Vec<FoodSource>> {
    match category {
        Some(category) => {
            sqlx::query_as::<_, FoodSource>(&format!(
                "SELECT {COLUMNS} FROM food_sources WHERE category = $1 ORDER BY name"
            ))
            .bind(category)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, FoodSource>(&format!(
                "SELECT {COLUMNS} FROM food_sources ORDER BY name"
            ))
            .fetch_all(db)
            .await
        }
    }
}

pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<FoodSource>> {
    sqlx::query_as::<_, FoodSource>(&format!(
        "SELECT {COLUMNS} FROM food_sources WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert(db: &SqlitePool, payload: &FoodPayload) -> sqlx::Result<FoodSource> {
    sqlx::query_as::<_, FoodSource>(&format!(
        r#"
        INSERT INTO food_sources (
            name, category, calories, proteins, carbs, fats,
            portion_size, base_unit, conversion_factor
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&payload.name)
    .bind(payload.category)
    .bind(payload.calories)
    .bind(payload.proteins)
    .bind(payload.carbs)
    .bind(payload.fats)
    .bind(payload.portion_size)
    .bind(payload.base_unit)
    .bind(payload.conversion_factor)
    .fetch_one(db)
    .await
}

pub async fn update(
    db: &SqlitePool,
    id: i64,
    payload: &FoodPayload,
) -> sqlx::Result<Option<FoodSource>> {
    sqlx::query_as::<_, FoodSource>(&format!(
        r#"
        UPDATE food_sources
        SET name = $1, category = $2, calories = $3, proteins = $4, carbs = $5,
            fats = $6, portion_size = $7, base_unit = $8, conversion_factor = $9
        WHERE id = $10
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&payload.name)
    .bind(payload.category)
    .bind(payload.calories)
    .bind(payload.proteins)
    .bind(payload.carbs)
    .bind(payload.fats)
    .bind(payload.portion_size)
    .bind(payload.base_unit)
    .bind(payload.conversion_factor)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM food_sources WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Names of meals that reference the food, for conflict reporting.
pub async fn meals_using(db: &SqlitePool, food_id: i64) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT m.name
        FROM meals m
        JOIN meal_foods mf ON mf.meal_id = m.id
        WHERE mf.food_id = $1
        ORDER BY m.name
        "#,
    )
    .bind(food_id)
    .fetch_all(db)
    .await
}
