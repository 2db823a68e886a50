use sqlx::SqlitePool;

use crate::error::ApiError;

use super::dto::FoodPayload;
use super::repo::{self, FoodSource};

pub fn validate(payload: &FoodPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name", "must not be empty"));
    }
    for (field, value) in [
        ("calories", payload.calories),
        ("proteins", payload.proteins),
        ("carbs", payload.carbs),
        ("fats", payload.fats),
    ] {
        if !(value >= 0.0) {
            return Err(ApiError::validation(field, "must be non-negative"));
        }
    }
    if !(payload.portion_size > 0.0) {
        return Err(ApiError::validation("portion_size", "must be positive"));
    }
    if !(payload.conversion_factor > 0.0) {
        return Err(ApiError::validation("conversion_factor", "must be positive"));
    }
    Ok(())
}

pub async fn create(db: &SqlitePool, payload: FoodPayload) -> Result<FoodSource, ApiError> {
    validate(&payload)?;
    repo::insert(db, &payload)
        .await
        .map_err(|e| map_unique_violation(e, &payload.name))
}

pub async fn update(
    db: &SqlitePool,
    id: i64,
    payload: FoodPayload,
) -> Result<FoodSource, ApiError> {
    validate(&payload)?;
    repo::update(db, id, &payload)
        .await
        .map_err(|e| map_unique_violation(e, &payload.name))?
        .ok_or(ApiError::not_found("food source"))
}

/// Deleting a food referenced by a meal is blocked; the conflict names the
/// meals so the caller can act on them.
pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), ApiError> {
    let meals = repo::meals_using(db, id).await?;
    if !meals.is_empty() {
        return Err(ApiError::referential(format!(
            "food source is used by meals: {}",
            meals.join(", ")
        )));
    }
    if repo::delete(db, id).await? == 0 {
        return Err(ApiError::not_found("food source"));
    }
    Ok(())
}

fn map_unique_violation(e: sqlx::Error, name: &str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return ApiError::referential(format!("a food source named '{name}' already exists"));
        }
    }
    ApiError::Database(e)
}
