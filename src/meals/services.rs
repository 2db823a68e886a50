use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::foods;
use crate::nutrition::aggregate::{self, MacroTotals, MealComposition};

use super::dto::{
    CompositionPayload, FoodQuantity, ListQuery, MealConstituent, MealDetails, MealPayload,
    MealResponse, MealSummary,
};
use super::repo::{self, MealKind, MealRow};

fn validate(payload: &MealPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name", "must not be empty"));
    }
    match &payload.composition {
        CompositionPayload::Regular { foods } => {
            if foods.is_empty() {
                return Err(ApiError::validation(
                    "foods",
                    "a regular meal needs at least one food",
                ));
            }
            for food in foods {
                if !(food.quantity > 0.0) {
                    return Err(ApiError::validation("quantity", "must be positive"));
                }
            }
        }
        CompositionPayload::Custom { macros } => {
            for (field, value) in [
                ("calories", macros.calories),
                ("proteins", macros.proteins),
                ("carbs", macros.carbs),
                ("fats", macros.fats),
            ] {
                if !(value >= 0.0) {
                    return Err(ApiError::validation(field, "must be non-negative"));
                }
            }
        }
    }
    Ok(())
}

/// Constituent food ids must resolve before the insert so the caller gets a
/// referential error naming the id instead of a bare FK failure.
async fn check_food_refs(db: &SqlitePool, foods: &[FoodQuantity]) -> Result<(), ApiError> {
    for food in foods {
        if foods::repo::get(db, food.food_id).await?.is_none() {
            return Err(ApiError::referential(format!(
                "food source {} does not exist",
                food.food_id
            )));
        }
    }
    Ok(())
}

/// Reconstructs the composition sum type from storage. Regular meals are
/// always re-read from their constituents; totals are never cached.
pub async fn composition(db: &SqlitePool, meal: &MealRow) -> Result<MealComposition, ApiError> {
    Ok(match meal.kind {
        MealKind::Custom => MealComposition::Custom(meal.stored_macros()),
        MealKind::Regular => MealComposition::Regular(
            repo::constituents(db, meal.id)
                .await?
                .iter()
                .map(|c| c.food.portion(c.quantity))
                .collect(),
        ),
    })
}

pub async fn totals(db: &SqlitePool, meal: &MealRow) -> Result<MacroTotals, ApiError> {
    Ok(aggregate::meal_totals(&composition(db, meal).await?))
}

pub async fn summary(db: &SqlitePool, meal: &MealRow) -> Result<MealSummary, ApiError> {
    let totals = totals(db, meal).await?;
    Ok(MealSummary {
        id: meal.id,
        name: meal.name.clone(),
        category: meal.category,
        kind: meal.kind,
        totals: totals.rounded(),
    })
}

/// Per-request memo of meal totals, for surfaces that visit the same meal on
/// many dates (schedules, tracking ranges, adherence).
#[derive(Default)]
pub struct TotalsCache {
    totals: HashMap<i64, MacroTotals>,
}

impl TotalsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn totals(&mut self, db: &SqlitePool, meal: &MealRow) -> Result<MacroTotals, ApiError> {
        if let Some(cached) = self.totals.get(&meal.id) {
            return Ok(*cached);
        }
        let computed = totals(db, meal).await?;
        self.totals.insert(meal.id, computed);
        Ok(computed)
    }
}

pub async fn create(db: &SqlitePool, payload: MealPayload) -> Result<MealResponse, ApiError> {
    validate(&payload)?;
    let row = match &payload.composition {
        CompositionPayload::Regular { foods } => {
            check_food_refs(db, foods).await?;
            repo::insert(
                db,
                &payload.name,
                payload.category,
                MealKind::Regular,
                None,
                foods,
            )
            .await
        }
        CompositionPayload::Custom { macros } => {
            repo::insert(
                db,
                &payload.name,
                payload.category,
                MealKind::Custom,
                Some(macros),
                &[],
            )
            .await
        }
    }
    .map_err(|e| map_unique_violation(e, &payload.name))?;
    respond(db, row).await
}

pub async fn list(db: &SqlitePool, query: ListQuery) -> Result<Vec<MealResponse>, ApiError> {
    let rows = repo::list(db, query.kind, query.category).await?;
    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(respond(db, row).await?);
    }
    Ok(responses)
}

pub async fn details(db: &SqlitePool, id: i64) -> Result<MealDetails, ApiError> {
    let row = repo::get(db, id).await?.ok_or(ApiError::not_found("meal"))?;
    let foods = match row.kind {
        MealKind::Custom => Vec::new(),
        MealKind::Regular => repo::constituents(db, id)
            .await?
            .into_iter()
            .map(|c| MealConstituent {
                food_id: c.food.id,
                name: c.food.name.clone(),
                quantity: c.quantity,
                base_unit: c.food.base_unit,
                totals: aggregate::portion_totals(&c.food.portion(c.quantity)).rounded(),
            })
            .collect(),
    };
    let created_at = row.created_at;
    let summary = summary(db, &row).await?;
    Ok(MealDetails {
        summary,
        created_at,
        foods,
    })
}

pub async fn update(db: &SqlitePool, id: i64, payload: MealPayload) -> Result<MealResponse, ApiError> {
    validate(&payload)?;
    let existing = repo::get(db, id).await?.ok_or(ApiError::not_found("meal"))?;

    let row = match (&payload.composition, existing.kind) {
        (CompositionPayload::Regular { foods }, MealKind::Regular) => {
            check_food_refs(db, foods).await?;
            repo::update(db, id, &payload.name, payload.category, None, Some(foods)).await
        }
        (CompositionPayload::Custom { macros }, MealKind::Custom) => {
            repo::update(db, id, &payload.name, payload.category, Some(macros), None).await
        }
        _ => {
            return Err(ApiError::validation(
                "kind",
                "a meal cannot change between regular and custom",
            ))
        }
    }
    .map_err(|e| map_unique_violation(e, &payload.name))?
    .ok_or(ApiError::not_found("meal"))?;
    respond(db, row).await
}

/// Deleting a meal that a program or the tracking log still references is
/// blocked; constituents cascade with the meal.
pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), ApiError> {
    let programs = repo::programs_using(db, id).await?;
    if !programs.is_empty() {
        return Err(ApiError::referential(format!(
            "meal is scheduled in programs: {}",
            programs.join(", ")
        )));
    }
    let tracked = repo::tracking_count(db, id).await?;
    if tracked > 0 {
        return Err(ApiError::referential(format!(
            "meal has {tracked} tracking entries"
        )));
    }
    if repo::delete(db, id).await? == 0 {
        return Err(ApiError::not_found("meal"));
    }
    Ok(())
}

async fn respond(db: &SqlitePool, row: MealRow) -> Result<MealResponse, ApiError> {
    let created_at = row.created_at;
    let summary = summary(db, &row).await?;
    Ok(MealResponse {
        summary,
        created_at,
    })
}

fn map_unique_violation(e: sqlx::Error, name: &str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return ApiError::referential(format!("a meal named '{name}' already exists"));
        }
    }
    ApiError::Database(e)
}
