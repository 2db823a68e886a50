use std::collections::HashMap;

use sqlx::SqlitePool;
use time::Date;

use crate::dates::days_inclusive;
use crate::error::ApiError;
use crate::meals;
use crate::meals::dto::MealSummary;
use crate::nutrition::aggregate::MacroTotals;
use crate::nutrition::constants::MealTime;

use super::dto::{AssignMealRequest, CreateProgramRequest, ScheduleDay, ScheduleQuery, ScheduleSlot};
use super::repo::{self, ProgramRow};

pub async fn create(db: &SqlitePool, req: CreateProgramRequest) -> Result<ProgramRow, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::validation("name", "must not be empty"));
    }
    if req.end_date < req.start_date {
        return Err(ApiError::validation(
            "end_date",
            "must not be before start_date",
        ));
    }
    Ok(repo::insert(db, &req.name, req.start_date, req.end_date).await?)
}

pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), ApiError> {
    if repo::delete(db, id).await? == 0 {
        return Err(ApiError::not_found("program"));
    }
    Ok(())
}

/// Assigns (or replaces) the meal in a (date, slot) cell. The date must fall
/// inside the program range and the meal must exist.
pub async fn assign(db: &SqlitePool, program_id: i64, req: AssignMealRequest) -> Result<(), ApiError> {
    let program = repo::get(db, program_id)
        .await?
        .ok_or(ApiError::not_found("program"))?;
    if req.date < program.start_date || req.date > program.end_date {
        return Err(ApiError::validation(
            "date",
            "must fall within the program date range",
        ));
    }
    if meals::repo::get(db, req.meal_id).await?.is_none() {
        return Err(ApiError::referential(format!(
            "meal {} does not exist",
            req.meal_id
        )));
    }
    Ok(repo::upsert_entry(db, program_id, req.date, req.meal_time, req.meal_id).await?)
}

pub async fn clear_slot(
    db: &SqlitePool,
    program_id: i64,
    date: Date,
    meal_time: MealTime,
) -> Result<(), ApiError> {
    if repo::delete_entry(db, program_id, date, meal_time).await? == 0 {
        return Err(ApiError::not_found("program meal"));
    }
    Ok(())
}

/// The schedule grid: one entry per date in the window, every slot present,
/// empty cells explicit.
pub async fn schedule(
    db: &SqlitePool,
    program_id: i64,
    query: ScheduleQuery,
) -> Result<Vec<ScheduleDay>, ApiError> {
    let program = repo::get(db, program_id)
        .await?
        .ok_or(ApiError::not_found("program"))?;
    let start = query.start.unwrap_or(program.start_date);
    let end = query.end.unwrap_or(program.end_date);
    if end < start {
        return Err(ApiError::validation("end", "must not be before start"));
    }

    let entries = repo::entries_between(db, program_id, start, end).await?;
    let mut cache = meals::services::TotalsCache::new();
    // Day totals accumulate the raw values; rounding happens once per cell
    // and once per day when the DTOs are built.
    let mut assigned: HashMap<(Date, MealTime), (MealSummary, MacroTotals)> = HashMap::new();
    for entry in entries {
        let totals = cache.totals(db, &entry.meal).await?;
        let summary = MealSummary {
            id: entry.meal.id,
            name: entry.meal.name.clone(),
            category: entry.meal.category,
            kind: entry.meal.kind,
            totals: totals.rounded(),
        };
        assigned.insert((entry.date, entry.meal_time), (summary, totals));
    }

    let days = days_inclusive(start, end)
        .into_iter()
        .map(|date| {
            let mut day_total = MacroTotals::ZERO;
            let slots = MealTime::ALL
                .iter()
                .map(|&meal_time| {
                    let meal = assigned.remove(&(date, meal_time)).map(|(summary, raw)| {
                        day_total += raw;
                        summary
                    });
                    ScheduleSlot { meal_time, meal }
                })
                .collect();
            ScheduleDay {
                date,
                slots,
                totals: day_total.rounded(),
            }
        })
        .collect();
    Ok(days)
}
