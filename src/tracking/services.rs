use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::dates::days_inclusive;
use crate::error::ApiError;
use crate::meals::{self, dto::MealSummary};
use crate::nutrition::aggregate::{self, MacroTotals};
use crate::nutrition::metrics;
use crate::profile;

use super::dto::{
    DailyIntake, ProgressSummary, RangeQuery, TargetCompliance, TrackMealRequest,
    TrackedMealResponse,
};
use super::repo::{self, TrackedRow};

/// Records a consumption event. The consumption timestamp may not lie in the
/// future relative to recording time.
pub async fn log(db: &SqlitePool, req: TrackMealRequest) -> Result<TrackedMealResponse, ApiError> {
    if req.actual_time > OffsetDateTime::now_utc() {
        return Err(ApiError::validation(
            "actual_time",
            "must not be in the future",
        ));
    }
    if meals::repo::get(db, req.meal_id).await?.is_none() {
        return Err(ApiError::referential(format!(
            "meal {} does not exist",
            req.meal_id
        )));
    }

    let id = repo::insert(
        db,
        req.date,
        req.meal_id,
        req.meal_time,
        req.actual_time,
        req.notes.as_deref(),
    )
    .await?;
    let row = repo::get(db, id)
        .await?
        .ok_or(ApiError::not_found("tracked meal"))?;
    respond(db, row).await
}

pub async fn list(db: &SqlitePool, range: RangeQuery) -> Result<Vec<TrackedMealResponse>, ApiError> {
    validate_range(&range)?;
    let rows = repo::between(db, range.start, range.end).await?;
    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(respond(db, row).await?);
    }
    Ok(responses)
}

pub async fn delete(db: &SqlitePool, id: i64) -> Result<(), ApiError> {
    if repo::delete(db, id).await? == 0 {
        return Err(ApiError::not_found("tracked meal"));
    }
    Ok(())
}

/// Daily tracked totals over the range, each day explicit, compared against
/// the profile targets when a profile exists. Averages cover only the days
/// with at least one tracked meal.
pub async fn summary(db: &SqlitePool, range: RangeQuery) -> Result<ProgressSummary, ApiError> {
    validate_range(&range)?;

    let targets = match profile::repo::load(db).await? {
        Some(record) => {
            let summary = metrics::summary(&record.input())?;
            let macros = metrics::macro_targets(
                record.weight,
                summary.target_calories,
                None,
                None,
                None,
            );
            Some((summary.target_calories, macros))
        }
        None => None,
    };

    let rows = repo::between(db, range.start, range.end).await?;
    let mut cache = meals::services::TotalsCache::new();
    let mut days = Vec::new();
    let mut range_total = MacroTotals::ZERO;
    let mut tracked_days = 0;

    let mut rows = rows.into_iter().peekable();
    for date in days_inclusive(range.start, range.end) {
        let mut day_total = MacroTotals::ZERO;
        let mut meals_logged = 0;
        while let Some(row) = rows.next_if(|r| r.date == date) {
            day_total += cache.totals(db, &row.meal).await?;
            meals_logged += 1;
        }
        if meals_logged > 0 {
            tracked_days += 1;
            range_total += day_total;
        }

        let compliance = targets.as_ref().map(|(target_calories, macros)| {
            TargetCompliance {
                calories_pct: aggregate::compliance_pct(day_total.calories, *target_calories),
                proteins_pct: aggregate::compliance_pct(day_total.proteins, macros.protein),
                carbs_pct: aggregate::compliance_pct(day_total.carbs, macros.carbs),
                fats_pct: aggregate::compliance_pct(day_total.fats, macros.fats),
            }
        });
        days.push(DailyIntake {
            date,
            meals: meals_logged,
            totals: day_total.rounded(),
            distribution: aggregate::macro_distribution(&day_total),
            compliance,
        });
    }

    let average = if tracked_days > 0 {
        range_total.scaled(1.0 / tracked_days as f64).rounded()
    } else {
        MacroTotals::ZERO
    };
    Ok(ProgressSummary {
        start: range.start,
        end: range.end,
        days,
        tracked_days,
        average,
        target_calories: targets.as_ref().map(|(t, _)| *t),
        macro_targets: targets.map(|(_, m)| m),
    })
}

fn validate_range(range: &RangeQuery) -> Result<(), ApiError> {
    if range.end < range.start {
        return Err(ApiError::validation("end", "must not be before start"));
    }
    Ok(())
}

async fn respond(db: &SqlitePool, row: TrackedRow) -> Result<TrackedMealResponse, ApiError> {
    let totals = meals::services::totals(db, &row.meal).await?;
    Ok(TrackedMealResponse {
        id: row.id,
        date: row.date,
        meal_time: row.meal_time,
        actual_time: row.actual_time,
        notes: row.notes,
        meal: MealSummary {
            id: row.meal.id,
            name: row.meal.name.clone(),
            category: row.meal.category,
            kind: row.meal.kind,
            totals: totals.rounded(),
        },
    })
}
