use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::meals::dto::MealSummary;
use crate::nutrition::aggregate::{MacroDistribution, MacroTotals};
use crate::nutrition::constants::MealTime;
use crate::nutrition::metrics::MacroTargets;

#[derive(Debug, Deserialize)]
pub struct TrackMealRequest {
    pub date: Date,
    pub meal_id: i64,
    pub meal_time: MealTime,
    pub actual_time: OffsetDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Date,
    pub end: Date,
}

#[derive(Debug, Serialize)]
pub struct TrackedMealResponse {
    pub id: i64,
    pub date: Date,
    pub meal_time: MealTime,
    pub actual_time: OffsetDateTime,
    pub notes: Option<String>,
    pub meal: MealSummary,
}

/// How one day's tracked intake compares against the profile targets.
/// `None` fields mean there is no target to compare against.
#[derive(Debug, Serialize)]
pub struct TargetCompliance {
    pub calories_pct: Option<f64>,
    pub proteins_pct: Option<f64>,
    pub carbs_pct: Option<f64>,
    pub fats_pct: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DailyIntake {
    pub date: Date,
    pub meals: i64,
    pub totals: MacroTotals,
    pub distribution: MacroDistribution,
    pub compliance: Option<TargetCompliance>,
}

/// Progress over a date range: every day explicit, averages over the days
/// that have at least one tracked meal.
#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub start: Date,
    pub end: Date,
    pub days: Vec<DailyIntake>,
    pub tracked_days: i64,
    pub average: MacroTotals,
    pub target_calories: Option<f64>,
    pub macro_targets: Option<MacroTargets>,
}
