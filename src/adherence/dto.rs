use serde::{Deserialize, Serialize};
use time::Date;

use crate::nutrition::aggregate::MacroTotals;
use crate::nutrition::constants::MealTime;

#[derive(Debug, Deserialize)]
pub struct AdherenceQuery {
    pub start: Date,
    pub end: Date,
    /// When absent, the most recent active program covering the whole range
    /// is used.
    pub program_id: Option<i64>,
}

/// What a report day represents: a day with program entries, a day with
/// tracking but no plan (surplus), or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Planned,
    Unplanned,
    Empty,
}

/// Per-nutrient tracked/planned percentages. A `None` nutrient had no
/// planned amount to compare against.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacroPercentages {
    pub calories: Option<f64>,
    pub proteins: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DailyAdherence {
    pub date: Date,
    pub kind: DayKind,
    pub planned: MacroTotals,
    pub tracked: MacroTotals,
    /// tracked − planned; only for planned days.
    pub deviation: Option<MacroTotals>,
    pub adherence: Option<MacroPercentages>,
}

/// Planned vs tracked entry counts per meal-time slot, over the whole range.
#[derive(Debug, Serialize)]
pub struct SlotAdherence {
    pub meal_time: MealTime,
    pub planned: i64,
    pub tracked: i64,
    pub adherence_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct AdherenceReport {
    pub program_id: i64,
    pub start: Date,
    pub end: Date,
    pub days: Vec<DailyAdherence>,
    pub planned_days: i64,
    pub unplanned_days: i64,
    pub empty_days: i64,
    /// Sums over the range. `tracked_total` covers every day; surplus eaten
    /// on unplanned days is also broken out separately.
    pub planned_total: MacroTotals,
    pub tracked_total: MacroTotals,
    pub unplanned_surplus: MacroTotals,
    /// Per-nutrient mean over planned days; absent when nothing was planned.
    pub average_adherence: Option<MacroPercentages>,
    pub slots: Vec<SlotAdherence>,
}
