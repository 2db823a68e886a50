use serde::{Deserialize, Serialize};
use time::Date;

use crate::meals::dto::MealSummary;
use crate::nutrition::aggregate::MacroTotals;
use crate::nutrition::constants::MealTime;

#[derive(Debug, Deserialize)]
pub struct CreateProgramRequest {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Deserialize)]
pub struct AssignMealRequest {
    pub date: Date,
    pub meal_time: MealTime,
    pub meal_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: Date,
    pub meal_time: MealTime,
}

/// Date window for the schedule; defaults to the program's own range.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

/// One calendar day of the schedule. Every slot appears, assigned or not.
#[derive(Debug, Serialize)]
pub struct ScheduleDay {
    pub date: Date,
    pub slots: Vec<ScheduleSlot>,
    pub totals: MacroTotals,
}

#[derive(Debug, Serialize)]
pub struct ScheduleSlot {
    pub meal_time: MealTime,
    pub meal: Option<MealSummary>,
}
