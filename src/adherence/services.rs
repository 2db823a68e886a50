use std::collections::HashMap;

use sqlx::SqlitePool;
use time::Date;

use crate::dates::days_inclusive;
use crate::error::ApiError;
use crate::meals;
use crate::nutrition::aggregate::MacroTotals;
use crate::nutrition::constants::MealTime;
use crate::programs::{self, repo::ProgramRow};
use crate::tracking;

use super::dto::{
    AdherenceQuery, AdherenceReport, DailyAdherence, DayKind, MacroPercentages, SlotAdherence,
};

/// A day's worth of entries on one side of the comparison.
#[derive(Debug, Clone, Copy)]
struct SideEntry {
    date: Date,
    meal_time: MealTime,
    totals: MacroTotals,
}

pub async fn report(db: &SqlitePool, query: AdherenceQuery) -> Result<AdherenceReport, ApiError> {
    if query.end < query.start {
        return Err(ApiError::validation("end", "must not be before start"));
    }
    let program = resolve_program(db, &query).await?;

    let mut cache = meals::services::TotalsCache::new();
    let mut planned = Vec::new();
    for entry in programs::repo::entries_between(db, program.id, query.start, query.end).await? {
        planned.push(SideEntry {
            date: entry.date,
            meal_time: entry.meal_time,
            totals: cache.totals(db, &entry.meal).await?,
        });
    }
    let mut tracked = Vec::new();
    for row in tracking::repo::between(db, query.start, query.end).await? {
        tracked.push(SideEntry {
            date: row.date,
            meal_time: row.meal_time,
            totals: cache.totals(db, &row.meal).await?,
        });
    }

    Ok(assemble(program.id, query.start, query.end, &planned, &tracked))
}

/// An explicit program id wins; otherwise the most recently created active
/// program whose span covers the whole range.
async fn resolve_program(db: &SqlitePool, query: &AdherenceQuery) -> Result<ProgramRow, ApiError> {
    if let Some(id) = query.program_id {
        return programs::repo::get(db, id)
            .await?
            .ok_or(ApiError::not_found("program"));
    }
    programs::repo::list_active(db)
        .await?
        .into_iter()
        .find(|p| p.start_date <= query.start && p.end_date >= query.end)
        .ok_or(ApiError::validation(
            "program_id",
            "no program covers the requested range",
        ))
}

fn assemble(
    program_id: i64,
    start: Date,
    end: Date,
    planned: &[SideEntry],
    tracked: &[SideEntry],
) -> AdherenceReport {
    let mut planned_by_day: HashMap<Date, (MacroTotals, i64)> = HashMap::new();
    let mut planned_slots: HashMap<MealTime, i64> = HashMap::new();
    for entry in planned {
        let day = planned_by_day.entry(entry.date).or_default();
        day.0 += entry.totals;
        day.1 += 1;
        *planned_slots.entry(entry.meal_time).or_default() += 1;
    }
    let mut tracked_by_day: HashMap<Date, (MacroTotals, i64)> = HashMap::new();
    let mut tracked_slots: HashMap<MealTime, i64> = HashMap::new();
    for entry in tracked {
        let day = tracked_by_day.entry(entry.date).or_default();
        day.0 += entry.totals;
        day.1 += 1;
        *tracked_slots.entry(entry.meal_time).or_default() += 1;
    }

    let mut days = Vec::new();
    let mut planned_days = 0;
    let mut unplanned_days = 0;
    let mut empty_days = 0;
    let mut planned_total = MacroTotals::ZERO;
    let mut tracked_total = MacroTotals::ZERO;
    let mut unplanned_surplus = MacroTotals::ZERO;
    let mut averages = PercentageMeans::default();

    for date in days_inclusive(start, end) {
        let (planned_day, planned_count) = planned_by_day.get(&date).copied().unwrap_or_default();
        let (tracked_day, tracked_count) = tracked_by_day.get(&date).copied().unwrap_or_default();
        planned_total += planned_day;
        tracked_total += tracked_day;

        let kind = if planned_count > 0 {
            DayKind::Planned
        } else if tracked_count > 0 {
            DayKind::Unplanned
        } else {
            DayKind::Empty
        };

        let (deviation, adherence) = match kind {
            DayKind::Planned => {
                planned_days += 1;
                let percentages = day_percentages(&tracked_day, &planned_day);
                averages.add(&percentages);
                (Some(tracked_day - planned_day), Some(percentages))
            }
            DayKind::Unplanned => {
                unplanned_days += 1;
                unplanned_surplus += tracked_day;
                (None, None)
            }
            DayKind::Empty => {
                empty_days += 1;
                (None, None)
            }
        };

        days.push(DailyAdherence {
            date,
            kind,
            planned: planned_day.rounded(),
            tracked: tracked_day.rounded(),
            deviation: deviation.map(MacroTotals::rounded),
            adherence: adherence.map(round_percentages),
        });
    }

    let slots = MealTime::ALL
        .iter()
        .filter_map(|&meal_time| {
            let planned = *planned_slots.get(&meal_time)?;
            let tracked = tracked_slots.get(&meal_time).copied().unwrap_or(0);
            let pct = (tracked as f64 / planned as f64 * 100.0).min(100.0);
            Some(SlotAdherence {
                meal_time,
                planned,
                tracked,
                adherence_pct: round1(pct),
            })
        })
        .collect();

    AdherenceReport {
        program_id,
        start,
        end,
        days,
        planned_days,
        unplanned_days,
        empty_days,
        planned_total: planned_total.rounded(),
        tracked_total: tracked_total.rounded(),
        unplanned_surplus: unplanned_surplus.rounded(),
        average_adherence: (planned_days > 0).then(|| round_percentages(averages.mean())),
        slots,
    }
}

/// tracked/planned per nutrient; a zero planned amount has no meaningful
/// percentage and stays `None` instead of dividing by zero.
fn day_percentages(tracked: &MacroTotals, planned: &MacroTotals) -> MacroPercentages {
    MacroPercentages {
        calories: pct(tracked.calories, planned.calories),
        proteins: pct(tracked.proteins, planned.proteins),
        carbs: pct(tracked.carbs, planned.carbs),
        fats: pct(tracked.fats, planned.fats),
    }
}

fn pct(tracked: f64, planned: f64) -> Option<f64> {
    (planned > 0.0).then(|| tracked / planned * 100.0)
}

/// Per-nutrient running means over the days that had a planned amount for
/// that nutrient.
#[derive(Default)]
struct PercentageMeans {
    sums: [f64; 4],
    counts: [i64; 4],
}

impl PercentageMeans {
    fn add(&mut self, percentages: &MacroPercentages) {
        for (i, value) in [
            percentages.calories,
            percentages.proteins,
            percentages.carbs,
            percentages.fats,
        ]
        .into_iter()
        .enumerate()
        {
            if let Some(value) = value {
                self.sums[i] += value;
                self.counts[i] += 1;
            }
        }
    }

    fn mean(&self) -> MacroPercentages {
        let at = |i: usize| (self.counts[i] > 0).then(|| self.sums[i] / self.counts[i] as f64);
        MacroPercentages {
            calories: at(0),
            proteins: at(1),
            carbs: at(2),
            fats: at(3),
        }
    }
}

fn round_percentages(p: MacroPercentages) -> MacroPercentages {
    MacroPercentages {
        calories: p.calories.map(round1),
        proteins: p.proteins.map(round1),
        carbs: p.carbs.map(round1),
        fats: p.fats.map(round1),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
