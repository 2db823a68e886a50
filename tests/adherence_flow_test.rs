use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use time::macros::datetime;
use time::{macros::date, Duration, OffsetDateTime};

use nutriplan::adherence::dto::{AdherenceQuery, DayKind};
use nutriplan::adherence;
use nutriplan::error::ApiError;
use nutriplan::meals::dto::{CompositionPayload, MealPayload};
use nutriplan::meals;
use nutriplan::nutrition::aggregate::MacroTotals;
use nutriplan::nutrition::constants::{MealCategory, MealTime};
use nutriplan::programs::dto::{AssignMealRequest, CreateProgramRequest};
use nutriplan::programs;
use nutriplan::tracking::dto::{RangeQuery, TrackMealRequest};
use nutriplan::tracking;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

async fn seed_custom_meal(db: &SqlitePool, name: &str, totals: MacroTotals) -> i64 {
    meals::services::create(
        db,
        MealPayload {
            name: name.into(),
            category: MealCategory::LunchDinner,
            composition: CompositionPayload::Custom { macros: totals },
        },
    )
    .await
    .expect("meal saves")
    .summary
    .id
}

/// Program over 2025-05-01..07 planning 2000 kcal lunches on the 1st and
/// 2nd; tracking logs the lunch on the 1st and an off-plan dinner on the 3rd.
async fn seed_scenario(db: &SqlitePool) -> (i64, i64) {
    let planned_meal = seed_custom_meal(db, "Planned Lunch", MacroTotals::new(2000.0, 150.0, 200.0, 60.0)).await;
    let extra_meal = seed_custom_meal(db, "Late Snack", MacroTotals::new(500.0, 20.0, 60.0, 18.0)).await;

    let program = programs::services::create(
        db,
        CreateProgramRequest {
            name: "May Plan".into(),
            start_date: date!(2025 - 05 - 01),
            end_date: date!(2025 - 05 - 07),
        },
    )
    .await
    .expect("program saves");

    for day in [date!(2025 - 05 - 01), date!(2025 - 05 - 02)] {
        programs::services::assign(
            db,
            program.id,
            AssignMealRequest {
                date: day,
                meal_time: MealTime::Lunch,
                meal_id: planned_meal,
            },
        )
        .await
        .expect("assignment succeeds");
    }

    tracking::services::log(
        db,
        TrackMealRequest {
            date: date!(2025 - 05 - 01),
            meal_id: planned_meal,
            meal_time: MealTime::Lunch,
            actual_time: datetime!(2025 - 05 - 01 13:15 UTC),
            notes: Some("on plan".into()),
        },
    )
    .await
    .expect("tracking saves");
    tracking::services::log(
        db,
        TrackMealRequest {
            date: date!(2025 - 05 - 03),
            meal_id: extra_meal,
            meal_time: MealTime::Dinner,
            actual_time: datetime!(2025 - 05 - 03 21:40 UTC),
            notes: None,
        },
    )
    .await
    .expect("tracking saves");

    (program.id, planned_meal)
}

#[tokio::test]
async fn report_classifies_days_and_aggregates_range() {
    let db = test_pool().await;
    seed_scenario(&db).await;

    // No explicit program id: the covering program is resolved.
    let report = adherence::services::report(
        &db,
        AdherenceQuery {
            start: date!(2025 - 05 - 01),
            end: date!(2025 - 05 - 03),
            program_id: None,
        },
    )
    .await
    .expect("report builds");

    assert_eq!(report.days.len(), 3);

    let on_plan = &report.days[0];
    assert_eq!(on_plan.kind, DayKind::Planned);
    assert_eq!(on_plan.adherence.as_ref().unwrap().calories, Some(100.0));
    assert_eq!(on_plan.deviation.unwrap().calories, 0.0);

    // Planned but untouched: 0% adherence, not an error.
    let skipped = &report.days[1];
    assert_eq!(skipped.kind, DayKind::Planned);
    assert_eq!(skipped.adherence.as_ref().unwrap().calories, Some(0.0));
    assert_eq!(skipped.deviation.unwrap().calories, -2000.0);

    // Tracked without a plan: flagged, no deviation against the plan.
    let surplus = &report.days[2];
    assert_eq!(surplus.kind, DayKind::Unplanned);
    assert!(surplus.deviation.is_none());

    assert_eq!(report.planned_days, 2);
    assert_eq!(report.unplanned_days, 1);
    assert_eq!(report.planned_total.calories, 4000.0);
    assert_eq!(report.tracked_total.calories, 2500.0);
    assert_eq!(report.unplanned_surplus.calories, 500.0);
    // Percentages average over planned days, totals sum.
    assert_eq!(report.average_adherence.unwrap().calories, Some(50.0));

    assert_eq!(report.slots.len(), 1);
    assert_eq!(report.slots[0].meal_time, MealTime::Lunch);
    assert_eq!(report.slots[0].planned, 2);
    assert_eq!(report.slots[0].tracked, 1);
    assert_eq!(report.slots[0].adherence_pct, 50.0);
}

#[tokio::test]
async fn ranges_without_a_covering_program_are_rejected() {
    let db = test_pool().await;
    seed_scenario(&db).await;

    let result = adherence::services::report(
        &db,
        AdherenceQuery {
            start: date!(2025 - 05 - 01),
            end: date!(2025 - 05 - 20),
            program_id: None,
        },
    )
    .await;
    match result {
        Err(ApiError::Validation { field, .. }) => assert_eq!(field, "program_id"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn explicit_program_id_wins_over_resolution() {
    let db = test_pool().await;
    let (program_id, _) = seed_scenario(&db).await;

    let report = adherence::services::report(
        &db,
        AdherenceQuery {
            start: date!(2025 - 05 - 02),
            end: date!(2025 - 05 - 02),
            program_id: Some(program_id),
        },
    )
    .await
    .expect("report builds");
    assert_eq!(report.program_id, program_id);
    assert_eq!(report.days.len(), 1);
    assert_eq!(report.days[0].kind, DayKind::Planned);
}

#[tokio::test]
async fn future_consumption_times_are_rejected() {
    let db = test_pool().await;
    let meal = seed_custom_meal(&db, "Future Meal", MacroTotals::new(400.0, 20.0, 40.0, 12.0)).await;

    let tomorrow = OffsetDateTime::now_utc() + Duration::days(1);
    let result = tracking::services::log(
        &db,
        TrackMealRequest {
            date: tomorrow.date(),
            meal_id: meal,
            meal_time: MealTime::Lunch,
            actual_time: tomorrow,
            notes: None,
        },
    )
    .await;
    match result {
        Err(ApiError::Validation { field, .. }) => assert_eq!(field, "actual_time"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn multiple_entries_per_slot_accumulate() {
    let db = test_pool().await;
    let (_, planned_meal) = seed_scenario(&db).await;

    // A second lunch on the 1st: permitted, and it stacks in the totals.
    tracking::services::log(
        &db,
        TrackMealRequest {
            date: date!(2025 - 05 - 01),
            meal_id: planned_meal,
            meal_time: MealTime::Lunch,
            actual_time: datetime!(2025 - 05 - 01 14:05 UTC),
            notes: None,
        },
    )
    .await
    .expect("tracking saves");

    let entries = tracking::services::list(
        &db,
        RangeQuery {
            start: date!(2025 - 05 - 01),
            end: date!(2025 - 05 - 01),
        },
    )
    .await
    .expect("list loads");
    assert_eq!(entries.len(), 2);

    let report = adherence::services::report(
        &db,
        AdherenceQuery {
            start: date!(2025 - 05 - 01),
            end: date!(2025 - 05 - 01),
            program_id: None,
        },
    )
    .await
    .expect("report builds");
    assert_eq!(report.days[0].tracked.calories, 4000.0);
    assert_eq!(report.days[0].adherence.as_ref().unwrap().calories, Some(200.0));
}

#[tokio::test]
async fn progress_summary_reports_tracked_days() {
    let db = test_pool().await;
    seed_scenario(&db).await;

    let summary = tracking::services::summary(
        &db,
        RangeQuery {
            start: date!(2025 - 05 - 01),
            end: date!(2025 - 05 - 03),
        },
    )
    .await
    .expect("summary builds");

    assert_eq!(summary.days.len(), 3);
    assert_eq!(summary.tracked_days, 2);
    assert_eq!(summary.days[0].meals, 1);
    assert_eq!(summary.days[0].totals.calories, 2000.0);
    assert_eq!(summary.days[1].meals, 0);
    assert!(summary.days[1].totals.is_zero());
    // (2000 + 500) / 2 tracked days.
    assert_eq!(summary.average.calories, 1250.0);
    // No profile stored, so no targets to comply against.
    assert!(summary.target_calories.is_none());
    assert!(summary.days[0].compliance.is_none());
}
