use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use time::macros::date;

use nutriplan::error::ApiError;
use nutriplan::meals::dto::{CompositionPayload, MealPayload};
use nutriplan::meals;
use nutriplan::nutrition::aggregate::MacroTotals;
use nutriplan::nutrition::constants::{MealCategory, MealTime};
use nutriplan::programs::dto::{AssignMealRequest, CreateProgramRequest, ScheduleQuery};
use nutriplan::programs::{self, repo::ProgramRow};

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

async fn seed_custom_meal(db: &SqlitePool, name: &str, calories: f64) -> i64 {
    meals::services::create(
        db,
        MealPayload {
            name: name.into(),
            category: MealCategory::LunchDinner,
            composition: CompositionPayload::Custom {
                macros: MacroTotals::new(calories, 30.0, 50.0, 10.0),
            },
        },
    )
    .await
    .expect("meal saves")
    .summary
    .id
}

async fn seed_program(db: &SqlitePool) -> ProgramRow {
    programs::services::create(
        db,
        CreateProgramRequest {
            name: "June Plan".into(),
            start_date: date!(2025 - 06 - 01),
            end_date: date!(2025 - 06 - 07),
        },
    )
    .await
    .expect("program saves")
}

#[tokio::test]
async fn schedule_represents_every_slot_explicitly() {
    let db = test_pool().await;
    let program = seed_program(&db).await;
    let lunch = seed_custom_meal(&db, "Lunch Bowl", 700.0).await;

    programs::services::assign(
        &db,
        program.id,
        AssignMealRequest {
            date: date!(2025 - 06 - 02),
            meal_time: MealTime::Lunch,
            meal_id: lunch,
        },
    )
    .await
    .expect("assignment succeeds");

    let days = programs::services::schedule(
        &db,
        program.id,
        ScheduleQuery {
            start: Some(date!(2025 - 06 - 01)),
            end: Some(date!(2025 - 06 - 03)),
        },
    )
    .await
    .expect("schedule loads");

    assert_eq!(days.len(), 3);
    for day in &days {
        assert_eq!(day.slots.len(), MealTime::ALL.len());
        assert_eq!(day.slots[0].meal_time, MealTime::Breakfast);
        assert_eq!(day.slots[4].meal_time, MealTime::Dinner);
    }
    // Only the assigned cell is filled; the rest stay explicitly empty.
    assert!(days[0].slots.iter().all(|s| s.meal.is_none()));
    assert!(days[0].totals.is_zero());
    let lunch_slot = &days[1].slots[2];
    assert_eq!(lunch_slot.meal_time, MealTime::Lunch);
    assert_eq!(lunch_slot.meal.as_ref().unwrap().name, "Lunch Bowl");
    assert_eq!(days[1].totals.calories, 700.0);
}

#[tokio::test]
async fn reassigning_a_slot_replaces_the_previous_meal() {
    let db = test_pool().await;
    let program = seed_program(&db).await;
    let first = seed_custom_meal(&db, "First Option", 600.0).await;
    let second = seed_custom_meal(&db, "Second Option", 800.0).await;

    for meal_id in [first, second] {
        programs::services::assign(
            &db,
            program.id,
            AssignMealRequest {
                date: date!(2025 - 06 - 02),
                meal_time: MealTime::Dinner,
                meal_id,
            },
        )
        .await
        .expect("assignment succeeds");
    }

    let entries = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM program_meals WHERE program_id = $1",
    )
    .bind(program.id)
    .fetch_one(&db)
    .await
    .expect("count");
    assert_eq!(entries, 1);

    let days = programs::services::schedule(
        &db,
        program.id,
        ScheduleQuery {
            start: Some(date!(2025 - 06 - 02)),
            end: Some(date!(2025 - 06 - 02)),
        },
    )
    .await
    .expect("schedule loads");
    assert_eq!(
        days[0].slots[4].meal.as_ref().unwrap().name,
        "Second Option"
    );
}

#[tokio::test]
async fn assignments_outside_the_program_range_are_rejected() {
    let db = test_pool().await;
    let program = seed_program(&db).await;
    let meal = seed_custom_meal(&db, "Lunch Bowl", 700.0).await;

    let result = programs::services::assign(
        &db,
        program.id,
        AssignMealRequest {
            date: date!(2025 - 07 - 01),
            meal_time: MealTime::Lunch,
            meal_id: meal,
        },
    )
    .await;
    match result {
        Err(ApiError::Validation { field, .. }) => assert_eq!(field, "date"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn clearing_a_slot_and_deleting_scheduled_meals() {
    let db = test_pool().await;
    let program = seed_program(&db).await;
    let meal = seed_custom_meal(&db, "Lunch Bowl", 700.0).await;

    programs::services::assign(
        &db,
        program.id,
        AssignMealRequest {
            date: date!(2025 - 06 - 02),
            meal_time: MealTime::Lunch,
            meal_id: meal,
        },
    )
    .await
    .expect("assignment succeeds");

    // A scheduled meal cannot be deleted out from under the program.
    match meals::services::delete(&db, meal).await {
        Err(ApiError::Referential(message)) => assert!(message.contains("June Plan")),
        other => panic!("expected referential conflict, got {other:?}"),
    }

    programs::services::clear_slot(&db, program.id, date!(2025 - 06 - 02), MealTime::Lunch)
        .await
        .expect("slot clears");
    assert!(matches!(
        programs::services::clear_slot(&db, program.id, date!(2025 - 06 - 02), MealTime::Lunch)
            .await,
        Err(ApiError::NotFound { .. })
    ));

    meals::services::delete(&db, meal).await.expect("meal deletes");
}

#[tokio::test]
async fn deleting_a_program_cascades_its_entries() {
    let db = test_pool().await;
    let program = seed_program(&db).await;
    let meal = seed_custom_meal(&db, "Lunch Bowl", 700.0).await;
    programs::services::assign(
        &db,
        program.id,
        AssignMealRequest {
            date: date!(2025 - 06 - 02),
            meal_time: MealTime::Lunch,
            meal_id: meal,
        },
    )
    .await
    .expect("assignment succeeds");

    programs::services::delete(&db, program.id)
        .await
        .expect("program deletes");
    let entries = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM program_meals")
        .fetch_one(&db)
        .await
        .expect("count");
    assert_eq!(entries, 0);

    let inverted = programs::services::create(
        &db,
        CreateProgramRequest {
            name: "Backwards".into(),
            start_date: date!(2025 - 06 - 07),
            end_date: date!(2025 - 06 - 01),
        },
    )
    .await;
    assert!(matches!(inverted, Err(ApiError::Validation { .. })));
}
