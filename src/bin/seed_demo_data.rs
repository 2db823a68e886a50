//! Populates the store with a demo dataset: a profile, the default food
//! catalogue, composed meals, a two-week program and a randomized tracking
//! history for the past week.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::{Duration, OffsetDateTime};

use nutriplan::foods::dto::FoodPayload;
use nutriplan::meals::dto::{CompositionPayload, FoodQuantity, MealPayload};
use nutriplan::nutrition::aggregate::MacroTotals;
use nutriplan::nutrition::constants::{
    ActivityLevel, BaseUnit, FoodCategory, Gender, GoalType, MealCategory, MealTime,
};
use nutriplan::nutrition::metrics::ProfileInput;
use nutriplan::programs::dto::{AssignMealRequest, CreateProgramRequest};
use nutriplan::state::AppState;
use nutriplan::tracking::dto::TrackMealRequest;
use nutriplan::{foods, meals, profile, programs, tracking};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let state = AppState::init().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;
    let db = &state.db;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM food_sources")
        .fetch_one(db)
        .await?;
    if existing > 0 {
        anyhow::bail!("database already contains {existing} food sources; refusing to seed twice");
    }

    profile::services::save(
        db,
        ProfileInput {
            weight: 67.0,
            height: 1.69,
            age: 23,
            gender: Gender::Male,
            activity_level: ActivityLevel::LightlyActive,
            goal_type: GoalType::WeightLoss,
            goal_percentage: 10.0,
        },
    )
    .await?;
    tracing::info!("seeded profile");

    let mut food_ids = std::collections::HashMap::new();
    for (name, category, calories, proteins, carbs, fats, portion_size, base_unit, conversion) in [
        ("Chicken Breast", FoodCategory::ProteinSources, 165.0, 31.0, 0.0, 3.6, 100.0, BaseUnit::Grams, 1.0),
        ("Canned Tuna", FoodCategory::ProteinSources, 116.0, 26.0, 0.0, 1.0, 100.0, BaseUnit::Grams, 1.0),
        ("Egg", FoodCategory::ProteinSources, 74.0, 6.3, 0.7, 5.0, 1.0, BaseUnit::Unit, 52.0),
        ("Greek Yogurt 0%", FoodCategory::ProteinSources, 59.0, 10.0, 3.6, 0.0, 100.0, BaseUnit::Grams, 1.0),
        ("Brown Rice", FoodCategory::ComplexCarbohydrates, 112.0, 2.6, 23.0, 0.9, 100.0, BaseUnit::Grams, 1.0),
        ("Oats", FoodCategory::ComplexCarbohydrates, 389.0, 16.9, 66.0, 6.9, 100.0, BaseUnit::Grams, 1.0),
        ("Sweet Potato", FoodCategory::ComplexCarbohydrates, 86.0, 1.6, 20.0, 0.1, 100.0, BaseUnit::Grams, 1.0),
        ("Avocado", FoodCategory::HealthyFats, 160.0, 2.0, 8.5, 14.7, 1.0, BaseUnit::Unit, 170.0),
        ("Olive Oil", FoodCategory::HealthyFats, 884.0, 0.0, 0.0, 100.0, 100.0, BaseUnit::Milliliters, 1.0),
        ("Almonds", FoodCategory::HealthyFats, 579.0, 21.0, 22.0, 49.0, 100.0, BaseUnit::Grams, 1.0),
        ("Banana", FoodCategory::Fruits, 89.0, 1.1, 23.0, 0.3, 1.0, BaseUnit::Unit, 118.0),
        ("Apple", FoodCategory::Fruits, 52.0, 0.3, 14.0, 0.2, 1.0, BaseUnit::Unit, 182.0),
        ("Blueberries", FoodCategory::Fruits, 57.0, 0.7, 14.0, 0.3, 100.0, BaseUnit::Grams, 1.0),
    ] {
        let food = foods::services::create(
            db,
            FoodPayload {
                name: name.into(),
                category,
                calories,
                proteins,
                carbs,
                fats,
                portion_size,
                base_unit,
                conversion_factor: conversion,
            },
        )
        .await?;
        food_ids.insert(name, food.id);
    }
    tracing::info!(count = food_ids.len(), "seeded food sources");

    let regular = |name: &str, category: MealCategory, parts: Vec<(&str, f64)>| MealPayload {
        name: name.into(),
        category,
        composition: CompositionPayload::Regular {
            foods: parts
                .into_iter()
                .map(|(food, quantity)| FoodQuantity {
                    food_id: food_ids[food],
                    quantity,
                })
                .collect(),
        },
    };

    let oatmeal = meals::services::create(
        db,
        regular(
            "Oatmeal with Banana",
            MealCategory::Breakfast,
            vec![("Oats", 60.0), ("Banana", 1.0), ("Blueberries", 50.0)],
        ),
    )
    .await?;
    let chicken_rice = meals::services::create(
        db,
        regular(
            "Chicken and Rice",
            MealCategory::LunchDinner,
            vec![("Chicken Breast", 150.0), ("Brown Rice", 180.0), ("Olive Oil", 10.0)],
        ),
    )
    .await?;
    let tuna_bowl = meals::services::create(
        db,
        regular(
            "Tuna Sweet Potato Bowl",
            MealCategory::LunchDinner,
            vec![("Canned Tuna", 100.0), ("Sweet Potato", 200.0), ("Avocado", 0.5)],
        ),
    )
    .await?;
    let yogurt_snack = meals::services::create(
        db,
        regular(
            "Yogurt with Blueberries",
            MealCategory::Snacks,
            vec![("Greek Yogurt 0%", 200.0), ("Blueberries", 80.0), ("Almonds", 15.0)],
        ),
    )
    .await?;
    let shake = meals::services::create(
        db,
        MealPayload {
            name: "Protein Shake".into(),
            category: MealCategory::Snacks,
            composition: CompositionPayload::Custom {
                macros: MacroTotals::new(220.0, 30.0, 12.0, 5.0),
            },
        },
    )
    .await?;
    let restaurant = meals::services::create(
        db,
        MealPayload {
            name: "Restaurant Dinner".into(),
            category: MealCategory::LunchDinner,
            composition: CompositionPayload::Custom {
                macros: MacroTotals::new(850.0, 35.0, 70.0, 45.0),
            },
        },
    )
    .await?;
    tracing::info!("seeded meals");

    let today = OffsetDateTime::now_utc().date();
    let start = today - Duration::days(7);
    let end = today + Duration::days(6);
    let program = programs::services::create(
        db,
        CreateProgramRequest {
            name: "Demo Cut Week".into(),
            start_date: start,
            end_date: end,
        },
    )
    .await?;

    let mut date = start;
    let mut dinner_toggle = false;
    while date <= end {
        let dinner = if dinner_toggle { tuna_bowl.summary.id } else { chicken_rice.summary.id };
        dinner_toggle = !dinner_toggle;
        for (meal_time, meal_id) in [
            (MealTime::Breakfast, oatmeal.summary.id),
            (MealTime::MorningSnack, shake.summary.id),
            (MealTime::Lunch, chicken_rice.summary.id),
            (MealTime::AfternoonSnack, yogurt_snack.summary.id),
            (MealTime::Dinner, dinner),
        ] {
            programs::services::assign(
                db,
                program.id,
                AssignMealRequest {
                    date,
                    meal_time,
                    meal_id,
                },
            )
            .await?;
        }
        date = date.next_day().expect("date range stays in bounds");
    }
    tracing::info!(program_id = program.id, "seeded program");

    // Tracking history for the past week: mostly on-plan, with skipped slots
    // and the occasional restaurant substitution.
    let mut rng = StdRng::seed_from_u64(42);
    let mut logged = 0;
    let mut date = start;
    while date < today {
        let schedule = programs::services::schedule(
            db,
            program.id,
            nutriplan::programs::dto::ScheduleQuery {
                start: Some(date),
                end: Some(date),
            },
        )
        .await?;
        for slot in &schedule[0].slots {
            let Some(meal) = &slot.meal else { continue };
            let roll: f64 = rng.gen();
            if roll < 0.15 {
                continue; // skipped the slot entirely
            }
            let meal_id = if roll > 0.92 {
                restaurant.summary.id
            } else {
                meal.id
            };
            let actual_time = date
                .with_hms(slot_hour(slot.meal_time), rng.gen_range(0..60), 0)
                .expect("valid time of day")
                .assume_utc();
            tracking::services::log(
                db,
                TrackMealRequest {
                    date,
                    meal_id,
                    meal_time: slot.meal_time,
                    actual_time,
                    notes: None,
                },
            )
            .await?;
            logged += 1;
        }
        date = date.next_day().expect("date range stays in bounds");
    }
    tracing::info!(entries = logged, "seeded tracking history");

    Ok(())
}

fn slot_hour(meal_time: MealTime) -> u8 {
    match meal_time {
        MealTime::Breakfast => 8,
        MealTime::MorningSnack => 11,
        MealTime::Lunch => 13,
        MealTime::AfternoonSnack => 17,
        MealTime::Dinner => 20,
    }
}
