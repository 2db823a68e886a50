use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use nutriplan::error::ApiError;
use nutriplan::nutrition::constants::{ActivityLevel, Gender, GoalType};
use nutriplan::nutrition::metrics::ProfileInput;
use nutriplan::profile;

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

fn reference_input() -> ProfileInput {
    ProfileInput {
        weight: 67.0,
        height: 1.69,
        age: 23,
        gender: Gender::Male,
        activity_level: ActivityLevel::LightlyActive,
        goal_type: GoalType::WeightLoss,
        goal_percentage: 10.0,
    }
}

#[tokio::test]
async fn saving_a_profile_yields_reproducible_targets() {
    let db = test_pool().await;

    let saved = profile::services::save(&db, reference_input())
        .await
        .expect("profile saves");
    assert_eq!(saved.metrics.bmr, 1616.0);
    assert_eq!(saved.metrics.tdee, 2004.0);
    assert_eq!(saved.metrics.target_calories, 1804.0);
    assert_eq!(saved.macro_targets.protein, 134.0);
    assert_eq!(saved.macro_targets.carbs, 204.0);
    assert_eq!(saved.macro_targets.fats, 50.0);

    let reloaded = profile::services::current(&db).await.expect("profile loads");
    assert_eq!(reloaded.metrics.target_calories, 1804.0);
    assert_eq!(reloaded.profile.weight, 67.0);
}

#[tokio::test]
async fn saving_again_replaces_the_single_profile() {
    let db = test_pool().await;
    profile::services::save(&db, reference_input())
        .await
        .expect("first save");

    let heavier = ProfileInput {
        weight: 80.0,
        ..reference_input()
    };
    profile::services::save(&db, heavier).await.expect("second save");

    let current = profile::services::current(&db).await.expect("profile loads");
    assert_eq!(current.profile.weight, 80.0);

    let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profile")
        .fetch_one(&db)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn invalid_measurements_never_reach_storage() {
    let db = test_pool().await;
    let bad = ProfileInput {
        height: 0.0,
        ..reference_input()
    };
    match profile::services::save(&db, bad).await {
        Err(ApiError::Validation { field, .. }) => assert_eq!(field, "height"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(matches!(
        profile::services::current(&db).await,
        Err(ApiError::NotFound { .. })
    ));
}

#[tokio::test]
async fn preview_does_not_persist() {
    let db = test_pool().await;
    let preview = profile::services::preview(&reference_input()).expect("preview computes");
    assert_eq!(preview.metrics.target_calories, 1804.0);
    assert!(matches!(
        profile::services::current(&db).await,
        Err(ApiError::NotFound { .. })
    ));
}
