use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{ListQuery, MealDetails, MealPayload, MealResponse};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", put(update_meal).delete(delete_meal))
}

#[instrument(skip(state))]
async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<MealResponse>>, ApiError> {
    Ok(Json(services::list(&state.db, q).await?))
}

#[instrument(skip(state))]
async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MealDetails>, ApiError> {
    Ok(Json(services::details(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
async fn create_meal(
    State(state): State<AppState>,
    Json(payload): Json<MealPayload>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    let meal = services::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state, payload))]
async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<MealPayload>,
) -> Result<Json<MealResponse>, ApiError> {
    Ok(Json(services::update(&state.db, id, payload).await?))
}

#[instrument(skip(state))]
async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
