use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{FoodPayload, ListQuery};
use super::repo::{self, FoodSource};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/foods/:id", get(get_food))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", post(create_food))
        .route(
            "/foods/:id",
            axum::routing::put(update_food).delete(delete_food),
        )
}

#[instrument(skip(state))]
async fn list_foods(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<FoodSource>>, ApiError> {
    Ok(Json(repo::list(&state.db, q.category).await?))
}

#[instrument(skip(state))]
async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FoodSource>, ApiError> {
    let food = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::not_found("food source"))?;
    Ok(Json(food))
}

#[instrument(skip(state, payload))]
async fn create_food(
    State(state): State<AppState>,
    Json(payload): Json<FoodPayload>,
) -> Result<(StatusCode, Json<FoodSource>), ApiError> {
    let food = services::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state, payload))]
async fn update_food(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<FoodPayload>,
) -> Result<Json<FoodSource>, ApiError> {
    Ok(Json(services::update(&state.db, id, payload).await?))
}

#[instrument(skip(state))]
async fn delete_food(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
