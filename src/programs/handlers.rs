use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{AssignMealRequest, CreateProgramRequest, ScheduleDay, ScheduleQuery, SlotQuery};
use super::repo::{self, ProgramRow};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/programs/:id/schedule", get(get_schedule))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/programs", post(create_program))
        .route("/programs/:id", axum::routing::delete(delete_program))
        .route(
            "/programs/:id/meals",
            put(assign_meal).delete(clear_slot),
        )
}

#[instrument(skip(state))]
async fn list_programs(State(state): State<AppState>) -> Result<Json<Vec<ProgramRow>>, ApiError> {
    Ok(Json(repo::list_active(&state.db).await?))
}

#[instrument(skip(state, req))]
async fn create_program(
    State(state): State<AppState>,
    Json(req): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramRow>), ApiError> {
    let program = services::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

#[instrument(skip(state))]
async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, req))]
async fn assign_meal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignMealRequest>,
) -> Result<StatusCode, ApiError> {
    services::assign(&state.db, id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn clear_slot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<SlotQuery>,
) -> Result<StatusCode, ApiError> {
    services::clear_slot(&state.db, id, q.date, q.meal_time).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleDay>>, ApiError> {
    Ok(Json(services::schedule(&state.db, id, q).await?))
}
