use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{ProgressSummary, RangeQuery, TrackMealRequest, TrackedMealResponse};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/tracking", get(list_tracked))
        .route("/tracking/summary", get(progress_summary))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/tracking", post(track_meal))
        .route("/tracking/:id", axum::routing::delete(delete_tracked))
}

#[instrument(skip(state))]
async fn list_tracked(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<TrackedMealResponse>>, ApiError> {
    Ok(Json(services::list(&state.db, range).await?))
}

#[instrument(skip(state, req))]
async fn track_meal(
    State(state): State<AppState>,
    Json(req): Json<TrackMealRequest>,
) -> Result<(StatusCode, Json<TrackedMealResponse>), ApiError> {
    let tracked = services::log(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(tracked)))
}

#[instrument(skip(state))]
async fn delete_tracked(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn progress_summary(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<ProgressSummary>, ApiError> {
    Ok(Json(services::summary(&state.db, range).await?))
}
