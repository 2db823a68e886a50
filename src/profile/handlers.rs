use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::nutrition::metrics::ProfileInput;
use crate::state::AppState;

use super::dto::{MetricsPreview, ProfileResponse};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", put(save_profile))
        .route("/profile/metrics", post(preview_metrics))
}

#[instrument(skip(state))]
async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(services::current(&state.db).await?))
}

#[instrument(skip(state, input))]
async fn save_profile(
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(services::save(&state.db, input).await?))
}

#[instrument(skip(input))]
async fn preview_metrics(
    Json(input): Json<ProfileInput>,
) -> Result<Json<MetricsPreview>, ApiError> {
    Ok(Json(services::preview(&input)?))
}
