use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{AdherenceQuery, AdherenceReport};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/adherence", get(adherence_report))
}

#[instrument(skip(state))]
async fn adherence_report(
    State(state): State<AppState>,
    Query(query): Query<AdherenceQuery>,
) -> Result<Json<AdherenceReport>, ApiError> {
    Ok(Json(services::report(&state.db, query).await?))
}
