use std::net::SocketAddr;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;
use crate::{adherence, foods, meals, profile, programs, tracking};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(profile::router())
                .merge(foods::router())
                .merge(meals::router())
                .merge(programs::router())
                .merge(tracking::router())
                .merge(adherence::router())
                .route("/health", get(|| async { "ok" }))
                .route("/stats", get(app_stats)),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Row counts for the landing view.
#[derive(Debug, Serialize)]
pub struct AppStats {
    pub food_sources: i64,
    pub meals: i64,
    pub meal_programs: i64,
    pub meal_tracking: i64,
}

async fn app_stats(State(state): State<AppState>) -> Result<Json<AppStats>, ApiError> {
    let count = |table: &'static str| {
        let db = state.db.clone();
        async move {
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&db)
                .await
        }
    };
    Ok(Json(AppStats {
        food_sources: count("food_sources").await?,
        meals: count("meals").await?,
        meal_programs: count("meal_programs").await?,
        meal_tracking: count("meal_tracking").await?,
    }))
}
