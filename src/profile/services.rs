use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::nutrition::metrics::{self, ProfileInput};

use super::dto::{MetricsPreview, ProfileResponse};
use super::repo::{self, ProfileRecord};

pub async fn save(db: &SqlitePool, input: ProfileInput) -> Result<ProfileResponse, ApiError> {
    let metrics = metrics::summary(&input)?;
    let record = repo::save(db, &input).await?;
    Ok(respond(record, metrics))
}

pub async fn current(db: &SqlitePool) -> Result<ProfileResponse, ApiError> {
    let record = repo::load(db).await?.ok_or(ApiError::not_found("profile"))?;
    let metrics = metrics::summary(&record.input())?;
    Ok(respond(record, metrics))
}

pub fn preview(input: &ProfileInput) -> Result<MetricsPreview, ApiError> {
    let metrics = metrics::summary(input)?;
    Ok(MetricsPreview {
        metrics,
        macro_targets: metrics::macro_targets(
            input.weight,
            metrics.target_calories,
            None,
            None,
            None,
        ),
    })
}

fn respond(record: ProfileRecord, metrics: metrics::MetricsSummary) -> ProfileResponse {
    let macro_targets =
        metrics::macro_targets(record.weight, metrics.target_calories, None, None, None);
    ProfileResponse {
        profile: record,
        metrics,
        macro_targets,
    }
}
