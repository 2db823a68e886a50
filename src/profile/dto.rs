use serde::Serialize;

use crate::nutrition::metrics::{MacroTargets, MetricsSummary};

use super::repo::ProfileRecord;

/// The stored profile together with everything derived from it.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileRecord,
    pub metrics: MetricsSummary,
    pub macro_targets: MacroTargets,
}

/// Derived metrics for hypothetical inputs, without saving anything.
#[derive(Debug, Serialize)]
pub struct MetricsPreview {
    pub metrics: MetricsSummary,
    pub macro_targets: MacroTargets,
}
