//! Tunable limits and constants of the aggregators.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsConfig {
    /// Target completion time used by the TPI time factor.
    pub target_time_ms: u64,
    /// Average completion time assumed when no submission reports a duration.
    pub default_avg_time_ms: u64,
    pub word_limit: usize,
    pub word_examples: usize,
    pub theme_examples: usize,
    pub recent_limit: usize,
    /// Cumulative vote share (percent) that closes the long neck.
    pub long_neck_threshold: u32,
    pub top_n: usize,
    pub default_period_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            target_time_ms: 45_000,
            default_avg_time_ms: 60_000,
            word_limit: 30,
            word_examples: 5,
            theme_examples: 3,
            recent_limit: 10,
            long_neck_threshold: 80,
            top_n: 5,
            default_period_days: 30,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_path(path: &Path) -> Result<Self, DashboardError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DashboardError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
