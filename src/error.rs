//! Errors raised at the input boundary. The aggregators themselves never fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid filter parameter {0:?}, expected key=value")]
    InvalidParam(String),
}
