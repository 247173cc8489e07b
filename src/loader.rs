//! Reads submissions, themes and filter parameters at the CLI boundary.

use std::path::Path;

use crate::error::DashboardError;
use crate::models::{AnalysisContext, Submission, Theme};

pub fn load_submissions(path: &Path) -> Result<Vec<Submission>, DashboardError> {
    let raw = read(path)?;
    serde_json::from_str(&raw).map_err(|source| DashboardError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads themes from a `.csv` file or, for any other extension, a JSON array.
pub fn load_themes(path: &Path) -> Result<Vec<Theme>, DashboardError> {
    let is_csv = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));
    if is_csv {
        return load_themes_csv(path);
    }

    let raw = read(path)?;
    serde_json::from_str(&raw).map_err(|source| DashboardError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_themes_csv(path: &Path) -> Result<Vec<Theme>, DashboardError> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: String,
        #[serde(default)]
        team: String,
        name: String,
        #[serde(default)]
        keywords: String,
        #[serde(default)]
        color: String,
        #[serde(default)]
        priority: i32,
        #[serde(default)]
        analysis_context: Option<String>,
    }

    let csv_error = |source| DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut themes = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(csv_error)?;
        let analysis_context = match row.analysis_context.as_deref().map(str::trim) {
            Some("BLOCKER") => AnalysisContext::Blocker,
            Some("GENERAL_FEEDBACK") | Some("") | None => AnalysisContext::GeneralFeedback,
            Some(_) => AnalysisContext::Other,
        };

        themes.push(Theme {
            id: row.id,
            team: row.team,
            name: row.name,
            keywords: row
                .keywords
                .split(';')
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(str::to_string)
                .collect(),
            color: row.color,
            priority: row.priority,
            analysis_context,
        });
    }

    Ok(themes)
}

/// Splits a `key=value` filter parameter.
pub fn parse_filter_param(raw: &str) -> Result<(String, String), DashboardError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(DashboardError::InvalidParam(raw.to_string())),
    }
}

fn read(path: &Path) -> Result<String, DashboardError> {
    std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })
}
