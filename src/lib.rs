//! Aggregation engine for survey-style user feedback.
//!
//! Every aggregator is a pure function of the submissions, a [`filter::FilterSpec`]
//! and, where free text is clustered, a theme list.

pub mod answers;
pub mod blockers;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod frequency;
pub mod loader;
pub mod models;
pub mod overview;
pub mod priority;
pub mod report;
pub mod sample;
pub mod scoring;
pub mod text;
pub mod themes;
pub mod top_tasks;

pub use config::AnalyticsConfig;
pub use error::DashboardError;
pub use filter::FilterSpec;
