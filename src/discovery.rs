use tracing::debug;

use crate::answers;
use crate::config::AnalyticsConfig;
use crate::filter::{self, FilterSpec};
use crate::frequency;
use crate::models::{DiscoveryResponse, DiscoveryResult, Submission, SurveyType, TextResponse, Theme};
use crate::themes::{self, ThemePool};

/// What people came to do, from the free-text answers of discovery surveys.
pub fn discovery(
    submissions: &[Submission],
    spec: &FilterSpec,
    themes: &[Theme],
    config: &AnalyticsConfig,
) -> DiscoveryResult {
    let items: Vec<&Submission> = filter::apply(submissions, spec)
        .into_iter()
        .filter(|submission| submission.survey_type == SurveyType::Discovery)
        .collect();

    let responses: Vec<TextResponse> = items
        .iter()
        .filter_map(|submission| {
            Some(TextResponse {
                text: answers::discovery_text(submission)?.to_string(),
                submitted_at: submission.submitted_at,
                success: answers::task_outcome(submission),
            })
        })
        .collect();

    let word_frequency = frequency::word_frequency(&responses, config);
    let general = themes::pool(themes, ThemePool::General);
    let theme_stats = themes::cluster_by_theme(&responses, &general, config);

    let mut recent: Vec<&TextResponse> = responses.iter().collect();
    recent.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    let recent_responses = recent
        .into_iter()
        .take(config.recent_limit)
        .map(|response| DiscoveryResponse {
            task: response.text.clone(),
            success: response.success,
            submitted_at: response.submitted_at,
        })
        .collect();

    debug!(
        submissions = items.len(),
        responses = responses.len(),
        "aggregated discovery responses"
    );

    DiscoveryResult {
        total_submissions: items.len(),
        word_frequency,
        themes: theme_stats,
        recent_responses,
    }
}
