use tracing::debug;

use crate::answers;
use crate::config::AnalyticsConfig;
use crate::filter::{self, FilterSpec};
use crate::frequency;
use crate::models::{BlockerResponse, BlockerResult, Submission, SurveyType, TextResponse, Theme};
use crate::themes::{self, ThemePool};

/// What stopped people, from the blocker text of top-tasks surveys.
///
/// A `task` in `spec` narrows the analysis to one task for drill-down.
pub fn blockers(
    submissions: &[Submission],
    spec: &FilterSpec,
    themes: &[Theme],
    config: &AnalyticsConfig,
) -> BlockerResult {
    let mut entries: Vec<(TextResponse, Option<&str>)> = filter::apply(submissions, spec)
        .into_iter()
        .filter(|submission| submission.survey_type == SurveyType::TopTasks)
        .filter_map(|submission| {
            let blocker = answers::blocker_text(submission)?;
            let response = TextResponse {
                text: blocker.to_string(),
                submitted_at: submission.submitted_at,
                success: answers::task_outcome(submission),
            };
            Some((response, answers::task_label(submission)))
        })
        .collect();

    entries.sort_by(|a, b| b.0.submitted_at.cmp(&a.0.submitted_at));
    let recent_blockers = entries
        .iter()
        .take(config.recent_limit)
        .map(|(response, task)| BlockerResponse {
            blocker: response.text.clone(),
            task: task.map(str::to_string),
            submitted_at: response.submitted_at,
        })
        .collect();

    let responses: Vec<TextResponse> = entries.into_iter().map(|(response, _)| response).collect();
    let blocker_themes = themes::pool(themes, ThemePool::Blocker);

    debug!(blockers = responses.len(), task = ?spec.task, "aggregated blockers");

    BlockerResult {
        total_blockers: responses.len(),
        word_frequency: frequency::word_frequency(&responses, config),
        themes: themes::cluster_by_theme(&responses, &blocker_themes, config),
        recent_blockers,
    }
}
