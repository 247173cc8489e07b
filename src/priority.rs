use std::collections::HashMap;

use tracing::debug;

use crate::answers;
use crate::config::AnalyticsConfig;
use crate::filter::{self, FilterSpec};
use crate::models::{Submission, SurveyType, TaskPriorityResult, TaskVote};
use crate::scoring;

/// Vote tally of task-priority surveys with the "long neck" cutoff.
pub fn task_priority(
    submissions: &[Submission],
    spec: &FilterSpec,
    config: &AnalyticsConfig,
) -> TaskPriorityResult {
    let items: Vec<&Submission> = filter::apply(submissions, spec)
        .into_iter()
        .filter(|submission| submission.survey_type == SurveyType::TaskPriority)
        .collect();

    let mut votes: HashMap<&str, (usize, &str)> = HashMap::new();
    for submission in &items {
        let Some((question, selected)) = answers::votes(submission) else {
            continue;
        };
        for task_id in selected {
            let entry = votes
                .entry(task_id.as_str())
                .or_insert((0, question.option_label(task_id)));
            entry.0 += 1;
        }
    }

    let total_votes: usize = votes.values().map(|(count, _)| count).sum();
    let mut ranked: Vec<(&str, usize, &str)> = votes
        .into_iter()
        .map(|(task_id, (count, label))| (task_id, count, label))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(b.2)));

    let mut cumulative = 0usize;
    let tasks: Vec<TaskVote> = ranked
        .into_iter()
        .map(|(task_id, count, label)| {
            cumulative += count;
            TaskVote {
                task_id: task_id.to_string(),
                label: label.to_string(),
                votes: count,
                percentage: scoring::percentage(count, total_votes),
                cumulative_percentage: scoring::percentage(cumulative, total_votes),
            }
        })
        .collect();

    let long_neck_cutoff = long_neck(&tasks, config.long_neck_threshold);
    let top_votes: usize = tasks.iter().take(config.top_n).map(|task| task.votes).sum();

    debug!(
        submissions = items.len(),
        total_votes,
        long_neck_cutoff,
        "aggregated task priority votes"
    );

    TaskPriorityResult {
        total_submissions: items.len(),
        total_votes,
        tasks,
        long_neck_cutoff,
        top_five_percentage: scoring::percentage(top_votes, total_votes),
    }
}

/// Smallest number of leading tasks whose reported `cumulative_percentage` reaches
/// `threshold`, or 0 when no prefix does.
pub fn long_neck(ranked: &[TaskVote], threshold: u32) -> usize {
    ranked
        .iter()
        .position(|task| task.votes > 0 && task.cumulative_percentage >= threshold)
        .map_or(0, |index| index + 1)
}
