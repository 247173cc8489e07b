use std::collections::BTreeMap;

use tracing::debug;

use crate::answers;
use crate::config::AnalyticsConfig;
use crate::filter::{self, FilterSpec};
use crate::models::{
    DailyStat, Submission, SurveyType, TaskOutcome, TaskStat, TextResponse, Theme, TopTasksResult,
};
use crate::scoring;
use crate::themes::{self, ThemePool};

#[derive(Default)]
struct TaskTally {
    total: usize,
    success: usize,
    partial: usize,
    failure: usize,
    durations: Vec<f64>,
    blockers: Vec<TextResponse>,
}

/// Success, completion time and TPI per task of the top-tasks surveys in `submissions`.
pub fn top_tasks(
    submissions: &[Submission],
    spec: &FilterSpec,
    themes: &[Theme],
    config: &AnalyticsConfig,
) -> TopTasksResult {
    let items: Vec<&Submission> = filter::apply(submissions, spec)
        .into_iter()
        .filter(|submission| submission.survey_type == SurveyType::TopTasks)
        .collect();
    let blocker_themes = themes::pool(themes, ThemePool::Blocker);

    let mut tallies: BTreeMap<&str, TaskTally> = BTreeMap::new();
    let mut daily_stats: BTreeMap<_, DailyStat> = BTreeMap::new();

    for submission in &items {
        let outcome = answers::task_outcome(submission);
        let day = daily_stats.entry(submission.submitted_date()).or_default();
        day.total += 1;
        if outcome == Some(TaskOutcome::Success) {
            day.success += 1;
        }

        let Some(task) = answers::task_label(submission) else {
            continue;
        };
        let tally = tallies.entry(task).or_default();
        tally.total += 1;

        match outcome {
            Some(TaskOutcome::Success) => tally.success += 1,
            Some(TaskOutcome::Partial) => tally.partial += 1,
            Some(TaskOutcome::Failure) => tally.failure += 1,
            None => {}
        }

        if let Some(duration_ms) = submission.duration_ms {
            tally.durations.push(duration_ms as f64);
        }

        if matches!(outcome, Some(TaskOutcome::Partial | TaskOutcome::Failure)) {
            if let Some(blocker) = answers::blocker_text(submission) {
                tally.blockers.push(TextResponse {
                    text: blocker.to_string(),
                    submitted_at: submission.submitted_at,
                    success: outcome,
                });
            }
        }
    }

    let target_time_ms = config.target_time_ms as f64;
    let mut tasks: Vec<TaskStat> = tallies
        .into_iter()
        .map(|(task, tally)| {
            let success_rate = scoring::ratio(tally.success, tally.total);
            let avg_time_ms = scoring::mean(tally.durations.iter().copied())
                .unwrap_or(config.default_avg_time_ms as f64);
            let blockers_by_theme = themes::cluster_by_theme(&tally.blockers, &blocker_themes, config)
                .into_iter()
                .filter(|stat| stat.count > 0)
                .map(|stat| (stat.name, stat.count))
                .collect();

            TaskStat {
                task: task.to_string(),
                total_count: tally.total,
                success_count: tally.success,
                partial_count: tally.partial,
                failure_count: tally.failure,
                success_rate,
                formatted_success_rate: scoring::format_percent(success_rate),
                avg_time_ms: avg_time_ms.round() as u64,
                target_time_ms: config.target_time_ms,
                tpi_score: scoring::tpi_score(success_rate, avg_time_ms, target_time_ms),
                blockers_by_theme,
            }
        })
        .collect();
    tasks.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.task.cmp(&b.task))
    });

    let overall_tpi = scoring::mean(tasks.iter().map(|task| task.tpi_score as f64))
        .map(|value| value.round() as u32)
        .unwrap_or(0);
    let avg_completion_time_ms = scoring::mean(tasks.iter().map(|task| task.avg_time_ms as f64))
        .map(|value| value.round() as u64)
        .unwrap_or(0);

    debug!(
        submissions = items.len(),
        tasks = tasks.len(),
        overall_tpi,
        "aggregated top tasks"
    );

    TopTasksResult {
        total_submissions: items.len(),
        tasks,
        daily_stats,
        overall_tpi,
        avg_completion_time_ms,
        target_time_ms: config.target_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisContext;
    use crate::sample::{demo_themes, SubmissionBuilder};

    fn plan(outcome: TaskOutcome, duration_ms: Option<u64>) -> SubmissionBuilder {
        let builder = SubmissionBuilder::new(SurveyType::TopTasks)
            .task("plan", "Lage oppfølgingsplan")
            .outcome(outcome);
        match duration_ms {
            Some(duration_ms) => builder.duration_ms(duration_ms),
            None => builder,
        }
    }

    #[test]
    fn counts_outcomes_and_scores_tpi() {
        let mut submissions: Vec<Submission> = (0..6)
            .map(|_| plan(TaskOutcome::Success, Some(40_000)).build())
            .collect();
        submissions.extend((0..4).map(|_| plan(TaskOutcome::Failure, None).build()));

        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &[],
            &AnalyticsConfig::default(),
        );
        let task = &result.tasks[0];
        assert_eq!(task.total_count, 10);
        assert_eq!(task.success_count, 6);
        assert_eq!(task.failure_count, 4);
        assert_eq!(task.success_rate, 0.6);
        assert_eq!(task.formatted_success_rate, "60%");
        assert_eq!(task.avg_time_ms, 40_000);
        assert_eq!(task.tpi_score, 60);
        assert_eq!(result.overall_tpi, 60);
    }

    #[test]
    fn missing_durations_fall_back_to_default() {
        let submissions = vec![plan(TaskOutcome::Success, None).build()];
        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &[],
            &AnalyticsConfig::default(),
        );
        assert_eq!(result.tasks[0].avg_time_ms, 60_000);
        assert_eq!(result.tasks[0].tpi_score, 75);
    }

    #[test]
    fn partial_counts_separately_from_success() {
        let submissions = vec![
            plan(TaskOutcome::Success, Some(10_000)).build(),
            plan(TaskOutcome::Partial, Some(10_000)).build(),
        ];
        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &[],
            &AnalyticsConfig::default(),
        );
        assert_eq!(result.tasks[0].partial_count, 1);
        assert_eq!(result.tasks[0].success_rate, 0.5);
        assert_eq!(result.tasks[0].tpi_score, 50);
    }

    #[test]
    fn skips_other_survey_types_and_items_without_task() {
        let submissions = vec![
            plan(TaskOutcome::Success, None).build(),
            SubmissionBuilder::new(SurveyType::Discovery)
                .task("plan", "Lage oppfølgingsplan")
                .build(),
            SubmissionBuilder::new(SurveyType::TopTasks)
                .text("task", "mistyped")
                .build(),
        ];
        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &[],
            &AnalyticsConfig::default(),
        );
        assert_eq!(result.total_submissions, 2);
        assert_eq!(result.tasks.len(), 1);
        assert_eq!(result.tasks[0].total_count, 1);
    }

    #[test]
    fn blockers_cluster_only_on_failed_or_partial_items() {
        let submissions = vec![
            plan(TaskOutcome::Failure, None)
                .text("blocker", "Fikk ikke logget inn med BankID")
                .build(),
            plan(TaskOutcome::Partial, None)
                .text("hindring", "Siden lastet aldri")
                .build(),
            plan(TaskOutcome::Success, None)
                .text("blocker", "BankID var tregt")
                .build(),
            plan(TaskOutcome::Failure, None)
                .text("blocker", "Skjemaet var uklart")
                .build(),
        ];
        let themes = demo_themes();
        assert!(themes
            .iter()
            .any(|theme| theme.analysis_context == AnalysisContext::Blocker));

        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &themes,
            &AnalyticsConfig::default(),
        );
        let blockers = &result.tasks[0].blockers_by_theme;
        assert_eq!(blockers.get("Innlogging"), Some(&1));
        assert_eq!(blockers.get("Tekniske feil"), Some(&1));
        assert_eq!(blockers.get("Annet"), Some(&1));
        assert_eq!(blockers.get("Utbetaling"), None);
    }

    #[test]
    fn daily_series_and_overall_means() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::TopTasks)
                .at("2026-01-10T09:00:00+01:00")
                .task("plan", "Lage oppfølgingsplan")
                .outcome(TaskOutcome::Success)
                .duration_ms(45_000)
                .build(),
            SubmissionBuilder::new(SurveyType::TopTasks)
                .at("2026-01-10T12:00:00+01:00")
                .task("status", "Sjekke status")
                .outcome(TaskOutcome::Failure)
                .duration_ms(30_000)
                .build(),
            SubmissionBuilder::new(SurveyType::TopTasks)
                .at("2026-01-11T12:00:00+01:00")
                .task("status", "Sjekke status")
                .outcome(TaskOutcome::Success)
                .duration_ms(30_000)
                .build(),
        ];
        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &[],
            &AnalyticsConfig::default(),
        );

        let first = chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(result.daily_stats[&first], DailyStat { total: 2, success: 1 });
        assert_eq!(result.daily_stats.len(), 2);

        assert_eq!(result.tasks[0].task, "Sjekke status");
        assert_eq!(result.tasks[0].tpi_score, 50);
        assert_eq!(result.tasks[1].tpi_score, 100);
        assert_eq!(result.overall_tpi, 75);
        assert_eq!(result.avg_completion_time_ms, 37_500);
    }

    #[test]
    fn items_without_a_task_still_count_per_day() {
        let submissions = vec![
            plan(TaskOutcome::Success, None)
                .at("2026-01-10T09:00:00+01:00")
                .build(),
            SubmissionBuilder::new(SurveyType::TopTasks)
                .at("2026-01-10T10:00:00+01:00")
                .outcome(TaskOutcome::Failure)
                .build(),
        ];
        let result = top_tasks(
            &submissions,
            &FilterSpec::default(),
            &[],
            &AnalyticsConfig::default(),
        );

        let daily_total: usize = result.daily_stats.values().map(|day| day.total).sum();
        assert_eq!(result.total_submissions, 2);
        assert_eq!(daily_total, result.total_submissions);
        assert_eq!(result.tasks.len(), 1);
    }

    #[test]
    fn empty_input_has_zeroed_overall() {
        let result = top_tasks(&[], &FilterSpec::default(), &[], &AnalyticsConfig::default());
        assert_eq!(result.total_submissions, 0);
        assert_eq!(result.overall_tpi, 0);
        assert_eq!(result.avg_completion_time_ms, 0);
        assert!(result.tasks.is_empty());
    }
}
