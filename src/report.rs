use std::fmt::Write;

use crate::filter::FilterSpec;
use crate::models::{OverviewResult, TopTasksResult};

/// Markdown summary of the overview and top-tasks results.
pub fn build_report(spec: &FilterSpec, overview: &OverviewResult, top_tasks: &TopTasksResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Feedback Report");
    let _ = writeln!(
        output,
        "Period: {} ({} to {})",
        overview.period.label, overview.period.from_date, overview.period.to_date
    );

    let params = spec.to_params();
    if !params.is_empty() {
        let filters: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let _ = writeln!(output, "Filters: {}", filters.join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Responses");
    let _ = writeln!(
        output,
        "- {} submissions, {} with free text",
        overview.total_count, overview.text_count
    );

    if overview.rating_distribution.values().all(|count| *count == 0) {
        let _ = writeln!(output, "- No ratings in this period.");
    } else {
        let _ = writeln!(output, "- Average rating {:.1}", overview.average_rating);
        for (rating, count) in overview.rating_distribution.iter().rev() {
            let _ = writeln!(output, "  - {rating}: {count}");
        }
    }

    for (device, stat) in &overview.by_device {
        let _ = writeln!(
            output,
            "- {}: {} submissions (avg rating {:.1})",
            device, stat.count, stat.average_rating
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Tasks");

    if top_tasks.tasks.is_empty() {
        let _ = writeln!(output, "No top-tasks responses in this period.");
    } else {
        let _ = writeln!(
            output,
            "Overall TPI {} (avg completion {}s, target {}s)",
            top_tasks.overall_tpi,
            top_tasks.avg_completion_time_ms / 1000,
            top_tasks.target_time_ms / 1000
        );
        for task in top_tasks.tasks.iter().take(10) {
            let _ = writeln!(
                output,
                "- {}: TPI {} across {} responses, {} success",
                task.task, task.tpi_score, task.total_count, task.formatted_success_rate
            );
            if let Some((theme, count)) = task
                .blockers_by_theme
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            {
                let _ = writeln!(output, "  - most common blocker: {theme} ({count})");
            }
        }
    }

    output
}
