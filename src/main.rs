use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use survey_insights::models::{Submission, Theme};
use survey_insights::{
    blockers, discovery, loader, overview, priority, report, sample, top_tasks, AnalyticsConfig,
    FilterSpec,
};

#[derive(Parser)]
#[command(name = "survey-insights")]
#[command(about = "Aggregate survey feedback into dashboard statistics", long_about = None)]
struct Cli {
    /// JSON array of submissions
    #[arg(long, global = true)]
    submissions: Option<PathBuf>,
    /// Theme definitions (.json or .csv)
    #[arg(long, global = true)]
    themes: Option<PathBuf>,
    /// JSON file overriding aggregation limits
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(flatten)]
    filters: FilterArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, global = true)]
    app: Option<String>,
    #[arg(long, global = true)]
    survey_id: Option<String>,
    #[arg(long, global = true)]
    team: Option<String>,
    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long, global = true)]
    from: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long, global = true)]
    to: Option<String>,
    #[arg(long, global = true)]
    device: Option<String>,
    #[arg(long, global = true)]
    query: Option<String>,
    /// Comma-separated tags, any of which must be present
    #[arg(long, global = true)]
    tag: Option<String>,
    /// Comma-separated key:value metadata pairs, all of which must match
    #[arg(long, global = true)]
    segment: Option<String>,
    #[arg(long, global = true)]
    task: Option<String>,
    #[arg(long, global = true)]
    has_text: bool,
    #[arg(long, global = true)]
    low_rating: bool,
    /// Raw filter parameter as key=value, may be repeated
    #[arg(long = "param", global = true)]
    params: Vec<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> anyhow::Result<FilterSpec> {
        let mut params: BTreeMap<String, String> = BTreeMap::new();
        for raw in &self.params {
            let (key, value) = loader::parse_filter_param(raw)?;
            params.insert(key, value);
        }

        let named = [
            ("app", self.app.clone()),
            ("surveyId", self.survey_id.clone()),
            ("team", self.team.clone()),
            ("fromDate", self.from.clone()),
            ("toDate", self.to.clone()),
            ("deviceType", self.device.clone()),
            ("query", self.query.clone()),
            ("tag", self.tag.clone()),
            ("segment", self.segment.clone()),
            ("task", self.task.clone()),
            ("hasText", self.has_text.then(|| "true".to_string())),
            ("lowRating", self.low_rating.then(|| "true".to_string())),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        }

        Ok(FilterSpec::from_params(&params))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Totals, rating mix, devices and per-field statistics
    Overview,
    /// Success rate, completion time and TPI per task
    TopTasks,
    /// Words and themes of what visitors came to do
    Discovery,
    /// Words and themes of what stopped visitors
    Blockers,
    /// Task priority votes and the long neck
    Priority,
    /// Write a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write a demo dataset of submissions and themes
    Demo {
        #[arg(long, default_value = "demo.json")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("SURVEY_INSIGHTS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::from_path(path)?,
        None => AnalyticsConfig::default(),
    };
    let spec = cli.filters.to_spec()?;
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Demo { out } => {
            let dataset = sample::demo_dataset(today);
            let json = serde_json::to_string_pretty(&dataset)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!(
                "Wrote {} submissions and {} themes to {}.",
                dataset.submissions.len(),
                dataset.themes.len(),
                out.display()
            );
        }
        Commands::Overview => {
            let submissions = submissions(cli.submissions.as_deref())?;
            print_json(&overview::overview(&submissions, &spec, &config, today))?;
        }
        Commands::TopTasks => {
            let submissions = submissions(cli.submissions.as_deref())?;
            let themes = themes(cli.themes.as_deref())?;
            print_json(&top_tasks::top_tasks(&submissions, &spec, &themes, &config))?;
        }
        Commands::Discovery => {
            let submissions = submissions(cli.submissions.as_deref())?;
            let themes = themes(cli.themes.as_deref())?;
            print_json(&discovery::discovery(&submissions, &spec, &themes, &config))?;
        }
        Commands::Blockers => {
            let submissions = submissions(cli.submissions.as_deref())?;
            let themes = themes(cli.themes.as_deref())?;
            print_json(&blockers::blockers(&submissions, &spec, &themes, &config))?;
        }
        Commands::Priority => {
            let submissions = submissions(cli.submissions.as_deref())?;
            print_json(&priority::task_priority(&submissions, &spec, &config))?;
        }
        Commands::Report { out } => {
            let submissions = submissions(cli.submissions.as_deref())?;
            let themes = themes(cli.themes.as_deref())?;
            let overview = overview::overview(&submissions, &spec, &config, today);
            let tasks = top_tasks::top_tasks(&submissions, &spec, &themes, &config);
            let report = report::build_report(&spec, &overview, &tasks);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn submissions(path: Option<&Path>) -> anyhow::Result<Vec<Submission>> {
    let path = path.context("--submissions must point to a JSON file of submissions")?;
    let submissions = loader::load_submissions(path)?;
    info!(count = submissions.len(), path = %path.display(), "loaded submissions");
    Ok(submissions)
}

fn themes(path: Option<&Path>) -> anyhow::Result<Vec<Theme>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let themes = loader::load_themes(path)?;
    info!(count = themes.len(), path = %path.display(), "loaded themes");
    Ok(themes)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
