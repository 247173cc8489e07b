use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::answers;
use crate::config::AnalyticsConfig;
use crate::filter::{self, FilterSpec};
use crate::models::{Answer, DeviceStat, FieldStat, OverviewResult, Period, Submission};
use crate::scoring;

/// General statistics over every submission that passes `spec`.
///
/// `today` anchors the reporting period when the spec has no date bounds.
pub fn overview(
    submissions: &[Submission],
    spec: &FilterSpec,
    config: &AnalyticsConfig,
    today: NaiveDate,
) -> OverviewResult {
    let items = filter::apply(submissions, spec);

    let mut text_count = 0usize;
    let mut daily_counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut rating_distribution: BTreeMap<u8, usize> = (1..=5).map(|value| (value, 0)).collect();
    let mut ratings: Vec<f64> = Vec::new();
    let mut devices: BTreeMap<String, (usize, Vec<f64>)> = BTreeMap::new();

    for submission in &items {
        if answers::has_text(submission) {
            text_count += 1;
        }
        *daily_counts.entry(submission.submitted_date()).or_insert(0) += 1;

        let rating = answers::first_rating(submission).filter(|rating| (1..=5).contains(rating));
        if let Some(rating) = rating {
            *rating_distribution.entry(rating).or_insert(0) += 1;
            ratings.push(rating as f64);
        }

        if let Some(device) = submission.device_type() {
            let entry = devices.entry(device.as_str().to_string()).or_default();
            entry.0 += 1;
            if let Some(rating) = rating {
                entry.1.push(rating as f64);
            }
        }
    }

    let by_device = devices
        .into_iter()
        .map(|(device, (count, ratings))| {
            let average_rating = scoring::mean(ratings).unwrap_or(0.0);
            (
                device,
                DeviceStat {
                    count,
                    average_rating,
                },
            )
        })
        .collect();

    debug!(submissions = items.len(), text_count, "aggregated overview");

    OverviewResult {
        total_count: items.len(),
        text_count,
        average_rating: scoring::mean(ratings).unwrap_or(0.0),
        daily_counts,
        rating_distribution,
        by_device,
        period: period(spec, config, today),
        field_stats: field_stats(&items),
    }
}

/// Reporting period from the spec's date bounds, falling back to the last
/// `default_period_days` days ending `today`.
pub fn period(spec: &FilterSpec, config: &AnalyticsConfig, today: NaiveDate) -> Period {
    let span = Duration::days(config.default_period_days.max(1) - 1);
    let (from_date, to_date) = match (spec.from_date, spec.to_date) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => (from, today.max(from)),
        (None, Some(to)) => (to - span, to),
        (None, None) => (today - span, today),
    };

    let label = if spec.from_date.is_none() && spec.to_date.is_none() {
        format!("last {} days", config.default_period_days.max(1))
    } else {
        format!("{from_date} to {to_date}")
    };

    Period {
        from_date,
        to_date,
        days: (to_date - from_date).num_days().max(0) + 1,
        label,
    }
}

enum FieldTally {
    Rating {
        label: String,
        distribution: BTreeMap<u8, usize>,
        values: Vec<f64>,
    },
    Text {
        label: String,
        count: usize,
    },
    Choice {
        label: String,
        count: usize,
        options: BTreeMap<String, usize>,
    },
}

/// Per-field statistics keyed by field id. Fields nobody answered are left out.
pub fn field_stats(items: &[&Submission]) -> BTreeMap<String, FieldStat> {
    let mut tallies: BTreeMap<&str, FieldTally> = BTreeMap::new();

    for submission in items {
        for answer in &submission.answers {
            let label = || answer.question().label.clone();
            match answer {
                Answer::Rating {
                    field_id, rating, ..
                } if (1..=5).contains(rating) => {
                    let tally = tallies.entry(field_id).or_insert_with(|| FieldTally::Rating {
                        label: label(),
                        distribution: (1..=5).map(|value| (value, 0)).collect(),
                        values: Vec::new(),
                    });
                    if let FieldTally::Rating {
                        distribution,
                        values,
                        ..
                    } = tally
                    {
                        *distribution.entry(*rating).or_insert(0) += 1;
                        values.push(*rating as f64);
                    }
                }
                Answer::Text { field_id, text, .. } if !text.trim().is_empty() => {
                    let tally = tallies.entry(field_id).or_insert_with(|| FieldTally::Text {
                        label: label(),
                        count: 0,
                    });
                    if let FieldTally::Text { count, .. } = tally {
                        *count += 1;
                    }
                }
                Answer::SingleChoice {
                    field_id,
                    question,
                    selected,
                } => {
                    let chosen = [question.option_label(selected).to_string()];
                    tally_choice(&mut tallies, field_id, label(), &chosen);
                }
                Answer::MultiChoice {
                    field_id,
                    question,
                    selected,
                } if !selected.is_empty() => {
                    let chosen: Vec<String> = selected
                        .iter()
                        .map(|id| question.option_label(id).to_string())
                        .collect();
                    tally_choice(&mut tallies, field_id, label(), &chosen);
                }
                _ => {}
            }
        }
    }

    tallies
        .into_iter()
        .map(|(field_id, tally)| {
            let stat = match tally {
                FieldTally::Rating {
                    label,
                    distribution,
                    values,
                } => FieldStat::Rating {
                    label,
                    count: values.len(),
                    distribution,
                    average: scoring::mean(values).unwrap_or(0.0),
                },
                FieldTally::Text { label, count } => FieldStat::Text { label, count },
                FieldTally::Choice {
                    label,
                    count,
                    options,
                } => FieldStat::Choice {
                    label,
                    count,
                    options,
                },
            };
            (field_id.to_string(), stat)
        })
        .collect()
}

fn tally_choice<'a>(
    tallies: &mut BTreeMap<&'a str, FieldTally>,
    field_id: &'a str,
    label: String,
    chosen: &[String],
) {
    let tally = tallies.entry(field_id).or_insert_with(|| FieldTally::Choice {
        label,
        count: 0,
        options: BTreeMap::new(),
    });
    if let FieldTally::Choice { count, options, .. } = tally {
        *count += 1;
        for option in chosen {
            *options.entry(option.clone()).or_insert(0) += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceType, SurveyType};
    use crate::sample::SubmissionBuilder;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
    }

    #[test]
    fn counts_ratings_text_and_devices() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Rating)
                .at("2026-01-10T10:00:00+01:00")
                .device(DeviceType::Mobile)
                .rating("rating", 2)
                .text("comment", "Treg side")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .at("2026-01-10T12:00:00+01:00")
                .device(DeviceType::Mobile)
                .rating("rating", 4)
                .text("comment", "")
                .build(),
            SubmissionBuilder::new(SurveyType::Custom)
                .at("2026-01-11T12:00:00+01:00")
                .device(DeviceType::Desktop)
                .build(),
        ];
        let result = overview(
            &submissions,
            &FilterSpec::default(),
            &AnalyticsConfig::default(),
            today(),
        );

        assert_eq!(result.total_count, 3);
        assert_eq!(result.text_count, 1);
        assert_eq!(result.average_rating, 3.0);
        assert_eq!(result.rating_distribution[&2], 1);
        assert_eq!(result.rating_distribution[&5], 0);
        assert_eq!(result.daily_counts.len(), 2);
        assert_eq!(result.by_device["mobile"].count, 2);
        assert_eq!(result.by_device["mobile"].average_rating, 3.0);
        assert_eq!(result.by_device["desktop"].average_rating, 0.0);
    }

    #[test]
    fn field_stats_skip_unanswered_fields() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Custom)
                .rating("ease", 5)
                .text("comment", "   ")
                .text("improve", "Bedre søk")
                .votes(&[("a", "Alfa"), ("b", "Beta")], &["a", "b"])
                .build(),
            SubmissionBuilder::new(SurveyType::Custom)
                .rating("ease", 3)
                .votes(&[("a", "Alfa"), ("b", "Beta")], &["a"])
                .build(),
        ];
        let items: Vec<&Submission> = submissions.iter().collect();
        let stats = field_stats(&items);

        assert!(!stats.contains_key("comment"));
        match &stats["ease"] {
            FieldStat::Rating {
                count,
                distribution,
                average,
                ..
            } => {
                assert_eq!(*count, 2);
                assert_eq!(distribution[&5], 1);
                assert_eq!(distribution[&1], 0);
                assert_eq!(*average, 4.0);
            }
            other => panic!("unexpected stat {other:?}"),
        }
        assert!(matches!(stats["improve"], FieldStat::Text { count: 1, .. }));
        match &stats["priority"] {
            FieldStat::Choice { count, options, .. } => {
                assert_eq!(*count, 2);
                assert_eq!(options["Alfa"], 2);
                assert_eq!(options["Beta"], 1);
            }
            other => panic!("unexpected stat {other:?}"),
        }
    }

    #[test]
    fn period_defaults_to_last_thirty_days() {
        let period = period(&FilterSpec::default(), &AnalyticsConfig::default(), today());
        assert_eq!(period.to_date, today());
        assert_eq!(period.from_date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(period.days, 30);
        assert_eq!(period.label, "last 30 days");
    }

    #[test]
    fn period_follows_explicit_bounds() {
        let spec = FilterSpec {
            from_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            to_date: NaiveDate::from_ymd_opt(2026, 1, 7),
            ..FilterSpec::default()
        };
        let period = period(&spec, &AnalyticsConfig::default(), today());
        assert_eq!(period.days, 7);
        assert_eq!(period.label, "2026-01-01 to 2026-01-07");
    }

    #[test]
    fn empty_collection_has_zeroed_statistics() {
        let result = overview(&[], &FilterSpec::default(), &AnalyticsConfig::default(), today());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.average_rating, 0.0);
        assert!(result.field_stats.is_empty());
        assert_eq!(result.rating_distribution.values().sum::<usize>(), 0);
    }
}
