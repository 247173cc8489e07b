//! Narrowing submissions by the dashboard's filter parameters.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::answers;
use crate::models::Submission;

/// Parsed form of the flat filter parameters. `None`/empty means the dimension is unfiltered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub app: Option<String>,
    pub survey_id: Option<String>,
    pub team: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub device_type: Option<String>,
    pub query: Option<String>,
    pub tags: Vec<String>,
    pub segment: Vec<(String, String)>,
    pub task: Option<String>,
    pub has_text: bool,
    pub low_rating: bool,
}

impl FilterSpec {
    /// Builds the spec from query-style parameters. Unknown keys are ignored, empty
    /// values count as absent and unparseable dates impose no bound.
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            params
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        Self {
            app: get("app").map(str::to_string),
            survey_id: get("surveyId").map(str::to_string),
            team: get("team").map(str::to_string),
            from_date: get("fromDate").and_then(parse_date),
            to_date: get("toDate").and_then(parse_date),
            device_type: get("deviceType").map(str::to_lowercase),
            query: get("query").map(str::to_lowercase),
            tags: get("tag").map(split_list).unwrap_or_default(),
            segment: get("segment")
                .map(|raw| {
                    split_list(raw)
                        .into_iter()
                        .filter_map(|pair| {
                            let (key, value) = pair.split_once(':')?;
                            Some((key.trim().to_string(), value.trim().to_string()))
                        })
                        .collect()
                })
                .unwrap_or_default(),
            task: get("task").map(str::to_string),
            has_text: get("hasText") == Some("true"),
            low_rating: get("lowRating") == Some("true"),
        }
    }

    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        };

        put("app", self.app.clone());
        put("surveyId", self.survey_id.clone());
        put("team", self.team.clone());
        put("fromDate", self.from_date.map(|date| date.to_string()));
        put("toDate", self.to_date.map(|date| date.to_string()));
        put("deviceType", self.device_type.clone());
        put("query", self.query.clone());
        put(
            "tag",
            (!self.tags.is_empty()).then(|| self.tags.join(",")),
        );
        put(
            "segment",
            (!self.segment.is_empty()).then(|| {
                self.segment
                    .iter()
                    .map(|(key, value)| format!("{key}:{value}"))
                    .collect::<Vec<_>>()
                    .join(",")
            }),
        );
        put("task", self.task.clone());
        put("hasText", self.has_text.then(|| "true".to_string()));
        put("lowRating", self.low_rating.then(|| "true".to_string()));
        params
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        if let Some(app) = &self.app {
            if &submission.app != app {
                return false;
            }
        }

        if let Some(survey_id) = &self.survey_id {
            if &submission.survey_id != survey_id {
                return false;
            }
        }

        if let Some(team) = &self.team {
            if submission.team.as_ref() != Some(team) {
                return false;
            }
        }

        let date = submission.submitted_date();
        if self.from_date.is_some_and(|from| date < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| date > to) {
            return false;
        }

        if let Some(device_type) = &self.device_type {
            match submission.device_type() {
                Some(device) if device.as_str() == device_type => {}
                _ => return false,
            }
        }

        if let Some(query) = &self.query {
            let haystack = answers::text_values(submission)
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            if !haystack.contains(query.as_str()) {
                return false;
            }
        }

        if !self.tags.is_empty() && !self.tags.iter().any(|tag| submission.tags.contains(tag)) {
            return false;
        }

        if !self
            .segment
            .iter()
            .all(|(key, value)| submission.metadata.get(key) == Some(value))
        {
            return false;
        }

        if let Some(task) = &self.task {
            if answers::task_label(submission) != Some(task.as_str()) {
                return false;
            }
        }

        if self.has_text && !answers::has_text(submission) {
            return false;
        }

        if self.low_rating && !answers::first_rating(submission).is_some_and(|rating| rating <= 2)
        {
            return false;
        }

        true
    }
}

/// Keeps the submissions matching every present dimension, in their original order.
pub fn apply<'a>(submissions: &'a [Submission], spec: &FilterSpec) -> Vec<&'a Submission> {
    submissions
        .iter()
        .filter(|submission| spec.matches(submission))
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceType, SurveyType};
    use crate::sample::SubmissionBuilder;

    fn params(pairs: &[(&str, &str)]) -> FilterSpec {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        FilterSpec::from_params(&map)
    }

    fn ids(submissions: Vec<&Submission>) -> Vec<&str> {
        submissions.iter().map(|submission| submission.id.as_str()).collect()
    }

    #[test]
    fn empty_spec_keeps_everything_in_order() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Rating).id("b").build(),
            SubmissionBuilder::new(SurveyType::Rating).id("a").build(),
        ];
        let spec = FilterSpec::default();
        assert!(spec.is_empty());
        assert_eq!(ids(apply(&submissions, &spec)), vec!["b", "a"]);
    }

    #[test]
    fn date_bounds_are_inclusive_on_the_local_date() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Rating)
                .id("early")
                .at("2026-01-09T23:59:00+01:00")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("first")
                .at("2026-01-10T00:10:00+01:00")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("last")
                .at("2026-01-12T23:59:00+01:00")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("late")
                .at("2026-01-13T00:00:00+01:00")
                .build(),
        ];
        let spec = params(&[("fromDate", "2026-01-10"), ("toDate", "2026-01-12")]);
        assert_eq!(ids(apply(&submissions, &spec)), vec!["first", "last"]);
    }

    #[test]
    fn unparseable_dates_are_no_bound() {
        let spec = params(&[("fromDate", "last tuesday"), ("toDate", "")]);
        assert_eq!(spec.from_date, None);
        assert_eq!(spec.to_date, None);
    }

    #[test]
    fn query_is_case_insensitive_across_text_answers() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Rating)
                .id("hit")
                .text("comment", "Fant ikke")
                .text("other", "Søknaden min")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("miss")
                .text("comment", "Alt gikk fint")
                .build(),
        ];
        let spec = params(&[("query", "SØKNADEN")]);
        assert_eq!(ids(apply(&submissions, &spec)), vec!["hit"]);
    }

    #[test]
    fn tags_match_any_and_segments_match_all() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Rating)
                .id("both")
                .tag("beta")
                .meta("rolle", "arbeidsgiver")
                .meta("sprak", "nb")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("partial-segment")
                .tag("pilot")
                .meta("rolle", "arbeidsgiver")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("no-tag")
                .meta("rolle", "arbeidsgiver")
                .meta("sprak", "nb")
                .build(),
        ];

        let tags = params(&[("tag", "pilot, beta")]);
        assert_eq!(ids(apply(&submissions, &tags)), vec!["both", "partial-segment"]);

        let segment = params(&[("segment", "rolle:arbeidsgiver,sprak:nb")]);
        assert_eq!(ids(apply(&submissions, &segment)), vec!["both", "no-tag"]);

        let combined = params(&[("tag", "beta,pilot"), ("segment", "sprak:nb")]);
        assert_eq!(ids(apply(&submissions, &combined)), vec!["both"]);
    }

    #[test]
    fn device_team_and_task_filters() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::TopTasks)
                .id("mobile-plan")
                .device(DeviceType::Mobile)
                .task("plan", "Lage oppfølgingsplan")
                .build(),
            SubmissionBuilder::new(SurveyType::TopTasks)
                .id("desktop-plan")
                .device(DeviceType::Desktop)
                .team(None)
                .task("plan", "Lage oppfølgingsplan")
                .build(),
            SubmissionBuilder::new(SurveyType::TopTasks)
                .id("no-context")
                .task("status", "Sjekke status")
                .build(),
        ];

        let device = params(&[("deviceType", "Mobile")]);
        assert_eq!(ids(apply(&submissions, &device)), vec!["mobile-plan"]);

        let team = params(&[("team", "team-esyfo")]);
        assert_eq!(ids(apply(&submissions, &team)), vec!["mobile-plan", "no-context"]);

        let task = params(&[("task", "Lage oppfølgingsplan")]);
        assert_eq!(ids(apply(&submissions, &task)), vec!["mobile-plan", "desktop-plan"]);
    }

    #[test]
    fn has_text_and_low_rating() {
        let submissions = vec![
            SubmissionBuilder::new(SurveyType::Rating)
                .id("low-with-text")
                .rating("rating", 2)
                .text("comment", "Treg side")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("high-blank")
                .rating("rating", 5)
                .text("comment", "  ")
                .build(),
            SubmissionBuilder::new(SurveyType::Rating)
                .id("unrated")
                .text("comment", "Hei")
                .build(),
        ];

        let has_text = params(&[("hasText", "true")]);
        assert_eq!(ids(apply(&submissions, &has_text)), vec!["low-with-text", "unrated"]);

        let low_rating = params(&[("lowRating", "true")]);
        assert_eq!(ids(apply(&submissions, &low_rating)), vec!["low-with-text"]);

        let off = params(&[("lowRating", "false")]);
        assert_eq!(apply(&submissions, &off).len(), 3);
    }

    #[test]
    fn params_round_trip_through_the_spec() {
        let spec = params(&[
            ("app", "syfo"),
            ("fromDate", "2026-01-01"),
            ("tag", "a,b"),
            ("segment", "rolle:leder"),
            ("hasText", "true"),
            ("ignored", "value"),
        ]);
        let rendered = spec.to_params();
        assert_eq!(rendered.get("tag").map(String::as_str), Some("a,b"));
        assert!(!rendered.contains_key("ignored"));
        assert_eq!(FilterSpec::from_params(&rendered), spec);
    }
}
