//! Demo dataset and a builder for hand-made submissions.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    AnalysisContext, Answer, DeviceType, Question, Submission, SubmissionContext, SurveyType,
    TaskOutcome, Theme,
};

#[derive(Debug, Clone, Serialize)]
pub struct DemoDataset {
    pub submissions: Vec<Submission>,
    pub themes: Vec<Theme>,
}

pub struct SubmissionBuilder {
    submission: Submission,
}

impl SubmissionBuilder {
    pub fn new(survey_type: SurveyType) -> Self {
        let submitted_at =
            DateTime::parse_from_rfc3339("2026-01-15T10:00:00+01:00").unwrap_or_default();
        Self {
            submission: Submission {
                id: Uuid::new_v4().to_string(),
                submitted_at,
                app: "syfo-oppfolgingsplan".to_string(),
                survey_id: survey_id(survey_type).to_string(),
                survey_type,
                team: Some("team-esyfo".to_string()),
                context: None,
                tags: Default::default(),
                metadata: Default::default(),
                duration_ms: None,
                sensitive_data_redacted: false,
                answers: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.submission.id = id.to_string();
        self
    }

    /// Sets the submission time. Accepts RFC 3339; invalid input leaves the time unchanged.
    pub fn at(mut self, timestamp: &str) -> Self {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
            self.submission.submitted_at = parsed;
        }
        self
    }

    pub fn submitted_at(mut self, submitted_at: DateTime<FixedOffset>) -> Self {
        self.submission.submitted_at = submitted_at;
        self
    }

    pub fn app(mut self, app: &str) -> Self {
        self.submission.app = app.to_string();
        self
    }

    pub fn survey_id(mut self, survey_id: &str) -> Self {
        self.submission.survey_id = survey_id.to_string();
        self
    }

    pub fn team(mut self, team: Option<&str>) -> Self {
        self.submission.team = team.map(str::to_string);
        self
    }

    pub fn device(mut self, device_type: DeviceType) -> Self {
        let context = self.submission.context.get_or_insert_with(SubmissionContext::default);
        context.device_type = Some(device_type);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.submission.tags.insert(tag.to_string());
        self
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.submission
            .metadata
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.submission.duration_ms = Some(duration_ms);
        self
    }

    pub fn task(mut self, option_id: &str, label: &str) -> Self {
        self.submission.answers.push(Answer::SingleChoice {
            field_id: "task".to_string(),
            question: Question::new("Hva kom du for å gjøre?").with_options(&[(option_id, label)]),
            selected: option_id.to_string(),
        });
        self
    }

    pub fn outcome(mut self, outcome: TaskOutcome) -> Self {
        let selected = match outcome {
            TaskOutcome::Success => "ja",
            TaskOutcome::Partial => "delvis",
            TaskOutcome::Failure => "nei",
        };
        self.submission.answers.push(Answer::SingleChoice {
            field_id: "taskSuccess".to_string(),
            question: Question::new("Fikk du gjort det du kom for?").with_options(&[
                ("ja", "Ja"),
                ("delvis", "Delvis"),
                ("nei", "Nei"),
            ]),
            selected: selected.to_string(),
        });
        self
    }

    pub fn text(mut self, field_id: &str, text: &str) -> Self {
        self.submission.answers.push(Answer::Text {
            field_id: field_id.to_string(),
            question: Question::new(field_id),
            text: text.to_string(),
        });
        self
    }

    pub fn rating(mut self, field_id: &str, rating: u8) -> Self {
        self.submission.answers.push(Answer::Rating {
            field_id: field_id.to_string(),
            question: Question::new("Hvordan var opplevelsen?"),
            rating,
        });
        self
    }

    pub fn votes(mut self, options: &[(&str, &str)], selected: &[&str]) -> Self {
        self.submission.answers.push(Answer::MultiChoice {
            field_id: "priority".to_string(),
            question: Question::new("Hva er viktigst for deg?").with_options(options),
            selected: selected.iter().map(|id| id.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> Submission {
        self.submission
    }
}

fn oslo() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap_or_else(|| Utc.fix())
}

fn survey_id(survey_type: SurveyType) -> &'static str {
    match survey_type {
        SurveyType::Rating => "survey-rating",
        SurveyType::TopTasks => "survey-top-tasks",
        SurveyType::Discovery => "survey-discovery",
        SurveyType::TaskPriority => "survey-task-priority",
        SurveyType::Custom | SurveyType::Unknown => "survey-custom",
    }
}

const TASKS: &[(&str, &str)] = &[
    ("plan", "Lage oppfølgingsplan"),
    ("status", "Sjekke status på søknad"),
    ("melding", "Sende melding til NAV"),
    ("sykmelding", "Finne sykmelding"),
];

const DISCOVERY_TEXTS: &[&str] = &[
    "Sjekke status på søknaden min",
    "Finne ut når utbetalingen kommer",
    "Sende melding til veilederen",
    "Lese vedtaket mitt",
    "Endre kontonummer for utbetaling",
];

const BLOCKER_TEXTS: &[&str] = &[
    "Fikk ikke logget inn med BankID",
    "Siden lastet ikke, bare feilmelding",
    "Fant ikke skjemaet jeg trengte",
    "Teksten var vanskelig å forstå",
];

const COMMENTS: &[&str] = &[
    "Veldig enkelt å bruke",
    "Tok lang tid å finne riktig side",
    "Fint med oversikt over meldinger",
    "",
];

/// A small dataset spanning every survey type over the two weeks before `today`.
pub fn demo_dataset(today: NaiveDate) -> DemoDataset {
    let devices = [DeviceType::Mobile, DeviceType::Desktop, DeviceType::Tablet];
    let outcomes = [
        TaskOutcome::Success,
        TaskOutcome::Success,
        TaskOutcome::Partial,
        TaskOutcome::Failure,
    ];
    let mut submissions = Vec::new();

    for day in 0..14i64 {
        let date = today - Duration::days(day);
        let at = |hour: u32| {
            let naive = date.and_hms_opt(hour, 15, 0).unwrap_or_default();
            oslo()
                .from_local_datetime(&naive)
                .single()
                .unwrap_or_else(|| oslo().from_utc_datetime(&naive))
        };
        let index = day as usize;

        submissions.push(
            SubmissionBuilder::new(SurveyType::Rating)
                .submitted_at(at(9))
                .device(devices[index % devices.len()])
                .rating("rating", (index % 5) as u8 + 1)
                .text("comment", COMMENTS[index % COMMENTS.len()])
                .meta("rolle", if index % 2 == 0 { "arbeidsgiver" } else { "sykmeldt" })
                .build(),
        );

        let (task_id, task_label) = TASKS[index % TASKS.len()];
        let outcome = outcomes[index % outcomes.len()];
        let mut top_task = SubmissionBuilder::new(SurveyType::TopTasks)
            .submitted_at(at(11))
            .device(devices[(index + 1) % devices.len()])
            .task(task_id, task_label)
            .outcome(outcome)
            .duration_ms(30_000 + (index as u64 % 5) * 10_000);
        if outcome != TaskOutcome::Success {
            top_task = top_task.text("blocker", BLOCKER_TEXTS[index % BLOCKER_TEXTS.len()]);
        }
        submissions.push(top_task.build());

        submissions.push(
            SubmissionBuilder::new(SurveyType::Discovery)
                .submitted_at(at(13))
                .text("task", DISCOVERY_TEXTS[index % DISCOVERY_TEXTS.len()])
                .outcome(outcomes[(index + 1) % outcomes.len()])
                .build(),
        );

        let selected: Vec<&str> = TASKS
            .iter()
            .cycle()
            .skip(index % TASKS.len())
            .take(3)
            .map(|(id, _)| *id)
            .collect();
        submissions.push(
            SubmissionBuilder::new(SurveyType::TaskPriority)
                .submitted_at(at(15))
                .votes(TASKS, &selected)
                .build(),
        );
    }

    DemoDataset {
        submissions,
        themes: demo_themes(),
    }
}

pub fn demo_themes() -> Vec<Theme> {
    let theme = |id: &str, name: &str, keywords: &[&str], color: &str, context| Theme {
        id: id.to_string(),
        team: "team-esyfo".to_string(),
        name: name.to_string(),
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        color: color.to_string(),
        priority: 0,
        analysis_context: context,
    };

    vec![
        theme(
            "utbetaling",
            "Utbetaling",
            &["utbetaling", "penger", "kontonummer"],
            "#3386E0",
            AnalysisContext::GeneralFeedback,
        ),
        theme(
            "status",
            "Søknadsstatus",
            &["søknad", "status", "vedtak"],
            "#06893A",
            AnalysisContext::GeneralFeedback,
        ),
        theme(
            "kontakt",
            "Kontakt",
            &["melding", "veileder", "kontakt"],
            "#C77300",
            AnalysisContext::GeneralFeedback,
        ),
        theme(
            "innlogging",
            "Innlogging",
            &["logget", "bankid", "innlogging"],
            "#C30000",
            AnalysisContext::Blocker,
        ),
        theme(
            "teknisk",
            "Tekniske feil",
            &["feilmelding", "lastet", "feil"],
            "#8269A2",
            AnalysisContext::Blocker,
        ),
    ]
}
