use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// One completed feedback response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub submitted_at: DateTime<FixedOffset>,
    pub app: String,
    pub survey_id: String,
    pub survey_type: SurveyType,
    /// Owning team, used for tenant scoping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SubmissionContext>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub sensitive_data_redacted: bool,
    /// Answers that do not parse are dropped so the rest of the submission survives.
    #[serde(default, deserialize_with = "lenient_answers")]
    pub answers: Vec<Answer>,
}

fn lenient_answers<'de, D>(deserializer: D) -> Result<Vec<Answer>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Answer>(value) {
            Ok(answer) => Some(answer),
            Err(error) => {
                warn!(%error, "skipping malformed answer");
                None
            }
        })
        .collect())
}

impl Submission {
    pub fn submitted_date(&self) -> NaiveDate {
        self.submitted_at.date_naive()
    }

    pub fn device_type(&self) -> Option<DeviceType> {
        self.context.as_ref().and_then(|context| context.device_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurveyType {
    Rating,
    TopTasks,
    Discovery,
    TaskPriority,
    Custom,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Question {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl Question {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(id, label)| ChoiceOption {
                id: id.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    /// Label for an option id, falling back to the raw id.
    pub fn option_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.options
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.label.as_str())
            .unwrap_or(id)
    }
}

/// A single answer. Each variant carries only the value shape valid for its field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireAnswer", into = "WireAnswer")]
pub enum Answer {
    Rating {
        field_id: String,
        question: Question,
        rating: u8,
    },
    Text {
        field_id: String,
        question: Question,
        text: String,
    },
    SingleChoice {
        field_id: String,
        question: Question,
        selected: String,
    },
    MultiChoice {
        field_id: String,
        question: Question,
        selected: Vec<String>,
    },
    Date {
        field_id: String,
        question: Question,
        date: String,
    },
}

impl Answer {
    pub fn field_id(&self) -> &str {
        match self {
            Answer::Rating { field_id, .. }
            | Answer::Text { field_id, .. }
            | Answer::SingleChoice { field_id, .. }
            | Answer::MultiChoice { field_id, .. }
            | Answer::Date { field_id, .. } => field_id,
        }
    }

    pub fn question(&self) -> &Question {
        match self {
            Answer::Rating { question, .. }
            | Answer::Text { question, .. }
            | Answer::SingleChoice { question, .. }
            | Answer::MultiChoice { question, .. }
            | Answer::Date { question, .. } => question,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Answer::Rating { .. } => FieldType::Rating,
            Answer::Text { .. } => FieldType::Text,
            Answer::SingleChoice { .. } => FieldType::SingleChoice,
            Answer::MultiChoice { .. } => FieldType::MultiChoice,
            Answer::Date { .. } => FieldType::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Rating,
    Text,
    SingleChoice,
    MultiChoice,
    Date,
}

/// Wire shape of an answer: `fieldType` plus a `value` tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnswer {
    field_id: String,
    field_type: FieldType,
    #[serde(default)]
    question: Question,
    value: WireValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum WireValue {
    Rating {
        rating: u8,
    },
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    SingleChoice {
        selected_option_id: String,
    },
    #[serde(rename_all = "camelCase")]
    MultiChoice {
        selected_option_ids: Vec<String>,
    },
    Date {
        date: String,
    },
}

impl TryFrom<WireAnswer> for Answer {
    type Error = String;

    fn try_from(wire: WireAnswer) -> Result<Self, Self::Error> {
        let WireAnswer {
            field_id,
            field_type,
            question,
            value,
        } = wire;

        match (field_type, value) {
            (FieldType::Rating, WireValue::Rating { rating }) => Ok(Answer::Rating {
                field_id,
                question,
                rating,
            }),
            (FieldType::Text, WireValue::Text { text }) => Ok(Answer::Text {
                field_id,
                question,
                text,
            }),
            (FieldType::SingleChoice, WireValue::SingleChoice { selected_option_id }) => {
                Ok(Answer::SingleChoice {
                    field_id,
                    question,
                    selected: selected_option_id,
                })
            }
            (FieldType::MultiChoice, WireValue::MultiChoice { selected_option_ids }) => {
                Ok(Answer::MultiChoice {
                    field_id,
                    question,
                    selected: selected_option_ids,
                })
            }
            (FieldType::Date, WireValue::Date { date }) => Ok(Answer::Date {
                field_id,
                question,
                date,
            }),
            (field_type, value) => Err(format!(
                "answer {field_id} has fieldType {field_type:?} but value {value:?}"
            )),
        }
    }
}

impl From<Answer> for WireAnswer {
    fn from(answer: Answer) -> Self {
        let field_type = answer.field_type();
        let (field_id, question, value) = match answer {
            Answer::Rating {
                field_id,
                question,
                rating,
            } => (field_id, question, WireValue::Rating { rating }),
            Answer::Text {
                field_id,
                question,
                text,
            } => (field_id, question, WireValue::Text { text }),
            Answer::SingleChoice {
                field_id,
                question,
                selected,
            } => (
                field_id,
                question,
                WireValue::SingleChoice {
                    selected_option_id: selected,
                },
            ),
            Answer::MultiChoice {
                field_id,
                question,
                selected,
            } => (
                field_id,
                question,
                WireValue::MultiChoice {
                    selected_option_ids: selected,
                },
            ),
            Answer::Date {
                field_id,
                question,
                date,
            } => (field_id, question, WireValue::Date { date }),
        };

        WireAnswer {
            field_id,
            field_type,
            question,
            value,
        }
    }
}

/// Ternary task-success signal ("Fikk du gjort det du kom for?").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskOutcome {
    #[serde(rename = "Ja")]
    Success,
    #[serde(rename = "Delvis")]
    Partial,
    #[serde(rename = "Nei")]
    Failure,
}

impl TaskOutcome {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ja" | "yes" | "success" => Some(TaskOutcome::Success),
            "delvis" | "partial" => Some(TaskOutcome::Partial),
            "nei" | "no" | "failure" => Some(TaskOutcome::Failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisContext {
    #[default]
    GeneralFeedback,
    Blocker,
    #[serde(other)]
    Other,
}

/// A named keyword cluster. Defined outside the engine and never mutated by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    #[serde(default)]
    pub team: String,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub analysis_context: AnalysisContext,
}

/// Free text handed to the word-frequency and theme analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct TextResponse {
    pub text: String,
    pub submitted_at: DateTime<FixedOffset>,
    pub success: Option<TaskOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    pub text: String,
    pub submitted_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCount {
    pub word: String,
    pub count: usize,
    pub source_responses: Vec<SourceResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeStat {
    pub theme_id: String,
    pub name: String,
    pub color: String,
    pub count: usize,
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DailyStat {
    pub total: usize,
    pub success: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStat {
    pub task: String,
    pub total_count: usize,
    pub success_count: usize,
    pub partial_count: usize,
    pub failure_count: usize,
    pub success_rate: f64,
    pub formatted_success_rate: String,
    pub avg_time_ms: u64,
    pub target_time_ms: u64,
    pub tpi_score: u32,
    pub blockers_by_theme: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTasksResult {
    pub total_submissions: usize,
    pub tasks: Vec<TaskStat>,
    pub daily_stats: BTreeMap<NaiveDate, DailyStat>,
    pub overall_tpi: u32,
    pub avg_completion_time_ms: u64,
    pub target_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    pub task: String,
    pub success: Option<TaskOutcome>,
    pub submitted_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub total_submissions: usize,
    pub word_frequency: Vec<WordCount>,
    pub themes: Vec<ThemeStat>,
    pub recent_responses: Vec<DiscoveryResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockerResponse {
    pub blocker: String,
    pub task: Option<String>,
    pub submitted_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockerResult {
    pub total_blockers: usize,
    pub word_frequency: Vec<WordCount>,
    pub themes: Vec<ThemeStat>,
    pub recent_blockers: Vec<BlockerResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskVote {
    pub task_id: String,
    pub label: String,
    pub votes: usize,
    pub percentage: u32,
    pub cumulative_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPriorityResult {
    pub total_submissions: usize,
    pub total_votes: usize,
    pub tasks: Vec<TaskVote>,
    pub long_neck_cutoff: usize,
    pub top_five_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub days: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStat {
    pub count: usize,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldStat {
    #[serde(rename_all = "camelCase")]
    Rating {
        label: String,
        count: usize,
        distribution: BTreeMap<u8, usize>,
        average: f64,
    },
    Text {
        label: String,
        count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Choice {
        label: String,
        count: usize,
        options: BTreeMap<String, usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResult {
    pub total_count: usize,
    pub text_count: usize,
    pub average_rating: f64,
    pub daily_counts: BTreeMap<NaiveDate, usize>,
    pub rating_distribution: BTreeMap<u8, usize>,
    pub by_device: BTreeMap<String, DeviceStat>,
    pub period: Period,
    pub field_stats: BTreeMap<String, FieldStat>,
}
