//! Typed lookups of well-known answer fields.
//!
//! Every lookup returns `None` when the field is missing or carries an
//! unexpected variant, so aggregators can skip the item instead of failing.

use crate::models::{Answer, Question, Submission, TaskOutcome};

pub const TASK_FIELDS: &[&str] = &["task", "category"];
pub const SUCCESS_FIELDS: &[&str] = &["taskSuccess", "success"];
pub const BLOCKER_FIELDS: &[&str] = &["blocker", "hindring"];
pub const DISCOVERY_TEXT_FIELDS: &[&str] = &["task", "purpose"];

pub fn find<'a>(submission: &'a Submission, field_ids: &[&str]) -> Option<&'a Answer> {
    submission
        .answers
        .iter()
        .find(|answer| field_ids.contains(&answer.field_id()))
}

/// Resolved label of the selected task option, falling back to the raw option id.
pub fn task_label(submission: &Submission) -> Option<&str> {
    match find(submission, TASK_FIELDS)? {
        Answer::SingleChoice {
            question, selected, ..
        } => Some(question.option_label(selected)),
        _ => None,
    }
}

pub fn task_outcome(submission: &Submission) -> Option<TaskOutcome> {
    match find(submission, SUCCESS_FIELDS)? {
        Answer::SingleChoice {
            question, selected, ..
        } => TaskOutcome::parse(question.option_label(selected))
            .or_else(|| TaskOutcome::parse(selected)),
        Answer::Text { text, .. } => TaskOutcome::parse(text),
        _ => None,
    }
}

pub fn blocker_text(submission: &Submission) -> Option<&str> {
    non_empty_text(find(submission, BLOCKER_FIELDS)?)
}

/// Free-text "what did you come to do" answer of a discovery survey.
pub fn discovery_text(submission: &Submission) -> Option<&str> {
    submission
        .answers
        .iter()
        .filter(|answer| DISCOVERY_TEXT_FIELDS.contains(&answer.field_id()))
        .find_map(non_empty_text)
}

pub fn first_rating(submission: &Submission) -> Option<u8> {
    submission.answers.iter().find_map(|answer| match answer {
        Answer::Rating { rating, .. } => Some(*rating),
        _ => None,
    })
}

pub fn text_values(submission: &Submission) -> impl Iterator<Item = &str> {
    submission.answers.iter().filter_map(|answer| match answer {
        Answer::Text { text, .. } => Some(text.as_str()),
        _ => None,
    })
}

pub fn has_text(submission: &Submission) -> bool {
    text_values(submission).any(|text| !text.trim().is_empty())
}

/// The first multi-choice answer: the question (for option labels) and the selected ids.
pub fn votes(submission: &Submission) -> Option<(&Question, &[String])> {
    submission.answers.iter().find_map(|answer| match answer {
        Answer::MultiChoice {
            question, selected, ..
        } => Some((question, selected.as_slice())),
        _ => None,
    })
}

fn non_empty_text(answer: &Answer) -> Option<&str> {
    match answer {
        Answer::Text { text, .. } => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        _ => None,
    }
}
