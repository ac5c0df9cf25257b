//! Study requests as entered by the user, and their validated wire payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaskKind;

/// Date format accepted for the exam date
pub const EXAM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation failures detected before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("exam date must be a YYYY-MM-DD date, got '{0}'")]
    InvalidExamDate(String),

    #[error("hours per day must be a positive whole number, got '{0}'")]
    InvalidHoursPerDay(String),
}

/// A study request, one variant per tool.
///
/// Fields hold the raw form input; [`StudyRequest::validate`] turns them into
/// the typed payload that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StudyRequest {
    Doubt {
        question: String,
    },
    Plan {
        subjects: String,
        syllabus: String,
        exam_date: String,
        hours_per_day: String,
    },
    Summary {
        url: String,
    },
    Notes {
        topic: String,
        #[serde(default)]
        content: String,
    },
}

impl StudyRequest {
    /// Create a doubt request
    pub fn doubt(question: impl Into<String>) -> Self {
        StudyRequest::Doubt {
            question: question.into(),
        }
    }

    /// Create an exam plan request
    pub fn plan(
        subjects: impl Into<String>,
        syllabus: impl Into<String>,
        exam_date: impl Into<String>,
        hours_per_day: impl Into<String>,
    ) -> Self {
        StudyRequest::Plan {
            subjects: subjects.into(),
            syllabus: syllabus.into(),
            exam_date: exam_date.into(),
            hours_per_day: hours_per_day.into(),
        }
    }

    /// Create a video summary request
    pub fn summary(url: impl Into<String>) -> Self {
        StudyRequest::Summary { url: url.into() }
    }

    /// Create a revision notes request; `content` may be empty
    pub fn notes(topic: impl Into<String>, content: impl Into<String>) -> Self {
        StudyRequest::Notes {
            topic: topic.into(),
            content: content.into(),
        }
    }

    /// The tool this request targets
    pub fn kind(&self) -> TaskKind {
        match self {
            StudyRequest::Doubt { .. } => TaskKind::Doubt,
            StudyRequest::Plan { .. } => TaskKind::Plan,
            StudyRequest::Summary { .. } => TaskKind::Summary,
            StudyRequest::Notes { .. } => TaskKind::Notes,
        }
    }

    /// Label used for exported documents (the notes topic, the plan subjects)
    pub fn topic(&self) -> &str {
        match self {
            StudyRequest::Notes { topic, .. } => topic,
            StudyRequest::Plan { subjects, .. } => subjects,
            StudyRequest::Doubt { question } => question,
            StudyRequest::Summary { url } => url,
        }
    }

    /// Check required fields and build the wire payload.
    pub fn validate(&self) -> Result<RequestPayload, ValidationError> {
        match self {
            StudyRequest::Doubt { question } => {
                require("question", question)?;
                Ok(RequestPayload::Doubt {
                    question: question.clone(),
                })
            }
            StudyRequest::Plan {
                subjects,
                syllabus,
                exam_date,
                hours_per_day,
            } => {
                require("subjects", subjects)?;
                require("syllabus", syllabus)?;
                require("exam_date", exam_date)?;
                require("hours_per_day", hours_per_day)?;

                let exam_date = NaiveDate::parse_from_str(exam_date.trim(), EXAM_DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidExamDate(exam_date.clone()))?;

                let hours_per_day = hours_per_day
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|h| *h > 0)
                    .ok_or_else(|| ValidationError::InvalidHoursPerDay(hours_per_day.clone()))?;

                Ok(RequestPayload::Plan {
                    subjects: subjects.clone(),
                    syllabus: syllabus.clone(),
                    exam_date,
                    hours_per_day,
                })
            }
            StudyRequest::Summary { url } => {
                require("url", url)?;
                Ok(RequestPayload::Summary {
                    url: url.trim().to_string(),
                })
            }
            StudyRequest::Notes { topic, content } => {
                require("topic", topic)?;
                Ok(RequestPayload::Notes {
                    topic: topic.clone(),
                    content: content.clone(),
                })
            }
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// JSON body posted to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Doubt {
        question: String,
    },
    Plan {
        subjects: String,
        syllabus: String,
        exam_date: NaiveDate,
        hours_per_day: u32,
    },
    Summary {
        url: String,
    },
    Notes {
        topic: String,
        content: String,
    },
}
