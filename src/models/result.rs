//! Structured results returned by the study service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TaskKind;

/// A doubt explanation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub step_by_step: String,
    pub example: String,
    pub key_takeaway: String,
}

/// One day of a study plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub day: u32,
    pub task: String,
}

impl PlanEntry {
    pub fn new(day: u32, task: impl Into<String>) -> Self {
        Self {
            day,
            task: task.into(),
        }
    }

    /// The entry as displayed and exported: `Day N → task`
    pub fn line(&self) -> String {
        format!("Day {} → {}", self.day, self.task)
    }
}

/// A video summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub summary: String,
    pub key_points: Vec<String>,
    pub takeaways: Vec<String>,
}

/// Revision notes for a topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionNotes {
    pub summary: String,
    pub key_points: Vec<String>,
    pub formulas: Vec<String>,
}

/// Result of one successful dispatch, mirroring the request variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "lowercase")]
pub enum StudyResult {
    Explanation(Explanation),
    Plan(Vec<PlanEntry>),
    Summary(VideoSummary),
    Notes(RevisionNotes),
}

/// A response that parsed as JSON but carries no usable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    /// Message supplied by the service in its `error` field, if any
    pub message: Option<String>,
}

impl StudyResult {
    /// The tool that produced this result
    pub fn kind(&self) -> TaskKind {
        match self {
            StudyResult::Explanation(_) => TaskKind::Doubt,
            StudyResult::Plan(_) => TaskKind::Plan,
            StudyResult::Summary(_) => TaskKind::Summary,
            StudyResult::Notes(_) => TaskKind::Notes,
        }
    }

    /// Build a result from a decoded response body.
    ///
    /// The success key for `kind` must be present and non-null. Fields are
    /// copied as-is; a field of the wrong JSON type reads as empty.
    pub fn from_response(kind: TaskKind, body: &Value) -> Result<Self, ServiceFailure> {
        let payload = match body.get(kind.success_key()) {
            Some(value) if !value.is_null() => value,
            _ => {
                return Err(ServiceFailure {
                    message: body
                        .get("error")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            }
        };

        let result = match kind {
            TaskKind::Doubt => StudyResult::Explanation(Explanation {
                summary: text_field(payload, "summary"),
                step_by_step: text_field(payload, "step_by_step"),
                example: text_field(payload, "example"),
                key_takeaway: text_field(payload, "key_takeaway"),
            }),
            TaskKind::Plan => StudyResult::Plan(
                payload
                    .as_array()
                    .map(|entries| entries.iter().map(plan_entry).collect())
                    .unwrap_or_default(),
            ),
            // The summarizer answers with a flat object
            TaskKind::Summary => StudyResult::Summary(VideoSummary {
                summary: text_field(body, "summary"),
                key_points: list_field(body, "key_points"),
                takeaways: list_field(body, "takeaways"),
            }),
            TaskKind::Notes => StudyResult::Notes(RevisionNotes {
                summary: text_field(payload, "summary"),
                key_points: list_field(payload, "key_points"),
                formulas: list_field(payload, "formulas"),
            }),
        };

        Ok(result)
    }
}

fn text_field(object: &Value, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn list_field(object: &Value, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn plan_entry(item: &Value) -> PlanEntry {
    let day = match item.get("day") {
        Some(Value::Number(n)) => n.as_u64().and_then(|d| u32::try_from(d).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    PlanEntry {
        day: day.unwrap_or(0),
        task: text_field(item, "task"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explanation_fields_copied_exactly() {
        let body = json!({
            "explanation": {
                "summary": "Inertia is resistance to change in motion.",
                "step_by_step": "1. Objects at rest stay at rest.",
                "example": "A passenger lurches forward when a bus brakes.",
                "key_takeaway": "Mass measures inertia."
            }
        });

        let result = StudyResult::from_response(TaskKind::Doubt, &body).unwrap();
        assert_eq!(
            result,
            StudyResult::Explanation(Explanation {
                summary: "Inertia is resistance to change in motion.".to_string(),
                step_by_step: "1. Objects at rest stay at rest.".to_string(),
                example: "A passenger lurches forward when a bus brakes.".to_string(),
                key_takeaway: "Mass measures inertia.".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_success_key_is_failure() {
        for kind in TaskKind::ALL {
            let failure = StudyResult::from_response(kind, &json!({})).unwrap_err();
            assert_eq!(failure.message, None);
        }

        let failure =
            StudyResult::from_response(TaskKind::Notes, &json!({ "notes": null })).unwrap_err();
        assert_eq!(failure.message, None);
    }

    #[test]
    fn test_server_error_message_is_kept() {
        let body = json!({ "error": "Exam date must be in the future" });
        let failure = StudyResult::from_response(TaskKind::Plan, &body).unwrap_err();
        assert_eq!(
            failure.message.as_deref(),
            Some("Exam date must be in the future")
        );
    }

    #[test]
    fn test_plan_entries() {
        let body = json!({
            "plan": [
                { "day": 1, "task": "Optics basics" },
                { "day": "2", "task": "Lenses" },
                { "day": "soon", "task": 42 }
            ]
        });

        match StudyResult::from_response(TaskKind::Plan, &body).unwrap() {
            StudyResult::Plan(entries) => {
                assert_eq!(entries[0], PlanEntry::new(1, "Optics basics"));
                assert_eq!(entries[1], PlanEntry::new(2, "Lenses"));
                assert_eq!(entries[2], PlanEntry::new(0, ""));
                assert_eq!(entries[0].line(), "Day 1 → Optics basics");
            }
            other => panic!("Expected plan, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_reads_flat_body() {
        let body = json!({
            "summary": "A lecture on optics.",
            "key_points": ["Refraction", 7, "Reflection"],
            "takeaways": "not a list"
        });

        match StudyResult::from_response(TaskKind::Summary, &body).unwrap() {
            StudyResult::Summary(summary) => {
                assert_eq!(summary.summary, "A lecture on optics.");
                assert_eq!(summary.key_points, vec!["Refraction", "Reflection"]);
                assert!(summary.takeaways.is_empty());
            }
            other => panic!("Expected summary, got {:?}", other),
        }
    }

    #[test]
    fn test_notes_malformed_scalar_reads_empty() {
        let body = json!({
            "notes": {
                "summary": { "nested": true },
                "key_points": ["Point 1"],
                "formulas": []
            }
        });

        match StudyResult::from_response(TaskKind::Notes, &body).unwrap() {
            StudyResult::Notes(notes) => {
                assert_eq!(notes.summary, "");
                assert_eq!(notes.key_points, vec!["Point 1"]);
                assert!(notes.formulas.is_empty());
            }
            other => panic!("Expected notes, got {:?}", other),
        }
    }
}
