//! The four study tools and their fixed service metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Study tool a request or result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// AI doubt solver
    Doubt,
    /// Smart exam planner
    Plan,
    /// Video summarizer
    Summary,
    /// Smart revision notes
    Notes,
}

impl TaskKind {
    /// All task kinds, in dashboard order
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Doubt,
        TaskKind::Plan,
        TaskKind::Summary,
        TaskKind::Notes,
    ];

    /// Stable identifier used in configuration keys
    pub fn id(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "doubt",
            TaskKind::Plan => "plan",
            TaskKind::Summary => "summary",
            TaskKind::Notes => "notes",
        }
    }

    /// Service path the request is posted to
    pub fn endpoint(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "/solve-doubt",
            TaskKind::Plan => "/generate-plan",
            TaskKind::Summary => "/summarize-youtube",
            TaskKind::Notes => "/generate-notes-ai",
        }
    }

    /// Top-level key whose presence marks a successful response
    pub fn success_key(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "explanation",
            TaskKind::Plan => "plan",
            TaskKind::Summary => "summary",
            TaskKind::Notes => "notes",
        }
    }

    /// Heading shown above a presented result
    pub fn title(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "Doubt Explanation",
            TaskKind::Plan => "Your Study Plan",
            TaskKind::Summary => "Video Summary",
            TaskKind::Notes => "Revision Notes",
        }
    }

    /// Tool name as listed on the dashboard
    pub fn tool_name(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "AI Doubt Solver",
            TaskKind::Plan => "Smart Exam Planner",
            TaskKind::Summary => "YouTube AI Summarizer",
            TaskKind::Notes => "Smart Revision Notes",
        }
    }

    /// Alert shown when a required input is missing
    pub fn missing_input_message(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "Please enter your doubt",
            TaskKind::Plan => "Please fill all fields",
            TaskKind::Summary => "Please enter a YouTube URL",
            TaskKind::Notes => "Please enter a topic",
        }
    }

    /// Alert shown when the service answers without a usable result
    pub fn service_error_message(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "Error solving doubt",
            TaskKind::Plan => "Error generating plan",
            TaskKind::Summary => "Error generating summary",
            TaskKind::Notes => "Error generating notes",
        }
    }

    /// Spinner text while a request is in flight
    pub fn progress_message(&self) -> &'static str {
        match self {
            TaskKind::Doubt => "Solving doubt...",
            TaskKind::Plan => "Generating study plan...",
            TaskKind::Summary => "Generating summary...",
            TaskKind::Notes => "Generating notes...",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doubt" => Ok(TaskKind::Doubt),
            "plan" => Ok(TaskKind::Plan),
            "summary" => Ok(TaskKind::Summary),
            "notes" => Ok(TaskKind::Notes),
            other => Err(format!("unknown task kind: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_keys() {
        assert_eq!(TaskKind::Doubt.endpoint(), "/solve-doubt");
        assert_eq!(TaskKind::Plan.endpoint(), "/generate-plan");
        assert_eq!(TaskKind::Summary.endpoint(), "/summarize-youtube");
        assert_eq!(TaskKind::Notes.endpoint(), "/generate-notes-ai");

        assert_eq!(TaskKind::Doubt.success_key(), "explanation");
        assert_eq!(TaskKind::Notes.success_key(), "notes");
    }

    #[test]
    fn test_from_str_round_trips_ids() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.id().parse::<TaskKind>().unwrap(), kind);
        }
        assert!("quiz".parse::<TaskKind>().is_err());
    }
}
