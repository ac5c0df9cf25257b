//! CLI UI utilities: status output, spinners, theme and result presentation.
//!
//! This module provides colored output, a loading spinner for in-flight
//! requests, the process-wide [`theme`] store and the result [`presenter`].

pub mod presenter;
pub mod theme;

pub use presenter::{present, Palette};
pub use theme::Theme;

use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::TaskKind;

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Info => "ℹ",
        Status::Export => "↓",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
    Export,
}

/// Tool icons shown on the dashboard listing.
pub fn task_icon(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::Doubt => "🧠",
        TaskKind::Plan => "📅",
        TaskKind::Summary => "🎥",
        TaskKind::Notes => "📝",
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str, colored: bool) {
    let icon = status_icon(status);
    if !colored {
        eprintln!("{} {}", icon, msg);
        return;
    }
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
        Status::Export => eprintln!("{} {}", icon.magenta(), msg),
    }
}

/// Dashboard listing of the available tools.
pub fn dashboard() -> String {
    let mut out = String::from("AI StudyOS - Your Personal Study Operating System\n\n");
    for kind in TaskKind::ALL {
        let command = match kind {
            TaskKind::Doubt => "studyos doubt \"What is inertia?\"",
            TaskKind::Plan => {
                "studyos plan --subjects Physics --syllabus Optics --exam-date 2025-01-01 --hours-per-day 3"
            }
            TaskKind::Summary => "studyos summarize https://youtu.be/VIDEO_ID",
            TaskKind::Notes => "studyos notes \"Machine Learning\" --pdf",
        };
        out.push_str(&format!(
            "  {} {:<22} {}\n",
            task_icon(kind),
            kind.tool_name(),
            command
        ));
    }
    out
}

/// Loading spinner shown while a request is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Finish and erase the spinner line.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Export), "↓");
    }

    #[test]
    fn test_dashboard_lists_every_tool() {
        let text = dashboard();
        for kind in TaskKind::ALL {
            assert!(text.contains(kind.tool_name()));
        }
    }
}
