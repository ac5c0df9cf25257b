//! Terminal rendering of study results.

use owo_colors::{OwoColorize, Style};
use std::fmt::Write;

use super::theme::{self, Theme};
use crate::models::StudyResult;
use crate::utils::wrap_columns;

/// Styles used by the presenter for one theme
#[derive(Debug, Clone)]
pub struct Palette {
    title: Style,
    heading: Style,
    bullet: Style,
    accent: Style,
    colored: bool,
}

impl Palette {
    /// Palette for `theme`; `colored = false` renders plain text
    pub fn for_theme(theme: Theme, colored: bool) -> Self {
        let (title, heading, bullet, accent) = match theme {
            Theme::Light => (
                Style::new().bold().blue(),
                Style::new().bold().magenta(),
                Style::new().blue(),
                Style::new().bold().green(),
            ),
            Theme::Dark => (
                Style::new().bold().bright_cyan(),
                Style::new().bold().bright_yellow(),
                Style::new().bright_cyan(),
                Style::new().bold().bright_green(),
            ),
        };

        Self {
            title,
            heading,
            bullet,
            accent,
            colored,
        }
    }

    /// Palette for the active theme
    pub fn current(colored: bool) -> Self {
        Self::for_theme(theme::current(), colored)
    }

    /// Uncoloured output
    pub fn plain() -> Self {
        Self::for_theme(Theme::Light, false)
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render `result` for a terminal `width` columns wide.
///
/// Scalar sections always render, blank when empty; list sections render only
/// when they have entries. The output depends only on the arguments.
pub fn present(result: &StudyResult, palette: &Palette, width: usize) -> String {
    let mut out = String::new();
    let body_width = width.saturating_sub(2).max(20);
    let kind = result.kind();

    let _ = writeln!(out, "{}", palette.paint(kind.title(), palette.title));
    let _ = writeln!(out, "{}", "─".repeat(kind.title().chars().count()));

    match result {
        StudyResult::Explanation(explanation) => {
            text_section(&mut out, palette, "Summary", &explanation.summary, body_width);
            text_section(
                &mut out,
                palette,
                "Step-by-Step Explanation",
                &explanation.step_by_step,
                body_width,
            );
            text_section(&mut out, palette, "Example", &explanation.example, body_width);
            text_section(
                &mut out,
                palette,
                "Key Takeaway",
                &explanation.key_takeaway,
                body_width,
            );
        }
        StudyResult::Plan(entries) => {
            for entry in entries {
                let label = format!("Day {}", entry.day);
                let lines = wrap_columns(&entry.line(), body_width);
                for (i, line) in lines.iter().enumerate() {
                    if i == 0 {
                        let rest = line.strip_prefix(label.as_str()).unwrap_or(line);
                        let _ = writeln!(out, "{}{}", palette.paint(&label, palette.accent), rest);
                    } else {
                        let _ = writeln!(out, "  {}", line);
                    }
                }
            }
        }
        StudyResult::Summary(summary) => {
            text_section(&mut out, palette, "Summary", &summary.summary, body_width);
            list_section(&mut out, palette, "Key Points", &summary.key_points, body_width);
            list_section(&mut out, palette, "Takeaways", &summary.takeaways, body_width);
        }
        StudyResult::Notes(notes) => {
            text_section(&mut out, palette, "Summary", &notes.summary, body_width);
            list_section(&mut out, palette, "Key Points", &notes.key_points, body_width);
            list_section(
                &mut out,
                palette,
                "Important Formulas",
                &notes.formulas,
                body_width,
            );
        }
    }

    out
}

fn text_section(out: &mut String, palette: &Palette, heading: &str, text: &str, width: usize) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.paint(heading, palette.heading));
    for line in wrap_columns(text, width) {
        let _ = writeln!(out, "{}", line);
    }
}

fn list_section(out: &mut String, palette: &Palette, heading: &str, items: &[String], width: usize) {
    if items.is_empty() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.paint(heading, palette.heading));
    for item in items {
        for (i, line) in wrap_columns(item, width.saturating_sub(2).max(1))
            .iter()
            .enumerate()
        {
            if i == 0 {
                let _ = writeln!(out, "{} {}", palette.paint("•", palette.bullet), line);
            } else {
                let _ = writeln!(out, "  {}", line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Explanation, PlanEntry, RevisionNotes, VideoSummary};

    #[test]
    fn test_explanation_shows_all_sections() {
        let result = StudyResult::Explanation(Explanation {
            summary: "Inertia resists changes in motion.".to_string(),
            step_by_step: "Objects keep doing what they do.".to_string(),
            example: "Braking bus.".to_string(),
            key_takeaway: "Mass measures inertia.".to_string(),
        });

        let text = present(&result, &Palette::plain(), 80);
        for heading in ["Summary", "Step-by-Step Explanation", "Example", "Key Takeaway"] {
            assert!(text.contains(heading), "missing {}", heading);
        }
        assert!(text.contains("Braking bus."));
        assert!(text.starts_with("Doubt Explanation\n"));
    }

    #[test]
    fn test_empty_lists_are_hidden_scalars_are_not() {
        let result = StudyResult::Notes(RevisionNotes {
            summary: String::new(),
            key_points: vec!["Snell's law".to_string()],
            formulas: Vec::new(),
        });

        let text = present(&result, &Palette::plain(), 80);
        assert!(text.contains("Summary"));
        assert!(text.contains("Key Points"));
        assert!(text.contains("• Snell's law"));
        assert!(!text.contains("Important Formulas"));
    }

    #[test]
    fn test_summary_takeaways() {
        let result = StudyResult::Summary(VideoSummary {
            summary: "About optics.".to_string(),
            key_points: Vec::new(),
            takeaways: vec!["Light bends".to_string()],
        });

        let text = present(&result, &Palette::plain(), 80);
        assert!(!text.contains("Key Points"));
        assert!(text.contains("Takeaways"));
    }

    #[test]
    fn test_plan_lines() {
        let result = StudyResult::Plan(vec![
            PlanEntry::new(1, "Optics basics"),
            PlanEntry::new(2, "Lenses"),
        ]);

        let text = present(&result, &Palette::plain(), 80);
        assert!(text.contains("Day 1 → Optics basics"));
        assert!(text.contains("Day 2 → Lenses"));
    }

    #[test]
    fn test_present_is_idempotent() {
        let result = StudyResult::Notes(RevisionNotes {
            summary: "A long summary ".repeat(20),
            key_points: vec!["one".to_string(), "two".to_string()],
            formulas: vec!["E = mc^2".to_string()],
        });

        for palette in [Palette::plain(), Palette::for_theme(Theme::Dark, true)] {
            assert_eq!(
                present(&result, &palette, 60),
                present(&result, &palette, 60)
            );
        }
    }
}
