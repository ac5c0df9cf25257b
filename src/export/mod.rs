//! Document export: lays a study result out on A4 pages and writes it as PDF.
//!
//! Layout works in millimetres with the origin at the top-left corner of the
//! page and y growing downwards. The exporter keeps a running cursor:
//!
//! - the title sits at y = 20 and the optional topic line at y = 30
//! - body text is wrapped to a 170 mm column starting at x = 20
//! - every line advances the cursor by 7 mm
//! - before any line is placed, a cursor past 280 mm starts a new page and
//!   resets the cursor to the top margin
//!
//! [`export`] produces the [`Document`] layout; [`render_pdf`] and [`save`]
//! turn it into PDF bytes or a file.

mod metrics;
mod pdf;

pub use metrics::{text_width_mm, MM_PER_PT};
pub use pdf::{render_pdf, save};

use serde::Serialize;
use textwrap::wrap_algorithms::wrap_first_fit;

use crate::models::StudyResult;
use crate::utils::{sanitize_filename, truncate_bytes, truncate_to_width, MAX_FILENAME_BYTES};

/// Left margin
pub const MARGIN_X: f32 = 20.0;
/// Cursor position at the top of every page
pub const TOP_MARGIN: f32 = 20.0;
/// Width body text is wrapped to
pub const CONTENT_WIDTH: f32 = 170.0;
/// A cursor beyond this starts a new page
pub const PAGE_THRESHOLD: f32 = 280.0;
/// Advance after each body line
pub const LINE_HEIGHT: f32 = 7.0;
/// Advance after a section heading
pub const HEADING_ADVANCE: f32 = 8.0;
/// Extra space after each section
pub const SECTION_GAP: f32 = 10.0;

/// A4 page size
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const TITLE_SIZE: f32 = 18.0;
const TOPIC_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;

const TOPIC_Y: f32 = 30.0;
const BODY_Y_WITH_TOPIC: f32 = 45.0;
const BODY_Y: f32 = 35.0;

const NOTES_SUFFIX: &str = "_Revision_Notes.pdf";

/// Errors that can occur while writing a document
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

/// One line of text placed on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub text: String,
}

/// A page of placed text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub blocks: Vec<TextBlock>,
}

/// A laid-out document ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Download name, e.g. `Optics_Revision_Notes.pdf`
    pub file_name: String,
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of every block in reading order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter().map(|b| b.text.as_str()))
    }

    /// Whether some block reads exactly `line`
    pub fn contains_line(&self, line: &str) -> bool {
        self.lines().any(|l| l == line)
    }
}

/// Running cursor over a growing list of pages
struct Layout {
    pages: Vec<Page>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: TOP_MARGIN,
        }
    }

    fn place(&mut self, text: impl Into<String>, font_size: f32, advance: f32) {
        if self.y > PAGE_THRESHOLD {
            self.pages.push(Page::default());
            self.y = TOP_MARGIN;
        }

        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(TextBlock {
                x: MARGIN_X,
                y: self.y,
                font_size,
                text: text.into(),
            });
        }
        self.y += advance;
    }

    fn wrapped(&mut self, text: &str) {
        for line in wrap_to_column(text, BODY_SIZE) {
            self.place(line, BODY_SIZE, LINE_HEIGHT);
        }
    }

    fn text_section(&mut self, heading: &str, text: &str) {
        self.place(heading, BODY_SIZE, HEADING_ADVANCE);
        self.wrapped(text);
        self.y += SECTION_GAP;
    }

    fn list_section(&mut self, heading: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.place(heading, BODY_SIZE, HEADING_ADVANCE);
        for item in items {
            self.wrapped(&format!("• {}", item));
        }
        self.y += SECTION_GAP;
    }
}

/// Wrap `text` to the content column at `font_size`.
///
/// Explicit newlines always break; blank input still yields one empty line.
pub fn wrap_to_column(text: &str, font_size: f32) -> Vec<String> {
    let width = f64::from(CONTENT_WIDTH);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let words = metrics::measure_words(paragraph, font_size, width);
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(
            wrap_first_fit(&words, &[width])
                .into_iter()
                .map(metrics::join_words),
        );
    }

    lines
}

/// Document heading label for a result
pub fn document_label(result: &StudyResult) -> &'static str {
    match result {
        StudyResult::Explanation(_) => "Doubt Explanation",
        StudyResult::Plan(_) => "Smart Exam Plan",
        StudyResult::Summary(_) => "Video Summary",
        StudyResult::Notes(_) => "Revision Notes",
    }
}

/// File name the document is saved under
pub fn file_name(topic: &str, result: &StudyResult) -> String {
    match result {
        StudyResult::Notes(_) => match sanitize_filename(topic) {
            Ok(topic) => {
                let topic = truncate_bytes(&topic, MAX_FILENAME_BYTES - NOTES_SUFFIX.len());
                format!("{}{}", topic.trim_end(), NOTES_SUFFIX)
            }
            Err(e) => {
                if !topic.trim().is_empty() {
                    tracing::warn!("Topic not usable as a file name ({}), using default", e);
                }
                "Revision_Notes.pdf".to_string()
            }
        },
        StudyResult::Plan(_) => "Study_Plan.pdf".to_string(),
        StudyResult::Explanation(_) => "Doubt_Explanation.pdf".to_string(),
        StudyResult::Summary(_) => "Video_Summary.pdf".to_string(),
    }
}

/// Lay out `result` as a paginated document headed by `topic`.
///
/// A blank topic omits the topic line.
pub fn export(topic: &str, result: &StudyResult) -> Document {
    let title = format!("AI StudyOS - {}", document_label(result));
    let mut layout = Layout::new();

    let topic = topic.trim();
    if topic.is_empty() {
        layout.place(title.clone(), TITLE_SIZE, BODY_Y - TOP_MARGIN);
    } else {
        layout.place(title.clone(), TITLE_SIZE, TOPIC_Y - TOP_MARGIN);
        let header = format!("Topic: {}", topic);
        let header = fit_to_column(&header, TOPIC_SIZE);
        layout.place(header, TOPIC_SIZE, BODY_Y_WITH_TOPIC - TOPIC_Y);
    }

    match result {
        StudyResult::Explanation(explanation) => {
            layout.text_section("Summary:", &explanation.summary);
            layout.text_section("Step-by-Step Explanation:", &explanation.step_by_step);
            layout.text_section("Example:", &explanation.example);
            layout.text_section("Key Takeaway:", &explanation.key_takeaway);
        }
        StudyResult::Plan(entries) => {
            for entry in entries {
                layout.wrapped(&entry.line());
            }
        }
        StudyResult::Summary(summary) => {
            layout.text_section("Summary:", &summary.summary);
            layout.list_section("Key Points:", &summary.key_points);
            layout.list_section("Takeaways:", &summary.takeaways);
        }
        StudyResult::Notes(notes) => {
            layout.text_section("Summary:", &notes.summary);
            layout.list_section("Key Points:", &notes.key_points);
            layout.list_section("Important Formulas:", &notes.formulas);
        }
    }

    tracing::debug!(
        "Laid out {} on {} page(s)",
        document_label(result),
        layout.pages.len()
    );

    Document {
        file_name: file_name(topic, result),
        title,
        pages: layout.pages,
    }
}

/// Shorten a single-line header so it fits the content column
fn fit_to_column(text: &str, font_size: f32) -> String {
    truncate_to_width(text, CONTENT_WIDTH, |c| metrics::advance_mm(c, font_size))
}
