//! Terminal display and text wrapping utilities.
//!
//! This module provides terminal size detection, column wrapping for the
//! terminal presenter, and a width-aware truncation helper.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;

/// Terminal information with cached size and capabilities.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    is_tty: bool,
    is_stderr_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

/// Get the global terminal information, initialized on first call.
pub fn terminal_info() -> &'static Terminal {
    TERMINAL_INFO.get_or_init(|| {
        let width = terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH);

        Terminal {
            width,
            is_tty: io::stdout().is_terminal(),
            is_stderr_tty: io::stderr().is_terminal(),
        }
    })
}

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the current terminal width in characters.
#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

/// Check if stderr is a terminal.
#[inline]
pub fn is_stderr_terminal() -> bool {
    terminal_info().is_stderr_tty
}

/// Wrap `text` to `columns` terminal columns.
///
/// Explicit newlines always break and runs of whitespace collapse to one
/// space. A word wider than the line is split between characters. Empty
/// input yields a single empty line.
pub fn wrap_columns(text: &str, columns: usize) -> Vec<String> {
    let options = textwrap::Options::new(columns.max(1))
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
        .break_words(true);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(
            textwrap::wrap(&paragraph, &options)
                .into_iter()
                .map(|line| line.into_owned()),
        );
    }
    lines
}

/// Shorten `text` to fit `max_width`, ending it with `...` when cut.
pub fn truncate_to_width<F>(text: &str, max_width: f32, advance: F) -> String
where
    F: Fn(char) -> f32,
{
    let total: f32 = text.chars().map(&advance).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width - 3.0 * advance('.');
    let mut out = String::new();
    let mut width = 0.0;
    for c in text.chars() {
        let w = advance(c);
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }
    format!("{}...", out.trim_end())
}
