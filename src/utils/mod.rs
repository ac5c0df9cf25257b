//! Utility modules shared by the presenter, exporter and CLI.
//!
//! - [`wrap_columns`]: word wrap measured in terminal columns
//! - [`truncate_to_width`]: shorten a line with a caller-supplied character width
//! - [`terminal_width`], [`is_terminal`]: cached terminal information
//! - [`sanitize_filename`]: make a topic safe to use as a file name
//! - [`validate_base_url`]: check a service base URL
//!
//! # Wrapping
//!
//! ```rust
//! use studyos::utils::wrap_columns;
//!
//! let lines = wrap_columns("The quick brown fox jumps over the lazy dog", 15);
//! assert_eq!(lines, vec!["The quick brown", "fox jumps over", "the lazy dog"]);
//! ```

mod display;
mod validate;

pub use display::{
    is_stderr_terminal, is_terminal, terminal_info, terminal_width,
    truncate_to_width, wrap_columns, Terminal, DEFAULT_WIDTH,
};
pub use validate::{
    sanitize_filename, truncate_bytes, validate_base_url, InputError, MAX_FILENAME_BYTES,
};
