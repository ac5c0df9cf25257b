//! Input validation for service URLs and export file names.
//!
//! File names derived from user topics must not escape the export directory,
//! and the service base URL must be a plain http(s) URL.

use thiserror::Error;
use url::Url;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid filename: contains disallowed characters")]
    InvalidFilename,

    #[error("Path traversal detected: {0}")]
    PathTraversal(String),
}

/// Longest file name most filesystems accept, in bytes
pub const MAX_FILENAME_BYTES: usize = 255;

/// Validate a service base URL.
///
/// Only `http` and `https` URLs with a host are accepted. Loopback hosts are
/// allowed since the service usually runs locally.
pub fn validate_base_url(url: &str) -> Result<Url, InputError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(InputError::InvalidUrl("empty URL".to_string()));
    }

    if url.contains(['\0', '\n', '\r']) {
        return Err(InputError::InvalidUrl(
            "contains control characters".to_string(),
        ));
    }

    let parsed = Url::parse(url).map_err(|e| InputError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(InputError::InvalidUrl(format!("invalid scheme: {}", other)));
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(InputError::InvalidUrl("missing host".to_string()));
    }

    Ok(parsed)
}

/// Sanitize a filename to prevent path traversal
///
/// Keeps alphanumerics, dash, underscore, dot and space; drops everything
/// else and limits the length.
pub fn sanitize_filename(filename: &str) -> Result<String, InputError> {
    let filename = filename.trim();

    if filename.is_empty() {
        return Err(InputError::InvalidFilename);
    }

    if filename.contains("..")
        || filename.starts_with('/')
        || filename.starts_with('\\')
        || filename.contains(":/")
        || filename.contains(":\\")
    {
        return Err(InputError::PathTraversal(filename.to_string()));
    }

    let mut sanitized: String = filename
        .chars()
        .filter(|&ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' '))
        .collect();

    if sanitized.len() > MAX_FILENAME_BYTES {
        let ext = match sanitized.rfind('.') {
            Some(pos) if sanitized.len() - pos < MAX_FILENAME_BYTES => &sanitized[pos..],
            _ => "",
        };
        let base = truncate_bytes(&sanitized, MAX_FILENAME_BYTES - ext.len());
        sanitized = format!("{}{}", base, ext);
    }

    let sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() {
        return Err(InputError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character
pub fn truncate_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
