//! URL admission predicate.
//!
//! A candidate is admitted iff, after trimming surrounding whitespace, it
//! parses as an absolute URL whose scheme is `http` or `https`. The trimmed
//! input is the canonical form: the reverse index compares it verbatim.

use crate::error::CoreError;
use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Validates `input` and returns its canonical (trimmed) form.
pub fn validate_url(input: &str) -> Result<String, CoreError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| CoreError::InvalidUrl(format!("'{}' is not an absolute URL: {e}", trimmed)))?;

    // `Url` lowercases the scheme while parsing
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(CoreError::InvalidUrl(format!(
            "URL scheme must be http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(trimmed.to_string())
}

/// Returns `true` when `input` would be admitted by [`validate_url`].
pub fn is_valid_url(input: &str) -> bool {
    validate_url(input).is_ok()
}
