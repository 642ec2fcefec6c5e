use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Display;
use url::Url;

/// Characters an alias may be drawn from: `a-z`, `A-Z`, `0-9`.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated aliases. 62^6 gives roughly 56.8 billion codes.
pub const DEFAULT_ALIAS_LENGTH: usize = 6;

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 32;

/// A validated short code identifying a shortened URL.
///
/// Aliases are compared case-sensitively and contain only characters
/// from [`ALPHABET`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alias(String);

impl Alias {
    /// Creates a new `Alias` after validating the input.
    ///
    /// Valid aliases are 3-32 characters drawn from `[a-zA-Z0-9]`.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates an `Alias` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators sampling from [`ALPHABET`]).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Extracts the alias from a short URL issued under `base_url`.
    ///
    /// A bare code is accepted as-is. Returns `None` when the input points
    /// at another host or its last path segment is not a valid alias.
    pub fn from_short_url(base_url: &str, input: &str) -> Option<Self> {
        let input = input.trim();
        if !input.contains("://") {
            return Self::new(input).ok();
        }

        let base = Url::parse(base_url).ok()?;
        let short = Url::parse(input).ok()?;
        if base.host_str() != short.host_str() {
            return None;
        }

        let segment = short
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()?;
        Self::new(segment).ok()
    }

    /// Returns the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidAlias(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(CoreError::InvalidAlias(format!(
                "must contain only ASCII letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Alias {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alias> for String {
    fn from(value: Alias) -> Self {
        value.0
    }
}

// Lets indexes keyed by `Alias` be queried with a plain `&str`.
impl Borrow<str> for Alias {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_aliases() {
        assert!(Alias::new("abc").is_ok());
        assert!(Alias::new("abc123").is_ok());
        assert!(Alias::new("ZZzz09").is_ok());
        assert!(Alias::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn too_short() {
        assert!(Alias::new("ab").is_err());
        assert!(Alias::new("").is_err());
    }

    #[test]
    fn too_long() {
        assert!(Alias::new("a".repeat(33)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(Alias::new("abc def").is_err());
        assert!(Alias::new("abc-12").is_err());
        assert!(Alias::new("abc_12").is_err());
        assert!(Alias::new("abcé12").is_err());
    }

    #[test]
    fn alphabet_is_62_distinct_characters() {
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 62);
    }

    #[test]
    fn to_url_handles_trailing_slash() {
        let alias = Alias::new("abc123").unwrap();
        assert_eq!(alias.to_url("https://short.ly/"), "https://short.ly/abc123");
        assert_eq!(alias.to_url("https://short.ly"), "https://short.ly/abc123");
    }

    #[test]
    fn from_short_url_extracts_last_segment() {
        let alias = Alias::from_short_url("https://short.ly/", "https://short.ly/abc123").unwrap();
        assert_eq!(alias.as_str(), "abc123");

        let alias = Alias::from_short_url("https://short.ly/", "  https://short.ly/xyz789/ ").unwrap();
        assert_eq!(alias.as_str(), "xyz789");
    }

    #[test]
    fn from_short_url_accepts_bare_code() {
        let alias = Alias::from_short_url("https://short.ly/", "abc123").unwrap();
        assert_eq!(alias.as_str(), "abc123");
    }

    #[test]
    fn from_short_url_rejects_foreign_host() {
        assert!(Alias::from_short_url("https://short.ly/", "https://example.com/abc123").is_none());
    }

    #[test]
    fn from_short_url_rejects_invalid_segment() {
        assert!(Alias::from_short_url("https://short.ly/", "https://short.ly/").is_none());
        assert!(Alias::from_short_url("https://short.ly/", "https://short.ly/a-b").is_none());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Alias = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(ok.as_str(), "abc123");
        assert!(serde_json::from_str::<Alias>("\"a!\"").is_err());
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_ne!(Alias::new("abcdef").unwrap(), Alias::new("ABCDEF").unwrap());
    }
}
