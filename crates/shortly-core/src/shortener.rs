use crate::alias::Alias;
use crate::error::Result;
use async_trait::async_trait;

/// Outcome of a shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The alias now mapped to the URL.
    pub alias: Alias,
    /// `false` when the URL was already shortened and the existing alias
    /// was returned.
    pub is_new: bool,
}

/// The narrow interface transports use to reach the mapping core.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `url`, returning its existing alias if it was seen before.
    async fn shorten(&self, url: &str) -> Result<Shortened>;

    /// Resolves an alias to the URL it maps to.
    async fn resolve(&self, code: &str) -> Result<String>;
}
