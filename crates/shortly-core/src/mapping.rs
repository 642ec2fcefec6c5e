use crate::alias::Alias;
use serde::{Deserialize, Serialize};

/// One committed (alias, URL) pair. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mapping {
    pub alias: Alias,
    pub url: String,
}

impl Mapping {
    pub fn new(alias: Alias, url: impl Into<String>) -> Self {
        Self {
            alias,
            url: url.into(),
        }
    }
}
