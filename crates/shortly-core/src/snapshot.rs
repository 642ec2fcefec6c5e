//! Serialized form of the complete mapping set.
//!
//! The layout is a JSON object carrying a format version and a sequence of
//! `[alias, url]` pairs in no particular order:
//!
//! ```json
//! { "version": 1, "saved_at": "2026-01-01T00:00:00Z",
//!   "mappings": [["abc123", "https://a.example/"]] }
//! ```
//!
//! Blobs written by the browser edition (`urlDatabase` / `reverseDatabase`
//! entry arrays) are accepted on decode. Only `urlDatabase` is read; the
//! reverse index is always derived from the forward pairs.

use crate::alias::Alias;
use crate::error::StoreError;
use crate::mapping::Mapping;
use crate::url_validator::validate_url;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// When the snapshot was taken. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<Timestamp>,
    pub mappings: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySnapshot {
    url_database: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Wire {
    Current(Snapshot),
    Legacy(LegacySnapshot),
}

impl Snapshot {
    /// Builds a snapshot of `mappings`, stamped with the current time.
    pub fn new(mappings: impl IntoIterator<Item = Mapping>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Timestamp::now()),
            mappings: mappings
                .into_iter()
                .map(|m| (m.alias.into(), m.url))
                .collect(),
        }
    }

    /// An empty snapshot, the state of a store on first run.
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: None,
            mappings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Encodes the snapshot as JSON bytes.
    pub fn encode(&self) -> Vec<u8> {
        // A snapshot is plain strings and integers, which always serialize.
        serde_json::to_vec(self).expect("snapshot serialization is infallible")
    }

    /// Decodes a blob in either the current or the legacy layout.
    ///
    /// Fails with [`StoreError::CorruptState`] when the blob does not parse
    /// or declares an unsupported version. Entry-level validation happens in
    /// [`Snapshot::into_mappings`].
    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        let wire: Wire = serde_json::from_slice(bytes)
            .map_err(|e| StoreError::CorruptState(format!("snapshot does not parse: {e}")))?;

        match wire {
            Wire::Current(snapshot) if snapshot.version == SNAPSHOT_VERSION => Ok(snapshot),
            Wire::Current(snapshot) => Err(StoreError::CorruptState(format!(
                "unsupported snapshot version {}, expected {}",
                snapshot.version, SNAPSHOT_VERSION
            ))),
            Wire::Legacy(legacy) => Ok(Self {
                version: SNAPSHOT_VERSION,
                saved_at: None,
                mappings: legacy.url_database,
            }),
        }
    }

    /// Validates every entry and converts it into a [`Mapping`].
    ///
    /// Aliases must be well formed and URLs must pass the admission
    /// predicate; the first offending entry fails the whole snapshot.
    /// Uniqueness is checked by the store when it rebuilds its indexes.
    pub fn into_mappings(self) -> Result<Vec<Mapping>, StoreError> {
        self.mappings
            .into_iter()
            .map(|(alias, url)| {
                let alias = Alias::new(alias.as_str()).map_err(|e| {
                    StoreError::CorruptState(format!("entry '{}': {e}", alias))
                })?;
                let url = validate_url(&url).map_err(|e| {
                    StoreError::CorruptState(format!("entry '{}': {e}", alias))
                })?;
                Ok(Mapping::new(alias, url))
            })
            .collect()
    }
}
