use parking_lot::RwLock;
use shortly_core::error::Result;
use shortly_core::{validate_url, Alias, Mapping, Shortened, Snapshot, StoreError};
use shortly_generator::Generator;
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

/// Default cap on candidate draws per `shorten` call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Configures an [`AliasStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreSettings {
    /// Maximum number of candidates drawn before a `shorten` call gives up
    /// with [`StoreError::AliasSpaceExhausted`]. Values below 1 count as 1.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Forward and reverse indexes over one set of mappings.
///
/// Only mutated through [`Indexes::insert`] and [`Indexes::from_mappings`],
/// both of which keep the two maps mirror images of each other.
#[derive(Debug, Default)]
struct Indexes {
    forward: HashMap<Alias, String>,
    reverse: HashMap<String, Alias>,
}

impl Indexes {
    /// Builds the forward index from `mappings` and derives the reverse
    /// index from it. Duplicate aliases or URLs are rejected.
    fn from_mappings(mappings: Vec<Mapping>) -> Result<Self> {
        let mut forward: HashMap<Alias, String> = HashMap::with_capacity(mappings.len());
        for Mapping { alias, url } in mappings {
            match forward.get(&alias) {
                // a repeated identical pair is the same mapping
                Some(existing) if *existing == url => continue,
                Some(existing) => {
                    return Err(StoreError::CorruptState(format!(
                        "alias '{}' maps to both '{}' and '{}'",
                        alias, existing, url
                    )));
                }
                None => {
                    forward.insert(alias, url);
                }
            }
        }

        let mut reverse: HashMap<String, Alias> = HashMap::with_capacity(forward.len());
        for (alias, url) in &forward {
            if let Some(other) = reverse.insert(url.clone(), alias.clone()) {
                return Err(StoreError::CorruptState(format!(
                    "url '{}' is mapped by both '{}' and '{}'",
                    url, other, alias
                )));
            }
        }

        Ok(Self { forward, reverse })
    }

    fn insert(&mut self, alias: Alias, url: String) {
        debug_assert!(!self.forward.contains_key(&alias));
        debug_assert!(!self.reverse.contains_key(&url));
        self.reverse.insert(url.clone(), alias.clone());
        self.forward.insert(alias, url);
    }

    fn len(&self) -> usize {
        self.forward.len()
    }
}

/// The alias mapping store.
///
/// Maintains a bijection between aliases and URLs:
/// - every alias maps to exactly one URL and every URL to exactly one alias;
/// - shortening a URL that is already mapped returns its existing alias;
/// - every stored URL passed [`validate_url`] when it was admitted.
///
/// The store never persists anything itself. Callers mirror it to durable
/// storage through [`AliasStore::snapshot`] and [`AliasStore::restore`].
///
/// All state sits behind one reader-writer lock: `shorten` and `restore`
/// are exclusive, lookups and snapshots share the lock.
pub struct AliasStore<G> {
    indexes: RwLock<Indexes>,
    generator: G,
    settings: StoreSettings,
}

impl<G: Generator> AliasStore<G> {
    /// Creates an empty store drawing candidates from `generator`.
    pub fn new(generator: G, settings: StoreSettings) -> Self {
        Self {
            indexes: RwLock::new(Indexes::default()),
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Shortens `url`, reusing its alias if it is already mapped.
    ///
    /// Surrounding whitespace is trimmed; the trimmed string is what gets
    /// stored and compared. A new mapping is reported with `is_new = true`,
    /// which tells the caller durable state is now stale.
    pub fn shorten(&self, url: &str) -> Result<Shortened> {
        let url = validate_url(url)?;

        let existing = self.indexes.read().reverse.get(&url).cloned();
        if let Some(alias) = existing {
            trace!(alias = %alias, "url already shortened");
            return Ok(Shortened {
                alias,
                is_new: false,
            });
        }

        let mut indexes = self.indexes.write();

        // another writer may have mapped the url since the read lock dropped
        if let Some(alias) = indexes.reverse.get(&url) {
            trace!(alias = %alias, "url shortened concurrently");
            return Ok(Shortened {
                alias: alias.clone(),
                is_new: false,
            });
        }

        let alias = self.next_free_alias(&indexes)?;
        debug!(alias = %alias, url = %url, "created mapping");
        indexes.insert(alias.clone(), url);

        Ok(Shortened {
            alias,
            is_new: true,
        })
    }

    /// Draws candidates until one is a well-formed alias not yet in the
    /// forward index. Malformed candidates count as failed attempts, since
    /// a snapshot holding them could not be restored.
    fn next_free_alias(&self, indexes: &Indexes) -> Result<Alias> {
        let max_attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let candidate = self.generator.generate();
            if let Err(err) = Alias::new(candidate.as_str()) {
                warn!(
                    candidate = %candidate,
                    attempt,
                    error = %err,
                    "generator produced a malformed alias"
                );
                continue;
            }
            if !indexes.forward.contains_key(&candidate) {
                if attempt > 1 {
                    debug!(attempt, "found free alias after collisions");
                }
                return Ok(candidate);
            }
            trace!(candidate = %candidate, attempt, "alias collision");
        }

        warn!(
            attempts = max_attempts,
            mappings = indexes.len(),
            "alias space exhausted"
        );
        Err(StoreError::AliasSpaceExhausted {
            attempts: max_attempts,
        })
    }

    /// Returns the URL mapped to `code`. The lookup is case-sensitive.
    ///
    /// A code that is not a well-formed alias can never be mapped and is
    /// reported as [`StoreError::NotFound`] without taking the lock.
    pub fn resolve(&self, code: &str) -> Result<String> {
        let alias = Alias::new(code)?;
        match self.indexes.read().forward.get(&alias) {
            Some(url) => {
                trace!(code, "resolved alias");
                Ok(url.clone())
            }
            None => {
                trace!(code, "alias not found");
                Err(StoreError::NotFound(code.to_string()))
            }
        }
    }

    /// Returns the alias mapped to `url`, compared after trimming.
    pub fn lookup_alias(&self, url: &str) -> Result<Alias> {
        let url = url.trim();
        self.indexes
            .read()
            .reverse
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }

    pub fn len(&self) -> usize {
        self.indexes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All mappings, ordered by alias.
    pub fn mappings(&self) -> Vec<Mapping> {
        let mut mappings: Vec<Mapping> = self
            .indexes
            .read()
            .forward
            .iter()
            .map(|(alias, url)| Mapping::new(alias.clone(), url.clone()))
            .collect();
        mappings.sort_by(|a, b| a.alias.cmp(&b.alias));
        mappings
    }

    /// Captures every mapping at one instant.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.mappings())
    }

    /// Captures every mapping and encodes it for durable storage.
    pub fn snapshot_bytes(&self) -> Vec<u8> {
        self.snapshot().encode()
    }

    /// Replaces the whole state with the contents of `bytes`.
    ///
    /// On any failure the store keeps its previous state and the error is
    /// [`StoreError::CorruptState`].
    pub fn restore(&self, bytes: &[u8]) -> Result<()> {
        self.restore_snapshot(Snapshot::decode(bytes)?)
    }

    /// Replaces the whole state with `snapshot`.
    pub fn restore_snapshot(&self, snapshot: Snapshot) -> Result<()> {
        // build off to the side so a bad snapshot never touches live state
        let rebuilt = Indexes::from_mappings(snapshot.into_mappings()?)?;
        let count = rebuilt.len();

        *self.indexes.write() = rebuilt;

        info!(mappings = count, "restored alias store");
        Ok(())
    }

    /// Verifies that the forward and reverse indexes describe the same
    /// bijection and that every stored URL is admissible.
    pub fn check_invariants(&self) -> Result<()> {
        let indexes = self.indexes.read();

        if indexes.forward.len() != indexes.reverse.len() {
            return Err(StoreError::CorruptState(format!(
                "index sizes differ: {} aliases, {} urls",
                indexes.forward.len(),
                indexes.reverse.len()
            )));
        }

        for (alias, url) in &indexes.forward {
            if indexes.reverse.get(url) != Some(alias) {
                return Err(StoreError::CorruptState(format!(
                    "reverse index disagrees for alias '{}'",
                    alias
                )));
            }
            validate_url(url).map_err(|e| {
                StoreError::CorruptState(format!("alias '{}' holds an invalid url: {e}", alias))
            })?;
        }

        Ok(())
    }
}

impl<G> std::fmt::Debug for AliasStore<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasStore")
            .field("mappings", &self.indexes.read().len())
            .field("settings", &self.settings)
            .finish()
    }
}
