use crate::store::{AliasStore, StoreSettings};
use crate::writer::{Persistence, WriterHandle};
use async_trait::async_trait;
use shortly_core::error::Result;
use shortly_core::{Alias, DurableStorage, Shortened, Shortener, StoreError};
use shortly_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

/// Base URL short links are issued under unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://short.ly/";

/// Configures a [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceSettings {
    /// Public base URL that aliases are appended to.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,
    #[builder(default)]
    pub store: StoreSettings,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// An [`AliasStore`] wired to a durable storage medium.
///
/// This service handles:
/// - restoring the store from storage when it opens
/// - flagging new mappings for the snapshot writer
/// - rendering and parsing full short URLs
///
/// Storage I/O never runs while the store's lock is held: `shorten` returns
/// as soon as the mapping is committed in memory, and persistence happens
/// later through [`ShortenerService::flush`] or a writer started with
/// [`ShortenerService::spawn_writer`].
pub struct ShortenerService<S, G> {
    store: Arc<AliasStore<G>>,
    persistence: Arc<Persistence<S, G>>,
    base_url: String,
}

impl<S: DurableStorage, G: Generator> ShortenerService<S, G> {
    /// Opens the service, restoring whatever `storage` last saved.
    ///
    /// Absent durable state (first run) yields an empty store. A blob that
    /// fails to restore is reported as [`StoreError::CorruptState`]; whether
    /// to start empty instead is the caller's decision.
    pub async fn open(storage: S, generator: G, settings: ServiceSettings) -> Result<Self> {
        let store = Arc::new(AliasStore::new(generator, settings.store));
        let storage = Arc::new(storage);

        match storage.load().await? {
            Some(blob) => store.restore(&blob)?,
            None => info!("no saved state, starting with an empty store"),
        }

        Ok(Self {
            persistence: Arc::new(Persistence::new(Arc::clone(&store), storage)),
            store,
            base_url: settings.base_url,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &AliasStore<G> {
        &self.store
    }

    /// The durable storage medium.
    pub fn storage(&self) -> &S {
        self.persistence.storage()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shortens `url`. A newly created mapping is queued for persistence;
    /// this call itself performs no I/O.
    pub fn shorten(&self, url: &str) -> Result<Shortened> {
        let shortened = self.store.shorten(url)?;
        if shortened.is_new {
            self.persistence.mark_dirty();
        }
        Ok(shortened)
    }

    /// Returns the URL mapped to `code`.
    pub fn resolve(&self, code: &str) -> Result<String> {
        self.store.resolve(code)
    }

    /// Resolves either a bare code or a full short URL issued under this
    /// service's base URL.
    pub fn resolve_short_url(&self, input: &str) -> Result<String> {
        let alias = Alias::from_short_url(&self.base_url, input)
            .ok_or_else(|| StoreError::NotFound(input.trim().to_string()))?;
        self.store.resolve(alias.as_str())
    }

    /// Renders the full short URL for `alias`.
    pub fn short_url(&self, alias: &Alias) -> String {
        alias.to_url(&self.base_url)
    }

    /// Whether mappings were committed that have not been saved yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.persistence.is_dirty()
    }

    /// Saves a snapshot now and waits for the medium to confirm it.
    pub async fn flush(&self) -> Result<()> {
        let saved = self.persistence.persist().await?;
        info!(mappings = saved, "flushed alias store");
        Ok(())
    }

    /// Replaces the store's state with what storage currently holds.
    ///
    /// When storage holds nothing the in-memory state is kept as is.
    pub async fn reload(&self) -> Result<()> {
        match self.persistence.storage().load().await? {
            Some(blob) => self.store.restore(&blob),
            None => {
                debug!("reload found no saved state, keeping current store");
                Ok(())
            }
        }
    }

    /// Starts the background snapshot writer. Must be called within a
    /// tokio runtime.
    pub fn spawn_writer(&self) -> WriterHandle {
        WriterHandle::spawn(Arc::clone(&self.persistence))
    }
}

#[async_trait]
impl<S: DurableStorage, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, url: &str) -> Result<Shortened> {
        ShortenerService::shorten(self, url)
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        ShortenerService::resolve(self, code)
    }
}
