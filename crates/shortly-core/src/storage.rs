use crate::error::StorageError;
use async_trait::async_trait;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The durable medium a store's snapshot is mirrored to.
///
/// The medium (file, key-value store, managed storage) is opaque to the
/// store: it only needs to load the last saved blob and atomically replace
/// it with a newer one.
#[async_trait]
pub trait DurableStorage: Send + Sync + 'static {
    /// Returns the last saved blob, or `None` if nothing was ever saved.
    async fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Atomically replaces the saved blob with `blob`.
    async fn save(&self, blob: &[u8]) -> Result<()>;
}
