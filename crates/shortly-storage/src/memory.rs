use async_trait::async_trait;
use parking_lot::RwLock;
use shortly_core::storage::{DurableStorage, Result};

/// Keeps the last saved blob in memory.
///
/// Suitable for tests and for ephemeral deployments where losing every
/// mapping on restart is acceptable.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    blob: RwLock<Option<Vec<u8>>>,
}

impl InMemoryStorage {
    /// Creates an empty storage; the first `load` returns `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that already holds `blob`.
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: RwLock::new(Some(blob.into())),
        }
    }

    /// Returns a copy of the saved blob, if any.
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.read().clone()
    }
}

#[async_trait]
impl DurableStorage for InMemoryStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.blob.read().clone())
    }

    async fn save(&self, blob: &[u8]) -> Result<()> {
        *self.blob.write() = Some(blob.to_vec());
        Ok(())
    }
}
