use async_trait::async_trait;
use parking_lot::Mutex;
use shortly_core::storage::{DurableStorage, Result};
use shortly_core::StorageError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A storage whose saves always fail.
///
/// `load` returns the blob it was created with, so it can also stand in
/// for a medium that is readable but has gone read-only.
#[derive(Debug, Default)]
pub struct FailingStorage {
    initial: Option<Vec<u8>>,
    attempts: AtomicUsize,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            initial: Some(blob.into()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of save attempts so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurableStorage for FailingStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.initial.clone())
    }

    async fn save(&self, _blob: &[u8]) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable("storage is read-only".to_string()))
    }
}

/// A storage that keeps every saved blob, oldest first.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    initial: Option<Vec<u8>>,
    saves: Mutex<Vec<Vec<u8>>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            initial: Some(blob.into()),
            saves: Mutex::new(Vec::new()),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }

    pub fn last_save(&self) -> Option<Vec<u8>> {
        self.saves.lock().last().cloned()
    }
}

#[async_trait]
impl DurableStorage for RecordingStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.last_save().or_else(|| self.initial.clone()))
    }

    async fn save(&self, blob: &[u8]) -> Result<()> {
        self.saves.lock().push(blob.to_vec());
        Ok(())
    }
}
