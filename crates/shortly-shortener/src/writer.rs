use crate::store::AliasStore;
use shortly_core::{DurableStorage, StorageError, StoreError};
use shortly_generator::Generator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Mirrors an [`AliasStore`] to a [`DurableStorage`] medium.
///
/// Saves are serialized, and each one snapshots the store only after the
/// previous save finished, so the medium never goes back to an older state.
pub(crate) struct Persistence<S, G> {
    store: Arc<AliasStore<G>>,
    storage: Arc<S>,
    save_lock: Mutex<()>,
    dirty: AtomicBool,
    pending: Notify,
}

impl<S: DurableStorage, G: Generator> Persistence<S, G> {
    pub(crate) fn new(store: Arc<AliasStore<G>>, storage: Arc<S>) -> Self {
        Self {
            store,
            storage,
            save_lock: Mutex::new(()),
            dirty: AtomicBool::new(false),
            pending: Notify::new(),
        }
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    /// Records that the store changed and wakes the background writer.
    /// Never blocks; repeated calls before the writer runs coalesce.
    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.pending.notify_one();
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Snapshots the store and saves it. Returns the number of mappings saved.
    pub(crate) async fn persist(&self) -> Result<usize, StorageError> {
        let _guard = self.save_lock.lock().await;

        // cleared before the snapshot so concurrent changes re-mark it
        self.dirty.store(false, Ordering::SeqCst);
        let snapshot = self.store.snapshot();

        match self.storage.save(&snapshot.encode()).await {
            Ok(()) => {
                debug!(mappings = snapshot.len(), "saved snapshot");
                Ok(snapshot.len())
            }
            Err(err) => {
                self.dirty.store(true, Ordering::SeqCst);
                Err(err)
            }
        }
    }
}

/// Handle to the background snapshot writer.
///
/// The writer saves whenever new mappings were committed, coalescing bursts
/// into one save. Only [`WriterHandle::shutdown`] guarantees a final save:
/// dropping the handle detaches the task, which is lost along with any
/// unsaved mappings if the runtime shuts down first.
pub struct WriterHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<(), StorageError>>,
}

impl WriterHandle {
    pub(crate) fn spawn<S: DurableStorage, G: Generator>(
        persistence: Arc<Persistence<S, G>>,
    ) -> Self {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run(persistence, shutdown_rx));
        Self { shutdown, task }
    }

    /// Stops the writer, saving any mappings not yet persisted.
    pub async fn shutdown(self) -> Result<(), StoreError> {
        // the writer may already be gone; joining reports why
        let _ = self.shutdown.send(());

        match self.task.await {
            Ok(result) => result.map_err(StoreError::from),
            Err(err) => Err(StoreError::Storage(StorageError::Unavailable(format!(
                "snapshot writer task failed: {err}"
            )))),
        }
    }
}

async fn run<S: DurableStorage, G: Generator>(
    persistence: Arc<Persistence<S, G>>,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<(), StorageError> {
    debug!("snapshot writer started");

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = persistence.pending.notified() => {
                if !persistence.is_dirty() {
                    continue;
                }
                if let Err(err) = persistence.persist().await {
                    // state stays dirty; the next change or shutdown retries
                    warn!(error = %err, "background snapshot save failed");
                }
            }
        }
    }

    if persistence.is_dirty() {
        let saved = persistence.persist().await?;
        info!(mappings = saved, "saved final snapshot");
    }

    debug!("snapshot writer stopped");
    Ok(())
}
