use async_trait::async_trait;
use shortly_core::storage::{DurableStorage, Result};
use shortly_core::StorageError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Stores the snapshot in a single file.
///
/// Saves write a sibling `*.tmp` file, flush it to disk and rename it over
/// the target, so a reader never sees a half-written snapshot. Saves are
/// serialized so the last call always wins.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::PermissionDenied => {
            StorageError::Unavailable(format!("failed to {action} {}: {err}", path.display()))
        }
        _ => StorageError::Io(format!("failed to {action} {}: {err}", path.display())),
    }
}

#[async_trait]
impl DurableStorage for FileStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(blob) => {
                debug!(path = %self.path.display(), bytes = blob.len(), "loaded state file");
                Ok(Some(blob))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "state file does not exist, starting empty");
                Ok(None)
            }
            Err(err) => Err(io_error("read", &self.path, err)),
        }
    }

    async fn save(&self, blob: &[u8]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(err) = self.replace_with(&temp_path, blob).await {
            // the target is untouched; only the partial temp file is removed
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "failed to remove temp file"
                    );
                }
            }
            return Err(err);
        }

        debug!(path = %self.path.display(), bytes = blob.len(), "saved state file");
        Ok(())
    }
}

impl FileStorage {
    async fn replace_with(&self, temp_path: &Path, blob: &[u8]) -> Result<()> {
        let mut file = fs::File::create(temp_path)
            .await
            .map_err(|e| io_error("create", temp_path, e))?;
        file.write_all(blob)
            .await
            .map_err(|e| io_error("write", temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| io_error("sync", temp_path, e))?;
        drop(file);

        fs::rename(temp_path, &self.path)
            .await
            .map_err(|e| io_error("replace", &self.path, e))
    }
}
