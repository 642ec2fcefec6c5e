use thiserror::Error;

/// Result type for alias store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Validation failures of core domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Failures of the durable storage medium.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage i/o failed: {0}")]
    Io(String),
}

/// Errors reported by the alias mapping store and the services around it.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("alias not found: {0}")]
    NotFound(String),
    #[error("alias space exhausted after {attempts} attempts")]
    AliasSpaceExhausted { attempts: usize },
    #[error("corrupt state: {0}")]
    CorruptState(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CoreError> for StoreError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidUrl(message) => Self::InvalidUrl(message),
            // a malformed code can never have been issued
            CoreError::InvalidAlias(message) => Self::NotFound(message),
        }
    }
}
