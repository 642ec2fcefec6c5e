//! Durable storage media for alias store snapshots.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use shortly_core::{DurableStorage, StorageError};
