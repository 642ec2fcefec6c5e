//! Core types and traits for the shortly alias store.
//!
//! This crate provides the domain types shared by the generator, storage
//! and shortener crates: aliases, mappings, the URL admission predicate,
//! the snapshot layout, and the traits at the seams between them.

pub mod alias;
pub mod error;
pub mod mapping;
pub mod shortener;
pub mod snapshot;
pub mod storage;
pub mod url_validator;

pub use alias::{Alias, ALPHABET, DEFAULT_ALIAS_LENGTH};
pub use error::{CoreError, StorageError, StoreError};
pub use mapping::Mapping;
pub use shortener::{Shortened, Shortener};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use storage::DurableStorage;
pub use url_validator::{is_valid_url, validate_url};
