//! The alias mapping store and the service that keeps it durable.
//!
//! [`AliasStore`] owns the bijection between aliases and URLs and never
//! performs I/O. [`ShortenerService`] wraps a store together with a
//! [`DurableStorage`](shortly_core::DurableStorage) medium: it restores the
//! store on open and mirrors new mappings to storage outside the store's
//! critical section, either on demand or from a background writer task.

pub mod service;
pub mod store;
pub mod writer;

pub use service::{ServiceSettings, ShortenerService, DEFAULT_BASE_URL};
pub use store::{AliasStore, StoreSettings, DEFAULT_MAX_ATTEMPTS};
pub use writer::WriterHandle;
