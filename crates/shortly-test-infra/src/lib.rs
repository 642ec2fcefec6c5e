//! Fixtures shared by the workspace's integration tests.

pub mod error;
pub mod state_file;
pub mod storage;

pub use error::{Result, TestInfraError};
pub use state_file::{StateFileConfig, TempStateFile};
pub use storage::{FailingStorage, RecordingStorage};
