use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct StateFileConfig {
    /// File name of the state file inside the temporary directory.
    #[builder(default = "shortly.json".to_string(), setter(into))]
    file_name: String,
    /// Contents written before the test starts. `None` leaves the file absent.
    #[builder(default, setter(strip_option, into))]
    contents: Option<Vec<u8>>,
}

/// Test fixture for a state file inside a disposable directory.
///
/// The directory and everything in it is removed when the fixture drops.
pub struct TempStateFile {
    dir: TempDir,
    path: PathBuf,
}

impl TempStateFile {
    pub fn new(config: StateFileConfig) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(&config.file_name);

        if let Some(contents) = &config.contents {
            std::fs::write(&path, contents)?;
        }

        Ok(Self { dir, path })
    }

    /// A fixture whose state file does not exist yet.
    pub fn absent() -> Result<Self> {
        Self::new(StateFileConfig::builder().build())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the current contents of the state file.
    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}
