//! Store configuration.

use std::path::{Path, PathBuf};

/// Root location under which every collection directory lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    path: PathBuf,
}

impl Config {
    /// Creates a configuration rooted at `path`. No I/O is performed.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the documents of `collection`.
    #[must_use]
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.path.join(collection)
    }
}
