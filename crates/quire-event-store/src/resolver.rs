//! Stream name to collection mapping.

use std::path::{Path, PathBuf};

use quire_core::stream::StreamName;
use quire_docstore::{Config, Repository, StoreError};

/// Maps each stream to the collection of the same name under a root
/// directory. Resolving performs no I/O; the collection directory appears
/// with the stream's first write.
#[derive(Debug, Clone)]
pub struct StreamCollectionResolver {
    config: Config,
}

impl StreamCollectionResolver {
    /// Creates a resolver over `root_dir`.
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::new(root_dir),
        }
    }

    /// Directory holding one collection per stream.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        self.config.path()
    }

    /// Returns the collection holding `stream_name`'s records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidCollectionName` if the stream name is not
    /// a usable collection name (1-63 characters of `[A-Za-z0-9_-]`).
    pub fn resolve(&self, stream_name: &StreamName) -> Result<Repository, StoreError> {
        Repository::new(stream_name.as_str(), &self.config)
    }
}
