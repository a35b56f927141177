//! Store error type.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection name cannot be mapped to a directory.
    #[error("invalid collection name `{0}`: expected 1-63 characters of [A-Za-z0-9_-]")]
    InvalidCollectionName(String),

    /// The document id cannot be mapped to a file name.
    #[error("invalid document id `{0}`: expected 1-128 characters of [A-Za-z0-9_-]")]
    InvalidDocumentId(String),

    /// A document with this id already exists in the collection.
    #[error("document `{id}` already exists in collection `{collection}`")]
    DuplicateKey {
        /// Collection holding the existing document.
        collection: String,
        /// The colliding id.
        id: String,
    },

    /// A document file exists but does not hold a JSON object.
    #[error("corrupt document at {}: {source}", path.display())]
    CorruptDocument {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be serialized.
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Maps an I/O error on `path` to `StoreError::Io`.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
