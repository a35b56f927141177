//! Error types for the document-backed adapter.

use std::path::PathBuf;

use quire_core::error::{MessageFactoryError, ValidationError};
use quire_docstore::StoreError;
use thiserror::Error;

/// Error surfaced by every adapter operation.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// An event's converted data is incomplete; nothing was written for it.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored record could not be turned back into an event.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The message factory refused a stored record.
    #[error(transparent)]
    MessageFactory(#[from] MessageFactoryError),

    /// The document store failed; passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A persisted record is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A required record field is absent.
    #[error("record {event_id} has no `{field}` field")]
    MissingField {
        /// Document id of the record.
        event_id: String,
        /// Name of the absent field.
        field: &'static str,
    },

    /// A record field holds a value of the wrong type.
    #[error("record {event_id} has an invalid `{field}` field: {reason}")]
    InvalidField {
        /// Document id of the record.
        event_id: String,
        /// Name of the offending field.
        field: &'static str,
        /// What was expected and what was found.
        reason: String,
    },

    /// `created_at` does not match `YYYY-MM-DDTHH:MM:SS.ffffff`.
    #[error("record {event_id} has an unparseable created_at `{value}`")]
    InvalidCreatedAt {
        /// Document id of the record.
        event_id: String,
        /// The stored value, rendered as text.
        value: String,
    },
}

/// The adapter cannot be built from configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A mandatory option is absent. `option` is its dotted path.
    #[error("mandatory option `{option}` not found")]
    MandatoryOptionNotFound {
        /// Dotted path of the first missing level.
        option: String,
    },

    /// An option is present but has the wrong shape.
    #[error("option `{option}` is invalid: {reason}")]
    InvalidOption {
        /// Dotted path of the option.
        option: String,
        /// What was expected and what was found.
        reason: String,
    },

    /// The configured root is not an existing directory.
    #[error("event store adapter was not able to locate {}", dir.display())]
    DirectoryNotFound {
        /// The configured directory.
        dir: PathBuf,
    },

    /// The YAML source could not be parsed.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON source could not be parsed.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}
