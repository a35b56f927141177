//! Error types shared by every adapter.

use thiserror::Error;

/// Message data or a stream name failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required key is absent from the converted message data.
    #[error("message data is missing required field `{field}`")]
    MissingField {
        /// Name of the missing key.
        field: &'static str,
    },

    /// The message name is an empty string.
    #[error("message_name must be a non-empty string")]
    EmptyMessageName,

    /// The version is below 1.
    #[error("version must be a positive integer, got {0}")]
    InvalidVersion(i64),

    /// A metadata key is an empty string.
    #[error("metadata keys must be non-empty strings")]
    EmptyMetadataKey,

    /// A stream name is an empty string.
    #[error("stream name must not be empty")]
    EmptyStreamName,
}

/// A message factory refused to build a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageFactoryError {
    /// No message type is registered under the given name.
    #[error("unknown message name: {0}")]
    UnknownMessageName(String),

    /// The payload does not fit the shape of the named message.
    #[error("invalid payload for message {message_name}: {reason}")]
    InvalidPayload {
        /// Name of the message being built.
        message_name: String,
        /// Why the payload was rejected.
        reason: String,
    },
}
