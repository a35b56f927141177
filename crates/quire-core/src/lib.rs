//! Quire Core: stream, message and adapter abstractions.
//!
//! This crate defines the types every event store adapter speaks: stream
//! names, streams, domain messages and the helpers that convert messages to
//! and from their plain key-value form. It contains no storage code.

pub mod adapter;
pub mod clock;
pub mod error;
pub mod message;
pub mod messaging;
pub mod stream;

/// Key-value structure used for message payloads and metadata.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
