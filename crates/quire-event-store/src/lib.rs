//! Quire Event Store: event streams persisted as documents.
//!
//! Each stream maps to one collection of the flat-file document store. Every
//! event becomes one record keyed by the event's uuid. Reads build a
//! filtered, ordered query against the stream's collection and decode the
//! matching records back into messages.

pub mod adapter;
pub mod codec;
pub mod error;
pub mod factory;
pub mod query_builder;
pub mod resolver;

pub use adapter::DocumentEventStoreAdapter;
pub use error::{ConfigurationError, DecodeError, EventStoreError};
pub use factory::EventStoreAdapterFactory;
