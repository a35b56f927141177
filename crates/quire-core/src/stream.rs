//! Stream names and streams.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Name of an event stream. Opaque, but never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StreamName(String);

impl StreamName {
    /// Creates a stream name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyStreamName` if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyStreamName);
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StreamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for StreamName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StreamName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StreamName> for String {
    fn from(value: StreamName) -> Self {
        value.0
    }
}

/// A named, ordered sequence of events.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream<M> {
    stream_name: StreamName,
    stream_events: Vec<M>,
}

impl<M> Stream<M> {
    /// Creates a stream value from its name and events.
    #[must_use]
    pub fn new(stream_name: StreamName, stream_events: Vec<M>) -> Self {
        Self {
            stream_name,
            stream_events,
        }
    }

    /// The stream's name.
    #[must_use]
    pub fn stream_name(&self) -> &StreamName {
        &self.stream_name
    }

    /// Events in stream order.
    #[must_use]
    pub fn stream_events(&self) -> &[M] {
        &self.stream_events
    }

    /// Splits the stream into its name and events.
    #[must_use]
    pub fn into_parts(self) -> (StreamName, Vec<M>) {
        (self.stream_name, self.stream_events)
    }
}
