//! Event store adapter abstraction.

use chrono::{DateTime, Utc};

use crate::Metadata;
use crate::stream::{Stream, StreamName};

/// Persists and reads the events of named streams.
///
/// Every call runs to completion on the calling thread. Versions are
/// assigned by the caller; adapters keep them but never allocate or check
/// them.
pub trait EventStoreAdapter: Send + Sync {
    /// Message type the adapter stores.
    type Message;

    /// Error surfaced by every operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes the first batch of events of a new stream.
    ///
    /// # Errors
    ///
    /// Same as [`EventStoreAdapter::append_to`].
    fn create(&self, stream: Stream<Self::Message>) -> Result<(), Self::Error>;

    /// Appends events to a stream, in order.
    ///
    /// The batch is not atomic: when the k-th event fails, events before it
    /// stay persisted and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an event fails validation or cannot be stored.
    fn append_to(
        &self,
        stream_name: &StreamName,
        events: Vec<Self::Message>,
    ) -> Result<(), Self::Error>;

    /// Loads a whole stream, ordered by version. `None` if nothing matches.
    ///
    /// # Errors
    ///
    /// Same as [`EventStoreAdapter::load_events`].
    fn load(
        &self,
        stream_name: &StreamName,
        min_version: Option<i64>,
    ) -> Result<Option<Stream<Self::Message>>, Self::Error>;

    /// Loads events matching every metadata entry with a version of at least
    /// `min_version`, ordered by version.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored event cannot be
    /// decoded.
    fn load_events(
        &self,
        stream_name: &StreamName,
        metadata: &Metadata,
        min_version: Option<i64>,
    ) -> Result<Vec<Self::Message>, Self::Error>;

    /// Loads events matching every metadata entry created at or after
    /// `since`, ordered by creation time and then version.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored event cannot be
    /// decoded.
    fn replay(
        &self,
        stream_name: &StreamName,
        since: Option<DateTime<Utc>>,
        metadata: &Metadata,
    ) -> Result<Vec<Self::Message>, Self::Error>;
}
