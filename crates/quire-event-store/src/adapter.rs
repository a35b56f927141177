//! Document-store implementation of the `EventStoreAdapter` trait.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use quire_core::Metadata;
use quire_core::adapter::EventStoreAdapter;
use quire_core::message::DomainMessage;
use quire_core::messaging::{
    GenericMessageFactory, MessageConverter, MessageFactory, NoOpMessageConverter,
};
use quire_core::stream::{Stream, StreamName};
use quire_docstore::Query;

use crate::codec::RecordCodec;
use crate::error::EventStoreError;
use crate::query_builder::{load_events_query, replay_query};
use crate::resolver::StreamCollectionResolver;

/// Event store adapter that keeps one document collection per stream.
///
/// Every call resolves the stream's collection and reads or writes it
/// directly; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct DocumentEventStoreAdapter<
    M = DomainMessage,
    F = GenericMessageFactory,
    C = NoOpMessageConverter,
> {
    resolver: StreamCollectionResolver,
    codec: RecordCodec<M, F, C>,
}

impl<M, F, C> DocumentEventStoreAdapter<M, F, C>
where
    F: MessageFactory<M>,
    C: MessageConverter<M>,
{
    /// Creates an adapter rooted at `root_dir`. The directory is not
    /// checked; see `EventStoreAdapterFactory` for validated construction.
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>, factory: F, converter: C) -> Self {
        Self {
            resolver: StreamCollectionResolver::new(root_dir),
            codec: RecordCodec::new(factory, converter),
        }
    }

    /// Directory holding the stream collections.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        self.resolver.root_dir()
    }

    fn insert_event(&self, stream_name: &StreamName, event: &M) -> Result<(), EventStoreError> {
        let repository = self.resolver.resolve(stream_name)?;
        let document = self.codec.encode(event)?;
        repository.insert(&document)?;
        Ok(())
    }

    fn read(&self, stream_name: &StreamName, query: &Query) -> Result<Vec<M>, EventStoreError> {
        let repository = self.resolver.resolve(stream_name)?;
        repository
            .execute(query)?
            .into_iter()
            .map(|document| self.codec.decode(document))
            .collect()
    }
}

impl<M, F, C> EventStoreAdapter for DocumentEventStoreAdapter<M, F, C>
where
    F: MessageFactory<M>,
    C: MessageConverter<M>,
{
    type Message = M;
    type Error = EventStoreError;

    fn create(&self, stream: Stream<M>) -> Result<(), EventStoreError> {
        let (stream_name, events) = stream.into_parts();
        self.append_to(&stream_name, events)
    }

    fn append_to(&self, stream_name: &StreamName, events: Vec<M>) -> Result<(), EventStoreError> {
        let count = events.len();
        for event in &events {
            self.insert_event(stream_name, event)?;
        }
        tracing::debug!(stream = %stream_name, count, "appended events");
        Ok(())
    }

    fn load(
        &self,
        stream_name: &StreamName,
        min_version: Option<i64>,
    ) -> Result<Option<Stream<M>>, EventStoreError> {
        let events = self.load_events(stream_name, &Metadata::new(), min_version)?;
        if events.is_empty() {
            return Ok(None);
        }
        Ok(Some(Stream::new(stream_name.clone(), events)))
    }

    fn load_events(
        &self,
        stream_name: &StreamName,
        metadata: &Metadata,
        min_version: Option<i64>,
    ) -> Result<Vec<M>, EventStoreError> {
        let events = self.read(stream_name, &load_events_query(metadata, min_version))?;
        tracing::debug!(
            stream = %stream_name,
            filters = metadata.len(),
            min_version = ?min_version,
            loaded = events.len(),
            "loaded events"
        );
        Ok(events)
    }

    fn replay(
        &self,
        stream_name: &StreamName,
        since: Option<DateTime<Utc>>,
        metadata: &Metadata,
    ) -> Result<Vec<M>, EventStoreError> {
        let events = self.read(stream_name, &replay_query(metadata, since))?;
        tracing::debug!(
            stream = %stream_name,
            filters = metadata.len(),
            since = ?since,
            replayed = events.len(),
            "replayed events"
        );
        Ok(events)
    }
}
