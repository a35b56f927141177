//! Translation between messages and stored records.
//!
//! A record is a flat document:
//!
//! ```text
//! {
//!   "event_id":   "<uuid>",          // also the document key
//!   "version":    3,
//!   "event_name": "user.registered",
//!   "payload":    { ... },
//!   "metadata":   { ... },
//!   "created_at": "2026-01-15T10:00:00.123456"
//! }
//! ```
//!
//! `created_at` is UTC with exactly six fractional digits and no offset
//! suffix. Fixed width keeps string comparison in step with time order,
//! which the replay query relies on.

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDateTime, Utc};
use quire_core::Metadata;
use quire_core::messaging::{
    MessageConverter, MessageFactory, MessageFields, ValidatedMessageData, assert_message_data,
};
use quire_docstore::Document;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{DecodeError, EventStoreError};

/// `strftime` pattern of the stored `created_at` field.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Field holding the event uuid.
pub const EVENT_ID: &str = "event_id";
/// Field holding the stream version.
pub const VERSION: &str = "version";
/// Field holding the message name.
pub const EVENT_NAME: &str = "event_name";
/// Field holding the event body.
pub const PAYLOAD: &str = "payload";
/// Field holding the metadata map.
pub const METADATA: &str = "metadata";
/// Field holding the formatted creation time.
pub const CREATED_AT: &str = "created_at";

/// Formats a timestamp the way records store it.
#[must_use]
pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.format(CREATED_AT_FORMAT).to_string()
}

/// Parses a stored timestamp. Anything but the exact format is rejected.
#[must_use]
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// The persisted form of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Event uuid; also the document id.
    pub event_id: Uuid,
    /// Position of the event in its stream, starting at 1.
    pub version: i64,
    /// Name the factory uses to pick the message type.
    pub event_name: String,
    /// Event body.
    pub payload: Metadata,
    /// Key-value annotations that reads can filter on.
    pub metadata: Metadata,
    /// Creation time, microsecond precision.
    pub created_at: DateTime<Utc>,
}

impl From<ValidatedMessageData> for Record {
    fn from(data: ValidatedMessageData) -> Self {
        let MessageFields {
            uuid,
            version,
            payload,
            metadata,
            created_at,
        } = data.fields;
        Self {
            event_id: uuid,
            version,
            event_name: data.message_name,
            payload,
            metadata,
            created_at,
        }
    }
}

impl Record {
    /// Builds the document to store, keyed by the event id.
    #[must_use]
    pub fn into_document(self) -> Document {
        let id = self.event_id.to_string();
        let mut fields = Map::new();
        fields.insert(EVENT_ID.to_owned(), Value::String(id.clone()));
        fields.insert(VERSION.to_owned(), Value::from(self.version));
        fields.insert(EVENT_NAME.to_owned(), Value::String(self.event_name));
        fields.insert(PAYLOAD.to_owned(), Value::Object(self.payload));
        fields.insert(METADATA.to_owned(), Value::Object(self.metadata));
        fields.insert(
            CREATED_AT.to_owned(),
            Value::String(format_created_at(self.created_at)),
        );
        Document::new(id, fields)
    }

    /// Reads a record back from a stored document.
    ///
    /// `payload` and `metadata` are coerced to objects: `null` becomes an
    /// empty object and an array becomes an object keyed by element index.
    /// `version` must be stored as an integer.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidCreatedAt` if `created_at` does not
    /// match [`CREATED_AT_FORMAT`], and `MissingField`/`InvalidField` for
    /// any other absent or mistyped field.
    pub fn from_document(document: Document) -> Result<Self, DecodeError> {
        let key = document.id().to_owned();
        let mut fields = document.into_fields();

        let event_id = match take(&mut fields, &key, EVENT_ID)? {
            Value::String(raw) => {
                Uuid::parse_str(&raw).map_err(|e| invalid(&key, EVENT_ID, e.to_string()))?
            }
            other => {
                return Err(invalid(&key, EVENT_ID, format!("expected a string, got {other}")));
            }
        };
        let version = integer_version(&key, &take(&mut fields, &key, VERSION)?)?;
        let event_name = match take(&mut fields, &key, EVENT_NAME)? {
            Value::String(name) => name,
            other => {
                return Err(invalid(&key, EVENT_NAME, format!("expected a string, got {other}")));
            }
        };
        let payload = coerce_map(&key, PAYLOAD, take(&mut fields, &key, PAYLOAD)?)?;
        let metadata = coerce_map(&key, METADATA, take(&mut fields, &key, METADATA)?)?;
        let created_at = match take(&mut fields, &key, CREATED_AT)? {
            Value::String(raw) => match parse_created_at(&raw) {
                Some(at) => at,
                None => {
                    return Err(DecodeError::InvalidCreatedAt {
                        event_id: key,
                        value: raw,
                    });
                }
            },
            other => {
                return Err(DecodeError::InvalidCreatedAt {
                    event_id: key,
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            event_id,
            version,
            event_name,
            payload,
            metadata,
            created_at,
        })
    }
}

/// Turns messages into documents and documents back into messages.
///
/// Encoding goes through the converter and the message-data assertion;
/// decoding goes through the record parser and the factory.
#[derive(Debug, Clone)]
pub struct RecordCodec<M, F, C> {
    factory: F,
    converter: C,
    message: PhantomData<fn() -> M>,
}

impl<M, F, C> RecordCodec<M, F, C>
where
    F: MessageFactory<M>,
    C: MessageConverter<M>,
{
    /// Creates a codec from a message factory and converter.
    #[must_use]
    pub fn new(factory: F, converter: C) -> Self {
        Self {
            factory,
            converter,
            message: PhantomData,
        }
    }

    /// Encodes a message as a document keyed by its uuid.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Validation` if the converted message data
    /// is missing a required field or breaks an assertion rule.
    pub fn encode(&self, message: &M) -> Result<Document, EventStoreError> {
        let data = assert_message_data(self.converter.convert_to_array(message))?;
        Ok(Record::from(data).into_document())
    }

    /// Decodes a stored document into a message.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Decode` for a malformed record and
    /// `EventStoreError::MessageFactory` if the factory rejects it.
    pub fn decode(&self, document: Document) -> Result<M, EventStoreError> {
        let record = Record::from_document(document)?;
        let message = self.factory.create_message_from_array(
            &record.event_name,
            MessageFields {
                uuid: record.event_id,
                version: record.version,
                payload: record.payload,
                metadata: record.metadata,
                created_at: record.created_at,
            },
        )?;
        Ok(message)
    }
}

fn take(
    fields: &mut Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Value, DecodeError> {
    fields.remove(field).ok_or_else(|| DecodeError::MissingField {
        event_id: key.to_owned(),
        field,
    })
}

fn invalid(key: &str, field: &'static str, reason: String) -> DecodeError {
    DecodeError::InvalidField {
        event_id: key.to_owned(),
        field,
        reason,
    }
}

/// Only a JSON integer is a version; queries compare the stored value as is.
fn integer_version(key: &str, value: &Value) -> Result<i64, DecodeError> {
    value
        .as_i64()
        .ok_or_else(|| invalid(key, VERSION, format!("expected an integer, got {value}")))
}

fn coerce_map(key: &str, field: &'static str, value: Value) -> Result<Metadata, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect()),
        other => Err(invalid(key, field, format!("expected an object, got {other}"))),
    }
}
