//! Typed test events with their own factory and converter.
//!
//! Exercises the adapter with a message type other than `DomainMessage`:
//! the factory picks the variant from the stored event name and refuses
//! names it does not know.

use chrono::{DateTime, Utc};
use quire_core::Metadata;
use quire_core::error::MessageFactoryError;
use quire_core::messaging::{MessageConverter, MessageData, MessageFactory, MessageFields};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a user registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRegistered {
    /// Display name chosen at registration.
    pub name: String,
    /// Contact address.
    pub email: String,
}

/// Emitted when a user changes their display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRenamed {
    /// The new display name.
    pub name: String,
}

/// Event payload variants for the user stream.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEventKind {
    /// Stored as `user.registered`.
    Registered(UserRegistered),
    /// Stored as `user.renamed`.
    Renamed(UserRenamed),
}

/// User event envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEvent {
    /// Event identifier.
    pub uuid: Uuid,
    /// Stream version.
    pub version: i64,
    /// Creation time; keep it at microsecond precision to round-trip.
    pub created_at: DateTime<Utc>,
    /// Annotations.
    pub metadata: Metadata,
    /// Which event this is, with its payload.
    pub kind: UserEventKind,
}

impl UserEvent {
    /// Returns the stored event name of this variant.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match &self.kind {
            UserEventKind::Registered(_) => "user.registered",
            UserEventKind::Renamed(_) => "user.renamed",
        }
    }

    fn payload(&self) -> Option<Metadata> {
        let value = match &self.kind {
            UserEventKind::Registered(e) => serde_json::to_value(e),
            UserEventKind::Renamed(e) => serde_json::to_value(e),
        };
        match value {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Converts `UserEvent`s to message data.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserEventConverter;

impl MessageConverter<UserEvent> for UserEventConverter {
    fn convert_to_array(&self, message: &UserEvent) -> MessageData {
        MessageData {
            uuid: Some(message.uuid),
            version: Some(message.version),
            message_name: Some(message.event_name().to_owned()),
            payload: message.payload(),
            metadata: Some(message.metadata.clone()),
            created_at: Some(message.created_at),
        }
    }
}

/// Builds `UserEvent`s from stored names and fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserEventFactory;

impl MessageFactory<UserEvent> for UserEventFactory {
    fn create_message_from_array(
        &self,
        message_name: &str,
        fields: MessageFields,
    ) -> Result<UserEvent, MessageFactoryError> {
        let payload = serde_json::Value::Object(fields.payload);
        let invalid = |e: serde_json::Error| MessageFactoryError::InvalidPayload {
            message_name: message_name.to_owned(),
            reason: e.to_string(),
        };
        let kind = match message_name {
            "user.registered" => {
                UserEventKind::Registered(serde_json::from_value(payload).map_err(invalid)?)
            }
            "user.renamed" => {
                UserEventKind::Renamed(serde_json::from_value(payload).map_err(invalid)?)
            }
            other => return Err(MessageFactoryError::UnknownMessageName(other.to_owned())),
        };
        Ok(UserEvent {
            uuid: fields.uuid,
            version: fields.version,
            created_at: fields.created_at,
            metadata: fields.metadata,
            kind,
        })
    }
}
