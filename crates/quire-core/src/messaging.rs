//! Conversion between messages and their plain key-value form.
//!
//! A [`MessageConverter`] extracts [`MessageData`] from a message. The data
//! is loosely typed on purpose: a converter may leave keys out, and
//! [`assert_message_data`] is where a missing key becomes a
//! [`ValidationError`]. A [`MessageFactory`] goes the other way, building a
//! message from its name and validated [`MessageFields`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Metadata;
use crate::error::{MessageFactoryError, ValidationError};
use crate::message::DomainMessage;

/// Key-value extraction of a message. Every key may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageData {
    /// Message identifier.
    pub uuid: Option<Uuid>,
    /// Stream version; must be at least 1.
    pub version: Option<i64>,
    /// Name the factory rebuilds the message from; must be non-empty.
    pub message_name: Option<String>,
    /// Message body.
    pub payload: Option<Metadata>,
    /// Annotations; keys must be non-empty.
    pub metadata: Option<Metadata>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// Message data that passed [`assert_message_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMessageData {
    /// Non-empty message name.
    pub message_name: String,
    /// The remaining fields, all present.
    pub fields: MessageFields,
}

/// Everything a factory needs besides the message name.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageFields {
    /// Message identifier.
    pub uuid: Uuid,
    /// Stream version.
    pub version: i64,
    /// Message body.
    pub payload: Metadata,
    /// Annotations.
    pub metadata: Metadata,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Extracts the plain key-value form of a message.
pub trait MessageConverter<M>: Send + Sync {
    /// Converts `message` into its key-value form.
    fn convert_to_array(&self, message: &M) -> MessageData;
}

/// Builds messages from their name and fields.
pub trait MessageFactory<M>: Send + Sync {
    /// Creates the message registered under `message_name`.
    ///
    /// # Errors
    ///
    /// Returns `MessageFactoryError` if the name is unknown or the payload
    /// does not fit the named message.
    fn create_message_from_array(
        &self,
        message_name: &str,
        fields: MessageFields,
    ) -> Result<M, MessageFactoryError>;
}

/// Converter for [`DomainMessage`] that copies its fields unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMessageConverter;

impl MessageConverter<DomainMessage> for NoOpMessageConverter {
    fn convert_to_array(&self, message: &DomainMessage) -> MessageData {
        MessageData {
            uuid: Some(message.uuid()),
            version: Some(message.version()),
            message_name: Some(message.message_name().to_owned()),
            payload: Some(message.payload().clone()),
            metadata: Some(message.metadata().clone()),
            created_at: Some(message.created_at()),
        }
    }
}

/// Factory that accepts any message name and builds a [`DomainMessage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericMessageFactory;

impl MessageFactory<DomainMessage> for GenericMessageFactory {
    fn create_message_from_array(
        &self,
        message_name: &str,
        fields: MessageFields,
    ) -> Result<DomainMessage, MessageFactoryError> {
        if message_name.is_empty() {
            return Err(MessageFactoryError::UnknownMessageName(String::new()));
        }
        Ok(DomainMessage::from_parts(
            fields.uuid,
            fields.version,
            message_name,
            fields.payload,
            fields.metadata,
            fields.created_at,
        ))
    }
}

/// Checks that converted message data is complete and well formed.
///
/// # Errors
///
/// Returns `ValidationError::MissingField` for the first absent key (in the
/// order uuid, version, `message_name`, payload, metadata, `created_at`),
/// or the matching variant when the name is empty, the version is below 1,
/// or a metadata key is empty.
pub fn assert_message_data(data: MessageData) -> Result<ValidatedMessageData, ValidationError> {
    let uuid = data
        .uuid
        .ok_or(ValidationError::MissingField { field: "uuid" })?;
    let version = data
        .version
        .ok_or(ValidationError::MissingField { field: "version" })?;
    let message_name = data.message_name.ok_or(ValidationError::MissingField {
        field: "message_name",
    })?;
    let payload = data
        .payload
        .ok_or(ValidationError::MissingField { field: "payload" })?;
    let metadata = data
        .metadata
        .ok_or(ValidationError::MissingField { field: "metadata" })?;
    let created_at = data
        .created_at
        .ok_or(ValidationError::MissingField { field: "created_at" })?;

    if message_name.is_empty() {
        return Err(ValidationError::EmptyMessageName);
    }
    if version < 1 {
        return Err(ValidationError::InvalidVersion(version));
    }
    if metadata.keys().any(String::is_empty) {
        return Err(ValidationError::EmptyMetadataKey);
    }

    Ok(ValidatedMessageData {
        message_name,
        fields: MessageFields {
            uuid,
            version,
            payload,
            metadata,
            created_at,
        },
    })
}
