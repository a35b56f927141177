//! The default domain message type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Metadata;
use crate::clock::{Clock, truncate_to_micros};

/// A single domain occurrence with identity, version, type, payload, metadata
/// and creation timestamp.
///
/// Messages are immutable values; the `with_*` methods return adjusted
/// copies. `created_at` is always held at microsecond precision so that it
/// survives persistence unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMessage {
    uuid: Uuid,
    version: i64,
    message_name: String,
    payload: Metadata,
    metadata: Metadata,
    created_at: DateTime<Utc>,
}

impl DomainMessage {
    /// Creates a version 1 message with a fresh identifier and no metadata.
    #[must_use]
    pub fn new(message_name: impl Into<String>, payload: Metadata, clock: &dyn Clock) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            version: 1,
            message_name: message_name.into(),
            payload,
            metadata: Metadata::new(),
            created_at: clock.now_micros(),
        }
    }

    /// Rebuilds a message from already-known parts.
    #[must_use]
    pub fn from_parts(
        uuid: Uuid,
        version: i64,
        message_name: impl Into<String>,
        payload: Metadata,
        metadata: Metadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            uuid,
            version,
            message_name: message_name.into(),
            payload,
            metadata,
            created_at: truncate_to_micros(created_at),
        }
    }

    /// Globally unique message identifier.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Position of the message within its stream.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Type discriminator used to rebuild the message on load.
    #[must_use]
    pub fn message_name(&self) -> &str {
        &self.message_name
    }

    /// Message body.
    #[must_use]
    pub fn payload(&self) -> &Metadata {
        &self.payload
    }

    /// Key-value annotations, such as a tenant or causation id.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Creation time, truncated to microseconds.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the stream version.
    #[must_use]
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Replaces the uuid.
    #[must_use]
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    /// Replaces the timestamp, truncating it to microseconds.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = truncate_to_micros(created_at);
        self
    }

    /// Replaces all metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds or overwrites one metadata entry.
    #[must_use]
    pub fn with_added_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};
    use serde_json::json;

    use super::DomainMessage;
    use crate::Metadata;
    use crate::clock::Clock;

    struct StaticClock;

    impl Clock for StaticClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
                .unwrap()
                .with_nanosecond(500_000_999)
                .unwrap()
        }
    }

    fn payload() -> Metadata {
        json!({"name": "Ada"}).as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_message_starts_at_version_one_without_metadata() {
        let message = DomainMessage::new("user.registered", payload(), &StaticClock);

        assert_eq!(message.version(), 1);
        assert_eq!(message.message_name(), "user.registered");
        assert_eq!(message.payload(), &payload());
        assert!(message.metadata().is_empty());
        assert_eq!(message.created_at().nanosecond(), 500_000_000);
    }

    #[test]
    fn test_with_added_metadata_keeps_existing_entries() {
        let message = DomainMessage::new("user.registered", payload(), &StaticClock)
            .with_added_metadata("tenant", "a")
            .with_added_metadata("causation", 7);

        assert_eq!(message.metadata().get("tenant"), Some(&json!("a")));
        assert_eq!(message.metadata().get("causation"), Some(&json!(7)));
    }

    #[test]
    fn test_with_metadata_replaces_all_entries() {
        let replacement = json!({"tenant": "b"}).as_object().cloned().unwrap();

        let message = DomainMessage::new("user.registered", payload(), &StaticClock)
            .with_added_metadata("tenant", "a")
            .with_added_metadata("causation", 7)
            .with_metadata(replacement.clone());

        assert_eq!(message.metadata(), &replacement);
        assert!(message.metadata().get("causation").is_none());
    }

    #[test]
    fn test_with_created_at_truncates_to_microseconds() {
        let at = Utc
            .with_ymd_and_hms(2020, 2, 29, 23, 59, 59)
            .unwrap()
            .with_nanosecond(1_999)
            .unwrap();

        let message = DomainMessage::new("x", Metadata::new(), &StaticClock).with_created_at(at);

        assert_eq!(message.created_at().nanosecond(), 1_000);
    }
}
