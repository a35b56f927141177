//! Converters that produce incomplete message data.

use quire_core::message::DomainMessage;
use quire_core::messaging::{MessageConverter, MessageData, NoOpMessageConverter};

/// A converter that leaves one key out of the converted data. Used to
/// exercise the missing-field validation path.
#[derive(Debug, Clone, Copy)]
pub struct DroppingMessageConverter {
    field: &'static str,
}

impl DroppingMessageConverter {
    /// Drops `field`, one of `uuid`, `version`, `message_name`, `payload`,
    /// `metadata` or `created_at`.
    ///
    /// # Panics
    ///
    /// Panics on any other field name.
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        assert!(
            matches!(
                field,
                "uuid" | "version" | "message_name" | "payload" | "metadata" | "created_at"
            ),
            "unknown message data field {field}"
        );
        Self { field }
    }
}

impl MessageConverter<DomainMessage> for DroppingMessageConverter {
    fn convert_to_array(&self, message: &DomainMessage) -> MessageData {
        let mut data = NoOpMessageConverter.convert_to_array(message);
        match self.field {
            "uuid" => data.uuid = None,
            "version" => data.version = None,
            "message_name" => data.message_name = None,
            "payload" => data.payload = None,
            "metadata" => data.metadata = None,
            _ => data.created_at = None,
        }
        data
    }
}
