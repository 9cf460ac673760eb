//! Wire-level message and publisher traits for broker-backed transports.

use std::error::Error;

use thiserror::Error;

/// An encoded event on its way to a broker.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Unique identifier for this message
    pub id: String,
    /// Serialized payload (JSON or bitcode)
    pub payload: Vec<u8>,
    /// Optional metadata (headers, content type, correlation IDs, etc.)
    pub metadata: Option<Vec<(String, String)>>,
}

impl Message {
    pub fn new(id: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            payload,
            metadata: None,
        }
    }

    /// Create a message with a JSON payload.
    pub fn encode_json<T: serde::Serialize>(
        id: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(payload)?;
        Ok(Self::new(id, bytes))
    }

    /// Create a message with a bitcode-serialized payload.
    pub fn encode_bitcode<T: serde::Serialize>(
        id: impl Into<String>,
        payload: &T,
    ) -> Result<Self, bitcode::Error> {
        let bytes = bitcode::serialize(payload)?;
        Ok(Self::new(id, bytes))
    }

    pub fn decode_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    pub fn decode_bitcode<T: serde::de::DeserializeOwned>(&self) -> Result<T, bitcode::Error> {
        bitcode::deserialize(&self.payload)
    }

    /// Add metadata to the message.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// First metadata value stored under `key`.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Error type for publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
    #[error("Message rejected: {0}")]
    Rejected(String),
    #[error("Publish timeout")]
    Timeout,
    #[error("Publish error: {0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}

/// A broker client that accepts messages for a destination.
///
/// Implementations might include:
/// - `InMemoryBroker` - For testing and single-process scenarios
/// - an AMQP channel publishing to `Route { exchange, routing_key }`
/// - a Kafka producer keyed by topic name
pub trait Publisher<D>: Send + Sync {
    /// Publish a single message.
    fn publish(&self, destination: &D, message: Message) -> Result<(), PublishError>;

    /// Publish all messages staged for one destination.
    ///
    /// Default implementation publishes sequentially and stops at the first
    /// failure. Implementations may override for batch optimization.
    fn publish_batch(&self, destination: &D, messages: Vec<Message>) -> Result<(), PublishError> {
        for message in messages {
            self.publish(destination, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct OrderPlaced {
        id: u64,
        sku: String,
    }

    #[test]
    fn message_with_metadata() {
        let message = Message::new("msg-1", b"{}".to_vec())
            .with_metadata("content-type", "application/json")
            .with_metadata("correlation-id", "abc-123");

        assert_eq!(message.metadata_value("correlation-id"), Some("abc-123"));
        assert_eq!(message.metadata_value("missing"), None);
        assert_eq!(message.payload_str(), Some("{}"));
    }

    #[test]
    fn json_and_bitcode_payloads() {
        let event = OrderPlaced {
            id: 7,
            sku: "A-1".into(),
        };

        let json = Message::encode_json("msg-1", &event).unwrap();
        assert_eq!(json.payload_str(), Some(r#"{"id":7,"sku":"A-1"}"#));
        assert_eq!(json.decode_json::<OrderPlaced>().unwrap(), event);

        let bin = Message::encode_bitcode("msg-2", &event).unwrap();
        assert_eq!(bin.decode_bitcode::<OrderPlaced>().unwrap(), event);
    }

    #[test]
    fn default_batch_stops_at_first_failure() {
        use std::sync::Mutex;

        struct FailsOnSecond {
            seen: Mutex<Vec<String>>,
        }

        impl Publisher<&'static str> for FailsOnSecond {
            fn publish(&self, _: &&'static str, message: Message) -> Result<(), PublishError> {
                let mut seen = self.seen.lock().unwrap();
                if seen.len() == 1 {
                    return Err(PublishError::Rejected(message.id));
                }
                seen.push(message.id);
                Ok(())
            }
        }

        let publisher = FailsOnSecond {
            seen: Mutex::new(Vec::new()),
        };
        let batch = vec![
            Message::new("m1", Vec::new()),
            Message::new("m2", Vec::new()),
            Message::new("m3", Vec::new()),
        ];

        let err = publisher.publish_batch(&"orders", batch).unwrap_err();
        assert!(matches!(err, PublishError::Rejected(id) if id == "m2"));
        assert_eq!(*publisher.seen.lock().unwrap(), vec!["m1".to_string()]);
    }
}
