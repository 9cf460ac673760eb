use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Transport;
use crate::bus::{Message, Publisher};
use crate::destination::Destination;
use crate::error::TransportError;
use crate::queue::QueueTable;

/// Payload encoding used by [`PublisherTransport`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Json,
    Bitcode,
}

impl Encoding {
    pub fn content_type(self) -> &'static str {
        match self {
            Encoding::Json => "application/json",
            Encoding::Bitcode => "application/x-bitcode",
        }
    }

    fn encode<E: Serialize>(self, id: String, event: &E) -> Result<Message, TransportError> {
        let message = match self {
            Encoding::Json => Message::encode_json(id, event)?,
            Encoding::Bitcode => Message::encode_bitcode(id, event)?,
        };
        Ok(message.with_metadata("content-type", self.content_type()))
    }
}

/// Transport bridging a flush to a broker [`Publisher`].
///
/// Every destination's events are encoded up front and published as one
/// batch. The first failing destination aborts the rest of the flush.
pub struct PublisherTransport<P> {
    publisher: P,
    encoding: Encoding,
    sequence: AtomicU64,
}

impl<P> PublisherTransport<P> {
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            encoding: Encoding::default(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("msg-{}", seq)
    }
}

impl<D, E, P> Transport<D, E> for PublisherTransport<P>
where
    D: Destination,
    E: Serialize,
    P: Publisher<D>,
{
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        for (destination, events) in batch.iter() {
            if events.is_empty() {
                continue;
            }

            let messages = events
                .iter()
                .map(|event| self.encoding.encode(self.next_id(), event))
                .collect::<Result<Vec<_>, _>>()?;
            let count = messages.len();

            if let Err(err) = self.publisher.publish_batch(destination, messages) {
                warn!(destination = %destination, error = %err, "publish failed");
                return Err(err.into());
            }
            debug!(destination = %destination, messages = count, "published");
        }
        Ok(())
    }
}
