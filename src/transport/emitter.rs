use std::fmt::Display;
use std::sync::Mutex;

use event_emitter_rs::EventEmitter;
use serde::Serialize;
use tracing::debug;

use super::Transport;
use crate::error::TransportError;
use crate::queue::QueueTable;

/// Transport that fires in-process listeners instead of talking to a broker.
///
/// The destination's display string is the emitter event name; the listener
/// receives the JSON-encoded event as a `String`. Listeners run on the
/// emitter's own threads, so delivery returns before they finish.
///
/// ```ignore
/// let mut emitter = EventEmitter::new();
/// emitter.on("orders", |payload: String| println!("order: {}", payload));
///
/// let producer = BufferedProducer::new(EmitterTransport::new(emitter));
/// ```
pub struct EmitterTransport {
    emitter: Mutex<EventEmitter>,
}

impl EmitterTransport {
    pub fn new(emitter: EventEmitter) -> Self {
        EmitterTransport {
            emitter: Mutex::new(emitter),
        }
    }
}

impl<D, E> Transport<D, E> for EmitterTransport
where
    D: Display,
    E: Serialize,
{
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| TransportError::Unavailable("event emitter poisoned".to_string()))?;

        for (destination, events) in batch.iter() {
            let name = destination.to_string();
            for event in events {
                let payload = serde_json::to_string(event)?;
                emitter.emit(&name, payload);
            }
            debug!(destination = %name, events = events.len(), "emitted");
        }
        Ok(())
    }
}
