use std::fmt::Display;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

use super::Transport;
use crate::error::TransportError;
use crate::queue::QueueTable;

/// Transport that writes every flushed event to the log.
///
/// Each event becomes one `info` record and, when a buffer is attached, one
/// `[PRODUCER] <destination> <json>` line appended to it.
#[derive(Default, Clone)]
pub struct LogTransport {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl LogTransport {
    pub fn new() -> Self {
        LogTransport { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogTransport {
            buffer: Some(buffer),
        }
    }
}

impl<D, E> Transport<D, E> for LogTransport
where
    D: Display,
    E: Serialize,
{
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        for (destination, events) in batch.iter() {
            for event in events {
                let payload = serde_json::to_string(event)?;
                info!(destination = %destination, payload = %payload, "event flushed");

                if let Some(buffer) = &self.buffer {
                    let mut buffer = buffer.lock().map_err(|_| {
                        TransportError::Unavailable("log transport buffer poisoned".to_string())
                    })?;
                    buffer.push(format!("[PRODUCER] {} {}", destination, payload));
                }
            }
        }
        Ok(())
    }
}
