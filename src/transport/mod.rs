//! Transports - the delivery step behind `BufferedProducer::flush`
//!
//! A transport receives the complete [`QueueTable`] of one context and must
//! deliver every event to its destination. It never needs to clear anything:
//! the producer has already detached the table from the context and drops it
//! after `deliver` returns, whatever the outcome.
//!
//! Included transports:
//! - [`NoopTransport`] - accepts and discards everything
//! - [`LogTransport`] - writes each event to the log (and optionally a buffer)
//! - [`RecordingTransport`] - keeps every delivered batch for inspection
//! - [`PublisherTransport`] - encodes events and hands them to a broker
//! - [`EmitterTransport`] - fires in-process listeners (feature `emitter`)

#[cfg(feature = "emitter")]
mod emitter;
mod log;
mod publisher;
mod recording;

use std::sync::Arc;

use tracing::trace;

use crate::error::TransportError;
use crate::queue::QueueTable;

#[cfg(feature = "emitter")]
pub use emitter::EmitterTransport;
pub use log::LogTransport;
pub use publisher::{Encoding, PublisherTransport};
pub use recording::{Delivery, RecordingTransport};

/// Delivers one context's staged events.
///
/// Return an error rather than dropping events silently. The producer makes
/// a single attempt per flush and discards the table either way.
pub trait Transport<D, E>: Send + Sync {
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError>;
}

impl<D, E, T> Transport<D, E> for Arc<T>
where
    T: Transport<D, E> + ?Sized,
{
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        (**self).deliver(batch)
    }
}

impl<D, E, T> Transport<D, E> for Box<T>
where
    T: Transport<D, E> + ?Sized,
{
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        (**self).deliver(batch)
    }
}

/// Transport that accepts every batch and sends nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransport;

impl<D, E> Transport<D, E> for NoopTransport {
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        trace!(events = batch.event_count(), "noop transport dropped batch");
        Ok(())
    }
}
