use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::Transport;
use crate::error::TransportError;
use crate::queue::QueueTable;

/// Events handed to a transport for one destination in one flush.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery<D, E> {
    pub flush: usize,
    pub destination: D,
    pub events: Vec<E>,
}

struct RecordingState<D, E> {
    deliveries: Vec<Delivery<D, E>>,
    flushes: usize,
    failures: usize,
    failure_reason: String,
}

/// Transport that records every batch instead of sending it.
///
/// Clones share the same record, so keep one handle for assertions and give
/// another to the producer. [`fail_next`](Self::fail_next) makes upcoming
/// deliveries fail without recording anything.
pub struct RecordingTransport<D, E> {
    state: Arc<Mutex<RecordingState<D, E>>>,
}

impl<D, E> Clone for RecordingTransport<D, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<D, E> Default for RecordingTransport<D, E> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(RecordingState {
                deliveries: Vec::new(),
                flushes: 0,
                failures: 0,
                failure_reason: String::new(),
            })),
        }
    }
}

impl<D, E> RecordingTransport<D, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` deliveries with `reason`.
    pub fn fail_next(&self, count: usize, reason: impl Into<String>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.failures = count;
        state.failure_reason = reason.into();
    }

    /// Number of successful deliveries so far.
    pub fn flush_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flushes
    }

    pub fn is_empty(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .deliveries
            .is_empty()
    }
}

impl<D: Clone, E: Clone> RecordingTransport<D, E> {
    /// Every recorded delivery, oldest flush first.
    pub fn deliveries(&self) -> Vec<Delivery<D, E>> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .deliveries
            .clone()
    }
}

impl<D: PartialEq, E: Clone> RecordingTransport<D, E> {
    /// All events delivered to a destination across every flush, in order.
    pub fn events_for(&self, destination: &D) -> Vec<E> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .deliveries
            .iter()
            .filter(|d| &d.destination == destination)
            .flat_map(|d| d.events.iter().cloned())
            .collect()
    }
}

impl<D, E> Transport<D, E> for RecordingTransport<D, E>
where
    D: Clone + Send,
    E: Clone + Send,
{
    fn deliver(&self, batch: &QueueTable<D, E>) -> Result<(), TransportError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransportError::Unavailable("recording log poisoned".to_string()))?;

        if state.failures > 0 {
            state.failures -= 1;
            return Err(TransportError::Unavailable(state.failure_reason.clone()));
        }

        state.flushes += 1;
        let flush = state.flushes;
        for (destination, events) in batch.iter() {
            state.deliveries.push(Delivery {
                flush,
                destination: destination.clone(),
                events: events.to_vec(),
            });
        }
        debug!(flush, destinations = batch.len(), "recorded batch");
        Ok(())
    }
}
