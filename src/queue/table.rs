use std::collections::hash_map;
use std::collections::HashMap;

use crate::destination::Destination;

/// Pending events of one execution context, grouped by destination.
///
/// Events keep send order within a destination. No order is defined across
/// destinations.
#[derive(Debug, Clone)]
pub struct QueueTable<D, E> {
    queues: HashMap<D, Vec<E>>,
}

impl<D, E> Default for QueueTable<D, E> {
    fn default() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }
}

impl<D, E> QueueTable<D, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of destinations with a registered queue (possibly empty).
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Total number of staged events across all destinations.
    pub fn event_count(&self) -> usize {
        self.queues.values().map(Vec::len).sum()
    }

    /// Iterate `(destination, events)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&D, &[E])> {
        self.queues.iter().map(|(d, events)| (d, events.as_slice()))
    }

    pub fn destinations(&self) -> impl Iterator<Item = &D> {
        self.queues.keys()
    }

    pub fn into_inner(self) -> HashMap<D, Vec<E>> {
        self.queues
    }
}

impl<D: Destination, E> QueueTable<D, E> {
    /// Append an event to the end of a destination's queue.
    pub fn push(&mut self, destination: D, event: E) {
        self.queue_mut(destination).push(event);
    }

    /// Queue for a destination, registering an empty one if absent.
    pub fn queue_mut(&mut self, destination: D) -> &mut Vec<E> {
        self.queues.entry(destination).or_default()
    }

    pub fn get(&self, destination: &D) -> Option<&[E]> {
        self.queues.get(destination).map(Vec::as_slice)
    }

    pub fn contains(&self, destination: &D) -> bool {
        self.queues.contains_key(destination)
    }
}

impl<D, E> IntoIterator for QueueTable<D, E> {
    type Item = (D, Vec<E>);
    type IntoIter = hash_map::IntoIter<D, Vec<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.queues.into_iter()
    }
}
