//! In-memory broker for testing and single-process scenarios.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Message, PublishError, Publisher};

/// In-memory broker keeping an append-only log per destination.
///
/// Features:
/// - Thread-safe (clones share the same logs)
/// - Per-destination ordering is the publish order
/// - Destinations can be marked as rejecting to exercise failure paths
///
/// ## Example
///
/// ```
/// use buffered_producer::bus::{InMemoryBroker, Message, Publisher};
///
/// let broker = InMemoryBroker::new();
/// broker.publish(&"orders", Message::new("m1", b"{}".to_vec())).unwrap();
///
/// assert_eq!(broker.len(), 1);
/// assert_eq!(broker.messages(&"orders")[0].id, "m1");
/// ```
#[derive(Clone)]
pub struct InMemoryBroker<D> {
    logs: Arc<RwLock<HashMap<D, Vec<Message>>>>,
    rejecting: Arc<RwLock<HashSet<D>>>,
}

impl<D> Default for InMemoryBroker<D> {
    fn default() -> Self {
        Self {
            logs: Arc::new(RwLock::new(HashMap::new())),
            rejecting: Arc::new(RwLock::new(HashSet::new())),
        }
    }
}

impl<D: Eq + Hash + Clone> InMemoryBroker<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every message published to `destination` from now on.
    pub fn reject(&self, destination: D) {
        self.rejecting
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(destination);
    }

    /// Accept messages for `destination` again.
    pub fn accept(&self, destination: &D) {
        self.rejecting
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(destination);
    }

    /// Messages published to a destination, in publish order.
    pub fn messages(&self, destination: &D) -> Vec<Message> {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(destination)
            .cloned()
            .unwrap_or_default()
    }

    /// Destinations that received at least one message.
    pub fn destinations(&self) -> Vec<D> {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Total messages across all destinations.
    pub fn len(&self) -> usize {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_rejecting(&self, destination: &D) -> bool {
        self.rejecting
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(destination)
    }
}

impl<D> Publisher<D> for InMemoryBroker<D>
where
    D: Eq + Hash + Clone + std::fmt::Display + Send + Sync,
{
    fn publish(&self, destination: &D, message: Message) -> Result<(), PublishError> {
        if self.is_rejecting(destination) {
            return Err(PublishError::Rejected(format!(
                "{} refused message {}",
                destination, message.id
            )));
        }

        let mut logs = self
            .logs
            .write()
            .map_err(|_| PublishError::ConnectionFailed("broker log poisoned".to_string()))?;
        logs.entry(destination.clone()).or_default().push(message);
        Ok(())
    }
}
