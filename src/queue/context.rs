use tracing::warn;

use super::table::QueueTable;
use crate::destination::Destination;

/// The staging area of one execution context (a request, a transaction, a
/// worker iteration).
///
/// A context is an owned value: every mutation goes through `&mut self`, so a
/// queue table can only ever be touched by whoever holds the context. Share
/// the producer between threads, never the context.
///
/// The table is absent until the first send (or creating lookup) and absent
/// again after a clear or flush.
///
/// ## Example
///
/// ```
/// use buffered_producer::ProducerContext;
///
/// let mut ctx: ProducerContext<&str, u32> = ProducerContext::new();
/// assert!(!ctx.is_active());
///
/// ctx.queue("orders").push(1);
/// assert_eq!(ctx.peek(&"orders"), &[1]);
/// assert_eq!(ctx.pending(), 1);
/// ```
#[derive(Debug)]
pub struct ProducerContext<D, E> {
    queues: Option<QueueTable<D, E>>,
    // appended through `push` since the table was created
    staged: usize,
    batch_warned: bool,
    warn_on_discard: bool,
}

impl<D, E> Default for ProducerContext<D, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, E> ProducerContext<D, E> {
    pub fn new() -> Self {
        Self {
            queues: None,
            staged: 0,
            batch_warned: false,
            warn_on_discard: true,
        }
    }

    /// Whether dropping this context with staged events logs a warning.
    pub fn with_warn_on_discard(mut self, warn: bool) -> Self {
        self.warn_on_discard = warn;
        self
    }

    /// Whether a queue table currently exists.
    pub fn is_active(&self) -> bool {
        self.queues.is_some()
    }

    /// Total staged events.
    pub fn pending(&self) -> usize {
        self.queues.as_ref().map_or(0, QueueTable::event_count)
    }

    /// The queue table, if one exists. Never creates it.
    pub fn table(&self) -> Option<&QueueTable<D, E>> {
        self.queues.as_ref()
    }

    /// The full queue table, created on first access.
    pub fn queues(&mut self) -> &mut QueueTable<D, E> {
        self.queues.get_or_insert_with(QueueTable::new)
    }

    /// Detach the queue table, leaving the context empty.
    pub fn take(&mut self) -> Option<QueueTable<D, E>> {
        self.staged = 0;
        self.batch_warned = false;
        self.queues.take()
    }

    /// Events appended by sends since the table was created. Unlike
    /// [`pending`](Self::pending) this does not walk the table, and it does
    /// not see edits made through [`queue`](Self::queue).
    pub(crate) fn staged(&self) -> usize {
        self.staged
    }

    /// True the first time it is called for the current table.
    pub(crate) fn mark_batch_warned(&mut self) -> bool {
        !std::mem::replace(&mut self.batch_warned, true)
    }

    /// Drop the queue table. Returns how many events were discarded.
    pub(crate) fn discard(&mut self) -> usize {
        self.take().map_or(0, |table| table.event_count())
    }
}

impl<D: Destination, E> ProducerContext<D, E> {
    /// Queue for a destination, creating the table and an empty queue if needed.
    pub fn queue(&mut self, destination: D) -> &mut Vec<E> {
        self.queues().queue_mut(destination)
    }

    /// Staged events for a destination; empty when nothing was sent there.
    pub fn peek(&self, destination: &D) -> &[E] {
        self.queues
            .as_ref()
            .and_then(|table| table.get(destination))
            .unwrap_or(&[])
    }

    pub(crate) fn push(&mut self, destination: D, event: E) {
        self.queues().push(destination, event);
        self.staged = self.staged.saturating_add(1);
    }
}

impl<D, E> Drop for ProducerContext<D, E> {
    fn drop(&mut self) {
        if !self.warn_on_discard {
            return;
        }
        let pending = self.pending();
        if pending > 0 {
            warn!(
                events = pending,
                "producer context dropped with staged events; they were never flushed"
            );
        }
    }
}
