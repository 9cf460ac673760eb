use tracing::{debug, warn};

use super::config::ProducerConfig;
use super::scope::ProducerScope;
use crate::destination::Destination;
use crate::error::{ProducerError, ProducerResult, UnitOfWorkError};
use crate::queue::ProducerContext;
use crate::transport::Transport;

/// What a successful flush handed to the transport.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub destinations: usize,
    pub events: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.events == 0
    }
}

/// Caller-facing side of a producer: stage an event for a destination.
pub trait Producer<D, E> {
    fn send(
        &self,
        ctx: &mut ProducerContext<D, E>,
        event: E,
        destination: D,
    ) -> ProducerResult<()>;
}

/// Stages events per destination inside a [`ProducerContext`] and only
/// transmits them on [`flush`](Self::flush).
///
/// Typical use is a database transaction: send while the transaction runs,
/// `flush` after commit, `clear` on rollback. The producer holds no staged
/// state itself, so one instance can serve any number of threads, each with
/// its own context.
///
/// A flush is attempted once. If the transport fails, the events are still
/// discarded and the error says how many were lost; a committed unit of work
/// followed by a failed flush is not retried here.
///
/// ## Example
///
/// ```
/// use buffered_producer::{BufferedProducer, RecordingTransport};
///
/// let transport = RecordingTransport::new();
/// let producer = BufferedProducer::new(transport.clone());
/// let mut ctx = producer.context();
///
/// producer.send(&mut ctx, "A", "orders").unwrap();
/// producer.send(&mut ctx, "B", "orders").unwrap();
/// assert_eq!(transport.flush_count(), 0);
///
/// let report = producer.flush(&mut ctx).unwrap();
/// assert_eq!(report.events, 2);
/// assert_eq!(transport.events_for(&"orders"), vec!["A", "B"]);
/// assert!(!ctx.is_active());
/// ```
pub struct BufferedProducer<T> {
    transport: T,
    config: ProducerConfig,
}

impl<T> BufferedProducer<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ProducerConfig::default())
    }

    pub fn with_config(transport: T, config: ProducerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// A fresh, empty context configured for this producer.
    pub fn context<D, E>(&self) -> ProducerContext<D, E> {
        ProducerContext::new().with_warn_on_discard(self.config.warn_on_discard)
    }

    /// Discard everything staged in `ctx` without sending it.
    pub fn clear<D, E>(&self, ctx: &mut ProducerContext<D, E>) {
        let discarded = ctx.discard();
        if discarded > 0 {
            debug!(producer = %self.config.name, events = discarded, "cleared staged events");
        }
    }

    /// Bind this producer to one context.
    pub fn scope<'a, D, E>(
        &'a self,
        ctx: &'a mut ProducerContext<D, E>,
    ) -> ProducerScope<'a, T, D, E> {
        ProducerScope::new(self, ctx)
    }

    /// Append `event` to the queue of `destination` in `ctx`.
    ///
    /// Nothing is transmitted. Fails without staging if the destination
    /// does not validate.
    pub fn send<D: Destination, E>(
        &self,
        ctx: &mut ProducerContext<D, E>,
        event: E,
        destination: D,
    ) -> ProducerResult<()> {
        if let Err(reason) = destination.validate() {
            warn!(
                producer = %self.config.name,
                destination = %destination,
                %reason,
                "rejected send"
            );
            return Err(ProducerError::InvalidDestination {
                destination: destination.to_string(),
                reason,
            });
        }

        debug!(producer = %self.config.name, destination = %destination, "staged event");
        ctx.push(destination, event);

        if let Some(threshold) = self.config.pending_warn_threshold {
            let staged = ctx.staged();
            if staged > threshold && ctx.mark_batch_warned() {
                warn!(
                    producer = %self.config.name,
                    staged,
                    threshold,
                    "context is staging an unusually large batch"
                );
            }
        }
        Ok(())
    }

    /// Hand everything staged in `ctx` to the transport, then discard it.
    ///
    /// The context is empty when this returns, whether delivery succeeded or
    /// not. With nothing staged the transport is not called.
    pub fn flush<D, E>(&self, ctx: &mut ProducerContext<D, E>) -> ProducerResult<FlushReport>
    where
        D: Destination,
        T: Transport<D, E>,
    {
        let Some(table) = ctx.take() else {
            return Ok(FlushReport::default());
        };

        let report = FlushReport {
            destinations: table.len(),
            events: table.event_count(),
        };
        if report.is_empty() {
            return Ok(report);
        }

        match self.transport.deliver(&table) {
            Ok(()) => {
                debug!(
                    producer = %self.config.name,
                    destinations = report.destinations,
                    events = report.events,
                    "flushed"
                );
                Ok(report)
            }
            Err(source) => {
                warn!(
                    producer = %self.config.name,
                    destinations = report.destinations,
                    events = report.events,
                    error = %source,
                    "flush failed; staged events discarded"
                );
                Err(ProducerError::Flush {
                    destinations: report.destinations,
                    events: report.events,
                    source,
                })
            }
        }
    }

    /// Run `work` against a scope on `ctx`: flush if it returns `Ok`, clear
    /// if it returns `Err`.
    pub fn unit_of_work<D, E, R, X, F>(
        &self,
        ctx: &mut ProducerContext<D, E>,
        work: F,
    ) -> Result<(R, FlushReport), UnitOfWorkError<X>>
    where
        D: Destination,
        T: Transport<D, E>,
        F: FnOnce(&mut ProducerScope<'_, T, D, E>) -> Result<R, X>,
    {
        let outcome = {
            let mut scope = self.scope(ctx);
            work(&mut scope)
        };

        match outcome {
            Ok(value) => {
                let report = self.flush(ctx)?;
                Ok((value, report))
            }
            Err(err) => {
                self.clear(ctx);
                Err(UnitOfWorkError::Aborted(err))
            }
        }
    }
}

impl<T, D: Destination, E> Producer<D, E> for BufferedProducer<T> {
    fn send(
        &self,
        ctx: &mut ProducerContext<D, E>,
        event: E,
        destination: D,
    ) -> ProducerResult<()> {
        BufferedProducer::send(self, ctx, event, destination)
    }
}
