use super::buffered::{BufferedProducer, FlushReport};
use crate::destination::Destination;
use crate::error::ProducerResult;
use crate::queue::ProducerContext;
use crate::transport::Transport;

/// A producer bound to one context, so call sites don't repeat `&mut ctx`.
///
/// Handed to the closure of [`BufferedProducer::unit_of_work`], or created
/// directly with [`BufferedProducer::scope`].
pub struct ProducerScope<'a, T, D, E> {
    producer: &'a BufferedProducer<T>,
    ctx: &'a mut ProducerContext<D, E>,
}

impl<'a, T, D, E> ProducerScope<'a, T, D, E> {
    pub(crate) fn new(
        producer: &'a BufferedProducer<T>,
        ctx: &'a mut ProducerContext<D, E>,
    ) -> Self {
        Self { producer, ctx }
    }

    pub fn producer(&self) -> &BufferedProducer<T> {
        self.producer
    }

    pub fn context(&self) -> &ProducerContext<D, E> {
        &*self.ctx
    }

    pub fn pending(&self) -> usize {
        self.ctx.pending()
    }

    pub fn clear(&mut self) {
        self.producer.clear(self.ctx);
    }
}

impl<T, D: Destination, E> ProducerScope<'_, T, D, E> {
    pub fn send(&mut self, event: E, destination: D) -> ProducerResult<()> {
        self.producer.send(self.ctx, event, destination)
    }

    pub fn peek(&self, destination: &D) -> &[E] {
        self.ctx.peek(destination)
    }

    pub fn flush(&mut self) -> ProducerResult<FlushReport>
    where
        T: Transport<D, E>,
    {
        self.producer.flush(self.ctx)
    }
}
