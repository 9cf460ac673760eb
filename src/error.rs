use thiserror::Error;

use crate::bus::PublishError;

/// Failure reported by a [`Transport`](crate::Transport) while delivering a batch.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target refused the events staged for one destination.
    #[error("destination {destination} rejected the batch: {reason}")]
    Rejected { destination: String, reason: String },

    /// An event could not be turned into a wire payload.
    #[error("failed to encode event: {0}")]
    Encode(String),

    /// The underlying publisher failed.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// The transport could not be reached (or its internal state is unusable).
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Encode(err.to_string())
    }
}

impl From<bitcode::Error> for TransportError {
    fn from(err: bitcode::Error) -> Self {
        TransportError::Encode(err.to_string())
    }
}

/// Errors surfaced by [`BufferedProducer`](crate::BufferedProducer).
#[derive(Debug, Error)]
pub enum ProducerError {
    /// `send` was called with a destination that can never be delivered to.
    /// Nothing was staged.
    #[error("invalid destination {destination}: {reason}")]
    InvalidDestination { destination: String, reason: String },

    /// The transport failed during `flush`. The staged events were discarded
    /// before this error was returned and will not be redelivered.
    #[error(
        "flush failed, discarded {events} event(s) across {destinations} destination(s): {source}"
    )]
    Flush {
        destinations: usize,
        events: usize,
        source: TransportError,
    },
}

impl ProducerError {
    /// Number of staged events lost because of this error.
    pub fn discarded_events(&self) -> usize {
        match self {
            ProducerError::InvalidDestination { .. } => 0,
            ProducerError::Flush { events, .. } => *events,
        }
    }
}

/// Outcome of a failed [`BufferedProducer::unit_of_work`](crate::BufferedProducer::unit_of_work).
#[derive(Debug, Error)]
pub enum UnitOfWorkError<X> {
    /// The work itself failed; staged events were cleared without sending.
    #[error("unit of work aborted: {0}")]
    Aborted(X),

    /// The work succeeded but the flush that followed did not.
    #[error(transparent)]
    Flush(#[from] ProducerError),
}

impl<X> UnitOfWorkError<X> {
    /// Whether the work was rolled back (as opposed to committed then lost in flush).
    pub fn is_aborted(&self) -> bool {
        matches!(self, UnitOfWorkError::Aborted(_))
    }
}

pub type ProducerResult<T> = Result<T, ProducerError>;
