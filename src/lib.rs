//! Context-scoped buffered producer.
//!
//! Events are staged per destination inside a [`ProducerContext`] owned by
//! the current unit of work, and only handed to a [`Transport`] when the
//! caller flushes. Clearing (or dropping) the context abandons them, which is
//! what a rolled-back transaction wants.
//!
//! ```
//! use buffered_producer::{BufferedProducer, RecordingTransport, Route};
//!
//! let transport = RecordingTransport::new();
//! let producer = BufferedProducer::new(transport.clone());
//! let created = Route::new("orders", "created");
//!
//! // committed work: flush
//! let mut ctx = producer.context();
//! producer.send(&mut ctx, "order-1", created.clone()).unwrap();
//! producer.flush(&mut ctx).unwrap();
//!
//! // rolled back work: clear
//! producer.send(&mut ctx, "order-2", created.clone()).unwrap();
//! producer.clear(&mut ctx);
//!
//! assert_eq!(transport.events_for(&created), vec!["order-1"]);
//! ```

pub mod bus;
mod destination;
mod error;
mod producer;
mod queue;
pub mod transport;

pub use destination::{Destination, Route};
pub use error::{ProducerError, ProducerResult, TransportError, UnitOfWorkError};
pub use producer::{BufferedProducer, FlushReport, Producer, ProducerConfig, ProducerScope};
pub use queue::{ProducerContext, QueueTable};
#[cfg(feature = "emitter")]
pub use transport::EmitterTransport;
pub use transport::{
    Delivery, Encoding, LogTransport, NoopTransport, PublisherTransport, RecordingTransport,
    Transport,
};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
