//! Broker seam - encoded messages and the publisher abstraction
//!
//! Broker-backed transports turn staged events into [`Message`]s and hand
//! them to a [`Publisher`], one batch per destination.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │           BufferedProducer::flush(&mut context)              │
//! └─────────────────────────────────────────────────────────────┘
//!                            │ QueueTable
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            PublisherTransport (encode per event)             │
//! └─────────────────────────────────────────────────────────────┘
//!                            │ publish_batch(destination, msgs)
//!                            ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────────────┐
//! │InMemoryBroker│   │ AMQP channel│    │   Kafka producer    │
//! │ (included)  │    │ (external)  │    │    (external)       │
//! └─────────────┘    └─────────────┘    └─────────────────────┘
//! ```

mod in_memory_broker;
mod publisher;

pub use in_memory_broker::InMemoryBroker;
pub use publisher::{Message, PublishError, Publisher};
