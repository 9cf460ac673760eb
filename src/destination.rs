use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A delivery target that can key a [`QueueTable`](crate::QueueTable).
///
/// The core only needs equality and hashing. `validate` lets a destination
/// type reject values that could never be delivered, so `send` fails fast
/// instead of staging an event that would silently go nowhere.
///
/// `Display` is required of integrators: it names the destination in log
/// fields, in `InvalidDestination` errors and as the channel name of
/// transports that address by string (`LogTransport`, `EmitterTransport`).
pub trait Destination: Eq + Hash + Clone + fmt::Debug + fmt::Display {
    /// Returns the reason this destination is unusable, if any.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Destination for String {
    fn validate(&self) -> Result<(), String> {
        validate_name(self)
    }
}

impl Destination for &'static str {
    fn validate(&self) -> Result<(), String> {
        validate_name(self)
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        Err("destination name is empty".to_string())
    } else {
        Ok(())
    }
}

/// Exchange plus routing key, the usual address on an AMQP-style broker.
///
/// The exchange may be empty (the broker's default exchange); the routing key
/// may not.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Route {
    pub exchange: String,
    pub routing_key: String,
}

impl Route {
    pub fn new(exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
        }
    }

    /// Route on the default exchange.
    pub fn queue(routing_key: impl Into<String>) -> Self {
        Self::new("", routing_key)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.exchange, self.routing_key)
    }
}

impl Destination for Route {
    fn validate(&self) -> Result<(), String> {
        if self.routing_key.trim().is_empty() {
            return Err("routing key is empty".to_string());
        }
        Ok(())
    }
}
