//! Publish/subscribe transport for chat messages.

mod redis_broker;

pub use redis_broker::{RedisBroker, RedisConnector};

use std::sync::Arc;

use anyhow::Result;

use crate::backend::BroadcastEndpoint;

/// A connected broker.
pub trait Broker: Send + Sync {
    /// Publish an opaque payload to `channel`.
    fn publish(&self, channel: &str, payload: &[u8]) -> Result<()>;

    /// Start listening on `channel`.
    fn subscribe(&self, channel: &str) -> Result<Box<dyn Subscription>>;
}

/// An open subscription. Subscription confirmations are never surfaced.
pub trait Subscription: Send {
    /// Next buffered payload, or `None` when nothing is waiting right now.
    fn try_next(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Opens broker connections for an endpoint handed out by the backend.
pub trait BrokerConnector: Send + Sync {
    fn connect(&self, endpoint: &BroadcastEndpoint) -> Result<Arc<dyn Broker>>;
}
