//! Message consumers: writers persisting broker traffic.

use async_trait::async_trait;
use fleet_log::RequestContext;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

mod logging;
mod memory;

pub use logging::{async_logging_middleware, logging_middleware, AsyncLoggingMiddleware, LoggingMiddleware};
pub use memory::MemoryWriter;

/// A message as delivered by the broker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    pub channel: String,
    #[serde(default)]
    pub subtopic: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Unix time in nanoseconds.
    #[serde(default)]
    pub created: i64,
}

/// Consumer that finishes processing a batch before returning.
#[async_trait]
pub trait BlockingConsumer: Send + Sync {
    async fn consume_blocking(&self, ctx: &RequestContext, messages: &[Message]) -> Result<()>;
}

/// Consumer that may hand a batch off and finish it in the background;
/// the returned result only covers accepting the batch.
#[async_trait]
pub trait AsyncConsumer: Send + Sync {
    async fn consume_async(&self, ctx: &RequestContext, messages: &[Message]) -> Result<()>;
}
