//! Broker session hooks invoked by the MQTT/WS proxy for every client action.

use async_trait::async_trait;
use fleet_log::RequestContext;

use crate::errors::Result;

mod logging;

pub use logging::{logging_middleware, LoggingMiddleware};

/// Session handler. Topics and payloads are passed mutably so a handler may
/// rewrite them before the broker sees them.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn auth_connect(&self, ctx: &RequestContext) -> Result<()>;

    async fn auth_publish(&self, ctx: &RequestContext, topic: &mut String, payload: &mut Vec<u8>) -> Result<()>;

    async fn auth_subscribe(&self, ctx: &RequestContext, topics: &mut Vec<String>) -> Result<()>;

    async fn connect(&self, ctx: &RequestContext) -> Result<()>;

    async fn disconnect(&self, ctx: &RequestContext) -> Result<()>;

    async fn publish(&self, ctx: &RequestContext, topic: &mut String, payload: &mut Vec<u8>) -> Result<()>;

    async fn subscribe(&self, ctx: &RequestContext, topics: &mut Vec<String>) -> Result<()>;

    async fn unsubscribe(&self, ctx: &RequestContext, topics: &mut Vec<String>) -> Result<()>;
}
