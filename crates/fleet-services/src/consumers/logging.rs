use std::sync::Arc;

use async_trait::async_trait;
use fleet_log::{observe, Attr, Logger, RequestContext};

use super::{AsyncConsumer, BlockingConsumer, Message};
use crate::errors::Result;

fn batch_fields(messages: &[Message]) -> Vec<Attr> {
    vec![Attr::uint("messages", messages.len() as u64)]
}

pub struct LoggingMiddleware {
    logger: Logger,
    consumer: Arc<dyn BlockingConsumer>,
}

/// Adds logging facilities to a blocking consumer.
pub fn logging_middleware(consumer: Arc<dyn BlockingConsumer>, logger: Logger) -> Arc<dyn BlockingConsumer> {
    Arc::new(LoggingMiddleware { logger, consumer })
}

#[async_trait]
impl BlockingConsumer for LoggingMiddleware {
    async fn consume_blocking(&self, ctx: &RequestContext, messages: &[Message]) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Consume blocking",
            |_: &()| batch_fields(messages),
            self.consumer.consume_blocking(ctx, messages),
        )
        .await
    }
}

pub struct AsyncLoggingMiddleware {
    logger: Logger,
    consumer: Arc<dyn AsyncConsumer>,
}

/// Adds logging facilities to an async consumer.
pub fn async_logging_middleware(consumer: Arc<dyn AsyncConsumer>, logger: Logger) -> Arc<dyn AsyncConsumer> {
    Arc::new(AsyncLoggingMiddleware { logger, consumer })
}

#[async_trait]
impl AsyncConsumer for AsyncLoggingMiddleware {
    async fn consume_async(&self, ctx: &RequestContext, messages: &[Message]) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Consume async",
            |_: &()| batch_fields(messages),
            self.consumer.consume_async(ctx, messages),
        )
        .await
    }
}
