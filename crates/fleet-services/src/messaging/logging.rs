use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use fleet_log::{observe, Attr, Logger, RequestContext};

use super::Handler;
use crate::errors::Result;

pub struct LoggingMiddleware {
    logger: Logger,
    svc: Arc<dyn Handler>,
}

/// Adds logging facilities to a session handler.
pub fn logging_middleware(svc: Arc<dyn Handler>, logger: Logger) -> Arc<dyn Handler> {
    Arc::new(LoggingMiddleware { logger, svc })
}

impl LoggingMiddleware {
    /// Topics are captured before the call, as the client sent them.
    async fn log_action<Fut>(
        &self,
        ctx: &RequestContext,
        action: &str,
        topics: Option<Vec<String>>,
        call: Fut,
    ) -> Result<()>
    where
        Fut: Future<Output = Result<()>> + Send,
    {
        let operation = format!("{action}()");
        observe(
            &self.logger,
            ctx,
            &operation,
            move |_: &()| {
                topics
                    .map(|t| vec![Attr::list("topics", t)])
                    .unwrap_or_default()
            },
            call,
        )
        .await
    }
}

#[async_trait]
impl Handler for LoggingMiddleware {
    async fn auth_connect(&self, ctx: &RequestContext) -> Result<()> {
        self.log_action(ctx, "AuthConnect", None, self.svc.auth_connect(ctx))
            .await
    }

    async fn auth_publish(&self, ctx: &RequestContext, topic: &mut String, payload: &mut Vec<u8>) -> Result<()> {
        let topics = vec![topic.clone()];
        self.log_action(
            ctx,
            "AuthPublish",
            Some(topics),
            self.svc.auth_publish(ctx, topic, payload),
        )
        .await
    }

    async fn auth_subscribe(&self, ctx: &RequestContext, topics: &mut Vec<String>) -> Result<()> {
        let logged = topics.clone();
        self.log_action(
            ctx,
            "AuthSubscribe",
            Some(logged),
            self.svc.auth_subscribe(ctx, topics),
        )
        .await
    }

    async fn connect(&self, ctx: &RequestContext) -> Result<()> {
        self.log_action(ctx, "Connect", None, self.svc.connect(ctx)).await
    }

    async fn disconnect(&self, ctx: &RequestContext) -> Result<()> {
        self.log_action(ctx, "Disconnect", None, self.svc.disconnect(ctx))
            .await
    }

    async fn publish(&self, ctx: &RequestContext, topic: &mut String, payload: &mut Vec<u8>) -> Result<()> {
        let topics = vec![topic.clone()];
        self.log_action(ctx, "Publish", Some(topics), self.svc.publish(ctx, topic, payload))
            .await
    }

    async fn subscribe(&self, ctx: &RequestContext, topics: &mut Vec<String>) -> Result<()> {
        let logged = topics.clone();
        self.log_action(ctx, "Subscribe", Some(logged), self.svc.subscribe(ctx, topics))
            .await
    }

    async fn unsubscribe(&self, ctx: &RequestContext, topics: &mut Vec<String>) -> Result<()> {
        let logged = topics.clone();
        self.log_action(
            ctx,
            "Unsubscribe",
            Some(logged),
            self.svc.unsubscribe(ctx, topics),
        )
        .await
    }
}
