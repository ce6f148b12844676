use std::sync::Arc;

use async_trait::async_trait;
use fleet_log::{observe, Attr, Logger, RequestContext};

use super::{Cert, CertsService, Page, Revoke};
use crate::errors::Result;

pub struct LoggingMiddleware {
    logger: Logger,
    svc: Arc<dyn CertsService>,
}

/// Adds logging facilities to the certs service. Tokens are never logged.
pub fn logging_middleware(svc: Arc<dyn CertsService>, logger: Logger) -> Arc<dyn CertsService> {
    Arc::new(LoggingMiddleware { logger, svc })
}

fn page(offset: u64, limit: u64) -> Attr {
    Attr::group(
        "page",
        vec![Attr::uint("offset", offset), Attr::uint("limit", limit)],
    )
}

#[async_trait]
impl CertsService for LoggingMiddleware {
    async fn issue_cert(&self, ctx: &RequestContext, token: &str, thing_id: &str, ttl: &str) -> Result<Cert> {
        observe(
            &self.logger,
            ctx,
            "Issue cert",
            |c: &Cert| {
                vec![
                    Attr::string("thing_id", thing_id),
                    Attr::string("ttl", ttl),
                    Attr::string("serial", &c.serial),
                ]
            },
            self.svc.issue_cert(ctx, token, thing_id, ttl),
        )
        .await
    }

    async fn list_certs(
        &self,
        ctx: &RequestContext,
        token: &str,
        thing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page> {
        observe(
            &self.logger,
            ctx,
            "List certs",
            |_: &Page| vec![Attr::string("thing_id", thing_id), page(offset, limit)],
            self.svc.list_certs(ctx, token, thing_id, offset, limit),
        )
        .await
    }

    async fn list_serials(
        &self,
        ctx: &RequestContext,
        token: &str,
        thing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page> {
        observe(
            &self.logger,
            ctx,
            "List serials",
            |_: &Page| vec![Attr::string("thing_id", thing_id), page(offset, limit)],
            self.svc.list_serials(ctx, token, thing_id, offset, limit),
        )
        .await
    }

    async fn view_cert(&self, ctx: &RequestContext, token: &str, serial_id: &str) -> Result<Cert> {
        observe(
            &self.logger,
            ctx,
            "View cert",
            |c: &Cert| {
                vec![
                    Attr::string("serial_id", serial_id),
                    Attr::string("thing_id", &c.thing_id),
                ]
            },
            self.svc.view_cert(ctx, token, serial_id),
        )
        .await
    }

    async fn revoke_cert(&self, ctx: &RequestContext, token: &str, thing_id: &str) -> Result<Revoke> {
        observe(
            &self.logger,
            ctx,
            "Revoke cert",
            |_: &Revoke| vec![Attr::string("thing_id", thing_id)],
            self.svc.revoke_cert(ctx, token, thing_id),
        )
        .await
    }
}
