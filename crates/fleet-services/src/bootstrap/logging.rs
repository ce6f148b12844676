use std::sync::Arc;

use async_trait::async_trait;
use fleet_log::{observe, Attr, Logger, RequestContext};

use super::{BootstrapService, Channel, Config, ConfigsPage, Filter, State};
use crate::errors::Result;

pub struct LoggingMiddleware {
    logger: Logger,
    svc: Arc<dyn BootstrapService>,
}

/// Adds logging facilities to the bootstrap service.
pub fn logging_middleware(svc: Arc<dyn BootstrapService>, logger: Logger) -> Arc<dyn BootstrapService> {
    Arc::new(LoggingMiddleware { logger, svc })
}

#[async_trait]
impl BootstrapService for LoggingMiddleware {
    async fn add(&self, ctx: &RequestContext, token: &str, cfg: Config) -> Result<Config> {
        observe(
            &self.logger,
            ctx,
            "Add",
            |saved: &Config| vec![Attr::string("thing_id", &saved.thing_id)],
            self.svc.add(ctx, token, cfg),
        )
        .await
    }

    async fn view(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Config> {
        observe(
            &self.logger,
            ctx,
            "View",
            |_: &Config| vec![Attr::string("thing_id", id)],
            self.svc.view(ctx, token, id),
        )
        .await
    }

    async fn update(&self, ctx: &RequestContext, token: &str, cfg: Config) -> Result<()> {
        let thing_id = cfg.thing_id.clone();
        observe(
            &self.logger,
            ctx,
            "Update",
            move |_: &()| vec![Attr::string("thing_id", thing_id)],
            self.svc.update(ctx, token, cfg),
        )
        .await
    }

    async fn update_cert(
        &self,
        ctx: &RequestContext,
        token: &str,
        thing_id: &str,
        client_cert: &str,
        client_key: &str,
        ca_cert: &str,
    ) -> Result<Config> {
        observe(
            &self.logger,
            ctx,
            "Update cert",
            |cfg: &Config| vec![Attr::string("thing_id", &cfg.thing_id)],
            self.svc.update_cert(ctx, token, thing_id, client_cert, client_key, ca_cert),
        )
        .await
    }

    async fn update_connections(
        &self,
        ctx: &RequestContext,
        token: &str,
        id: &str,
        connections: Vec<String>,
    ) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Update connections",
            |_: &()| vec![Attr::string("id", id)],
            self.svc.update_connections(ctx, token, id, connections),
        )
        .await
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        token: &str,
        filter: &Filter,
        offset: u64,
        limit: u64,
    ) -> Result<ConfigsPage> {
        observe(
            &self.logger,
            ctx,
            "List",
            |_: &ConfigsPage| {
                vec![Attr::group(
                    "filter",
                    vec![Attr::uint("offset", offset), Attr::uint("limit", limit)],
                )]
            },
            self.svc.list(ctx, token, filter, offset, limit),
        )
        .await
    }

    async fn remove(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Remove",
            |_: &()| vec![Attr::string("id", id)],
            self.svc.remove(ctx, token, id),
        )
        .await
    }

    async fn bootstrap(
        &self,
        ctx: &RequestContext,
        external_key: &str,
        external_id: &str,
        secure: bool,
    ) -> Result<Config> {
        observe(
            &self.logger,
            ctx,
            "Bootstrap",
            |_: &Config| vec![Attr::group("config", vec![Attr::string("external_id", external_id)])],
            self.svc.bootstrap(ctx, external_key, external_id, secure),
        )
        .await
    }

    async fn change_state(&self, ctx: &RequestContext, token: &str, id: &str, state: State) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Change state",
            |_: &()| vec![Attr::string("id", id), Attr::string("state", state.to_string())],
            self.svc.change_state(ctx, token, id, state),
        )
        .await
    }

    async fn update_channel_handler(&self, ctx: &RequestContext, channel: Channel) -> Result<()> {
        let group = Attr::group(
            "channel",
            vec![
                Attr::string("channel_id", &channel.id),
                Attr::string("channel_name", &channel.name),
                Attr::any("channel_metadata", &channel.metadata),
            ],
        );
        observe(
            &self.logger,
            ctx,
            "Update channel handler",
            move |_: &()| vec![group],
            self.svc.update_channel_handler(ctx, channel),
        )
        .await
    }

    async fn remove_config_handler(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Remove config handler",
            |_: &()| vec![Attr::string("config_id", id)],
            self.svc.remove_config_handler(ctx, id),
        )
        .await
    }

    async fn remove_channel_handler(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Remove channel handler",
            |_: &()| vec![Attr::string("id", id)],
            self.svc.remove_channel_handler(ctx, id),
        )
        .await
    }

    async fn disconnect_thing_handler(&self, ctx: &RequestContext, channel_id: &str, thing_id: &str) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Disconnect thing handler",
            |_: &()| {
                vec![
                    Attr::string("channel_id", channel_id),
                    Attr::string("thing_id", thing_id),
                ]
            },
            self.svc.disconnect_thing_handler(ctx, channel_id, thing_id),
        )
        .await
    }
}
