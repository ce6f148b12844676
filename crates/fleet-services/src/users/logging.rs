use std::sync::Arc;

use async_trait::async_trait;
use fleet_log::instrument::no_fields;
use fleet_log::{observe, Attr, Logger, RequestContext};

use super::{Client, ClientsPage, MembersPage, Page, Token, UsersService};
use crate::errors::Result;

/// [`UsersService`] that logs every call of the service it wraps.
pub struct LoggingMiddleware {
    logger: Logger,
    svc: Arc<dyn UsersService>,
}

/// Adds logging facilities to the users service.
pub fn logging_middleware(svc: Arc<dyn UsersService>, logger: Logger) -> Arc<dyn UsersService> {
    Arc::new(LoggingMiddleware { logger, svc })
}

fn user(attrs: Vec<Attr>) -> Attr {
    Attr::group("user", attrs)
}

fn page(page: &Page) -> Attr {
    Attr::group(
        "page",
        vec![Attr::uint("limit", page.limit), Attr::uint("offset", page.offset)],
    )
}

fn token_fields(domain_id: &str, t: &Token) -> Vec<Attr> {
    let mut attrs = vec![Attr::string("domain_id", domain_id)];
    if !t.access_type.is_empty() {
        attrs.push(Attr::string("access_type", &t.access_type));
    }
    attrs
}

#[async_trait]
impl UsersService for LoggingMiddleware {
    async fn register_client(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Register client",
            |c: &Client| vec![user(vec![Attr::string("name", &c.name), Attr::string("id", &c.id)])],
            self.svc.register_client(ctx, token, client),
        )
        .await
    }

    /// Logs the domain and, when known, the issued access type.
    async fn issue_token(
        &self,
        ctx: &RequestContext,
        identity: &str,
        secret: &str,
        domain_id: &str,
    ) -> Result<Token> {
        observe(
            &self.logger,
            ctx,
            "Issue token",
            |t: &Token| token_fields(domain_id, t),
            self.svc.issue_token(ctx, identity, secret, domain_id),
        )
        .await
    }

    async fn refresh_token(&self, ctx: &RequestContext, refresh_token: &str, domain_id: &str) -> Result<Token> {
        observe(
            &self.logger,
            ctx,
            "Refresh token",
            |t: &Token| token_fields(domain_id, t),
            self.svc.refresh_token(ctx, refresh_token, domain_id),
        )
        .await
    }

    async fn view_client(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "View client",
            |c: &Client| vec![user(vec![Attr::string("name", &c.name), Attr::string("id", id)])],
            self.svc.view_client(ctx, token, id),
        )
        .await
    }

    async fn view_profile(&self, ctx: &RequestContext, token: &str) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "View profile",
            |c: &Client| vec![user(vec![Attr::string("name", &c.name), Attr::string("id", &c.id)])],
            self.svc.view_profile(ctx, token),
        )
        .await
    }

    async fn list_clients(&self, ctx: &RequestContext, token: &str, pm: &Page) -> Result<ClientsPage> {
        observe(
            &self.logger,
            ctx,
            "List clients",
            |_: &ClientsPage| vec![page(pm)],
            self.svc.list_clients(ctx, token, pm),
        )
        .await
    }

    async fn update_client(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Update client",
            |c: &Client| {
                vec![
                    user(vec![Attr::string("name", &c.name), Attr::string("id", &c.id)]),
                    Attr::any("metadata", &c.metadata),
                ]
            },
            self.svc.update_client(ctx, token, client),
        )
        .await
    }

    async fn update_client_tags(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Update client tags",
            |c: &Client| {
                vec![user(vec![
                    Attr::string("id", &c.id),
                    Attr::list("tags", &c.tags),
                ])]
            },
            self.svc.update_client_tags(ctx, token, client),
        )
        .await
    }

    async fn update_client_identity(
        &self,
        ctx: &RequestContext,
        token: &str,
        id: &str,
        identity: &str,
    ) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Update client identity",
            |c: &Client| {
                vec![user(vec![
                    Attr::string("id", &c.id),
                    Attr::string("identity", identity),
                ])]
            },
            self.svc.update_client_identity(ctx, token, id, identity),
        )
        .await
    }

    async fn update_client_secret(
        &self,
        ctx: &RequestContext,
        token: &str,
        old_secret: &str,
        new_secret: &str,
    ) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Update client secret",
            |c: &Client| vec![user(vec![Attr::string("id", &c.id), Attr::string("name", &c.name)])],
            self.svc.update_client_secret(ctx, token, old_secret, new_secret),
        )
        .await
    }

    async fn generate_reset_token(&self, ctx: &RequestContext, email: &str, host: &str) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Generate reset token",
            no_fields::<()>,
            self.svc.generate_reset_token(ctx, email, host),
        )
        .await
    }

    async fn reset_secret(&self, ctx: &RequestContext, token: &str, secret: &str) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Reset secret",
            no_fields::<()>,
            self.svc.reset_secret(ctx, token, secret),
        )
        .await
    }

    async fn send_password_reset(
        &self,
        ctx: &RequestContext,
        host: &str,
        email: &str,
        user: &str,
        token: &str,
    ) -> Result<()> {
        observe(
            &self.logger,
            ctx,
            "Send password reset",
            no_fields::<()>,
            self.svc.send_password_reset(ctx, host, email, user, token),
        )
        .await
    }

    /// Logs the resulting client id together with the requested role.
    async fn update_client_role(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client> {
        let role = client.role.to_string();
        observe(
            &self.logger,
            ctx,
            "Update client role",
            move |c: &Client| vec![user(vec![Attr::string("id", &c.id), Attr::string("role", role)])],
            self.svc.update_client_role(ctx, token, client),
        )
        .await
    }

    async fn enable_client(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Enable client",
            |c: &Client| vec![Attr::string("id", &c.id)],
            self.svc.enable_client(ctx, token, id),
        )
        .await
    }

    async fn disable_client(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Client> {
        observe(
            &self.logger,
            ctx,
            "Disable client",
            |c: &Client| vec![Attr::string("id", &c.id)],
            self.svc.disable_client(ctx, token, id),
        )
        .await
    }

    async fn list_members(
        &self,
        ctx: &RequestContext,
        token: &str,
        object_kind: &str,
        object_id: &str,
        pm: &Page,
    ) -> Result<MembersPage> {
        observe(
            &self.logger,
            ctx,
            "List members",
            |_: &MembersPage| {
                vec![
                    Attr::string("object_kind", object_kind),
                    Attr::string("object_id", object_id),
                    page(pm),
                ]
            },
            self.svc.list_members(ctx, token, object_kind, object_id, pm),
        )
        .await
    }

    async fn identify(&self, ctx: &RequestContext, token: &str) -> Result<String> {
        observe(
            &self.logger,
            ctx,
            "Identify",
            no_fields::<String>,
            self.svc.identify(ctx, token),
        )
        .await
    }
}
