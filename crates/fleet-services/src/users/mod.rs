//! Identity service: clients (users), their credentials and access tokens.

use std::fmt;

use async_trait::async_trait;
use fleet_log::RequestContext;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

mod logging;

pub use logging::{logging_middleware, LoggingMiddleware};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub type Metadata = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Admin => "admin",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub access_type: String,
}

/// Pagination and filtering of client listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientsPage {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MembersPage {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub members: Vec<Client>,
}

// ---------------------------------------------------------------------------
// UsersService trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait UsersService: Send + Sync {
    async fn register_client(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client>;

    async fn issue_token(
        &self,
        ctx: &RequestContext,
        identity: &str,
        secret: &str,
        domain_id: &str,
    ) -> Result<Token>;

    async fn refresh_token(&self, ctx: &RequestContext, refresh_token: &str, domain_id: &str) -> Result<Token>;

    async fn view_client(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Client>;

    async fn view_profile(&self, ctx: &RequestContext, token: &str) -> Result<Client>;

    async fn list_clients(&self, ctx: &RequestContext, token: &str, page: &Page) -> Result<ClientsPage>;

    async fn update_client(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client>;

    async fn update_client_tags(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client>;

    async fn update_client_identity(
        &self,
        ctx: &RequestContext,
        token: &str,
        id: &str,
        identity: &str,
    ) -> Result<Client>;

    async fn update_client_secret(
        &self,
        ctx: &RequestContext,
        token: &str,
        old_secret: &str,
        new_secret: &str,
    ) -> Result<Client>;

    async fn generate_reset_token(&self, ctx: &RequestContext, email: &str, host: &str) -> Result<()>;

    async fn reset_secret(&self, ctx: &RequestContext, token: &str, secret: &str) -> Result<()>;

    async fn send_password_reset(
        &self,
        ctx: &RequestContext,
        host: &str,
        email: &str,
        user: &str,
        token: &str,
    ) -> Result<()>;

    async fn update_client_role(&self, ctx: &RequestContext, token: &str, client: Client) -> Result<Client>;

    async fn enable_client(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Client>;

    async fn disable_client(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Client>;

    async fn list_members(
        &self,
        ctx: &RequestContext,
        token: &str,
        object_kind: &str,
        object_id: &str,
        page: &Page,
    ) -> Result<MembersPage>;

    /// Resolve the client id behind `token`.
    async fn identify(&self, ctx: &RequestContext, token: &str) -> Result<String>;
}
