//! Device bootstrap: per-thing configurations handed out on first contact.

use std::collections::HashMap;
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

/// Whether a thing is connected to its configured channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Inactive,
    Active,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Inactive => "inactive",
            State::Active => "active",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    pub thing_id: String,
    pub owner: String,
    pub name: String,
    pub client_cert: String,
    pub client_key: String,
    pub ca_cert: String,
    pub thing_key: String,
    pub external_id: String,
    pub external_key: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
    pub content: String,
    #[serde(default)]
    pub state: State,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    pub full_match: HashMap<String, String>,
    pub partial_match: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigsPage {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub configs: Vec<Config>,
}

// ---------------------------------------------------------------------------
// BootstrapService trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait BootstrapService: Send + Sync {
    async fn add(&self, ctx: &RequestContext, token: &str, cfg: Config) -> Result<Config>;

    async fn view(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<Config>;

    async fn update(&self, ctx: &RequestContext, token: &str, cfg: Config) -> Result<()>;

    async fn update_cert(
        &self,
        ctx: &RequestContext,
        token: &str,
        thing_id: &str,
        client_cert: &str,
        client_key: &str,
        ca_cert: &str,
    ) -> Result<Config>;

    async fn update_connections(
        &self,
        ctx: &RequestContext,
        token: &str,
        id: &str,
        connections: Vec<String>,
    ) -> Result<()>;

    async fn list(
        &self,
        ctx: &RequestContext,
        token: &str,
        filter: &Filter,
        offset: u64,
        limit: u64,
    ) -> Result<ConfigsPage>;

    async fn remove(&self, ctx: &RequestContext, token: &str, id: &str) -> Result<()>;

    /// Return the configuration of the device identified by `external_id`,
    /// encrypting its content when `secure` is set.
    async fn bootstrap(
        &self,
        ctx: &RequestContext,
        external_key: &str,
        external_id: &str,
        secure: bool,
    ) -> Result<Config>;

    async fn change_state(&self, ctx: &RequestContext, token: &str, id: &str, state: State) -> Result<()>;

    // Event handlers driven by the things service.

    async fn update_channel_handler(&self, ctx: &RequestContext, channel: Channel) -> Result<()>;

    async fn remove_config_handler(&self, ctx: &RequestContext, id: &str) -> Result<()>;

    async fn remove_channel_handler(&self, ctx: &RequestContext, id: &str) -> Result<()>;

    async fn disconnect_thing_handler(&self, ctx: &RequestContext, channel_id: &str, thing_id: &str) -> Result<()>;
}
