//! Certificate issuance for things.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleet_log::RequestContext;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

mod logging;

pub use logging::{logging_middleware, LoggingMiddleware};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cert {
    pub thing_id: String,
    pub client_cert: String,
    pub client_key: String,
    pub issuing_ca: String,
    pub ca_chain: Vec<String>,
    pub serial: String,
    pub expire: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub certs: Vec<Cert>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Revoke {
    pub revocation_time: DateTime<Utc>,
}

#[async_trait]
pub trait CertsService: Send + Sync {
    /// Issue a certificate for `thing_id` valid for `ttl` (e.g. `"8760h"`).
    async fn issue_cert(&self, ctx: &RequestContext, token: &str, thing_id: &str, ttl: &str) -> Result<Cert>;

    async fn list_certs(
        &self,
        ctx: &RequestContext,
        token: &str,
        thing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page>;

    /// Like [`CertsService::list_certs`] but only serials are populated.
    async fn list_serials(
        &self,
        ctx: &RequestContext,
        token: &str,
        thing_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page>;

    async fn view_cert(&self, ctx: &RequestContext, token: &str, serial_id: &str) -> Result<Cert>;

    /// Revoke every certificate issued for `thing_id`.
    async fn revoke_cert(&self, ctx: &RequestContext, token: &str, thing_id: &str) -> Result<Revoke>;
}
