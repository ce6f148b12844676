//! Service contracts of the fleet and their logging middlewares.
//!
//! Every service is an object-safe async trait. Its logging middleware
//! implements the same trait around another instance, so middlewares compose
//! freely: `logging -> logging -> real service`. Each middleware records one
//! structured line per call through an injected [`fleet_log::Logger`].
//!
//! Key components:
//! - **users**: client registration, tokens, profile and membership queries
//! - **certs**: certificate issuance, listing and revocation
//! - **bootstrap**: device bootstrap configuration management
//! - **messaging**: broker session handler hooks
//! - **consumers**: message writers fed by the broker

pub mod bootstrap;
pub mod certs;
pub mod consumers;
pub mod errors;
pub mod messaging;
pub mod users;

pub use errors::{Result, ServiceError};
