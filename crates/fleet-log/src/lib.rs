//! Structured, level-filtered logging for fleet services.
//!
//! A [`Logger`] writes one JSON object per line to a shared [`Sink`],
//! dropping records below its configured [`Level`]. Service middlewares use
//! [`instrument`] to turn every operation call into exactly one record with
//! its duration, identifying fields and outcome.
//!
//! Key components:
//! - **Level**: ordered severities with case-insensitive parsing
//! - **Logger**: injected, cloneable record writer; never a global
//! - **Instrument**: scope guard and helpers that time and log a call
//! - **Config**: TOML / environment driven construction of the logger
//! - **Diagnostics**: `tracing-subscriber` channel for the process itself

pub mod attr;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod instrument;
pub mod level;
pub mod logger;
pub mod sink;

pub use attr::{Attr, Value};
pub use config::{ConfigError, LogConfig, LogOutput};
pub use context::RequestContext;
pub use instrument::{observe, observe_blocking, CallTrace};
pub use level::{Level, ParseLevelError};
pub use logger::{Logger, SinkError};
pub use sink::{BufferSink, Sink};
