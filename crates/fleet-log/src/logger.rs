use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::attr::{serialize_attrs, Attr};
use crate::config::ConfigError;
use crate::context::RequestContext;
use crate::level::Level;
use crate::sink::Sink;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to deliver a record. Never returned to callers of [`Logger`].
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("write record: {0}")]
    Write(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One emitted line: `time`, `level`, `msg`, then the attributes in order.
struct Record<'a> {
    time: DateTime<Utc>,
    level: Level,
    msg: &'a str,
    attrs: &'a [Attr],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(
            "time",
            &self.time.to_rfc3339_opts(SecondsFormat::Nanos, true),
        )?;
        map.serialize_entry("level", self.level.as_str())?;
        map.serialize_entry("msg", self.msg)?;
        serialize_attrs(&mut map, self.attrs)?;
        map.end()
    }
}

impl Record<'_> {
    fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Level-filtered structured logger writing newline-delimited JSON.
///
/// Cheap to clone; clones share the same sink. The threshold is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct Logger {
    sink: Sink,
    level: Level,
}

impl Logger {
    /// Build a logger from a level name such as `"info"` (any case).
    ///
    /// On failure the returned [`ConfigError`] renders as a one-line JSON
    /// diagnostic meant for stderr, since no structured output exists yet.
    pub fn new(sink: Sink, level_text: &str) -> Result<Self, ConfigError> {
        let level = level_text
            .parse::<Level>()
            .map_err(|e| ConfigError::invalid_level(e, level_text))?;
        Ok(Self::with_level(sink, level))
    }

    pub fn with_level(sink: Sink, level: Level) -> Self {
        Self { sink, level }
    }

    /// The configured threshold.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level.is_at_least(self.level)
    }

    pub fn debug(&self, ctx: &RequestContext, msg: &str, attrs: &[Attr]) {
        self.log(ctx, Level::Debug, msg, attrs);
    }

    pub fn info(&self, ctx: &RequestContext, msg: &str, attrs: &[Attr]) {
        self.log(ctx, Level::Info, msg, attrs);
    }

    pub fn warn(&self, ctx: &RequestContext, msg: &str, attrs: &[Attr]) {
        self.log(ctx, Level::Warn, msg, attrs);
    }

    pub fn error(&self, ctx: &RequestContext, msg: &str, attrs: &[Attr]) {
        self.log(ctx, Level::Error, msg, attrs);
    }

    /// Emit one record at `level` if it passes the threshold.
    ///
    /// Delivery failures are reported on the diagnostics channel and
    /// otherwise swallowed.
    pub fn log(&self, ctx: &RequestContext, level: Level, msg: &str, attrs: &[Attr]) {
        if !self.enabled(level) {
            return;
        }
        let record = Record {
            time: Utc::now(),
            level,
            msg,
            attrs,
        };
        if let Err(e) = self.emit(&record) {
            tracing::warn!(
                trace_id = %ctx.trace_id(),
                span_id = %ctx.span_id(),
                level = %level,
                error = %e,
                "dropped log record"
            );
        }
    }

    fn emit(&self, record: &Record<'_>) -> Result<(), SinkError> {
        let line = record.encode()?;
        self.sink.write_record(&line)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
