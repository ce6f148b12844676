use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::level::ParseLevelError;
use crate::logger::Logger;
use crate::sink::Sink;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Rendered as the one-line pre-logger diagnostic.
    #[error("{diagnostic}")]
    InvalidLevel {
        #[source]
        source: ParseLevelError,
        text: String,
        at: DateTime<Utc>,
        diagnostic: String,
    },
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid_level(source: ParseLevelError, text: &str) -> Self {
        let at = Utc::now();
        let diagnostic = serde_json::json!({
            "level": "error",
            "message": source.to_string(),
            "ts": at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        })
        .to_string();
        ConfigError::InvalidLevel {
            source,
            text: text.to_string(),
            at,
            diagnostic,
        }
    }
}

// ---------------------------------------------------------------------------
// LogConfig
// ---------------------------------------------------------------------------

/// Logging section of a service configuration.
///
/// TOML example:
///
/// ```toml
/// level = "debug"
/// output = { file = "/var/log/fleet/writer.log" }
///
/// [diagnostics]
/// filter = "warn"
/// json = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub output: LogOutput,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            output: LogOutput::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for LogOutput {
    type Err = std::convert::Infallible;

    /// `stdout` and `stderr` name the standard streams; anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "stdout" | "" => LogOutput::Stdout,
            "stderr" => LogOutput::Stderr,
            path => LogOutput::File(PathBuf::from(path)),
        })
    }
}

/// Settings for the process diagnostics channel (`tracing`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_true")]
    pub json: bool,
}

fn default_filter() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: true,
        }
    }
}

impl LogConfig {
    /// Load from a TOML file.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults overridden by `<prefix>LOG_LEVEL` and `<prefix>LOG_OUTPUT`.
    pub fn from_env(prefix: &str) -> Self {
        let mut cfg = Self::default();
        cfg.apply_env(prefix);
        cfg
    }

    pub fn apply_env(&mut self, prefix: &str) {
        self.apply_vars(prefix, |key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_vars(&mut self, prefix: &str, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(&format!("{prefix}LOG_LEVEL")) {
            self.level = level;
        }
        if let Some(output) = lookup(&format!("{prefix}LOG_OUTPUT")) {
            if let Ok(output) = output.parse() {
                self.output = output;
            }
        }
    }

    pub fn open_sink(&self) -> Result<Sink, ConfigError> {
        match &self.output {
            LogOutput::Stdout => Ok(Sink::stdout()),
            LogOutput::Stderr => Ok(Sink::stderr()),
            LogOutput::File(path) => Sink::file(path)
                .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display()))),
        }
    }

    /// Open the configured sink and build a [`Logger`] at the configured level.
    pub fn build_logger(&self) -> Result<Logger, ConfigError> {
        Logger::new(self.open_sink()?, &self.level)
    }
}
