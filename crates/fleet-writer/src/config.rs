use std::path::Path;

use anyhow::{Context, Result};
use fleet_log::LogConfig;
use serde::{Deserialize, Serialize};

/// Prefix of every environment variable the writer reads.
pub const ENV_PREFIX: &str = "FLEET_WRITER_";

/// Writer configuration.
///
/// ```toml
/// batch_size = 100
/// capacity = 100000
///
/// [log]
/// level = "info"
/// output = "stdout"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Maximum number of stored messages; unbounded when absent.
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_batch_size() -> usize {
    100
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            capacity: None,
            log: LogConfig::default(),
        }
    }
}

impl WriterConfig {
    /// Read `FLEET_WRITER_CONFIG` if set, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(format!("{ENV_PREFIX}CONFIG")) {
            Ok(path) => Self::load_from(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        cfg.apply_vars(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        self.log.apply_vars(ENV_PREFIX, &lookup);
        if let Some(size) = lookup(&format!("{ENV_PREFIX}BATCH_SIZE")) {
            self.batch_size = size
                .parse()
                .with_context(|| format!("invalid {ENV_PREFIX}BATCH_SIZE {size:?}"))?;
        }
        if let Some(cap) = lookup(&format!("{ENV_PREFIX}CAPACITY")) {
            self.capacity = Some(
                cap.parse()
                    .with_context(|| format!("invalid {ENV_PREFIX}CAPACITY {cap:?}"))?,
            );
        }
        self.batch_size = self.batch_size.max(1);
        Ok(())
    }
}
