//! Process diagnostics: the `tracing` channel used for startup and shutdown
//! messages and for reporting records the [`Logger`](crate::Logger) could not
//! deliver. It always writes to stderr.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::DiagnosticsConfig;

/// Install the diagnostics subscriber.
///
/// Uses the `RUST_LOG` environment variable if set, otherwise falls back
/// to `default_filter` (e.g. "warn", "fleet_log=debug,info").
///
/// Safe to call multiple times (e.g. in tests) -- subsequent calls are no-ops.
pub fn init_diagnostics(service_name: &str, default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    let installed = if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::info!(service = service_name, json, "diagnostics initialised");
    }
}

/// [`init_diagnostics`] driven by a [`DiagnosticsConfig`].
pub fn init_from_config(service_name: &str, cfg: &DiagnosticsConfig) {
    init_diagnostics(service_name, &cfg.filter, cfg.json);
}
