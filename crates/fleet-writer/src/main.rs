//! fleet-writer: reads broker messages as NDJSON from stdin and stores them
//! through a logged consumer.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use fleet_log::{diagnostics, Attr, ConfigError, RequestContext};
use fleet_services::consumers::{self, MemoryWriter};
use tokio::io::BufReader;
use tracing::info;

mod config;
mod ingest;

use config::WriterConfig;

const SERVICE: &str = "fleet-writer";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ConfigError>() {
                Some(ConfigError::InvalidLevel { diagnostic, .. }) => eprintln!("{diagnostic}"),
                _ => eprintln!("{SERVICE}: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = WriterConfig::load().context("failed to load configuration")?;

    let logger = cfg.log.build_logger()?;
    diagnostics::init_from_config(SERVICE, &cfg.log.diagnostics);

    let writer = Arc::new(match cfg.capacity {
        Some(cap) => MemoryWriter::bounded(cap),
        None => MemoryWriter::new(),
    });
    let consumer = consumers::logging_middleware(writer.clone(), logger.clone());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        batch_size = cfg.batch_size,
        level = %logger.level(),
        "writer starting"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stats = ingest::run(stdin, consumer.as_ref(), &logger, cfg.batch_size, shutdown_signal())
        .await
        .context("failed to read messages")?;

    logger.info(
        &RequestContext::new(),
        "Writer finished",
        &[
            Attr::uint("batches", stats.batches),
            Attr::uint("stored", stats.stored),
            Attr::uint("rejected", stats.rejected),
            Attr::uint("malformed", stats.malformed),
        ],
    );
    info!(stored = writer.len(), "writer stopped");
    Ok(())
}

/// Resolves on ctrl-c. If the handler cannot be installed the writer runs
/// until its input ends.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("ctrl-c received, flushing pending messages"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
