//! Newline-delimited JSON ingestion into a [`BlockingConsumer`].

use std::future::Future;

use fleet_log::{Attr, Logger, RequestContext};
use fleet_services::consumers::{BlockingConsumer, Message};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Totals for one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub batches: u64,
    pub stored: u64,
    pub rejected: u64,
    pub malformed: u64,
}

/// Read messages line by line and hand them to `consumer` in batches of
/// `batch_size`. Each batch runs under its own request context.
///
/// Blank lines are skipped. Lines that do not decode are logged and counted;
/// a rejected batch is counted and ingestion continues. Reading stops at end
/// of input or once `shutdown` resolves; either way the pending partial batch
/// is flushed before returning.
pub async fn run<R, S>(
    reader: R,
    consumer: &dyn BlockingConsumer,
    logger: &Logger,
    batch_size: usize,
    shutdown: S,
) -> std::io::Result<Stats>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let batch_size = batch_size.max(1);
    let mut stats = Stats::default();
    let mut batch = Vec::with_capacity(batch_size);
    let mut lines = reader.lines();
    let mut line_no = 0u64;
    tokio::pin!(shutdown);

    loop {
        // Lines already buffered are drained before a shutdown is honoured.
        let next = tokio::select! {
            biased;
            line = lines.next_line() => Some(line),
            () = &mut shutdown => None,
        };
        let Some(line) = next else {
            break;
        };
        let Some(line) = line? else {
            break;
        };

        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Message>(line) {
            Ok(msg) => batch.push(msg),
            Err(e) => {
                stats.malformed += 1;
                logger.warn(
                    &RequestContext::new(),
                    "Skipping malformed message",
                    &[Attr::uint("line", line_no), Attr::error(&e)],
                );
            }
        }
        if batch.len() >= batch_size {
            flush(consumer, &mut batch, &mut stats).await;
        }
    }
    if !batch.is_empty() {
        flush(consumer, &mut batch, &mut stats).await;
    }
    Ok(stats)
}

async fn flush(consumer: &dyn BlockingConsumer, batch: &mut Vec<Message>, stats: &mut Stats) {
    let ctx = RequestContext::new();
    stats.batches += 1;
    // The consumer's logging middleware reports the outcome.
    match consumer.consume_blocking(&ctx, batch).await {
        Ok(()) => stats.stored += batch.len() as u64,
        Err(_) => stats.rejected += batch.len() as u64,
    }
    batch.clear();
}
