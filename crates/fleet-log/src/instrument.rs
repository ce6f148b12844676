//! Per-call instrumentation shared by every logging middleware.
//!
//! A call is traced from the moment it starts until it yields an outcome:
//! the elapsed time, a set of operation fields and, on failure, the error are
//! written as exactly one record. Successful calls are logged at `info`,
//! failed ones at `warn`. Fields derived from the result see the result type's
//! default value when the call failed, so a given operation always logs the
//! same keys.

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Instant;

use tracing::Instrument;

use crate::attr::Attr;
use crate::context::RequestContext;
use crate::level::Level;
use crate::logger::Logger;

const PANICKED: &str = "operation panicked";
const ABANDONED: &str = "operation abandoned before completion";

// ---------------------------------------------------------------------------
// CallTrace
// ---------------------------------------------------------------------------

/// Scope guard for one instrumented call.
///
/// Consumed by [`CallTrace::record`]. If it is dropped instead (the call
/// panicked, or the future driving it was dropped) a `warn` record is still
/// written.
pub struct CallTrace<'a, T, F>
where
    T: Default,
    F: FnOnce(&T) -> Vec<Attr>,
{
    logger: &'a Logger,
    ctx: &'a RequestContext,
    operation: &'a str,
    start: Instant,
    fields: Option<F>,
    recorded: bool,
    _result: PhantomData<fn(&T)>,
}

impl<'a, T, F> CallTrace<'a, T, F>
where
    T: Default,
    F: FnOnce(&T) -> Vec<Attr>,
{
    pub fn start(logger: &'a Logger, ctx: &'a RequestContext, operation: &'a str, fields: F) -> Self {
        Self {
            logger,
            ctx,
            operation,
            start: Instant::now(),
            fields: Some(fields),
            recorded: false,
            _result: PhantomData,
        }
    }

    /// Write the record for `outcome`.
    pub fn record<E: Display>(mut self, outcome: &Result<T, E>) {
        let Some(fields) = self.fields.take() else {
            return;
        };
        let (attrs, error) = match outcome {
            Ok(value) => (fields(value), None),
            Err(err) => (fields(&T::default()), Some(err.to_string())),
        };
        self.recorded = true;
        self.emit(attrs, error);
    }

    fn emit(&self, fields: Vec<Attr>, error: Option<String>) {
        let mut attrs = Vec::with_capacity(fields.len() + 2);
        attrs.push(Attr::duration("duration", self.start.elapsed()));
        attrs.extend(fields);
        match error {
            Some(err) => {
                attrs.push(Attr::string("error", err));
                let msg = format!("{} failed to complete successfully", self.operation);
                self.logger.log(self.ctx, Level::Warn, &msg, &attrs);
            }
            None => {
                let msg = format!("{} completed successfully", self.operation);
                self.logger.log(self.ctx, Level::Info, &msg, &attrs);
            }
        }
    }
}

impl<T, F> Drop for CallTrace<'_, T, F>
where
    T: Default,
    F: FnOnce(&T) -> Vec<Attr>,
{
    fn drop(&mut self) {
        if self.recorded {
            return;
        }
        let reason = if std::thread::panicking() {
            PANICKED
        } else {
            ABANDONED
        };
        // Without a builder (it panicked inside `record`) only duration and error remain.
        let attrs = match self.fields.take() {
            Some(fields) => fields(&T::default()),
            None => Vec::new(),
        };
        self.emit(attrs, Some(reason.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Await `call`, log its outcome as `operation` and hand the outcome back.
///
/// The call runs inside the context's diagnostics span.
pub async fn observe<T, E, F, Fut>(
    logger: &Logger,
    ctx: &RequestContext,
    operation: &str,
    fields: F,
    call: Fut,
) -> Result<T, E>
where
    T: Default,
    E: Display,
    F: FnOnce(&T) -> Vec<Attr>,
    Fut: Future<Output = Result<T, E>>,
{
    let trace = CallTrace::start(logger, ctx, operation, fields);
    let outcome = call.instrument(ctx.span(operation)).await;
    trace.record(&outcome);
    outcome
}

/// Synchronous counterpart of [`observe`].
pub fn observe_blocking<T, E, F, C>(
    logger: &Logger,
    ctx: &RequestContext,
    operation: &str,
    fields: F,
    call: C,
) -> Result<T, E>
where
    T: Default,
    E: Display,
    F: FnOnce(&T) -> Vec<Attr>,
    C: FnOnce() -> Result<T, E>,
{
    let trace = CallTrace::start(logger, ctx, operation, fields);
    let outcome = call();
    trace.record(&outcome);
    outcome
}

/// Field builder for operations that log nothing beyond duration and error.
pub fn no_fields<T>(_: &T) -> Vec<Attr> {
    Vec::new()
}
