use uuid::Uuid;

/// Generate an OpenTelemetry-compatible trace ID (32 hex characters).
pub fn generate_trace_id() -> String {
    // A UUID without hyphens is exactly 32 hex chars (128 bits).
    Uuid::new_v4().as_simple().to_string()
}

/// Generate a span ID (16 hex characters).
pub fn generate_span_id() -> String {
    Uuid::new_v4().as_simple().to_string()[..16].to_string()
}

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// Request-scoped correlation data threaded through every service call and
/// every logger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    trace_id: String,
    span_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::with_trace_id(generate_trace_id())
    }

    /// Continue an existing trace, e.g. one received in an `X-Request-Id`.
    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: generate_span_id(),
        }
    }

    /// A context in the same trace with a fresh span.
    pub fn child(&self) -> Self {
        Self::with_trace_id(self.trace_id.clone())
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    /// A diagnostics span for `operation` carrying this context's ids.
    pub fn span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "operation",
            trace_id = %self.trace_id,
            span_id = %self.span_id,
            operation = %operation,
        )
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
