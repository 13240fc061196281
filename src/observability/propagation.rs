//! W3C trace-context propagation for outbound requests.

use opentelemetry::trace::TraceContextExt;
use serde::{Deserialize, Serialize};
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Trace identity of the current span, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    pub trace_id: String,
    pub parent_span_id: String,
    pub sampled: bool,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of the current `tracing` span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// is disabled.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        let context = tracing::Span::current().context();
        let span = context.span();
        let span_context = span.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
            sampled: span_context.is_sampled(),
        })
    }

    /// `traceparent` header value (version 00).
    ///
    /// # Examples
    ///
    /// ```
    /// use shoplist::observability::TraceContext;
    ///
    /// let ctx = TraceContext {
    ///     trace_id: "4bf92f3577b34da6a3ce929d0e0e4736".into(),
    ///     parent_span_id: "00f067aa0ba902b7".into(),
    ///     sampled: true,
    /// };
    /// assert_eq!(
    ///     ctx.traceparent(),
    ///     "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
    /// );
    /// ```
    #[must_use]
    pub fn traceparent(&self) -> String {
        let flags = if self.sampled { "01" } else { "00" };
        format!("00-{}-{}-{flags}", self.trace_id, self.parent_span_id)
    }
}

/// `traceparent` for the current span, if any.
#[must_use]
pub fn current_traceparent() -> Option<String> {
    TraceContext::from_current().map(|ctx| ctx.traceparent())
}
