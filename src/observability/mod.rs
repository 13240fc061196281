//! Logging and tracing.
//!
//! ```text
//! tracing ─┬─ fmt layer ─────────────────────────────────────→ stderr
//!          └─ tracing-opentelemetry → SDK → OtlpFileExporter → shoplist-otlp.json
//! ```
//!
//! The file export is off unless `trace_file` is enabled. It writes one
//! OTLP/JSON document per line and rotates at 10 MB, keeping 3 backups.
//! Outbound API requests carry a W3C `traceparent` header whenever an
//! OpenTelemetry span is active.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `tracer`: Tracer provider with file export
//! - `span_formatter`: OTLP/JSON encoding
//! - `file_writer`: Size-rotated file
//! - [`propagation`]: `traceparent` for outbound requests

mod file_writer;
mod init;
pub mod propagation;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
pub use propagation::TraceContext;
