//! Subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// Human-readable events go to stderr, filtered by `RUST_LOG` when set and
/// by `config.trace_level` otherwise. With `config.trace_file` enabled, spans
/// are also exported as OTLP/JSON lines to the trace file in the data
/// directory.
///
/// Only the first call takes effect. Failing to create the data directory
/// disables the file export and nothing else.
///
/// # Example
///
/// ```rust
/// use shoplist::observability::init_tracing;
/// use shoplist::Config;
///
/// init_tracing(&Config {
///     trace_level: "debug".to_string(),
///     ..Default::default()
/// });
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.trace_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let otel_layer = config.trace_file.then(|| {
        let path = crate::infrastructure::trace_file();
        let dir = path.parent()?;
        std::fs::create_dir_all(dir).ok()?;

        let resource = Resource::new(vec![
            opentelemetry::KeyValue::new("service.name", tracer::SCOPE),
            opentelemetry::KeyValue::new("deployment.environment", config.environment.as_str()),
        ]);
        let provider = tracer::file_tracer_provider(path, resource);
        Some(OpenTelemetryLayer::new(provider.tracer(tracer::SCOPE)))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer.flatten())
        .with(fmt_layer)
        .try_init();
}
