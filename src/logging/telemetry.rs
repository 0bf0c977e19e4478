use std::time::Duration;

use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{BatchConfigBuilder, Config, RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Instrumentation scope shared by the tracer and the meter
pub const METER_NAME: &str = "todo-views-backend";

const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";
const METRICS_EXPORT_PERIOD: Duration = Duration::from_secs(30);

/// Output format of the log lines written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON lines, anything else plain text
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Logging and OpenTelemetry export settings.
///
/// Both exporters are off unless `OTEL_ENABLE_TRACING` / `OTEL_ENABLE_METRICS`
/// are set to `true`, so a local run needs no collector.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    /// OTLP gRPC endpoint (e.g. "http://localhost:4317")
    pub otlp_endpoint: String,
    pub enable_metrics: bool,
    pub enable_tracing: bool,
    /// Filter directive used when `RUST_LOG` is unset or invalid
    pub log_level: String,
    pub log_format: LogFormat,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string()),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_OTLP_ENDPOINT.to_string()),
            enable_metrics: env_flag("OTEL_ENABLE_METRICS"),
            enable_tracing: env_flag("OTEL_ENABLE_TRACING"),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: std::env::var("TODO_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}

impl TelemetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    pub fn with_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    fn resource(&self) -> Resource {
        Resource::new(vec![
            KeyValue::new(SERVICE_NAME, self.service_name.clone()),
            KeyValue::new(SERVICE_VERSION, self.service_version.clone()),
        ])
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true);
        match self.log_format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Text => layer.with_thread_ids(true).boxed(),
        }
    }
}

fn install_tracer(config: &TelemetryConfig, resource: Resource) -> Result<Tracer, Box<dyn std::error::Error>> {
    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(&config.otlp_endpoint),
        )
        .with_trace_config(
            Config::default()
                .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_queue_size(10_000)
                .with_max_export_batch_size(2048)
                .with_scheduled_delay(Duration::from_secs(1))
                .build(),
        )
        .install_batch(runtime::Tokio)?;

    global::set_tracer_provider(provider.clone());
    Ok(provider.tracer(METER_NAME))
}

fn install_meter_provider(config: &TelemetryConfig, resource: Resource) -> Result<(), Box<dyn std::error::Error>> {
    let provider = opentelemetry_otlp::new_pipeline()
        .metrics(runtime::Tokio)
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(&config.otlp_endpoint),
        )
        .with_resource(resource)
        .with_period(METRICS_EXPORT_PERIOD)
        .build()?;

    global::set_meter_provider(provider);
    Ok(())
}

/// Install the global subscriber and, when enabled, the OTLP trace and
/// metric pipelines. Must run inside a Tokio runtime and only once.
///
/// # Example
/// ```rust,no_run
/// use todo_views_backend::logging::init_telemetry;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     init_telemetry(None)?;
///     Ok(())
/// }
/// ```
pub fn init_telemetry(config: Option<TelemetryConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let config = config.unwrap_or_default();
    let resource = config.resource();

    let tracer = if config.enable_tracing {
        Some(install_tracer(&config, resource.clone())?)
    } else {
        None
    };
    if config.enable_metrics {
        install_meter_provider(&config, resource)?;
    }

    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(config.env_filter()))
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .try_init()?;

    info!(
        service = %config.service_name,
        version = %config.service_version,
        otlp_endpoint = %config.otlp_endpoint,
        metrics = config.enable_metrics,
        tracing = config.enable_tracing,
        log_format = ?config.log_format,
        "Telemetry initialized"
    );
    Ok(())
}

/// Flush pending spans and drop the global tracer provider
pub fn shutdown_telemetry() {
    info!("Shutting down telemetry");
    global::shutdown_tracer_provider();
}

/// Counter on the service meter. Instruments created before
/// `init_telemetry` installs a provider record into a no-op.
///
/// # Example
/// ```rust
/// use todo_views_backend::logging::create_counter;
///
/// let counter = create_counter("todos_created_total", "Todos created");
/// counter.add(1, &[]);
/// ```
pub fn create_counter(name: &str, description: &str) -> opentelemetry::metrics::Counter<u64> {
    global::meter(METER_NAME)
        .u64_counter(name.to_string())
        .with_description(description.to_string())
        .init()
}

/// Histogram on the service meter
///
/// # Example
/// ```rust
/// use todo_views_backend::logging::create_histogram;
///
/// let histogram = create_histogram("todo_list_size", "Todos returned per listing");
/// histogram.record(3.0, &[]);
/// ```
pub fn create_histogram(name: &str, description: &str) -> opentelemetry::metrics::Histogram<f64> {
    global::meter(METER_NAME)
        .f64_histogram(name.to_string())
        .with_description(description.to_string())
        .init()
}
