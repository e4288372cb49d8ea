//! # Observability
//!
//! Tracing initialization and log output format selection.
//! `LOG_FORMAT` switches between JSON and pretty output; `RUST_LOG` controls levels.

/// Log output format
///
/// Chosen through the `LOG_FORMAT` environment variable.
/// Missing or unknown values fall back to [`Pretty`](LogFormat::Pretty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON lines, for production log shipping
    Json,
    /// Human readable, for development
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parses a log format name.
    ///
    /// Unknown values fall back to [`Pretty`](LogFormat::Pretty) with a warning on stderr,
    /// since the subscriber does not exist yet.
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// Reads `LOG_FORMAT`, defaulting to [`Pretty`](LogFormat::Pretty) when unset.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(val) => Self::parse(&val),
            Err(_) => Self::default(),
        }
    }
}

/// Tracing setup
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Recorded as `service` on the [`root_span`]
    pub service_name: String,
    pub log_format: LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` controls filtering and defaults to `"info,bookshelf=debug"`.
///
/// In JSON mode `timestamp`, `level`, `target` and `message` are emitted at the top level.
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,bookshelf=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// The process-wide `app` span carrying the service name.
///
/// The binary enters it right after [`init_tracing`], so JSON lines logged from `main`
/// include `span.service`.
pub fn root_span(config: &TracingConfig) -> tracing::Span {
    tracing::info_span!("app", service = %config.service_name)
}
