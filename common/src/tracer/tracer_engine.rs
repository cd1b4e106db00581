use thiserror::Error;
use tracing::{info, level_filters::LevelFilter, subscriber::SetGlobalDefaultError};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Cannot install global tracing subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

#[derive(Debug, Clone)]
pub struct TracerOptions {
    /// Level used when `RUST_LOG` is unset or cannot be parsed.
    pub default_level: LevelFilter,
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self {
            default_level: LevelFilter::INFO,
        }
    }
}

impl TracerOptions {
    pub fn new(default_level: LevelFilter) -> Self {
        Self { default_level }
    }

    /// Builds the filter applied to the stderr layer.
    /// Directives in `RUST_LOG` take precedence over `default_level`.
    pub(crate) fn env_filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.default_level.into())
            .from_env_lossy()
    }
}

/// This object installs the global tracing subscriber, given a TracerOptions struct.
/// Log lines are written to stderr so that stdout stays free for data output.
pub struct TracerEngine {
    service_name: String,
}

impl TracerEngine {
    /// Initialises the stderr tracer for the crate
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the binary being run.
    /// * `module_name` - The name of the current module.
    /// #Returns
    /// An instance of TracerEngine, or an error if a global subscriber is already set.
    pub fn new(
        options: TracerOptions,
        service_name: &str,
        module_name: &str,
    ) -> Result<Self, TracerError> {
        let stderr_tracer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let subscriber = tracing_subscriber::Registry::default()
            .with(stderr_tracer.with_filter(options.env_filter()));

        tracing::subscriber::set_global_default(subscriber)?;

        info!(service_name, module_name, "Tracer initialised");
        Ok(Self {
            service_name: service_name.to_owned(),
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
