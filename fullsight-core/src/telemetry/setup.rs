//! Tracing subscriber setup with format selection.

use super::config::{LogFormat, TracingConfig};
use crate::error::{FullsightError, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global tracing subscriber for the given configuration.
///
/// Meant for the process that hosts fullsight (task runner, plugin host);
/// the library itself only emits events. Fails if a global subscriber is
/// already installed.
///
/// # Example
///
/// ```no_run
/// use fullsight_core::telemetry::{init_tracing, TracingConfig};
///
/// init_tracing(&TracingConfig::from_env())?;
/// # Ok::<(), fullsight_core::FullsightError>(())
/// ```
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match config.log_format() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_file(config.include_location())
                    .with_line_number(config.include_location())
                    .with_target(config.include_target())
                    .with_thread_ids(config.include_thread_ids())
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(config.include_location())
                    .with_line_number(config.include_location())
                    .with_target(config.include_target())
                    .with_thread_ids(config.include_thread_ids()),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_file(config.include_location())
                    .with_line_number(config.include_location())
                    .with_target(config.include_target())
                    .with_thread_ids(config.include_thread_ids()),
            )
            .try_init(),
    };

    installed.map_err(|e| FullsightError::ConfigValue {
        key: "tracing".to_string(),
        cause: format!("Failed to initialize tracing subscriber: {}", e),
    })
}
