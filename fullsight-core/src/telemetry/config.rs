//! Configuration types for log output.

use std::env;
use std::io::IsTerminal;
use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON format for structured logging.
    Json,
    /// Human-readable multi-line format.
    Pretty,
    /// Compact single-line format.
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::default(),
        })
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    log_format: LogFormat,
    log_filter: String,
    include_location: bool,
    include_target: bool,
    include_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_filter: "info".to_string(),
            include_location: false,
            include_target: true,
            include_thread_ids: false,
        }
    }
}

impl TracingConfig {
    /// Create a new builder.
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FULLSIGHT_LOG_FORMAT`: "json", "pretty", or "compact"
    /// - `FULLSIGHT_LOG_LEVEL` or `RUST_LOG`: log filter string
    /// - `FULLSIGHT_LOG_LOCATION`: "true" to include file and line
    /// - `FULLSIGHT_LOG_THREAD_IDS`: "true" to include thread IDs
    pub fn from_env() -> Self {
        let log_format = env::var("FULLSIGHT_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse::<LogFormat>().ok())
            .unwrap_or_else(|| {
                // JSON when piped into a collector, compact on a terminal.
                if std::io::stderr().is_terminal() {
                    LogFormat::Compact
                } else {
                    LogFormat::Json
                }
            });

        let log_filter = env::var("FULLSIGHT_LOG_LEVEL")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        Self {
            log_format,
            log_filter,
            include_location: env_flag("FULLSIGHT_LOG_LOCATION"),
            include_target: true,
            include_thread_ids: env_flag("FULLSIGHT_LOG_THREAD_IDS"),
        }
    }

    /// Get the log format.
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Get the log filter directive.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Whether to include file and line in events.
    pub fn include_location(&self) -> bool {
        self.include_location
    }

    /// Whether to include the event target.
    pub fn include_target(&self) -> bool {
        self.include_target
    }

    /// Whether to include thread IDs.
    pub fn include_thread_ids(&self) -> bool {
        self.include_thread_ids
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
        .unwrap_or(false)
}

/// Builder for [`TracingConfig`].
#[derive(Debug, Default)]
pub struct TracingConfigBuilder {
    config: TracingConfig,
}

impl TracingConfigBuilder {
    /// Set the log format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.log_format = format;
        self
    }

    /// Set the log filter directive (e.g. `"debug,fullsight_core=trace"`).
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    /// Include file and line in events.
    pub fn include_location(mut self, include: bool) -> Self {
        self.config.include_location = include;
        self
    }

    /// Include the event target.
    pub fn include_target(mut self, include: bool) -> Self {
        self.config.include_target = include;
        self
    }

    /// Include thread IDs.
    pub fn include_thread_ids(mut self, include: bool) -> Self {
        self.config.include_thread_ids = include;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> TracingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("whatever".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = TracingConfig::builder()
            .log_format(LogFormat::Json)
            .log_filter("debug")
            .include_location(true)
            .build();

        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.log_filter(), "debug");
        assert!(config.include_location());
        assert!(config.include_target());
        assert!(!config.include_thread_ids());
    }
}
