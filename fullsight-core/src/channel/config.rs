//! Channel configuration.

use super::header::HEADER_SIZE;
use crate::layout::ByteOrder;
use crate::types::ChannelId;
use std::env;
use std::path::PathBuf;

/// Default region capacity: 16 KiB.
pub const DEFAULT_CAPACITY: usize = 16 * 1024;

/// Maximum region capacity. Header fields are 32-bit signed integers.
pub const MAX_CAPACITY: usize = i32::MAX as usize;

/// Default file name prefix for backing regions.
pub const DEFAULT_PREFIX: &str = "fullsight";

/// Configuration for opening a channel.
///
/// Writer and readers of one channel must agree on `directory`, `prefix`
/// and `byte_order`. Readers map whatever size the writer created, so their
/// `capacity` is ignored.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Region capacity in bytes, header included.
    pub capacity: usize,
    /// Directory holding backing files.
    pub directory: PathBuf,
    /// Backing file name prefix; the file is `<prefix>.<channel_id>`.
    pub prefix: String,
    /// Byte order of the header integers.
    pub byte_order: ByteOrder,
    /// Whether to flush the mapping after every append.
    pub sync_on_write: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            directory: default_directory(),
            prefix: DEFAULT_PREFIX.to_string(),
            byte_order: ByteOrder::Native,
            sync_on_write: false,
        }
    }
}

#[cfg(unix)]
fn default_directory() -> PathBuf {
    PathBuf::from("/tmp")
}

#[cfg(not(unix))]
fn default_directory() -> PathBuf {
    env::temp_dir()
}

impl ChannelConfig {
    /// Create a configuration for tests.
    ///
    /// Uses a temporary directory with a unique name per invocation.
    pub fn in_memory() -> Self {
        Self {
            directory: env::temp_dir().join(format!("fullsight_shm_{}", uuid::Uuid::new_v4())),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FULLSIGHT_SHM_DIR`: directory for backing files
    /// - `FULLSIGHT_SHM_CAPACITY`: region capacity in bytes
    /// - `FULLSIGHT_SHM_BYTE_ORDER`: "native", "little-endian" or "big-endian"
    /// - `FULLSIGHT_SHM_SYNC`: "true" or "1" to flush after every append
    ///
    /// Unparseable values are logged and replaced by defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("FULLSIGHT_SHM_DIR") {
            config.directory = PathBuf::from(dir);
        }

        if let Ok(raw) = env::var("FULLSIGHT_SHM_CAPACITY") {
            match raw.parse::<usize>() {
                Ok(capacity) => config = config.with_capacity(capacity),
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "Invalid FULLSIGHT_SHM_CAPACITY, using default"
                ),
            }
        }

        if let Ok(raw) = env::var("FULLSIGHT_SHM_BYTE_ORDER") {
            match raw.parse::<ByteOrder>() {
                Ok(order) => config.byte_order = order,
                Err(e) => tracing::warn!(error = %e, "Invalid FULLSIGHT_SHM_BYTE_ORDER, using default"),
            }
        }

        config.sync_on_write = env::var("FULLSIGHT_SHM_SYNC")
            .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
            .unwrap_or(false);

        config
    }

    /// Set the region capacity, clamped to `[HEADER_SIZE, MAX_CAPACITY]`.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.clamp(HEADER_SIZE, MAX_CAPACITY);
        self
    }

    /// Set the directory for backing files.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the backing file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the header byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Enable flushing after every append.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }

    /// Path of the backing file for a channel.
    #[must_use]
    pub fn path_for(&self, channel: ChannelId) -> PathBuf {
        self.directory.join(channel.file_name(&self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.capacity, 16384);
        assert_eq!(config.byte_order, ByteOrder::Native);
        assert!(!config.sync_on_write);
    }

    #[cfg(unix)]
    #[test]
    fn default_path_is_well_known() {
        let path = ChannelConfig::default().path_for(ChannelId::new(42));
        assert_eq!(path, PathBuf::from("/tmp/fullsight.42"));
    }

    #[test]
    fn in_memory_unique() {
        let a = ChannelConfig::in_memory();
        let b = ChannelConfig::in_memory();
        assert_ne!(a.directory, b.directory);
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(ChannelConfig::default().with_capacity(0).capacity, HEADER_SIZE);
        assert_eq!(ChannelConfig::default().with_capacity(4096).capacity, 4096);
    }

    #[test]
    fn builder_sets_path_parts() {
        let config = ChannelConfig::default()
            .with_directory("/var/run/probe")
            .with_prefix("probe");
        assert_eq!(
            config.path_for(ChannelId::new(1)),
            PathBuf::from("/var/run/probe/probe.1")
        );
    }
}
