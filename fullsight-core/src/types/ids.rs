//! Strongly-typed identifiers for fullsight entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a shared-memory channel.
///
/// The channel ID is the only rendezvous point between a writer and its
/// readers: both sides must open the same ID to see the same region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(u32);

impl ChannelId {
    /// Create a new channel ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// File name of the backing region for this channel (`<prefix>.<id>`).
    #[must_use]
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}.{}", prefix, self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel_{}", self.0)
    }
}

impl From<u32> for ChannelId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
