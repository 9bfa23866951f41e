//! Shared append log: fixed-width records in a memory-mapped region.
//!
//! Each channel is a file-backed shared mapping at
//! `<directory>/<prefix>.<channel_id>` (by default `/tmp/fullsight.<id>`).
//! One writer creates it; any number of readers, in any process, attach to
//! it by the same channel ID.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ offset 0: record_width (i32)   offset 4: record_count (i32)  │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Record 0  [record_width bytes]                               │
//! │ Record 1  [record_width bytes]                               │
//! │ ...                                                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Unused (zeroed) up to capacity                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency
//!
//! Single writer, many readers, no synchronization on the region. The writer
//! stores the record body before advancing the count, but a reader running
//! concurrently with an append can still observe a torn record. Detecting
//! that would need a sequence number in the header, which this format does
//! not have.
//!
//! # Example
//!
//! ```
//! use fullsight_core::channel::{Channel, ChannelConfig, Role};
//! use fullsight_core::types::ChannelId;
//!
//! let config = ChannelConfig::in_memory();
//! let id = ChannelId::new(42);
//!
//! let mut writer = Channel::open(id, Role::Writer, &config)?;
//! writer.append(b"abcd")?;
//!
//! let reader = Channel::open(id, Role::Reader, &config)?;
//! assert_eq!(reader.read_all()?, vec![b"abcd".to_vec()]);
//! # Ok::<(), fullsight_core::FullsightError>(())
//! ```

mod config;
mod header;
mod reader;
mod writer;

pub use config::{ChannelConfig, DEFAULT_CAPACITY, DEFAULT_PREFIX, MAX_CAPACITY};
pub use header::{ChannelHeader, HEADER_SIZE};
pub use reader::ChannelReader;
pub use writer::ChannelWriter;

use crate::error::{FullsightError, Result};
use crate::layout::{Record, RecordCodec};
use crate::types::ChannelId;
use std::fmt;
use std::path::Path;

/// How a handle attaches to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Creates or resets the region and appends to it.
    Writer,
    /// Maps an existing region read-only.
    Reader,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writer => f.write_str("writer"),
            Self::Reader => f.write_str("reader"),
        }
    }
}

/// An attached channel handle of either role.
#[derive(Debug)]
pub enum Channel {
    /// Writable handle.
    Writer(ChannelWriter),
    /// Read-only handle.
    Reader(ChannelReader),
}

impl Channel {
    /// Attach to `channel` in the given role.
    pub fn open(channel: ChannelId, role: Role, config: &ChannelConfig) -> Result<Self> {
        match role {
            Role::Writer => ChannelWriter::create(channel, config).map(Self::Writer),
            Role::Reader => ChannelReader::attach(channel, config).map(Self::Reader),
        }
    }

    /// The role this handle was opened with.
    pub fn role(&self) -> Role {
        match self {
            Self::Writer(_) => Role::Writer,
            Self::Reader(_) => Role::Reader,
        }
    }

    /// The channel this handle is attached to.
    pub fn channel_id(&self) -> ChannelId {
        match self {
            Self::Writer(w) => w.channel_id(),
            Self::Reader(r) => r.channel_id(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Writer(w) => w.path(),
            Self::Reader(r) => r.path(),
        }
    }

    /// Size of the mapped region in bytes.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Writer(w) => w.capacity(),
            Self::Reader(r) => r.capacity(),
        }
    }

    /// Re-read the header from the region.
    pub fn header(&self) -> Result<ChannelHeader> {
        match self {
            Self::Writer(w) => w.header(),
            Self::Reader(r) => r.header(),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.header()?.count())
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Fixed record width, 0 before the first append.
    pub fn record_width(&self) -> Result<usize> {
        Ok(self.header()?.width())
    }

    /// Records that still fit, or `None` while the width is unfixed.
    pub fn remaining_records(&self) -> Result<Option<usize>> {
        Ok(self.header()?.remaining_records(self.capacity()))
    }

    /// Append one record. Fails on a reader handle.
    pub fn append(&mut self, record: &[u8]) -> Result<()> {
        match self {
            Self::Writer(w) => w.append(record),
            Self::Reader(r) => Err(FullsightError::ReadOnlyChannel {
                channel: r.channel_id(),
            }),
        }
    }

    /// Every stored record, in append order.
    pub fn read_all(&self) -> Result<Vec<Vec<u8>>> {
        match self {
            Self::Writer(w) => w.read_all(),
            Self::Reader(r) => r.read_all(),
        }
    }

    /// Every stored record, unpacked with `codec`.
    pub fn read_decoded(&self, codec: &RecordCodec) -> Result<Vec<Record>> {
        codec.unpack_all(self.read_all()?)
    }

    /// Release the handle.
    pub fn close(self) -> Result<()> {
        match self {
            Self::Writer(w) => w.close(),
            Self::Reader(r) => r.close(),
        }
    }
}
