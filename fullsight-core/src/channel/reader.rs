//! Reader side of a channel.

use super::config::ChannelConfig;
use super::header::{ChannelHeader, HEADER_SIZE};
use crate::error::{FullsightError, Result};
use crate::layout::{ByteOrder, Record, RecordCodec};
use crate::types::ChannelId;
use memmap2::Mmap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A read-only view of a channel.
///
/// Any number of readers may be attached at once, in any process. Each
/// [`read_all`](Self::read_all) re-reads the header and re-scans every record;
/// there is no cursor.
pub struct ChannelReader {
    channel: ChannelId,
    path: PathBuf,
    mmap: Mmap,
    byte_order: ByteOrder,
}

impl ChannelReader {
    /// Attach to the existing region for `channel`.
    ///
    /// Fails with [`FullsightError::Attach`] if no writer has created the
    /// region yet. Retrying after the writer has opened is up to the caller.
    pub fn attach(channel: ChannelId, config: &ChannelConfig) -> Result<Self> {
        let path = config.path_for(channel);
        let attach_error = |cause: String| FullsightError::Attach {
            channel,
            path: path.clone(),
            cause,
        };

        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                attach_error("region does not exist; the writer must open the channel first".into())
            }
            _ => attach_error(e.to_string()),
        })?;

        let len = file
            .metadata()
            .map_err(|e| attach_error(e.to_string()))?
            .len();
        if len < HEADER_SIZE as u64 {
            return Err(attach_error(format!(
                "region is {} bytes, smaller than the {} byte header",
                len, HEADER_SIZE
            )));
        }

        // SAFETY: the mapping is read-only and writers only ever grow the
        // backing file.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| attach_error(format!("mmap failed: {}", e)))?;

        let header = ChannelHeader::load(channel, &mmap, config.byte_order)?;

        tracing::info!(
            channel = %channel,
            path = %path.display(),
            width = header.record_width,
            count = header.record_count,
            "Channel attached"
        );

        Ok(Self {
            channel,
            path,
            mmap,
            byte_order: config.byte_order,
        })
    }

    /// The channel this reader is attached to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the mapped region in bytes.
    pub fn capacity(&self) -> usize {
        self.mmap.len()
    }

    /// Byte order of the header integers.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Re-read the header from the region.
    pub fn header(&self) -> Result<ChannelHeader> {
        ChannelHeader::load(self.channel, &self.mmap, self.byte_order)
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

    /// Records the writer can still append, or `None` while the width is
    /// unfixed.
    pub fn remaining_records(&self) -> Result<Option<usize>> {
        Ok(self.header()?.remaining_records(self.capacity()))
    }

    /// Every stored record, in append order.
    ///
    /// Returns an empty list when nothing has been appended; it never waits.
    pub fn read_all(&self) -> Result<Vec<Vec<u8>>> {
        let header = self.header()?;
        let records = header.records(&self.mmap);
        tracing::debug!(
            channel = %self.channel,
            count = records.len(),
            "Channel scanned"
        );
        Ok(records)
    }

    /// Every stored record, unpacked with `codec`.
    pub fn read_decoded(&self, codec: &RecordCodec) -> Result<Vec<Record>> {
        codec.unpack_all(self.read_all()?)
    }

    /// Release the mapping.
    pub fn close(self) -> Result<()> {
        tracing::debug!(channel = %self.channel, "Channel reader closed");
        Ok(())
    }
}

impl std::fmt::Debug for ChannelReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelReader")
            .field("channel", &self.channel)
            .field("path", &self.path)
            .field("capacity", &self.mmap.len())
            .finish()
    }
}
