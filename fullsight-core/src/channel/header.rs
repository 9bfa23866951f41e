//! Channel region header.

use crate::error::{FullsightError, Result};
use crate::layout::ByteOrder;
use crate::types::ChannelId;

/// Fixed size of the region header in bytes.
pub const HEADER_SIZE: usize = 8;

/// The `(record_width, record_count)` prefix of a channel region.
///
/// Both values are stored as 4-byte signed integers in the channel's byte
/// order at offset 0. There is no sequence number: a reader racing an append
/// can observe a torn record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelHeader {
    /// Bytes per record, 0 until the first append.
    pub record_width: i32,
    /// Number of records stored.
    pub record_count: i32,
}

impl ChannelHeader {
    /// Decode a header from the first [`HEADER_SIZE`] bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`HEADER_SIZE`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self {
        Self {
            record_width: order.read_i32(&bytes[0..4]),
            record_count: order.read_i32(&bytes[4..8]),
        }
    }

    /// Encode this header into the first [`HEADER_SIZE`] bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`HEADER_SIZE`].
    pub fn write_to(&self, bytes: &mut [u8], order: ByteOrder) {
        order.write_i32(&mut bytes[0..4], self.record_width);
        order.write_i32(&mut bytes[4..8], self.record_count);
    }

    /// Record width as a size. Negative widths (rejected by
    /// [`validate`](Self::validate)) read as 0.
    #[must_use]
    pub fn width(&self) -> usize {
        usize::try_from(self.record_width).unwrap_or(0)
    }

    /// Record count as a size. Negative counts read as 0.
    #[must_use]
    pub fn count(&self) -> usize {
        usize::try_from(self.record_count).unwrap_or(0)
    }

    /// Bytes occupied by the header plus all stored records.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        HEADER_SIZE + self.width() * self.count()
    }

    /// Byte offset of the record at `index`.
    #[must_use]
    pub fn record_offset(&self, index: usize) -> usize {
        HEADER_SIZE + index * self.width()
    }

    /// Records that still fit in a region of `region_len` bytes, or `None`
    /// while the width is unfixed.
    #[must_use]
    pub fn remaining_records(&self, region_len: usize) -> Option<usize> {
        if self.record_width <= 0 {
            return None;
        }
        Some(region_len.saturating_sub(self.used_bytes()) / self.width())
    }

    /// Check the header against a region of `region_len` bytes.
    pub fn validate(&self, region_len: usize) -> std::result::Result<(), String> {
        if self.record_width < 0 {
            return Err(format!("negative record width {}", self.record_width));
        }
        if self.record_count < 0 {
            return Err(format!("negative record count {}", self.record_count));
        }
        if self.record_count > 0 && self.record_width == 0 {
            return Err(format!("{} records of width 0", self.record_count));
        }
        let used = self
            .width()
            .checked_mul(self.count())
            .and_then(|n| n.checked_add(HEADER_SIZE));
        match used {
            Some(used) if used <= region_len => Ok(()),
            _ => Err(format!(
                "{} records of {} bytes exceed region of {} bytes",
                self.record_count, self.record_width, region_len
            )),
        }
    }

    /// Read and validate the header of a mapped region.
    pub(crate) fn load(channel: ChannelId, region: &[u8], order: ByteOrder) -> Result<Self> {
        if region.len() < HEADER_SIZE {
            return Err(FullsightError::CorruptHeader {
                channel,
                cause: format!("region is {} bytes, header needs {}", region.len(), HEADER_SIZE),
            });
        }
        let header = Self::from_bytes(region, order);
        header
            .validate(region.len())
            .map_err(|cause| FullsightError::CorruptHeader { channel, cause })?;
        Ok(header)
    }

    /// Copy every stored record out of a region, in append order.
    pub(crate) fn records(&self, region: &[u8]) -> Vec<Vec<u8>> {
        (0..self.count())
            .map(|i| {
                let start = self.record_offset(i);
                region[start..start + self.width()].to_vec()
            })
            .collect()
    }
}
