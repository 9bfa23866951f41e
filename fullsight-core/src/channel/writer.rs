//! Writer side of a channel.

use super::config::{ChannelConfig, MAX_CAPACITY};
use super::header::{ChannelHeader, HEADER_SIZE};
use crate::error::{FullsightError, Result};
use crate::layout::{ByteOrder, FieldValue, Record, RecordCodec};
use crate::types::ChannelId;
use fs2::FileExt;
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// The single writer of a channel.
///
/// Creating a writer resets the region: the whole mapping is zeroed and the
/// header set to `(0, 0)`. The backing file is never truncated or shrunk,
/// so readers that are still mapped keep valid memory: re-creating a channel
/// with a smaller capacity keeps the existing size.
///
/// An exclusive advisory lock on the backing file keeps a second writer out
/// for as long as this handle lives.
pub struct ChannelWriter {
    channel: ChannelId,
    path: PathBuf,
    file: File,
    mmap: MmapMut,
    byte_order: ByteOrder,
    sync_on_write: bool,
    header: ChannelHeader,
}

impl ChannelWriter {
    /// Create (or reset) the region for `channel` and attach writable.
    pub fn create(channel: ChannelId, config: &ChannelConfig) -> Result<Self> {
        let path = config.path_for(channel);
        let attach_error = |cause: String| FullsightError::Attach {
            channel,
            path: path.clone(),
            cause,
        };

        std::fs::create_dir_all(&config.directory).map_err(|e| attach_error(e.to_string()))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| attach_error(e.to_string()))?;

        file.try_lock_exclusive()
            .map_err(|e| attach_error(format!("channel already has a writer: {}", e)))?;

        let existing = file
            .metadata()
            .map_err(|e| attach_error(e.to_string()))?
            .len();
        let existing = usize::try_from(existing)
            .unwrap_or(usize::MAX)
            .min(MAX_CAPACITY);

        // Readers may still map the previous size, so the file only grows.
        let capacity = config
            .capacity
            .clamp(HEADER_SIZE, MAX_CAPACITY)
            .max(existing);
        if existing < capacity {
            file.set_len(capacity as u64)
                .map_err(|e| attach_error(e.to_string()))?;
        }

        // SAFETY: the file is at least `capacity` bytes, never shrinks, and
        // stays open for the lifetime of the mapping.
        let mut mmap = unsafe {
            MmapOptions::new()
                .len(capacity)
                .map_mut(&file)
                .map_err(|e| attach_error(format!("mmap failed: {}", e)))?
        };

        mmap.fill(0);
        let header = ChannelHeader::default();
        header.write_to(&mut mmap[..HEADER_SIZE], config.byte_order);

        let mut writer = Self {
            channel,
            path,
            file,
            mmap,
            byte_order: config.byte_order,
            sync_on_write: config.sync_on_write,
            header,
        };

        if writer.sync_on_write {
            writer.flush()?;
        }

        // Synchronize the local cache with what is actually mapped.
        writer.header = writer.load_header()?;

        tracing::info!(
            channel = %channel,
            path = %writer.path.display(),
            capacity,
            "Channel created"
        );

        Ok(writer)
    }

    /// The channel this writer owns.
    pub fn channel_id(&self) -> ChannelId {
        self.channel
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total region capacity in bytes, header included.
    pub fn capacity(&self) -> usize {
        self.mmap.len()
    }

    /// Byte order of the header integers.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Re-read the header from the region.
    pub fn header(&self) -> Result<ChannelHeader> {
        self.load_header()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load_header()?.count())
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Fixed record width, 0 before the first append.
    pub fn record_width(&self) -> Result<usize> {
        Ok(self.load_header()?.width())
    }

    /// Records that still fit, or `None` before the first append fixes the
    /// record width.
    pub fn remaining_records(&self) -> Result<Option<usize>> {
        Ok(self.load_header()?.remaining_records(self.capacity()))
    }

    /// Append one record.
    ///
    /// The first append fixes the record width for the life of the region.
    /// Width and capacity are checked before any byte is written, and the
    /// record body is written before the header count is advanced.
    pub fn append(&mut self, record: &[u8]) -> Result<()> {
        let header = self.load_header()?;
        let width = record.len();

        if width == 0 || (header.record_width != 0 && width != header.width()) {
            tracing::warn!(
                channel = %self.channel,
                expected = header.width(),
                actual = width,
                "Rejected append with mismatched record width"
            );
            return Err(FullsightError::RecordWidthMismatch {
                channel: self.channel,
                expected: header.width(),
                actual: width,
            });
        }

        let count = header.count();
        let end = count
            .checked_add(1)
            .and_then(|n| n.checked_mul(width))
            .and_then(|n| n.checked_add(HEADER_SIZE));
        let capacity = self.capacity();
        if end.map_or(true, |end| end > capacity) {
            tracing::warn!(
                channel = %self.channel,
                capacity,
                width,
                count,
                "Rejected append: channel full"
            );
            return Err(FullsightError::CapacityExceeded {
                channel: self.channel,
                capacity,
                record_width: width,
                record_count: count,
            });
        }

        // Capacity is at most i32::MAX, so both conversions fit.
        let next = ChannelHeader {
            record_width: width as i32,
            record_count: (count + 1) as i32,
        };

        let offset = HEADER_SIZE + count * width;
        self.mmap[offset..offset + width].copy_from_slice(record);
        next.write_to(&mut self.mmap[..HEADER_SIZE], self.byte_order);
        self.header = next;

        if self.sync_on_write {
            self.flush()?;
        }

        tracing::debug!(
            channel = %self.channel,
            count = next.record_count,
            width,
            "Record appended"
        );

        Ok(())
    }

    /// Pack `values` with `codec` and append the block.
    pub fn append_record(&mut self, codec: &RecordCodec, values: &[FieldValue]) -> Result<()> {
        let block = codec.pack(values)?;
        self.append(&block)
    }

    /// Every stored record, in append order.
    pub fn read_all(&self) -> Result<Vec<Vec<u8>>> {
        let header = self.load_header()?;
        Ok(header.records(&self.mmap))
    }

    /// Every stored record, unpacked with `codec`.
    pub fn read_decoded(&self, codec: &RecordCodec) -> Result<Vec<Record>> {
        codec.unpack_all(self.read_all()?)
    }

    /// Flush the mapping to the backing file.
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush().map_err(|e| FullsightError::Io {
            channel: self.channel,
            path: self.path.clone(),
            cause: e.to_string(),
        })
    }

    /// Flush and release the mapping and the writer lock.
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    fn load_header(&self) -> Result<ChannelHeader> {
        ChannelHeader::load(self.channel, &self.mmap, self.byte_order)
    }
}

impl Drop for ChannelWriter {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::info!(
            channel = %self.channel,
            count = self.header.record_count,
            "Channel writer closed"
        );
    }
}

impl std::fmt::Debug for ChannelWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelWriter")
            .field("channel", &self.channel)
            .field("path", &self.path)
            .field("capacity", &self.mmap.len())
            .field("header", &self.header)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &Path, capacity: usize) -> ChannelConfig {
        ChannelConfig::default()
            .with_directory(dir)
            .with_capacity(capacity)
    }

    #[test]
    fn create_writes_empty_header() {
        let dir = tempdir().unwrap();
        let writer = ChannelWriter::create(ChannelId::new(1), &config(dir.path(), 1024)).unwrap();

        assert!(writer.path().exists());
        assert_eq!(writer.capacity(), 1024);
        assert_eq!(writer.header().unwrap(), ChannelHeader::default());
        assert!(writer.is_empty().unwrap());
        assert_eq!(writer.remaining_records().unwrap(), None);
    }

    #[test]
    fn append_then_read_in_order() {
        let dir = tempdir().unwrap();
        let mut writer =
            ChannelWriter::create(ChannelId::new(2), &config(dir.path(), 1024)).unwrap();

        writer.append(b"r1r1").unwrap();
        writer.append(b"r2r2").unwrap();
        writer.append(b"r3r3").unwrap();

        assert_eq!(
            writer.read_all().unwrap(),
            vec![b"r1r1".to_vec(), b"r2r2".to_vec(), b"r3r3".to_vec()]
        );
        let header = writer.header().unwrap();
        assert_eq!(header.record_width, 4);
        assert_eq!(header.record_count, 3);
    }

    #[test]
    fn capacity_boundary() {
        let dir = tempdir().unwrap();
        // Header (8) + 3 records of 10 bytes fits in 40, a fourth does not.
        let mut writer =
            ChannelWriter::create(ChannelId::new(3), &config(dir.path(), 40)).unwrap();

        for _ in 0..3 {
            writer.append(&[7u8; 10]).unwrap();
        }
        assert_eq!(writer.remaining_records().unwrap(), Some(0));
        assert_eq!(writer.record_width().unwrap(), 10);

        let err = writer.append(&[7u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            FullsightError::CapacityExceeded {
                capacity: 40,
                record_width: 10,
                record_count: 3,
                ..
            }
        ));
        assert_eq!(writer.len().unwrap(), 3);
    }

    #[test]
    fn record_width_is_fixed_by_first_append() {
        let dir = tempdir().unwrap();
        let mut writer =
            ChannelWriter::create(ChannelId::new(4), &config(dir.path(), 1024)).unwrap();

        writer.append(&[1u8; 8]).unwrap();
        let err = writer.append(&[1u8; 9]).unwrap_err();
        assert!(matches!(
            err,
            FullsightError::RecordWidthMismatch {
                expected: 8,
                actual: 9,
                ..
            }
        ));
        assert_eq!(writer.len().unwrap(), 1);
    }

    #[test]
    fn empty_record_is_rejected() {
        let dir = tempdir().unwrap();
        let mut writer =
            ChannelWriter::create(ChannelId::new(5), &config(dir.path(), 1024)).unwrap();

        let err = writer.append(&[]).unwrap_err();
        assert_eq!(err.code(), "F304");
        assert!(writer.is_empty().unwrap());
    }

    #[test]
    fn recreate_resets_region() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), 256);

        let mut writer = ChannelWriter::create(ChannelId::new(6), &config).unwrap();
        writer.append(b"abc").unwrap();
        writer.close().unwrap();

        let writer = ChannelWriter::create(ChannelId::new(6), &config).unwrap();
        assert!(writer.read_all().unwrap().is_empty());
    }

    #[test]
    fn recreate_never_shrinks_region() {
        let dir = tempdir().unwrap();
        let id = ChannelId::new(9);

        let writer = ChannelWriter::create(id, &config(dir.path(), 256)).unwrap();
        writer.close().unwrap();

        let writer = ChannelWriter::create(id, &config(dir.path(), 64)).unwrap();
        assert_eq!(writer.capacity(), 256);
        assert_eq!(std::fs::metadata(writer.path()).unwrap().len(), 256);
        writer.close().unwrap();

        let writer = ChannelWriter::create(id, &config(dir.path(), 512)).unwrap();
        assert_eq!(writer.capacity(), 512);
    }

    #[test]
    fn capacity_field_is_clamped_on_create() {
        let dir = tempdir().unwrap();
        let mut config = ChannelConfig::default().with_directory(dir.path());
        config.capacity = 0;

        let writer = ChannelWriter::create(ChannelId::new(10), &config).unwrap();
        assert_eq!(writer.capacity(), HEADER_SIZE);
    }

    #[test]
    fn second_writer_is_locked_out() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), 256);

        let _first = ChannelWriter::create(ChannelId::new(7), &config).unwrap();
        let err = ChannelWriter::create(ChannelId::new(7), &config).unwrap_err();
        assert!(err.is_attach_error());
        assert!(err.to_string().contains("channel_7"));
    }

    #[test]
    fn sync_on_write_flushes() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), 256).with_sync(true);

        let mut writer = ChannelWriter::create(ChannelId::new(8), &config).unwrap();
        writer.append(b"durable!").unwrap();

        let on_disk = std::fs::read(writer.path()).unwrap();
        assert_eq!(&on_disk[HEADER_SIZE..HEADER_SIZE + 8], b"durable!");
    }
}
