//! Error types for fullsight.
//!
//! Every failure is returned at the point of the offending call and carries
//! the context needed to debug two independently started processes: codec
//! errors name the field, channel errors name the channel and the capacity or
//! width involved.

use crate::types::ChannelId;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fullsight operations.
#[derive(Error, Debug)]
pub enum FullsightError {
    // =========================================================================
    // Configuration Errors (F001-F099)
    // =========================================================================
    /// Unrecognized byte-order mode.
    #[error("F001: Unknown byte order '{value}' (expected native, little-endian or big-endian)")]
    InvalidByteOrder {
        /// The rejected mode string.
        value: String,
    },

    /// Unrecognized field kind or C type name.
    #[error("F002: Unknown field kind '{kind}'")]
    UnknownFieldKind {
        /// The rejected kind.
        kind: String,
    },

    /// A field declaration is missing a required parameter.
    #[error("F003: Field '{field}' requires parameter '{parameter}'")]
    MissingParameter {
        /// The field being declared.
        field: String,
        /// The missing parameter.
        parameter: &'static str,
    },

    /// A field parameter has an invalid value.
    #[error("F004: Invalid parameter for field '{field}': {cause}")]
    InvalidParameter {
        /// The field being declared.
        field: String,
        /// Why the parameter was rejected.
        cause: String,
    },

    /// A field name is declared twice in the same layout.
    #[error("F005: Duplicate field name '{field}'")]
    DuplicateField {
        /// The duplicated name.
        field: String,
    },

    /// A field was added after the layout was frozen by first use.
    #[error("F006: Cannot add field '{field}': layout is frozen after first pack/unpack")]
    LayoutFrozen {
        /// The field that could not be added.
        field: String,
    },

    /// A field was declared with an empty name.
    #[error("F007: Field names must not be empty")]
    EmptyFieldName,

    /// Invalid ambient configuration value.
    #[error("F008: Invalid configuration value for '{key}': {cause}")]
    ConfigValue {
        /// The configuration key.
        key: String,
        /// Why the value was rejected.
        cause: String,
    },

    // =========================================================================
    // Encoding Errors (F100-F199)
    // =========================================================================
    /// Wrong number of values passed to pack.
    #[error("F101: Expected {expected} values, got {actual}")]
    FieldCount {
        /// Number of declared fields.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },

    /// A numeric value does not fit the declared field width.
    #[error("F102: Value {value} out of range for field '{field}' ({kind})")]
    ValueOutOfRange {
        /// The offending field.
        field: String,
        /// The declared kind.
        kind: String,
        /// The rejected value, rendered.
        value: String,
    },

    /// A value of the wrong type was supplied for a field.
    #[error("F103: Field '{field}' expects {expected}, got {actual}")]
    ValueType {
        /// The offending field.
        field: String,
        /// The expected value type.
        expected: &'static str,
        /// The supplied value type.
        actual: &'static str,
    },

    /// A string's UTF-8 encoding is longer than the field allows.
    #[error("F104: String for field '{field}' is {actual} bytes, max is {max_length}")]
    StringTooLong {
        /// The offending field.
        field: String,
        /// Declared maximum length in bytes.
        max_length: usize,
        /// Encoded length in bytes.
        actual: usize,
    },

    // =========================================================================
    // Decoding Errors (F200-F299)
    // =========================================================================
    /// The block handed to unpack is not exactly one record wide.
    #[error("F201: Block is {actual} bytes, record width is {expected}")]
    BlockSize {
        /// The record width.
        expected: usize,
        /// The supplied block length.
        actual: usize,
    },

    /// A string field does not hold valid UTF-8 after padding is stripped.
    #[error("F202: Field '{field}' is not valid UTF-8: {cause}")]
    InvalidUtf8 {
        /// The offending field.
        field: String,
        /// Decoder message.
        cause: String,
    },

    // =========================================================================
    // Channel Errors (F300-F399)
    // =========================================================================
    /// Failed to create, open, lock or map a channel region.
    #[error("F301: Failed to attach {channel} at {path}: {cause}")]
    Attach {
        /// The channel.
        channel: ChannelId,
        /// The backing file.
        path: PathBuf,
        /// Reason for the failure.
        cause: String,
    },

    /// A write was attempted through a reader handle.
    #[error("F302: {channel} is attached read-only")]
    ReadOnlyChannel {
        /// The channel.
        channel: ChannelId,
    },

    /// Appending would overflow the region.
    #[error(
        "F303: {channel} capacity exceeded: {record_count} records of {record_width} bytes fill {capacity} byte region"
    )]
    CapacityExceeded {
        /// The channel.
        channel: ChannelId,
        /// Total region capacity in bytes.
        capacity: usize,
        /// Width of one record.
        record_width: usize,
        /// Records already stored.
        record_count: usize,
    },

    /// An append used a width other than the one fixed by the first append.
    #[error("F304: {channel} record width is {expected} bytes, got {actual}")]
    RecordWidthMismatch {
        /// The channel.
        channel: ChannelId,
        /// Width fixed by the first append (0 if none yet).
        expected: usize,
        /// Width of the rejected record.
        actual: usize,
    },

    /// The region header violates its invariants.
    #[error("F305: Corrupt header on {channel}: {cause}")]
    CorruptHeader {
        /// The channel.
        channel: ChannelId,
        /// Description of the violation.
        cause: String,
    },

    /// I/O failure on an attached region.
    #[error("F306: I/O error on {channel} at {path}: {cause}")]
    Io {
        /// The channel.
        channel: ChannelId,
        /// The backing file.
        path: PathBuf,
        /// Reason for the failure.
        cause: String,
    },
}

impl FullsightError {
    /// Get the error code (e.g., "F001").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidByteOrder { .. } => "F001",
            Self::UnknownFieldKind { .. } => "F002",
            Self::MissingParameter { .. } => "F003",
            Self::InvalidParameter { .. } => "F004",
            Self::DuplicateField { .. } => "F005",
            Self::LayoutFrozen { .. } => "F006",
            Self::EmptyFieldName => "F007",
            Self::ConfigValue { .. } => "F008",
            Self::FieldCount { .. } => "F101",
            Self::ValueOutOfRange { .. } => "F102",
            Self::ValueType { .. } => "F103",
            Self::StringTooLong { .. } => "F104",
            Self::BlockSize { .. } => "F201",
            Self::InvalidUtf8 { .. } => "F202",
            Self::Attach { .. } => "F301",
            Self::ReadOnlyChannel { .. } => "F302",
            Self::CapacityExceeded { .. } => "F303",
            Self::RecordWidthMismatch { .. } => "F304",
            Self::CorruptHeader { .. } => "F305",
            Self::Io { .. } => "F306",
        }
    }

    /// Check if this error is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidByteOrder { .. }
                | Self::UnknownFieldKind { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::DuplicateField { .. }
                | Self::LayoutFrozen { .. }
                | Self::EmptyFieldName
                | Self::ConfigValue { .. }
        )
    }

    /// Check if this error was raised while packing values.
    #[must_use]
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            Self::FieldCount { .. }
                | Self::ValueOutOfRange { .. }
                | Self::ValueType { .. }
                | Self::StringTooLong { .. }
        )
    }

    /// Check if this error was raised while unpacking a block.
    #[must_use]
    pub fn is_decoding_error(&self) -> bool {
        matches!(self, Self::BlockSize { .. } | Self::InvalidUtf8 { .. })
    }

    /// Check if this error was raised by the record codec.
    #[must_use]
    pub fn is_codec_error(&self) -> bool {
        self.is_encoding_error() || self.is_decoding_error()
    }

    /// Check if this error was raised by a channel operation.
    #[must_use]
    pub fn is_channel_error(&self) -> bool {
        matches!(
            self,
            Self::Attach { .. }
                | Self::ReadOnlyChannel { .. }
                | Self::CapacityExceeded { .. }
                | Self::RecordWidthMismatch { .. }
                | Self::CorruptHeader { .. }
                | Self::Io { .. }
        )
    }

    /// Check if this error came from attaching to a channel.
    #[must_use]
    pub fn is_attach_error(&self) -> bool {
        matches!(self, Self::Attach { .. } | Self::ReadOnlyChannel { .. })
    }

    /// Check if this error is worth retrying later.
    ///
    /// A reader that attaches before the writer has created the region can
    /// simply try again; nothing inside fullsight retries on its own.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Attach { .. })
    }
}

/// Result type alias using `FullsightError`.
pub type Result<T> = std::result::Result<T, FullsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_correct() {
        let err = FullsightError::InvalidByteOrder {
            value: "middle".to_string(),
        };
        assert_eq!(err.code(), "F001");

        let err = FullsightError::CapacityExceeded {
            channel: ChannelId::new(1),
            capacity: 16384,
            record_width: 28,
            record_count: 584,
        };
        assert_eq!(err.code(), "F303");
    }

    #[test]
    fn error_display_names_channel_and_sizes() {
        let err = FullsightError::RecordWidthMismatch {
            channel: ChannelId::new(42),
            expected: 28,
            actual: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("F304"));
        assert!(msg.contains("channel_42"));
        assert!(msg.contains("28"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn error_display_names_field() {
        let err = FullsightError::StringTooLong {
            field: "name".to_string(),
            max_length: 4,
            actual: 9,
        };
        assert!(err.to_string().contains("'name'"));
        assert!(err.is_encoding_error());
        assert!(!err.is_decoding_error());
    }

    #[test]
    fn categories() {
        assert!(FullsightError::LayoutFrozen {
            field: "x".to_string()
        }
        .is_config_error());

        let block = FullsightError::BlockSize {
            expected: 8,
            actual: 7,
        };
        assert!(block.is_decoding_error());
        assert!(block.is_codec_error());
        assert!(!block.is_channel_error());

        let attach = FullsightError::Attach {
            channel: ChannelId::new(3),
            path: PathBuf::from("/tmp/fullsight.3"),
            cause: "not found".to_string(),
        };
        assert!(attach.is_attach_error());
        assert!(attach.is_retriable());
        assert!(attach.is_channel_error());
        assert!(!attach.is_codec_error());
        assert!(!FullsightError::EmptyFieldName.is_retriable());
    }
}
