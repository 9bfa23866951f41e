//! Field kinds and declarations.

use crate::error::{FullsightError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of one field in a record layout.
///
/// Every kind has a fixed encoded width that does not depend on the byte
/// order. `SignedLong`/`UnsignedLong` are always 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// `signed char` / `int8`.
    SignedByte8,
    /// `unsigned char` / `uint8`.
    UnsignedByte8,
    /// `short` / `int16`.
    SignedShort16,
    /// `unsigned short` / `uint16`.
    UnsignedShort16,
    /// `int` / `int32`.
    SignedInt32,
    /// `unsigned int` / `uint32`.
    UnsignedInt32,
    /// `long` / `int64`.
    SignedLong,
    /// `unsigned long` / `uint64`.
    UnsignedLong,
    /// `float`.
    Float32,
    /// `double`.
    Double64,
    /// UTF-8 text zero-padded to exactly this many bytes.
    FixedString(usize),
}

impl FieldKind {
    /// Encoded width in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::SignedByte8 | Self::UnsignedByte8 => 1,
            Self::SignedShort16 | Self::UnsignedShort16 => 2,
            Self::SignedInt32 | Self::UnsignedInt32 | Self::Float32 => 4,
            Self::SignedLong | Self::UnsignedLong | Self::Double64 => 8,
            Self::FixedString(max_length) => *max_length,
        }
    }

    /// Whether values of this kind need UTF-8 encode/decode.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::FixedString(_))
    }

    /// Whether this is a floating point kind.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Double64)
    }

    /// Inclusive value range for integer kinds, `None` otherwise.
    #[must_use]
    pub fn int_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            Self::SignedByte8 => (i8::MIN as i128, i8::MAX as i128),
            Self::UnsignedByte8 => (0, u8::MAX as i128),
            Self::SignedShort16 => (i16::MIN as i128, i16::MAX as i128),
            Self::UnsignedShort16 => (0, u16::MAX as i128),
            Self::SignedInt32 => (i32::MIN as i128, i32::MAX as i128),
            Self::UnsignedInt32 => (0, u32::MAX as i128),
            Self::SignedLong => (i64::MIN as i128, i64::MAX as i128),
            Self::UnsignedLong => (0, u64::MAX as i128),
            Self::Float32 | Self::Double64 | Self::FixedString(_) => return None,
        };
        Some(range)
    }

    /// Format descriptor token for this kind (e.g. `I`, `20s`).
    #[must_use]
    pub fn format_token(&self) -> String {
        let code = match self {
            Self::SignedByte8 => 'b',
            Self::UnsignedByte8 => 'B',
            Self::SignedShort16 => 'h',
            Self::UnsignedShort16 => 'H',
            Self::SignedInt32 => 'i',
            Self::UnsignedInt32 => 'I',
            Self::SignedLong => 'q',
            Self::UnsignedLong => 'Q',
            Self::Float32 => 'f',
            Self::Double64 => 'd',
            Self::FixedString(max_length) => return format!("{}s", max_length),
        };
        code.to_string()
    }

    /// Resolve a C type name (e.g. `"unsigned short int"`, `"uint32"`).
    ///
    /// `"char"` declares a fixed string and needs `max_length`; every other
    /// name ignores it.
    pub fn from_c_type(c_type: &str, max_length: Option<usize>) -> Result<Self> {
        let normalized = c_type.split_whitespace().collect::<Vec<_>>().join(" ");
        let kind = match normalized.as_str() {
            "char" => {
                let max_length = max_length.ok_or_else(|| FullsightError::MissingParameter {
                    field: c_type.to_string(),
                    parameter: "max_length",
                })?;
                Self::FixedString(max_length)
            }
            "signed char" | "int8" => Self::SignedByte8,
            "unsigned char" | "uint8" => Self::UnsignedByte8,
            "short" | "short int" | "int16" => Self::SignedShort16,
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" => {
                Self::UnsignedShort16
            }
            "int" | "int32" => Self::SignedInt32,
            "unsigned int" | "uint32" => Self::UnsignedInt32,
            "long" | "long int" | "long long" | "int64" => Self::SignedLong,
            "unsigned long" | "unsigned long int" | "unsigned long long" | "uint64" => {
                Self::UnsignedLong
            }
            "float" => Self::Float32,
            "double" => Self::Double64,
            _ => {
                return Err(FullsightError::UnknownFieldKind {
                    kind: c_type.to_string(),
                })
            }
        };
        Ok(kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedString(max_length) => write!(f, "FixedString({})", max_length),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A named field at a fixed position in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name, unique within its layout.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Byte offset from the start of the record.
    pub offset: usize,
}

impl FieldDecl {
    /// Encoded width in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    /// Byte range this field occupies within a record.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(FieldKind::UnsignedByte8.width(), 1);
        assert_eq!(FieldKind::SignedShort16.width(), 2);
        assert_eq!(FieldKind::UnsignedInt32.width(), 4);
        assert_eq!(FieldKind::Float32.width(), 4);
        assert_eq!(FieldKind::SignedLong.width(), 8);
        assert_eq!(FieldKind::Double64.width(), 8);
        assert_eq!(FieldKind::FixedString(20).width(), 20);
    }

    #[test]
    fn c_type_names() {
        assert_eq!(
            FieldKind::from_c_type("unsigned  short int", None).unwrap(),
            FieldKind::UnsignedShort16
        );
        assert_eq!(FieldKind::from_c_type("uint32", None).unwrap(), FieldKind::UnsignedInt32);
        assert_eq!(FieldKind::from_c_type("long", None).unwrap(), FieldKind::SignedLong);
        assert_eq!(
            FieldKind::from_c_type("char", Some(16)).unwrap(),
            FieldKind::FixedString(16)
        );
    }

    #[test]
    fn c_type_char_requires_length() {
        let err = FieldKind::from_c_type("char", None).unwrap_err();
        assert_eq!(err.code(), "F003");
    }

    #[test]
    fn c_type_rejects_pointers() {
        let err = FieldKind::from_c_type("void *", None).unwrap_err();
        assert!(matches!(err, FullsightError::UnknownFieldKind { .. }));
    }

    #[test]
    fn int_ranges() {
        assert_eq!(FieldKind::UnsignedInt32.int_range(), Some((0, u32::MAX as i128)));
        assert_eq!(
            FieldKind::SignedShort16.int_range(),
            Some((i16::MIN as i128, i16::MAX as i128))
        );
        assert_eq!(FieldKind::Double64.int_range(), None);
    }

    #[test]
    fn format_tokens() {
        assert_eq!(FieldKind::FixedString(20).format_token(), "20s");
        assert_eq!(FieldKind::UnsignedLong.format_token(), "Q");
    }
}
