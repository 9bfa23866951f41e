//! Byte-order modes for record layouts and channel headers.

use crate::error::{FullsightError, Result};
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte order used to encode multi-byte numbers.
///
/// `Native` follows the host and uses standard sizes with no alignment
/// padding, so a layout is always a flat concatenation of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    /// Host byte order.
    #[default]
    Native,
    /// Least significant byte first.
    LittleEndian,
    /// Most significant byte first.
    BigEndian,
}

impl ByteOrder {
    /// Prefix character used in format descriptors.
    ///
    /// These match Python `struct` prefixes with the same semantics
    /// (standard sizes, no padding), which keeps descriptors usable by
    /// non-Rust peers.
    #[must_use]
    pub const fn prefix(&self) -> char {
        match self {
            Self::Native => '=',
            Self::LittleEndian => '<',
            Self::BigEndian => '>',
        }
    }

    /// Whether numbers are written most significant byte first.
    #[must_use]
    pub const fn is_big_endian(&self) -> bool {
        match self {
            Self::Native => cfg!(target_endian = "big"),
            Self::LittleEndian => false,
            Self::BigEndian => true,
        }
    }
}

macro_rules! endian_rw {
    ($($ty:ty => $read:ident, $write:ident;)*) => {
        impl ByteOrder {
            $(
                #[inline]
                pub(crate) fn $read(&self, buf: &[u8]) -> $ty {
                    if self.is_big_endian() {
                        BigEndian::$read(buf)
                    } else {
                        LittleEndian::$read(buf)
                    }
                }

                #[inline]
                pub(crate) fn $write(&self, buf: &mut [u8], n: $ty) {
                    if self.is_big_endian() {
                        BigEndian::$write(buf, n)
                    } else {
                        LittleEndian::$write(buf, n)
                    }
                }
            )*
        }
    };
}

endian_rw! {
    i16 => read_i16, write_i16;
    u16 => read_u16, write_u16;
    i32 => read_i32, write_i32;
    u32 => read_u32, write_u32;
    i64 => read_i64, write_i64;
    u64 => read_u64, write_u64;
    f32 => read_f32, write_f32;
    f64 => read_f64, write_f64;
}

impl FromStr for ByteOrder {
    type Err = FullsightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "@" | "=" => Ok(Self::Native),
            "little-endian" | "little" | "le" | "<" => Ok(Self::LittleEndian),
            "big-endian" | "big" | "be" | ">" | "!" => Ok(Self::BigEndian),
            _ => Err(FullsightError::InvalidByteOrder {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Native => "native",
            Self::LittleEndian => "little-endian",
            Self::BigEndian => "big-endian",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("NATIVE".parse::<ByteOrder>().unwrap(), ByteOrder::Native);
        assert_eq!(
            "LITTLE-ENDIAN".parse::<ByteOrder>().unwrap(),
            ByteOrder::LittleEndian
        );
        assert_eq!("big-endian".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert_eq!(">".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
    }

    #[test]
    fn parse_rejects_unknown_mode() {
        let err = "middle-endian".parse::<ByteOrder>().unwrap_err();
        assert_eq!(err.code(), "F001");
        assert!(err.is_config_error());
    }

    #[test]
    fn write_respects_order() {
        let mut buf = [0u8; 4];
        ByteOrder::BigEndian.write_u32(&mut buf, 0x0102_0304);
        assert_eq!(buf, [1, 2, 3, 4]);

        ByteOrder::LittleEndian.write_u32(&mut buf, 0x0102_0304);
        assert_eq!(buf, [4, 3, 2, 1]);

        ByteOrder::Native.write_u32(&mut buf, 0x0102_0304);
        assert_eq!(buf, 0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for order in [ByteOrder::Native, ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            assert_eq!(order.to_string().parse::<ByteOrder>().unwrap(), order);
        }
    }
}
