//! Frozen record codec: pack values into fixed-width blocks and back.

use super::byte_order::ByteOrder;
use super::field::{FieldDecl, FieldKind};
use super::value::{FieldValue, Record};
use crate::error::{FullsightError, Result};
use std::sync::Arc;

struct CodecInner {
    byte_order: ByteOrder,
    fields: Vec<FieldDecl>,
    names: Arc<[String]>,
    string_positions: Vec<usize>,
    total_width: usize,
    format: String,
}

/// Pack/unpack operations derived from a frozen [`RecordLayout`].
///
/// Cloning is cheap; the compiled layout is shared.
///
/// [`RecordLayout`]: super::RecordLayout
#[derive(Clone)]
pub struct RecordCodec {
    inner: Arc<CodecInner>,
}

impl RecordCodec {
    pub(crate) fn compile(byte_order: ByteOrder, fields: Vec<FieldDecl>) -> Self {
        let names: Arc<[String]> = fields.iter().map(|f| f.name.clone()).collect();
        let string_positions = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind.is_string())
            .map(|(i, _)| i)
            .collect();
        let total_width = fields.iter().map(FieldDecl::width).sum();

        let mut format = String::with_capacity(1 + fields.len());
        format.push(byte_order.prefix());
        for field in &fields {
            format.push_str(&field.kind.format_token());
        }

        Self {
            inner: Arc::new(CodecInner {
                byte_order,
                fields,
                names,
                string_positions,
                total_width,
                format,
            }),
        }
    }

    /// Byte order of numeric fields.
    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.inner.byte_order
    }

    /// Width of one packed record in bytes.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.inner.total_width
    }

    /// Declared fields with their offsets.
    #[must_use]
    pub fn fields(&self) -> &[FieldDecl] {
        &self.inner.fields
    }

    /// Field names in declared order.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.inner.names
    }

    /// Positions of fixed-string fields.
    #[must_use]
    pub fn string_positions(&self) -> &[usize] {
        &self.inner.string_positions
    }

    /// Byte-order-prefixed format descriptor, e.g. `=20sIi`.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.inner.format
    }

    /// Pack values, in declared field order, into one record block.
    pub fn pack(&self, values: &[FieldValue]) -> Result<Vec<u8>> {
        let fields = &self.inner.fields;
        if values.len() != fields.len() {
            return Err(FullsightError::FieldCount {
                expected: fields.len(),
                actual: values.len(),
            });
        }

        let mut block = vec![0u8; self.inner.total_width];
        for (field, value) in fields.iter().zip(values) {
            self.encode_field(field, value, &mut block[field.span()])?;
        }
        Ok(block)
    }

    /// Unpack one record block into named values.
    pub fn unpack(&self, block: &[u8]) -> Result<Record> {
        if block.len() != self.inner.total_width {
            return Err(FullsightError::BlockSize {
                expected: self.inner.total_width,
                actual: block.len(),
            });
        }

        let values = self
            .inner
            .fields
            .iter()
            .map(|field| self.decode_field(field, &block[field.span()]))
            .collect::<Result<Vec<_>>>()?;

        Ok(Record::new(Arc::clone(&self.inner.names), values))
    }

    /// Unpack a sequence of blocks, stopping at the first failure.
    pub fn unpack_all<I, B>(&self, blocks: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        blocks
            .into_iter()
            .map(|block| self.unpack(block.as_ref()))
            .collect()
    }

    fn encode_field(&self, field: &FieldDecl, value: &FieldValue, out: &mut [u8]) -> Result<()> {
        let order = self.inner.byte_order;

        match field.kind {
            FieldKind::FixedString(max_length) => {
                let FieldValue::Str(s) = value else {
                    return Err(type_error(field, "string", value));
                };
                let bytes = s.as_bytes();
                if bytes.len() > max_length {
                    return Err(FullsightError::StringTooLong {
                        field: field.name.clone(),
                        max_length,
                        actual: bytes.len(),
                    });
                }
                // Remainder of `out` is already zeroed.
                out[..bytes.len()].copy_from_slice(bytes);
            }
            FieldKind::Float32 => {
                let v = float_value(field, value)?;
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return Err(range_error(field, value));
                }
                order.write_f32(out, v as f32);
            }
            FieldKind::Double64 => {
                order.write_f64(out, float_value(field, value)?);
            }
            kind => {
                let FieldValue::Int(v) = *value else {
                    return Err(type_error(field, "integer", value));
                };
                let (min, max) = kind.int_range().unwrap_or((0, 0));
                if v < min || v > max {
                    return Err(range_error(field, value));
                }
                // Range checked above, so the narrowing casts are exact.
                match kind {
                    FieldKind::SignedByte8 => out[0] = v as i8 as u8,
                    FieldKind::UnsignedByte8 => out[0] = v as u8,
                    FieldKind::SignedShort16 => order.write_i16(out, v as i16),
                    FieldKind::UnsignedShort16 => order.write_u16(out, v as u16),
                    FieldKind::SignedInt32 => order.write_i32(out, v as i32),
                    FieldKind::UnsignedInt32 => order.write_u32(out, v as u32),
                    FieldKind::SignedLong => order.write_i64(out, v as i64),
                    FieldKind::UnsignedLong => order.write_u64(out, v as u64),
                    FieldKind::Float32 | FieldKind::Double64 | FieldKind::FixedString(_) => {
                        unreachable!("handled above")
                    }
                }
            }
        }
        Ok(())
    }

    fn decode_field(&self, field: &FieldDecl, bytes: &[u8]) -> Result<FieldValue> {
        let order = self.inner.byte_order;

        let value = match field.kind {
            FieldKind::SignedByte8 => FieldValue::from(bytes[0] as i8),
            FieldKind::UnsignedByte8 => FieldValue::from(bytes[0]),
            FieldKind::SignedShort16 => order.read_i16(bytes).into(),
            FieldKind::UnsignedShort16 => order.read_u16(bytes).into(),
            FieldKind::SignedInt32 => order.read_i32(bytes).into(),
            FieldKind::UnsignedInt32 => order.read_u32(bytes).into(),
            FieldKind::SignedLong => order.read_i64(bytes).into(),
            FieldKind::UnsignedLong => order.read_u64(bytes).into(),
            FieldKind::Float32 => order.read_f32(bytes).into(),
            FieldKind::Double64 => order.read_f64(bytes).into(),
            FieldKind::FixedString(_) => {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
                let s = std::str::from_utf8(&bytes[..end]).map_err(|e| {
                    FullsightError::InvalidUtf8 {
                        field: field.name.clone(),
                        cause: e.to_string(),
                    }
                })?;
                FieldValue::Str(s.to_string())
            }
        };
        Ok(value)
    }
}

impl std::fmt::Debug for RecordCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCodec")
            .field("format", &self.inner.format)
            .field("fields", &self.inner.names)
            .field("total_width", &self.inner.total_width)
            .finish()
    }
}

fn float_value(field: &FieldDecl, value: &FieldValue) -> Result<f64> {
    match value {
        FieldValue::Float(v) => Ok(*v),
        FieldValue::Int(v) => Ok(*v as f64),
        FieldValue::Str(_) => Err(type_error(field, "float", value)),
    }
}

fn type_error(field: &FieldDecl, expected: &'static str, value: &FieldValue) -> FullsightError {
    FullsightError::ValueType {
        field: field.name.clone(),
        expected,
        actual: value.type_name(),
    }
}

fn range_error(field: &FieldDecl, value: &FieldValue) -> FullsightError {
    FullsightError::ValueOutOfRange {
        field: field.name.clone(),
        kind: field.kind.to_string(),
        value: value.to_string(),
    }
}
