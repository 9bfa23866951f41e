//! Record layout definition with an explicit frozen state.

use super::byte_order::ByteOrder;
use super::codec::RecordCodec;
use super::field::{FieldDecl, FieldKind};
use super::value::{FieldValue, Record};
use crate::channel::{HEADER_SIZE, MAX_CAPACITY};
use crate::error::{FullsightError, Result};
use std::sync::OnceLock;

/// Widest record a layout may declare: one record must fit a channel region
/// of maximum capacity.
pub const MAX_RECORD_WIDTH: usize = MAX_CAPACITY - HEADER_SIZE;

/// An ordered set of field declarations plus a byte order.
///
/// Fields are added one at a time. The first call to [`codec`], [`pack`] or
/// [`unpack`] compiles and freezes the layout; after that, adding a field
/// fails with [`FullsightError::LayoutFrozen`].
///
/// [`codec`]: RecordLayout::codec
/// [`pack`]: RecordLayout::pack
/// [`unpack`]: RecordLayout::unpack
#[derive(Debug, Clone, Default)]
pub struct RecordLayout {
    byte_order: ByteOrder,
    fields: Vec<FieldDecl>,
    width: usize,
    frozen: OnceLock<RecordCodec>,
}

impl RecordLayout {
    /// Create an empty layout with the given byte order.
    #[must_use]
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            ..Self::default()
        }
    }

    /// Append a field.
    pub fn add_field(&mut self, kind: FieldKind, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();

        if self.is_frozen() {
            return Err(FullsightError::LayoutFrozen { field: name });
        }
        if name.is_empty() {
            return Err(FullsightError::EmptyFieldName);
        }
        if self.fields.iter().any(|f| f.name == name) {
            return Err(FullsightError::DuplicateField { field: name });
        }
        if kind == FieldKind::FixedString(0) {
            return Err(FullsightError::InvalidParameter {
                field: name,
                cause: "max_length must be a positive integer".to_string(),
            });
        }

        let offset = self.width;
        let width = offset
            .checked_add(kind.width())
            .filter(|&w| w <= MAX_RECORD_WIDTH)
            .ok_or_else(|| FullsightError::InvalidParameter {
                field: name.clone(),
                cause: format!(
                    "record would be wider than the {} byte maximum",
                    MAX_RECORD_WIDTH
                ),
            })?;
        self.width = width;
        self.fields.push(FieldDecl { name, kind, offset });
        Ok(self)
    }

    /// Append a field by C type name (e.g. `"unsigned int"`, `"char"`).
    pub fn add_c_field(
        &mut self,
        c_type: &str,
        name: impl Into<String>,
        max_length: Option<usize>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let kind = FieldKind::from_c_type(c_type, max_length).map_err(|e| match e {
            FullsightError::MissingParameter { parameter, .. } => FullsightError::MissingParameter {
                field: name.clone(),
                parameter,
            },
            other => other,
        })?;
        self.add_field(kind, name)
    }

    /// Append a fixed-length UTF-8 string field.
    pub fn add_string_field(
        &mut self,
        name: impl Into<String>,
        max_length: usize,
    ) -> Result<&mut Self> {
        self.add_field(FieldKind::FixedString(max_length), name)
    }

    /// Append an unsigned 32-bit integer field.
    pub fn add_unsigned_int(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::UnsignedInt32, name)
    }

    /// Append a signed 32-bit integer field.
    pub fn add_signed_int(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::SignedInt32, name)
    }

    /// Append a signed 16-bit integer field.
    pub fn add_signed_short(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::SignedShort16, name)
    }

    /// Append an unsigned 16-bit integer field.
    pub fn add_unsigned_short(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::UnsignedShort16, name)
    }

    /// Append a signed 64-bit integer field.
    pub fn add_signed_long(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::SignedLong, name)
    }

    /// Append an unsigned 64-bit integer field.
    pub fn add_unsigned_long(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::UnsignedLong, name)
    }

    /// Append a 32-bit float field.
    pub fn add_float(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::Float32, name)
    }

    /// Append a 64-bit float field.
    pub fn add_double(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.add_field(FieldKind::Double64, name)
    }

    /// Builder-style [`add_field`](Self::add_field).
    pub fn with_field(mut self, kind: FieldKind, name: impl Into<String>) -> Result<Self> {
        self.add_field(kind, name)?;
        Ok(self)
    }

    /// Builder-style [`add_string_field`](Self::add_string_field).
    pub fn with_string_field(mut self, name: impl Into<String>, max_length: usize) -> Result<Self> {
        self.add_string_field(name, max_length)?;
        Ok(self)
    }

    /// Whether a codec has been derived from this layout.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.get().is_some()
    }

    /// Freeze the layout and return its codec.
    pub fn codec(&self) -> RecordCodec {
        self.frozen_codec().clone()
    }

    fn frozen_codec(&self) -> &RecordCodec {
        self.frozen.get_or_init(|| {
            tracing::debug!(
                fields = self.fields.len(),
                width = self.width,
                byte_order = %self.byte_order,
                "Record layout frozen"
            );
            RecordCodec::compile(self.byte_order, self.fields.clone())
        })
    }

    /// Pack values into one record block, freezing the layout.
    pub fn pack(&self, values: &[FieldValue]) -> Result<Vec<u8>> {
        self.frozen_codec().pack(values)
    }

    /// Unpack one record block, freezing the layout.
    pub fn unpack(&self, block: &[u8]) -> Result<Record> {
        self.frozen_codec().unpack(block)
    }

    /// Byte order of numeric fields.
    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Width of one record in bytes.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.width
    }

    /// Declared fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields have been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
