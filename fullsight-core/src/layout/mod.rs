//! Layout compiler: runtime-declared fixed-width binary records.
//!
//! A [`RecordLayout`] is an ordered list of typed field declarations plus a
//! [`ByteOrder`]. Once frozen, it yields a [`RecordCodec`] that packs a tuple
//! of [`FieldValue`]s into a block of exactly `total_width` bytes and unpacks
//! such a block into a named [`Record`].
//!
//! # Layout
//!
//! Fields are concatenated with no padding, so a layout is byte-compatible
//! with a packed C struct:
//!
//! ```text
//! [FixedString("name", 20)][UnsignedInt32("age")][SignedInt32("credit")]
//!  offset 0                 offset 20             offset 24        width 28
//! ```
//!
//! Both processes exchanging records must build identical layouts; nothing
//! in the encoded bytes describes the shape.
//!
//! # Example
//!
//! ```
//! use fullsight_core::layout::{ByteOrder, FieldValue, RecordLayout};
//!
//! let mut layout = RecordLayout::new(ByteOrder::LittleEndian);
//! layout
//!     .add_string_field("name", 20)?
//!     .add_unsigned_int("age")?
//!     .add_signed_int("credit")?;
//!
//! let values = [FieldValue::from("Ada"), FieldValue::from(30u32), FieldValue::from(-5i32)];
//! let block = layout.pack(&values)?;
//! assert_eq!(block.len(), 28);
//!
//! let record = layout.unpack(&block)?;
//! assert_eq!(record.field("credit"), Some(&FieldValue::Int(-5)));
//! # Ok::<(), fullsight_core::FullsightError>(())
//! ```

mod byte_order;
mod codec;
mod definition;
mod field;
mod value;

pub use byte_order::ByteOrder;
pub use codec::RecordCodec;
pub use definition::{MAX_RECORD_WIDTH, RecordLayout};
pub use field::{FieldDecl, FieldKind};
pub use value::{FieldValue, Record};
