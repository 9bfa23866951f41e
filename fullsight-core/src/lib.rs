//! Fullsight Core Library
//!
//! Runtime-declared fixed-width binary records and the shared-memory channel
//! that carries them between a task and its runtime monitor.
//!
//! # Overview
//!
//! A task process describes its monitoring record field by field, packs
//! values into fixed-width blocks and appends them to a channel. A monitor
//! process declares the same layout, attaches to the channel by its numeric
//! id and decodes every block written so far. The two processes share
//! nothing but the region file and the layout they both declared.
//!
//! # Key Components
//!
//! - **Layout**: Field declarations compiled into a padding-free binary codec
//! - **Channel**: Memory-mapped append log with a width/count header
//! - **Telemetry**: Subscriber setup for the `tracing` events emitted here
//!
//! # Example
//!
//! ```
//! use fullsight_core::prelude::*;
//!
//! # fn main() -> fullsight_core::Result<()> {
//! let config = ChannelConfig::in_memory();
//! let mut layout = RecordLayout::new(ByteOrder::Native);
//! layout.add_string_field("name", 20)?.add_unsigned_int("age")?;
//!
//! let mut writer = ChannelWriter::create(ChannelId::new(7), &config)?;
//! writer.append(&layout.pack(&[FieldValue::from("Ada"), FieldValue::from(30u32)])?)?;
//!
//! let reader = ChannelReader::attach(ChannelId::new(7), &config)?;
//! let records = reader.read_decoded(&layout.codec())?;
//! assert_eq!(records[0].field("age"), Some(&FieldValue::Int(30)));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod error;
pub mod layout;
pub mod prelude;
pub mod telemetry;
pub mod types;

// Re-export key types at crate root for convenience
pub use channel::{Channel, ChannelConfig, ChannelReader, ChannelWriter, Role};
pub use error::{FullsightError, Result};
pub use layout::{ByteOrder, FieldKind, FieldValue, Record, RecordCodec, RecordLayout};
pub use types::ChannelId;
