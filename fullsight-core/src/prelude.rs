//! Prelude for convenient imports.
//!
//! ```ignore
//! use fullsight_core::prelude::*;
//! ```

// Core types
pub use crate::types::ChannelId;

// Error handling
pub use crate::error::{FullsightError, Result};

// Layout
pub use crate::layout::{
    ByteOrder, FieldDecl, FieldKind, FieldValue, Record, RecordCodec, RecordLayout,
};

// Channel
pub use crate::channel::{
    Channel, ChannelConfig, ChannelHeader, ChannelReader, ChannelWriter, HEADER_SIZE, Role,
};

// Telemetry
pub use crate::telemetry::{LogFormat, TracingConfig, init_tracing};
