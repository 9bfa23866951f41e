//! Log output for processes embedding fullsight.
//!
//! The library emits `tracing` events (channel create/attach/close at
//! `info`, appends and scans at `debug`, rejected appends at `warn`).
//! [`init_tracing`] installs a subscriber for them.

mod config;
mod setup;

pub use config::{LogFormat, TracingConfig, TracingConfigBuilder};
pub use setup::init_tracing;
