//! Core types for fullsight.
//!
//! - `ChannelId`: identifier of a shared-memory channel

mod ids;

pub use ids::ChannelId;
