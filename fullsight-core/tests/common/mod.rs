//! Common test utilities for integration tests.

#![allow(dead_code)]

use fullsight_core::channel::ChannelConfig;
use fullsight_core::layout::{ByteOrder, FieldKind, FieldValue, RecordLayout};
use tempfile::TempDir;

/// A channel config rooted in a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn temp_config() -> (TempDir, ChannelConfig) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = ChannelConfig::default().with_directory(dir.path());
    (dir, config)
}

/// The monitoring record used throughout: `name` (20 bytes), `age`, `credit`.
pub fn person_layout(byte_order: ByteOrder) -> RecordLayout {
    RecordLayout::new(byte_order)
        .with_field(FieldKind::FixedString(20), "name")
        .and_then(|l| l.with_field(FieldKind::UnsignedInt32, "age"))
        .and_then(|l| l.with_field(FieldKind::SignedInt32, "credit"))
        .expect("person layout")
}

/// Values for one person record.
pub fn person(name: &str, age: u32, credit: i32) -> Vec<FieldValue> {
    vec![
        FieldValue::from(name),
        FieldValue::from(age),
        FieldValue::from(credit),
    ]
}
