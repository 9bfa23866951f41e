//! Property tests for the record codec.

mod common;

use common::person_layout;
use fullsight_core::layout::{ByteOrder, FieldKind, FieldValue, RecordLayout};
use fullsight_core::FullsightError;
use proptest::prelude::*;

fn byte_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![
        Just(ByteOrder::Native),
        Just(ByteOrder::LittleEndian),
        Just(ByteOrder::BigEndian),
    ]
}

fn wide_layout(order: ByteOrder) -> RecordLayout {
    let mut layout = RecordLayout::new(order);
    layout
        .add_field(FieldKind::SignedByte8, "b")
        .and_then(|l| l.add_field(FieldKind::UnsignedByte8, "ub"))
        .and_then(|l| l.add_signed_short("sh"))
        .and_then(|l| l.add_field(FieldKind::UnsignedShort16, "h"))
        .and_then(|l| l.add_signed_int("i"))
        .and_then(|l| l.add_unsigned_int("ui"))
        .and_then(|l| l.add_float("f"))
        .and_then(|l| l.add_signed_long("q"))
        .and_then(|l| l.add_unsigned_long("uq"))
        .and_then(|l| l.add_double("d"))
        .and_then(|l| l.add_string_field("tag", 8))
        .unwrap();
    layout
}

// Property: whatever is packed unpacks to the same values
proptest! {
    #[test]
    fn prop_person_round_trip(order in byte_order(),
                              name in "[a-zA-Z0-9 ]{0,19}[a-zA-Z0-9]",
                              age in any::<u32>(),
                              credit in any::<i32>()) {
        let layout = person_layout(order);
        let values = vec![
            FieldValue::from(name.as_str()),
            FieldValue::from(age),
            FieldValue::from(credit),
        ];

        let block = layout.pack(&values).unwrap();
        let record = layout.unpack(&block).unwrap();
        prop_assert_eq!(record.values(), values.as_slice());
    }
}

// Property: every width and order round-trips at the extremes too
proptest! {
    #[test]
    fn prop_mixed_kinds_round_trip(order in byte_order(),
                                   (b, ub, sh, h) in (any::<i8>(), any::<u8>(), any::<i16>(), any::<u16>()),
                                   i in any::<i32>(),
                                   ui in any::<u32>(),
                                   f in prop::num::f32::NORMAL | prop::num::f32::ZERO,
                                   q in any::<i64>(),
                                   uq in any::<u64>(),
                                   d in -1.0e300f64..1.0e300,
                                   tag in "[a-z]{1,8}") {
        let layout = wide_layout(order);
        let values = vec![
            FieldValue::from(b),
            FieldValue::from(ub),
            FieldValue::from(sh),
            FieldValue::from(h),
            FieldValue::from(i),
            FieldValue::from(ui),
            FieldValue::from(f),
            FieldValue::from(q),
            FieldValue::from(uq),
            FieldValue::from(d),
            FieldValue::from(tag.as_str()),
        ];

        let block = layout.pack(&values).unwrap();
        prop_assert_eq!(block.len(), 1 + 1 + 2 + 2 + 4 + 4 + 4 + 8 + 8 + 8 + 8);
        let unpacked = layout.unpack(&block).unwrap();
        prop_assert_eq!(unpacked.values(), values.as_slice());
    }
}

// Property: a packed block is always exactly the declared width
proptest! {
    #[test]
    fn prop_block_width_is_sum_of_fields(order in byte_order(),
                                         lengths in prop::collection::vec(1usize..64, 1..8)) {
        let mut layout = RecordLayout::new(order);
        for (i, len) in lengths.iter().enumerate() {
            layout.add_string_field(format!("s{i}"), *len).unwrap();
        }
        layout.add_unsigned_int("n").unwrap();

        let mut values: Vec<FieldValue> = lengths.iter().map(|_| FieldValue::from("")).collect();
        values.push(FieldValue::from(0u32));

        let expected: usize = lengths.iter().sum::<usize>() + 4;
        prop_assert_eq!(layout.total_width(), expected);
        prop_assert_eq!(layout.pack(&values).unwrap().len(), expected);
    }
}

// Property: blocks of any other length are rejected
proptest! {
    #[test]
    fn prop_wrong_block_size_rejected(len in 0usize..100) {
        prop_assume!(len != 28);
        let layout = person_layout(ByteOrder::Native);
        let err = layout.unpack(&vec![0u8; len]).unwrap_err();
        let is_block_size = matches!(err, FullsightError::BlockSize { expected: 28, .. });
        prop_assert!(is_block_size);
    }
}

// Property: strings longer than the field are rejected, never truncated
proptest! {
    #[test]
    fn prop_oversized_string_rejected(name in "[a-z]{21,40}") {
        let layout = person_layout(ByteOrder::Native);
        let values = vec![
            FieldValue::from(name.as_str()),
            FieldValue::from(1u32),
            FieldValue::from(1i32),
        ];
        let err = layout.pack(&values).unwrap_err();
        let is_too_long = matches!(err, FullsightError::StringTooLong { max_length: 20, .. });
        prop_assert!(is_too_long);
    }
}

// Property: integers outside the declared width are rejected
proptest! {
    #[test]
    fn prop_out_of_range_rejected(age in (u32::MAX as i64 + 1)..i64::MAX) {
        let layout = person_layout(ByteOrder::Native);
        let values = vec![
            FieldValue::from("x"),
            FieldValue::from(age),
            FieldValue::from(0i32),
        ];
        let err = layout.pack(&values).unwrap_err();
        let is_out_of_range = matches!(err, FullsightError::ValueOutOfRange { .. });
        prop_assert!(is_out_of_range);
    }
}
