//! Property-based tests using proptest
//!
//! These tests check the decoder's laws over generated inputs: VarInt and tag-tree
//! round trips, truncation behaviour, walker/decoder agreement, and that arbitrary
//! bytes never panic.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use mcwire::{nbt_extent, read_nbt, CodecError, DecoderConfig, ReadPacketExt, Tag, TagType, WritePacketExt};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Tag> {
    prop_oneof![
        any::<i8>().prop_map(|v| Tag::byte("", v)),
        any::<i16>().prop_map(|v| Tag::short("", v)),
        any::<i32>().prop_map(|v| Tag::int("", v)),
        any::<i64>().prop_map(|v| Tag::long("", v)),
        (-1.0e6f32..1.0e6f32).prop_map(|v| Tag::float("", v)),
        (-1.0e12f64..1.0e12f64).prop_map(|v| Tag::double("", v)),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(|v| Tag::byte_array("", v)),
        "[a-zA-Z0-9 é☃]{0,12}".prop_map(|s| Tag::string("", &s)),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(|v| Tag::int_array("", &v)),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(|v| Tag::long_array("", &v)),
    ]
}

fn tag_tree() -> impl Strategy<Value = Tag> {
    leaf().prop_recursive(6, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(("[a-zA-Z_]{0,8}", inner.clone()), 0..8).prop_map(|children| {
                Tag::compound("", children.into_iter().map(|(name, tag)| tag.with_name(name)).collect())
            }),
            (inner, 0usize..5).prop_map(|(tag, n)| {
                let element_type = tag.tag_type();
                Tag::list("", element_type, vec![tag; n])
            }),
        ]
    })
}

fn root() -> impl Strategy<Value = Tag> {
    (tag_tree(), "[a-z]{0,6}").prop_map(|(tag, name)| Tag::compound(name, vec![tag.with_name("value")]))
}

// Property: every i32 survives a VarInt round trip in at most 5 bytes
proptest! {
    #[test]
    fn prop_var_int_roundtrip(n in any::<i32>()) {
        let mut bytes = Vec::new();
        bytes.write_var_int(n).expect("encode");
        prop_assert!(bytes.len() <= 5);
        let mut r = bytes.as_slice();
        prop_assert_eq!(r.read_var_int().expect("decode"), n);
        prop_assert!(r.is_empty());
    }
}

// Property: every i64 survives a VarLong round trip
proptest! {
    #[test]
    fn prop_var_long_roundtrip(n in any::<i64>()) {
        let mut bytes = Vec::new();
        bytes.write_var_long(n).expect("encode");
        let mut r = bytes.as_slice();
        prop_assert_eq!(r.read_var_long().expect("decode"), n);
    }
}

// Property: encode then decode is the identity on tag trees
proptest! {
    #[test]
    fn prop_tag_roundtrip(tag in root()) {
        let bytes = tag.to_bytes().expect("encode");
        let mut r = bytes.as_slice();
        let decoded = read_nbt(&mut r, &DecoderConfig::default()).expect("decode");
        prop_assert!(r.is_empty());
        prop_assert_eq!(decoded, tag);
    }
}

// Property: any proper prefix of a valid stream fails with UnexpectedEof
proptest! {
    #[test]
    fn prop_truncation_is_eof(tag in root(), cut in any::<prop::sample::Index>()) {
        let bytes = tag.to_bytes().expect("encode");
        let prefix = &bytes[..cut.index(bytes.len())];
        let result = read_nbt(&mut &prefix[..], &DecoderConfig::default());
        prop_assert!(matches!(result, Err(CodecError::UnexpectedEof)));
        let walked = nbt_extent(prefix, &DecoderConfig::default());
        prop_assert!(matches!(walked, Err(CodecError::UnexpectedEof)));
    }
}

// Property: the walker measures exactly what the encoder wrote
proptest! {
    #[test]
    fn prop_extent_matches_encoding(tag in root()) {
        let bytes = tag.to_bytes().expect("encode");
        prop_assert_eq!(nbt_extent(&bytes, &DecoderConfig::default()).expect("extent"), bytes.len());
    }
}

// Property: arbitrary input never panics, and a successful decode agrees with the walker
proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(mut data in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Some(first) = data.first_mut() {
            *first = 0x0a;
        }
        let config = DecoderConfig::default().with_max_depth(32);
        let mut r = data.as_slice();
        let decoded = read_nbt(&mut r, &config);
        let consumed = data.len() - r.len();
        let walked = nbt_extent(&data, &config);
        if let Ok(tag) = decoded {
            prop_assert_eq!(tag.tag_type(), TagType::Compound);
            prop_assert_eq!(walked.expect("walker agrees"), consumed);
        } else {
            prop_assert!(walked.is_err());
        }
    }
}
