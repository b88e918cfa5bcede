//! Property-based tests over generated tag trees.
//!
//! Trees never contain `End`, floats are dyadic fractions so every printed
//! form parses back to the same bits, and compound keys are non-empty.

use proptest::prelude::*;
use serde_nbt::{
    box_element, from_bytes, from_snbt, from_tag, io, to_bytes, to_snbt, to_snbt_pretty, to_tag,
    unbox_element, Accounter, CollectToTag, Compound, SkipAll, Tag,
};

fn text() -> impl Strategy<Value = String> {
    let chars = vec!['a', 'Z', '0', ' ', '"', '\'', '\\', '\n', '\t', 'é', '☃', ':', ','];
    prop::collection::vec(prop::sample::select(chars), 0..10)
        .prop_map(|cs| cs.into_iter().collect())
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_.+-]{0,6}",
        text().prop_filter("keys are non-empty", |k| !k.is_empty()),
    ]
}

fn leaf() -> impl Strategy<Value = Tag> {
    prop_oneof![
        any::<i8>().prop_map(Tag::Byte),
        any::<i16>().prop_map(Tag::Short),
        any::<i32>().prop_map(Tag::Int),
        any::<i64>().prop_map(Tag::Long),
        (-1_000_000i32..1_000_000).prop_map(|i| Tag::Float(i as f32 / 8.0)),
        (-1_000_000_000_000i64..1_000_000_000_000).prop_map(|i| Tag::Double(i as f64 / 8.0)),
        text().prop_map(Tag::String),
        prop::collection::vec(any::<i8>(), 0..8).prop_map(Tag::ByteArray),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(Tag::IntArray),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(Tag::LongArray),
    ]
}

fn tag() -> impl Strategy<Value = Tag> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Tag::List),
            prop::collection::vec((key(), inner), 0..6)
                .prop_map(|entries| Tag::Compound(entries.into_iter().collect::<Compound>())),
        ]
    })
}

fn encode(tag: &Tag) -> Vec<u8> {
    let mut bytes = Vec::new();
    io::write_tag(&mut bytes, "", tag).unwrap();
    bytes
}

proptest! {
    #[test]
    fn prop_binary_round_trip(t in tag()) {
        let bytes = encode(&t);
        let (name, back) = io::read_tag(bytes.as_slice(), &mut Accounter::unlimited()).unwrap();
        prop_assert_eq!(name, "");
        prop_assert_eq!(back, t);
    }

    #[test]
    fn prop_box_unbox(t in tag()) {
        prop_assert_eq!(unbox_element(box_element(t.clone())), t);
    }

    #[test]
    fn prop_compact_snbt_round_trip(t in tag()) {
        let text = to_snbt(&t);
        prop_assert_eq!(from_snbt(&text).unwrap(), t);
    }

    #[test]
    fn prop_pretty_snbt_round_trip(t in tag()) {
        let text = to_snbt_pretty(&t);
        prop_assert_eq!(from_snbt(&text).unwrap(), t);
    }

    #[test]
    fn prop_streaming_matches_eager(t in tag()) {
        let bytes = encode(&t);

        let mut eager = Accounter::unlimited();
        let (_, loaded) = io::read_tag(bytes.as_slice(), &mut eager).unwrap();

        let mut streaming = Accounter::unlimited();
        let mut collect = CollectToTag::new();
        io::parse(bytes.as_slice(), &mut collect, &mut streaming).unwrap();

        prop_assert_eq!(collect.into_result(), Some(loaded));
        prop_assert_eq!(streaming.usage(), eager.usage());
    }

    #[test]
    fn prop_skip_consumes_and_charges_like_load(t in tag()) {
        let mut bytes = encode(&t);
        bytes.push(0xAB);

        let mut eager = Accounter::unlimited();
        io::read_tag(bytes.as_slice(), &mut eager).unwrap();

        let mut reader = bytes.as_slice();
        let mut skipping = Accounter::unlimited();
        io::parse(&mut reader, &mut SkipAll, &mut skipping).unwrap();

        prop_assert_eq!(reader, &[0xABu8][..]);
        prop_assert_eq!(skipping.usage(), eager.usage());
    }

    #[test]
    fn prop_accounting_is_deterministic(t in tag()) {
        let bytes = encode(&t);
        let mut first = Accounter::unlimited();
        let mut second = Accounter::unlimited();
        io::read_tag(bytes.as_slice(), &mut first).unwrap();
        io::read_tag(bytes.as_slice(), &mut second).unwrap();
        prop_assert_eq!(first.usage(), second.usage());
        prop_assert!(io::read_tag(bytes.as_slice(), &mut Accounter::new(first.usage())).is_ok());
    }

    #[test]
    fn prop_tag_passes_through_serde(t in tag()) {
        prop_assert_eq!(to_tag(&t).unwrap(), t.clone());
        prop_assert_eq!(from_tag::<Tag>(t.clone()).unwrap(), t.clone());
        prop_assert_eq!(from_bytes::<Tag>(&to_bytes(&t).unwrap()).unwrap(), t);
    }

    #[test]
    fn prop_replay_matches_decode(t in tag()) {
        let (_, decoded) = io::read_tag(encode(&t).as_slice(), &mut Accounter::unlimited()).unwrap();
        let mut collect = CollectToTag::new();
        t.accept_stream_root(&mut collect);
        prop_assert_eq!(collect.into_result(), Some(decoded));
    }
}
