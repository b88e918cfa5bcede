use serde_nbt::{io, nbt, Accounter, Compound, Compression, Error, Tag};
use std::io::Write;
use tempfile::tempdir;

fn encode(tag: &Tag) -> Vec<u8> {
    let mut bytes = Vec::new();
    io::write_tag(&mut bytes, "", tag).unwrap();
    bytes
}

fn decode(bytes: &[u8]) -> Tag {
    io::read_tag(bytes, &mut Accounter::unlimited()).unwrap().1
}

/// A compound root holding `levels - 1` compounds nested under key "a".
fn nested_compounds(levels: usize) -> Vec<u8> {
    let mut bytes = vec![10, 0, 0];
    for _ in 1..levels {
        bytes.extend_from_slice(&[10, 0, 1, b'a']);
    }
    bytes.extend(std::iter::repeat(0).take(levels));
    bytes
}

#[test]
fn test_small_compound_size_and_accounting() {
    let mut root = Compound::new();
    root.insert("a", 1i32);
    root.insert("b", "x");

    let mut bytes = Vec::new();
    io::write_compound(&mut bytes, &root).unwrap();
    assert_eq!(bytes.len(), 19);
    assert_eq!(
        bytes,
        vec![10, 0, 0, 3, 0, 1, b'a', 0, 0, 0, 1, 8, 0, 1, b'b', 0, 1, b'x', 0]
    );

    let mut acc = Accounter::unlimited();
    let back = io::read_compound(bytes.as_slice(), &mut acc).unwrap();
    assert_eq!(back, root);
    assert_eq!(acc.usage(), 230);
    assert_eq!(acc.usage(), Tag::Compound(root).size_in_bytes());
}

#[test]
fn test_accounting_is_deterministic() {
    let tag = nbt!({ "list": [1i16, 2i16], "name": "héllo", "arr": [L; 1, 2, 3] });
    let bytes = encode(&tag);

    let mut first = Accounter::unlimited();
    let mut second = Accounter::unlimited();
    io::read_tag(bytes.as_slice(), &mut first).unwrap();
    io::read_tag(bytes.as_slice(), &mut second).unwrap();
    assert_eq!(first.usage(), second.usage());
    assert_eq!(first.usage(), tag.size_in_bytes());

    let tight = first.usage() - 1;
    let err = io::read_tag(bytes.as_slice(), &mut Accounter::new(tight)).unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { quota, .. } if quota == tight));
    assert!(io::read_tag(bytes.as_slice(), &mut Accounter::new(first.usage())).is_ok());
}

#[test]
fn test_depth_guard() {
    let ok = nested_compounds(512);
    assert!(io::read_compound(ok.as_slice(), &mut Accounter::unlimited()).is_ok());

    let too_deep = nested_compounds(513);
    let err = io::read_compound(too_deep.as_slice(), &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { max: 512 }));
    assert!(err.is_accounting());
}

#[test]
fn test_depth_guard_also_applies_when_skipping() {
    let too_deep = nested_compounds(513);
    let err = io::parse(
        too_deep.as_slice(),
        &mut serde_nbt::SkipAll,
        &mut Accounter::unlimited(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { .. }));

    let ok = nested_compounds(512);
    assert!(io::parse(ok.as_slice(), &mut serde_nbt::SkipAll, &mut Accounter::unlimited()).is_ok());

    let mut collect = serde_nbt::CollectToTag::new();
    let err = io::parse(too_deep.as_slice(), &mut collect, &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { .. }));
}

#[test]
fn test_mixed_list_round_trips_through_boxing() {
    let tag = nbt!([{ "k": "v" }, 5i32]);
    let back = decode(&encode(&tag));
    assert_eq!(back, tag);
    assert_eq!(back.as_list().unwrap()[1], Tag::Int(5));
}

#[test]
fn test_box_looking_compound_survives() {
    let tag = nbt!([{ "": 1i32 }]);
    assert_eq!(decode(&encode(&tag)), tag);
}

#[test]
fn test_end_values_are_dropped_on_write() {
    let mut root = Compound::new();
    root.insert("gone", Tag::End);
    root.insert("list", Tag::List(vec![Tag::Int(1), Tag::End, Tag::Int(2)]));
    let back = decode(&encode(&Tag::Compound(root)));
    assert_eq!(back, nbt!({ "list": [1i32, 2i32] }));
}

#[test]
fn test_end_root() {
    let bytes = encode(&Tag::End);
    assert_eq!(bytes, vec![0]);
    assert_eq!(io::read_tag(bytes.as_slice(), &mut Accounter::unlimited()).unwrap(), (String::new(), Tag::End));
}

#[test]
fn test_oversized_name_is_replaced() {
    let long = "a".repeat(70_000);
    let mut root = Compound::new();
    root.insert(long.clone(), 1i8);
    root.insert("text", long);
    let back = decode(&encode(&Tag::Compound(root)));
    assert_eq!(back, nbt!({ "": 1i8, "text": "" }));
}

#[test]
fn test_root_name_is_kept() {
    let mut bytes = Vec::new();
    io::write_tag(&mut bytes, "level", &Tag::Int(3)).unwrap();
    let (name, tag) = io::read_tag(bytes.as_slice(), &mut Accounter::unlimited()).unwrap();
    assert_eq!(name, "level");
    assert_eq!(tag, Tag::Int(3));
}

#[test]
fn test_invalid_type_ids() {
    let err = io::read_tag(&[42u8][..], &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err, Error::InvalidTagType(42)));

    // Compound with one list entry whose element type is 99, length 0.
    let bytes = [10, 0, 0, 9, 0, 0, 99, 0, 0, 0, 0, 0];
    let err = io::read_tag(&bytes[..], &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidTagType(99)));
    assert!(matches!(err, Error::Load { tag_type: "TAG_Compound", .. }));
}

#[test]
fn test_untyped_list_with_elements_is_malformed() {
    let bytes = [10, 0, 0, 9, 0, 0, 0, 0, 0, 0, 1, 0];
    let err = io::read_tag(&bytes[..], &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err.root_cause(), Error::Malformed(_)));

    let empty = [10, 0, 0, 9, 0, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(
        io::read_tag(&empty[..], &mut Accounter::unlimited()).unwrap().1,
        nbt!({ "": [] })
    );
}

#[test]
fn test_negative_length_is_malformed() {
    let bytes = [7, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
    let err = io::read_tag(&bytes[..], &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err.root_cause(), Error::Malformed(_)));
}

#[test]
fn test_truncated_input() {
    let bytes = encode(&nbt!({ "a": [I; 1, 2, 3] }));
    let err = io::read_tag(&bytes[..bytes.len() - 3], &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err.root_cause(), Error::Io(_)));
}

#[test]
fn test_root_must_be_compound() {
    let bytes = encode(&Tag::Int(1));
    let err = io::read_compound(bytes.as_slice(), &mut Accounter::unlimited()).unwrap_err();
    assert!(matches!(err, Error::RootNotCompound { found: "TAG_Int" }));
}

#[test]
fn test_gzip_round_trip() {
    let tag = nbt!({ "Data": { "seed": 42i64, "name": "world" } });
    let root = tag.as_compound().unwrap();
    let mut bytes = Vec::new();
    io::write_compressed(&mut bytes, root).unwrap();
    assert_eq!(Compression::detect(&bytes), Compression::Gzip);

    let back = io::read_compressed(bytes.as_slice(), &mut Accounter::untrusted()).unwrap();
    assert_eq!(&back, root);
}

#[test]
fn test_file_round_trip() {
    let dir = tempdir().unwrap();
    let tag = nbt!({ "pos": [I; 1, 2, 3], "name": "chest" });
    let root = tag.as_compound().unwrap();

    for compression in [Compression::None, Compression::Gzip] {
        let path = dir.path().join(format!("{:?}.nbt", compression));
        io::write_file(&path, root, compression).unwrap();
        let back = io::read_file(&path, compression).unwrap();
        assert_eq!(&back, root);
    }
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = io::read_file(dir.path().join("absent.nbt"), Compression::None).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_garbage_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.nbt");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&[10, 0, 0, 77])
        .unwrap();
    assert!(io::read_file(&path, Compression::None).is_err());
    assert!(io::read_file(&path, Compression::Gzip).is_err());
}

#[test]
fn test_contains_root_key() {
    let bytes = encode(&nbt!({ "first": [I; 1, 2], "wanted": 1i8 }));
    let mut acc = Accounter::unlimited();
    assert!(io::contains_root_key(bytes.as_slice(), "wanted", &mut acc).unwrap());
    assert!(!io::contains_root_key(bytes.as_slice(), "other", &mut Accounter::unlimited()).unwrap());
    assert!(!io::contains_root_key(encode(&Tag::Int(1)).as_slice(), "x", &mut Accounter::unlimited()).unwrap());
}
