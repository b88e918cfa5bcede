use serde::{Deserialize, Serialize};
use serde_nbt::{from_bytes, from_tag, nbt, to_bytes, to_snbt, to_tag, Error, Tag};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
enum Gamemode {
    Survival,
    Creative,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
enum Shape {
    Point,
    Circle(f64),
    Segment(i32, i32),
    Box { width: u16, height: u16 },
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Item {
    id: String,
    count: u8,
    damage: Option<i16>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Player {
    name: String,
    health: f32,
    xp: u32,
    seed: u64,
    flying: bool,
    mode: Gamemode,
    pos: (f64, f64, f64),
    inventory: Vec<Item>,
    shapes: Vec<Shape>,
    stats: BTreeMap<String, i64>,
    initial: char,
}

fn player() -> Player {
    let mut stats = BTreeMap::new();
    stats.insert("jumps".to_string(), 12);
    stats.insert("deaths".to_string(), 0);
    Player {
        name: "Steve".to_string(),
        health: 19.5,
        xp: 4_000_000_000,
        seed: 42,
        flying: false,
        mode: Gamemode::Creative,
        pos: (0.5, 64.0, -12.25),
        inventory: vec![
            Item {
                id: "minecraft:stone".to_string(),
                count: 64,
                damage: None,
            },
            Item {
                id: "minecraft:sword".to_string(),
                count: 1,
                damage: Some(7),
            },
        ],
        shapes: vec![
            Shape::Point,
            Shape::Circle(1.5),
            Shape::Segment(-1, 1),
            Shape::Box {
                width: 3,
                height: 4,
            },
        ],
        stats,
        initial: 'S',
    }
}

#[test]
fn test_player_through_bytes() {
    let original = player();
    let bytes = to_bytes(&original).unwrap();
    let back: Player = from_bytes(&bytes).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_player_through_snbt_text() {
    let original = player();
    let text = to_snbt(&to_tag(&original).unwrap());
    let back: Player = from_tag(serde_nbt::from_snbt(&text).unwrap()).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_tag_shape_of_struct() {
    let item = Item {
        id: "minecraft:stone".to_string(),
        count: 64,
        damage: None,
    };
    assert_eq!(
        to_tag(&item).unwrap(),
        nbt!({ "id": "minecraft:stone", "count": 64i16 })
    );
}

#[test]
fn test_tag_shape_of_enums() {
    assert_eq!(to_tag(&Gamemode::Survival).unwrap(), Tag::from("Survival"));
    assert_eq!(to_tag(&Shape::Circle(2.0)).unwrap(), nbt!({ "Circle": 2.0f64 }));
    assert_eq!(
        to_tag(&Shape::Segment(1, 2)).unwrap(),
        nbt!({ "Segment": [1i32, 2i32] })
    );
    assert_eq!(
        to_tag(&Shape::Box { width: 1, height: 2 }).unwrap(),
        nbt!({ "Box": { "width": 1i32, "height": 2i32 } })
    );
}

#[test]
fn test_unsigned_widening() {
    assert_eq!(to_tag(&255u8).unwrap(), Tag::Short(255));
    assert_eq!(to_tag(&65_535u16).unwrap(), Tag::Int(65_535));
    assert_eq!(to_tag(&u32::MAX).unwrap(), Tag::Long(i64::from(u32::MAX)));
    assert!(matches!(to_tag(&u64::MAX), Err(Error::Custom(_))));
}

#[test]
fn test_bool_needs_zero_or_one() {
    assert!(from_tag::<bool>(Tag::Byte(1)).unwrap());
    assert!(!from_tag::<bool>(Tag::Byte(0)).unwrap());
    assert!(from_tag::<bool>(Tag::Byte(2)).is_err());
    assert!(from_tag::<bool>(Tag::Int(1)).is_err());
}

#[test]
fn test_arrays_deserialize_as_sequences() {
    let values: Vec<i64> = from_tag(Tag::LongArray(vec![1, 2, 3])).unwrap();
    assert_eq!(values, vec![1, 2, 3]);
    let bytes: Vec<i8> = from_tag(Tag::ByteArray(vec![-1, 0])).unwrap();
    assert_eq!(bytes, vec![-1, 0]);
}

#[test]
fn test_wrong_shape_is_an_error() {
    assert!(from_tag::<Item>(Tag::Int(3)).is_err());
    assert!(from_tag::<Item>(nbt!({ "id": "x" })).is_err());
    assert!(from_tag::<u8>(Tag::Int(300)).is_err());
}

#[test]
fn test_non_string_keys_are_rejected() {
    let mut map = BTreeMap::new();
    map.insert(1i32, "one");
    assert!(to_tag(&map).is_err());
}

#[test]
fn test_tag_keeps_its_types_through_serde() {
    let tag = nbt!({ "a": [L; 1, 2], "b": [B; -1], "c": [I; 7], "n": 5i64 });
    assert_eq!(to_tag(&tag).unwrap(), tag);
    assert_eq!(from_tag::<Tag>(tag.clone()).unwrap(), tag);
    assert_eq!(from_bytes::<Tag>(&to_bytes(&tag).unwrap()).unwrap(), tag);
    assert_eq!(from_tag::<Tag>(Tag::Long(5)).unwrap(), Tag::Long(5));
}

#[test]
fn test_tag_serializes_to_json_as_plain_values() {
    let tag = nbt!({ "xs": [I; 1, 2] });
    assert_eq!(
        serde_json::to_value(&tag).unwrap(),
        serde_json::json!({ "xs": [1, 2] })
    );
    let back: Tag = serde_json::from_value(serde_json::json!({ "n": 3, "s": "x" })).unwrap();
    assert_eq!(back, nbt!({ "n": 3i64, "s": "x" }));
}
