//! Deserializing Rust values out of tag trees.
//!
//! [`TagDeserializer`] feeds an owned [`Tag`] to any `T: Deserialize`. It
//! inverts the mapping of [`ser`](crate::ser): numbers are offered at their
//! tag width and serde range-checks them into the target type, `Byte` 0 and
//! 1 read as booleans, primitive arrays read as sequences, `End` reads as
//! `None` or `()`.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_nbt::{from_tag, nbt};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Player {
//!     name: String,
//!     alive: bool,
//!     pos: Vec<i32>,
//!     title: Option<String>,
//! }
//!
//! let tag = nbt!({ "name": "Steve", "alive": true, "pos": [I; 1, 64, -3] });
//! let player: Player = from_tag(tag).unwrap();
//! assert_eq!(player.pos, vec![1, 64, -3]);
//! assert_eq!(player.title, None);
//! ```

use crate::tag::{BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN, TAG_TOKEN};
use crate::{Compound, Error, Result, Tag};
use serde::de::DeserializeOwned;
use serde::{de, forward_to_deserialize_any};

/// Deserializer reading from an owned [`Tag`].
pub struct TagDeserializer {
    tag: Tag,
}

impl TagDeserializer {
    pub fn new(tag: Tag) -> Self {
        TagDeserializer { tag }
    }
}

/// Converts a tag tree into a value.
///
/// # Errors
///
/// Fails when the shape of the tag does not fit `T`.
pub fn from_tag<T: DeserializeOwned>(tag: Tag) -> Result<T> {
    T::deserialize(TagDeserializer::new(tag))
}

impl<'de> de::Deserializer<'de> for TagDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.tag {
            Tag::End => visitor.visit_unit(),
            Tag::Byte(v) => visitor.visit_i8(v),
            Tag::Short(v) => visitor.visit_i16(v),
            Tag::Int(v) => visitor.visit_i32(v),
            Tag::Long(v) => visitor.visit_i64(v),
            Tag::Float(v) => visitor.visit_f32(v),
            Tag::Double(v) => visitor.visit_f64(v),
            Tag::String(s) => visitor.visit_string(s),
            Tag::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Tag::Compound(c) => visitor.visit_map(MapDeserializer::new(c)),
            Tag::ByteArray(v) => {
                visitor.visit_seq(SeqDeserializer::new(v.into_iter().map(Tag::Byte).collect()))
            }
            Tag::IntArray(v) => {
                visitor.visit_seq(SeqDeserializer::new(v.into_iter().map(Tag::Int).collect()))
            }
            Tag::LongArray(v) => {
                visitor.visit_seq(SeqDeserializer::new(v.into_iter().map(Tag::Long).collect()))
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.tag {
            Tag::Byte(0) => visitor.visit_bool(false),
            Tag::Byte(1) => visitor.visit_bool(true),
            other => Err(Error::type_mismatch("TAG_Byte 0 or 1", other.tag_type().name())),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.tag {
            Tag::End => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.tag {
            Tag::ByteArray(v) => visitor.visit_byte_buf(v.into_iter().map(|b| b as u8).collect()),
            Tag::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name != TAG_TOKEN {
            return visitor.visit_newtype_struct(self);
        }
        // A `Tag` is being read: hand arrays over with their type attached.
        let marker = match self.tag {
            Tag::ByteArray(_) => BYTE_ARRAY_TOKEN,
            Tag::IntArray(_) => INT_ARRAY_TOKEN,
            Tag::LongArray(_) => LONG_ARRAY_TOKEN,
            _ => return visitor.visit_newtype_struct(self),
        };
        visitor.visit_map(ArrayDeserializer::new(marker, self.tag))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.tag {
            Tag::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Tag::Compound(compound) if compound.len() == 1 => {
                let Some((variant, value)) = compound.into_iter().next() else {
                    return Err(Error::custom("Expected a single-entry compound for enum"));
                };
                visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
            }
            other => Err(Error::type_mismatch(
                "TAG_String or single-entry TAG_Compound",
                other.tag_type().name(),
            )),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        unit unit_struct seq tuple tuple_struct map struct identifier
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Tag>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Tag>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(tag) => seed.deserialize(TagDeserializer::new(tag)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: <Compound as IntoIterator>::IntoIter,
    value: Option<Tag>,
}

impl MapDeserializer {
    fn new(compound: Compound) -> Self {
        MapDeserializer {
            iter: compound.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(TagDeserializer::new(Tag::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(TagDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// A primitive array presented as a one-entry map keyed by its array marker.
struct ArrayDeserializer {
    marker: Option<&'static str>,
    array: Option<Tag>,
}

impl ArrayDeserializer {
    fn new(marker: &'static str, array: Tag) -> Self {
        ArrayDeserializer {
            marker: Some(marker),
            array: Some(array),
        }
    }
}

impl<'de> de::MapAccess<'de> for ArrayDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.marker.take() {
            Some(marker) => seed.deserialize(TagDeserializer::new(Tag::from(marker))).map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.array.take() {
            Some(array) => seed.deserialize(TagDeserializer::new(array)),
            None => Err(Error::custom("next_value_seed called twice on an array")),
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Tag>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Tag>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(TagDeserializer::new(Tag::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Tag>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Tag::End) | None => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(TagDeserializer::new(value)),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Tag::List(items)) => visitor.visit_seq(SeqDeserializer::new(items)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Tag::Compound(c)) => visitor.visit_map(MapDeserializer::new(c)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nbt, to_tag};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f32),
        Point(i32, i32),
        Rect { w: i16, h: i16 },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Chunk {
        x: i32,
        z: i32,
        light: u8,
        sections: Vec<Shape>,
        tags: HashMap<String, i64>,
        owner: Option<String>,
    }

    #[test]
    fn test_struct_round_trip() {
        let mut tags = HashMap::new();
        tags.insert("age".to_string(), 12);
        let chunk = Chunk {
            x: -3,
            z: 7,
            light: 255,
            sections: vec![
                Shape::Empty,
                Shape::Circle(0.5),
                Shape::Point(1, 2),
                Shape::Rect { w: 1, h: 2 },
            ],
            tags,
            owner: None,
        };
        let tag = to_tag(&chunk).unwrap();
        let back: Chunk = from_tag(tag).unwrap();
        assert_eq!(back, chunk);
    }

    #[test]
    fn test_bool_requires_zero_or_one() {
        assert!(from_tag::<bool>(Tag::Byte(1)).unwrap());
        assert!(!from_tag::<bool>(Tag::Byte(0)).unwrap());
        assert!(from_tag::<bool>(Tag::Byte(2)).is_err());
        assert!(from_tag::<bool>(Tag::Int(1)).is_err());
    }

    #[test]
    fn test_arrays_read_as_sequences() {
        let longs: Vec<i64> = from_tag(nbt!([L; 1, 2])).unwrap();
        assert_eq!(longs, vec![1, 2]);
        let bytes: Vec<i8> = from_tag(nbt!([B; -1])).unwrap();
        assert_eq!(bytes, vec![-1]);
    }

    #[test]
    fn test_numbers_are_range_checked() {
        assert_eq!(from_tag::<u8>(Tag::Short(200)).unwrap(), 200);
        assert!(from_tag::<u8>(Tag::Short(300)).is_err());
        assert_eq!(from_tag::<f64>(Tag::Float(0.5)).unwrap(), 0.5);
    }

    #[test]
    fn test_end_is_none() {
        assert_eq!(from_tag::<Option<i32>>(Tag::End).unwrap(), None);
        assert_eq!(from_tag::<Option<i32>>(Tag::Int(3)).unwrap(), Some(3));
    }

    #[test]
    fn test_tag_deserializes_itself() {
        let tag = nbt!({
            "a": [1i8, 2i8],
            "b": "c",
            "long": 5i64,
            "bytes": [B; 1, -1],
            "ints": [I;],
            "longs": [L; 1, 2],
            "nested": [[L; 3], [L;]]
        });
        let back: Tag = from_tag(tag.clone()).unwrap();
        assert_eq!(back, tag);
        assert_eq!(from_tag::<Tag>(Tag::Long(5)).unwrap(), Tag::Long(5));
    }

    #[test]
    fn test_tag_inside_struct_keeps_array_types() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Wrapper {
            data: Tag,
        }
        let wrapper = Wrapper {
            data: nbt!({ "heights": [L; 1, 2], "n": 1i64 }),
        };
        let back: Wrapper = from_tag(to_tag(&wrapper).unwrap()).unwrap();
        assert_eq!(back, wrapper);
    }
}
