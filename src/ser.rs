//! Serializing Rust values into tag trees.
//!
//! [`TagSerializer`] converts any `T: Serialize` into a [`Tag`]; most callers
//! go through [`to_tag`](crate::to_tag) or [`to_bytes`](crate::to_bytes).
//!
//! ## Type mapping
//!
//! | Rust | Tag |
//! |---|---|
//! | `bool` | `Byte` 0 or 1 |
//! | `i8`, `i16`, `i32`, `i64` | `Byte`, `Short`, `Int`, `Long` |
//! | `u8`, `u16`, `u32` | `Short`, `Int`, `Long` (the next wider signed type) |
//! | `u64` | `Long`, when it fits |
//! | `f32`, `f64` | `Float`, `Double` |
//! | `char`, `&str`, `String` | `String` |
//! | `&[u8]` via `serialize_bytes` | `ByteArray` |
//! | sequences, tuples | `List` |
//! | maps, structs | `Compound`, with `None` values left out |
//! | unit variants | `String` holding the variant name |
//! | other enum variants | a one-entry `Compound` keyed by the variant name |
//! | `()`, `None` | `End` |
//!
//! ```rust
//! use serde::Serialize;
//! use serde_nbt::{nbt, to_tag};
//!
//! #[derive(Serialize)]
//! struct Item {
//!     id: String,
//!     count: i8,
//!     damage: Option<i16>,
//! }
//!
//! let item = Item { id: "stone".to_string(), count: 64, damage: None };
//! assert_eq!(to_tag(&item).unwrap(), nbt!({ "id": "stone", "count": 64i8 }));
//! ```

use crate::tag::{BYTE_ARRAY_TOKEN, INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN};
use crate::{Compound, Error, Result, Tag};
use serde::{ser, Serialize};

/// Serializer producing a [`Tag`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TagSerializer;

pub struct SerializeVec {
    vec: Vec<Tag>,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    vec: Vec<Tag>,
}

pub struct SerializeMap {
    map: Compound,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    map: Compound,
}

impl ser::Serializer for TagSerializer {
    type Ok = Tag;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Tag> {
        Ok(Tag::Byte(i8::from(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Tag> {
        Ok(Tag::Byte(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Tag> {
        Ok(Tag::Short(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Tag> {
        Ok(Tag::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Tag> {
        Ok(Tag::Long(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Tag> {
        Ok(Tag::Short(i16::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Tag> {
        Ok(Tag::Int(i32::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Tag> {
        Ok(Tag::Long(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Tag> {
        i64::try_from(v)
            .map(Tag::Long)
            .map_err(|_| Error::custom(format!("u64 {} does not fit a long tag", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Tag> {
        Ok(Tag::Float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Tag> {
        Ok(Tag::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Tag> {
        Ok(Tag::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Tag> {
        Ok(Tag::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Tag> {
        Ok(Tag::ByteArray(v.iter().map(|&b| b as i8).collect()))
    }

    fn serialize_none(self) -> Result<Tag> {
        Ok(Tag::End)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Tag>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Tag> {
        Ok(Tag::End)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Tag> {
        Ok(Tag::End)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Tag> {
        Ok(Tag::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Tag>
    where
        T: ?Sized + Serialize,
    {
        let tag = value.serialize(self)?;
        match name {
            BYTE_ARRAY_TOKEN => array_elements(tag, Tag::as_byte).map(Tag::ByteArray),
            INT_ARRAY_TOKEN => array_elements(tag, Tag::as_int).map(Tag::IntArray),
            LONG_ARRAY_TOKEN => array_elements(tag, Tag::as_long).map(Tag::LongArray),
            _ => Ok(tag),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Tag>
    where
        T: ?Sized + Serialize,
    {
        let mut compound = Compound::new();
        compound.insert(variant, to_tag(value)?);
        Ok(Tag::Compound(compound))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: Compound::with_capacity(len),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            map: Compound::with_capacity(capacity),
            current_key: None,
        }
    }
}

/// Unpacks the list a primitive array was serialized as.
fn array_elements<T>(tag: Tag, element: fn(&Tag) -> Option<T>) -> Result<Vec<T>> {
    let items = match tag {
        Tag::List(items) => items,
        other => return Err(Error::type_mismatch("TAG_List", other.tag_type().pretty_name())),
    };
    items
        .iter()
        .map(|item| {
            element(item)
                .ok_or_else(|| Error::type_mismatch("array element", item.tag_type().pretty_name()))
        })
        .collect()
}

/// Inserts unless the value is absent.
fn insert_present(map: &mut Compound, key: impl Into<String>, value: Tag) {
    if value != Tag::End {
        map.insert(key, value);
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Tag;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        Ok(Tag::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Tag;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        Ok(Tag::List(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Tag;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        Ok(Tag::List(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Tag;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        let mut compound = Compound::new();
        compound.insert(self.name, Tag::List(self.vec));
        Ok(Tag::Compound(compound))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Tag;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_tag(key)? {
            Tag::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::type_mismatch("string key", other.tag_type().pretty_name())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        insert_present(&mut self.map, key, to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        Ok(Tag::Compound(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Tag;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_present(&mut self.map, key, to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        Ok(Tag::Compound(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Tag;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_present(&mut self.map, key, to_tag(value)?);
        Ok(())
    }

    fn end(self) -> Result<Tag> {
        let mut compound = Compound::new();
        compound.insert(self.name, Tag::Compound(self.map));
        Ok(Tag::Compound(compound))
    }
}

/// Converts a value into a tag tree.
///
/// # Errors
///
/// Fails for map keys that are not strings and for `u64` values above
/// `i64::MAX`.
pub fn to_tag<T: Serialize + ?Sized>(value: &T) -> Result<Tag> {
    value.serialize(TagSerializer)
}
