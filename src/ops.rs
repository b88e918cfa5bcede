//! A pluggable target algebra for tag-shaped data.
//!
//! [`DynamicOps`] lists the primitive constructors and inspectors the SNBT
//! parser needs, so the parser can build any representation, not only
//! [`Tag`]. [`TagOps`] is the implementation for [`Tag`]; [`convert_tag`]
//! walks a tree into any other algebra.
//!
//! ```rust
//! use serde_nbt::{convert_tag, nbt, TagOps};
//!
//! let tag = nbt!({ "a": [1i8, 2i8] });
//! assert_eq!(convert_tag(&TagOps, &tag), tag);
//! ```

use crate::tag::{Number, Tag};
use crate::Compound;

/// Constructors and inspectors of a value representation.
pub trait DynamicOps {
    type Value: Clone;

    /// The value standing for "nothing".
    fn empty(&self) -> Self::Value;

    fn create_byte(&self, value: i8) -> Self::Value;
    fn create_short(&self, value: i16) -> Self::Value;
    fn create_int(&self, value: i32) -> Self::Value;
    fn create_long(&self, value: i64) -> Self::Value;
    fn create_float(&self, value: f32) -> Self::Value;
    fn create_double(&self, value: f64) -> Self::Value;

    fn create_bool(&self, value: bool) -> Self::Value {
        self.create_byte(i8::from(value))
    }

    fn create_number(&self, value: Number) -> Self::Value {
        match value {
            Number::Byte(v) => self.create_byte(v),
            Number::Short(v) => self.create_short(v),
            Number::Int(v) => self.create_int(v),
            Number::Long(v) => self.create_long(v),
            Number::Float(v) => self.create_float(v),
            Number::Double(v) => self.create_double(v),
        }
    }

    fn create_string(&self, value: &str) -> Self::Value;
    fn create_list(&self, items: Vec<Self::Value>) -> Self::Value;
    fn create_map(&self, entries: Vec<(String, Self::Value)>) -> Self::Value;

    fn create_byte_list(&self, values: Vec<i8>) -> Self::Value {
        let items = values.into_iter().map(|v| self.create_byte(v)).collect();
        self.create_list(items)
    }

    fn create_int_list(&self, values: Vec<i32>) -> Self::Value {
        let items = values.into_iter().map(|v| self.create_int(v)).collect();
        self.create_list(items)
    }

    fn create_long_list(&self, values: Vec<i64>) -> Self::Value {
        let items = values.into_iter().map(|v| self.create_long(v)).collect();
        self.create_list(items)
    }

    fn get_number(&self, value: &Self::Value) -> Option<Number>;

    fn get_bool(&self, value: &Self::Value) -> Option<bool> {
        self.get_number(value).map(|n| n.is_truthy())
    }

    fn get_string<'v>(&self, value: &'v Self::Value) -> Option<&'v str>;
    fn get_list(&self, value: &Self::Value) -> Option<Vec<Self::Value>>;
    fn get_map(&self, value: &Self::Value) -> Option<Vec<(String, Self::Value)>>;
}

/// [`DynamicOps`] over [`Tag`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TagOps;

impl DynamicOps for TagOps {
    type Value = Tag;

    fn empty(&self) -> Tag {
        Tag::End
    }

    fn create_byte(&self, value: i8) -> Tag {
        Tag::Byte(value)
    }

    fn create_short(&self, value: i16) -> Tag {
        Tag::Short(value)
    }

    fn create_int(&self, value: i32) -> Tag {
        Tag::Int(value)
    }

    fn create_long(&self, value: i64) -> Tag {
        Tag::Long(value)
    }

    fn create_float(&self, value: f32) -> Tag {
        Tag::Float(value)
    }

    fn create_double(&self, value: f64) -> Tag {
        Tag::Double(value)
    }

    fn create_string(&self, value: &str) -> Tag {
        Tag::String(value.to_string())
    }

    fn create_list(&self, items: Vec<Tag>) -> Tag {
        Tag::List(items)
    }

    fn create_map(&self, entries: Vec<(String, Tag)>) -> Tag {
        Tag::Compound(entries.into_iter().collect::<Compound>())
    }

    fn create_byte_list(&self, values: Vec<i8>) -> Tag {
        Tag::ByteArray(values)
    }

    fn create_int_list(&self, values: Vec<i32>) -> Tag {
        Tag::IntArray(values)
    }

    fn create_long_list(&self, values: Vec<i64>) -> Tag {
        Tag::LongArray(values)
    }

    fn get_number(&self, value: &Tag) -> Option<Number> {
        value.as_number()
    }

    fn get_string<'v>(&self, value: &'v Tag) -> Option<&'v str> {
        value.as_str()
    }

    fn get_list(&self, value: &Tag) -> Option<Vec<Tag>> {
        match value {
            Tag::List(items) => Some(items.clone()),
            Tag::ByteArray(v) => Some(v.iter().map(|b| Tag::Byte(*b)).collect()),
            Tag::IntArray(v) => Some(v.iter().map(|i| Tag::Int(*i)).collect()),
            Tag::LongArray(v) => Some(v.iter().map(|l| Tag::Long(*l)).collect()),
            _ => None,
        }
    }

    fn get_map(&self, value: &Tag) -> Option<Vec<(String, Tag)>> {
        value
            .as_compound()
            .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Converts a tag tree into the representation of `ops`.
pub fn convert_tag<O: DynamicOps + ?Sized>(ops: &O, tag: &Tag) -> O::Value {
    match tag {
        Tag::End => ops.empty(),
        Tag::Byte(v) => ops.create_byte(*v),
        Tag::Short(v) => ops.create_short(*v),
        Tag::Int(v) => ops.create_int(*v),
        Tag::Long(v) => ops.create_long(*v),
        Tag::Float(v) => ops.create_float(*v),
        Tag::Double(v) => ops.create_double(*v),
        Tag::ByteArray(v) => ops.create_byte_list(v.clone()),
        Tag::String(s) => ops.create_string(s),
        Tag::List(items) => ops.create_list(items.iter().map(|t| convert_tag(ops, t)).collect()),
        Tag::Compound(c) => ops.create_map(
            c.iter()
                .map(|(k, v)| (k.clone(), convert_tag(ops, v)))
                .collect(),
        ),
        Tag::IntArray(v) => ops.create_int_list(v.clone()),
        Tag::LongArray(v) => ops.create_long_list(v.clone()),
    }
}

/// Converts a value of `ops` back into a tag.
///
/// Values that are neither numbers, strings, maps nor lists become
/// [`Tag::End`].
pub fn convert_to_tag<O: DynamicOps + ?Sized>(ops: &O, value: &O::Value) -> Tag {
    if let Some(n) = ops.get_number(value) {
        return Tag::from(n);
    }
    if let Some(s) = ops.get_string(value) {
        return Tag::String(s.to_string());
    }
    if let Some(entries) = ops.get_map(value) {
        return Tag::Compound(
            entries
                .into_iter()
                .map(|(k, v)| (k, convert_to_tag(ops, &v)))
                .collect(),
        );
    }
    if let Some(items) = ops.get_list(value) {
        return Tag::List(items.iter().map(|v| convert_to_tag(ops, v)).collect());
    }
    Tag::End
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt;

    #[test]
    fn test_tag_ops_arrays_read_as_lists() {
        let ops = TagOps;
        assert_eq!(
            ops.get_list(&Tag::IntArray(vec![1, 2])),
            Some(vec![Tag::Int(1), Tag::Int(2)])
        );
        assert_eq!(ops.get_list(&Tag::Int(1)), None);
    }

    #[test]
    fn test_get_bool_defaults_to_nonzero() {
        let ops = TagOps;
        assert_eq!(ops.get_bool(&Tag::Byte(0)), Some(false));
        assert_eq!(ops.get_bool(&Tag::Double(0.5)), Some(true));
        assert_eq!(ops.get_bool(&Tag::from("true")), None);
    }

    #[test]
    fn test_convert_round_trip() {
        let tag = nbt!({ "a": [I; 1, 2], "b": [{ "c": "d" }], "e": 1.5f32 });
        let converted = convert_tag(&TagOps, &tag);
        assert_eq!(converted, tag);
        assert_eq!(convert_to_tag(&TagOps, &converted).as_compound().unwrap().len(), 3);
    }
}
