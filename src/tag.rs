//! The tag tree: the value domain of the NBT format.
//!
//! This module provides the [`Tag`] enum, the closed set of tag kinds, and the
//! [`TagType`] discriminator whose numeric ids are the wire format.
//!
//! ## Core Types
//!
//! - [`Tag`]: one node of the tree (an absence marker, six numerics, a string,
//!   three primitive arrays, a list or a compound)
//! - [`TagType`]: the 1-byte type id of each variant
//! - [`Number`]: a numeric tag payload, used by the dynamic value algebra
//!
//! ## Usage Patterns
//!
//! ```rust
//! use serde_nbt::{Compound, Tag, TagType};
//!
//! let mut compound = Compound::new();
//! compound.insert("health", Tag::Float(20.0));
//! compound.insert("name", "Steve");
//!
//! let tag = Tag::Compound(compound);
//! assert_eq!(tag.tag_type(), TagType::Compound);
//! assert_eq!(tag.id(), 10);
//! ```
//!
//! ## Lists and Boxing
//!
//! On the wire a list carries a single element type. A list whose elements
//! disagree is written as a list of compounds: every element that is not
//! already a plain compound is boxed under the empty key, and unboxed again on
//! read. See [`box_element`] and [`unbox_element`].

use crate::Compound;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// The type id of a tag. The discriminants are fixed by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    /// All tag types, indexed by id.
    pub const ALL: [TagType; 13] = [
        TagType::End,
        TagType::Byte,
        TagType::Short,
        TagType::Int,
        TagType::Long,
        TagType::Float,
        TagType::Double,
        TagType::ByteArray,
        TagType::String,
        TagType::List,
        TagType::Compound,
        TagType::IntArray,
        TagType::LongArray,
    ];

    /// Looks up a tag type by wire id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::TagType;
    ///
    /// assert_eq!(TagType::from_id(3), Some(TagType::Int));
    /// assert_eq!(TagType::from_id(13), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_id(id: u8) -> Option<TagType> {
        TagType::ALL.get(usize::from(id)).copied()
    }

    /// Returns the wire id of this type.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the short type name (`"INT"`, `"BYTE[]"`, …).
    #[must_use]
    pub fn name(self) -> &'static str {
        crate::types::kind_for(self.id()).name()
    }

    /// Returns the descriptive type name (`"TAG_Int"`, `"TAG_Byte_Array"`, …).
    #[must_use]
    pub fn pretty_name(self) -> &'static str {
        crate::types::kind_for(self.id()).pretty_name()
    }

    /// Returns `true` for the six fixed-width numeric types.
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            TagType::Byte
                | TagType::Short
                | TagType::Int
                | TagType::Long
                | TagType::Float
                | TagType::Double
        )
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_name())
    }
}

/// One node of the tag tree.
///
/// Equality is structural; compounds compare equal regardless of insertion
/// order. `Clone` is a deep copy and the only way to share a subtree between
/// independent owners.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::Tag;
///
/// let tag = Tag::from(42i32);
/// assert_eq!(tag, Tag::Int(42));
/// assert_eq!(tag.as_i64(), Some(42));
/// assert!(tag.is_numeric());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Tag {
    /// The absence marker; terminates compounds on the wire.
    #[default]
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// A numeric tag payload.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::Number;
///
/// assert_eq!(Number::Short(7).as_i64(), 7);
/// assert_eq!(Number::Float(1.5).as_f64(), 1.5);
/// assert!(Number::Long(0).is_integer());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Returns `true` for the four integer widths.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Number::Byte(_) | Number::Short(_) | Number::Int(_) | Number::Long(_)
        )
    }

    /// Converts to `i64`, truncating floats toward zero.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match *self {
            Number::Byte(v) => i64::from(v),
            Number::Short(v) => i64::from(v),
            Number::Int(v) => i64::from(v),
            Number::Long(v) => v,
            Number::Float(v) => v as i64,
            Number::Double(v) => v as i64,
        }
    }

    /// Converts to `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Byte(v) => f64::from(v),
            Number::Short(v) => f64::from(v),
            Number::Int(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Float(v) => f64::from(v),
            Number::Double(v) => v,
        }
    }

    /// Returns `true` if the number is non-zero.
    #[inline]
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        if self.is_integer() {
            self.as_i64() != 0
        } else {
            self.as_f64() != 0.0
        }
    }
}

impl From<Number> for Tag {
    fn from(value: Number) -> Self {
        match value {
            Number::Byte(v) => Tag::Byte(v),
            Number::Short(v) => Tag::Short(v),
            Number::Int(v) => Tag::Int(v),
            Number::Long(v) => Tag::Long(v),
            Number::Float(v) => Tag::Float(v),
            Number::Double(v) => Tag::Double(v),
        }
    }
}

impl Tag {
    /// Returns the type of this tag.
    #[inline]
    #[must_use]
    pub const fn tag_type(&self) -> TagType {
        match self {
            Tag::End => TagType::End,
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    /// Returns the wire id of this tag's type.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u8 {
        self.tag_type().id()
    }

    /// Estimated heap footprint, in the same units the [`Accounter`](crate::Accounter)
    /// charges while decoding.
    ///
    /// This is a quota measure, not the real memory use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::Tag;
    ///
    /// assert_eq!(Tag::Int(1).size_in_bytes(), 12);
    /// assert_eq!(Tag::from("ab").size_in_bytes(), 40);
    /// ```
    #[must_use]
    pub fn size_in_bytes(&self) -> u64 {
        match self {
            Tag::End => 8,
            Tag::Byte(_) => 9,
            Tag::Short(_) => 10,
            Tag::Int(_) => 12,
            Tag::Long(_) => 16,
            Tag::Float(_) => 12,
            Tag::Double(_) => 16,
            Tag::ByteArray(v) => 24 + v.len() as u64,
            Tag::String(s) => 36 + 2 * utf16_len(s),
            Tag::List(items) => {
                37 + 4 * items.len() as u64 + items.iter().map(Tag::size_in_bytes).sum::<u64>()
            }
            Tag::Compound(c) => c.size_in_bytes(),
            Tag::IntArray(v) => 24 + 4 * v.len() as u64,
            Tag::LongArray(v) => 24 + 8 * v.len() as u64,
        }
    }

    /// Returns `true` for the six numeric variants.
    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.tag_type().is_numeric()
    }

    /// Returns `true` if the tag is a compound.
    #[inline]
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Tag::Compound(_))
    }

    /// Returns `true` if the tag is a list.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Tag::List(_))
    }

    /// Returns `true` if the tag is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Tag::String(_))
    }

    /// If the tag is numeric, returns its payload.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Tag::Byte(v) => Some(Number::Byte(v)),
            Tag::Short(v) => Some(Number::Short(v)),
            Tag::Int(v) => Some(Number::Int(v)),
            Tag::Long(v) => Some(Number::Long(v)),
            Tag::Float(v) => Some(Number::Float(v)),
            Tag::Double(v) => Some(Number::Double(v)),
            _ => None,
        }
    }

    /// If the tag is numeric, returns it as an `i64` (floats truncate).
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().map(|n| n.as_i64())
    }

    /// If the tag is numeric, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    /// If the tag is a byte, returns it.
    #[inline]
    #[must_use]
    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Tag::Byte(v) => Some(*v),
            _ => None,
        }
    }

    /// If the tag is a short, returns it.
    #[inline]
    #[must_use]
    pub fn as_short(&self) -> Option<i16> {
        match self {
            Tag::Short(v) => Some(*v),
            _ => None,
        }
    }

    /// If the tag is an int, returns it.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Tag::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// If the tag is a long, returns it.
    #[inline]
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// If the tag is a byte, returns whether it is non-zero.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_byte().map(|b| b != 0)
    }

    /// If the tag is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::Tag;
    ///
    /// assert_eq!(Tag::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Tag::Int(1).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the tag is a list, returns its elements.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    /// If the tag is a compound, returns it.
    #[inline]
    #[must_use]
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// If the tag is a compound, returns it mutably.
    #[inline]
    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Encodes a UUID as an int array of four ints, most significant first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::Tag;
    /// use uuid::Uuid;
    ///
    /// let id = Uuid::from_u128(0x0000_0001_0000_0002_0000_0003_0000_0004);
    /// assert_eq!(Tag::from_uuid(id), Tag::IntArray(vec![1, 2, 3, 4]));
    /// ```
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Tag {
        let (most, least) = uuid.as_u64_pair();
        Tag::IntArray(vec![
            (most >> 32) as i32,
            most as i32,
            (least >> 32) as i32,
            least as i32,
        ])
    }

    /// Decodes a four-int array back into a UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Tag::IntArray(v) if v.len() == 4 => {
                let most = (u64::from(v[0] as u32) << 32) | u64::from(v[1] as u32);
                let least = (u64::from(v[2] as u32) << 32) | u64::from(v[3] as u32);
                Some(Uuid::from_u64_pair(most, least))
            }
            _ => None,
        }
    }
}

pub(crate) fn utf16_len(s: &str) -> u64 {
    s.encode_utf16().count() as u64
}

/// Computes the single element type a list is written with.
///
/// Empty lists use [`TagType::End`]; lists whose elements disagree degrade to
/// [`TagType::Compound`].
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{list_element_type, Tag, TagType};
///
/// assert_eq!(list_element_type(&[]), TagType::End);
/// assert_eq!(list_element_type(&[Tag::Int(1), Tag::Int(2)]), TagType::Int);
/// assert_eq!(list_element_type(&[Tag::Int(1), Tag::Byte(2)]), TagType::Compound);
/// ```
#[must_use]
pub fn list_element_type(items: &[Tag]) -> TagType {
    let Some(first) = items.first() else {
        return TagType::End;
    };
    let ty = first.tag_type();
    if items[1..].iter().all(|t| t.tag_type() == ty) {
        ty
    } else {
        TagType::Compound
    }
}

/// Returns `true` if the compound is a box made by [`box_element`]: exactly one
/// entry, under the empty key.
#[inline]
#[must_use]
pub fn is_box(compound: &Compound) -> bool {
    compound.len() == 1 && compound.contains_key("")
}

/// Returns `true` if the value must be boxed to be written as an element of a
/// compound-typed list.
#[inline]
#[must_use]
pub fn needs_box(tag: &Tag) -> bool {
    match tag {
        Tag::Compound(c) => is_box(c),
        _ => true,
    }
}

/// Wraps a list element so it can be written in a compound-typed list.
///
/// Plain compounds are returned unchanged; everything else, including a
/// compound that already looks like a box, is placed under the empty key.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{box_element, unbox_element, Tag};
///
/// let boxed = box_element(Tag::Int(5));
/// assert_eq!(boxed.get(""), Some(&Tag::Int(5)));
/// assert_eq!(unbox_element(boxed), Tag::Int(5));
/// ```
#[must_use]
pub fn box_element(tag: Tag) -> Compound {
    match tag {
        Tag::Compound(c) if !is_box(&c) => c,
        other => {
            let mut wrapper = Compound::with_capacity(1);
            wrapper.insert("", other);
            wrapper
        }
    }
}

/// Reverses [`box_element`] for an element read from a compound-typed list.
///
/// Any compound whose only key is the empty string is treated as a box.
#[must_use]
pub fn unbox_element(compound: Compound) -> Tag {
    if is_box(&compound) {
        let mut compound = compound;
        compound.remove("").unwrap_or_default()
    } else {
        Tag::Compound(compound)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::printer::to_snbt(self))
    }
}

// Names that let a `Tag` pass through the tag serializer and deserializer
// with its array types intact. Other formats see a plain newtype.
pub(crate) const TAG_TOKEN: &str = "$serde_nbt::private::Tag";
pub(crate) const BYTE_ARRAY_TOKEN: &str = "$serde_nbt::private::ByteArray";
pub(crate) const INT_ARRAY_TOKEN: &str = "$serde_nbt::private::IntArray";
pub(crate) const LONG_ARRAY_TOKEN: &str = "$serde_nbt::private::LongArray";

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Tag::End => serializer.serialize_unit(),
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::String(s) => serializer.serialize_str(s),
            Tag::ByteArray(v) => serializer.serialize_newtype_struct(BYTE_ARRAY_TOKEN, v),
            Tag::IntArray(v) => serializer.serialize_newtype_struct(INT_ARRAY_TOKEN, v),
            Tag::LongArray(v) => serializer.serialize_newtype_struct(LONG_ARRAY_TOKEN, v),
            Tag::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Tag::Compound(c) => {
                let mut map = serializer.serialize_map(Some(c.len()))?;
                for (k, v) in c.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct TagVisitor;

        impl<'de> Visitor<'de> for TagVisitor {
            type Value = Tag;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value representable as a tag")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Tag::from(value))
            }

            fn visit_i8<E>(self, value: i8) -> Result<Self::Value, E> {
                Ok(Tag::Byte(value))
            }

            fn visit_i16<E>(self, value: i16) -> Result<Self::Value, E> {
                Ok(Tag::Short(value))
            }

            fn visit_i32<E>(self, value: i32) -> Result<Self::Value, E> {
                Ok(Tag::Int(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Tag::Long(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match i64::try_from(value) {
                    Ok(v) => self.visit_i64(v),
                    Err(_) => Err(E::custom(format!("{} does not fit in a long", value))),
                }
            }

            fn visit_f32<E>(self, value: f32) -> Result<Self::Value, E> {
                Ok(Tag::Float(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Tag::Double(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Tag::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Tag::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Tag::ByteArray(value.iter().map(|b| *b as i8).collect()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Tag::End)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Tag::End)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Tag::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Compound::new();
                let Some(first) = map.next_key::<String>()? else {
                    return Ok(Tag::Compound(values));
                };
                match first.as_str() {
                    BYTE_ARRAY_TOKEN => return Ok(Tag::ByteArray(map.next_value()?)),
                    INT_ARRAY_TOKEN => return Ok(Tag::IntArray(map.next_value()?)),
                    LONG_ARRAY_TOKEN => return Ok(Tag::LongArray(map.next_value()?)),
                    _ => {}
                }
                values.insert(first, map.next_value::<Tag>()?);
                while let Some((key, value)) = map.next_entry::<String, Tag>()? {
                    values.insert(key, value);
                }
                Ok(Tag::Compound(values))
            }
        }

        deserializer.deserialize_newtype_struct(TAG_TOKEN, TagVisitor)
    }
}

// From implementations for creating tags from primitives
impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Tag::Byte(i8::from(value))
    }
}

impl From<i8> for Tag {
    fn from(value: i8) -> Self {
        Tag::Byte(value)
    }
}

impl From<i16> for Tag {
    fn from(value: i16) -> Self {
        Tag::Short(value)
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Tag::Int(value)
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Tag::Long(value)
    }
}

impl From<f32> for Tag {
    fn from(value: f32) -> Self {
        Tag::Float(value)
    }
}

impl From<f64> for Tag {
    fn from(value: f64) -> Self {
        Tag::Double(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<Vec<Tag>> for Tag {
    fn from(value: Vec<Tag>) -> Self {
        Tag::List(value)
    }
}

impl From<Vec<i8>> for Tag {
    fn from(value: Vec<i8>) -> Self {
        Tag::ByteArray(value)
    }
}

impl From<Vec<i32>> for Tag {
    fn from(value: Vec<i32>) -> Self {
        Tag::IntArray(value)
    }
}

impl From<Vec<i64>> for Tag {
    fn from(value: Vec<i64>) -> Self {
        Tag::LongArray(value)
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Tag::Compound(value)
    }
}

impl From<Uuid> for Tag {
    fn from(value: Uuid) -> Self {
        Tag::from_uuid(value)
    }
}

// TryFrom implementations for extracting values from tags
impl TryFrom<Tag> for i64 {
    type Error = crate::Error;

    fn try_from(value: Tag) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::type_mismatch("number", value.tag_type().pretty_name()))
    }
}

impl TryFrom<Tag> for f64 {
    type Error = crate::Error;

    fn try_from(value: Tag) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::type_mismatch("number", value.tag_type().pretty_name()))
    }
}

impl TryFrom<Tag> for String {
    type Error = crate::Error;

    fn try_from(value: Tag) -> crate::Result<Self> {
        match value {
            Tag::String(s) => Ok(s),
            other => Err(crate::Error::type_mismatch(
                "TAG_String",
                other.tag_type().pretty_name(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids_are_stable() {
        for (id, ty) in TagType::ALL.iter().enumerate() {
            assert_eq!(ty.id() as usize, id);
            assert_eq!(TagType::from_id(id as u8), Some(*ty));
        }
        assert_eq!(TagType::from_id(13), None);
        assert_eq!(TagType::from_id(255), None);
    }

    #[test]
    fn test_box_unbox_bijection() {
        let values = vec![
            Tag::Int(5),
            Tag::from("x"),
            Tag::List(vec![Tag::Byte(1)]),
            Tag::LongArray(vec![1, 2]),
        ];
        for value in values {
            let boxed = box_element(value.clone());
            assert!(is_box(&boxed));
            assert_eq!(unbox_element(boxed), value);
        }
    }

    #[test]
    fn test_box_is_noop_for_plain_compound() {
        let mut c = Compound::new();
        c.insert("a", 1i32);
        assert_eq!(box_element(Tag::Compound(c.clone())), c);
        assert!(!needs_box(&Tag::Compound(c)));
    }

    #[test]
    fn test_box_wraps_lookalike_compound_again() {
        let mut lookalike = Compound::new();
        lookalike.insert("", 5i32);
        let boxed = box_element(Tag::Compound(lookalike.clone()));
        assert_eq!(boxed.get(""), Some(&Tag::Compound(lookalike.clone())));
        assert_eq!(unbox_element(boxed), Tag::Compound(lookalike));
    }

    #[test]
    fn test_size_in_bytes() {
        let mut c = Compound::new();
        c.insert("a", 1i32);
        c.insert("b", "x");
        // 48 + (30 + 36 + 12) + (30 + 36 + 38)
        assert_eq!(Tag::Compound(c).size_in_bytes(), 230);
        assert_eq!(
            Tag::List(vec![Tag::Byte(1), Tag::Byte(2)]).size_in_bytes(),
            37 + 8 + 18
        );
        assert_eq!(Tag::IntArray(vec![1, 2, 3]).size_in_bytes(), 36);
    }

    #[test]
    fn test_uuid_roundtrip() {
        let id = Uuid::parse_str("f81d4fae-7dec-11d0-a765-00a0c91e6bf6").unwrap();
        let tag = Tag::from(id);
        assert_eq!(tag.as_uuid(), Some(id));
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Tag::Short(7)).unwrap(), 7);
        assert_eq!(f64::try_from(Tag::Float(1.5)).unwrap(), 1.5);
        assert!(String::try_from(Tag::Int(1)).is_err());
    }
}
