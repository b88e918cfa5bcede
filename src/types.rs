//! Per-type codec dispatch.
//!
//! Each wire id maps to a [`TagKind`] that knows how to load, stream, and skip
//! a payload of that type. [`kind_for`] never fails: ids without a type map to
//! an invalid kind whose every operation reports [`Error::InvalidTagType`].

use crate::accounter::Accounter;
use crate::io::{
    read_f32, read_f64, read_i16, read_i32, read_i64, read_i8, read_len, read_name, read_string,
    read_u8, skip_bytes, skip_name, skip_string,
};
use crate::stream::{EntryResult, StreamVisitor, ValueResult};
use crate::tag::{unbox_element, Tag, TagType};
use crate::{Compound, Error, Result};
use once_cell::sync::Lazy;
use std::io::Read;

/// Codec operations for one tag type.
pub trait TagKind: Sync {
    /// The type this kind handles, or `None` for an invalid id.
    fn tag_type(&self) -> Option<TagType>;

    /// Short name: `"INT"`, `"BYTE[]"`, ...
    fn name(&self) -> &'static str;

    /// Descriptive name: `"TAG_Int"`, `"TAG_Byte_Array"`, ...
    fn pretty_name(&self) -> &'static str;

    /// Reads one payload into a tag.
    fn load(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag>;

    /// Reads one payload, reporting it to `visitor` instead of building a tag.
    fn parse(
        &self,
        r: &mut dyn Read,
        visitor: &mut dyn StreamVisitor,
        acc: &mut Accounter,
    ) -> Result<ValueResult>;

    /// Consumes one payload without building anything. Charges the same
    /// amount as [`TagKind::load`].
    fn skip(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<()>;

    /// Consumes `count` consecutive payloads.
    fn skip_many(&self, r: &mut dyn Read, count: usize, acc: &mut Accounter) -> Result<()> {
        for _ in 0..count {
            self.skip(r, acc)?;
        }
        Ok(())
    }
}

/// Returns the kind for a wire id.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::types::kind_for;
///
/// assert_eq!(kind_for(3).name(), "INT");
/// assert_eq!(kind_for(11).pretty_name(), "TAG_Int_Array");
/// assert_eq!(kind_for(42).name(), "INVALID[42]");
/// ```
#[must_use]
pub fn kind_for(id: u8) -> &'static dyn TagKind {
    match KINDS.get(usize::from(id)) {
        Some(kind) => *kind,
        None => &INVALID_KINDS[usize::from(id)],
    }
}

/// Returns the kind for a wire id, failing for ids without a type.
pub(crate) fn valid_kind(id: u8) -> Result<(TagType, &'static dyn TagKind)> {
    let ty = TagType::from_id(id).ok_or(Error::InvalidTagType(id))?;
    Ok((ty, kind_for(id)))
}

static KINDS: [&dyn TagKind; 13] = [
    &EndKind,
    &ByteKind,
    &ShortKind,
    &IntKind,
    &LongKind,
    &FloatKind,
    &DoubleKind,
    &ByteArrayKind,
    &StringKind,
    &ListKind,
    &CompoundKind,
    &IntArrayKind,
    &LongArrayKind,
];

static INVALID_KINDS: [InvalidKind; 256] = invalid_kinds();

static INVALID_NAMES: Lazy<Vec<String>> =
    Lazy::new(|| (0..=255u8).map(|id| format!("INVALID[{}]", id)).collect());

static INVALID_PRETTY_NAMES: Lazy<Vec<String>> =
    Lazy::new(|| (0..=255u8).map(|id| format!("UNKNOWN_{}", id)).collect());

const fn invalid_kinds() -> [InvalidKind; 256] {
    let mut kinds = [InvalidKind { id: 0 }; 256];
    let mut i = 0;
    while i < 256 {
        kinds[i] = InvalidKind { id: i as u8 };
        i += 1;
    }
    kinds
}

#[derive(Clone, Copy)]
struct InvalidKind {
    id: u8,
}

impl TagKind for InvalidKind {
    fn tag_type(&self) -> Option<TagType> {
        None
    }

    fn name(&self) -> &'static str {
        INVALID_NAMES[usize::from(self.id)].as_str()
    }

    fn pretty_name(&self) -> &'static str {
        INVALID_PRETTY_NAMES[usize::from(self.id)].as_str()
    }

    fn load(&self, _r: &mut dyn Read, _acc: &mut Accounter) -> Result<Tag> {
        Err(Error::InvalidTagType(self.id))
    }

    fn parse(
        &self,
        _r: &mut dyn Read,
        _visitor: &mut dyn StreamVisitor,
        _acc: &mut Accounter,
    ) -> Result<ValueResult> {
        Err(Error::InvalidTagType(self.id))
    }

    fn skip(&self, _r: &mut dyn Read, _acc: &mut Accounter) -> Result<()> {
        Err(Error::InvalidTagType(self.id))
    }

    fn skip_many(&self, _r: &mut dyn Read, count: usize, _acc: &mut Accounter) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        Err(Error::InvalidTagType(self.id))
    }
}

struct EndKind;

impl TagKind for EndKind {
    fn tag_type(&self) -> Option<TagType> {
        Some(TagType::End)
    }

    fn name(&self) -> &'static str {
        "END"
    }

    fn pretty_name(&self) -> &'static str {
        "TAG_End"
    }

    fn load(&self, _r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag> {
        acc.account_bytes(8)?;
        Ok(Tag::End)
    }

    fn parse(
        &self,
        _r: &mut dyn Read,
        visitor: &mut dyn StreamVisitor,
        acc: &mut Accounter,
    ) -> Result<ValueResult> {
        acc.account_bytes(8)?;
        Ok(visitor.visit_end())
    }

    fn skip(&self, _r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
        acc.account_bytes(8)
    }

    fn skip_many(&self, _r: &mut dyn Read, count: usize, acc: &mut Accounter) -> Result<()> {
        acc.account_bytes_each(8, count as u64)
    }
}

// Fixed-width numerics: skipping `count` payloads is a single seek.
macro_rules! static_kind {
    ($kind:ident, $ty:ident, $name:literal, $pretty:literal, $width:literal, $cost:literal, $read:ident, $visit:ident) => {
        struct $kind;

        impl TagKind for $kind {
            fn tag_type(&self) -> Option<TagType> {
                Some(TagType::$ty)
            }

            fn name(&self) -> &'static str {
                $name
            }

            fn pretty_name(&self) -> &'static str {
                $pretty
            }

            fn load(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag> {
                acc.account_bytes($cost)?;
                Ok(Tag::$ty($read(r)?))
            }

            fn parse(
                &self,
                r: &mut dyn Read,
                visitor: &mut dyn StreamVisitor,
                acc: &mut Accounter,
            ) -> Result<ValueResult> {
                acc.account_bytes($cost)?;
                Ok(visitor.$visit($read(r)?))
            }

            fn skip(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
                self.skip_many(r, 1, acc)
            }

            fn skip_many(&self, r: &mut dyn Read, count: usize, acc: &mut Accounter) -> Result<()> {
                acc.account_bytes_each($cost, count as u64)?;
                skip_bytes(r, $width * count as u64)
            }
        }
    };
}

static_kind!(ByteKind, Byte, "BYTE", "TAG_Byte", 1, 9, read_i8, visit_byte);
static_kind!(ShortKind, Short, "SHORT", "TAG_Short", 2, 10, read_i16, visit_short);
static_kind!(IntKind, Int, "INT", "TAG_Int", 4, 12, read_i32, visit_int);
static_kind!(LongKind, Long, "LONG", "TAG_Long", 8, 16, read_i64, visit_long);
static_kind!(FloatKind, Float, "FLOAT", "TAG_Float", 4, 12, read_f32, visit_float);
static_kind!(DoubleKind, Double, "DOUBLE", "TAG_Double", 8, 16, read_f64, visit_double);

// Primitive arrays: 24 bytes of header plus `width` per element.
macro_rules! array_kind {
    ($kind:ident, $ty:ident, $elem:ty, $name:literal, $pretty:literal, $width:literal, $read:ident, $visit:ident) => {
        struct $kind;

        impl $kind {
            fn read_values(r: &mut dyn Read, acc: &mut Accounter) -> Result<Vec<$elem>> {
                acc.account_bytes(24)?;
                let len = read_len(r)?;
                acc.account_bytes_each($width, len as u64)?;
                let mut values = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    values.push($read(r)?);
                }
                Ok(values)
            }
        }

        impl TagKind for $kind {
            fn tag_type(&self) -> Option<TagType> {
                Some(TagType::$ty)
            }

            fn name(&self) -> &'static str {
                $name
            }

            fn pretty_name(&self) -> &'static str {
                $pretty
            }

            fn load(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag> {
                Ok(Tag::$ty(Self::read_values(r, acc)?))
            }

            fn parse(
                &self,
                r: &mut dyn Read,
                visitor: &mut dyn StreamVisitor,
                acc: &mut Accounter,
            ) -> Result<ValueResult> {
                let values = Self::read_values(r, acc)?;
                Ok(visitor.$visit(&values))
            }

            fn skip(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
                acc.account_bytes(24)?;
                let len = read_len(r)?;
                acc.account_bytes_each($width, len as u64)?;
                skip_bytes(r, $width * len as u64)
            }
        }
    };
}

array_kind!(ByteArrayKind, ByteArray, i8, "BYTE[]", "TAG_Byte_Array", 1, read_i8, visit_byte_array);
array_kind!(IntArrayKind, IntArray, i32, "INT[]", "TAG_Int_Array", 4, read_i32, visit_int_array);
array_kind!(LongArrayKind, LongArray, i64, "LONG[]", "TAG_Long_Array", 8, read_i64, visit_long_array);

struct StringKind;

impl StringKind {
    fn read(r: &mut dyn Read, acc: &mut Accounter) -> Result<String> {
        let s = read_string(r)?;
        acc.account_string(crate::tag::utf16_len(&s))?;
        Ok(s)
    }
}

impl TagKind for StringKind {
    fn tag_type(&self) -> Option<TagType> {
        Some(TagType::String)
    }

    fn name(&self) -> &'static str {
        "STRING"
    }

    fn pretty_name(&self) -> &'static str {
        "TAG_String"
    }

    fn load(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag> {
        Ok(Tag::String(Self::read(r, acc)?))
    }

    fn parse(
        &self,
        r: &mut dyn Read,
        visitor: &mut dyn StreamVisitor,
        acc: &mut Accounter,
    ) -> Result<ValueResult> {
        let s = Self::read(r, acc)?;
        Ok(visitor.visit_string(&s))
    }

    fn skip(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
        let units = skip_string(r)?;
        acc.account_string(units)
    }
}

struct ListKind;

impl ListKind {
    /// Reads the list header, charging the fixed and per-element costs.
    fn read_header(
        r: &mut dyn Read,
        acc: &mut Accounter,
    ) -> Result<(TagType, &'static dyn TagKind, usize)> {
        acc.account_bytes(37)?;
        let id = read_u8(r)?;
        let len = read_len(r)?;
        let (ty, kind) = valid_kind(id)?;
        if ty == TagType::End && len > 0 {
            return Err(Error::malformed(format!(
                "missing element type on list of length {}",
                len
            )));
        }
        acc.account_bytes_each(4, len as u64)?;
        Ok((ty, kind, len))
    }
}

impl TagKind for ListKind {
    fn tag_type(&self) -> Option<TagType> {
        Some(TagType::List)
    }

    fn name(&self) -> &'static str {
        "LIST"
    }

    fn pretty_name(&self) -> &'static str {
        "TAG_List"
    }

    fn load(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag> {
        acc.with_depth(|acc| {
            let (ty, kind, len) = Self::read_header(r, acc)?;
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                let item = kind.load(r, acc)?;
                items.push(match item {
                    Tag::Compound(c) if ty == TagType::Compound => unbox_element(c),
                    other => other,
                });
            }
            Ok(Tag::List(items))
        })
    }

    fn parse(
        &self,
        r: &mut dyn Read,
        visitor: &mut dyn StreamVisitor,
        acc: &mut Accounter,
    ) -> Result<ValueResult> {
        acc.with_depth(|acc| {
            let (ty, kind, len) = Self::read_header(r, acc)?;
            match visitor.visit_list(ty, len) {
                ValueResult::Halt => return Ok(ValueResult::Halt),
                ValueResult::Break => {
                    kind.skip_many(r, len, acc)?;
                    return Ok(visitor.visit_container_end());
                }
                ValueResult::Continue => {}
            }

            let mut index = 0;
            while index < len {
                match visitor.visit_element(ty, index) {
                    EntryResult::Halt => return Ok(ValueResult::Halt),
                    EntryResult::Break => {
                        kind.skip(r, acc)?;
                        break;
                    }
                    EntryResult::Skip => kind.skip(r, acc)?,
                    EntryResult::Enter => match kind.parse(r, visitor, acc)? {
                        ValueResult::Halt => return Ok(ValueResult::Halt),
                        ValueResult::Break => break,
                        ValueResult::Continue => {}
                    },
                }
                index += 1;
            }

            if index < len {
                kind.skip_many(r, len - 1 - index, acc)?;
            }
            Ok(visitor.visit_container_end())
        })
    }

    fn skip(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
        acc.with_depth(|acc| {
            let (_, kind, len) = Self::read_header(r, acc)?;
            kind.skip_many(r, len, acc)
        })
    }
}

struct CompoundKind;

impl CompoundKind {
    /// Skips the name and payload of an entry whose type id was already read.
    fn skip_entry(r: &mut dyn Read, kind: &dyn TagKind, acc: &mut Accounter) -> Result<()> {
        skip_name(r, acc)?;
        acc.account_bytes(36)?;
        kind.skip(r, acc)
    }

    /// Skips entries up to and including the terminator.
    fn skip_remaining(r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
        loop {
            let id = read_u8(r)?;
            if id == 0 {
                return Ok(());
            }
            let (_, kind) = valid_kind(id)?;
            Self::skip_entry(r, kind, acc)?;
        }
    }
}

impl TagKind for CompoundKind {
    fn tag_type(&self) -> Option<TagType> {
        Some(TagType::Compound)
    }

    fn name(&self) -> &'static str {
        "COMPOUND"
    }

    fn pretty_name(&self) -> &'static str {
        "TAG_Compound"
    }

    fn load(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<Tag> {
        acc.with_depth(|acc| {
            acc.account_bytes(48)?;
            let mut compound = Compound::new();
            loop {
                let id = read_u8(r)?;
                if id == 0 {
                    break;
                }
                let (_, kind) = valid_kind(id)?;
                let name = read_name(r, acc)?;
                acc.account_bytes(36)?;
                let value = kind.load(r, acc)?;
                compound.insert(name, value);
            }
            Ok(Tag::Compound(compound))
        })
    }

    fn parse(
        &self,
        r: &mut dyn Read,
        visitor: &mut dyn StreamVisitor,
        acc: &mut Accounter,
    ) -> Result<ValueResult> {
        acc.with_depth(|acc| {
            acc.account_bytes(48)?;
            loop {
                let id = read_u8(r)?;
                if id == 0 {
                    return Ok(visitor.visit_container_end());
                }
                let (ty, kind) = valid_kind(id)?;

                match visitor.visit_entry(ty) {
                    EntryResult::Halt => return Ok(ValueResult::Halt),
                    EntryResult::Break => {
                        Self::skip_entry(r, kind, acc)?;
                        break;
                    }
                    EntryResult::Skip => {
                        Self::skip_entry(r, kind, acc)?;
                        continue;
                    }
                    EntryResult::Enter => {}
                }

                let name = read_name(r, acc)?;
                acc.account_bytes(36)?;
                match visitor.visit_entry_named(ty, &name) {
                    EntryResult::Halt => return Ok(ValueResult::Halt),
                    EntryResult::Break => {
                        kind.skip(r, acc)?;
                        break;
                    }
                    EntryResult::Skip => kind.skip(r, acc)?,
                    EntryResult::Enter => match kind.parse(r, visitor, acc)? {
                        ValueResult::Halt => return Ok(ValueResult::Halt),
                        ValueResult::Break => break,
                        ValueResult::Continue => {}
                    },
                }
            }

            Self::skip_remaining(r, acc)?;
            Ok(visitor.visit_container_end())
        })
    }

    fn skip(&self, r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
        acc.with_depth(|acc| {
            acc.account_bytes(48)?;
            Self::skip_remaining(r, acc)
        })
    }
}
