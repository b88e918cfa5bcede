//! Binary codec: reading and writing tag trees in the wire format.
//!
//! A stream holds one root tag: a type id byte, then (unless the type is
//! [`TagType::End`]) a name and the payload. All integers are big-endian.
//! Strings and names carry a 16-bit byte length followed by
//! [modified UTF-8](crate::mutf8).
//!
//! ## Entry points
//!
//! - [`write_tag`], [`write_compound`], [`write_compressed`], [`write_file`]
//! - [`read_tag`], [`read_compound`], [`read_compressed`], [`read_file`]
//! - [`parse`], [`parse_compressed`]: stream the input through a [`StreamVisitor`]
//! - [`contains_root_key`]: check for a root key without decoding the rest
//!
//! ```rust
//! use serde_nbt::{io, Accounter, Compound};
//!
//! let mut root = Compound::new();
//! root.insert("a", 1i32);
//! root.insert("b", "x");
//!
//! let mut bytes = Vec::new();
//! io::write_compound(&mut bytes, &root).unwrap();
//! assert_eq!(bytes.len(), 19);
//!
//! let mut acc = Accounter::unlimited();
//! let back = io::read_compound(&mut bytes.as_slice(), &mut acc).unwrap();
//! assert_eq!(back, root);
//! assert_eq!(acc.usage(), 230);
//! ```

use crate::accounter::Accounter;
use crate::mutf8;
use crate::options::Compression;
use crate::stream::{EntryResult, StreamVisitor, ValueResult};
use crate::tag::{list_element_type, needs_box, utf16_len, Tag, TagType};
use crate::types::valid_kind;
use crate::{Compound, Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Writes a named root tag.
pub fn write_tag<W: Write>(mut w: W, name: &str, tag: &Tag) -> Result<()> {
    let w: &mut dyn Write = &mut w;
    w.write_all(&[tag.id()])?;
    if tag.tag_type() != TagType::End {
        write_string(w, name)?;
        write_payload(w, tag)?;
    }
    Ok(())
}

/// Writes a compound as the root, with an empty name.
pub fn write_compound<W: Write>(mut w: W, compound: &Compound) -> Result<()> {
    let w: &mut dyn Write = &mut w;
    w.write_all(&[TagType::Compound.id()])?;
    write_string(w, "")?;
    write_compound_payload(w, compound)
}

/// Writes a compound root through a gzip encoder.
pub fn write_compressed<W: Write>(w: W, compound: &Compound) -> Result<()> {
    let mut encoder = GzEncoder::new(w, flate2::Compression::default());
    write_compound(&mut encoder, compound)?;
    encoder.finish()?;
    Ok(())
}

/// Reads a named root tag of any type.
///
/// An [`TagType::End`] root has no name and decodes as `("", Tag::End)`.
/// The root name is not charged to the accounter.
///
/// # Errors
///
/// Decode failures other than quota and depth violations are wrapped in
/// [`Error::Load`] naming the root type.
pub fn read_tag<R: Read>(mut r: R, acc: &mut Accounter) -> Result<(String, Tag)> {
    let r: &mut dyn Read = &mut r;
    let id = read_u8(r)?;
    let (ty, kind) = valid_kind(id)?;
    if ty == TagType::End {
        return Ok((String::new(), Tag::End));
    }
    let name = read_string(r)?;
    let tag = kind
        .load(r, acc)
        .map_err(|e| e.while_loading(kind.pretty_name()))?;
    Ok((name, tag))
}

/// Reads a root that must be a compound.
///
/// # Errors
///
/// Returns [`Error::RootNotCompound`] when the root has another type.
pub fn read_compound<R: Read>(r: R, acc: &mut Accounter) -> Result<Compound> {
    match read_tag(r, acc)? {
        (_, Tag::Compound(c)) => Ok(c),
        (_, other) => Err(Error::RootNotCompound {
            found: other.tag_type().pretty_name(),
        }),
    }
}

/// Reads a gzip-compressed compound root.
pub fn read_compressed<R: Read>(r: R, acc: &mut Accounter) -> Result<Compound> {
    read_compound(BufReader::new(GzDecoder::new(r)), acc)
}

/// Streams the root of `r` through `visitor`.
///
/// The root name is consumed but not reported.
pub fn parse<R: Read>(mut r: R, visitor: &mut dyn StreamVisitor, acc: &mut Accounter) -> Result<()> {
    let r: &mut dyn Read = &mut r;
    let id = read_u8(r)?;
    let (ty, kind) = valid_kind(id)?;
    if ty == TagType::End {
        if visitor.visit_root_entry(TagType::End) == ValueResult::Continue {
            visitor.visit_end();
        }
        return Ok(());
    }
    match visitor.visit_root_entry(ty) {
        ValueResult::Halt => Ok(()),
        ValueResult::Break => {
            skip_string(r)?;
            kind.skip(r, acc)
                .map_err(|e| e.while_loading(kind.pretty_name()))
        }
        ValueResult::Continue => {
            skip_string(r)?;
            kind.parse(r, visitor, acc)
                .map(|_| ())
                .map_err(|e| e.while_loading(kind.pretty_name()))
        }
    }
}

/// Streams a gzip-compressed root through `visitor`.
pub fn parse_compressed<R: Read>(
    r: R,
    visitor: &mut dyn StreamVisitor,
    acc: &mut Accounter,
) -> Result<()> {
    parse(BufReader::new(GzDecoder::new(r)), visitor, acc)
}

struct RootKeyProbe<'a> {
    key: &'a str,
    found: bool,
}

impl StreamVisitor for RootKeyProbe<'_> {
    fn visit_root_entry(&mut self, ty: TagType) -> ValueResult {
        if ty == TagType::Compound {
            ValueResult::Continue
        } else {
            ValueResult::Halt
        }
    }

    fn visit_entry_named(&mut self, _ty: TagType, name: &str) -> EntryResult {
        if name == self.key {
            self.found = true;
            EntryResult::Halt
        } else {
            EntryResult::Skip
        }
    }
}

/// Returns `true` if the root compound has an entry named `key`.
///
/// Decoding stops as soon as the key is seen; entries before it are skipped,
/// not built.
pub fn contains_root_key<R: Read>(r: R, key: &str, acc: &mut Accounter) -> Result<bool> {
    let mut probe = RootKeyProbe { key, found: false };
    parse(r, &mut probe, acc)?;
    Ok(probe.found)
}

/// Reads a compound root from a file.
///
/// Gzip files are decoded with the [untrusted](Accounter::untrusted) quota,
/// raw files with the [trusted](Accounter::trusted) one.
pub fn read_file<P: AsRef<Path>>(path: P, compression: Compression) -> Result<Compound> {
    let mut acc = compression.default_accounter();
    read_file_with(path, compression, &mut acc)
}

/// Reads a compound root from a file with an explicit accounter.
pub fn read_file_with<P: AsRef<Path>>(
    path: P,
    compression: Compression,
    acc: &mut Accounter,
) -> Result<Compound> {
    let path = path.as_ref();
    log::debug!("reading {:?} tag file {}", compression, path.display());
    let file = BufReader::new(File::open(path)?);
    match compression {
        Compression::None => read_compound(file, acc),
        Compression::Gzip => read_compressed(file, acc),
    }
}

/// Writes a compound root to a file, replacing it.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    compound: &Compound,
    compression: Compression,
) -> Result<()> {
    let path = path.as_ref();
    log::debug!("writing {:?} tag file {}", compression, path.display());
    let mut file = BufWriter::new(File::create(path)?);
    match compression {
        Compression::None => write_compound(&mut file, compound)?,
        Compression::Gzip => write_compressed(&mut file, compound)?,
    }
    file.flush()?;
    Ok(())
}

pub(crate) fn write_payload(w: &mut dyn Write, tag: &Tag) -> Result<()> {
    match tag {
        Tag::End => {}
        Tag::Byte(v) => w.write_all(&v.to_be_bytes())?,
        Tag::Short(v) => w.write_all(&v.to_be_bytes())?,
        Tag::Int(v) => w.write_all(&v.to_be_bytes())?,
        Tag::Long(v) => w.write_all(&v.to_be_bytes())?,
        Tag::Float(v) => w.write_all(&v.to_be_bytes())?,
        Tag::Double(v) => w.write_all(&v.to_be_bytes())?,
        Tag::ByteArray(values) => {
            write_len(w, values.len())?;
            let bytes: Vec<u8> = values.iter().map(|b| *b as u8).collect();
            w.write_all(&bytes)?;
        }
        Tag::String(s) => write_string(w, s)?,
        Tag::List(items) => write_list_payload(w, items)?,
        Tag::Compound(c) => write_compound_payload(w, c)?,
        Tag::IntArray(values) => {
            write_len(w, values.len())?;
            for v in values {
                w.write_all(&v.to_be_bytes())?;
            }
        }
        Tag::LongArray(values) => {
            write_len(w, values.len())?;
            for v in values {
                w.write_all(&v.to_be_bytes())?;
            }
        }
    }
    Ok(())
}

fn write_list_payload(w: &mut dyn Write, items: &[Tag]) -> Result<()> {
    // End elements have no encoding inside a list.
    let items: Cow<'_, [Tag]> = if items.iter().any(|t| t.tag_type() == TagType::End) {
        log::warn!("dropping END elements from a list of {} elements", items.len());
        Cow::Owned(
            items
                .iter()
                .filter(|t| t.tag_type() != TagType::End)
                .cloned()
                .collect(),
        )
    } else {
        Cow::Borrowed(items)
    };

    let ty = list_element_type(&items);
    w.write_all(&[ty.id()])?;
    write_len(w, items.len())?;
    for item in items.iter() {
        if ty == TagType::Compound && needs_box(item) {
            // {"": item}
            w.write_all(&[item.id()])?;
            write_string(w, "")?;
            write_payload(w, item)?;
            w.write_all(&[TagType::End.id()])?;
        } else {
            write_payload(w, item)?;
        }
    }
    Ok(())
}

pub(crate) fn write_compound_payload(w: &mut dyn Write, compound: &Compound) -> Result<()> {
    for (key, value) in compound.iter() {
        if value.tag_type() == TagType::End {
            continue;
        }
        w.write_all(&[value.id()])?;
        write_string(w, key)?;
        write_payload(w, value)?;
    }
    w.write_all(&[TagType::End.id()])?;
    Ok(())
}

fn write_len(w: &mut dyn Write, len: usize) -> Result<()> {
    let len = i32::try_from(len)
        .map_err(|_| Error::malformed(format!("length {} does not fit the wire format", len)))?;
    w.write_all(&len.to_be_bytes())?;
    Ok(())
}

/// Writes a length-prefixed modified UTF-8 string. Strings too long for the
/// 16-bit prefix are written as the empty string.
pub(crate) fn write_string(w: &mut dyn Write, s: &str) -> Result<()> {
    let len = mutf8::encoded_len(s);
    let Ok(prefix) = u16::try_from(len) else {
        log::warn!(
            "string of {} encoded bytes exceeds the 65535 byte limit, writing an empty string",
            len
        );
        w.write_all(&0u16.to_be_bytes())?;
        return Ok(());
    };
    w.write_all(&prefix.to_be_bytes())?;
    w.write_all(&mutf8::encode(s))?;
    Ok(())
}

fn read_array<const N: usize>(r: &mut dyn Read) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub(crate) fn read_u8(r: &mut dyn Read) -> Result<u8> {
    Ok(read_array::<1>(r)?[0])
}

pub(crate) fn read_i8(r: &mut dyn Read) -> Result<i8> {
    Ok(i8::from_be_bytes(read_array(r)?))
}

pub(crate) fn read_i16(r: &mut dyn Read) -> Result<i16> {
    Ok(i16::from_be_bytes(read_array(r)?))
}

pub(crate) fn read_i32(r: &mut dyn Read) -> Result<i32> {
    Ok(i32::from_be_bytes(read_array(r)?))
}

pub(crate) fn read_i64(r: &mut dyn Read) -> Result<i64> {
    Ok(i64::from_be_bytes(read_array(r)?))
}

pub(crate) fn read_f32(r: &mut dyn Read) -> Result<f32> {
    Ok(f32::from_be_bytes(read_array(r)?))
}

pub(crate) fn read_f64(r: &mut dyn Read) -> Result<f64> {
    Ok(f64::from_be_bytes(read_array(r)?))
}

/// Reads a 4-byte element count.
pub(crate) fn read_len(r: &mut dyn Read) -> Result<usize> {
    let len = read_i32(r)?;
    usize::try_from(len).map_err(|_| Error::malformed(format!("negative length {}", len)))
}

fn read_string_bytes(r: &mut dyn Read) -> Result<Vec<u8>> {
    let len = u16::from_be_bytes(read_array(r)?);
    let mut buf = vec![0u8; usize::from(len)];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub(crate) fn read_string(r: &mut dyn Read) -> Result<String> {
    mutf8::decode(&read_string_bytes(r)?)
}

/// Skips a string, returning its length in UTF-16 code units.
pub(crate) fn skip_string(r: &mut dyn Read) -> Result<u64> {
    let bytes = read_string_bytes(r)?;
    // Every modified UTF-8 sequence encodes exactly one UTF-16 unit.
    Ok(bytes.iter().filter(|b| *b & 0xC0 != 0x80).count() as u64)
}

/// Reads a compound entry name, charging it.
pub(crate) fn read_name(r: &mut dyn Read, acc: &mut Accounter) -> Result<String> {
    let name = read_string(r)?;
    acc.account_bytes(28)?;
    acc.account_bytes_each(2, utf16_len(&name))?;
    Ok(name)
}

/// Skips a compound entry name, charging it as [`read_name`] would.
pub(crate) fn skip_name(r: &mut dyn Read, acc: &mut Accounter) -> Result<()> {
    let units = skip_string(r)?;
    acc.account_bytes(28)?;
    acc.account_bytes_each(2, units)
}

pub(crate) fn skip_bytes(r: &mut dyn Read, n: u64) -> Result<()> {
    let mut limited = Read::take(&mut *r, n);
    let copied = std::io::copy(&mut limited, &mut std::io::sink())?;
    if copied < n {
        return Err(Error::io("unexpected end of stream"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt;

    fn encode(tag: &Tag) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_tag(&mut bytes, "", tag).unwrap();
        bytes
    }

    #[test]
    fn test_known_encoding() {
        let tag = nbt!({ "a": 1i32 });
        assert_eq!(
            encode(&tag),
            vec![10, 0, 0, 3, 0, 1, b'a', 0, 0, 0, 1, 0]
        );
    }

    #[test]
    fn test_end_root() {
        let bytes = encode(&Tag::End);
        assert_eq!(bytes, vec![0]);
        let mut acc = Accounter::unlimited();
        assert_eq!(read_tag(bytes.as_slice(), &mut acc).unwrap(), (String::new(), Tag::End));
    }

    #[test]
    fn test_mixed_list_is_boxed() {
        let tag = Tag::List(vec![Tag::Int(1), Tag::from("x")]);
        let bytes = encode(&tag);
        assert_eq!(bytes[3], TagType::Compound.id());
        let mut acc = Accounter::unlimited();
        let (_, back) = read_tag(bytes.as_slice(), &mut acc).unwrap();
        assert_eq!(back, tag);
    }

    #[test]
    fn test_end_entries_are_omitted() {
        let mut c = Compound::new();
        c.insert("gone", Tag::End);
        c.insert("kept", 1i8);
        let mut bytes = Vec::new();
        write_compound(&mut bytes, &c).unwrap();
        let back = read_compound(bytes.as_slice(), &mut Accounter::unlimited()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.get_byte("kept"), Some(1));
    }

    #[test]
    fn test_oversized_string_is_written_empty() {
        let long = "é".repeat(40_000);
        let mut bytes = Vec::new();
        write_string(&mut bytes, &long).unwrap();
        assert_eq!(bytes, vec![0, 0]);
    }

    #[test]
    fn test_truncated_input_is_wrapped() {
        let bytes = encode(&nbt!({ "a": 1i32 }));
        let err = read_tag(&bytes[..8], &mut Accounter::unlimited()).unwrap_err();
        assert!(matches!(err, Error::Load { tag_type: "TAG_Compound", .. }));
        assert!(matches!(err.root_cause(), Error::Io(_)));
    }

    #[test]
    fn test_root_not_compound() {
        let bytes = encode(&Tag::Int(3));
        let err = read_compound(bytes.as_slice(), &mut Accounter::unlimited()).unwrap_err();
        assert!(matches!(err, Error::RootNotCompound { found: "TAG_Int" }));
    }

    #[test]
    fn test_contains_root_key() {
        let bytes = encode(&nbt!({ "first": [1i32, 2i32], "second": "x" }));
        let mut acc = Accounter::unlimited();
        assert!(contains_root_key(bytes.as_slice(), "second", &mut acc).unwrap());
        let mut acc = Accounter::unlimited();
        assert!(!contains_root_key(bytes.as_slice(), "third", &mut acc).unwrap());
    }

    #[test]
    fn test_skip_string_counts_units() {
        let mut bytes = Vec::new();
        write_string(&mut bytes, "a😀").unwrap();
        assert_eq!(skip_string(&mut bytes.as_slice()).unwrap(), 3);
    }
}
