//! # serde_nbt
//!
//! Named binary tags (NBT): a tree-structured binary format of typed values,
//! with a human-readable text form (SNBT).
//!
//! ## Key Features
//!
//! - **Binary codec**: big-endian wire format, raw or gzip framed, from streams or paths
//! - **Resource accounting**: every decode is charged against a byte quota and a depth limit,
//!   so hostile input cannot exhaust memory or the stack
//! - **Streaming decode**: a [`StreamVisitor`] sees the input as it is read and can skip
//!   subtrees without materializing them
//! - **SNBT**: a parser generic over [`DynamicOps`] and three printers (compact, pretty, styled)
//! - **Serde compatible**: any `T: Serialize` converts to a [`Tag`] and back
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_nbt::{from_snbt, io, nbt, to_snbt, Accounter};
//!
//! let tag = nbt!({ "name": "Steve", "pos": [I; 1, 64, -3] });
//! let compound = tag.as_compound().unwrap();
//!
//! let mut bytes = Vec::new();
//! io::write_compound(&mut bytes, compound).unwrap();
//! let back = io::read_compound(&bytes[..], &mut Accounter::untrusted()).unwrap();
//! assert_eq!(&back, compound);
//!
//! let text = to_snbt(&tag);
//! assert_eq!(text, r#"{name:"Steve",pos:[I;1,64,-3]}"#);
//! assert_eq!(from_snbt(&text).unwrap(), tag);
//! ```
//!
//! ### Partial reads
//!
//! ```rust
//! use serde_nbt::{io, nbt, Accounter, CollectFields, FieldSelector, TagType};
//!
//! let tag = nbt!({ "DataVersion": 3465i32, "blocks": [I; 1, 2, 3] });
//! let mut bytes = Vec::new();
//! io::write_compound(&mut bytes, tag.as_compound().unwrap()).unwrap();
//!
//! let mut fields = CollectFields::new(vec![FieldSelector::new(TagType::Int, "DataVersion")]);
//! io::parse(&bytes[..], &mut fields, &mut Accounter::untrusted()).unwrap();
//! let found = fields.into_result().unwrap();
//! assert_eq!(found.as_compound().unwrap().get_int("DataVersion"), Some(3465));
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_nbt::{from_bytes, to_bytes};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Item {
//!     id: String,
//!     count: i8,
//! }
//!
//! let item = Item { id: "stone".to_string(), count: 64 };
//! let bytes = to_bytes(&item).unwrap();
//! let back: Item = from_bytes(&bytes).unwrap();
//! assert_eq!(item, back);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Decoding never recurses deeper than [`accounter::MAX_DEPTH`]
//! - No panics in public API; malformed input is reported through [`Error`]
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`inspect.rs`** - Print a file with the styled printer
//! - **`find_key.rs`** - Probe the root of a file for a key without decoding it
//! - **`snbt_roundtrip.rs`** - SNBT to binary and back
//!
//! Run any example with: `cargo run --example <name>`

pub mod accounter;
pub mod compare;
pub mod compound;
pub mod de;
pub mod error;
pub mod io;
pub mod macros;
pub mod mutf8;
pub mod ops;
pub mod options;
pub mod parser;
pub mod printer;
pub mod ser;
pub mod stream;
pub mod tag;
pub mod types;
pub mod visitor;

pub use accounter::Accounter;
pub use compare::compare_tags;
pub use compound::Compound;
pub use de::{from_tag, TagDeserializer};
pub use error::{Error, ErrorKey, ParseError, Result};
pub use ops::{convert_tag, convert_to_tag, DynamicOps, TagOps};
pub use options::{Compression, PrettyOptions, StyledOptions};
pub use parser::{from_snbt, parse_snbt};
pub use printer::{
    to_snbt, to_snbt_pretty, to_snbt_pretty_with_options, to_styled, PrettyPrinter, Style,
    StyledPrinter, StyledText,
};
pub use ser::{to_tag, TagSerializer};
pub use stream::{
    CollectFields, CollectToTag, EntryResult, FieldSelector, SkipAll, StreamVisitor, ValueResult,
};
pub use tag::{box_element, list_element_type, unbox_element, Number, Tag, TagType};
pub use visitor::TagVisitor;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

/// Serialize any `T: Serialize` to the binary format, as an unnamed root.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::to_bytes;
///
/// assert_eq!(to_bytes(&7i16).unwrap(), vec![2, 0, 0, 0, 7]);
/// ```
///
/// # Errors
///
/// Returns an error if the value has no tag representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut bytes = Vec::new();
    to_writer(&mut bytes, value)?;
    Ok(bytes)
}

/// Serialize any `T: Serialize` to a writer in the binary format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    let tag = to_tag(value)?;
    io::write_tag(writer, "", &tag)
}

/// Deserialize an instance of type `T` from binary data.
///
/// The input is charged against a [`Accounter::trusted`] quota.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid tag or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_bytes<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_reader(v, &mut Accounter::trusted())
}

/// Deserialize an instance of type `T` from an I/O stream of binary data.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{from_reader, Accounter};
/// use std::io::Cursor;
///
/// let bytes = [3u8, 0, 0, 0, 0, 0, 42];
/// let n: i32 = from_reader(Cursor::new(bytes), &mut Accounter::untrusted()).unwrap();
/// assert_eq!(n, 42);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the accounter rejects the input, or the data
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R, acc: &mut Accounter) -> Result<T>
where
    R: Read,
    T: DeserializeOwned,
{
    let (_, tag) = io::read_tag(reader, acc)?;
    from_tag(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        nickname: Option<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let bytes = to_bytes(&point).unwrap();
        let point_back: Point = from_bytes(&bytes).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
            nickname: None,
        };

        let bytes = to_bytes(&user).unwrap();
        let user_back: User = from_bytes(&bytes).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_to_tag_shape() {
        let point = Point { x: 1, y: 2 };
        let tag = to_tag(&point).unwrap();
        let compound = tag.as_compound().unwrap();
        assert_eq!(compound.get("x"), Some(&Tag::Int(1)));
        assert_eq!(compound.get("y"), Some(&Tag::Int(2)));
    }

    #[test]
    fn test_through_snbt() {
        let numbers = vec![1i64, 2, 3];
        let text = to_snbt(&to_tag(&numbers).unwrap());
        assert_eq!(text, "[1L,2L,3L]");
        let numbers_back: Vec<i64> = from_tag(from_snbt(&text).unwrap()).unwrap();
        assert_eq!(numbers, numbers_back);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(from_bytes::<Point>(&[10, 0]).is_err());
        assert!(from_bytes::<Point>(&[99]).is_err());
    }
}
