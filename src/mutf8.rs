//! Modified UTF-8, the string encoding of the binary format.
//!
//! It differs from standard UTF-8 in two ways: the NUL character is written as
//! the two bytes `C0 80`, and characters outside the basic multilingual plane
//! are written as two three-byte surrogate halves instead of one four-byte
//! sequence.

use crate::{Error, Result};

/// Number of bytes `s` occupies once encoded.
#[must_use]
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

#[inline]
fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Encodes a string.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::mutf8;
///
/// assert_eq!(mutf8::encode("a\0"), vec![b'a', 0xC0, 0x80]);
/// assert_eq!(mutf8::encode("😀").len(), 6);
/// ```
#[must_use]
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(s));
    for unit in s.encode_utf16() {
        match unit_len(unit) {
            1 => out.push(unit as u8),
            2 => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

/// Decodes a byte sequence.
///
/// # Errors
///
/// Returns [`Error::Malformed`] on truncated sequences, invalid lead bytes or
/// unpaired surrogates.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        let unit = if b0 & 0x80 == 0 {
            i += 1;
            u16::from(b0)
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, i + 1)?;
            i += 2;
            (u16::from(b0 & 0x1F) << 6) | b1
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(bytes, i + 1)?;
            let b2 = continuation(bytes, i + 2)?;
            i += 3;
            (u16::from(b0 & 0x0F) << 12) | (b1 << 6) | b2
        } else {
            return Err(Error::malformed(format!(
                "invalid modified UTF-8 lead byte 0x{:02X} at offset {}",
                b0, i
            )));
        };
        units.push(unit);
    }
    String::from_utf16(&units).map_err(|_| Error::malformed("unpaired surrogate in string"))
}

fn continuation(bytes: &[u8], at: usize) -> Result<u16> {
    match bytes.get(at) {
        Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
        Some(b) => Err(Error::malformed(format!(
            "invalid modified UTF-8 continuation byte 0x{:02X} at offset {}",
            b, at
        ))),
        None => Err(Error::malformed("truncated modified UTF-8 sequence")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_unchanged() {
        assert_eq!(encode("hello"), b"hello".to_vec());
        assert_eq!(decode(b"hello").unwrap(), "hello");
    }

    #[test]
    fn test_nul_and_supplementary() {
        let s = "a\0b😀é";
        let bytes = encode(s);
        assert_eq!(bytes.len(), encoded_len(s));
        assert!(!bytes.contains(&0));
        assert_eq!(decode(&bytes).unwrap(), s);
    }

    #[test]
    fn test_rejects_truncated() {
        assert!(decode(&[0xE0, 0x80]).is_err());
        assert!(decode(&[0xF0, 0x9F, 0x98, 0x80]).is_err());
    }
}
