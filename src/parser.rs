//! SNBT, the textual form of tag trees.
//!
//! A hand-written recursive descent parser with local backtracking. It builds
//! values through a [`DynamicOps`], so the same grammar produces [`Tag`]s
//! (via [`from_snbt`]) or any other representation (via [`parse_snbt`]).
//!
//! ## Grammar
//!
//! - compounds `{key: value, ...}` with bare or quoted keys
//! - lists `[value, ...]`, elements may have different types
//! - arrays `[B; 1, 2]`, `[I; ...]`, `[L; ...]` holding integer literals
//! - quoted strings with `'` or `"` and backslash escapes, including
//!   `\xHH`, `\uHHHH`, `\UHHHHHHHH` and `\N{UNICODE NAME}`
//! - numbers with an optional sign, `0x`/`0b` prefixes, `_` between digits,
//!   integer suffixes `b s i l` optionally preceded by `u` or `s` for
//!   (un)signed, and floats with suffixes `f d`
//! - bare words: `true`, `false`, strings, and calls `bool(x)` and `uuid("...")`
//!
//! Trailing commas are accepted. Failures carry a position and an
//! [`ErrorKey`].
//!
//! ```rust
//! use serde_nbt::{from_snbt, Tag};
//!
//! let tag = from_snbt("{count: 3b, name: 'Steve', pos: [I; 1, 2, 3]}").unwrap();
//! let compound = tag.as_compound().unwrap();
//! assert_eq!(compound.get_byte("count"), Some(3));
//! assert_eq!(compound.get("pos"), Some(&Tag::IntArray(vec![1, 2, 3])));
//! ```

use crate::error::{ErrorKey, ParseError};
use crate::ops::{DynamicOps, TagOps};
use crate::tag::{Number, Tag};
use num_bigint::BigInt;
use uuid::Uuid;

/// Maximum nesting of compounds and lists.
pub const MAX_DEPTH: usize = 512;

/// Parses SNBT into a [`Tag`].
///
/// # Errors
///
/// Returns [`Error::Syntax`](crate::Error::Syntax) with the position and kind
/// of the failure.
pub fn from_snbt(input: &str) -> crate::Result<Tag> {
    Ok(parse_snbt(&TagOps, input)?)
}

/// Parses SNBT into the representation of `ops`.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{parse_snbt, ErrorKey, TagOps};
///
/// let err = parse_snbt(&TagOps, "{a: 1} x").unwrap_err();
/// assert_eq!(err.key, ErrorKey::TrailingData);
/// assert_eq!(err.cursor, 7);
/// ```
pub fn parse_snbt<O: DynamicOps>(ops: &O, input: &str) -> Result<O::Value, ParseError> {
    let mut parser = Parser::new(ops, input);
    match parser.root() {
        Ok(value) => Ok(value),
        Err(Fail::Hard(err)) => Err(err),
        Err(Fail::Soft) => Err(parser.furthest_error()),
    }
}

enum Fail {
    /// No alternative matched here; the furthest position records why.
    Soft,
    /// A committed failure that no alternative can recover from.
    Hard(ParseError),
}

type PResult<T> = Result<T, Fail>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum IntType {
    Byte,
    Short,
    Int,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signedness {
    Signed,
    Unsigned,
}

#[derive(Debug)]
struct IntLiteral {
    start: usize,
    negative: bool,
    radix: u32,
    digits: String,
    signedness: Option<Signedness>,
    ty: Option<IntType>,
}

#[derive(Debug)]
enum NumberLiteral {
    Int(IntLiteral),
    Float {
        start: usize,
        text: String,
        double: bool,
    },
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

struct Parser<'a, O: DynamicOps> {
    ops: &'a O,
    input: &'a str,
    pos: usize,
    depth: usize,
    furthest: usize,
    expected: Vec<&'static str>,
}

impl<'a, O: DynamicOps> Parser<'a, O> {
    fn new(ops: &'a O, input: &'a str) -> Self {
        Parser {
            ops,
            input,
            pos: 0,
            depth: 0,
            furthest: 0,
            expected: Vec::new(),
        }
    }

    fn root(&mut self) -> PResult<O::Value> {
        self.skip_whitespace();
        let value = self.value()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.hard(self.pos, ErrorKey::TrailingData));
        }
        Ok(value)
    }

    fn furthest_error(&self) -> ParseError {
        let expected = self.expected.iter().map(|s| s.to_string()).collect();
        ParseError::at(self.input, self.furthest, ErrorKey::Expected, expected)
    }

    fn hard(&self, at: usize, key: ErrorKey) -> Fail {
        Fail::Hard(ParseError::at(self.input, at, key, Vec::new()))
    }

    /// Records that `what` would have been accepted at the current position.
    fn expect(&mut self, what: &'static str) -> Fail {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest && !self.expected.contains(&what) {
            self.expected.push(what);
        }
        Fail::Soft
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn value(&mut self) -> PResult<O::Value> {
        match self.peek() {
            Some('{') => self.compound(),
            Some('[') => self.list_or_array(),
            Some('"') | Some('\'') => {
                let s = self.quoted_string()?;
                Ok(self.ops.create_string(&s))
            }
            Some(_) => self.literal(),
            None => Err(self.expect("value")),
        }
    }

    fn enter(&mut self, at: usize) -> PResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.hard(at, ErrorKey::MaxDepth));
        }
        self.depth += 1;
        Ok(())
    }

    fn compound(&mut self) -> PResult<O::Value> {
        let start = self.pos;
        self.enter(start)?;
        self.bump();
        self.skip_whitespace();
        let mut entries = Vec::new();
        if !self.eat('}') {
            loop {
                let key_start = self.pos;
                let key = self.key()?;
                if key.is_empty() {
                    return Err(self.hard(key_start, ErrorKey::EmptyKey));
                }
                self.skip_whitespace();
                if !self.eat(':') {
                    return Err(self.expect("':'"));
                }
                self.skip_whitespace();
                let value = self.value()?;
                entries.push((key, value));
                self.skip_whitespace();
                if self.eat(',') {
                    self.skip_whitespace();
                    if self.eat('}') {
                        break;
                    }
                } else if self.eat('}') {
                    break;
                } else {
                    self.expect("','");
                    return Err(self.expect("'}'"));
                }
            }
        }
        self.depth -= 1;
        Ok(self.ops.create_map(entries))
    }

    fn key(&mut self) -> PResult<String> {
        match self.peek() {
            Some('"') | Some('\'') => self.quoted_string(),
            _ => {
                let word = self.word();
                if word.is_empty() {
                    return Err(self.expect("key"));
                }
                Ok(word.to_string())
            }
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_word_char(c) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn list_or_array(&mut self) -> PResult<O::Value> {
        let start = self.pos;
        self.enter(start)?;
        self.bump();

        let array_type = match (self.peek(), self.peek_at(1)) {
            (Some('B' | 'b'), Some(';')) => Some(IntType::Byte),
            (Some('I' | 'i'), Some(';')) => Some(IntType::Int),
            (Some('L' | 'l'), Some(';')) => Some(IntType::Long),
            _ => None,
        };
        let value = match array_type {
            Some(ty) => {
                self.pos += 2;
                self.array(ty)?
            }
            None => self.list()?,
        };
        self.depth -= 1;
        Ok(value)
    }

    fn list(&mut self) -> PResult<O::Value> {
        self.skip_whitespace();
        let mut items = Vec::new();
        if !self.eat(']') {
            loop {
                items.push(self.value()?);
                self.skip_whitespace();
                if self.eat(',') {
                    self.skip_whitespace();
                    if self.eat(']') {
                        break;
                    }
                } else if self.eat(']') {
                    break;
                } else {
                    self.expect("','");
                    return Err(self.expect("']'"));
                }
            }
        }
        Ok(self.ops.create_list(items))
    }

    fn array(&mut self, ty: IntType) -> PResult<O::Value> {
        self.skip_whitespace();
        let mut values = Vec::new();
        if !self.eat(']') {
            loop {
                values.push(self.array_element(ty)?);
                self.skip_whitespace();
                if self.eat(',') {
                    self.skip_whitespace();
                    if self.eat(']') {
                        break;
                    }
                } else if self.eat(']') {
                    break;
                } else {
                    self.expect("','");
                    return Err(self.expect("']'"));
                }
            }
        }
        Ok(match ty {
            IntType::Byte => self
                .ops
                .create_byte_list(values.into_iter().map(|v| v as i8).collect()),
            IntType::Int => self
                .ops
                .create_int_list(values.into_iter().map(|v| v as i32).collect()),
            _ => self.ops.create_long_list(values),
        })
    }

    /// Parses an integer literal no wider than the array type. Narrower
    /// unsigned literals are zero-extended, signed ones sign-extended.
    fn array_element(&mut self, array_type: IntType) -> PResult<i64> {
        let start = self.pos;
        let literal = match self.number() {
            Ok(NumberLiteral::Int(literal)) => literal,
            Ok(NumberLiteral::Float { .. }) | Err(Fail::Soft) => {
                return Err(self.hard(start, ErrorKey::InvalidArrayElementType));
            }
            Err(hard) => return Err(hard),
        };
        if literal.ty.map_or(false, |ty| ty > array_type) {
            return Err(self.hard(start, ErrorKey::InvalidArrayElementType));
        }
        let number = self.int_number(&literal, array_type)?;
        if literal.ty.map_or(false, |ty| ty < array_type)
            && self.signedness(&literal) == Signedness::Unsigned
        {
            return Ok(match number {
                Number::Byte(v) => i64::from(v as u8),
                Number::Short(v) => i64::from(v as u16),
                Number::Int(v) => i64::from(v as u32),
                other => other.as_i64(),
            });
        }
        Ok(number.as_i64())
    }

    fn signedness(&self, literal: &IntLiteral) -> Signedness {
        literal.signedness.unwrap_or(if literal.radix == 10 || literal.negative {
            Signedness::Signed
        } else {
            Signedness::Unsigned
        })
    }

    fn literal(&mut self) -> PResult<O::Value> {
        let start = self.pos;
        match self.number() {
            Ok(NumberLiteral::Int(literal)) => {
                let number = self.int_number(&literal, IntType::Int)?;
                return Ok(self.ops.create_number(number));
            }
            Ok(NumberLiteral::Float {
                start,
                text,
                double,
            }) => {
                let number = self.float_number(start, &text, double)?;
                return Ok(self.ops.create_number(number));
            }
            Err(Fail::Soft) => self.pos = start,
            Err(hard) => return Err(hard),
        }

        let word = self.word();
        let Some(first) = word.chars().next() else {
            return Err(self.expect("value"));
        };
        if first.is_ascii_digit() || matches!(first, '+' | '-' | '.') {
            return Err(self.hard(start, ErrorKey::InvalidUnquotedStart));
        }

        let after_word = self.pos;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            return self.call(word, start);
        }
        self.pos = after_word;

        if word.eq_ignore_ascii_case("true") {
            Ok(self.ops.create_bool(true))
        } else if word.eq_ignore_ascii_case("false") {
            Ok(self.ops.create_bool(false))
        } else {
            Ok(self.ops.create_string(word))
        }
    }

    fn call(&mut self, name: &str, start: usize) -> PResult<O::Value> {
        self.bump();
        self.skip_whitespace();
        let mut args = Vec::new();
        if !self.eat(')') {
            loop {
                args.push(self.value()?);
                self.skip_whitespace();
                if self.eat(',') {
                    self.skip_whitespace();
                    if self.eat(')') {
                        break;
                    }
                } else if self.eat(')') {
                    break;
                } else {
                    self.expect("','");
                    return Err(self.expect("')'"));
                }
            }
        }

        let expected_args = match name {
            "bool" | "uuid" => 1,
            _ => {
                return Err(self.hard(start, ErrorKey::NoSuchOperation(name.to_string())));
            }
        };
        if args.len() != expected_args {
            return Err(self.hard(
                start,
                ErrorKey::IncorrectArgumentCount {
                    name: name.to_string(),
                    expected: expected_args,
                },
            ));
        }

        let arg = &args[0];
        if name == "bool" {
            match self.ops.get_bool(arg) {
                Some(b) => Ok(self.ops.create_bool(b)),
                None => Err(self.hard(start, ErrorKey::ExpectedNumberOrBoolean)),
            }
        } else {
            let uuid = self
                .ops
                .get_string(arg)
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| self.hard(start, ErrorKey::ExpectedUuid))?;
            match Tag::from_uuid(uuid) {
                Tag::IntArray(ints) => Ok(self.ops.create_int_list(ints)),
                _ => Err(self.hard(start, ErrorKey::ExpectedUuid)),
            }
        }
    }

    /// Scans a number literal without checking its range. Fails softly when
    /// the text is not a number or runs into a word character.
    fn number(&mut self) -> PResult<NumberLiteral> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let radix = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some('0'), Some('x' | 'X'), Some(c)) if c.is_ascii_hexdigit() || c == '_' => 16,
            (Some('0'), Some('b' | 'B'), Some('0' | '1' | '_')) => 2,
            _ => 10,
        };

        let literal = if radix != 10 {
            self.pos += 2;
            let digits = self.digits(radix)?;
            let (signedness, ty) = self.int_suffix();
            NumberLiteral::Int(IntLiteral {
                start,
                negative,
                radix,
                digits,
                signedness,
                ty,
            })
        } else {
            self.decimal(start, negative)?
        };

        if self.peek().map_or(false, is_word_char) {
            self.pos = start;
            return Err(self.expect("number"));
        }
        Ok(literal)
    }

    fn decimal(&mut self, start: usize, negative: bool) -> PResult<NumberLiteral> {
        let int_digits = if self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.digits(10)?
        } else {
            String::new()
        };

        let mut fraction = None;
        if self.peek() == Some('.') {
            let next_is_digit = self.peek_at(1).map_or(false, |c| c.is_ascii_digit());
            if !int_digits.is_empty() || next_is_digit {
                self.pos += 1;
                fraction = Some(if next_is_digit {
                    self.digits(10)?
                } else {
                    String::new()
                });
            }
        }

        if int_digits.is_empty() && fraction.is_none() {
            self.pos = start;
            return Err(self.expect("number"));
        }

        let mut exponent = None;
        if matches!(self.peek(), Some('e' | 'E')) {
            let (sign, digit_at) = match self.peek_at(1) {
                Some(c @ ('+' | '-')) => (Some(c), 2),
                _ => (None, 1),
            };
            if self.peek_at(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                self.pos += digit_at;
                let digits = self.digits(10)?;
                exponent = Some(format!("{}{}", sign.unwrap_or('+'), digits));
            }
        }

        let is_float = fraction.is_some() || exponent.is_some();
        if !is_float {
            let (signedness, ty) = self.int_suffix();
            if ty.is_some() {
                return Ok(NumberLiteral::Int(IntLiteral {
                    start,
                    negative,
                    radix: 10,
                    digits: int_digits,
                    signedness,
                    ty,
                }));
            }
        }

        let double = match self.peek() {
            Some('f' | 'F') => {
                self.pos += 1;
                false
            }
            Some('d' | 'D') => {
                self.pos += 1;
                true
            }
            _ if is_float => true,
            _ => {
                return Ok(NumberLiteral::Int(IntLiteral {
                    start,
                    negative,
                    radix: 10,
                    digits: int_digits,
                    signedness: None,
                    ty: None,
                }));
            }
        };

        let mut text = String::new();
        if negative {
            text.push('-');
        }
        text.push_str(if int_digits.is_empty() { "0" } else { &int_digits });
        if let Some(fraction) = fraction {
            text.push('.');
            text.push_str(&fraction);
        }
        if let Some(exponent) = exponent {
            text.push('e');
            text.push_str(&exponent);
        }
        Ok(NumberLiteral::Float {
            start,
            text,
            double,
        })
    }

    /// Reads a run of digits and underscores, returning the digits only.
    /// Underscores must sit between digits.
    fn digits(&mut self, radix: u32) -> PResult<String> {
        if self.peek() == Some('_') {
            return Err(self.hard(self.pos, ErrorKey::UnderscoreNotAllowed));
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_digit(radix) || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let run = &self.input[start..self.pos];
        if run.ends_with('_') {
            return Err(self.hard(self.pos - 1, ErrorKey::UnderscoreNotAllowed));
        }
        Ok(run.chars().filter(|c| *c != '_').collect())
    }

    /// Reads an optional `[us]?[bsil]` suffix. A lone `s` is the short type.
    fn int_suffix(&mut self) -> (Option<Signedness>, Option<IntType>) {
        let save = self.pos;
        let signedness = match self.peek() {
            Some('u' | 'U') => Some(Signedness::Unsigned),
            Some('s' | 'S') => Some(Signedness::Signed),
            _ => None,
        };
        if signedness.is_some() {
            self.pos += 1;
        }
        let ty = match self.peek() {
            Some('b' | 'B') => Some(IntType::Byte),
            Some('s' | 'S') => Some(IntType::Short),
            Some('i' | 'I') => Some(IntType::Int),
            Some('l' | 'L') => Some(IntType::Long),
            _ => None,
        };
        match (signedness, ty) {
            (_, Some(ty)) => {
                self.pos += 1;
                (signedness, Some(ty))
            }
            (Some(Signedness::Signed), None) => (None, Some(IntType::Short)),
            _ => {
                self.pos = save;
                (None, None)
            }
        }
    }

    /// Range-checks an integer literal. `default_type` applies when the
    /// literal has no type suffix.
    fn int_number(&self, literal: &IntLiteral, default_type: IntType) -> PResult<Number> {
        let ty = literal.ty.unwrap_or(default_type);
        let signedness = self.signedness(literal);
        if signedness == Signedness::Unsigned && literal.negative {
            return Err(self.hard(literal.start, ErrorKey::ExpectedNonNegative));
        }

        let out_of_range = || self.hard(literal.start, ErrorKey::NumberOutOfRange);
        let magnitude =
            BigInt::parse_bytes(literal.digits.as_bytes(), literal.radix).ok_or_else(out_of_range)?;
        let value = if literal.negative { -magnitude } else { magnitude };

        let number = match (ty, signedness) {
            (IntType::Byte, Signedness::Signed) => i8::try_from(&value).ok().map(Number::Byte),
            (IntType::Byte, Signedness::Unsigned) => {
                u8::try_from(&value).ok().map(|v| Number::Byte(v as i8))
            }
            (IntType::Short, Signedness::Signed) => i16::try_from(&value).ok().map(Number::Short),
            (IntType::Short, Signedness::Unsigned) => {
                u16::try_from(&value).ok().map(|v| Number::Short(v as i16))
            }
            (IntType::Int, Signedness::Signed) => i32::try_from(&value).ok().map(Number::Int),
            (IntType::Int, Signedness::Unsigned) => {
                u32::try_from(&value).ok().map(|v| Number::Int(v as i32))
            }
            (IntType::Long, Signedness::Signed) => i64::try_from(&value).ok().map(Number::Long),
            (IntType::Long, Signedness::Unsigned) => {
                u64::try_from(&value).ok().map(|v| Number::Long(v as i64))
            }
        };
        number.ok_or_else(out_of_range)
    }

    fn float_number(&self, start: usize, text: &str, double: bool) -> PResult<Number> {
        let out_of_range = || self.hard(start, ErrorKey::FloatOutOfRange);
        if double {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Number::Double(v)),
                _ => Err(out_of_range()),
            }
        } else {
            match text.parse::<f32>() {
                Ok(v) if v.is_finite() => Ok(Number::Float(v)),
                _ => Err(out_of_range()),
            }
        }
    }

    fn quoted_string(&mut self) -> PResult<String> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Err(self.expect("string"));
        };
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.hard(start, ErrorKey::UnterminatedString));
            };
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escape_start = self.pos - 1;
            let Some(e) = self.bump() else {
                return Err(self.hard(start, ErrorKey::UnterminatedString));
            };
            let decoded = match e {
                '\\' | '\'' | '"' => e,
                'b' => '\u{8}',
                'f' => '\u{c}',
                'n' => '\n',
                'r' => '\r',
                's' => ' ',
                't' => '\t',
                'x' => self.hex_escape(2, escape_start)?,
                'u' => self.hex_escape(4, escape_start)?,
                'U' => self.hex_escape(8, escape_start)?,
                'N' => self.named_escape(escape_start)?,
                _ => return Err(self.hard(escape_start, ErrorKey::InvalidEscape)),
            };
            out.push(decoded);
        }
    }

    fn hex_escape(&mut self, len: usize, escape_start: usize) -> PResult<char> {
        let digits = self.input.get(self.pos..self.pos + len);
        let code = digits
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .and_then(|d| u32::from_str_radix(d, 16).ok())
            .and_then(char::from_u32)
            .ok_or_else(|| self.hard(escape_start, ErrorKey::InvalidEscape))?;
        self.pos += len;
        Ok(code)
    }

    fn named_escape(&mut self, escape_start: usize) -> PResult<char> {
        if !self.eat('{') {
            return Err(self.hard(escape_start, ErrorKey::InvalidEscape));
        }
        let Some(len) = self.input[self.pos..].find('}') else {
            return Err(self.hard(escape_start, ErrorKey::InvalidEscape));
        };
        let name = &self.input[self.pos..self.pos + len];
        let c = unicode_names2::character(name)
            .ok_or_else(|| self.hard(escape_start, ErrorKey::UnknownCharacterName))?;
        self.pos += len + 1;
        Ok(c)
    }
}
