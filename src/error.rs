//! Error types for NBT encoding, decoding and SNBT parsing.
//!
//! This module provides the crate-wide [`Error`] enum and the structured
//! [`ParseError`] reported by the SNBT grammar.
//!
//! ## Error Categories
//!
//! - **Quota/depth violations**: the [`Accounter`](crate::Accounter) refused a decode step
//! - **Invalid type ids**: a byte on the wire names no known tag type
//! - **Malformed roots**: a compound root was required but something else was found
//! - **Syntax errors**: positioned SNBT grammar failures carrying a translation key
//! - **I/O errors**: truncated streams, file reading/writing failures
//!
//! Binary decode failures are wrapped once at the root in [`Error::Load`], naming the
//! type of the root tag. Use [`Error::root_cause`] to get at the underlying failure.
//!
//! ## Examples
//!
//! ```rust
//! use serde_nbt::{from_snbt, Error};
//!
//! let result = from_snbt("{a:}");
//! assert!(matches!(result, Err(Error::Syntax(_))));
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while reading, writing or parsing tags.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The byte quota of the accounter would be exceeded
    #[error("Tried to read NBT tag that was too big; tried to allocate: {used} + {attempted} bytes where max allowed: {quota}")]
    QuotaExceeded { used: u64, attempted: u64, quota: u64 },

    /// The nesting depth of the accounter would be exceeded
    #[error("Tried to read NBT tag with too high complexity, depth > {max}")]
    DepthExceeded { max: usize },

    /// A type id on the wire that names no tag type
    #[error("Invalid tag id: {0}")]
    InvalidTagType(u8),

    /// The root of a stream was required to be a compound
    #[error("Root tag must be a named compound tag, found {found}")]
    RootNotCompound { found: &'static str },

    /// Structurally invalid binary data (negative lengths, bad strings, untyped lists)
    #[error("Malformed NBT data: {0}")]
    Malformed(String),

    /// Failure while loading a root tag, with the root's type for context
    #[error("Failed to load {tag_type}: {source}")]
    Load {
        tag_type: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// SNBT grammar failure
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// Unsupported type for conversion to or from a tag
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Type mismatch while converting a tag into a Rust value
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an I/O error for stream or file failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a malformed-data error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::Error;
    ///
    /// let err = Error::malformed("negative array length -1");
    /// assert!(err.to_string().contains("negative array length"));
    /// ```
    pub fn malformed<T: fmt::Display>(msg: T) -> Self {
        Error::Malformed(msg.to_string())
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::Error;
    ///
    /// let err = Error::type_mismatch("TAG_Int", "TAG_String");
    /// assert!(err.to_string().contains("expected TAG_Int"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for values that have no tag representation.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Wraps a decode failure with the pretty name of the tag being loaded.
    ///
    /// Quota and depth violations pass through unwrapped so callers can match on them
    /// directly.
    pub(crate) fn while_loading(self, tag_type: &'static str) -> Self {
        match self {
            Error::QuotaExceeded { .. } | Error::DepthExceeded { .. } => self,
            other => Error::Load {
                tag_type,
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, looking through [`Error::Load`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::Load { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns `true` if the accounter rejected the decode (quota or depth).
    #[must_use]
    pub fn is_accounting(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::QuotaExceeded { .. } | Error::DepthExceeded { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of SNBT grammar failures.
///
/// Each kind maps to a stable translation key so user interfaces can localize
/// messages; [`fmt::Display`] gives the English fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKey {
    /// Input remained after a complete value
    TrailingData,
    /// A compound key was the empty string
    EmptyKey,
    /// No alternative of the grammar matched
    Expected,
    /// An integer literal does not fit its type
    NumberOutOfRange,
    /// A float literal is not finite
    FloatOutOfRange,
    /// An unsigned literal carries a minus sign
    ExpectedNonNegative,
    /// `_` at the start or end of a digit run
    UnderscoreNotAllowed,
    /// A bare word starts with a character reserved for numbers
    InvalidUnquotedStart,
    /// Unknown or malformed escape sequence in a quoted string
    InvalidEscape,
    /// `\N{...}` names no unicode character
    UnknownCharacterName,
    /// A typed array holds something other than a fitting integer
    InvalidArrayElementType,
    /// A bare word followed by `(` names no builtin
    NoSuchOperation(String),
    /// A builtin was called with the wrong number of arguments
    IncorrectArgumentCount { name: String, expected: usize },
    /// `uuid(...)` argument is not a string or not a UUID
    ExpectedUuid,
    /// `bool(...)` argument is neither number nor boolean
    ExpectedNumberOrBoolean,
    /// Nesting exceeded the maximum depth
    MaxDepth,
    /// Unterminated quoted string
    UnterminatedString,
}

impl ErrorKey {
    /// Returns the translation key of this error kind.
    #[must_use]
    pub fn as_key(&self) -> &'static str {
        match self {
            ErrorKey::TrailingData => "snbt.parser.trailing_data",
            ErrorKey::EmptyKey => "snbt.parser.empty_key",
            ErrorKey::Expected => "snbt.parser.expected",
            ErrorKey::NumberOutOfRange => "snbt.parser.number_out_of_range",
            ErrorKey::FloatOutOfRange => "snbt.parser.float_out_of_range",
            ErrorKey::ExpectedNonNegative => "snbt.parser.expected_non_negative",
            ErrorKey::UnderscoreNotAllowed => "snbt.parser.underscore_not_allowed",
            ErrorKey::InvalidUnquotedStart => "snbt.parser.invalid_unquoted_start",
            ErrorKey::InvalidEscape => "snbt.parser.invalid_escape",
            ErrorKey::UnknownCharacterName => "snbt.parser.invalid_character_name",
            ErrorKey::InvalidArrayElementType => "snbt.parser.invalid_array_element_type",
            ErrorKey::NoSuchOperation(_) => "snbt.parser.no_such_operation",
            ErrorKey::IncorrectArgumentCount { .. } => "snbt.parser.incorrect_argument_count",
            ErrorKey::ExpectedUuid => "snbt.parser.expected_string_uuid",
            ErrorKey::ExpectedNumberOrBoolean => "snbt.parser.expected_number_or_boolean",
            ErrorKey::MaxDepth => "snbt.parser.max_depth",
            ErrorKey::UnterminatedString => "snbt.parser.unterminated_string",
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::TrailingData => write!(f, "unexpected trailing data"),
            ErrorKey::EmptyKey => write!(f, "compound keys must not be empty"),
            ErrorKey::Expected => write!(f, "invalid syntax"),
            ErrorKey::NumberOutOfRange => write!(f, "number out of range for its type"),
            ErrorKey::FloatOutOfRange => write!(f, "floating point number is not finite"),
            ErrorKey::ExpectedNonNegative => write!(f, "unsigned numbers can't be negative"),
            ErrorKey::UnderscoreNotAllowed => {
                write!(f, "underscores are only allowed between digits")
            }
            ErrorKey::InvalidUnquotedStart => {
                write!(f, "unquoted strings can't start with digits, '+', '-' or '.'")
            }
            ErrorKey::InvalidEscape => write!(f, "invalid escape sequence"),
            ErrorKey::UnknownCharacterName => write!(f, "unknown unicode character name"),
            ErrorKey::InvalidArrayElementType => write!(f, "invalid array element type"),
            ErrorKey::NoSuchOperation(name) => write!(f, "no such operation: {}", name),
            ErrorKey::IncorrectArgumentCount { name, expected } => {
                write!(f, "{} expects {} argument(s)", name, expected)
            }
            ErrorKey::ExpectedUuid => write!(f, "expected a string representing a UUID"),
            ErrorKey::ExpectedNumberOrBoolean => write!(f, "expected a number or a boolean"),
            ErrorKey::MaxDepth => write!(f, "maximum nesting depth exceeded"),
            ErrorKey::UnterminatedString => write!(f, "unterminated string"),
        }
    }
}

/// A positioned SNBT grammar failure.
///
/// `cursor` is the byte offset into the source text; `line` and `column` are
/// 1-based. `expected` lists what the grammar would have accepted at the
/// failure position (empty for semantic errors such as [`ErrorKey::EmptyKey`]).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{key} at line {line}, column {column}{}: {context}<--[HERE]", expected_suffix(.expected))]
pub struct ParseError {
    pub cursor: usize,
    pub line: usize,
    pub column: usize,
    pub key: ErrorKey,
    pub expected: Vec<String>,
    pub context: String,
}

fn expected_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(" (expected {})", expected.join(", "))
    }
}

impl ParseError {
    /// Creates a parse error at byte offset `cursor` of `input`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::{ErrorKey, ParseError};
    ///
    /// let err = ParseError::at("{a:1}x", 5, ErrorKey::TrailingData, Vec::new());
    /// assert_eq!(err.column, 6);
    /// assert_eq!(err.key.as_key(), "snbt.parser.trailing_data");
    /// ```
    pub fn at(input: &str, cursor: usize, key: ErrorKey, expected: Vec<String>) -> Self {
        let cursor = cursor.min(input.len());
        let before = &input[..cursor];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |l| l.chars().count())
            + 1;
        let context: String = {
            let chars: Vec<char> = before.chars().collect();
            let start = chars.len().saturating_sub(10);
            let snippet: String = chars[start..].iter().collect();
            if start > 0 {
                format!("...{}", snippet)
            } else {
                snippet
            }
        };
        ParseError {
            cursor,
            line,
            column,
            key,
            expected,
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_load() {
        let err = Error::InvalidTagType(99).while_loading("TAG_Compound");
        assert!(matches!(err, Error::Load { tag_type: "TAG_Compound", .. }));
        assert!(matches!(err.root_cause(), Error::InvalidTagType(99)));
        assert!(err.to_string().contains("TAG_Compound"));
    }

    #[test]
    fn test_accounting_errors_pass_through() {
        let err = Error::DepthExceeded { max: 512 }.while_loading("TAG_List");
        assert!(matches!(err, Error::DepthExceeded { max: 512 }));
        assert!(err.is_accounting());
    }

    #[test]
    fn test_parse_error_position() {
        let err = ParseError::at("{\n  a: }", 7, ErrorKey::Expected, vec!["value".into()]);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 6);
        let shown = err.to_string();
        assert!(shown.contains("expected value"));
        assert!(shown.ends_with("<--[HERE]"));
    }

    #[test]
    fn test_parse_error_context_is_truncated() {
        let input = "0123456789abcdefghij";
        let err = ParseError::at(input, 20, ErrorKey::TrailingData, Vec::new());
        assert_eq!(err.context, "...abcdefghij");
    }
}
