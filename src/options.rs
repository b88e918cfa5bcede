//! Configuration for the printers and file I/O.
//!
//! - [`Compression`]: raw or gzip framing of binary files
//! - [`PrettyOptions`]: the indented, path-aware SNBT printer
//! - [`StyledOptions`]: the styled printer used for terminal display
//!
//! ## Examples
//!
//! ```rust
//! use serde_nbt::{nbt, to_snbt_pretty_with_options, PrettyOptions};
//!
//! let tag = nbt!({ "a": [1i32, 2i32] });
//! let options = PrettyOptions::new().with_indent(2);
//! let text = to_snbt_pretty_with_options(&tag, options);
//! assert!(text.starts_with("{\n  a: ["));
//! ```

use crate::accounter::Accounter;

/// Framing of a binary file.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::Compression;
///
/// assert_eq!(Compression::detect(&[0x1F, 0x8B, 0x08]), Compression::Gzip);
/// assert_eq!(Compression::detect(&[0x0A, 0x00, 0x00]), Compression::None);
/// assert_eq!(Compression::Gzip.default_accounter().quota(), 2 * 1024 * 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw stream; the usual choice for trusted local files.
    None,
    /// Gzip-compressed stream; the usual framing of files from elsewhere.
    #[default]
    Gzip,
}

impl Compression {
    /// Guesses the framing from the first bytes of a file.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(&[0x1F, 0x8B]) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    /// The accounter preset used when reading with this framing.
    #[must_use]
    pub const fn default_accounter(self) -> Accounter {
        match self {
            Compression::None => Accounter::trusted(),
            Compression::Gzip => Accounter::untrusted(),
        }
    }
}

/// Configuration of the pretty SNBT printer.
#[derive(Clone, Debug, PartialEq)]
pub struct PrettyOptions {
    pub indent: String,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        PrettyOptions {
            indent: "    ".to_string(),
        }
    }
}

impl PrettyOptions {
    /// Creates default options (4-space indent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indents with `width` spaces per level.
    #[must_use]
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    /// Indents with an arbitrary string per level, such as a tab.
    #[must_use]
    pub fn with_indent_str(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }
}

/// Configuration of the styled printer.
///
/// With the default empty indent everything renders on one line.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::StyledOptions;
///
/// let options = StyledOptions::new().with_indent(2).with_max_elements(16);
/// assert_eq!(options.indent, "  ");
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StyledOptions {
    pub indent: String,
    /// Lists and arrays longer than this render as a fold marker.
    pub max_elements: usize,
    /// Containers nested deeper than this render as a fold marker.
    pub max_depth: usize,
}

impl Default for StyledOptions {
    fn default() -> Self {
        StyledOptions {
            indent: String::new(),
            max_elements: 128,
            max_depth: 64,
        }
    }
}

impl StyledOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    #[must_use]
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
