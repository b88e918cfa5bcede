//! Rendering tag trees as SNBT text.
//!
//! Three printers share the quoting rules and the number suffixes:
//!
//! - [`to_snbt`]: compact and canonical, keys sorted, no whitespace. Its
//!   output parses back to the same tree with [`from_snbt`](crate::from_snbt).
//! - [`to_snbt_pretty`] / [`PrettyPrinter`]: indented and path-aware. A few
//!   well-known paths of structure files render inline or with a fixed key
//!   order.
//! - [`to_styled`] / [`StyledPrinter`]: spans tagged with a [`Style`] for
//!   terminal display, folding lists that are too long or too deep.
//!
//! ```rust
//! use serde_nbt::{nbt, to_snbt, to_snbt_pretty};
//!
//! let tag = nbt!({ "b": "x", "a": 1i32 });
//! assert_eq!(to_snbt(&tag), r#"{a:1,b:"x"}"#);
//! assert_eq!(to_snbt_pretty(&tag), "{\n    a: 1,\n    b: \"x\"\n}");
//! ```

use crate::options::{PrettyOptions, StyledOptions};
use crate::tag::Tag;
use crate::visitor::TagVisitor;
use crate::Compound;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write as _};
use std::io::{self, Write as _};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Text printed for [`Tag::End`].
const END: &str = "END";

/// Marker standing in for folded content.
pub const FOLDED: &str = "<...>";

/// Paths whose containers render on one line, children included.
static NO_INDENTATION: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "{}.size.[]",
        "{}.data.[].{}",
        "{}.palette.[].{}",
        "{}.entities.[].{}",
    ]
    .into_iter()
    .collect()
});

/// Keys printed first, in this order, for compounds at these paths.
static KEY_ORDER: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut order = HashMap::new();
    order.insert(
        "{}",
        vec!["DataVersion", "author", "size", "data", "entities", "palette", "palettes"],
    );
    order.insert("{}.data.[].{}", vec!["pos", "state", "nbt"]);
    order.insert("{}.entities.[].{}", vec!["blockPos", "pos"]);
    order
});

/// Renders a tag as compact SNBT.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{nbt, to_snbt};
///
/// assert_eq!(to_snbt(&nbt!([B; 1, 2])), "[B;1B,2B]");
/// assert_eq!(to_snbt(&nbt!(["it's", 2i64])), r#"["it's",2L]"#);
/// ```
#[must_use]
pub fn to_snbt(tag: &Tag) -> String {
    let mut printer = CompactPrinter::default();
    tag.accept(&mut printer);
    printer.out
}

/// Renders a tag as indented SNBT with the default options.
#[must_use]
pub fn to_snbt_pretty(tag: &Tag) -> String {
    to_snbt_pretty_with_options(tag, PrettyOptions::default())
}

/// Renders a tag as indented SNBT.
#[must_use]
pub fn to_snbt_pretty_with_options(tag: &Tag, options: PrettyOptions) -> String {
    PrettyPrinter::new(options).print(tag)
}

/// Renders a tag as styled spans with the default options.
#[must_use]
pub fn to_styled(tag: &Tag) -> StyledText {
    StyledPrinter::new(StyledOptions::default()).print(tag)
}

/// Quotes a string for SNBT.
///
/// The quote character is the one that does not occur first in the text,
/// defaulting to `"`. Backslashes, the chosen quote and control characters
/// are escaped.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::printer::quote_and_escape;
///
/// assert_eq!(quote_and_escape("plain"), "\"plain\"");
/// assert_eq!(quote_and_escape("say \"hi\""), "'say \"hi\"'");
/// assert_eq!(quote_and_escape("a\\b\n"), "\"a\\\\b\\n\"");
/// ```
#[must_use]
pub fn quote_and_escape(s: &str) -> String {
    let mut quote = None;
    let mut body = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => body.push_str("\\\\"),
            '"' | '\'' => {
                let q = *quote.get_or_insert(if c == '"' { '\'' } else { '"' });
                if q == c {
                    body.push('\\');
                }
                body.push(c);
            }
            '\u{8}' => body.push_str("\\b"),
            '\t' => body.push_str("\\t"),
            '\n' => body.push_str("\\n"),
            '\u{c}' => body.push_str("\\f"),
            '\r' => body.push_str("\\r"),
            c if c.is_control() => {
                let code = u32::from(c);
                if code <= 0xFF {
                    let _ = write!(body, "\\x{:02X}", code);
                } else {
                    let _ = write!(body, "\\u{:04X}", code);
                }
            }
            c => body.push(c),
        }
    }
    let quote = quote.unwrap_or('"');
    let mut out = String::with_capacity(body.len() + 2);
    out.push(quote);
    out.push_str(&body);
    out.push(quote);
    out
}

fn is_simple_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
}

/// A key as written inside a compound: bare when possible.
fn escape_key(key: &str) -> String {
    if is_simple_key(key) {
        key.to_string()
    } else {
        quote_and_escape(key)
    }
}

fn float_text(v: f32) -> String {
    format!("{:?}", v)
}

fn double_text(v: f64) -> String {
    format!("{:?}", v)
}

#[derive(Default)]
struct CompactPrinter {
    out: String,
}

impl CompactPrinter {
    fn array<T: fmt::Display>(&mut self, prefix: &str, values: &[T], suffix: &str) {
        self.out.push('[');
        self.out.push_str(prefix);
        self.out.push(';');
        for (i, v) in values.iter().enumerate() {
            if i != 0 {
                self.out.push(',');
            }
            let _ = write!(self.out, "{}{}", v, suffix);
        }
        self.out.push(']');
    }
}

impl TagVisitor for CompactPrinter {
    fn visit_end(&mut self) {
        self.out.push_str(END);
    }

    fn visit_byte(&mut self, value: i8) {
        let _ = write!(self.out, "{}b", value);
    }

    fn visit_short(&mut self, value: i16) {
        let _ = write!(self.out, "{}s", value);
    }

    fn visit_int(&mut self, value: i32) {
        let _ = write!(self.out, "{}", value);
    }

    fn visit_long(&mut self, value: i64) {
        let _ = write!(self.out, "{}L", value);
    }

    fn visit_float(&mut self, value: f32) {
        self.out.push_str(&float_text(value));
        self.out.push('f');
    }

    fn visit_double(&mut self, value: f64) {
        self.out.push_str(&double_text(value));
        self.out.push('d');
    }

    fn visit_byte_array(&mut self, values: &[i8]) {
        self.array("B", values, "B");
    }

    fn visit_string(&mut self, value: &str) {
        self.out.push_str(&quote_and_escape(value));
    }

    fn visit_list(&mut self, items: &[Tag]) {
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i != 0 {
                self.out.push(',');
            }
            item.accept(self);
        }
        self.out.push(']');
    }

    fn visit_compound(&mut self, compound: &Compound) {
        self.out.push('{');
        for (i, (key, value)) in compound.sorted_entries().into_iter().enumerate() {
            if i != 0 {
                self.out.push(',');
            }
            self.out.push_str(&escape_key(key));
            self.out.push(':');
            value.accept(self);
        }
        self.out.push('}');
    }

    fn visit_int_array(&mut self, values: &[i32]) {
        self.array("I", values, "");
    }

    fn visit_long_array(&mut self, values: &[i64]) {
        self.array("L", values, "L");
    }
}

/// The indented, path-aware printer.
///
/// While descending, the printer tracks a path made of `{}` for compounds,
/// key names, and `[]` for lists. Compounds and lists at a handful of
/// structure-file paths (`{}.size.[]`, `{}.data.[].{}`, ...) are printed on
/// one line, and the compounds at `{}`, `{}.data.[].{}` and
/// `{}.entities.[].{}` print their well-known keys first.
///
/// ```rust
/// use serde_nbt::{nbt, PrettyOptions, PrettyPrinter};
///
/// let tag = nbt!({ "size": [1i32, 2i32, 3i32], "DataVersion": 3465i32 });
/// let text = PrettyPrinter::new(PrettyOptions::new()).print(&tag);
/// assert_eq!(text, "{\n    DataVersion: 3465,\n    size: [1, 2, 3]\n}");
/// ```
#[derive(Debug, Clone)]
pub struct PrettyPrinter {
    indent: String,
    depth: usize,
    path: Vec<String>,
    out: String,
}

impl PrettyPrinter {
    pub fn new(options: PrettyOptions) -> Self {
        PrettyPrinter {
            indent: options.indent,
            depth: 0,
            path: Vec::new(),
            out: String::new(),
        }
    }

    /// Renders `tag`, consuming the printer.
    #[must_use]
    pub fn print(mut self, tag: &Tag) -> String {
        tag.accept(&mut self);
        self.out
    }

    fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// The indent for the container whose path was just pushed.
    fn container_indent(&self) -> String {
        if NO_INDENTATION.contains(self.path_string().as_str()) {
            String::new()
        } else {
            self.indent.clone()
        }
    }

    fn ordered_keys<'c>(&self, compound: &'c Compound) -> Vec<&'c String> {
        let mut keys: Vec<&String> = Vec::with_capacity(compound.len());
        let first = KEY_ORDER.get(self.path_string().as_str());
        if let Some(first) = first {
            for name in first {
                if let Some((key, _)) = compound.iter().find(|(k, _)| k.as_str() == *name) {
                    keys.push(key);
                }
            }
        }
        let mut rest: Vec<&String> = compound
            .keys()
            .filter(|k| first.map_or(true, |f| !f.iter().any(|name| *name == k.as_str())))
            .collect();
        rest.sort();
        keys.extend(rest);
        keys
    }

    /// Renders a child with the given indent one level deeper.
    fn child(&mut self, indent: &str, tag: &Tag) {
        let saved = std::mem::replace(&mut self.indent, indent.to_string());
        self.depth += 1;
        tag.accept(self);
        self.depth -= 1;
        self.indent = saved;
    }

    fn array<T: fmt::Display>(&mut self, prefix: &str, values: &[T], suffix: &str) {
        let _ = write!(self.out, "[{};", prefix);
        for (i, v) in values.iter().enumerate() {
            self.out.push_str(if i == 0 { " " } else { ", " });
            let _ = write!(self.out, "{}{}", v, suffix);
        }
        self.out.push(']');
    }
}

impl TagVisitor for PrettyPrinter {
    fn visit_end(&mut self) {
        self.out.push_str(END);
    }

    fn visit_byte(&mut self, value: i8) {
        let _ = write!(self.out, "{}b", value);
    }

    fn visit_short(&mut self, value: i16) {
        let _ = write!(self.out, "{}s", value);
    }

    fn visit_int(&mut self, value: i32) {
        let _ = write!(self.out, "{}", value);
    }

    fn visit_long(&mut self, value: i64) {
        let _ = write!(self.out, "{}L", value);
    }

    fn visit_float(&mut self, value: f32) {
        self.out.push_str(&float_text(value));
        self.out.push('f');
    }

    fn visit_double(&mut self, value: f64) {
        self.out.push_str(&double_text(value));
        self.out.push('d');
    }

    fn visit_byte_array(&mut self, values: &[i8]) {
        self.array("B", values, "B");
    }

    fn visit_string(&mut self, value: &str) {
        self.out.push_str(&quote_and_escape(value));
    }

    fn visit_list(&mut self, items: &[Tag]) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.path.push("[]".to_string());
        let indent = self.container_indent();
        self.out.push('[');
        if !indent.is_empty() {
            self.out.push('\n');
        }
        for (i, item) in items.iter().enumerate() {
            self.out.push_str(&indent.repeat(self.depth + 1));
            self.child(&indent, item);
            if i != items.len() - 1 {
                self.out.push_str(if indent.is_empty() { ", " } else { ",\n" });
            }
        }
        if !indent.is_empty() {
            self.out.push('\n');
            self.out.push_str(&indent.repeat(self.depth));
        }
        self.out.push(']');
        self.path.pop();
    }

    fn visit_compound(&mut self, compound: &Compound) {
        if compound.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.path.push("{}".to_string());
        let indent = self.container_indent();
        let keys = self.ordered_keys(compound);
        self.out.push('{');
        if !indent.is_empty() {
            self.out.push('\n');
        }
        for (i, key) in keys.iter().enumerate() {
            let Some(value) = compound.get(key) else {
                continue;
            };
            self.out.push_str(&indent.repeat(self.depth + 1));
            self.out.push_str(&escape_key(key));
            self.out.push_str(": ");
            self.path.push((*key).clone());
            self.child(&indent, value);
            self.path.pop();
            if i != keys.len() - 1 {
                self.out.push_str(if indent.is_empty() { ", " } else { ",\n" });
            }
        }
        if !indent.is_empty() {
            self.out.push('\n');
            self.out.push_str(&indent.repeat(self.depth));
        }
        self.out.push('}');
        self.path.pop();
    }

    fn visit_int_array(&mut self, values: &[i32]) {
        self.array("I", values, "");
    }

    fn visit_long_array(&mut self, values: &[i64]) {
        self.array("L", values, "L");
    }
}

/// The role of a span of styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain, // brackets, separators, END
    Key,
    String,
    Number,
    /// Number suffixes and array type prefixes.
    NumberType,
    Folded,
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Plain => {}
            Style::Key => {
                s.set_fg(Some(Color::Cyan));
            }
            Style::String => {
                s.set_fg(Some(Color::Green));
            }
            Style::Number => {
                s.set_fg(Some(Color::Yellow));
            }
            Style::NumberType => {
                s.set_fg(Some(Color::Red));
            }
            Style::Folded => {
                s.set_dimmed(true);
            }
        }
        s
    }
}

/// Text split into styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<(Style, String)>,
}

impl StyledText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends text, merging it into the last span when the style matches.
    pub fn push(&mut self, style: Style, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some((last, buf)) if *last == style => buf.push_str(text),
            _ => self.spans.push((style, text.to_string())),
        }
    }

    pub fn spans(&self) -> &[(Style, String)] {
        &self.spans
    }

    /// The text without styling.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.spans.iter().map(|(_, text)| text.as_str()).collect()
    }

    /// Writes the spans to a color-capable sink.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn write_to<W: WriteColor + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (style, text) in &self.spans {
            if *style == Style::Plain {
                out.reset()?;
            } else {
                out.set_color(&style.to_color_spec())?;
            }
            out.write_all(text.as_bytes())?;
        }
        out.reset()
    }

    /// Prints to stdout, with colors when the terminal supports them.
    ///
    /// # Errors
    ///
    /// Propagates write failures of stdout.
    pub fn print_colored(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.write_to(&mut stdout)?;
        writeln!(stdout)
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, text) in &self.spans {
            f.write_str(text)?;
        }
        Ok(())
    }
}

/// The styled printer used for terminal display.
///
/// Keys are sorted. Lists and arrays longer than
/// [`max_elements`](StyledOptions::max_elements) and containers nested deeper
/// than [`max_depth`](StyledOptions::max_depth) are replaced by the
/// [`FOLDED`] marker. With a non-empty indent, compounds put one entry per
/// line, and lists do so only when they hold at most eight elements and
/// at least one of them is not a number.
///
/// ```rust
/// use serde_nbt::{nbt, StyledOptions, StyledPrinter};
///
/// let tag = nbt!({ "id": "stone", "n": [I; 1, 2] });
/// let text = StyledPrinter::new(StyledOptions::new()).print(&tag);
/// assert_eq!(text.to_plain_string(), "{id: \"stone\", n: [I; 1, 2]}");
/// ```
#[derive(Debug, Clone)]
pub struct StyledPrinter {
    options: StyledOptions,
    depth: usize,
    out: StyledText,
}

impl StyledPrinter {
    pub fn new(options: StyledOptions) -> Self {
        StyledPrinter {
            options,
            depth: 0,
            out: StyledText::new(),
        }
    }

    /// Renders `tag`, consuming the printer.
    #[must_use]
    pub fn print(mut self, tag: &Tag) -> StyledText {
        tag.accept(&mut self);
        self.out
    }

    fn plain(&mut self, text: &str) {
        self.out.push(Style::Plain, text);
    }

    fn number(&mut self, value: impl fmt::Display, suffix: &str) {
        self.out.push(Style::Number, &value.to_string());
        self.out.push(Style::NumberType, suffix);
    }

    fn folded(&mut self, open: &str, close: &str) {
        self.plain(open);
        self.out.push(Style::Folded, FOLDED);
        self.plain(close);
    }

    fn line_break(&mut self, depth: usize) {
        let indent = self.options.indent.repeat(depth);
        self.plain("\n");
        self.plain(&indent);
    }

    fn child(&mut self, tag: &Tag) {
        self.depth += 1;
        tag.accept(self);
        self.depth -= 1;
    }

    fn array<T: fmt::Display>(&mut self, prefix: &str, values: &[T], suffix: &str) {
        self.plain("[");
        self.out.push(Style::NumberType, prefix);
        self.plain(";");
        if values.len() > self.options.max_elements {
            self.plain(" ");
            self.out.push(Style::Folded, FOLDED);
        } else {
            for (i, v) in values.iter().enumerate() {
                self.plain(if i == 0 { " " } else { ", " });
                self.number(v, suffix);
            }
        }
        self.plain("]");
    }

    fn wraps(&self, items: &[Tag]) -> bool {
        !self.options.indent.is_empty()
            && items.len() <= 8
            && items.iter().any(|item| !item.is_numeric())
    }
}

impl TagVisitor for StyledPrinter {
    fn visit_end(&mut self) {
        self.plain(END);
    }

    fn visit_byte(&mut self, value: i8) {
        self.number(value, "b");
    }

    fn visit_short(&mut self, value: i16) {
        self.number(value, "s");
    }

    fn visit_int(&mut self, value: i32) {
        self.number(value, "");
    }

    fn visit_long(&mut self, value: i64) {
        self.number(value, "L");
    }

    fn visit_float(&mut self, value: f32) {
        self.number(float_text(value), "f");
    }

    fn visit_double(&mut self, value: f64) {
        self.number(double_text(value), "d");
    }

    fn visit_byte_array(&mut self, values: &[i8]) {
        self.array("B", values, "B");
    }

    fn visit_string(&mut self, value: &str) {
        self.out.push(Style::String, &quote_and_escape(value));
    }

    fn visit_list(&mut self, items: &[Tag]) {
        if items.is_empty() {
            self.plain("[]");
            return;
        }
        if self.depth >= self.options.max_depth || items.len() > self.options.max_elements {
            self.folded("[", "]");
            return;
        }
        let wrap = self.wraps(items);
        self.plain("[");
        for (i, item) in items.iter().enumerate() {
            if i != 0 {
                self.plain(",");
                if !wrap {
                    self.plain(" ");
                }
            }
            if wrap {
                self.line_break(self.depth + 1);
            }
            self.child(item);
        }
        if wrap {
            self.line_break(self.depth);
        }
        self.plain("]");
    }

    fn visit_compound(&mut self, compound: &Compound) {
        if compound.is_empty() {
            self.plain("{}");
            return;
        }
        if self.depth >= self.options.max_depth {
            self.folded("{", "}");
            return;
        }
        let wrap = !self.options.indent.is_empty();
        self.plain("{");
        for (i, (key, value)) in compound.sorted_entries().into_iter().enumerate() {
            if i != 0 {
                self.plain(",");
                if !wrap {
                    self.plain(" ");
                }
            }
            if wrap {
                self.line_break(self.depth + 1);
            }
            self.out.push(Style::Key, &escape_key(key));
            self.plain(": ");
            self.child(value);
        }
        if wrap {
            self.line_break(self.depth);
        }
        self.plain("}");
    }

    fn visit_int_array(&mut self, values: &[i32]) {
        self.array("I", values, "");
    }

    fn visit_long_array(&mut self, values: &[i64]) {
        self.array("L", values, "L");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt;

    #[test]
    fn test_compact_scalars() {
        assert_eq!(to_snbt(&Tag::Byte(-1)), "-1b");
        assert_eq!(to_snbt(&Tag::Short(7)), "7s");
        assert_eq!(to_snbt(&Tag::Int(7)), "7");
        assert_eq!(to_snbt(&Tag::Long(7)), "7L");
        assert_eq!(to_snbt(&Tag::Float(1.5)), "1.5f");
        assert_eq!(to_snbt(&Tag::Double(2.0)), "2.0d");
        assert_eq!(to_snbt(&Tag::End), "END");
    }

    #[test]
    fn test_compact_containers() {
        let tag = nbt!({ "z": [], "a b": [I; 1, 2], "": {} });
        assert_eq!(to_snbt(&tag), r#"{"":{},"a b":[I;1,2],z:[]}"#);
        assert_eq!(to_snbt(&nbt!([L; 1, 2])), "[L;1L,2L]");
        assert_eq!(to_snbt(&nbt!([B;])), "[B;]");
    }

    #[test]
    fn test_quote_selection() {
        assert_eq!(quote_and_escape(""), "\"\"");
        assert_eq!(quote_and_escape("it's"), "\"it's\"");
        assert_eq!(quote_and_escape("'a' \"b\""), "\"'a' \\\"b\\\"\"");
        assert_eq!(quote_and_escape("\"a\" 'b'"), "'\"a\" \\'b\\''");
    }

    #[test]
    fn test_control_escapes() {
        assert_eq!(quote_and_escape("\t\r\u{8}\u{c}"), "\"\\t\\r\\b\\f\"");
        assert_eq!(quote_and_escape("\u{1}\u{7f}"), "\"\\x01\\x7F\"");
    }

    #[test]
    fn test_pretty_nested() {
        let tag = nbt!({ "list": [{ "a": 1i8 }, "x"], "e": [] });
        let expected = "{\n    e: [],\n    list: [\n        {\n            a: 1b\n        },\n        \"x\"\n    ]\n}";
        assert_eq!(to_snbt_pretty(&tag), expected);
    }

    #[test]
    fn test_pretty_arrays() {
        assert_eq!(to_snbt_pretty(&nbt!([B; 1, 2])), "[B; 1B, 2B]");
        assert_eq!(to_snbt_pretty(&nbt!([I;])), "[I;]");
        assert_eq!(to_snbt_pretty(&nbt!([L; 5])), "[L; 5L]");
    }

    #[test]
    fn test_pretty_structure_paths() {
        let tag = nbt!({
            "palette": [{ "Name": "stone", "Properties": { "a": "b" } }],
            "size": [1i32, 2i32],
            "data": [{ "nbt": {}, "state": 0i32, "pos": [0i32, 0i32] }],
            "DataVersion": 1i32
        });
        let expected = "{\n    DataVersion: 1,\n    size: [1, 2],\n    \
                        data: [\n        {pos: [0, 0], state: 0, nbt: {}}\n    ],\n    \
                        palette: [\n        {Name: \"stone\", Properties: {a: \"b\"}}\n    ]\n}";
        assert_eq!(to_snbt_pretty(&tag), expected);
    }

    #[test]
    fn test_pretty_custom_indent() {
        let tag = nbt!({ "a": { "b": 1i32 } });
        let text = to_snbt_pretty_with_options(&tag, PrettyOptions::new().with_indent_str("\t"));
        assert_eq!(text, "{\n\ta: {\n\t\tb: 1\n\t}\n}");
    }

    #[test]
    fn test_styled_spans() {
        let text = to_styled(&nbt!({ "k": 5i8 }));
        assert_eq!(
            text.spans(),
            &[
                (Style::Plain, "{".to_string()),
                (Style::Key, "k".to_string()),
                (Style::Plain, ": ".to_string()),
                (Style::Number, "5".to_string()),
                (Style::NumberType, "b".to_string()),
                (Style::Plain, "}".to_string()),
            ]
        );
        assert_eq!(text.to_string(), "{k: 5b}");
    }

    #[test]
    fn test_styled_folds_long_lists() {
        let long = Tag::List((0..129).map(Tag::Int).collect());
        assert_eq!(to_styled(&long).to_plain_string(), "[<...>]");
        let fits = Tag::List((0..128).map(Tag::Int).collect());
        assert!(!to_styled(&fits).to_plain_string().contains(FOLDED));
        let array = Tag::ByteArray(vec![0; 200]);
        assert_eq!(to_styled(&array).to_plain_string(), "[B; <...>]");
    }

    #[test]
    fn test_styled_folds_deep_nesting() {
        let mut tag = Tag::Int(1);
        for _ in 0..70 {
            tag = Tag::List(vec![tag]);
        }
        let text = StyledPrinter::new(StyledOptions::new().with_max_depth(2))
            .print(&tag)
            .to_plain_string();
        assert_eq!(text, "[[[<...>]]]");
    }

    #[test]
    fn test_styled_wrapping() {
        let options = StyledOptions::new().with_indent(2);
        let words = nbt!(["a", "b"]);
        assert_eq!(
            StyledPrinter::new(options.clone()).print(&words).to_plain_string(),
            "[\n  \"a\",\n  \"b\"\n]"
        );
        let numbers = nbt!([1i32, 2i32]);
        assert_eq!(
            StyledPrinter::new(options.clone()).print(&numbers).to_plain_string(),
            "[1, 2]"
        );
        let compound = nbt!({ "a": 1i32 });
        assert_eq!(
            StyledPrinter::new(options).print(&compound).to_plain_string(),
            "{\n  a: 1\n}"
        );
    }

    #[test]
    fn test_styled_write_to_plain_sink() {
        let text = to_styled(&nbt!({ "a": "b" }));
        let mut out = termcolor::NoColor::new(Vec::new());
        text.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "{a: \"b\"}");
    }
}
