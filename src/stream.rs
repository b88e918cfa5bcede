//! Streaming visitor protocol.
//!
//! A [`StreamVisitor`] is driven by [`io::parse`](crate::io::parse) (or by
//! [`Tag::accept_stream_root`] for a tree already in memory) and steers the
//! decoder through its return values:
//!
//! - [`ValueResult::Continue`]: keep going
//! - [`ValueResult::Break`]: skip the remaining siblings and return to the parent
//! - [`ValueResult::Halt`]: stop the whole decode
//!
//! Entry and element callbacks return an [`EntryResult`], which adds
//! [`EntryResult::Enter`] (decode this child) and [`EntryResult::Skip`]
//! (consume it unseen). Skipped data is still charged to the accounter.
//!
//! Three visitors ship with the crate:
//!
//! - [`CollectToTag`] rebuilds the tree exactly as [`io::read_tag`](crate::io::read_tag) would
//! - [`CollectFields`] rebuilds only the fields named by [`FieldSelector`]s
//! - [`SkipAll`] consumes everything, which validates a stream
//!
//! ```rust
//! use serde_nbt::{io, nbt, Accounter, CollectFields, FieldSelector, TagType};
//!
//! let root = nbt!({ "Data": { "Version": 3i32, "Blob": [B; 1, 2, 3] }, "Other": "x" });
//! let mut bytes = Vec::new();
//! io::write_tag(&mut bytes, "", &root).unwrap();
//!
//! let mut fields = CollectFields::new(vec![
//!     FieldSelector::nested(&["Data"], TagType::Int, "Version"),
//! ]);
//! io::parse(bytes.as_slice(), &mut fields, &mut Accounter::unlimited()).unwrap();
//!
//! assert_eq!(fields.missing_field_count(), 0);
//! assert_eq!(fields.into_result(), Some(nbt!({ "Data": { "Version": 3i32 } })));
//! ```

use crate::tag::{unbox_element, Tag, TagType};
use crate::Compound;

/// Steering result of a value callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueResult {
    Continue,
    Break,
    Halt,
}

/// Steering result of an entry or element callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryResult {
    Enter,
    Skip,
    Break,
    Halt,
}

/// Callbacks of the streaming decoder.
///
/// Every method has a default that accepts everything, so a visitor only
/// overrides the callbacks it cares about.
pub trait StreamVisitor {
    fn visit_end(&mut self) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_string(&mut self, _value: &str) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_byte(&mut self, _value: i8) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_short(&mut self, _value: i16) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_int(&mut self, _value: i32) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_long(&mut self, _value: i64) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_float(&mut self, _value: f32) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_double(&mut self, _value: f64) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_byte_array(&mut self, _values: &[i8]) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_int_array(&mut self, _values: &[i32]) -> ValueResult {
        ValueResult::Continue
    }

    fn visit_long_array(&mut self, _values: &[i64]) -> ValueResult {
        ValueResult::Continue
    }

    /// Called at the start of a list, before any element.
    fn visit_list(&mut self, _element_type: TagType, _len: usize) -> ValueResult {
        ValueResult::Continue
    }

    /// Called with the type of a compound entry, before its name is read.
    fn visit_entry(&mut self, _ty: TagType) -> EntryResult {
        EntryResult::Enter
    }

    /// Called with the type and name of a compound entry, before its value.
    fn visit_entry_named(&mut self, _ty: TagType, _name: &str) -> EntryResult {
        EntryResult::Enter
    }

    /// Called before each list element.
    fn visit_element(&mut self, _ty: TagType, _index: usize) -> EntryResult {
        EntryResult::Enter
    }

    /// Called after the last entry or element of a container.
    fn visit_container_end(&mut self) -> ValueResult {
        ValueResult::Continue
    }

    /// Called once with the type of the root tag.
    fn visit_root_entry(&mut self, _ty: TagType) -> ValueResult {
        ValueResult::Continue
    }
}

/// Consumes an entire stream without building anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipAll;

impl StreamVisitor for SkipAll {
    fn visit_entry(&mut self, _ty: TagType) -> EntryResult {
        EntryResult::Skip
    }

    fn visit_entry_named(&mut self, _ty: TagType, _name: &str) -> EntryResult {
        EntryResult::Skip
    }

    fn visit_element(&mut self, _ty: TagType, _index: usize) -> EntryResult {
        EntryResult::Skip
    }
}

#[derive(Debug)]
enum Container {
    Compound(Compound),
    List(TagType, Vec<Tag>),
}

#[derive(Debug)]
struct Frame {
    key: Option<String>,
    container: Container,
}

/// Rebuilds the visited tree.
///
/// Elements of compound-typed lists are unboxed, so the result equals what
/// [`io::read_tag`](crate::io::read_tag) returns for the same input.
#[derive(Debug, Default)]
pub struct CollectToTag {
    stack: Vec<Frame>,
    pending_key: Option<String>,
    result: Option<Tag>,
}

impl CollectToTag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The rebuilt root, once the visit has finished.
    #[must_use]
    pub fn result(&self) -> Option<&Tag> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn into_result(self) -> Option<Tag> {
        self.result
    }

    fn append(&mut self, key: Option<String>, tag: Tag) {
        match self.stack.last_mut() {
            None => self.result = Some(tag),
            Some(Frame {
                container: Container::Compound(c),
                ..
            }) => {
                c.insert(key.unwrap_or_default(), tag);
            }
            Some(Frame {
                container: Container::List(_, items),
                ..
            }) => items.push(tag),
        }
    }

    fn value(&mut self, tag: Tag) -> ValueResult {
        let key = self.pending_key.take();
        self.append(key, tag);
        ValueResult::Continue
    }

    fn enter_container_if_needed(&mut self, ty: TagType) {
        let container = match ty {
            TagType::Compound => Container::Compound(Compound::new()),
            TagType::List => Container::List(TagType::End, Vec::new()),
            _ => return,
        };
        let key = self.pending_key.take();
        self.stack.push(Frame { key, container });
    }
}

impl StreamVisitor for CollectToTag {
    fn visit_end(&mut self) -> ValueResult {
        self.value(Tag::End)
    }

    fn visit_string(&mut self, value: &str) -> ValueResult {
        self.value(Tag::String(value.to_string()))
    }

    fn visit_byte(&mut self, value: i8) -> ValueResult {
        self.value(Tag::Byte(value))
    }

    fn visit_short(&mut self, value: i16) -> ValueResult {
        self.value(Tag::Short(value))
    }

    fn visit_int(&mut self, value: i32) -> ValueResult {
        self.value(Tag::Int(value))
    }

    fn visit_long(&mut self, value: i64) -> ValueResult {
        self.value(Tag::Long(value))
    }

    fn visit_float(&mut self, value: f32) -> ValueResult {
        self.value(Tag::Float(value))
    }

    fn visit_double(&mut self, value: f64) -> ValueResult {
        self.value(Tag::Double(value))
    }

    fn visit_byte_array(&mut self, values: &[i8]) -> ValueResult {
        self.value(Tag::ByteArray(values.to_vec()))
    }

    fn visit_int_array(&mut self, values: &[i32]) -> ValueResult {
        self.value(Tag::IntArray(values.to_vec()))
    }

    fn visit_long_array(&mut self, values: &[i64]) -> ValueResult {
        self.value(Tag::LongArray(values.to_vec()))
    }

    fn visit_list(&mut self, element_type: TagType, _len: usize) -> ValueResult {
        if let Some(Frame {
            container: Container::List(ty, _),
            ..
        }) = self.stack.last_mut()
        {
            *ty = element_type;
        }
        ValueResult::Continue
    }

    fn visit_entry(&mut self, _ty: TagType) -> EntryResult {
        EntryResult::Enter
    }

    fn visit_entry_named(&mut self, ty: TagType, name: &str) -> EntryResult {
        self.pending_key = Some(name.to_string());
        self.enter_container_if_needed(ty);
        EntryResult::Enter
    }

    fn visit_element(&mut self, ty: TagType, _index: usize) -> EntryResult {
        self.enter_container_if_needed(ty);
        EntryResult::Enter
    }

    fn visit_container_end(&mut self) -> ValueResult {
        if let Some(frame) = self.stack.pop() {
            let tag = match frame.container {
                Container::Compound(c) => Tag::Compound(c),
                Container::List(TagType::Compound, items) => Tag::List(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Tag::Compound(c) => unbox_element(c),
                            other => other,
                        })
                        .collect(),
                ),
                Container::List(_, items) => Tag::List(items),
            };
            self.append(frame.key, tag);
        }
        ValueResult::Continue
    }

    fn visit_root_entry(&mut self, ty: TagType) -> ValueResult {
        self.enter_container_if_needed(ty);
        ValueResult::Continue
    }
}

/// A field to collect: a path of compound keys from the root, then the
/// field's type and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    path: Vec<String>,
    ty: TagType,
    name: String,
}

impl FieldSelector {
    /// Selects a field of the root compound.
    pub fn new(ty: TagType, name: impl Into<String>) -> Self {
        FieldSelector {
            path: Vec::new(),
            ty,
            name: name.into(),
        }
    }

    /// Selects a field nested under `path`.
    pub fn nested(path: &[&str], ty: TagType, name: impl Into<String>) -> Self {
        FieldSelector {
            path: path.iter().map(|p| p.to_string()).collect(),
            ty,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub fn tag_type(&self) -> TagType {
        self.ty
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One level of the selector tree. Nodes live in an arena and refer to
/// their children by index.
#[derive(Debug, Clone)]
struct FieldTree {
    depth: usize,
    selected: Vec<(String, TagType)>,
    recurse: Vec<(String, usize)>,
}

impl FieldTree {
    fn new(depth: usize) -> Self {
        FieldTree {
            depth,
            selected: Vec::new(),
            recurse: Vec::new(),
        }
    }
}

/// Rebuilds only the selected fields of a compound root.
///
/// Non-compound roots halt immediately. Once every selected field has been
/// found, the remaining entries of each open compound are skipped.
#[derive(Debug)]
pub struct CollectFields {
    inner: CollectToTag,
    nodes: Vec<FieldTree>,
    stack: Vec<usize>,
    wanted_types: Vec<TagType>,
    missing: usize,
}

impl CollectFields {
    pub fn new(selectors: Vec<FieldSelector>) -> Self {
        let mut nodes = vec![FieldTree::new(1)];
        let mut wanted_types = vec![TagType::Compound];
        for selector in &selectors {
            if !wanted_types.contains(&selector.ty) {
                wanted_types.push(selector.ty);
            }
            let mut node = 0;
            for segment in &selector.path {
                node = match nodes[node].recurse.iter().find(|(k, _)| k == segment) {
                    Some((_, child)) => *child,
                    None => {
                        let child = nodes.len();
                        let depth = nodes[node].depth + 1;
                        nodes.push(FieldTree::new(depth));
                        nodes[node].recurse.push((segment.clone(), child));
                        child
                    }
                };
            }
            let selected = &mut nodes[node].selected;
            match selected.iter_mut().find(|(k, _)| *k == selector.name) {
                Some(entry) => entry.1 = selector.ty,
                None => selected.push((selector.name.clone(), selector.ty)),
            }
        }
        CollectFields {
            inner: CollectToTag::new(),
            nodes,
            stack: vec![0],
            wanted_types,
            missing: selectors.len(),
        }
    }

    /// Number of selected fields not seen yet.
    #[must_use]
    pub fn missing_field_count(&self) -> usize {
        self.missing
    }

    /// The partial tree built from the selected fields.
    #[must_use]
    pub fn result(&self) -> Option<&Tag> {
        self.inner.result()
    }

    #[must_use]
    pub fn into_result(self) -> Option<Tag> {
        self.inner.into_result()
    }

    fn current(&self) -> Option<usize> {
        self.stack.last().copied()
    }
}

impl StreamVisitor for CollectFields {
    fn visit_end(&mut self) -> ValueResult {
        self.inner.visit_end()
    }

    fn visit_string(&mut self, value: &str) -> ValueResult {
        self.inner.visit_string(value)
    }

    fn visit_byte(&mut self, value: i8) -> ValueResult {
        self.inner.visit_byte(value)
    }

    fn visit_short(&mut self, value: i16) -> ValueResult {
        self.inner.visit_short(value)
    }

    fn visit_int(&mut self, value: i32) -> ValueResult {
        self.inner.visit_int(value)
    }

    fn visit_long(&mut self, value: i64) -> ValueResult {
        self.inner.visit_long(value)
    }

    fn visit_float(&mut self, value: f32) -> ValueResult {
        self.inner.visit_float(value)
    }

    fn visit_double(&mut self, value: f64) -> ValueResult {
        self.inner.visit_double(value)
    }

    fn visit_byte_array(&mut self, values: &[i8]) -> ValueResult {
        self.inner.visit_byte_array(values)
    }

    fn visit_int_array(&mut self, values: &[i32]) -> ValueResult {
        self.inner.visit_int_array(values)
    }

    fn visit_long_array(&mut self, values: &[i64]) -> ValueResult {
        self.inner.visit_long_array(values)
    }

    fn visit_list(&mut self, element_type: TagType, len: usize) -> ValueResult {
        self.inner.visit_list(element_type, len)
    }

    fn visit_entry(&mut self, ty: TagType) -> EntryResult {
        let Some(node) = self.current() else {
            return self.inner.visit_entry(ty);
        };
        if self.inner.depth() > self.nodes[node].depth {
            self.inner.visit_entry(ty)
        } else if self.missing == 0 {
            EntryResult::Break
        } else if !self.wanted_types.contains(&ty) {
            EntryResult::Skip
        } else {
            self.inner.visit_entry(ty)
        }
    }

    fn visit_entry_named(&mut self, ty: TagType, name: &str) -> EntryResult {
        let Some(node) = self.current() else {
            return self.inner.visit_entry_named(ty, name);
        };
        if self.inner.depth() > self.nodes[node].depth {
            return self.inner.visit_entry_named(ty, name);
        }
        let selected = &mut self.nodes[node].selected;
        if let Some(pos) = selected.iter().position(|(k, t)| k == name && *t == ty) {
            selected.remove(pos);
            self.missing -= 1;
            return self.inner.visit_entry_named(ty, name);
        }
        if ty == TagType::Compound {
            let child = self.nodes[node]
                .recurse
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, child)| *child);
            if let Some(child) = child {
                self.stack.push(child);
                return self.inner.visit_entry_named(ty, name);
            }
        }
        EntryResult::Skip
    }

    fn visit_element(&mut self, ty: TagType, index: usize) -> EntryResult {
        self.inner.visit_element(ty, index)
    }

    fn visit_container_end(&mut self) -> ValueResult {
        if let Some(node) = self.current() {
            if self.inner.depth() == self.nodes[node].depth {
                self.stack.pop();
            }
        }
        self.inner.visit_container_end()
    }

    fn visit_root_entry(&mut self, ty: TagType) -> ValueResult {
        if ty != TagType::Compound {
            return ValueResult::Halt;
        }
        self.inner.visit_root_entry(ty)
    }
}
