//! Visiting tag trees already in memory.
//!
//! [`TagVisitor`] is the eager counterpart of
//! [`StreamVisitor`](crate::StreamVisitor): one callback per variant, with
//! containers handed over whole. The printers are built on it.
//!
//! [`Tag::accept_stream`] and [`Tag::accept_stream_root`] replay a tree
//! through the streaming protocol instead, so one visitor can consume both
//! encoded input and materialized trees.

use crate::stream::{EntryResult, StreamVisitor, ValueResult};
use crate::tag::{box_element, list_element_type, needs_box, Tag, TagType};
use crate::Compound;
use std::borrow::Cow;

/// One callback per tag variant.
pub trait TagVisitor {
    fn visit_end(&mut self);
    fn visit_byte(&mut self, value: i8);
    fn visit_short(&mut self, value: i16);
    fn visit_int(&mut self, value: i32);
    fn visit_long(&mut self, value: i64);
    fn visit_float(&mut self, value: f32);
    fn visit_double(&mut self, value: f64);
    fn visit_byte_array(&mut self, values: &[i8]);
    fn visit_string(&mut self, value: &str);
    fn visit_list(&mut self, items: &[Tag]);
    fn visit_compound(&mut self, compound: &Compound);
    fn visit_int_array(&mut self, values: &[i32]);
    fn visit_long_array(&mut self, values: &[i64]);
}

impl Tag {
    /// Dispatches to the visitor callback for this variant.
    pub fn accept<V: TagVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Tag::End => visitor.visit_end(),
            Tag::Byte(v) => visitor.visit_byte(*v),
            Tag::Short(v) => visitor.visit_short(*v),
            Tag::Int(v) => visitor.visit_int(*v),
            Tag::Long(v) => visitor.visit_long(*v),
            Tag::Float(v) => visitor.visit_float(*v),
            Tag::Double(v) => visitor.visit_double(*v),
            Tag::ByteArray(v) => visitor.visit_byte_array(v),
            Tag::String(s) => visitor.visit_string(s),
            Tag::List(items) => visitor.visit_list(items),
            Tag::Compound(c) => visitor.visit_compound(c),
            Tag::IntArray(v) => visitor.visit_int_array(v),
            Tag::LongArray(v) => visitor.visit_long_array(v),
        }
    }

    /// Replays this tag as the root of a stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::{nbt, CollectToTag};
    ///
    /// let tag = nbt!({ "xs": [1i32, "mixed"] });
    /// let mut collect = CollectToTag::new();
    /// tag.accept_stream_root(&mut collect);
    /// assert_eq!(collect.into_result(), Some(tag));
    /// ```
    pub fn accept_stream_root(&self, visitor: &mut dyn StreamVisitor) -> ValueResult {
        match visitor.visit_root_entry(self.tag_type()) {
            ValueResult::Halt => ValueResult::Halt,
            ValueResult::Break => ValueResult::Continue,
            ValueResult::Continue => self.accept_stream(visitor),
        }
    }

    /// Replays this tag through the streaming protocol.
    ///
    /// Lists are presented in their wire form: a list with mixed element types
    /// is reported as a list of compounds, with every element boxed.
    pub fn accept_stream(&self, visitor: &mut dyn StreamVisitor) -> ValueResult {
        match self {
            Tag::End => visitor.visit_end(),
            Tag::Byte(v) => visitor.visit_byte(*v),
            Tag::Short(v) => visitor.visit_short(*v),
            Tag::Int(v) => visitor.visit_int(*v),
            Tag::Long(v) => visitor.visit_long(*v),
            Tag::Float(v) => visitor.visit_float(*v),
            Tag::Double(v) => visitor.visit_double(*v),
            Tag::ByteArray(v) => visitor.visit_byte_array(v),
            Tag::String(s) => visitor.visit_string(s),
            Tag::IntArray(v) => visitor.visit_int_array(v),
            Tag::LongArray(v) => visitor.visit_long_array(v),
            Tag::List(items) => accept_list(items, visitor),
            Tag::Compound(c) => accept_compound(c, visitor),
        }
    }
}

fn accept_list(items: &[Tag], visitor: &mut dyn StreamVisitor) -> ValueResult {
    // End elements are not encodable, so the replay drops them as the writer does.
    let items: Cow<'_, [Tag]> = if items.iter().any(|t| t.tag_type() == TagType::End) {
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
    match visitor.visit_list(ty, items.len()) {
        ValueResult::Halt => return ValueResult::Halt,
        ValueResult::Break => return visitor.visit_container_end(),
        ValueResult::Continue => {}
    }

    for (index, item) in items.iter().enumerate() {
        match visitor.visit_element(ty, index) {
            EntryResult::Halt => return ValueResult::Halt,
            EntryResult::Break => return visitor.visit_container_end(),
            EntryResult::Skip => continue,
            EntryResult::Enter => {}
        }
        let result = if ty == TagType::Compound && needs_box(item) {
            accept_compound(&box_element(item.clone()), visitor)
        } else {
            item.accept_stream(visitor)
        };
        match result {
            ValueResult::Halt => return ValueResult::Halt,
            ValueResult::Break => return visitor.visit_container_end(),
            ValueResult::Continue => {}
        }
    }
    visitor.visit_container_end()
}

fn accept_compound(compound: &Compound, visitor: &mut dyn StreamVisitor) -> ValueResult {
    for (key, value) in compound.iter() {
        let ty = value.tag_type();
        if ty == TagType::End {
            continue;
        }
        match visitor.visit_entry(ty) {
            EntryResult::Halt => return ValueResult::Halt,
            EntryResult::Break => return visitor.visit_container_end(),
            EntryResult::Skip => continue,
            EntryResult::Enter => {}
        }
        match visitor.visit_entry_named(ty, key) {
            EntryResult::Halt => return ValueResult::Halt,
            EntryResult::Break => return visitor.visit_container_end(),
            EntryResult::Skip => continue,
            EntryResult::Enter => {}
        }
        match value.accept_stream(visitor) {
            ValueResult::Halt => return ValueResult::Halt,
            ValueResult::Break => return visitor.visit_container_end(),
            ValueResult::Continue => {}
        }
    }
    visitor.visit_container_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nbt, CollectToTag};

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl StreamVisitor for Recorder {
        fn visit_int(&mut self, value: i32) -> ValueResult {
            self.0.push(format!("int {}", value));
            ValueResult::Continue
        }

        fn visit_string(&mut self, value: &str) -> ValueResult {
            self.0.push(format!("string {}", value));
            ValueResult::Continue
        }

        fn visit_list(&mut self, element_type: TagType, len: usize) -> ValueResult {
            self.0.push(format!("list {} {}", element_type.name(), len));
            ValueResult::Continue
        }

        fn visit_entry_named(&mut self, _ty: TagType, name: &str) -> EntryResult {
            self.0.push(format!("entry {:?}", name));
            EntryResult::Enter
        }

        fn visit_container_end(&mut self) -> ValueResult {
            self.0.push("end".to_string());
            ValueResult::Continue
        }
    }

    #[test]
    fn test_mixed_list_is_replayed_boxed() {
        let mut recorder = Recorder::default();
        Tag::List(vec![Tag::Int(1), Tag::from("x")]).accept_stream_root(&mut recorder);
        assert_eq!(
            recorder.0,
            vec![
                "list COMPOUND 2",
                "entry \"\"",
                "int 1",
                "end",
                "entry \"\"",
                "string x",
                "end",
                "end"
            ]
        );
    }

    #[test]
    fn test_replay_rebuilds_tree() {
        let tag = nbt!({ "a": [[1i8], [2i16]], "b": { "": 5i32 }, "c": [{ "": 1i32 }, 2i32] });
        let mut collect = CollectToTag::new();
        tag.accept_stream_root(&mut collect);
        assert_eq!(collect.into_result(), Some(tag));
    }

    #[test]
    fn test_end_values_are_dropped_like_the_writer() {
        let tag = Tag::Compound(
            vec![
                ("gone".to_string(), Tag::End),
                ("xs".to_string(), Tag::List(vec![Tag::End, Tag::Int(1), Tag::End])),
            ]
            .into_iter()
            .collect(),
        );
        let mut bytes = Vec::new();
        crate::io::write_tag(&mut bytes, "", &tag).unwrap();
        let (_, decoded) =
            crate::io::read_tag(bytes.as_slice(), &mut crate::Accounter::unlimited()).unwrap();

        let mut collect = CollectToTag::new();
        tag.accept_stream_root(&mut collect);
        let replayed = collect.into_result().unwrap();
        assert_eq!(replayed, decoded);
        assert_eq!(replayed, nbt!({ "xs": [1i32] }));
    }

    #[test]
    fn test_end_root_replay() {
        let mut collect = CollectToTag::new();
        Tag::End.accept_stream_root(&mut collect);
        assert_eq!(collect.into_result(), Some(Tag::End));
    }
}
