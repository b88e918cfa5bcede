//! Ordered keyed map for compound tags.
//!
//! [`Compound`] wraps an [`IndexMap`] so entries keep their insertion order,
//! which is the order they are written on the wire. Equality ignores order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_nbt::{Compound, Tag};
//!
//! let mut player = Compound::new();
//! player.insert("name", "Alex");
//! player.insert("level", 30i32);
//!
//! assert_eq!(player.len(), 2);
//! assert_eq!(player.get_str("name"), Some("Alex"));
//! assert_eq!(player.get_int("level"), Some(30));
//! ```

use crate::tag::utf16_len;
use crate::Tag;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to tags.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::Compound;
///
/// let mut map = Compound::new();
/// map.insert("first", 1i32);
/// map.insert("second", 2i32);
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound(IndexMap<String, Tag>);

impl Compound {
    /// Creates an empty `Compound`.
    #[must_use]
    pub fn new() -> Self {
        Compound(IndexMap::new())
    }

    /// Creates an empty `Compound` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Compound(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::Compound;
    ///
    /// let mut map = Compound::new();
    /// assert!(map.insert("key", 42i32).is_none());
    /// assert!(map.insert("key", 43i32).is_some());
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tag>) -> Option<Tag> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Tag> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Tag> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tag> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Tag> {
        self.0.iter_mut()
    }

    /// Returns the entries ordered by key.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&String, &Tag)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Estimated footprint of the compound and everything below it.
    #[must_use]
    pub fn size_in_bytes(&self) -> u64 {
        self.0.iter().fold(48, |acc, (k, v)| {
            acc + 28 + 2 * utf16_len(k) + 36 + v.size_in_bytes()
        })
    }

    pub fn get_byte(&self, key: &str) -> Option<i8> {
        self.get(key).and_then(Tag::as_byte)
    }

    pub fn get_short(&self, key: &str) -> Option<i16> {
        self.get(key).and_then(Tag::as_short)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(Tag::as_int)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Tag::as_long)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Tag::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Tag::as_str)
    }

    pub fn get_list(&self, key: &str) -> Option<&[Tag]> {
        self.get(key).and_then(Tag::as_list)
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.get(key).and_then(Tag::as_compound)
    }

    /// Deep-merges `other` into `self`.
    ///
    /// Compounds present on both sides are merged recursively; any other value
    /// in `other` replaces the one in `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::{nbt, Tag};
    ///
    /// let mut base = nbt!({ "a": 1i32, "inner": { "x": 1i32 } });
    /// let patch = nbt!({ "inner": { "y": 2i32 } });
    /// if let (Tag::Compound(base), Tag::Compound(patch)) = (&mut base, patch) {
    ///     base.merge(patch);
    ///     assert_eq!(base.get_compound("inner").map(|c| c.len()), Some(2));
    /// }
    /// ```
    pub fn merge(&mut self, other: Compound) {
        for (key, value) in other {
            let Tag::Compound(incoming) = value else {
                self.0.insert(key, value);
                continue;
            };
            if let Some(Tag::Compound(existing)) = self.0.get_mut(&key) {
                existing.merge(incoming);
                continue;
            }
            self.0.insert(key, Tag::Compound(incoming));
        }
    }
}

impl From<HashMap<String, Tag>> for Compound {
    fn from(map: HashMap<String, Tag>) -> Self {
        Compound(map.into_iter().collect())
    }
}

impl From<Compound> for HashMap<String, Tag> {
    fn from(map: Compound) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = indexmap::map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<T: IntoIterator<Item = (String, Tag)>>(iter: T) -> Self {
        Compound(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, Tag)> for Compound {
    fn extend<T: IntoIterator<Item = (String, Tag)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_order() {
        let a: Compound = vec![("x".to_string(), Tag::Int(1)), ("y".to_string(), Tag::Int(2))]
            .into_iter()
            .collect();
        let b: Compound = vec![("y".to_string(), Tag::Int(2)), ("x".to_string(), Tag::Int(1))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut c = Compound::new();
        c.insert("a", 1i32);
        c.insert("b", 2i32);
        c.insert("c", 3i32);
        c.remove("b");
        let keys: Vec<_> = c.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_merge_recurses_into_compounds() {
        let mut inner = Compound::new();
        inner.insert("x", 1i32);
        let mut base = Compound::new();
        base.insert("inner", inner);
        base.insert("keep", "yes");

        let mut patch_inner = Compound::new();
        patch_inner.insert("y", 2i32);
        let mut patch = Compound::new();
        patch.insert("inner", patch_inner);
        patch.insert("keep", "replaced");

        base.merge(patch);
        let inner = base.get_compound("inner").unwrap();
        assert_eq!(inner.get_int("x"), Some(1));
        assert_eq!(inner.get_int("y"), Some(2));
        assert_eq!(base.get_str("keep"), Some("replaced"));
    }

    #[test]
    fn test_sorted_entries() {
        let mut c = Compound::new();
        c.insert("b", 1i32);
        c.insert("a", 2i32);
        let keys: Vec<_> = c.sorted_entries().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
