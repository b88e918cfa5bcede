//! Structural matching of an expected tag against an actual one.

use crate::tag::Tag;

/// Checks whether `actual` satisfies `expected`.
///
/// A missing expectation matches anything, and a missing actual value
/// matches nothing. Compounds match when every expected key matches the
/// actual value under the same key; extra actual keys are ignored. With
/// `partial_list_match`, every expected list element must match some
/// element of the actual list, in any position, and an empty expected
/// list only matches an empty one. Everything else compares by equality.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{compare_tags, nbt};
///
/// let expected = nbt!({ "Items": [{ "id": "stone" }] });
/// let actual = nbt!({ "Items": [{ "id": "dirt" }, { "id": "stone", "Count": 1i8 }], "x": 1i32 });
/// assert!(compare_tags(Some(&expected), Some(&actual), true));
/// assert!(!compare_tags(Some(&expected), Some(&actual), false));
/// assert!(compare_tags(None, Some(&actual), false));
/// ```
#[must_use]
pub fn compare_tags(expected: Option<&Tag>, actual: Option<&Tag>, partial_list_match: bool) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    let Some(actual) = actual else {
        return false;
    };
    match (expected, actual) {
        (Tag::Compound(expected), Tag::Compound(actual)) => expected
            .iter()
            .all(|(key, value)| compare_tags(Some(value), actual.get(key), partial_list_match)),
        (Tag::List(expected), Tag::List(actual)) if partial_list_match => {
            if expected.is_empty() {
                return actual.is_empty();
            }
            expected.iter().all(|want| {
                actual
                    .iter()
                    .any(|have| compare_tags(Some(want), Some(have), partial_list_match))
            })
        }
        _ => expected == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt;

    #[test]
    fn test_missing_sides() {
        assert!(compare_tags(None, None, false));
        assert!(!compare_tags(Some(&Tag::Int(1)), None, false));
    }

    #[test]
    fn test_type_must_match() {
        assert!(!compare_tags(Some(&Tag::Int(1)), Some(&Tag::Long(1)), true));
        assert!(compare_tags(Some(&Tag::Int(1)), Some(&Tag::Int(1)), true));
    }

    #[test]
    fn test_compound_subset() {
        let expected = nbt!({ "a": 1i32 });
        assert!(compare_tags(Some(&expected), Some(&nbt!({ "a": 1i32, "b": 2i32 })), false));
        assert!(!compare_tags(Some(&expected), Some(&nbt!({ "b": 2i32 })), false));
    }

    #[test]
    fn test_empty_expected_list() {
        let empty = nbt!([]);
        assert!(compare_tags(Some(&empty), Some(&nbt!([])), true));
        assert!(!compare_tags(Some(&empty), Some(&nbt!([1i32])), true));
    }

    #[test]
    fn test_positional_lists_without_partial_mode() {
        let expected = nbt!([1i32, 2i32]);
        assert!(!compare_tags(Some(&expected), Some(&nbt!([2i32, 1i32])), false));
        assert!(compare_tags(Some(&expected), Some(&nbt!([2i32, 1i32])), true));
        assert!(compare_tags(Some(&expected), Some(&nbt!([1i32, 2i32])), false));
    }
}
