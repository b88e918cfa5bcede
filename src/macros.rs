/// Builds a [`Tag`](crate::Tag) from a literal.
///
/// Compounds use `{ "key": value }`, lists `[a, b]`, and primitive arrays the
/// SNBT prefixes `[B; ..]`, `[I; ..]` and `[L; ..]`. Any other expression goes
/// through `Tag::from`, so the Rust type of a number picks its tag type.
///
/// ```rust
/// use serde_nbt::{nbt, Tag};
///
/// let tag = nbt!({
///     "name": "Steve",
///     "health": 20.0f32,
///     "inventory": [{ "id": "stone", "count": 64i8 }],
///     "seed": [L; 1, 2]
/// });
/// assert_eq!(tag.as_compound().and_then(|c| c.get_str("name")), Some("Steve"));
/// ```
#[macro_export]
macro_rules! nbt {
    // Handle the absence marker
    (end) => {
        $crate::Tag::End
    };

    (true) => {
        $crate::Tag::Byte(1)
    };

    (false) => {
        $crate::Tag::Byte(0)
    };

    // Primitive arrays
    ([B; $($elem:expr),* $(,)?]) => {{
        let values: ::std::vec::Vec<i8> = vec![$($elem),*];
        $crate::Tag::ByteArray(values)
    }};

    ([I; $($elem:expr),* $(,)?]) => {{
        let values: ::std::vec::Vec<i32> = vec![$($elem),*];
        $crate::Tag::IntArray(values)
    }};

    ([L; $($elem:expr),* $(,)?]) => {{
        let values: ::std::vec::Vec<i64> = vec![$($elem),*];
        $crate::Tag::LongArray(values)
    }};

    ([]) => {
        $crate::Tag::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Tag::List(vec![$($crate::nbt!($elem)),*])
    };

    ({}) => {
        $crate::Tag::Compound($crate::Compound::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut compound = $crate::Compound::new();
        $(
            compound.insert($key, $crate::nbt!($value));
        )*
        $crate::Tag::Compound(compound)
    }};

    // Any other expression
    ($e:expr) => {
        $crate::Tag::from($e)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Compound, Tag};

    #[test]
    fn test_nbt_macro_primitives() {
        assert_eq!(nbt!(end), Tag::End);
        assert_eq!(nbt!(true), Tag::Byte(1));
        assert_eq!(nbt!(false), Tag::Byte(0));
        assert_eq!(nbt!(42), Tag::Int(42));
        assert_eq!(nbt!(42i64), Tag::Long(42));
        assert_eq!(nbt!(3.5), Tag::Double(3.5));
        assert_eq!(nbt!("hello"), Tag::String("hello".to_string()));
    }

    #[test]
    fn test_nbt_macro_arrays() {
        assert_eq!(nbt!([B; 1, 2]), Tag::ByteArray(vec![1, 2]));
        assert_eq!(nbt!([I; 1, -2]), Tag::IntArray(vec![1, -2]));
        assert_eq!(nbt!([L;]), Tag::LongArray(vec![]));
    }

    #[test]
    fn test_nbt_macro_lists_and_compounds() {
        assert_eq!(nbt!([]), Tag::List(vec![]));
        assert_eq!(nbt!({}), Tag::Compound(Compound::new()));

        let tag = nbt!({ "a": [1i8, "x"], "b": { "c": 2i16 } });
        let compound = tag.as_compound().unwrap();
        assert_eq!(
            compound.get("a"),
            Some(&Tag::List(vec![Tag::Byte(1), Tag::from("x")]))
        );
        assert_eq!(compound.get_compound("b").unwrap().get_short("c"), Some(2));
    }
}
