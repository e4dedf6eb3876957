//! Identifier and record traits for typed hierarchies

use std::fmt;
use std::hash::Hash;

/// Identifier type usable as a lookup key when building trees.
///
/// A parent identifier equal to the root sentinel (`0` for integers, `"0"`
/// for strings) marks a record as a root, even when a record with that
/// identifier exists.
pub trait NodeKey: Eq + Hash + Clone + fmt::Display + fmt::Debug {
    fn is_root_sentinel(&self) -> bool {
        false
    }
}

macro_rules! impl_integer_key {
    ($($t:ty),*) => {
        $(
            impl NodeKey for $t {
                fn is_root_sentinel(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl NodeKey for String {
    fn is_root_sentinel(&self) -> bool {
        self == "0"
    }
}

/// A flat record carrying its own identifier and an optional parent identifier.
///
/// `parent_key()` returning `None` means the parent reference is absent.
pub trait TreeRecord {
    type Key: NodeKey;

    fn key(&self) -> Self::Key;

    fn parent_key(&self) -> Option<Self::Key>;
}

/// Root rule shared by the builder and the validator.
pub(crate) fn is_root_reference<K: NodeKey>(parent: Option<&K>) -> bool {
    match parent {
        None => true,
        Some(p) => p.is_root_sentinel(),
    }
}
