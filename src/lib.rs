#![doc = include_str!("../README.md")]

mod error;
mod lru;
mod map;
pub mod raw;
mod set;

pub use equivalent::Equivalent;
pub use error::{Error, OccupiedError, TryInsertError};
pub use lru::LruMap;
pub use map::{HashMap, HashMapBuilder, Iter, IterMut, Keys, OrderedMap, Values, ValuesMut};
pub use raw::{
    AttackEvent, AttackHook, Cursor, Insertion, Lru, Order, Passive, RawMap, Tuning, Unordered,
};
pub use set::{HashSet, HashSetBuilder, OrderedSet, SetIter};
