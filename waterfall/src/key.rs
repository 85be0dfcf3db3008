#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Map keyed by [`ItemKey`]: a `HashMap` with `std`, a `BTreeMap` without.
#[cfg(feature = "std")]
pub type KeyMap<K, V> = HashMap<K, V>;
/// Map keyed by [`ItemKey`]: a `HashMap` with `std`, a `BTreeMap` without.
#[cfg(not(feature = "std"))]
pub type KeyMap<K, V> = BTreeMap<K, V>;

/// Bound on item keys used by the height cache.
///
/// With `std` this is `Hash + Eq`; without it, `Ord` (the cache falls back to a `BTreeMap`).
#[cfg(feature = "std")]
pub trait ItemKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ItemKey for K {}

#[cfg(not(feature = "std"))]
pub trait ItemKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ItemKey for K {}
