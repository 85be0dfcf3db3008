use alloc::vec;
use alloc::vec::Vec;

use crate::ItemKey;

/// Intrinsic media size of an item (e.g. the source image dimensions).
///
/// Only the aspect ratio matters: it drives the height estimate used before an item has been
/// measured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntrinsicSize {
    pub width: f64,
    pub height: f64,
}

impl IntrinsicSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An item the engine can lay out.
///
/// The engine never mutates items; it only reads the key (for the height cache) and the
/// intrinsic size (for estimates).
pub trait MasonryItem {
    type Key: ItemKey;

    fn key(&self) -> Self::Key;

    fn intrinsic_size(&self) -> IntrinsicSize;
}

/// A minimal item: a key plus an intrinsic size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile<K = u64> {
    pub key: K,
    pub size: IntrinsicSize,
}

impl<K> Tile<K> {
    pub fn new(key: K, width: f64, height: f64) -> Self {
        Self {
            key,
            size: IntrinsicSize::new(width, height),
        }
    }
}

impl<K: ItemKey> MasonryItem for Tile<K> {
    type Key = K;

    fn key(&self) -> K {
        self.key.clone()
    }

    fn intrinsic_size(&self) -> IntrinsicSize {
        self.size
    }
}

/// The box an item occupies in a layout.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position<K> {
    pub key: K,
    /// Index of the item in the input sequence.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl<K> Position<K> {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// A complete masonry layout.
///
/// Layouts are replaced wholesale; positions are never patched in place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout<K> {
    /// One position per input item, in input order.
    pub positions: Vec<Position<K>>,
    /// `max(column_heights) - gap`, or `0` for an empty layout.
    pub total_height: f64,
    /// Always `>= 1`.
    pub column_count: usize,
    pub column_width: f64,
    /// Running bottom of each column, including the trailing gap.
    pub column_heights: Vec<f64>,
}

impl<K> Layout<K> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Difference between the tallest and the shortest column.
    pub fn column_spread(&self) -> f64 {
        let mut lo = f64::INFINITY;
        let mut hi = 0.0f64;
        for &h in &self.column_heights {
            lo = lo.min(h);
            hi = hi.max(h);
        }
        if lo.is_finite() { hi - lo } else { 0.0 }
    }
}

impl<K> Default for Layout<K> {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            total_height: 0.0,
            column_count: 1,
            column_width: 0.0,
            column_heights: vec![0.0],
        }
    }
}

/// Result of reporting a rendered height to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureOutcome {
    /// First measurement for the key; the cache changed.
    Inserted,
    /// The new height differed from the cached one by at least the threshold.
    Updated { previous: f64 },
    /// Within the hysteresis band; nothing changed.
    Ignored,
    /// Non-finite or negative height; nothing changed.
    Rejected,
}

impl MeasureOutcome {
    /// Whether the cache changed (and a relayout follows).
    pub fn is_material(self) -> bool {
        matches!(self, Self::Inserted | Self::Updated { .. })
    }
}

/// Clamps a geometry input to a finite, non-negative value.
pub(crate) fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
