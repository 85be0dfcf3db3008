use alloc::vec;
use alloc::vec::Vec;

use crate::types::non_negative;
use crate::{HeightCache, IntrinsicSize, ItemKey, Layout, MasonryItem, Position};

/// Column width used in place of a non-positive or non-finite `min_column_width`.
pub const MIN_COLUMN_WIDTH_FLOOR: f64 = 1.0;

/// Upper bound on the derived column count.
pub const MAX_COLUMNS: usize = 4096;

/// Height estimate for items that have not been measured yet.
///
/// `max(min_media_height, aspect * column_width) + metadata_height`, where `aspect` is
/// `intrinsic.height / intrinsic.width` and `metadata_height` accounts for the text and
/// controls rendered below the media.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightEstimate {
    pub min_media_height: f64,
    pub metadata_height: f64,
}

impl HeightEstimate {
    pub const DEFAULT_MIN_MEDIA_HEIGHT: f64 = 120.0;
    pub const DEFAULT_METADATA_HEIGHT: f64 = 108.0;

    pub fn new(min_media_height: f64, metadata_height: f64) -> Self {
        Self {
            min_media_height,
            metadata_height,
        }
    }

    pub fn estimate(&self, intrinsic: IntrinsicSize, column_width: f64) -> f64 {
        let floor = non_negative(self.min_media_height);
        let aspect = intrinsic.height / intrinsic.width;
        // A zero or non-finite intrinsic size gives no usable aspect; fall back to the floor.
        let media = if intrinsic.width > 0.0 && aspect.is_finite() {
            floor.max(aspect * column_width)
        } else {
            floor
        };
        media + non_negative(self.metadata_height)
    }
}

impl Default for HeightEstimate {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MIN_MEDIA_HEIGHT,
            Self::DEFAULT_METADATA_HEIGHT,
        )
    }
}

/// Geometry inputs of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutParams {
    pub container_width: f64,
    pub gap: f64,
    pub min_column_width: f64,
    pub estimate: HeightEstimate,
}

impl LayoutParams {
    pub fn new(container_width: f64, gap: f64, min_column_width: f64) -> Self {
        Self {
            container_width,
            gap,
            min_column_width,
            estimate: HeightEstimate::default(),
        }
    }

    pub fn with_estimate(mut self, estimate: HeightEstimate) -> Self {
        self.estimate = estimate;
        self
    }

    /// Returns a copy with every input clamped into its valid domain.
    pub fn sanitized(self) -> Self {
        let min_column_width = if self.min_column_width.is_finite() && self.min_column_width > 0.0 {
            self.min_column_width
        } else {
            vwarn!(
                min_column_width = self.min_column_width,
                "min_column_width out of range, clamping"
            );
            MIN_COLUMN_WIDTH_FLOOR
        };
        Self {
            container_width: non_negative(self.container_width),
            gap: non_negative(self.gap),
            min_column_width,
            estimate: self.estimate,
        }
    }

    /// Derives the column count and the shared column width.
    ///
    /// The container is widened to at least one column, so the count is never below 1 and
    /// columns never render narrower than `min_column_width`.
    pub fn columns(&self) -> (usize, f64) {
        let p = self.sanitized();
        let effective = p.container_width.max(p.min_column_width);
        // Both operands are positive, so the truncating cast is a floor.
        let fit = ((effective + p.gap) / (p.min_column_width + p.gap)) as usize;
        let mut count = fit.max(1);
        if count > MAX_COLUMNS {
            vwarn!(count, max = MAX_COLUMNS, "column count capped");
            count = MAX_COLUMNS;
        }
        let width = (effective - p.gap * (count - 1) as f64) / count as f64;
        (count, width)
    }
}

/// Greedy shortest-column packer.
///
/// Items are placed in input order into the column with the strictly smallest running height
/// (lowest index wins ties). A packer can be resumed from a finished [`Layout`] to place more
/// items, which yields exactly the layout a fresh pass over the whole sequence would produce.
#[derive(Clone, Debug)]
pub struct ColumnPacker<K> {
    gap: f64,
    column_width: f64,
    estimate: HeightEstimate,
    column_heights: Vec<f64>,
    positions: Vec<Position<K>>,
}

impl<K: ItemKey> ColumnPacker<K> {
    pub fn new(params: &LayoutParams) -> Self {
        let p = params.sanitized();
        let (count, column_width) = p.columns();
        Self {
            gap: p.gap,
            column_width,
            estimate: p.estimate,
            column_heights: vec![0.0; count],
            positions: Vec::new(),
        }
    }

    pub fn with_capacity(params: &LayoutParams, capacity: usize) -> Self {
        let mut packer = Self::new(params);
        packer.positions.reserve_exact(capacity);
        packer
    }

    /// Continues packing after the last position of `layout`.
    ///
    /// Returns the layout back unchanged when it was not produced with `params`.
    pub fn resume(layout: Layout<K>, params: &LayoutParams) -> Result<Self, Layout<K>> {
        let p = params.sanitized();
        let (count, column_width) = p.columns();
        if layout.column_count != count
            || layout.column_width != column_width
            || layout.column_heights.len() != count
        {
            return Err(layout);
        }
        Ok(Self {
            gap: p.gap,
            column_width,
            estimate: p.estimate,
            column_heights: layout.column_heights,
            positions: layout.positions,
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_heights.len()
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    pub fn placed(&self) -> usize {
        self.positions.len()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.positions.reserve(additional);
    }

    /// Index of the shortest column; ties go to the lowest index.
    pub fn shortest_column(&self) -> usize {
        let mut target = 0;
        for (i, &h) in self.column_heights.iter().enumerate().skip(1) {
            if h < self.column_heights[target] {
                target = i;
            }
        }
        target
    }

    pub fn place<T>(&mut self, item: &T, cache: &HeightCache<K>)
    where
        T: MasonryItem<Key = K>,
    {
        let key = item.key();
        let height = match cache.get(&key) {
            Some(h) => h,
            None => self.estimate.estimate(item.intrinsic_size(), self.column_width),
        };
        let column = self.shortest_column();
        let y = self.column_heights[column];
        self.column_heights[column] = y + height + self.gap;
        self.positions.push(Position {
            key,
            index: self.positions.len(),
            x: column as f64 * (self.column_width + self.gap),
            y,
            width: self.column_width,
            height,
        });
    }

    pub fn finish(self) -> Layout<K> {
        let total_height = if self.positions.is_empty() {
            0.0
        } else {
            let tallest = self.column_heights.iter().copied().fold(0.0f64, f64::max);
            (tallest - self.gap).max(0.0)
        };
        Layout {
            positions: self.positions,
            total_height,
            column_count: self.column_heights.len(),
            column_width: self.column_width,
            column_heights: self.column_heights,
        }
    }
}

/// Computes a full masonry layout with the default height estimate.
///
/// Pure: identical inputs (including an identical cache snapshot) produce identical output.
pub fn layout<T: MasonryItem>(
    items: &[T],
    container_width: f64,
    gap: f64,
    min_column_width: f64,
    cache: &HeightCache<T::Key>,
) -> Layout<T::Key> {
    layout_with(
        items,
        &LayoutParams::new(container_width, gap, min_column_width),
        cache,
    )
}

/// Computes a full masonry layout.
pub fn layout_with<T: MasonryItem>(
    items: &[T],
    params: &LayoutParams,
    cache: &HeightCache<T::Key>,
) -> Layout<T::Key> {
    let mut packer = ColumnPacker::with_capacity(params, items.len());
    for item in items {
        packer.place(item, cache);
    }
    packer.finish()
}
