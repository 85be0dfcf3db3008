use alloc::vec::Vec;

use crate::Position;
use crate::types::non_negative;

/// The vertical band `[low, high]` that must be rendered: the viewport expanded by `overscan`
/// on both sides (and clipped at the top of the content).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleWindow {
    pub low: f64,
    pub high: f64,
}

impl VisibleWindow {
    pub fn new(scroll_offset: f64, viewport_height: f64, overscan: f64) -> Self {
        // Negative offsets (overscroll) are kept; only the low edge stops at the content top.
        let scroll_offset = if scroll_offset.is_finite() { scroll_offset } else { 0.0 };
        let overscan = non_negative(overscan);
        Self {
            low: (scroll_offset - overscan).max(0.0),
            high: scroll_offset + non_negative(viewport_height) + overscan,
        }
    }

    /// Whether `[y, y + height]` touches the window (edges count).
    pub fn intersects<K>(&self, position: &Position<K>) -> bool {
        position.bottom() >= self.low && position.y <= self.high
    }

    /// Whether `other` lies entirely inside this window.
    pub fn contains(&self, other: &VisibleWindow) -> bool {
        self.low <= other.low && self.high >= other.high
    }
}

/// Calls `f` for every position intersecting `window`, in input order.
pub fn for_each_visible<'a, K>(
    positions: &'a [Position<K>],
    window: VisibleWindow,
    mut f: impl FnMut(&'a Position<K>),
) {
    for p in positions {
        if window.intersects(p) {
            f(p);
        }
    }
}

/// Returns the positions intersecting the overscanned viewport.
///
/// This is a stable filter: the output keeps the input order, so render order (and therefore
/// focus order) matches the logical item order.
pub fn visible<K: Clone>(
    positions: &[Position<K>],
    scroll_offset: f64,
    viewport_height: f64,
    overscan: f64,
) -> Vec<Position<K>> {
    let window = VisibleWindow::new(scroll_offset, viewport_height, overscan);
    let mut out = Vec::new();
    for_each_visible(positions, window, |p| out.push(p.clone()));
    out
}
