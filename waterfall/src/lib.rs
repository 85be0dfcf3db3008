//! A headless, virtualized masonry (waterfall) layout engine.
//!
//! For host-facing utilities (frame coalescing, scroll restore), see the `waterfall-adapter`
//! crate.
//!
//! This crate focuses on the core algorithms needed to render feeds of thousands of cards with
//! unknown heights at interactive frame rates: greedy shortest-column packing, overscanned
//! visibility windows, and a measurement cache with hysteresis that feeds real rendered heights
//! back into the layout.
//!
//! It is UI-agnostic. A TUI/GUI/DOM layer is expected to provide:
//! - container width and viewport height
//! - scroll offset
//! - rendered heights of the cards it draws
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod key;
mod layout;
mod masonry;
mod options;
mod state;
mod types;
mod window;


pub use cache::HeightCache;
pub use key::{ItemKey, KeyMap};
pub use layout::{
    ColumnPacker, HeightEstimate, LayoutParams, MAX_COLUMNS, MIN_COLUMN_WIDTH_FLOOR, layout,
    layout_with,
};
pub use masonry::Masonry;
pub use options::{
    DEFAULT_CONTAINER_WIDTH, DEFAULT_GAP, DEFAULT_MEASURE_THRESHOLD, DEFAULT_MIN_COLUMN_WIDTH,
    DEFAULT_OVERSCAN, MasonryOptions, OnChangeCallback,
};
pub use state::FrameState;
pub use types::{IntrinsicSize, Layout, MasonryItem, MeasureOutcome, Position, Tile};
pub use window::{VisibleWindow, for_each_visible, visible};
