use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use crate::layout::{ColumnPacker, LayoutParams};
use crate::types::non_negative;
use crate::{
    FrameState, HeightCache, HeightEstimate, Layout, MasonryItem, MasonryOptions, MeasureOutcome,
    Position, VisibleWindow,
};

/// What the next relayout has to redo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Invalidation {
    Clean,
    /// Items were appended starting at this index; earlier positions are still valid.
    Append(usize),
    Full,
}

impl Invalidation {
    fn merge(self, next: Self) -> Self {
        match (self, next) {
            (Self::Full, _) | (_, Self::Full) => Self::Full,
            (Self::Append(a), Self::Append(b)) => Self::Append(a.min(b)),
            (Self::Clean, other) | (other, Self::Clean) => other,
        }
    }
}

/// A headless masonry engine.
///
/// Owns the item list, the height cache and the host-driven geometry (scroll offset, viewport
/// height, container width), and keeps a memoized [`Layout`] in sync with them:
/// - Geometry and measurement changes invalidate the layout; the next flush recomputes it.
/// - Outside of [`Masonry::batch_update`] every mutation flushes immediately.
/// - Inside a batch, any number of mutations collapse into one relayout and one `on_change`.
///
/// It does not hold any UI objects. Rendering is exposed via iteration over the visible
/// positions (`for_each_visible`), each paired with its source item.
#[derive(Clone)]
pub struct Masonry<T: MasonryItem> {
    options: MasonryOptions<T>,
    items: Vec<T>,

    container_width: f64,
    viewport_height: f64,
    scroll_offset: f64,

    cache: HeightCache<T::Key>,
    layout: Layout<T::Key>,
    laid_out_version: u64,
    invalidation: Invalidation,
    relayouts: u64,

    batch_depth: usize,
    notify_pending: bool,
}

impl<T: MasonryItem> Masonry<T> {
    pub fn new(options: MasonryOptions<T>) -> Self {
        Self::with_items(options, Vec::new())
    }

    pub fn with_items(options: MasonryOptions<T>, items: Vec<T>) -> Self {
        vdebug!(
            items = items.len(),
            gap = options.gap,
            min_column_width = options.min_column_width,
            "Masonry::new"
        );
        let mut m = Self {
            container_width: non_negative(options.initial_container_width),
            viewport_height: non_negative(options.initial_viewport_height),
            scroll_offset: non_negative(options.initial_scroll_offset),
            options,
            items,
            cache: HeightCache::new(),
            layout: Layout::default(),
            laid_out_version: 0,
            invalidation: Invalidation::Full,
            relayouts: 0,
            batch_depth: 0,
            notify_pending: false,
        };
        m.relayout();
        m
    }

    pub fn options(&self) -> &MasonryOptions<T> {
        &self.options
    }

    pub fn set_options(&mut self, options: MasonryOptions<T>) {
        let geometry_changed = self.options.gap != options.gap
            || self.options.min_column_width != options.min_column_width
            || self.options.estimate != options.estimate;
        self.options = options;
        vtrace!(
            gap = self.options.gap,
            min_column_width = self.options.min_column_width,
            overscan = self.options.overscan,
            enabled = self.options.enabled,
            "Masonry::set_options"
        );
        if geometry_changed {
            self.invalidate(Invalidation::Full);
        } else {
            self.notify();
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut MasonryOptions<T>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Masonry<T>) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    /// Batches multiple updates into a single relayout and `on_change` notification.
    ///
    /// Queries made inside `f` observe the layout as it was before the batch.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);

        f(self);

        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);

        if self.batch_depth == 0 && mem::replace(&mut self.notify_pending, false) {
            self.flush();
        }
    }

    fn invalidate(&mut self, next: Invalidation) {
        self.invalidation = self.invalidation.merge(next);
        self.notify();
    }

    fn notify(&mut self) {
        if self.batch_depth > 0 {
            self.notify_pending = true;
            return;
        }
        self.flush();
    }

    fn flush(&mut self) {
        if self.invalidation != Invalidation::Clean {
            self.relayout();
        }
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn layout_params(&self) -> LayoutParams {
        LayoutParams::new(
            self.container_width,
            self.options.gap,
            self.options.min_column_width,
        )
        .with_estimate(self.options.estimate)
    }

    fn relayout(&mut self) {
        #[cfg(feature = "tracing")]
        let started = std::time::Instant::now();

        let params = self.layout_params();
        let invalidation = mem::replace(&mut self.invalidation, Invalidation::Clean);
        let resumable = match invalidation {
            Invalidation::Append(start) => {
                start <= self.items.len()
                    && self.cache.version() == self.laid_out_version
                    && self.layout.len() == start
            }
            _ => false,
        };

        let mut packer = None;
        if resumable {
            match ColumnPacker::resume(mem::take(&mut self.layout), &params) {
                Ok(p) => packer = Some(p),
                Err(previous) => self.layout = previous,
            }
        }
        #[cfg(feature = "tracing")]
        let incremental = packer.is_some();
        let mut packer = packer.unwrap_or_else(|| ColumnPacker::new(&params));

        let start = packer.placed();
        packer.reserve(self.items.len().saturating_sub(start));
        for item in &self.items[start..] {
            packer.place(item, &self.cache);
        }
        self.layout = packer.finish();
        self.laid_out_version = self.cache.version();
        self.relayouts = self.relayouts.wrapping_add(1);

        #[cfg(feature = "tracing")]
        vdebug!(
            items = self.items.len(),
            placed = self.items.len() - start,
            incremental,
            columns = self.layout.column_count,
            total_height = self.layout.total_height,
            elapsed_us = started.elapsed().as_micros() as u64,
            "relayout"
        );
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the item list.
    ///
    /// When the new list starts with the current one (same keys and intrinsic sizes), only the
    /// new tail is placed. Otherwise the layout is recomputed from scratch. Cached heights are
    /// kept either way.
    pub fn set_items(&mut self, items: Vec<T>) {
        let prefix = self.items.len();
        let extends = prefix <= items.len()
            && self.items.iter().zip(&items).all(|(a, b)| {
                a.key() == b.key() && a.intrinsic_size() == b.intrinsic_size()
            });
        vtrace!(prev = prefix, next = items.len(), extends, "Masonry::set_items");
        self.items = items;
        if extends {
            if self.items.len() == prefix {
                return;
            }
            self.invalidate(Invalidation::Append(prefix));
        } else {
            self.invalidate(Invalidation::Full);
        }
    }

    pub fn append_items(&mut self, items: impl IntoIterator<Item = T>) {
        let start = self.items.len();
        self.items.extend(items);
        if self.items.len() == start {
            return;
        }
        vtrace!(start, appended = self.items.len() - start, "Masonry::append_items");
        self.invalidate(Invalidation::Append(start));
    }

    pub fn clear_items(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.invalidate(Invalidation::Full);
    }

    /// Reports the rendered height of the item with `key`.
    ///
    /// The cache is written (and a relayout follows) when the key was never measured, or when
    /// the height moved by at least `measure_threshold`. Keys that are not part of the current
    /// item list are cached all the same; they simply do not affect the layout.
    pub fn measure(&mut self, key: T::Key, height: f64) -> MeasureOutcome {
        let outcome = self.cache.record(key, height, self.options.threshold());
        match outcome {
            MeasureOutcome::Rejected => {
                vwarn!(height, "Masonry::measure: rejected height");
            }
            MeasureOutcome::Ignored => {}
            _ => {
                vtrace!(height, version = self.cache.version(), "Masonry::measure");
                self.invalidate(Invalidation::Full);
            }
        }
        outcome
    }

    /// Applies several measurements with at most one relayout. Returns how many were material.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (T::Key, f64)>) -> usize {
        let mut applied = 0usize;
        self.batch_update(|m| {
            for (key, height) in measurements {
                if m.measure(key, height).is_material() {
                    applied += 1;
                }
            }
        });
        applied
    }

    pub fn cached_height(&self, key: &T::Key) -> Option<f64> {
        self.cache.get(key)
    }

    /// Number of cached measurements.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn height_cache(&self) -> &HeightCache<T::Key> {
        &self.cache
    }

    /// Exports the cached measurements (useful for persistence).
    pub fn export_height_cache(&self) -> Vec<(T::Key, f64)> {
        self.cache.export()
    }

    /// Replaces the cached measurements. Non-finite and negative heights are skipped.
    pub fn import_height_cache(&mut self, entries: impl IntoIterator<Item = (T::Key, f64)>) {
        self.cache.replace(entries);
        vdebug!(entries = self.cache.len(), "import_height_cache");
        self.invalidate(Invalidation::Full);
    }

    pub fn reset_measurements(&mut self) {
        if self.cache.is_empty() {
            return;
        }
        self.cache.clear();
        self.invalidate(Invalidation::Full);
    }

    /// Bumps whenever the height cache changes materially.
    pub fn layout_version(&self) -> u64 {
        self.cache.version()
    }

    /// Number of layout passes run so far (full or incremental).
    pub fn relayout_count(&self) -> u64 {
        self.relayouts
    }

    pub fn layout(&self) -> &Layout<T::Key> {
        &self.layout
    }

    pub fn positions(&self) -> &[Position<T::Key>] {
        &self.layout.positions
    }

    pub fn total_height(&self) -> f64 {
        self.layout.total_height
    }

    pub fn column_count(&self) -> usize {
        self.layout.column_count
    }

    pub fn column_width(&self) -> f64 {
        self.layout.column_width
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        let offset = non_negative(offset);
        if self.scroll_offset == offset {
            return;
        }
        self.scroll_offset = offset;
        self.notify();
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        let height = non_negative(height);
        if self.viewport_height == height {
            return;
        }
        self.viewport_height = height;
        self.notify();
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Updates the container width. Any change recomputes column count and width.
    pub fn set_container_width(&mut self, width: f64) {
        let width = non_negative(width);
        if self.container_width == width {
            return;
        }
        vtrace!(from = self.container_width, to = width, "set_container_width");
        self.container_width = width;
        self.invalidate(Invalidation::Full);
    }

    /// Applies viewport height, container width and scroll offset as one update.
    pub fn set_viewport(&mut self, viewport_height: f64, container_width: f64, scroll_offset: f64) {
        self.batch_update(|m| {
            m.set_viewport_height(viewport_height);
            m.set_container_width(container_width);
            m.set_scroll_offset(scroll_offset);
        });
    }

    pub fn set_gap(&mut self, gap: f64) {
        if self.options.gap == gap {
            return;
        }
        self.options.gap = gap;
        self.invalidate(Invalidation::Full);
    }

    pub fn set_min_column_width(&mut self, min_column_width: f64) {
        if self.options.min_column_width == min_column_width {
            return;
        }
        self.options.min_column_width = min_column_width;
        self.invalidate(Invalidation::Full);
    }

    pub fn set_estimate(&mut self, estimate: HeightEstimate) {
        if self.options.estimate == estimate {
            return;
        }
        self.options.estimate = estimate;
        self.invalidate(Invalidation::Full);
    }

    pub fn overscan(&self) -> f64 {
        self.options.overscan
    }

    pub fn set_overscan(&mut self, overscan: f64) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    /// Toggles virtualization. When disabled, every position is visible.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        self.notify();
    }

    /// The overscanned band around the current viewport.
    pub fn window(&self) -> VisibleWindow {
        VisibleWindow::new(self.scroll_offset, self.viewport_height, self.options.overscan)
    }

    /// Calls `f` for every position to render, in item order, with its source item.
    pub fn for_each_visible(&self, mut f: impl FnMut(&Position<T::Key>, &T)) {
        let window = self.window();
        let enabled = self.options.enabled;
        for p in &self.layout.positions {
            if enabled && !window.intersects(p) {
                continue;
            }
            // Inside a batch the layout may lag behind a replaced item list.
            if let Some(item) = self.items.get(p.index) {
                f(p, item);
            }
        }
    }

    /// Collects the positions to render into `out` (clears `out` first).
    pub fn collect_visible(&self, out: &mut Vec<Position<T::Key>>) {
        out.clear();
        self.for_each_visible(|p, _| out.push(p.clone()));
    }

    pub fn visible_count(&self) -> usize {
        let mut n = 0usize;
        self.for_each_visible(|_, _| n += 1);
        n
    }

    /// Returns a snapshot of the host-driven state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            scroll_offset: self.scroll_offset,
            viewport_height: self.viewport_height,
            container_width: self.container_width,
        }
    }

    /// Restores a previously captured snapshot in a single update.
    pub fn restore_frame_state(&mut self, frame: FrameState) {
        self.set_viewport(
            frame.viewport_height,
            frame.container_width,
            frame.scroll_offset,
        );
    }
}

impl<T: MasonryItem> core::fmt::Debug for Masonry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Masonry")
            .field("options", &self.options)
            .field("items", &self.items.len())
            .field("container_width", &self.container_width)
            .field("viewport_height", &self.viewport_height)
            .field("scroll_offset", &self.scroll_offset)
            .field("cached", &self.cache.len())
            .field("layout_version", &self.cache.version())
            .field("column_count", &self.layout.column_count)
            .field("total_height", &self.layout.total_height)
            .finish_non_exhaustive()
    }
}
