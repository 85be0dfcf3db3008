use alloc::string::String;
use alloc::vec::Vec;

use waterfall::{KeyMap, Masonry, MasonryItem, MasonryOptions, MeasureOutcome, Position};

use crate::{
    FrameThrottle, HostGeometry, ScrollStore, Stats, format_scroll_offset, read_scroll_offset,
};

/// Configuration for [`Controller`].
pub struct ControllerOptions<T: MasonryItem> {
    pub masonry: MasonryOptions<T>,
    /// Write the scroll offset to the store on every applied scroll tick.
    pub persist_scroll: bool,
}

impl<T: MasonryItem> ControllerOptions<T> {
    pub fn new(masonry: MasonryOptions<T>) -> Self {
        Self {
            masonry,
            persist_scroll: true,
        }
    }

    pub fn with_persist_scroll(mut self, persist_scroll: bool) -> Self {
        self.persist_scroll = persist_scroll;
        self
    }
}

impl<T: MasonryItem> Default for ControllerOptions<T> {
    fn default() -> Self {
        Self::new(MasonryOptions::default())
    }
}

impl<T: MasonryItem> Clone for ControllerOptions<T> {
    fn clone(&self) -> Self {
        Self {
            masonry: self.masonry.clone(),
            persist_scroll: self.persist_scroll,
        }
    }
}

impl<T: MasonryItem> core::fmt::Debug for ControllerOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("masonry", &self.masonry)
            .field("persist_scroll", &self.persist_scroll)
            .finish()
    }
}

/// A framework-neutral controller that wraps a `waterfall::Masonry` and binds it to a host's
/// event loop.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` / `measure` when UI events occur; each returns `true` when the
///   host should request a frame (at most once between two frames)
/// - `on_frame()` once per requested frame, before painting
///
/// Everything reported between two frames is applied in `on_frame` as a single update, so a
/// burst of scroll, resize and measurement events costs at most one relayout per frame.
///
/// Scroll offsets are persisted per restore key in a [`ScrollStore`]; switching keys restores
/// the offset last recorded for the new key.
pub struct Controller<T: MasonryItem, S: ScrollStore> {
    m: Masonry<T>,
    store: S,
    restore_key: String,
    persist_scroll: bool,

    scroll: FrameThrottle<f64>,
    resize: FrameThrottle<HostGeometry>,
    /// Latest reported height per key since the previous frame.
    measurements: KeyMap<T::Key, f64>,

    scroll_request: Option<f64>,
}

impl<T: MasonryItem, S: ScrollStore> Controller<T, S> {
    /// Creates a controller and restores the scroll offset recorded for `restore_key`.
    pub fn new(options: ControllerOptions<T>, store: S, restore_key: impl Into<String>) -> Self {
        let mut c = Self {
            m: Masonry::new(options.masonry),
            store,
            restore_key: restore_key.into(),
            persist_scroll: options.persist_scroll,
            scroll: FrameThrottle::new(),
            resize: FrameThrottle::new(),
            measurements: KeyMap::new(),
            scroll_request: None,
        };
        c.restore();
        c
    }

    pub fn masonry(&self) -> &Masonry<T> {
        &self.m
    }

    pub fn masonry_mut(&mut self) -> &mut Masonry<T> {
        &mut self.m
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_parts(self) -> (Masonry<T>, S) {
        (self.m, self.store)
    }

    pub fn restore_key(&self) -> &str {
        &self.restore_key
    }

    /// Switches the logical view (e.g. another tab or filter).
    ///
    /// A scroll tick still pending for the previous key is recorded under that key first. Then
    /// the record for the new key is read once; a positive offset is applied and returned as
    /// the position the host must jump to. Setting the current key again does nothing.
    pub fn set_restore_key(&mut self, key: impl Into<String>) -> Option<f64> {
        let key = key.into();
        if key == self.restore_key {
            return None;
        }
        if let Some(offset) = self.scroll.take() {
            self.m.set_scroll_offset(offset);
            self.persist(offset);
        }
        vdebug!(from = %self.restore_key, to = %key, "set_restore_key");
        self.restore_key = key;
        self.restore()
    }

    fn restore(&mut self) -> Option<f64> {
        let offset = read_scroll_offset(&self.store, &self.restore_key);
        if offset > 0.0 {
            vtrace!(key = %self.restore_key, offset, "restoring scroll offset");
            self.m.set_scroll_offset(offset);
            self.scroll_request = Some(offset);
            return Some(offset);
        }
        None
    }

    /// Takes the pending "jump to this offset" request produced by a restore.
    pub fn take_scroll_request(&mut self) -> Option<f64> {
        self.scroll_request.take()
    }

    /// Whether something is waiting for the next `on_frame`.
    pub fn is_frame_requested(&self) -> bool {
        self.scroll.is_scheduled() || self.resize.is_scheduled() || !self.measurements.is_empty()
    }

    /// Number of keys with a height report waiting for the next frame.
    pub fn pending_measurements(&self) -> usize {
        self.measurements.len()
    }

    /// Call this on every scroll event. Later events in the same frame replace earlier ones.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        let idle = !self.resize.is_scheduled() && self.measurements.is_empty();
        self.scroll.schedule(offset) && idle
    }

    /// Call this when the window or the container is resized.
    pub fn on_resize(&mut self, geometry: HostGeometry) -> bool {
        let idle = !self.scroll.is_scheduled() && self.measurements.is_empty();
        self.resize.schedule(geometry) && idle
    }

    /// Reports the rendered height of the card for `key`.
    ///
    /// The measurement is applied (with the engine's hysteresis) on the next frame. A later
    /// report for the same key in the same frame replaces the earlier one.
    pub fn measure(&mut self, key: T::Key, height: f64) -> bool {
        let idle = !self.is_frame_requested();
        self.measurements.insert(key, height);
        idle
    }

    /// Applies everything reported since the previous frame in one update.
    ///
    /// Returns `false` when there was nothing to apply.
    pub fn on_frame(&mut self) -> bool {
        let resize = self.resize.take();
        let scroll = self.scroll.take();
        if resize.is_none() && scroll.is_none() && self.measurements.is_empty() {
            return false;
        }

        let measurements = core::mem::take(&mut self.measurements);
        vtrace!(
            resized = resize.is_some(),
            scroll = ?scroll,
            measurements = measurements.len(),
            "on_frame"
        );
        self.m.batch_update(|m| {
            if let Some(g) = resize {
                m.set_viewport_height(g.viewport_height());
                m.set_container_width(g.container_width);
            }
            for (key, height) in measurements {
                m.measure(key, height);
            }
            if let Some(offset) = scroll {
                m.set_scroll_offset(offset);
            }
        });

        if let Some(offset) = scroll {
            self.persist(offset);
        }
        true
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn persist(&mut self, offset: f64) {
        if !self.persist_scroll {
            return;
        }
        if let Err(err) = self
            .store
            .set(&self.restore_key, format_scroll_offset(offset))
        {
            vwarn!(key = %self.restore_key, error = %err, "failed to persist scroll offset");
        }
    }

    /// Applies a measurement immediately, bypassing frame coalescing.
    pub fn measure_now(&mut self, key: T::Key, height: f64) -> MeasureOutcome {
        self.m.measure(key, height)
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.m.set_items(items);
    }

    pub fn append_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.m.append_items(items);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.m.set_enabled(enabled);
    }

    pub fn set_overscan(&mut self, overscan: f64) {
        self.m.set_overscan(overscan);
    }

    pub fn total_height(&self) -> f64 {
        self.m.total_height()
    }

    pub fn cache_len(&self) -> usize {
        self.m.cache_len()
    }

    pub fn for_each_visible(&self, f: impl FnMut(&Position<T::Key>, &T)) {
        self.m.for_each_visible(f);
    }

    pub fn collect_visible(&self, out: &mut Vec<Position<T::Key>>) {
        self.m.collect_visible(out);
    }

    pub fn stats(&self) -> Stats {
        Stats {
            rendered: self.m.visible_count(),
            total: self.m.len(),
            cache_size: self.m.cache_len(),
            overscan: self.m.overscan(),
            virtualization_enabled: self.m.enabled(),
            layout_version: self.m.layout_version(),
            relayouts: self.m.relayout_count(),
        }
    }
}

impl<T: MasonryItem, S: ScrollStore> core::fmt::Debug for Controller<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("masonry", &self.m)
            .field("restore_key", &self.restore_key)
            .field("persist_scroll", &self.persist_scroll)
            .field("pending_scroll", &self.scroll.peek())
            .field("pending_resize", &self.resize.peek())
            .field("pending_measurements", &self.measurements.len())
            .finish_non_exhaustive()
    }
}
