use alloc::sync::Arc;

use crate::masonry::Masonry;
use crate::{HeightEstimate, MasonryItem};

/// A callback fired after the engine's state changed (and after any pending relayout ran).
pub type OnChangeCallback<T> = Arc<dyn Fn(&Masonry<T>) + Send + Sync>;

pub const DEFAULT_GAP: f64 = 14.0;
pub const DEFAULT_MIN_COLUMN_WIDTH: f64 = 250.0;
pub const DEFAULT_OVERSCAN: f64 = 900.0;
pub const DEFAULT_MEASURE_THRESHOLD: f64 = 2.0;
/// Container width assumed until the host reports a real one.
pub const DEFAULT_CONTAINER_WIDTH: f64 = 960.0;

/// Configuration for [`crate::Masonry`].
///
/// Cheap to clone: the only heavy field (`on_change`) is stored in an `Arc`.
pub struct MasonryOptions<T: MasonryItem> {
    /// Horizontal and vertical space between cards, in pixels.
    pub gap: f64,
    /// Columns never render narrower than this.
    pub min_column_width: f64,
    /// Extra pixels rendered above and below the viewport.
    pub overscan: f64,
    pub estimate: HeightEstimate,

    /// Measurements closer than this to the cached height are ignored.
    pub measure_threshold: f64,

    /// When disabled, every position is reported as visible (full rendering).
    pub enabled: bool,

    pub initial_container_width: f64,
    pub initial_viewport_height: f64,
    pub initial_scroll_offset: f64,

    pub on_change: Option<OnChangeCallback<T>>,
}

impl<T: MasonryItem> Clone for MasonryOptions<T> {
    fn clone(&self) -> Self {
        Self {
            gap: self.gap,
            min_column_width: self.min_column_width,
            overscan: self.overscan,
            estimate: self.estimate,
            measure_threshold: self.measure_threshold,
            enabled: self.enabled,
            initial_container_width: self.initial_container_width,
            initial_viewport_height: self.initial_viewport_height,
            initial_scroll_offset: self.initial_scroll_offset,
            on_change: self.on_change.clone(),
        }
    }
}

impl<T: MasonryItem> Default for MasonryOptions<T> {
    fn default() -> Self {
        Self::new(DEFAULT_GAP, DEFAULT_MIN_COLUMN_WIDTH)
    }
}

impl<T: MasonryItem> MasonryOptions<T> {
    pub fn new(gap: f64, min_column_width: f64) -> Self {
        Self {
            gap,
            min_column_width,
            overscan: DEFAULT_OVERSCAN,
            estimate: HeightEstimate::default(),
            measure_threshold: DEFAULT_MEASURE_THRESHOLD,
            enabled: true,
            initial_container_width: DEFAULT_CONTAINER_WIDTH,
            initial_viewport_height: 0.0,
            initial_scroll_offset: 0.0,
            on_change: None,
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_min_column_width(mut self, min_column_width: f64) -> Self {
        self.min_column_width = min_column_width;
        self
    }

    pub fn with_overscan(mut self, overscan: f64) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_estimate(mut self, estimate: HeightEstimate) -> Self {
        self.estimate = estimate;
        self
    }

    pub fn with_measure_threshold(mut self, threshold: f64) -> Self {
        self.measure_threshold = threshold;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_initial_container_width(mut self, width: f64) -> Self {
        self.initial_container_width = width;
        self
    }

    pub fn with_initial_viewport_height(mut self, height: f64) -> Self {
        self.initial_viewport_height = height;
        self
    }

    pub fn with_initial_scroll_offset(mut self, offset: f64) -> Self {
        self.initial_scroll_offset = offset;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Masonry<T>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn threshold(&self) -> f64 {
        if self.measure_threshold.is_finite() && self.measure_threshold > 0.0 {
            self.measure_threshold
        } else {
            0.0
        }
    }
}

impl<T: MasonryItem> core::fmt::Debug for MasonryOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MasonryOptions")
            .field("gap", &self.gap)
            .field("min_column_width", &self.min_column_width)
            .field("overscan", &self.overscan)
            .field("estimate", &self.estimate)
            .field("measure_threshold", &self.measure_threshold)
            .field("enabled", &self.enabled)
            .field("initial_container_width", &self.initial_container_width)
            .field("initial_viewport_height", &self.initial_viewport_height)
            .field("initial_scroll_offset", &self.initial_scroll_offset)
            .finish_non_exhaustive()
    }
}
