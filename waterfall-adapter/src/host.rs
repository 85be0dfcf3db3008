/// Geometry reported by the host on resize.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostGeometry {
    /// Height of the window (or outer scroll element).
    pub window_height: f64,
    /// Distance from the top of the window to the top of the feed container.
    pub container_top: f64,
    pub container_width: f64,
}

impl HostGeometry {
    pub fn new(window_height: f64, container_top: f64, container_width: f64) -> Self {
        Self {
            window_height,
            container_top,
            container_width,
        }
    }

    /// The part of the window the feed can use: `window_height - max(0, container_top)`.
    ///
    /// Falls back to the whole window height when that is empty (e.g. before the container has
    /// been laid out, or when it starts below the fold).
    pub fn viewport_height(&self) -> f64 {
        let window = finite_non_negative(self.window_height);
        let top = finite_non_negative(self.container_top);
        let available = (window - top).max(0.0);
        if available > 0.0 { available } else { window }
    }
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
