use core::fmt;

/// Diagnostics for a performance overlay.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Cards rendered right now.
    pub rendered: usize,
    pub total: usize,
    /// Cached measurements.
    pub cache_size: usize,
    pub overscan: f64,
    pub virtualization_enabled: bool,
    pub layout_version: u64,
    pub relayouts: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Virtualization: {} | Overscan: {} | Rendered: {} | Total: {} | Height Cache: {}",
            if self.virtualization_enabled { "ON" } else { "OFF" },
            self.overscan,
            self.rendered,
            self.total,
            self.cache_size,
        )
    }
}
