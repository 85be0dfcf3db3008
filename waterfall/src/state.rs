/// A lightweight, serializable snapshot of the engine's host-driven state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
///
/// This is useful for restoring a view after navigation without keeping the engine alive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub scroll_offset: f64,
    pub viewport_height: f64,
    pub container_width: f64,
}
