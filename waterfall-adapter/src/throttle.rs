/// Coalesces values reported between two frames into the latest one.
///
/// The host reports every event through [`FrameThrottle::schedule`] and drains the throttle
/// once per frame with [`FrameThrottle::take`]. However many events arrive in between, at
/// most one value comes out per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameThrottle<T> {
    pending: Option<T>,
}

impl<T> FrameThrottle<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Records `value`, replacing any value not yet taken.
    ///
    /// Returns `true` for the first value since the last `take` (the host should then request
    /// a frame), `false` when one is already pending.
    pub fn schedule(&mut self, value: T) -> bool {
        self.pending.replace(value).is_none()
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }
}

impl<T> Default for FrameThrottle<T> {
    fn default() -> Self {
        Self::new()
    }
}
