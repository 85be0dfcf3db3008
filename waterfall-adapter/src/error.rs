use alloc::string::String;

use thiserror::Error;

/// Result type for adapter operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised at the adapter's host-facing seams.
///
/// The controller never hands these to its caller: an unreadable scroll record restores to
/// offset 0 and a failed write is logged and dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A persisted scroll offset is not a finite number.
    #[error("invalid scroll record {raw:?}")]
    InvalidScrollRecord { raw: String },

    /// The scroll store refused a write.
    #[error("scroll store write failed for {key:?}: {reason}")]
    Store { key: String, reason: String },
}
