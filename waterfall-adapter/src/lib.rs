//! Adapter utilities for the `waterfall` crate.
//!
//! The `waterfall` crate is UI-agnostic and focuses on the layout math and state. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A [`Controller`] that coalesces scroll, resize and measurement events to one update per
//!   frame
//! - Per-view scroll restoration backed by a session-style [`ScrollStore`]
//! - Host geometry and diagnostics helpers ([`HostGeometry`], [`Stats`])
//!
//! This crate is intentionally framework-agnostic (no DOM or widget bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod host;
mod stats;
mod store;
mod throttle;

#[cfg(test)]
mod tests;

pub use controller::{Controller, ControllerOptions};
pub use error::{Error, Result};
pub use host::HostGeometry;
pub use stats::Stats;
pub use store::{
    MemoryScrollStore, ScrollStore, format_scroll_offset, parse_scroll_offset, read_scroll_offset,
    restore_key,
};
pub use throttle::FrameThrottle;
