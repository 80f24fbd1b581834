use std::time::Instant;

use thiserror::Error;

use crate::input::RawInput;

/// Why a drawable could not be acquired.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The surface is temporarily unavailable; this frame is skipped.
    #[error("surface temporarily unavailable: {0}")]
    Transient(String),

    /// The surface or device is gone; the run loop terminates.
    #[error("surface failed: {0}")]
    Fatal(String),
}

/// Contract between the dispatch core and the host window/graphics system.
///
/// Construction of the implementor stands in for "create surface": once a
/// value exists, its device, window and view are ready.
pub trait PlatformSurface {
    /// Presentable image handed to the draw callback.
    type Drawable;

    /// Render target for the drawable (e.g. a texture view).
    type Target;

    /// Drains input notifications received since the previous call, in
    /// delivery order.
    fn poll_input(&mut self) -> Vec<RawInput>;

    /// Whether a frame could be produced right now. Returning `false` (e.g.
    /// while minimized) suppresses acquisition without counting a failure.
    fn can_present(&self) -> bool {
        true
    }

    /// Acquires one drawable/target pair for the current frame.
    fn acquire_frame_target(&mut self) -> Result<(Self::Drawable, Self::Target), AcquireError>;

    /// Suspends until input arrives or `deadline` passes.
    ///
    /// `None` waits for input only. A deadline in the past must not block.
    fn wait_for_next_frame_or_event(&mut self, deadline: Option<Instant>);

    /// Whether the user closed the window out of band.
    fn close_signal(&self) -> bool;
}
