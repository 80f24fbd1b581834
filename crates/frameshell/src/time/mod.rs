//! Frame pacing.
//!
//! The dispatch core asks a [`FrameClock`] whether a frame is due and how long
//! it may sleep before the next one. Time is passed in explicitly so pacing
//! can be tested without a real clock.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
