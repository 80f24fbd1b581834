//! Run loop and callback dispatch.
//!
//! The [`DispatchCore`] drives any [`PlatformSurface`]: it drains raw input,
//! normalizes it, invokes the registered callbacks, and hands one
//! drawable/target pair per due frame to the draw callback. Everything runs
//! on the thread that called [`DispatchCore::run`]; callbacks never overlap.

mod callbacks;
mod control;
mod platform;
mod run_loop;
mod state;

pub use callbacks::{CallbackSlots, DrawFunction, KeyboardEventFunction, MouseEventFunction};
pub use control::DispatchHandle;
pub use platform::{AcquireError, PlatformSurface};
pub use run_loop::{DispatchConfig, DispatchCore};
pub use state::LoopState;
