//! Window + platform surface.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and
//! exposes the pair to the dispatch core as a [`PlatformSurface`].
//!
//! [`PlatformSurface`]: crate::dispatch::PlatformSurface

mod config;
mod surface;

pub use config::ShellConfig;
pub use surface::WinitSurface;
