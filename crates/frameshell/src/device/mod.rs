//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Adapter/Device/Queue for a window
//! - creating & configuring the Surface (swapchain)
//! - acquiring drawables and classifying acquisition failures

mod error;
mod gpu;
mod init;
mod surface;

pub use error::{SurfaceErrorAction, SurfaceFailure};
pub use gpu::Gpu;
pub use init::GpuInit;
