//! Coordinate types shared by input events.
//!
//! Canonical space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down

mod vec2;

pub use vec2::Vec2;
