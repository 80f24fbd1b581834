//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform surfaces produce [`RawInput`] notifications; the
//! [`EventNormalizer`] turns them into [`MouseEvent`]s and [`KeyboardEvent`]s.

mod normalizer;
pub(crate) mod platform;
mod raw;
mod types;

pub use normalizer::EventNormalizer;
pub use raw::{PointerPosition, RawInput, RawKeyAction, RawMouseAction};
pub use types::{
    InputEvent,
    Key,
    KeyboardEvent,
    KeyboardEventKind,
    Modifiers,
    MouseButton,
    MouseEvent,
    MouseEventKind,
};
