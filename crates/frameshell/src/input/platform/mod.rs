//! Platform-specific translation into [`RawInput`](super::RawInput).

mod winit;

pub(crate) use self::winit::WinitInputTranslator;
