use super::raw::{RawInput, RawKeyAction, RawMouseAction};
use super::types::{
    InputEvent, KeyboardEvent, KeyboardEventKind, MouseEvent, MouseEventKind,
};

/// Bit for `button` in a held-buttons mask; `0` for ids that do not fit.
#[inline]
pub(crate) fn button_bit(button: u32) -> u32 {
    1u32.checked_shl(button).unwrap_or(0)
}

/// Converts raw platform notifications into [`InputEvent`]s.
///
/// The only state is the held-buttons mask, which persists across calls for
/// as long as the normalizer lives (one run loop). Each emitted mouse event
/// reports the mask after its own press/release was applied. Button ids of 32
/// and above are delivered but never appear in the mask.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    buttons: u32,
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently held buttons.
    pub fn buttons(&self) -> u32 {
        self.buttons
    }

    pub fn normalize(&mut self, raw: RawInput) -> InputEvent {
        match raw {
            RawInput::Mouse {
                action,
                position,
                modifiers,
            } => {
                let detail = match action {
                    RawMouseAction::Moved { delta } => MouseEventKind::Move { delta },
                    RawMouseAction::Pressed { button } => {
                        self.buttons |= button_bit(button);
                        MouseEventKind::ButtonDown { button }
                    }
                    RawMouseAction::Released { button } => {
                        self.buttons &= !button_bit(button);
                        MouseEventKind::ButtonUp { button }
                    }
                };

                InputEvent::Mouse(MouseEvent {
                    detail,
                    buttons: self.buttons,
                    screen_position: position.screen,
                    client_position: position.client,
                    modifiers,
                })
            }

            RawInput::Key {
                action,
                code,
                text,
                repeat,
                modifiers,
            } => {
                let detail = match action {
                    RawKeyAction::Pressed => KeyboardEventKind::KeyDown,
                    RawKeyAction::Released => KeyboardEventKind::KeyUp,
                };

                InputEvent::Keyboard(KeyboardEvent {
                    detail,
                    code,
                    key: text,
                    modifiers,
                    repeat,
                })
            }
        }
    }
}
