use std::fmt;

use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// Discriminants are USB HID keyboard usage ids, which makes
/// [`Key::code`] a platform-independent integer. Keys outside this set are
/// reported with code `0`.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Letters
    A = 0x04, B = 0x05, C = 0x06, D = 0x07, E = 0x08, F = 0x09, G = 0x0A,
    H = 0x0B, I = 0x0C, J = 0x0D, K = 0x0E, L = 0x0F, M = 0x10, N = 0x11,
    O = 0x12, P = 0x13, Q = 0x14, R = 0x15, S = 0x16, T = 0x17, U = 0x18,
    V = 0x19, W = 0x1A, X = 0x1B, Y = 0x1C, Z = 0x1D,

    // Digits
    Digit1 = 0x1E, Digit2 = 0x1F, Digit3 = 0x20, Digit4 = 0x21, Digit5 = 0x22,
    Digit6 = 0x23, Digit7 = 0x24, Digit8 = 0x25, Digit9 = 0x26, Digit0 = 0x27,

    // Common control keys
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,

    // Punctuation
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,

    // Function keys
    F1 = 0x3A, F2 = 0x3B, F3 = 0x3C, F4 = 0x3D, F5 = 0x3E, F6 = 0x3F,
    F7 = 0x40, F8 = 0x41, F9 = 0x42, F10 = 0x43, F11 = 0x44, F12 = 0x45,

    // Navigation
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Modifiers as keys
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,
}

impl Key {
    pub const ALL: [Key; 83] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
        Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4, Key::Digit5,
        Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9, Key::Digit0,
        Key::Enter, Key::Escape, Key::Backspace, Key::Tab, Key::Space,
        Key::Minus, Key::Equal, Key::BracketLeft, Key::BracketRight, Key::Backslash,
        Key::Semicolon, Key::Quote, Key::Backquote, Key::Comma, Key::Period,
        Key::Slash, Key::CapsLock,
        Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
        Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
        Key::Insert, Key::Home, Key::PageUp, Key::Delete, Key::End, Key::PageDown,
        Key::ArrowRight, Key::ArrowLeft, Key::ArrowDown, Key::ArrowUp,
        Key::ControlLeft, Key::ShiftLeft, Key::AltLeft, Key::MetaLeft,
        Key::ControlRight, Key::ShiftRight, Key::AltRight, Key::MetaRight,
    ];

    /// Stable integer code (HID usage id).
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Reverse of [`Key::code`]; `None` for `0` and unmapped codes.
    pub fn from_code(code: u32) -> Option<Key> {
        Key::ALL.iter().copied().find(|k| k.code() == code)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Numeric id carried in [`MouseEventKind`]: 0 is the primary button.
    pub fn id(self) -> u32 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(v) => u32::from(v),
        }
    }
}

/// Modifier keys state.
///
/// This is stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// What happened to the mouse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseEventKind {
    /// Pointer moved by `delta` logical pixels.
    Move { delta: Vec2 },
    ButtonDown { button: u32 },
    ButtonUp { button: u32 },
}

/// Normalized mouse event.
///
/// Positions are populated for every kind, not only `Move`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseEvent {
    pub detail: MouseEventKind,

    /// Held buttons after this event was applied; bit `n` is button id `n`.
    pub buttons: u32,

    /// Position relative to the desktop, in logical pixels.
    pub screen_position: Vec2,

    /// Position relative to the window's client area, in logical pixels.
    pub client_position: Vec2,

    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Whether `button` is held according to [`MouseEvent::buttons`].
    pub fn is_held(&self, button: u32) -> bool {
        self.buttons & super::normalizer::button_bit(button) != 0
    }

    pub fn delta(&self) -> Option<Vec2> {
        match self.detail {
            MouseEventKind::Move { delta } => Some(delta),
            MouseEventKind::ButtonDown { .. } | MouseEventKind::ButtonUp { .. } => None,
        }
    }

    pub fn button(&self) -> Option<u32> {
        match self.detail {
            MouseEventKind::ButtonDown { button } | MouseEventKind::ButtonUp { button } => {
                Some(button)
            }
            MouseEventKind::Move { .. } => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyboardEventKind {
    KeyDown,
    KeyUp,
}

/// Normalized keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardEvent {
    pub detail: KeyboardEventKind,

    /// Platform-independent key code (see [`Key::code`]); `0` when unknown.
    pub code: u32,

    /// Text produced by the key. Empty for non-printable keys.
    pub key: String,

    pub modifiers: Modifiers,

    /// True when the platform generated this press by auto-repeat.
    pub repeat: bool,
}

impl KeyboardEvent {
    /// Typed view of [`KeyboardEvent::code`].
    pub fn key_id(&self) -> Option<Key> {
        Key::from_code(self.code)
    }
}

/// Output of the normalizer: one event for one of the two input callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Keyboard(KeyboardEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Key ───────────────────────────────────────────────────────────────

    #[test]
    fn key_codes_are_hid_usages() {
        assert_eq!(Key::A.code(), 0x04);
        assert_eq!(Key::Digit0.code(), 0x27);
        assert_eq!(Key::Escape.code(), 0x29);
        assert_eq!(Key::ArrowUp.code(), 0x52);
        assert_eq!(Key::MetaRight.code(), 0xE7);
    }

    #[test]
    fn every_key_round_trips_through_its_code() {
        for key in Key::ALL {
            assert_eq!(Key::from_code(key.code()), Some(key), "{key}");
        }
    }

    #[test]
    fn all_codes_are_distinct() {
        let mut codes: Vec<u32> = Key::ALL.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Key::ALL.len());
    }

    #[test]
    fn unknown_code_has_no_key() {
        assert_eq!(Key::from_code(0), None);
        assert_eq!(Key::from_code(0x32), None);
    }

    // ── MouseButton ───────────────────────────────────────────────────────

    #[test]
    fn primary_button_is_zero() {
        assert_eq!(MouseButton::Left.id(), 0);
    }

    #[test]
    fn other_button_keeps_platform_number() {
        assert_eq!(MouseButton::Other(8).id(), 8);
    }

    // ── Events ────────────────────────────────────────────────────────────

    fn mouse(detail: MouseEventKind, buttons: u32) -> MouseEvent {
        MouseEvent {
            detail,
            buttons,
            screen_position: Vec2::ZERO,
            client_position: Vec2::ZERO,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn delta_only_on_move() {
        let mv = mouse(MouseEventKind::Move { delta: Vec2::new(1.0, 2.0) }, 0);
        assert_eq!(mv.delta(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(mv.button(), None);

        let down = mouse(MouseEventKind::ButtonDown { button: 2 }, 0b100);
        assert_eq!(down.delta(), None);
        assert_eq!(down.button(), Some(2));
    }

    #[test]
    fn is_held_reads_mask() {
        let ev = mouse(MouseEventKind::ButtonDown { button: 1 }, 0b011);
        assert!(ev.is_held(0));
        assert!(ev.is_held(1));
        assert!(!ev.is_held(2));
        assert!(!ev.is_held(40));
    }

    #[test]
    fn keyboard_key_id() {
        let ev = KeyboardEvent {
            detail: KeyboardEventKind::KeyDown,
            code: Key::Space.code(),
            key: " ".into(),
            modifiers: Modifiers::default(),
            repeat: false,
        };
        assert_eq!(ev.key_id(), Some(Key::Space));
    }
}
