use crate::coords::Vec2;

use super::types::Modifiers;

/// Pointer location in both coordinate spaces, logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerPosition {
    pub screen: Vec2,
    pub client: Vec2,
}

impl PointerPosition {
    pub fn new(screen: Vec2, client: Vec2) -> Self {
        Self { screen, client }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawMouseAction {
    Moved { delta: Vec2 },
    Pressed { button: u32 },
    Released { button: u32 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RawKeyAction {
    Pressed,
    Released,
}

/// Input notification as delivered by a platform surface, before
/// normalization.
///
/// Platforms resolve positions, key codes and key text; the normalizer adds
/// the held-button mask.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Mouse {
        action: RawMouseAction,
        position: PointerPosition,
        modifiers: Modifiers,
    },
    Key {
        action: RawKeyAction,
        code: u32,
        text: String,
        repeat: bool,
        modifiers: Modifiers,
    },
}

impl RawInput {
    fn mouse(action: RawMouseAction) -> Self {
        RawInput::Mouse {
            action,
            position: PointerPosition::default(),
            modifiers: Modifiers::default(),
        }
    }

    fn key(action: RawKeyAction, code: u32, text: impl Into<String>) -> Self {
        RawInput::Key {
            action,
            code,
            text: text.into(),
            repeat: false,
            modifiers: Modifiers::default(),
        }
    }

    pub fn mouse_moved(delta: Vec2) -> Self {
        Self::mouse(RawMouseAction::Moved { delta })
    }

    pub fn mouse_pressed(button: u32) -> Self {
        Self::mouse(RawMouseAction::Pressed { button })
    }

    pub fn mouse_released(button: u32) -> Self {
        Self::mouse(RawMouseAction::Released { button })
    }

    pub fn key_pressed(code: u32, text: impl Into<String>) -> Self {
        Self::key(RawKeyAction::Pressed, code, text)
    }

    pub fn key_released(code: u32, text: impl Into<String>) -> Self {
        Self::key(RawKeyAction::Released, code, text)
    }

    /// Sets the pointer position. No effect on key notifications.
    pub fn at(mut self, pos: PointerPosition) -> Self {
        if let RawInput::Mouse { position, .. } = &mut self {
            *position = pos;
        }
        self
    }

    /// Marks a key notification as auto-repeat. No effect on mouse notifications.
    pub fn repeated(mut self, is_repeat: bool) -> Self {
        if let RawInput::Key { repeat, .. } = &mut self {
            *repeat = is_repeat;
        }
        self
    }

    pub fn with_modifiers(mut self, m: Modifiers) -> Self {
        match &mut self {
            RawInput::Mouse { modifiers, .. } | RawInput::Key { modifiers, .. } => *modifiers = m,
        }
        self
    }
}
