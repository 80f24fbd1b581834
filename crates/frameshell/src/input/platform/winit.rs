use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{Key as LogicalKey, KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::coords::Vec2;
use crate::input::{Key, Modifiers, MouseButton, PointerPosition, RawInput};

/// Translates winit `WindowEvent`s into [`RawInput`] notifications.
///
/// Tracks what winit reports separately from the event itself: the pointer
/// (to derive movement deltas and position button events) and the modifier
/// state.
#[derive(Debug, Default)]
pub(crate) struct WinitInputTranslator {
    pointer: PointerTracker,
    modifiers: Modifiers,
}

impl WinitInputTranslator {
    /// Returns `None` for events not represented by the input subsystem.
    pub(crate) fn translate(&mut self, window: &Window, event: &WindowEvent) -> Option<RawInput> {
        match event {
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                None
            }

            // Positions before and after these are not comparable; the next
            // move reports a zero delta.
            WindowEvent::CursorEntered { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::ScaleFactorChanged { .. } => {
                self.pointer.detach();
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                let client = to_logical(*position, window.scale_factor());
                let delta = self.pointer.moved(client);

                Some(
                    RawInput::mouse_moved(delta)
                        .at(pointer_position(window_origin(window), client))
                        .with_modifiers(self.modifiers),
                )
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let id = map_mouse_button(*button).id();
                let raw = match state {
                    ElementState::Pressed => RawInput::mouse_pressed(id),
                    ElementState::Released => RawInput::mouse_released(id),
                };
                Some(
                    raw.at(pointer_position(window_origin(window), self.pointer.position()))
                        .with_modifiers(self.modifiers),
                )
            }

            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => {
                // Synthetic presses are emitted when focus is gained; releases are kept so
                // clients do not see stuck keys.
                if *is_synthetic && event.state == ElementState::Pressed {
                    return None;
                }

                let code = map_key(event.physical_key).map_or(0, Key::code);
                let text = key_text(event.text.as_deref(), &event.logical_key);
                let raw = match event.state {
                    ElementState::Pressed => RawInput::key_pressed(code, text).repeated(event.repeat),
                    ElementState::Released => RawInput::key_released(code, text),
                };
                Some(raw.with_modifiers(self.modifiers))
            }

            _ => None,
        }
    }
}

/// Last known pointer position plus the anchor movement deltas are taken
/// from. Only the anchor is dropped on enter/leave/rescale, so button events
/// keep reporting where the pointer was last seen.
#[derive(Debug, Default)]
struct PointerTracker {
    position: Vec2,
    anchor: Option<Vec2>,
}

impl PointerTracker {
    /// Records a move to `client` and returns the delta from the anchor.
    fn moved(&mut self, client: Vec2) -> Vec2 {
        let delta = self.anchor.map_or(Vec2::ZERO, |prev| client - prev);
        self.position = client;
        self.anchor = Some(client);
        delta
    }

    fn detach(&mut self) {
        self.anchor = None;
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

fn to_logical(pos: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = pos.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

/// Logical origin of the client area on the desktop; `None` where the
/// platform cannot report it (Wayland).
fn window_origin(window: &Window) -> Option<Vec2> {
    let origin = window.inner_position().ok()?;
    Some(to_logical(origin.cast::<f64>(), window.scale_factor()))
}

/// Screen position is the window origin plus the client position, or the
/// client position when the origin is unknown.
fn pointer_position(origin: Option<Vec2>, client: Vec2) -> PointerPosition {
    let screen = origin.map_or(client, |o| o + client);
    PointerPosition::new(screen, client)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

/// Text for a key event: committed text if winit produced any, otherwise the
/// character of the logical key. Control characters (Enter, Tab, Backspace
/// on some platforms) yield an empty string.
fn key_text(text: Option<&str>, logical: &LogicalKey) -> String {
    let raw = match (text, logical) {
        (Some(t), _) => t,
        (None, LogicalKey::Character(c)) => c.as_str(),
        (None, _) => "",
    };

    if raw.chars().any(char::is_control) {
        String::new()
    } else {
        raw.to_string()
    }
}

fn map_key(pk: PhysicalKey) -> Option<Key> {
    // NativeKeyCode has no stable numeric form in winit 0.30.
    let PhysicalKey::Code(code) = pk else {
        return None;
    };

    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::Enter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,

        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equal,
        KeyCode::BracketLeft => Key::BracketLeft,
        KeyCode::BracketRight => Key::BracketRight,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Quote,
        KeyCode::Backquote => Key::Backquote,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::CapsLock => Key::CapsLock,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::Delete => Key::Delete,
        KeyCode::End => Key::End,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowUp => Key::ArrowUp,

        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::AltLeft => Key::AltLeft,
        KeyCode::SuperLeft => Key::MetaLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::AltRight => Key::AltRight,
        KeyCode::SuperRight => Key::MetaRight,

        _ => return None,
    };

    Some(key)
}
