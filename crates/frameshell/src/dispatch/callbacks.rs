use crate::input::{InputEvent, KeyboardEvent, MouseEvent};

/// Draw callback: receives the frame's drawable and its render target.
pub type DrawFunction<D, T> = Box<dyn FnMut(D, T)>;

pub type MouseEventFunction = Box<dyn FnMut(&MouseEvent)>;

pub type KeyboardEventFunction = Box<dyn FnMut(&KeyboardEvent)>;

/// The three callback slots. Each holds at most one callback; an empty slot
/// makes the corresponding dispatch a no-op.
pub struct CallbackSlots<D, T> {
    draw: Option<DrawFunction<D, T>>,
    mouse: Option<MouseEventFunction>,
    keyboard: Option<KeyboardEventFunction>,
}

impl<D, T> Default for CallbackSlots<D, T> {
    fn default() -> Self {
        Self {
            draw: None,
            mouse: None,
            keyboard: None,
        }
    }
}

impl<D, T> CallbackSlots<D, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_draw(&mut self, f: Option<DrawFunction<D, T>>) {
        self.draw = f;
    }

    pub fn set_mouse(&mut self, f: Option<MouseEventFunction>) {
        self.mouse = f;
    }

    pub fn set_keyboard(&mut self, f: Option<KeyboardEventFunction>) {
        self.keyboard = f;
    }

    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }

    /// Invokes the draw callback. Returns whether one was registered; if not,
    /// the drawable and target are dropped.
    pub fn draw(&mut self, drawable: D, target: T) -> bool {
        match self.draw.as_mut() {
            Some(f) => {
                f(drawable, target);
                true
            }
            None => false,
        }
    }

    /// Routes an event to the mouse or keyboard callback. Returns whether a
    /// callback was invoked.
    pub fn dispatch_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Mouse(ev) => match self.mouse.as_mut() {
                Some(f) => {
                    f(ev);
                    true
                }
                None => false,
            },
            InputEvent::Keyboard(ev) => match self.keyboard.as_mut() {
                Some(f) => {
                    f(ev);
                    true
                }
                None => false,
            },
        }
    }
}
