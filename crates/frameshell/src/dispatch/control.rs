use std::cell::RefCell;
use std::rc::Rc;

use crate::input::{KeyboardEvent, MouseEvent};

use super::callbacks::{DrawFunction, KeyboardEventFunction, MouseEventFunction};

pub(crate) enum Command<D, T> {
    Exit,
    SetDraw(Option<DrawFunction<D, T>>),
    SetMouse(Option<MouseEventFunction>),
    SetKeyboard(Option<KeyboardEventFunction>),
}

/// Cloneable handle for controlling a run loop from inside its callbacks.
///
/// Requests are buffered and applied by the dispatch core as soon as the
/// currently executing callback returns, in the order they were made. A
/// replaced callback therefore receives the next dispatch, even within the
/// same loop iteration.
///
/// The handle is `!Send`: all requests come from the loop thread.
pub struct DispatchHandle<D, T> {
    commands: Rc<RefCell<Vec<Command<D, T>>>>,
}

impl<D, T> Clone for DispatchHandle<D, T> {
    fn clone(&self) -> Self {
        Self {
            commands: Rc::clone(&self.commands),
        }
    }
}

impl<D, T> Default for DispatchHandle<D, T> {
    fn default() -> Self {
        Self {
            commands: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<D, T> DispatchHandle<D, T> {
    fn push(&self, cmd: Command<D, T>) {
        self.commands.borrow_mut().push(cmd);
    }

    /// Requests termination at the end of the current iteration. Idempotent.
    pub fn exit(&self) {
        self.push(Command::Exit);
    }

    pub fn set_draw_function<F>(&self, f: F)
    where
        F: FnMut(D, T) + 'static,
    {
        self.push(Command::SetDraw(Some(Box::new(f))));
    }

    pub fn clear_draw_function(&self) {
        self.push(Command::SetDraw(None));
    }

    pub fn set_mouse_event_function<F>(&self, f: F)
    where
        F: FnMut(&MouseEvent) + 'static,
    {
        self.push(Command::SetMouse(Some(Box::new(f))));
    }

    pub fn clear_mouse_event_function(&self) {
        self.push(Command::SetMouse(None));
    }

    pub fn set_keyboard_event_function<F>(&self, f: F)
    where
        F: FnMut(&KeyboardEvent) + 'static,
    {
        self.push(Command::SetKeyboard(Some(Box::new(f))));
    }

    pub fn clear_keyboard_event_function(&self) {
        self.push(Command::SetKeyboard(None));
    }

    pub(crate) fn take_commands(&self) -> Vec<Command<D, T>> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }
}
