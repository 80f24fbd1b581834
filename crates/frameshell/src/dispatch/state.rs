use crate::error::ShellError;

/// Run-loop lifecycle.
///
/// `Uninitialized → Ready → Running → Terminating → Stopped`
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LoopState {
    #[default]
    Uninitialized,
    Ready,
    Running,
    Terminating,
    Stopped,
}

impl LoopState {
    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }

    /// `Uninitialized → Ready`.
    pub(crate) fn initialized(&mut self) {
        if *self == LoopState::Uninitialized {
            *self = LoopState::Ready;
        }
    }

    /// `Ready → Running`. Any other starting state is a precondition violation.
    pub(crate) fn start(&mut self) -> Result<(), ShellError> {
        match *self {
            LoopState::Ready => {
                *self = LoopState::Running;
                Ok(())
            }
            LoopState::Uninitialized => Err(ShellError::NotInitialized),
            LoopState::Running | LoopState::Terminating => Err(ShellError::AlreadyRunning),
            LoopState::Stopped => Err(ShellError::Stopped),
        }
    }

    /// `Running → Terminating`. Idempotent.
    pub(crate) fn terminate(&mut self) {
        if *self == LoopState::Running {
            *self = LoopState::Terminating;
        }
    }

    /// `Terminating → Stopped`.
    pub(crate) fn finish(&mut self) {
        if *self == LoopState::Terminating {
            *self = LoopState::Stopped;
        }
    }
}
