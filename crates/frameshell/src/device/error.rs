use std::fmt;

use crate::dispatch::AcquireError;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Device-level failure (commonly OOM); terminate.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}

/// A failed drawable acquisition and what was done about it.
#[derive(Debug)]
pub struct SurfaceFailure {
    pub action: SurfaceErrorAction,
    pub error: wgpu::SurfaceError,
}

impl fmt::Display for SurfaceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.error, self.action)
    }
}

impl From<SurfaceFailure> for AcquireError {
    fn from(failure: SurfaceFailure) -> Self {
        if failure.action.is_fatal() {
            AcquireError::Fatal(failure.to_string())
        } else {
            AcquireError::Transient(failure.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_becomes_fatal() {
        let err: AcquireError = SurfaceFailure {
            action: SurfaceErrorAction::Fatal,
            error: wgpu::SurfaceError::OutOfMemory,
        }
        .into();
        assert!(matches!(err, AcquireError::Fatal(_)));
    }

    #[test]
    fn reconfigure_and_skip_are_transient() {
        for (action, error) in [
            (SurfaceErrorAction::Reconfigured, wgpu::SurfaceError::Outdated),
            (SurfaceErrorAction::SkipFrame, wgpu::SurfaceError::Timeout),
        ] {
            let err: AcquireError = SurfaceFailure { action, error }.into();
            assert!(matches!(err, AcquireError::Transient(_)));
        }
    }
}
