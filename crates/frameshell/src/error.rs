//! Typed errors surfaced at the crate boundary.
//!
//! GPU and window setup use `anyhow` internally for context chains; the chain
//! is flattened into the variant payload when it crosses into `ShellError`.

use thiserror::Error;

/// Error type returned by [`Shell`](crate::Shell) and the dispatch core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// No event loop, window, adapter or device could be created.
    ///
    /// Fatal: nothing from the failed attempt is retained.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// The run loop was started before a platform surface existed.
    #[error("shell is not initialized")]
    NotInitialized,

    /// `run` was called while the loop is already running.
    #[error("run loop is already running")]
    AlreadyRunning,

    /// `run` was called after the loop has stopped.
    #[error("run loop has already stopped")]
    Stopped,

    /// The surface or device failed persistently and the loop terminated.
    #[error("fatal surface error: {0}")]
    Surface(String),
}

impl ShellError {
    pub(crate) fn initialization(err: anyhow::Error) -> Self {
        Self::Initialization(format!("{err:#}"))
    }
}
