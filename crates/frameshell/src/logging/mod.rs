//! Logging utilities.
//!
//! The crate itself only emits through the `log` facade. Binaries that want
//! output call [`init_logging`] early in `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
