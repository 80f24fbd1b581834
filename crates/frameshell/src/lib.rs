//! frameshell crate.
//!
//! A minimal application shell: one GPU-backed window, one per-frame draw
//! callback, and structured mouse/keyboard events delivered on the thread
//! that drives the window.
//!
//! ```rust,ignore
//! let mut shell = Shell::initialize(800, 600)?;
//! let queue = shell.queue().clone();
//! shell.set_draw_function(move |drawable, target| {
//!     // encode into `target`, submit on `queue`, then present
//!     drawable.present();
//! });
//! shell.run()?;
//! ```

pub mod coords;
pub mod device;
pub mod dispatch;
pub mod input;
pub mod logging;
pub mod time;
pub mod window;

mod error;
mod shell;

pub use error::ShellError;
pub use shell::{Shell, ShellHandle};
pub use window::ShellConfig;
