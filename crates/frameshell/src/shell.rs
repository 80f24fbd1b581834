use winit::window::Window;

use crate::dispatch::{DispatchCore, DispatchHandle, LoopState};
use crate::error::ShellError;
use crate::input::{KeyboardEvent, MouseEvent};
use crate::window::{ShellConfig, WinitSurface};

/// Handle for requesting exit or re-registering callbacks from inside a
/// running callback.
pub type ShellHandle = DispatchHandle<wgpu::SurfaceTexture, wgpu::TextureView>;

/// Application shell: one window, one GPU device, three callbacks.
///
/// A `Shell` only exists after its window and device were created, so the
/// accessors never observe an uninitialized state.
pub struct Shell {
    core: DispatchCore<WinitSurface>,
}

impl Shell {
    /// Creates a window with a `width`×`height` logical-pixel client area and
    /// the GPU objects bound to it.
    pub fn initialize(width: u32, height: u32) -> Result<Self, ShellError> {
        Self::with_config(ShellConfig::new(width, height))
    }

    pub fn with_config(config: ShellConfig) -> Result<Self, ShellError> {
        let surface = WinitSurface::create(&config)?;

        let info = surface.gpu().adapter_info();
        log::info!(
            "shell ready: {:?} on {} ({:?})",
            surface.surface_format(),
            info.name,
            info.backend
        );

        Ok(Self {
            core: DispatchCore::new(surface, config.dispatch()),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn device(&self) -> &wgpu::Device {
        self.core.platform().device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.core.platform().queue()
    }

    pub fn window(&self) -> &Window {
        self.core.platform().window()
    }

    /// Presentation surface that produces the per-frame drawables.
    pub fn view(&self) -> &wgpu::Surface<'_> {
        self.core.platform().surface()
    }

    /// Format of the drawables handed to the draw callback.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.core.platform().surface_format()
    }

    pub fn state(&self) -> LoopState {
        self.core.state()
    }

    pub fn handle(&self) -> ShellHandle {
        self.core.handle()
    }

    // ── Callbacks ─────────────────────────────────────────────────────────

    /// Called once per frame with a drawable and a view onto its texture.
    ///
    /// The callback owns both; present the drawable after submitting work,
    /// or drop it to discard the frame.
    pub fn set_draw_function<F>(&mut self, f: F)
    where
        F: FnMut(wgpu::SurfaceTexture, wgpu::TextureView) + 'static,
    {
        self.core.set_draw_function(f);
    }

    pub fn clear_draw_function(&mut self) {
        self.core.clear_draw_function();
    }

    pub fn set_mouse_event_function<F>(&mut self, f: F)
    where
        F: FnMut(&MouseEvent) + 'static,
    {
        self.core.set_mouse_event_function(f);
    }

    pub fn clear_mouse_event_function(&mut self) {
        self.core.clear_mouse_event_function();
    }

    pub fn set_keyboard_event_function<F>(&mut self, f: F)
    where
        F: FnMut(&KeyboardEvent) + 'static,
    {
        self.core.set_keyboard_event_function(f);
    }

    pub fn clear_keyboard_event_function(&mut self) {
        self.core.clear_keyboard_event_function();
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Runs until [`Shell::exit`] / [`ShellHandle::exit`] is called or the
    /// window is closed.
    pub fn run(&mut self) -> Result<(), ShellError> {
        self.core.run()
    }

    /// Requests termination at the end of the current loop iteration.
    pub fn exit(&mut self) {
        self.core.exit();
    }
}
