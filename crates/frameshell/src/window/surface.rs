use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::dispatch::{AcquireError, PlatformSurface};
use crate::error::ShellError;
use crate::input::RawInput;
use crate::input::platform::WinitInputTranslator;

use super::ShellConfig;

/// Upper bound on startup pumps waiting for the platform to resume the app.
const BOOTSTRAP_PUMPS: u32 = 200;
const BOOTSTRAP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// The shell's window, its GPU context and the event loop that feeds them.
///
/// The event loop is pumped from [`PlatformSurface::wait_for_next_frame_or_event`]
/// so the dispatch core, not winit, owns the loop.
pub struct WinitSurface {
    event_loop: EventLoop<()>,
    host: Host,
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Receives winit events between pumps.
struct Host {
    entry: WindowEntry,
    translator: WinitInputTranslator,
    pending: Vec<RawInput>,
    closed: bool,
}

/// Handler used only until the first `resumed`, which is where winit allows
/// windows to be created.
struct Bootstrap<'a> {
    config: &'a ShellConfig,
    entry: Option<Result<WindowEntry>>,
}

impl WinitSurface {
    /// Creates the event loop, window, surface, adapter, device and queue.
    ///
    /// Only one event loop can exist per process; a second call fails with
    /// [`ShellError::Initialization`].
    pub fn create(config: &ShellConfig) -> Result<Self, ShellError> {
        Self::try_create(config).map_err(ShellError::initialization)
    }

    fn try_create(config: &ShellConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut bootstrap = Bootstrap {
            config,
            entry: None,
        };

        for _ in 0..BOOTSTRAP_PUMPS {
            let status = event_loop.pump_app_events(Some(BOOTSTRAP_PUMP_TIMEOUT), &mut bootstrap);
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited during startup (code {code})");
            }
            if bootstrap.entry.is_some() {
                break;
            }
        }

        let entry = bootstrap
            .entry
            .context("platform did not resume the application")??;

        entry.with_window(|w| {
            let size = w.inner_size();
            log::info!(
                "window created: \"{}\" {}x{} (scale {:.2})",
                config.title,
                size.width,
                size.height,
                w.scale_factor()
            );
        });

        Ok(Self {
            event_loop,
            host: Host {
                entry,
                translator: WinitInputTranslator::default(),
                pending: Vec::new(),
                closed: false,
            },
        })
    }

    pub fn window(&self) -> &Window {
        self.host.entry.borrow_window()
    }

    pub fn gpu(&self) -> &Gpu<'_> {
        self.host.entry.borrow_gpu()
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu().device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu().queue()
    }

    /// Presentation surface bound to the window.
    pub fn surface(&self) -> &wgpu::Surface<'_> {
        self.gpu().surface()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu().surface_format()
    }
}

impl PlatformSurface for WinitSurface {
    type Drawable = wgpu::SurfaceTexture;
    type Target = wgpu::TextureView;

    fn poll_input(&mut self) -> Vec<RawInput> {
        std::mem::take(&mut self.host.pending)
    }

    fn can_present(&self) -> bool {
        self.gpu().can_present()
    }

    fn acquire_frame_target(
        &mut self,
    ) -> Result<(wgpu::SurfaceTexture, wgpu::TextureView), AcquireError> {
        self.host
            .entry
            .with_mut(|fields| {
                fields.window.pre_present_notify();
                fields.gpu.acquire()
            })
            .map_err(|failure| {
                log::debug!("surface acquisition failed: {failure}");
                AcquireError::from(failure)
            })
    }

    fn wait_for_next_frame_or_event(&mut self, deadline: Option<Instant>) {
        let timeout = deadline.map(|d| d.saturating_duration_since(Instant::now()));

        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.host) {
            log::info!("event loop exited (code {code})");
            self.host.closed = true;
        }
    }

    fn close_signal(&self) -> bool {
        self.host.closed
    }
}

fn create_window_entry(event_loop: &ActiveEventLoop, config: &ShellConfig) -> Result<WindowEntry> {
    let attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(config.inner_size())
        .with_resizable(config.resizable);

    let window = event_loop
        .create_window(attrs)
        .context("failed to create window")?;

    let gpu_init = config.gpu.clone();
    WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
        .context("GPU initialization failed for window")
}

impl ApplicationHandler for Bootstrap<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);
        self.entry = Some(create_window_entry(event_loop, self.config));
    }

    // Events before the window exists have nothing to act on.
    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Split borrows to avoid capturing `self` inside the `ouroboros` closure.
        let (translator, pending) = (&mut self.translator, &mut self.pending);
        self.entry.with_window(|window| {
            if let Some(raw) = translator.translate(window, &event) {
                pending.push(raw);
            }
        });

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.closed = true;
            }

            WindowEvent::Resized(new_size) => {
                log::debug!("resized to {}x{}", new_size.width, new_size.height);
                self.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = self.entry.with_window(|w| w.inner_size());
                self.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            _ => {}
        }
    }
}
