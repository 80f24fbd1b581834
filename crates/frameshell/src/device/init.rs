/// GPU options applied when the shell creates its device and surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format if the surface offers one.
    pub srgb: bool,

    /// Swap behavior. `Fifo` is always available and vsyncs.
    pub present_mode: wgpu::PresentMode,

    /// Requested alpha compositing; falls back to the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power: wgpu::PowerPreference,

    pub features: wgpu::Features,
    pub limits: wgpu::Limits,

    /// Frames the presentation engine may queue. Backends treat it as a hint.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power: wgpu::PowerPreference::HighPerformance,
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
            frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// `Fifo` when `on`, otherwise whichever non-vsync mode the backend has.
    pub fn with_vsync(mut self, on: bool) -> Self {
        self.present_mode = if on {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self
    }

    pub fn with_power(mut self, power: wgpu::PowerPreference) -> Self {
        self.power = power;
        self
    }

    pub fn with_alpha_mode(mut self, mode: wgpu::CompositeAlphaMode) -> Self {
        self.alpha_mode = Some(mode);
        self
    }
}
