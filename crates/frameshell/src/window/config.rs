use std::time::Duration;

use winit::dpi::LogicalSize;

use crate::device::GpuInit;
use crate::dispatch::DispatchConfig;
use crate::time::FrameClock;

/// Window and run-loop configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub title: String,

    /// Initial client-area width in logical pixels.
    pub width: u32,

    /// Initial client-area height in logical pixels.
    pub height: u32,

    pub resizable: bool,

    /// Draw callback rate. `None` draws as fast as the surface presents.
    pub target_frame_rate: Option<f64>,

    /// Consecutive transient acquisition failures tolerated before `run`
    /// fails with a surface error.
    pub transient_failure_limit: u32,

    pub gpu: GpuInit,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "frameshell".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            target_frame_rate: Some(60.0),
            transient_failure_limit: DispatchConfig::default().transient_failure_limit,
            gpu: GpuInit::default(),
        }
    }
}

impl ShellConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_frame_rate(mut self, frames_per_second: Option<f64>) -> Self {
        self.target_frame_rate = frames_per_second;
        self
    }

    pub fn with_transient_failure_limit(mut self, limit: u32) -> Self {
        self.transient_failure_limit = limit;
        self
    }

    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    pub(crate) fn inner_size(&self) -> LogicalSize<f64> {
        LogicalSize::new(f64::from(self.width), f64::from(self.height))
    }

    /// Dispatch settings derived from this config.
    ///
    /// Non-positive or non-finite rates are treated as unpaced.
    pub fn dispatch(&self) -> DispatchConfig {
        let frame_interval = self
            .target_frame_rate
            .map_or(Duration::ZERO, |fps| FrameClock::from_rate(fps).interval());
        DispatchConfig {
            frame_interval,
            transient_failure_limit: self.transient_failure_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_size_and_keeps_defaults() {
        let config = ShellConfig::new(800, 600);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.title, "frameshell");
        assert!(config.resizable);
        assert_eq!(config.inner_size(), LogicalSize::new(800.0, 600.0));
    }

    #[test]
    fn builder_methods() {
        let config = ShellConfig::new(10, 10)
            .with_title("demo")
            .with_resizable(false)
            .with_transient_failure_limit(5);
        assert_eq!(config.title, "demo");
        assert!(!config.resizable);
        assert_eq!(config.dispatch().transient_failure_limit, 5);
    }

    #[test]
    fn frame_rate_maps_to_interval() {
        let config = ShellConfig::new(1, 1).with_frame_rate(Some(100.0));
        assert_eq!(config.dispatch().frame_interval, Duration::from_millis(10));
    }

    #[test]
    fn missing_or_invalid_rate_is_unpaced() {
        let unpaced = ShellConfig::new(1, 1).with_frame_rate(None);
        assert_eq!(unpaced.dispatch().frame_interval, Duration::ZERO);

        let negative = ShellConfig::new(1, 1).with_frame_rate(Some(-5.0));
        assert_eq!(negative.dispatch().frame_interval, Duration::ZERO);

        let vanishing = ShellConfig::new(800, 600).with_frame_rate(Some(1e-30));
        assert_eq!(vanishing.dispatch().frame_interval, Duration::ZERO);
    }
}
