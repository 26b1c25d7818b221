use winit::dpi::LogicalSize;

use attitude_core::{DEFAULT_STEP_DEGREES, PITCH_FULL_SCALE_DEGREES};
use attitude_engine::device::GpuInit;
use attitude_engine::paint::Color;
use attitude_engine::window::RuntimeConfig;

/// Indicator settings. There is no config file; defaults are the instrument.
#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,

    /// Degrees applied per frame while an arrow key is held.
    pub step_degrees: f32,

    /// Pitch that moves the horizon one full NDC unit.
    pub pitch_full_scale: f32,

    pub sky: Color,
    pub ground: Color,
    pub clear: Color,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            title: "Attitude Indicator".to_string(),
            width: 800.0,
            height: 600.0,
            step_degrees: DEFAULT_STEP_DEGREES,
            pitch_full_scale: PITCH_FULL_SCALE_DEGREES,
            sky: Color::rgb(0.2, 0.4, 0.8),
            ground: Color::rgb(0.5, 0.3, 0.1),
            clear: Color::BLACK,
        }
    }
}

impl IndicatorConfig {
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn step(mut self, degrees: f32) -> Self {
        self.step_degrees = degrees;
        self
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
            resizable: true,
        }
    }

    /// Linear surface, so the flat colors land on screen as written.
    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        }
    }
}
