use std::borrow::Cow;

use crate::device::GpuInit;
use crate::render::{CLEAR_COLOR, DEFAULT_SHADER};

/// Construction parameters for a [`Scatterplot`](super::Scatterplot).
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub gpu: GpuInit,

    /// WGSL program matching the six-slot layout and the two-uniform bind
    /// group. Defaults to the bundled marker shader.
    pub shader_source: Cow<'static, str>,

    /// Background every frame is cleared to.
    pub clear_color: wgpu::Color,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            gpu: GpuInit::default(),
            shader_source: Cow::Borrowed(DEFAULT_SHADER),
            clear_color: CLEAR_COLOR,
        }
    }
}

impl PlotConfig {
    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn with_shader(mut self, source: impl Into<Cow<'static, str>>) -> Self {
        self.shader_source = source.into();
        self
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }
}
