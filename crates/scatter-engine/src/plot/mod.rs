//! The scatterplot façade.
//!
//! [`Scatterplot`] owns the device, pipeline and [`PlotState`]; every
//! mutation goes through `&mut self`, so buffer writes and draws are
//! serialized by construction.

mod config;
mod state;

pub use config::PlotConfig;
pub use state::{FrameStatus, PlotState};

use winit::dpi::PhysicalSize;

use crate::coords::{Vec2, Viewport};
use crate::data::{DataBounds, PointSet, SetDataOptions};
use crate::device::Gpu;
use crate::error::Result;
use crate::input::Gesture;
use crate::render::{record_pass, BufferName, RenderCtx, RenderTarget, ScatterPipeline, ShaderProgram};
use crate::transform::Transform;

/// GPU instanced scatterplot bound to one surface.
pub struct Scatterplot<'w> {
    gpu: Gpu<'w>,
    pipeline: ScatterPipeline,
    bind_group: wgpu::BindGroup,
    state: PlotState<wgpu::Buffer>,
    clear_color: wgpu::Color,
}

impl<'w> Scatterplot<'w> {
    /// Acquires a device for `target`, builds the pipeline and creates the
    /// fixed buffers. No points are loaded yet.
    ///
    /// The shader is validated before any device is requested.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        size: PhysicalSize<u32>,
        config: PlotConfig,
    ) -> Result<Self> {
        let PlotConfig {
            gpu: gpu_init,
            shader_source,
            clear_color,
        } = config;

        let program = ShaderProgram::from_wgsl(shader_source)?;
        let gpu = Gpu::new(target, size, gpu_init).await?;
        let pipeline = ScatterPipeline::from_program(gpu.device(), gpu.surface_format(), &program);

        let (state, bind_group) = {
            let ctx = render_ctx(&gpu);
            let state = PlotState::new(&ctx, ctx.viewport);
            let bind_group = pipeline.create_bind_group(
                gpu.device(),
                state.registry().buffer(BufferName::CanvasSize)?,
                state.registry().buffer(BufferName::Transform)?,
            );
            (state, bind_group)
        };

        log::info!(
            "scatterplot ready: {:?}, {}x{}",
            gpu.surface_format(),
            size.width,
            size.height
        );

        Ok(Self {
            gpu,
            pipeline,
            bind_group,
            state,
            clear_color,
        })
    }

    /// Replaces the point set and all per-point attributes.
    ///
    /// Does not redraw; call [`render`](Self::render) afterwards.
    pub fn set_data(&mut self, points: impl Into<PointSet>, options: &SetDataOptions) -> Result<()> {
        let points = points.into();
        let ctx = render_ctx(&self.gpu);
        self.state.set_data(&ctx, &points, options)
    }

    /// Applies one gesture, uploads the transform and redraws immediately.
    pub fn handle_gesture(&mut self, gesture: Gesture) -> Result<FrameStatus> {
        {
            let ctx = render_ctx(&self.gpu);
            self.state.apply_gesture(&ctx, gesture)?;
        }
        self.render()
    }

    /// Zooms by `factor` around `pointer` (clip space).
    pub fn on_zoom(&mut self, factor: f32, pointer: Vec2) -> Result<FrameStatus> {
        self.handle_gesture(Gesture::Zoom { factor, pointer })
    }

    /// Pans by a pixel delta (+Y down).
    pub fn on_pan(&mut self, delta: Vec2) -> Result<FrameStatus> {
        self.handle_gesture(Gesture::Pan { delta })
    }

    pub fn on_reset(&mut self) -> Result<FrameStatus> {
        self.handle_gesture(Gesture::Reset)
    }

    /// Reconfigures the surface and rewrites the canvas-size uniform.
    ///
    /// A zero-sized drawable is recorded but left unconfigured until the
    /// next non-zero size.
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        self.gpu.resize(size);
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        let ctx = render_ctx(&self.gpu);
        self.state.resize(&ctx, ctx.viewport)
    }

    /// Clears the surface and draws every point in one instanced call.
    ///
    /// Zero points and unavailable frames are absorbed with a warning and
    /// reported through [`FrameStatus`]; an out-of-memory surface is
    /// `SurfaceLost`.
    pub fn render(&mut self) -> Result<FrameStatus> {
        let Some(plan) = self.state.frame_plan()? else {
            log::warn!("no points to render");
            return Ok(FrameStatus::SkippedEmpty);
        };

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                return FrameStatus::after_surface_error(action);
            }
        };

        record_pass(
            RenderTarget::new(&mut frame.encoder, &frame.view),
            self.clear_color,
            &self.pipeline,
            &self.bind_group,
            Some(&plan),
        );

        self.gpu.submit(frame);
        Ok(self.state.record_presented())
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.state.point_count()
    }

    /// Data-space extent of the loaded points, `None` when empty.
    #[inline]
    pub fn bounds(&self) -> Option<DataBounds> {
        self.state.bounds()
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.state.transform()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.state.viewport()
    }

    /// Number of passes submitted since creation.
    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.state.frames_submitted()
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }
}

fn render_ctx<'a>(gpu: &'a Gpu<'_>) -> RenderCtx<'a> {
    RenderCtx::new(gpu.device(), gpu.queue(), gpu.viewport())
}
