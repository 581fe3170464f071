use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::data::{DataBounds, PointData, PointSet, SetDataOptions};
use crate::device::SurfaceErrorAction;
use crate::error::Result;
use crate::input::Gesture;
use crate::render::{plan_draw, BufferBackend, BufferName, BufferRegistry, DrawPlan, UsageClass, QUAD_OFFSETS};
use crate::transform::{Transform, TransformController};

/// Outcome of one `render()` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// One pass was submitted and presented.
    Presented,
    /// No points are loaded; nothing was submitted.
    SkippedEmpty,
    /// The surface could not provide a frame; nothing was submitted.
    SkippedSurface,
}

impl FrameStatus {
    /// Status of a frame whose surface texture could not be acquired.
    ///
    /// `Fatal` is `SurfaceLost`; anything else skips the frame.
    pub fn after_surface_error(action: SurfaceErrorAction) -> Result<Self> {
        action.into_result()?;
        log::warn!("frame skipped: surface {action:?}");
        Ok(Self::SkippedSurface)
    }
}

/// GPU mirror of the canvas size (binding 0).
///
/// Matches the WGSL struct `{ size: vec2<f32>, _pad: vec2<f32> }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CanvasUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

impl CanvasUniform {
    fn new(viewport: Viewport) -> Self {
        Self {
            size: [viewport.width, viewport.height],
            _pad: [0.0; 2],
        }
    }
}

/// Everything a plot owns apart from the device and pipeline.
///
/// Generic over the buffer backend so that data loading, gestures and draw
/// planning run without a GPU.
#[derive(Debug)]
pub struct PlotState<B> {
    registry: BufferRegistry<B>,
    controller: TransformController,
    point_count: usize,
    bounds: Option<DataBounds>,
    frames_submitted: u64,
}

impl<B> PlotState<B> {
    /// Creates the fixed buffers: canvas size, quad offsets and the identity
    /// transform.
    pub fn new<K>(backend: &K, viewport: Viewport) -> Self
    where
        K: BufferBackend<Buffer = B>,
    {
        let mut registry = BufferRegistry::new();
        let controller = TransformController::new(viewport);

        registry.create_or_replace(
            backend,
            BufferName::CanvasSize,
            &[CanvasUniform::new(viewport)],
            UsageClass::Uniform,
        );
        registry.create_or_replace(backend, BufferName::Offset, &QUAD_OFFSETS, UsageClass::Vertex);
        registry.create_or_replace(
            backend,
            BufferName::Transform,
            &[controller.transform().to_uniform()],
            UsageClass::Uniform,
        );

        Self {
            registry,
            controller,
            point_count: 0,
            bounds: None,
            frames_submitted: 0,
        }
    }

    #[inline]
    pub fn registry(&self) -> &BufferRegistry<B> {
        &self.registry
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    #[inline]
    pub fn bounds(&self) -> Option<DataBounds> {
        self.bounds
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.controller.transform()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    /// Number of passes submitted since creation.
    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Counts one submitted pass.
    pub fn record_presented(&mut self) -> FrameStatus {
        self.frames_submitted += 1;
        FrameStatus::Presented
    }

    /// Normalizes `points` and `options`, then replaces all five per-point
    /// buffers as one batch.
    ///
    /// Validation happens before any buffer is touched; on error the previous
    /// data stays in place.
    pub fn set_data<K>(&mut self, backend: &K, points: &PointSet, options: &SetDataOptions) -> Result<()>
    where
        K: BufferBackend<Buffer = B>,
    {
        let data = PointData::prepare(points, options)?;

        let batch: [(BufferName, &[f32]); 5] = [
            (BufferName::Vertex, data.geometry.positions()),
            (BufferName::Color, data.colors.as_slice()),
            (BufferName::Size, data.sizes.as_slice()),
            (BufferName::StrokeColor, data.stroke_colors.as_slice()),
            (BufferName::StrokeWidth, data.stroke_widths.as_slice()),
        ];
        for (name, values) in batch {
            self.registry.create_or_replace(backend, name, values, UsageClass::Vertex);
        }

        self.point_count = data.point_count();
        self.bounds = data.geometry.bounds();
        self.write_canvas_size(backend)?;

        log::debug!("loaded {} points, bounds {:?}", self.point_count, self.bounds);
        Ok(())
    }

    /// Applies one gesture and mirrors the new transform into its uniform.
    pub fn apply_gesture<K>(&mut self, backend: &K, gesture: Gesture) -> Result<Transform>
    where
        K: BufferBackend<Buffer = B>,
    {
        let transform = self.controller.apply(gesture)?;
        self.registry.write_in_place(
            backend,
            BufferName::Transform,
            &[transform.to_uniform()],
        )?;
        log::trace!("{gesture:?} -> {transform:?}");
        Ok(transform)
    }

    /// Records a new canvas size and rewrites its uniform.
    pub fn resize<K>(&mut self, backend: &K, viewport: Viewport) -> Result<()>
    where
        K: BufferBackend<Buffer = B>,
    {
        self.controller.set_viewport(viewport);
        self.write_canvas_size(backend)
    }

    /// The draw for the current data, or `None` when no points are loaded.
    pub fn frame_plan(&self) -> Result<Option<DrawPlan<'_, B>>> {
        plan_draw(&self.registry, self.point_count)
    }

    fn write_canvas_size<K>(&self, backend: &K) -> Result<()>
    where
        K: BufferBackend<Buffer = B>,
    {
        let uniform = CanvasUniform::new(self.controller.viewport());
        self.registry
            .write_in_place(backend, BufferName::CanvasSize, &[uniform])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::data::Attribute;
    use crate::error::ScatterError;
    use crate::render::testing::{MemBackend, MemBuffer};

    fn state() -> (MemBackend, PlotState<MemBuffer>) {
        let backend = MemBackend::default();
        let state = PlotState::new(&backend, Viewport::new(800.0, 600.0));
        (backend, state)
    }

    fn floats(state: &PlotState<MemBuffer>, name: BufferName) -> Vec<f32> {
        state.registry().buffer(name).unwrap().floats()
    }

    // ── initialization ────────────────────────────────────────────────────

    #[test]
    fn new_creates_fixed_buffers_only() {
        let (backend, state) = state();
        assert_eq!(backend.created.get(), 3);
        assert_eq!(state.registry().len(), 3);
        assert_eq!(floats(&state, BufferName::CanvasSize), vec![800.0, 600.0, 0.0, 0.0]);
        assert_eq!(floats(&state, BufferName::Transform), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            floats(&state, BufferName::Offset),
            vec![-0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5, 0.5]
        );
        assert_eq!(state.point_count(), 0);
        assert!(state.frame_plan().unwrap().is_none());
    }

    // ── set_data ──────────────────────────────────────────────────────────

    #[test]
    fn two_points_with_defaults_plan_one_draw_of_two_instances() {
        let (backend, mut state) = state();
        state
            .set_data(&backend, &PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &SetDataOptions::default())
            .unwrap();

        assert_eq!(state.point_count(), 2);
        for name in [BufferName::Color, BufferName::Size, BufferName::StrokeColor, BufferName::StrokeWidth] {
            assert_eq!(state.registry().element_count(name), Some(2), "{name}");
        }
        assert_eq!(floats(&state, BufferName::Vertex), vec![-0.9, -0.9, 0.9, 0.9]);
        assert_eq!(floats(&state, BufferName::Size), vec![5.0, 5.0]);
        assert_eq!(
            floats(&state, BufferName::StrokeColor),
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        );

        let plan = state.frame_plan().unwrap().unwrap();
        assert_eq!(plan.vertex_count, 4);
        assert_eq!(plan.instance_count, 2);
    }

    #[test]
    fn set_data_replaces_the_per_point_batch() {
        let (backend, mut state) = state();
        let opts = SetDataOptions::new().with_colors("#FF0000");
        state.set_data(&backend, &PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &opts).unwrap();
        state
            .set_data(&backend, &PointSet::pairs(vec![[0.0, 0.0], [1.0, 2.0], [2.0, 1.0]]), &opts)
            .unwrap();

        // 3 fixed + 2 batches of 5.
        assert_eq!(backend.created.get(), 13);
        assert_eq!(state.registry().len(), 8);
        assert_eq!(state.point_count(), 3);
        assert_eq!(state.frame_plan().unwrap().unwrap().instance_count, 3);
        assert_eq!(
            state.bounds(),
            Some(DataBounds { x_min: 0.0, x_max: 2.0, y_min: 0.0, y_max: 2.0 })
        );
    }

    #[test]
    fn failed_set_data_keeps_previous_data() {
        let (backend, mut state) = state();
        state
            .set_data(&backend, &PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &SetDataOptions::default())
            .unwrap();
        let created = backend.created.get();

        let bad = SetDataOptions::new().with_sizes(Attribute::PerPoint(vec![1.0f32, 2.0, 3.0]));
        let err = state
            .set_data(&backend, &PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &bad)
            .unwrap_err();

        assert!(matches!(err, ScatterError::Cardinality { attribute: "sizes", expected: 2, actual: 3 }));
        assert_eq!(backend.created.get(), created);
        assert_eq!(state.point_count(), 2);
    }

    #[test]
    fn empty_data_plans_nothing() {
        let (backend, mut state) = state();
        state
            .set_data(&backend, &PointSet::pairs(Vec::new()), &SetDataOptions::default())
            .unwrap();
        assert_eq!(state.point_count(), 0);
        assert_eq!(state.bounds(), None);
        assert!(state.frame_plan().unwrap().is_none());
    }

    // ── gestures ──────────────────────────────────────────────────────────

    #[test]
    fn each_gesture_writes_the_transform_once() {
        let (backend, mut state) = state();
        let gestures = [
            Gesture::Zoom { factor: 2.0, pointer: Vec2::new(0.5, 0.5) },
            Gesture::Pan { delta: Vec2::new(-80.0, 0.0) },
            Gesture::Zoom { factor: 0.5, pointer: Vec2::zero() },
        ];
        for (i, g) in gestures.into_iter().enumerate() {
            state.apply_gesture(&backend, g).unwrap();
            assert_eq!(backend.writes.get(), i + 1);
        }

        let t = state.transform();
        assert_eq!(
            floats(&state, BufferName::Transform),
            vec![t.scale, t.x, t.y, 0.0]
        );

        state.apply_gesture(&backend, Gesture::Reset).unwrap();
        assert_eq!(floats(&state, BufferName::Transform), vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejected_gesture_leaves_uniform_untouched() {
        let (backend, mut state) = state();
        let err = state
            .apply_gesture(&backend, Gesture::Zoom { factor: 0.0, pointer: Vec2::zero() })
            .unwrap_err();
        assert!(matches!(err, ScatterError::InvalidGesture(_)));
        assert_eq!(backend.writes.get(), 0);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_rewrites_canvas_size_and_scales_pan() {
        let (backend, mut state) = state();
        state.resize(&backend, Viewport::new(400.0, 200.0)).unwrap();
        assert_eq!(floats(&state, BufferName::CanvasSize), vec![400.0, 200.0, 0.0, 0.0]);

        let t = state
            .apply_gesture(&backend, Gesture::Pan { delta: Vec2::new(400.0, 0.0) })
            .unwrap();
        assert!((t.x - 2.0).abs() < 1e-6);
    }

    // ── frame outcomes ────────────────────────────────────────────────────

    #[test]
    fn presented_frames_are_counted() {
        let (backend, mut state) = state();
        state
            .set_data(&backend, &PointSet::pairs(vec![[0.0, 0.0], [1.0, 1.0]]), &SetDataOptions::default())
            .unwrap();
        assert_eq!(state.frames_submitted(), 0);

        for expected in 1..=3 {
            assert!(state.frame_plan().unwrap().is_some());
            assert_eq!(state.record_presented(), FrameStatus::Presented);
            assert_eq!(state.frames_submitted(), expected);
        }
    }

    #[test]
    fn unavailable_surface_skips_without_counting() {
        let (_backend, state) = state();
        for action in [SurfaceErrorAction::Reconfigured, SurfaceErrorAction::SkipFrame] {
            assert_eq!(FrameStatus::after_surface_error(action), Ok(FrameStatus::SkippedSurface));
        }
        assert_eq!(state.frames_submitted(), 0);
    }

    #[test]
    fn fatal_surface_is_lost() {
        assert_eq!(
            FrameStatus::after_surface_error(SurfaceErrorAction::Fatal),
            Err(ScatterError::SurfaceLost)
        );
    }
}
