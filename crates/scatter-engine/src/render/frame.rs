use crate::error::{Result, ScatterError};

use super::ctx::RenderTarget;
use super::pipeline::{ScatterPipeline, VertexSlot, QUAD_VERTEX_COUNT, VERTEX_SLOTS};
use super::registry::{BufferName, BufferRegistry};

/// Background every frame is cleared to before markers are drawn.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Validated inputs for one instanced draw.
///
/// `slots[i]` feeds vertex slot `i` of [`VERTEX_SLOTS`].
#[derive(Debug)]
pub struct DrawPlan<'a, B> {
    pub slots: [&'a B; 6],
    pub vertex_count: u32,
    pub instance_count: u32,
}

/// Resolves the six vertex buffers and checks their element counts.
///
/// Returns `Ok(None)` when there is nothing to draw. Per-point buffers must
/// each hold `point_count` elements and the offset buffer must hold one
/// element per quad vertex. The count must fit the `u32` instance range.
pub fn plan_draw<B>(registry: &BufferRegistry<B>, point_count: usize) -> Result<Option<DrawPlan<'_, B>>> {
    if point_count == 0 {
        return Ok(None);
    }
    let instance_count =
        u32::try_from(point_count).map_err(|_| ScatterError::TooManyPoints(point_count))?;

    let slots = [
        resolve_slot(registry, point_count, &VERTEX_SLOTS[0])?,
        resolve_slot(registry, point_count, &VERTEX_SLOTS[1])?,
        resolve_slot(registry, point_count, &VERTEX_SLOTS[2])?,
        resolve_slot(registry, point_count, &VERTEX_SLOTS[3])?,
        resolve_slot(registry, point_count, &VERTEX_SLOTS[4])?,
        resolve_slot(registry, point_count, &VERTEX_SLOTS[5])?,
    ];

    Ok(Some(DrawPlan {
        slots,
        vertex_count: QUAD_VERTEX_COUNT,
        instance_count,
    }))
}

fn resolve_slot<'r, B>(
    registry: &'r BufferRegistry<B>,
    point_count: usize,
    slot: &VertexSlot,
) -> Result<&'r B> {
    let name = slot.buffer;
    let entry = registry.get(name).ok_or(ScatterError::MissingBuffer(name))?;

    let expected = if name == BufferName::Offset {
        QUAD_VERTEX_COUNT as usize
    } else {
        point_count
    };
    let actual = entry.byte_len() / name.element_size();
    if actual != expected {
        return Err(ScatterError::InconsistentBuffers {
            buffer: name,
            expected,
            actual,
        });
    }
    Ok(entry.buffer())
}

/// Records one render pass: clear, then (if planned) a single instanced draw.
pub fn record_pass(
    target: RenderTarget<'_>,
    clear: wgpu::Color,
    pipeline: &ScatterPipeline,
    bind_group: &wgpu::BindGroup,
    plan: Option<&DrawPlan<'_, wgpu::Buffer>>,
) {
    let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("scatter pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    let Some(plan) = plan else { return };

    pass.set_pipeline(pipeline.pipeline());
    pass.set_bind_group(0, bind_group, &[]);
    for (slot, buffer) in plan.slots.iter().enumerate() {
        pass.set_vertex_buffer(slot as u32, buffer.slice(..));
    }
    pass.draw(0..plan.vertex_count, 0..plan.instance_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::pipeline::QUAD_OFFSETS;
    use crate::render::registry::testing::MemBackend;
    use crate::render::registry::UsageClass;

    fn filled(n: usize) -> (MemBackend, BufferRegistry<crate::render::registry::testing::MemBuffer>) {
        let backend = MemBackend::default();
        let mut reg = BufferRegistry::new();
        reg.create_or_replace(&backend, BufferName::Vertex, &vec![[0.0f32; 2]; n], UsageClass::Vertex);
        reg.create_or_replace(&backend, BufferName::Color, &vec![[0.0f32; 4]; n], UsageClass::Vertex);
        reg.create_or_replace(&backend, BufferName::Size, &vec![1.0f32; n], UsageClass::Vertex);
        reg.create_or_replace(&backend, BufferName::StrokeColor, &vec![[0.0f32; 4]; n], UsageClass::Vertex);
        reg.create_or_replace(&backend, BufferName::StrokeWidth, &vec![0.0f32; n], UsageClass::Vertex);
        reg.create_or_replace(&backend, BufferName::Offset, &QUAD_OFFSETS, UsageClass::Vertex);
        (backend, reg)
    }

    #[test]
    fn plan_covers_all_slots_in_order() {
        let (_backend, reg) = filled(3);
        let plan = plan_draw(&reg, 3).unwrap().unwrap();

        assert_eq!(plan.vertex_count, 4);
        assert_eq!(plan.instance_count, 3);
        let labels: Vec<&str> = plan.slots.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["vertex", "color", "size", "strokeColor", "strokeWidth", "offset"]);
    }

    #[test]
    fn zero_points_plans_nothing() {
        let (_backend, reg) = filled(0);
        assert!(plan_draw(&reg, 0).unwrap().is_none());
    }

    #[test]
    fn missing_buffer_is_reported() {
        let reg = BufferRegistry::<crate::render::registry::testing::MemBuffer>::new();
        assert_eq!(
            plan_draw(&reg, 2).unwrap_err(),
            ScatterError::MissingBuffer(BufferName::Vertex)
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn instance_count_beyond_u32_is_rejected() {
        let (_backend, reg) = filled(1);
        let count = u32::MAX as usize + 1;
        assert_eq!(plan_draw(&reg, count).unwrap_err(), ScatterError::TooManyPoints(count));
    }

    #[test]
    fn mismatched_counts_are_reported() {
        let (backend, mut reg) = filled(3);
        reg.create_or_replace(&backend, BufferName::Size, &[1.0f32, 2.0], UsageClass::Vertex);

        assert_eq!(
            plan_draw(&reg, 3).unwrap_err(),
            ScatterError::InconsistentBuffers { buffer: BufferName::Size, expected: 3, actual: 2 }
        );
    }

    #[test]
    fn offset_must_hold_four_vertices() {
        let (backend, mut reg) = filled(2);
        reg.create_or_replace(&backend, BufferName::Offset, &[[0.0f32; 2]; 3], UsageClass::Vertex);

        assert!(matches!(
            plan_draw(&reg, 2),
            Err(ScatterError::InconsistentBuffers { buffer: BufferName::Offset, expected: 4, actual: 3 })
        ));
    }
}
