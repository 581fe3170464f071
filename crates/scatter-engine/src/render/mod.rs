//! GPU rendering subsystem.
//!
//! Markers are drawn as one instanced triangle strip: a 4-vertex quad per
//! point, with per-point attributes stepped per instance.
//!
//! Convention:
//! - Positions arrive normalized (clip space, before the view transform).
//! - Sizes and stroke widths are physical pixels; the vertex shader converts
//!   them using the canvas-size uniform.

mod ctx;
mod frame;
mod pipeline;
mod registry;

pub use ctx::{RenderCtx, RenderTarget};
pub use frame::{plan_draw, record_pass, DrawPlan, CLEAR_COLOR};
pub use pipeline::{
    ShaderProgram, ScatterPipeline, VertexSlot, CANVAS_SIZE_BINDING, DEFAULT_SHADER,
    FRAGMENT_ENTRY, QUAD_OFFSETS, QUAD_VERTEX_COUNT, TRANSFORM_BINDING, VERTEX_ENTRY,
    VERTEX_SLOTS,
};
pub use registry::{BufferBackend, BufferName, BufferRegistry, RegisteredBuffer, UsageClass};

#[cfg(test)]
pub(crate) use registry::testing;
