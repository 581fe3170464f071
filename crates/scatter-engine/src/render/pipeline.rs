//! Shader validation and pipeline construction.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::error::{Result, ScatterError};

use super::registry::BufferName;

/// WGSL program shipped with the crate; matches the fixed layout below.
pub const DEFAULT_SHADER: &str = include_str!("shaders/scatter.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Vertices per marker quad (triangle strip).
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// Corner offsets of the unit quad in triangle-strip order.
pub const QUAD_OFFSETS: [[f32; 2]; QUAD_VERTEX_COUNT as usize] =
    [[-0.5, -0.5], [-0.5, 0.5], [0.5, -0.5], [0.5, 0.5]];

/// Uniform bindings in bind group 0.
pub const CANVAS_SIZE_BINDING: u32 = 0;
pub const TRANSFORM_BINDING: u32 = 1;

// ── vertex layout ─────────────────────────────────────────────────────────

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
const SIZE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];
const STROKE_COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x4];
const STROKE_WIDTH_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![4 => Float32];
const OFFSET_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![5 => Float32x2];

/// One vertex buffer slot: which registry buffer feeds it and how it steps.
#[derive(Debug, Copy, Clone)]
pub struct VertexSlot {
    pub buffer: BufferName,
    pub step_mode: wgpu::VertexStepMode,
    attributes: &'static [wgpu::VertexAttribute],
}

impl VertexSlot {
    #[inline]
    pub fn location(&self) -> u32 {
        self.attributes[0].shader_location
    }

    #[inline]
    pub fn format(&self) -> wgpu::VertexFormat {
        self.attributes[0].format
    }

    pub fn layout(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.buffer.element_size() as u64,
            step_mode: self.step_mode,
            attributes: self.attributes,
        }
    }
}

/// The six vertex slots, in binding order. External shaders must read
/// location `i` from slot `i`.
pub const VERTEX_SLOTS: [VertexSlot; 6] = [
    VertexSlot {
        buffer: BufferName::Vertex,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &POSITION_ATTRS,
    },
    VertexSlot {
        buffer: BufferName::Color,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &COLOR_ATTRS,
    },
    VertexSlot {
        buffer: BufferName::Size,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &SIZE_ATTRS,
    },
    VertexSlot {
        buffer: BufferName::StrokeColor,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &STROKE_COLOR_ATTRS,
    },
    VertexSlot {
        buffer: BufferName::StrokeWidth,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &STROKE_WIDTH_ATTRS,
    },
    VertexSlot {
        buffer: BufferName::Offset,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &OFFSET_ATTRS,
    },
];

// ── shader program ────────────────────────────────────────────────────────

/// A WGSL program that has been checked against the fixed layout.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    source: Cow<'static, str>,
}

impl ShaderProgram {
    /// Parses and validates `source`.
    ///
    /// The program must define `vs_main` and `fs_main`, read vertex inputs
    /// only from locations `0..=5`, and bind nothing except the two uniforms
    /// at group 0, bindings 0 (canvas size) and 1 (transform).
    pub fn from_wgsl(source: impl Into<Cow<'static, str>>) -> Result<Self> {
        let source = source.into();

        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|e| ScatterError::Compile(e.emit_to_string(&source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .map_err(|e| ScatterError::Compile(e.emit_to_string(&source)))?;

        check_entry_points(&module)?;
        check_bindings(&module)?;

        Ok(Self { source })
    }

    /// The bundled marker shader.
    pub fn bundled() -> Result<Self> {
        Self::from_wgsl(DEFAULT_SHADER)
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn check_entry_points(module: &naga::Module) -> Result<()> {
    let find = |name: &str, stage: naga::ShaderStage| {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
            .ok_or_else(|| ScatterError::Compile(format!("missing {stage:?} entry point `{name}`")))
    };

    let vertex = find(VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
    find(FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

    let declared: BTreeSet<u32> = VERTEX_SLOTS.iter().map(VertexSlot::location).collect();
    for location in vertex_input_locations(module, &vertex.function) {
        if !declared.contains(&location) {
            return Err(ScatterError::Compile(format!(
                "`{VERTEX_ENTRY}` reads vertex location {location}, which no slot provides"
            )));
        }
    }
    Ok(())
}

/// Locations read by a vertex entry point, including struct-wrapped inputs.
fn vertex_input_locations(module: &naga::Module, function: &naga::Function) -> Vec<u32> {
    let mut out = Vec::new();
    for arg in &function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => out.push(*location),
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    out.extend(members.iter().filter_map(|m| match &m.binding {
                        Some(naga::Binding::Location { location, .. }) => Some(*location),
                        _ => None,
                    }));
                }
            }
        }
    }
    out
}

fn check_bindings(module: &naga::Module) -> Result<()> {
    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");

        let known = binding.group == 0
            && (binding.binding == CANVAS_SIZE_BINDING || binding.binding == TRANSFORM_BINDING);
        if !known {
            return Err(ScatterError::Compile(format!(
                "global `{name}` is bound at @group({}) @binding({}), only group 0 bindings 0 and 1 exist",
                binding.group, binding.binding
            )));
        }
        if var.space != naga::AddressSpace::Uniform {
            return Err(ScatterError::Compile(format!(
                "global `{name}` must be a uniform, found {:?}",
                var.space
            )));
        }
    }
    Ok(())
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Immutable render pipeline plus its bind group layout.
pub struct ScatterPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ScatterPipeline {
    /// Validates `source` and builds the instanced-quad pipeline for `format`.
    pub fn build(device: &wgpu::Device, format: wgpu::TextureFormat, source: &str) -> Result<Self> {
        let program = ShaderProgram::from_wgsl(source.to_owned())?;
        Ok(Self::from_program(device, format, &program))
    }

    pub fn from_program(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        program: &ShaderProgram,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scatter shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(program.source().to_owned())),
        });

        let uniform_entry = |binding: u32, name: BufferName| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(name.element_size() as u64),
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scatter bgl"),
            entries: &[
                uniform_entry(CANVAS_SIZE_BINDING, BufferName::CanvasSize),
                uniform_entry(TRANSFORM_BINDING, BufferName::Transform),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scatter pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let buffers = VERTEX_SLOTS.map(|slot| slot.layout());

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scatter pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("scatter pipeline built for {format:?}");

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Binds the canvas-size and transform uniforms.
    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        canvas_size: &wgpu::Buffer,
        transform: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scatter bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: CANVAS_SIZE_BINDING,
                    resource: canvas_size.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: TRANSFORM_BINDING,
                    resource: transform.as_entire_binding(),
                },
            ],
        })
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
