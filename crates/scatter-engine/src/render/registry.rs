use std::collections::HashMap;
use std::fmt;

use bytemuck::Pod;

use crate::error::{Result, ScatterError};

/// Semantic names of every buffer the plot owns.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferName {
    /// Normalized positions, `[f32; 2]` per point.
    Vertex,
    /// Fill RGBA, `[f32; 4]` per point.
    Color,
    /// Marker size, `f32` per point.
    Size,
    /// Stroke RGBA, `[f32; 4]` per point.
    StrokeColor,
    /// Stroke width, `f32` per point.
    StrokeWidth,
    /// Quad corner offsets, `[f32; 2]` per vertex (4 vertices).
    Offset,
    /// Canvas size uniform.
    CanvasSize,
    /// View transform uniform.
    Transform,
}

impl BufferName {
    /// Buffers recreated together on every `set_data`.
    pub const PER_POINT: [BufferName; 5] = [
        BufferName::Vertex,
        BufferName::Color,
        BufferName::Size,
        BufferName::StrokeColor,
        BufferName::StrokeWidth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Color => "color",
            Self::Size => "size",
            Self::StrokeColor => "strokeColor",
            Self::StrokeWidth => "strokeWidth",
            Self::Offset => "offset",
            Self::CanvasSize => "canvasSize",
            Self::Transform => "transform",
        }
    }

    /// Bytes per element (per point, per vertex, or the whole uniform).
    pub fn element_size(self) -> usize {
        match self {
            Self::Vertex | Self::Offset => 8,
            Self::Color | Self::StrokeColor => 16,
            Self::Size | Self::StrokeWidth => 4,
            Self::CanvasSize | Self::Transform => 16,
        }
    }

    pub fn usage_class(self) -> UsageClass {
        match self {
            Self::CanvasSize | Self::Transform => UsageClass::Uniform,
            _ => UsageClass::Vertex,
        }
    }

    #[inline]
    pub fn is_per_point(self) -> bool {
        Self::PER_POINT.contains(&self)
    }
}

impl fmt::Display for BufferName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a buffer is bound during a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UsageClass {
    Vertex,
    Uniform,
}

impl UsageClass {
    /// wgpu usages for this class. Every buffer is also a copy destination.
    pub fn usages(self) -> wgpu::BufferUsages {
        let base = match self {
            Self::Vertex => wgpu::BufferUsages::VERTEX,
            Self::Uniform => wgpu::BufferUsages::UNIFORM,
        };
        base | wgpu::BufferUsages::COPY_DST
    }
}

/// Allocation and upload primitives the registry needs from a GPU.
///
/// Implemented for [`RenderCtx`](super::RenderCtx) with `wgpu::Buffer`
/// handles; tests use an in-memory backend.
pub trait BufferBackend {
    type Buffer;

    /// Allocates a buffer holding exactly `contents`.
    fn create_buffer(&self, label: &str, contents: &[u8], class: UsageClass) -> Self::Buffer;

    /// Overwrites `buffer` from offset 0. Lengths are checked by the caller.
    fn write_buffer(&self, buffer: &Self::Buffer, contents: &[u8]);
}

/// A registry entry: GPU handle plus the metadata needed to validate draws.
#[derive(Debug)]
pub struct RegisteredBuffer<B> {
    buffer: B,
    byte_len: usize,
    class: UsageClass,
}

impl<B> RegisteredBuffer<B> {
    #[inline]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    #[inline]
    pub fn class(&self) -> UsageClass {
        self.class
    }
}

/// Name-keyed GPU buffers.
///
/// The registry does not check that per-point buffers agree on their element
/// count; `set_data` replaces them as a batch and the frame planner validates
/// them before drawing.
#[derive(Debug)]
pub struct BufferRegistry<B> {
    entries: HashMap<BufferName, RegisteredBuffer<B>>,
}

impl<B> Default for BufferRegistry<B> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<B> BufferRegistry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: BufferName) -> Option<&RegisteredBuffer<B>> {
        self.entries.get(&name)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the buffer handle or `MissingBuffer`.
    pub fn buffer(&self, name: BufferName) -> Result<&B> {
        self.get(name)
            .map(RegisteredBuffer::buffer)
            .ok_or(ScatterError::MissingBuffer(name))
    }

    /// Number of elements in `name`, using the name's element size.
    pub fn element_count(&self, name: BufferName) -> Option<usize> {
        self.get(name).map(|e| e.byte_len / name.element_size())
    }

    /// Allocates a buffer sized to `data`, uploads it, and replaces any prior
    /// buffer under `name`. The old buffer is dropped (released).
    pub fn create_or_replace<K, T>(
        &mut self,
        backend: &K,
        name: BufferName,
        data: &[T],
        class: UsageClass,
    ) where
        K: BufferBackend<Buffer = B>,
        T: Pod,
    {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let buffer = backend.create_buffer(name.as_str(), bytes, class);

        let entry = RegisteredBuffer {
            buffer,
            byte_len: bytes.len(),
            class,
        };

        if self.entries.insert(name, entry).is_some() {
            log::trace!("replaced buffer `{name}` ({} bytes)", bytes.len());
        } else {
            log::trace!("created buffer `{name}` ({} bytes)", bytes.len());
        }
    }

    /// Overwrites an existing uniform buffer without reallocating.
    ///
    /// The buffer must exist, be uniform-class, and hold exactly as many bytes
    /// as `data`; a length mismatch is `SizeMismatch`.
    pub fn write_in_place<K, T>(&self, backend: &K, name: BufferName, data: &[T]) -> Result<()>
    where
        K: BufferBackend<Buffer = B>,
        T: Pod,
    {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let entry = self.get(name).ok_or(ScatterError::MissingBuffer(name))?;

        if entry.class != UsageClass::Uniform {
            return Err(ScatterError::NotUniform(name));
        }
        if entry.byte_len != bytes.len() {
            return Err(ScatterError::SizeMismatch {
                buffer: name,
                expected: entry.byte_len,
                actual: bytes.len(),
            });
        }

        backend.write_buffer(&entry.buffer, bytes);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemBackend;
    use super::*;

    #[test]
    fn create_records_length_and_class() {
        let backend = MemBackend::default();
        let mut reg = BufferRegistry::new();
        reg.create_or_replace(&backend, BufferName::Color, &[0.0f32; 8], UsageClass::Vertex);

        let e = reg.get(BufferName::Color).unwrap();
        assert_eq!(e.byte_len(), 32);
        assert_eq!(e.class(), UsageClass::Vertex);
        assert_eq!(e.buffer().label, "color");
        assert_eq!(reg.element_count(BufferName::Color), Some(2));
    }

    #[test]
    fn replace_swaps_the_handle() {
        let backend = MemBackend::default();
        let mut reg = BufferRegistry::new();
        reg.create_or_replace(&backend, BufferName::Size, &[1.0f32, 2.0], UsageClass::Vertex);
        reg.create_or_replace(&backend, BufferName::Size, &[3.0f32, 4.0, 5.0], UsageClass::Vertex);

        assert_eq!(reg.len(), 1);
        assert_eq!(backend.created.get(), 2);
        assert_eq!(reg.buffer(BufferName::Size).unwrap().floats(), vec![3.0, 4.0, 5.0]);
        assert_eq!(reg.element_count(BufferName::Size), Some(3));
    }

    #[test]
    fn write_in_place_overwrites_uniform() {
        let backend = MemBackend::default();
        let mut reg = BufferRegistry::new();
        reg.create_or_replace(&backend, BufferName::Transform, &[1.0f32, 0.0, 0.0, 0.0], UsageClass::Uniform);
        reg.write_in_place(&backend, BufferName::Transform, &[2.0f32, 0.5, 0.5, 0.0])
            .unwrap();

        assert_eq!(backend.created.get(), 1);
        assert_eq!(backend.writes.get(), 1);
        assert_eq!(
            reg.buffer(BufferName::Transform).unwrap().floats(),
            vec![2.0, 0.5, 0.5, 0.0]
        );
    }

    #[test]
    fn write_in_place_rejects_wrong_length() {
        let backend = MemBackend::default();
        let mut reg = BufferRegistry::new();
        reg.create_or_replace(&backend, BufferName::CanvasSize, &[0.0f32; 4], UsageClass::Uniform);

        let err = reg
            .write_in_place(&backend, BufferName::CanvasSize, &[0.0f32; 2])
            .unwrap_err();
        assert_eq!(
            err,
            ScatterError::SizeMismatch { buffer: BufferName::CanvasSize, expected: 16, actual: 8 }
        );
        assert_eq!(backend.writes.get(), 0);
    }

    #[test]
    fn write_in_place_rejects_vertex_buffers() {
        let backend = MemBackend::default();
        let mut reg = BufferRegistry::new();
        reg.create_or_replace(&backend, BufferName::Size, &[0.0f32; 4], UsageClass::Vertex);
        assert_eq!(
            reg.write_in_place(&backend, BufferName::Size, &[1.0f32; 4]),
            Err(ScatterError::NotUniform(BufferName::Size))
        );
    }

    #[test]
    fn write_in_place_requires_existing_buffer() {
        let backend = MemBackend::default();
        let reg: BufferRegistry<_> = BufferRegistry::new();
        assert_eq!(
            reg.write_in_place(&backend, BufferName::Transform, &[0.0f32; 4]),
            Err(ScatterError::MissingBuffer(BufferName::Transform))
        );
    }

    #[test]
    fn names_and_classes() {
        assert_eq!(BufferName::StrokeColor.to_string(), "strokeColor");
        assert_eq!(BufferName::CanvasSize.usage_class(), UsageClass::Uniform);
        assert!(BufferName::Vertex.is_per_point());
        assert!(!BufferName::Offset.is_per_point());
    }
}
