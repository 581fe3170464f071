use crate::coords::Viewport;

use super::registry::{BufferBackend, UsageClass};

/// Renderer-facing context (device/queue + viewport).
///
/// Also the wgpu implementation of [`BufferBackend`].
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub viewport: Viewport, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            viewport,
        }
    }
}

impl BufferBackend for RenderCtx<'_> {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&self, label: &str, contents: &[u8], class: UsageClass) -> wgpu::Buffer {
        // wgpu rejects zero-sized vertex bindings; an empty point set still
        // gets a minimal allocation, the registry tracks the logical length.
        let size = (contents.len() as u64)
            .max(wgpu::COPY_BUFFER_ALIGNMENT)
            .next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: class.usages(),
            mapped_at_creation: false,
        });

        if !contents.is_empty() {
            self.queue.write_buffer(&buffer, 0, contents);
        }
        buffer
    }

    fn write_buffer(&self, buffer: &wgpu::Buffer, contents: &[u8]) {
        self.queue.write_buffer(buffer, 0, contents);
    }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
