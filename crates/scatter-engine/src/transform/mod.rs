//! View transform state machine.
//!
//! The transform is an affine map in clip space: a normalized point `p` is
//! drawn at `p * scale + (x, y)`. Gestures mutate it; the plot mirrors every
//! change into the `transform` uniform before redrawing.

mod controller;

pub use controller::{TransformController, ZOOM_STEP};

use bytemuck::{Pod, Zeroable};

use crate::coords::{Vec2, Viewport};

/// Clip-space view transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    /// Always `> 0`.
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Where a normalized point lands on screen (clip space).
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        p * self.scale + Vec2::new(self.x, self.y)
    }

    /// Inverse of [`apply`](Self::apply).
    #[inline]
    pub fn invert(self, screen: Vec2) -> Vec2 {
        (screen - Vec2::new(self.x, self.y)) / self.scale
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[inline]
    pub(crate) fn to_uniform(self) -> TransformUniform {
        TransformUniform {
            scale: self.scale,
            offset: [self.x, self.y],
            _pad: 0.0,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// GPU mirror of [`Transform`] (binding 1).
///
/// Matches the WGSL struct `{ scale: f32, x: f32, y: f32, _pad: f32 }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct TransformUniform {
    pub scale: f32,
    pub offset: [f32; 2],
    pub _pad: f32, // 16-byte alignment
}

/// Converts a pixel position (origin top-left, +Y down) to clip space.
#[inline]
pub fn pixel_to_clip(pixel: Vec2, viewport: Viewport) -> Vec2 {
    pixel.pixel_to_clip(viewport)
}

/// Converts a clip-space position back to pixels.
#[inline]
pub fn clip_to_pixel(clip: Vec2, viewport: Viewport) -> Vec2 {
    clip.clip_to_pixel(viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 16);
        let u = Transform { scale: 2.0, x: 0.25, y: -0.5 }.to_uniform();
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(floats, &[2.0, 0.25, -0.5, 0.0]);
    }

    #[test]
    fn apply_and_invert_roundtrip() {
        let t = Transform { scale: 3.0, x: 0.1, y: -0.2 };
        let p = Vec2::new(0.4, -0.7);
        let back = t.invert(t.apply(p));
        assert!((back - p).x.abs() < 1e-6 && (back - p).y.abs() < 1e-6);
    }

    #[test]
    fn pixel_clip_corners() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(pixel_to_clip(Vec2::new(0.0, 0.0), vp), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_clip(Vec2::new(800.0, 600.0), vp), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_clip(Vec2::new(400.0, 300.0), vp), Vec2::new(0.0, 0.0));
        assert_eq!(clip_to_pixel(Vec2::new(-1.0, 1.0), vp), Vec2::new(0.0, 0.0));
    }
}
