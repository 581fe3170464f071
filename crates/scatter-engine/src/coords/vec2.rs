use core::ops::{Add, Div, Mul, Sub};

use super::Viewport;

/// A 2-D point or offset.
///
/// The same type carries physical pixels (+Y down) and clip-space values
/// (+Y up); [`pixel_to_clip`](Self::pixel_to_clip) and
/// [`clip_to_pixel`](Self::clip_to_pixel) cross between them.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Pixel position (origin top-left) to clip space. Degenerate canvas
    /// dimensions are treated as one pixel.
    #[inline]
    pub fn pixel_to_clip(self, viewport: Viewport) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        Self::new(self.x / w * 2.0 - 1.0, 1.0 - self.y / h * 2.0)
    }

    /// Clip-space position to pixels.
    #[inline]
    pub fn clip_to_pixel(self, viewport: Viewport) -> Self {
        Self::new(
            (self.x + 1.0) * 0.5 * viewport.width,
            (1.0 - self.y) * 0.5 * viewport.height,
        )
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}
