//! Coordinate types shared by the plot, gestures and renderer.
//!
//! Two spaces are in use:
//! - Physical pixels: origin top-left, +X right, +Y down (pointer samples,
//!   marker sizes, the canvas).
//! - Clip space: [-1, 1] on both axes, +Y up (normalized points, the view
//!   transform, zoom anchors).
//!
//! [`Vec2::pixel_to_clip`] and [`Vec2::clip_to_pixel`] convert between them.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
