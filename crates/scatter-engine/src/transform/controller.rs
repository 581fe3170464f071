use crate::coords::{Vec2, Viewport};
use crate::error::{Result, ScatterError};
use crate::input::Gesture;

use super::Transform;

/// Zoom factor applied per wheel line.
pub const ZOOM_STEP: f32 = 1.1;

/// Owns the view transform and the canvas size used to scale pan deltas.
#[derive(Debug, Clone)]
pub struct TransformController {
    transform: Transform,
    viewport: Viewport,
}

impl TransformController {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            transform: Transform::IDENTITY,
            viewport,
        }
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the canvas size. The transform itself is left untouched.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scales around `pointer` (clip space) so the point under it stays put.
    pub fn zoom(&mut self, factor: f32, pointer: Vec2) -> Result<Transform> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ScatterError::InvalidGesture(format!(
                "zoom factor must be finite and positive, got {factor}"
            )));
        }
        if !pointer.is_finite() {
            return Err(ScatterError::InvalidGesture(
                "zoom pointer is not finite".to_owned(),
            ));
        }

        let scale = self.transform.scale * factor;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ScatterError::InvalidGesture(format!(
                "zoom by {factor} would leave scale at {scale}"
            )));
        }

        let t = &mut self.transform;
        t.scale = scale;
        t.x = pointer.x - (pointer.x - t.x) * factor;
        t.y = pointer.y - (pointer.y - t.y) * factor;
        Ok(*t)
    }

    /// Translates by a pixel delta (+Y down).
    ///
    /// The delta is divided by the current scale so a drag covers the same
    /// screen distance at every zoom level.
    pub fn pan(&mut self, delta: Vec2) -> Result<Transform> {
        if !delta.is_finite() {
            return Err(ScatterError::InvalidGesture(
                "pan delta is not finite".to_owned(),
            ));
        }

        let w = self.viewport.width.max(1.0);
        let h = self.viewport.height.max(1.0);

        let t = &mut self.transform;
        let x = t.x + (delta.x / w * 2.0) / t.scale;
        let y = t.y - (delta.y / h * 2.0) / t.scale;
        if !x.is_finite() || !y.is_finite() {
            return Err(ScatterError::InvalidGesture(format!(
                "pan by ({}, {}) overflows the transform",
                delta.x, delta.y
            )));
        }

        t.x = x;
        t.y = y;
        Ok(*t)
    }

    pub fn reset(&mut self) -> Transform {
        self.transform = Transform::IDENTITY;
        self.transform
    }

    /// Dispatches one gesture. Each call produces exactly one new transform.
    pub fn apply(&mut self, gesture: Gesture) -> Result<Transform> {
        match gesture {
            Gesture::Zoom { factor, pointer } => self.zoom(factor, pointer),
            Gesture::Pan { delta } => self.pan(delta),
            Gesture::Reset => Ok(self.reset()),
        }
    }
}
