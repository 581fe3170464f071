use crate::coords::{Vec2, Viewport};
use crate::transform::{pixel_to_clip, ZOOM_STEP};

/// Pixel-precise wheel deltas are converted to lines at this ratio.
pub const PIXELS_PER_LINE: f32 = 50.0;

/// One interaction event, already resolved into transform terms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    /// Multiply scale by `factor`, anchored at `pointer` (clip space).
    Zoom { factor: f32, pointer: Vec2 },
    /// Drag by `delta` physical pixels (+Y down).
    Pan { delta: Vec2 },
    Reset,
}

/// Mouse wheel delta; positive `y` scrolls away from the user (zoom in).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Lines(f32),
    Pixels(f32),
}

impl WheelDelta {
    #[inline]
    fn lines(self) -> f32 {
        match self {
            Self::Lines(y) => y,
            Self::Pixels(y) => y / PIXELS_PER_LINE,
        }
    }
}

/// Turns raw pointer samples into [`Gesture`]s.
///
/// Tracks the last pointer position (physical pixels) and whether the primary
/// button is held. Every accepted sample maps to at most one gesture; nothing
/// is buffered or merged.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    viewport: Viewport,
    pointer: Option<Vec2>,
    dragging: bool,
}

impl GestureTracker {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pointer: None,
            dragging: false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Records a pointer move; yields a pan while the primary button is held.
    pub fn pointer_moved(&mut self, pos: Vec2) -> Option<Gesture> {
        let prev = self.pointer.replace(pos);
        if !self.dragging {
            return None;
        }
        let delta = pos - prev?;
        if delta == Vec2::zero() {
            return None;
        }
        Some(Gesture::Pan { delta })
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
        self.dragging = false;
    }

    /// Primary button state change.
    pub fn primary_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Zooms at the last known pointer, or at the canvas center if unknown.
    pub fn wheel(&mut self, delta: WheelDelta) -> Option<Gesture> {
        let lines = delta.lines();
        if lines == 0.0 || !lines.is_finite() {
            return None;
        }

        let pointer = self
            .pointer
            .map(|p| pixel_to_clip(p, self.viewport))
            .unwrap_or_else(Vec2::zero);

        Some(Gesture::Zoom {
            factor: ZOOM_STEP.powf(lines),
            pointer,
        })
    }
}
