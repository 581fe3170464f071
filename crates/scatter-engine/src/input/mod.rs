//! Interaction input.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The viewer runtime feeds pointer samples into a [`GestureTracker`] and
//! hands the resulting [`Gesture`]s to the plot.

mod gesture;

pub use gesture::{Gesture, GestureTracker, WheelDelta, PIXELS_PER_LINE};
