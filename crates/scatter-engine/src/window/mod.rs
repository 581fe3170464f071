//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and one Window with a [`Scatterplot`](crate::Scatterplot)
//! bound to it, and translates window events into gestures.

mod runtime;

pub use runtime::{Dataset, Viewer, ViewerConfig};
