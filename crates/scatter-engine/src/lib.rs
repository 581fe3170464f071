//! Scatter engine crate.
//!
//! GPU instanced scatterplots on wgpu: data normalization, a named buffer
//! registry, a fixed instanced-quad pipeline and a pan/zoom transform driven
//! by gestures. The `window` module adds a winit viewer for binaries.

pub mod coords;
pub mod data;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod plot;
pub mod render;
pub mod transform;
pub mod window;

pub use error::{Result, ScatterError};
pub use plot::{FrameStatus, PlotConfig, Scatterplot};
