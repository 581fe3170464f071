//! Crate-level error type.

use std::fmt;

use crate::render::BufferName;

/// Errors produced by the scatter engine.
///
/// None of these are retried internally. Zero-point renders and transient
/// frame-acquisition failures are not errors; they are reported through
/// [`FrameStatus`](crate::plot::FrameStatus) instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ScatterError {
    /// No compatible adapter, device or surface could be obtained.
    Unsupported(String),
    /// Point or color input has an unrecognized shape or value.
    Format(String),
    /// A per-point attribute sequence does not have one entry per point.
    Cardinality {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An in-place uniform write does not match the existing byte length.
    SizeMismatch {
        buffer: BufferName,
        expected: usize,
        actual: usize,
    },
    /// A buffer was addressed before it was created.
    MissingBuffer(BufferName),
    /// An in-place write targeted a vertex-class buffer.
    NotUniform(BufferName),
    /// The shader program could not be built against the fixed layout.
    Compile(String),
    /// A gesture would leave the transform invalid (e.g. non-positive scale).
    InvalidGesture(String),
    /// Per-point buffers disagree on their element count at draw time.
    InconsistentBuffers {
        buffer: BufferName,
        expected: usize,
        actual: usize,
    },
    /// More points than one draw call can instance (`u32::MAX`).
    TooManyPoints(usize),
    /// The surface reported an unrecoverable error (commonly out of memory).
    SurfaceLost,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScatterError>;

impl fmt::Display for ScatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(msg) => write!(f, "unsupported GPU environment: {msg}"),
            Self::Format(msg) => write!(f, "invalid input format: {msg}"),
            Self::Cardinality {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "attribute `{attribute}` has {actual} values but there are {expected} points"
            ),
            Self::SizeMismatch {
                buffer,
                expected,
                actual,
            } => write!(
                f,
                "buffer `{buffer}` holds {expected} bytes, refusing in-place write of {actual} bytes"
            ),
            Self::MissingBuffer(name) => write!(f, "buffer `{name}` does not exist"),
            Self::NotUniform(name) => {
                write!(f, "buffer `{name}` is not a uniform and cannot be written in place")
            }
            Self::Compile(msg) => write!(f, "shader program failed to build: {msg}"),
            Self::InvalidGesture(msg) => write!(f, "invalid gesture: {msg}"),
            Self::InconsistentBuffers {
                buffer,
                expected,
                actual,
            } => write!(
                f,
                "buffer `{buffer}` has {actual} elements, expected {expected}"
            ),
            Self::TooManyPoints(count) => {
                write!(f, "{count} points exceed the per-draw instance limit of {}", u32::MAX)
            }
            Self::SurfaceLost => write!(f, "surface lost (out of memory)"),
        }
    }
}

impl std::error::Error for ScatterError {}
