use crate::error::ScatterError;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); the plot cannot continue.
    Fatal,
}

impl SurfaceErrorAction {
    /// `Fatal` becomes `SurfaceLost`; everything else only skips a frame.
    pub fn into_result(self) -> Result<(), ScatterError> {
        match self {
            Self::Fatal => Err(ScatterError::SurfaceLost),
            Self::Reconfigured | Self::SkipFrame => Ok(()),
        }
    }
}
