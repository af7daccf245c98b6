use std::fmt;

use thiserror::Error;

/// Device call that failed while preparing or presenting a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProvisionStage {
    /// Flushing the context before releasing the old buffers.
    Flush,
    InitSwapChain,
    ResizeBuffers,
    MakeSurface { buffer_index: usize },
    InitFence,
    Present,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flush => f.write_str("context flush"),
            Self::InitSwapChain => f.write_str("swap chain initialization"),
            Self::ResizeBuffers => f.write_str("swap chain resize"),
            Self::MakeSurface { buffer_index } => {
                write!(f, "surface creation for buffer {buffer_index}")
            }
            Self::InitFence => f.write_str("fence creation"),
            Self::Present => f.write_str("present"),
        }
    }
}

/// Errors returned by [`crate::context::ContextHandler`] frame operations.
///
/// `MissingContext` and `NoCurrentFrame` are call-order bugs in the caller.
/// `Device` means the frame failed and should be skipped.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("no GPU context; ensure_context must succeed first")]
    MissingContext,

    #[error("no frame prepared; call prepare_frame before flush")]
    NoCurrentFrame,

    #[error("buffer index {index} out of range for {count} buffers")]
    BufferIndexOutOfRange { index: usize, count: usize },

    #[error("no drawing surface in buffer slot {0}")]
    MissingSurface(usize),

    #[error("{stage} failed")]
    Device {
        stage: ProvisionStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl FrameError {
    pub(crate) fn device(stage: ProvisionStage, source: anyhow::Error) -> Self {
        Self::Device {
            stage,
            source: source.into(),
        }
    }

    /// Stage of a device failure, if this is one.
    pub fn stage(&self) -> Option<ProvisionStage> {
        match self {
            Self::Device { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_keeps_source_chain() {
        let err = FrameError::device(
            ProvisionStage::MakeSurface { buffer_index: 1 },
            anyhow::anyhow!("out of video memory"),
        );
        assert_eq!(err.to_string(), "surface creation for buffer 1 failed");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("out of video memory"));
        assert_eq!(err.stage(), Some(ProvisionStage::MakeSurface { buffer_index: 1 }));
    }

    #[test]
    fn precondition_errors_have_no_stage() {
        assert_eq!(FrameError::MissingContext.stage(), None);
        assert_eq!(FrameError::NoCurrentFrame.stage(), None);
    }
}
