//! Device capability interface.
//!
//! The presentation context never talks to a graphics API directly. Everything
//! it needs from the device (context creation, swap chain setup and resize,
//! per-backbuffer surfaces, the buffer-index oracle, fence creation and
//! presentation) goes through [`Redrawer`].

mod error;
mod redrawer;

pub use error::{FrameError, ProvisionStage};
pub use redrawer::{DrawingSurface, GpuContext, Redrawer, SurfaceProps};
