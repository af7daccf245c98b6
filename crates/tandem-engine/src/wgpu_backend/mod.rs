//! wgpu-backed device layer.
//!
//! Implements [`crate::device::Redrawer`] on top of a window `wgpu::Surface`:
//! - requests the adapter/device/queue as the GPU context
//! - configures and resizes the surface as the swap chain
//! - allocates one offscreen backbuffer per slot and copies it out on present
//! - tracks per-slot GPU completion as the frame fence

mod canvas;
mod context;
mod error;
mod fence;
mod init;
mod redrawer;
mod surface;
mod swap_chain;

pub use canvas::{Canvas, Color};
pub use context::WgpuContext;
pub use error::SurfaceErrorAction;
pub use init::GpuInit;
pub use redrawer::WgpuRedrawer;
pub use surface::WgpuSurface;
