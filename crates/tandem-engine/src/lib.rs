//! Tandem engine crate.
//!
//! Double-buffered presentation context for a window swap chain: GPU context
//! lifecycle, per-backbuffer drawing surfaces, resize-driven reprovisioning,
//! one-time fence creation and presentation. The core in [`context`] is
//! device-agnostic; [`wgpu_backend`] and [`window`] bind it to wgpu and winit.

pub mod context;
pub mod device;
pub mod layer;
pub mod logging;
pub mod wgpu_backend;
pub mod window;
