//! winit runtime driving a [`crate::context::ContextHandler`] per frame.

mod app;
mod runtime;

pub use app::{App, AppControl, FrameInfo};
pub use runtime::{MAX_FAILED_FRAMES, Runtime, RuntimeConfig};
