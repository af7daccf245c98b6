//! Presentation context lifecycle.
//!
//! [`ContextHandler`] sequences GPU context creation, double-buffered surface
//! provisioning, one-time fence creation and presentation on top of a
//! [`crate::device::Redrawer`].

mod buffers;
mod config;
mod handler;
mod pin;

#[cfg(test)]
mod mock;

pub use buffers::{BufferSet, BUFFER_COUNT};
pub use config::{HandlerConfig, HARDWARE_INFO_ENV};
pub use handler::{ContextHandler, HandlerState};
pub use pin::Pinned;
