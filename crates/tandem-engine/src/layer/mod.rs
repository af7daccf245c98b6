//! Window-side inputs to the presentation context.
//!
//! The runtime samples the window once per frame into a [`LayerMetrics`]
//! snapshot; the context handler turns it into a physical [`FrameSize`].

mod metrics;

pub use metrics::{FrameSize, LayerMetrics, PixelGeometry};
