use anyhow::Result;

use crate::layer::{FrameSize, PixelGeometry};

/// Properties forwarded to every drawing surface created for a frame size.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceProps {
    pub pixel_geometry: PixelGeometry,
}

impl SurfaceProps {
    #[inline]
    pub const fn new(pixel_geometry: PixelGeometry) -> Self {
        Self { pixel_geometry }
    }
}

/// Long-lived GPU context created by [`Redrawer::make_context`].
pub trait GpuContext {
    /// Pushes all recorded GPU work to the device.
    ///
    /// Called before the swap chain buffers are released or reallocated.
    fn flush(&self) -> Result<()>;
}

/// Render target wrapping one swap chain backbuffer.
pub trait DrawingSurface {
    /// Handle used by application code to record drawing commands.
    type Canvas;

    /// Returns a handle to this surface's canvas.
    fn canvas(&self) -> Self::Canvas;

    /// Releases the native resources backing this surface.
    ///
    /// Must be idempotent. The surface must not be presented after closing.
    fn close(&self);
}

/// Graphics device capability consumed by the presentation context.
///
/// Implementations own the swap chain. They are driven from a single render
/// thread in the order enforced by [`crate::context::ContextHandler`].
pub trait Redrawer {
    type Context: GpuContext;
    type Surface: DrawingSurface;

    /// Creates the GPU context. Called at most once per successful handler.
    fn make_context(&mut self) -> Result<Self::Context>;

    /// Creates the swap chain. Called exactly once per context.
    fn init_swap_chain(&mut self) -> Result<()>;

    /// Reallocates the swap chain buffers at `size`.
    ///
    /// Any drain required before the old buffers can be released is the
    /// implementation's responsibility.
    fn resize_buffers(&mut self, size: FrameSize) -> Result<()>;

    /// Creates the drawing surface bound to backbuffer `buffer_index`.
    fn make_surface(
        &mut self,
        context: &Self::Context,
        size: FrameSize,
        props: SurfaceProps,
        buffer_index: usize,
    ) -> Result<Self::Surface>;

    /// Index of the backbuffer available for the next frame.
    ///
    /// Once the fence exists, implementations must not return an index whose
    /// previous frame is still in flight on the GPU.
    fn buffer_index(&mut self) -> usize;

    /// Creates the frame fence. Called exactly once per context, after the
    /// swap chain has been initialized.
    fn init_fence(&mut self) -> Result<()>;

    /// Submits `surface` for display.
    fn present(&mut self, context: &Self::Context, surface: &Self::Surface) -> Result<()>;

    /// Short name of the graphics API, e.g. `"Vulkan"`.
    fn graphics_api(&self) -> String;

    fn adapter_name(&self) -> String;

    /// Dedicated video memory in bytes, when the API exposes it.
    fn adapter_memory_size(&self) -> Option<u64>;
}
