use std::rc::Rc;

use crate::device::{
    DrawingSurface, FrameError, GpuContext, ProvisionStage, Redrawer, SurfaceProps,
};
use crate::layer::{FrameSize, LayerMetrics};

use super::buffers::BufferSet;
use super::config::HandlerConfig;
use super::pin::Pinned;

type Canvas<R> = <<R as Redrawer>::Surface as DrawingSurface>::Canvas;

/// Lifecycle stage of a [`ContextHandler`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandlerState {
    /// No GPU context yet (or creation failed).
    NoContext,
    /// Context exists; the swap chain has not been created.
    ContextReady,
    /// Swap chain created; `size` is the last provisioned backbuffer size.
    SwapChainReady { size: FrameSize },
}

/// Owns the GPU context and the double-buffered drawing surfaces for one
/// presentation target.
///
/// Per frame the caller runs `ensure_context`, `prepare_frame`, draws into the
/// returned canvas, then `flush`. Surfaces are recreated as a full set whenever
/// the physical size changes or after [`dispose_buffers`](Self::dispose_buffers).
/// The swap chain is initialized once and the frame fence is created once per
/// context; later size changes only resize the swap chain buffers.
///
/// Not thread-safe: all calls must come from the render thread.
pub struct ContextHandler<R: Redrawer> {
    redrawer: R,
    config: HandlerConfig,

    context: Option<Rc<R::Context>>,
    buffers: BufferSet<R::Surface>,

    /// Size the live surface set was created with.
    size: FrameSize,
    swap_chain_ready: bool,
    fence_ready: bool,

    /// Surface selected by the last `prepare_frame`, consumed by `flush`.
    current: Option<Rc<R::Surface>>,
}

impl<R: Redrawer> ContextHandler<R> {
    pub fn new(redrawer: R, config: HandlerConfig) -> Self {
        Self {
            redrawer,
            config,
            context: None,
            buffers: BufferSet::new(),
            size: FrameSize::ZERO,
            swap_chain_ready: false,
            fence_ready: false,
            current: None,
        }
    }

    pub fn config(&self) -> HandlerConfig {
        self.config
    }

    pub fn redrawer(&self) -> &R {
        &self.redrawer
    }

    pub fn redrawer_mut(&mut self) -> &mut R {
        &mut self.redrawer
    }

    pub fn state(&self) -> HandlerState {
        match (&self.context, self.swap_chain_ready) {
            (None, _) => HandlerState::NoContext,
            (Some(_), false) => HandlerState::ContextReady,
            (Some(_), true) => HandlerState::SwapChainReady { size: self.size },
        }
    }

    /// Physical size of the live surface set.
    pub fn frame_size(&self) -> FrameSize {
        self.size
    }

    /// Number of provisioned drawing surfaces.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Creates the GPU context if it does not exist yet.
    ///
    /// Returns `false` when the device fails to create one. Nothing is retained
    /// in that case and no retry is scheduled; calling again next frame retries.
    pub fn ensure_context(&mut self) -> bool {
        if self.context.is_some() {
            return true;
        }

        match self.redrawer.make_context() {
            Ok(context) => {
                self.context = Some(Rc::new(context));
                if self.config.hardware_info {
                    log::info!("Renderer info:\n {}", self.renderer_info());
                }
                true
            }
            Err(e) => {
                log::warn!(
                    "{e:#}\n Failed to create {} context!",
                    self.redrawer.graphics_api()
                );
                false
            }
        }
    }

    /// Makes the surface for the current backbuffer ready and returns its canvas.
    ///
    /// The full surface set is recreated when the scaled size differs from the
    /// provisioned one or when no surface is live.
    pub fn prepare_frame(&mut self, metrics: &LayerMetrics) -> Result<Canvas<R>, FrameError> {
        let context = self.context.clone().ok_or(FrameError::MissingContext)?;
        let size = FrameSize::from_metrics(metrics);

        if size != self.size || self.buffers.is_empty() {
            self.provision(&context, size, SurfaceProps::new(metrics.pixel_geometry))?;
        }

        let index = self.redrawer.buffer_index();
        let surface = Rc::clone(self.buffers.get(index)?);
        let canvas = surface.canvas();
        self.current = Some(surface);
        Ok(canvas)
    }

    /// Presents the surface selected by the last `prepare_frame`.
    pub fn flush(&mut self) -> Result<(), FrameError> {
        let context = Pinned::new(self.context.as_ref().ok_or(FrameError::MissingContext)?);
        let surface = Pinned::new(&self.current.take().ok_or(FrameError::NoCurrentFrame)?);

        self.redrawer
            .present(&context, &surface)
            .map_err(|e| FrameError::device(ProvisionStage::Present, e))
    }

    /// Closes every drawing surface. The next `prepare_frame` recreates them
    /// without touching the swap chain init state or the fence.
    pub fn dispose_buffers(&mut self) {
        self.current = None;
        if !self.buffers.is_empty() {
            log::debug!("disposing {} drawing surfaces", self.buffers.len());
        }
        self.buffers.dispose();
    }

    /// Human-readable description of the graphics API and adapter.
    pub fn renderer_info(&self) -> String {
        let mut info = format!(
            "Graphics API: {}\nOS: {} {}\n",
            self.redrawer.graphics_api(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        );
        info.push_str(&format!("Video card: {}\n", self.redrawer.adapter_name()));
        match self.redrawer.adapter_memory_size() {
            Some(bytes) => info.push_str(&format!("Total VRAM: {} MB\n", bytes / 1024 / 1024)),
            None => info.push_str("Total VRAM: unknown\n"),
        }
        info
    }

    fn provision(
        &mut self,
        context: &Rc<R::Context>,
        size: FrameSize,
        props: SurfaceProps,
    ) -> Result<(), FrameError> {
        log::debug!(
            "provisioning {}x{} drawing surfaces (was {}x{})",
            size.width,
            size.height,
            self.size.width,
            self.size.height
        );

        self.dispose_buffers();
        context
            .flush()
            .map_err(|e| FrameError::device(ProvisionStage::Flush, e))?;

        if self.swap_chain_ready {
            self.redrawer
                .resize_buffers(size)
                .map_err(|e| FrameError::device(ProvisionStage::ResizeBuffers, e))?;
        } else {
            self.redrawer
                .init_swap_chain()
                .map_err(|e| FrameError::device(ProvisionStage::InitSwapChain, e))?;
            self.swap_chain_ready = true;
        }

        {
            let context = Pinned::new(context);
            for buffer_index in 0..super::BUFFER_COUNT {
                match self.redrawer.make_surface(&context, size, props, buffer_index) {
                    Ok(surface) => self.buffers.insert(buffer_index, surface),
                    Err(e) => {
                        // Never leave a partial generation behind.
                        self.buffers.dispose();
                        return Err(FrameError::device(
                            ProvisionStage::MakeSurface { buffer_index },
                            e,
                        ));
                    }
                }
            }
        }

        if !self.fence_ready {
            if let Err(e) = self.redrawer.init_fence() {
                // Surfaces without a fence must not be handed out.
                self.buffers.dispose();
                return Err(FrameError::device(ProvisionStage::InitFence, e));
            }
            self.fence_ready = true;
        }

        self.size = size;
        Ok(())
    }
}

impl<R: Redrawer> Drop for ContextHandler<R> {
    fn drop(&mut self) {
        // Surfaces reference the context's device resources.
        self.dispose_buffers();
        self.context = None;
    }
}
