use std::sync::Arc;

use anyhow::{Context, Result, bail};
use winit::window::Window;

use crate::context::BUFFER_COUNT;
use crate::device::{Redrawer, SurfaceProps};
use crate::layer::FrameSize;

use super::GpuInit;
use super::context::WgpuContext;
use super::fence::FrameFence;
use super::surface::WgpuSurface;
use super::swap_chain::SwapChain;

struct Gpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
}

/// wgpu implementation of the device capability, bound to one window.
///
/// The swap chain is the window's `wgpu::Surface`. Each slot is an offscreen
/// texture that is copied into the acquired surface image on present. Slots
/// rotate after every present; the frame fence keeps the oracle from handing
/// back a slot whose last copy is still executing.
pub struct WgpuRedrawer {
    window: Arc<Window>,
    init: GpuInit,
    instance: wgpu::Instance,
    swap_chain: SwapChain,
    gpu: Option<Gpu>,
    fence: Option<FrameFence>,
    cursor: usize,
}

impl WgpuRedrawer {
    /// Creates the instance and the window surface. No device is requested yet.
    pub fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        Ok(Self {
            window,
            init,
            instance,
            swap_chain: SwapChain::new(surface),
            gpu: None,
            fence: None,
            cursor: 0,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Swap chain format, once initialized.
    pub fn surface_format(&self) -> Option<wgpu::TextureFormat> {
        self.swap_chain.format()
    }

    fn gpu(&self) -> Result<&Gpu> {
        self.gpu.as_ref().context("no wgpu device; make_context has not succeeded")
    }

    fn window_size(&self) -> FrameSize {
        let size = self.window.inner_size();
        FrameSize::new(size.width, size.height)
    }
}

impl Redrawer for WgpuRedrawer {
    type Context = WgpuContext;
    type Surface = WgpuSurface;

    fn make_context(&mut self) -> Result<WgpuContext> {
        let adapter = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: self.init.power_preference,
                compatible_surface: Some(self.swap_chain.surface()),
                force_fallback_adapter: false,
            },
        ))
        .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("tandem device"),
            required_features: self.init.required_features,
            required_limits: self.init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .context("failed to create wgpu device/queue")?;

        self.gpu = Some(Gpu {
            adapter,
            device: device.clone(),
        });

        Ok(WgpuContext { device, queue })
    }

    fn init_swap_chain(&mut self) -> Result<()> {
        let size = self.window_size();
        let gpu = self.gpu.as_ref().context("swap chain requested before device")?;
        self.swap_chain.configure(&gpu.adapter, &gpu.device, &self.init, size)
    }

    fn resize_buffers(&mut self, size: FrameSize) -> Result<()> {
        let gpu = self.gpu.as_ref().context("swap chain resized before device")?;
        // Copies into the old images must finish before they are reallocated.
        if let Some(fence) = &self.fence {
            fence.wait_idle(&gpu.device);
        }
        self.swap_chain.resize(&gpu.device, size)
    }

    fn make_surface(
        &mut self,
        context: &WgpuContext,
        size: FrameSize,
        props: SurfaceProps,
        buffer_index: usize,
    ) -> Result<WgpuSurface> {
        anyhow::ensure!(
            buffer_index < BUFFER_COUNT,
            "buffer index {buffer_index} out of range"
        );
        let format = self
            .swap_chain
            .format()
            .context("surface requested before swap chain initialization")?;

        Ok(WgpuSurface::new(&context.device, format, size, props, buffer_index))
    }

    fn buffer_index(&mut self) -> usize {
        let index = self.cursor;
        if let (Some(fence), Some(gpu)) = (&self.fence, &self.gpu) {
            fence.wait(index, &gpu.device);
        }
        index
    }

    fn init_fence(&mut self) -> Result<()> {
        if self.fence.is_some() {
            bail!("frame fence already created");
        }
        self.fence = Some(FrameFence::new());
        Ok(())
    }

    fn present(&mut self, context: &WgpuContext, surface: &WgpuSurface) -> Result<()> {
        anyhow::ensure!(!surface.is_closed(), "presenting a closed surface");

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tandem present encoder"),
            });
        surface.record(&mut encoder);

        let Some(frame) = self.swap_chain.acquire(&context.device)? else {
            // Recorded work still lands in the backbuffer; only the copy is skipped.
            context.queue.submit(std::iter::once(encoder.finish()));
            return Ok(());
        };

        let extent = wgpu::Extent3d {
            width: surface.size().width.min(frame.texture.width()),
            height: surface.size().height.min(frame.texture.height()),
            depth_or_array_layers: 1,
        };
        encoder.copy_texture_to_texture(
            surface.texture().as_image_copy(),
            frame.texture.as_image_copy(),
            extent,
        );

        context.queue.submit(std::iter::once(encoder.finish()));
        if let Some(fence) = &self.fence {
            fence.signal_after_submit(surface.buffer_index(), &context.queue);
        }

        self.window.pre_present_notify();
        frame.present();

        self.cursor = (self.cursor + 1) % BUFFER_COUNT;
        Ok(())
    }

    fn graphics_api(&self) -> String {
        match &self.gpu {
            Some(gpu) => format!("{:?}", gpu.adapter.get_info().backend),
            None => "wgpu".to_string(),
        }
    }

    fn adapter_name(&self) -> String {
        self.gpu()
            .map(|gpu| gpu.adapter.get_info().name)
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// wgpu does not expose dedicated video memory.
    fn adapter_memory_size(&self) -> Option<u64> {
        None
    }
}
