use std::cell::Cell;

use crate::device::{DrawingSurface, SurfaceProps};
use crate::layer::FrameSize;

use super::canvas::{Canvas, CanvasOp};

/// Offscreen render target backing one swap chain slot.
///
/// The canvas is replayed into `texture`, which is then copied into the
/// acquired swap chain image on present.
pub struct WgpuSurface {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    canvas: Canvas,
    size: FrameSize,
    props: SurfaceProps,
    buffer_index: usize,
    closed: Cell<bool>,
}

impl WgpuSurface {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: FrameSize,
        props: SurfaceProps,
        buffer_index: usize,
    ) -> Self {
        let size = size.at_least_one();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tandem backbuffer"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            canvas: Canvas::new(size),
            size,
            props,
            buffer_index,
            closed: Cell::new(false),
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn props(&self) -> SurfaceProps {
        self.props
    }

    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub(crate) fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Replays pending canvas commands into the backbuffer texture.
    pub(crate) fn record(&self, encoder: &mut wgpu::CommandEncoder) {
        for op in self.canvas.take_ops() {
            match op {
                CanvasOp::Clear(color) => {
                    let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("tandem clear"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &self.view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(color.into()),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                        multiview_mask: None,
                    });
                }
            }
        }
    }
}

impl DrawingSurface for WgpuSurface {
    type Canvas = Canvas;

    fn canvas(&self) -> Canvas {
        self.canvas.clone()
    }

    fn close(&self) {
        if !self.closed.replace(true) {
            self.canvas.take_ops();
            self.texture.destroy();
        }
    }
}
