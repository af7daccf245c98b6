use winit::window::Window;

/// Subpixel layout of the output device.
///
/// Forwarded to the device layer untouched; the core never interprets it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PixelGeometry {
    #[default]
    Unknown,
    RgbHorizontal,
    BgrHorizontal,
    RgbVertical,
    BgrVertical,
}

/// Window metrics sampled at the start of a frame.
///
/// `width`/`height` are logical units; `scale` converts them to physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerMetrics {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub pixel_geometry: PixelGeometry,
}

impl LayerMetrics {
    #[inline]
    pub const fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            pixel_geometry: PixelGeometry::Unknown,
        }
    }

    #[inline]
    pub const fn with_pixel_geometry(mut self, pixel_geometry: PixelGeometry) -> Self {
        self.pixel_geometry = pixel_geometry;
        self
    }

    /// Samples a winit window.
    ///
    /// winit reports the inner size in physical pixels; it is converted back to
    /// logical units so the scale is applied in exactly one place.
    /// winit exposes no subpixel layout, so the geometry is `Unknown`.
    pub fn from_window(window: &Window) -> Self {
        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale);
        Self::new(logical.width, logical.height, scale)
    }
}

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scales logical metrics to physical pixels.
    ///
    /// Each axis is rounded to the nearest pixel and clamped to `0..=u32::MAX`;
    /// negative or non-finite inputs become 0.
    pub fn from_metrics(metrics: &LayerMetrics) -> Self {
        Self::new(
            scale_axis(metrics.width, metrics.scale),
            scale_axis(metrics.height, metrics.scale),
        )
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size with each axis raised to at least one pixel.
    ///
    /// GPU APIs reject zero-sized textures and surface configurations.
    #[inline]
    pub fn at_least_one(self) -> Self {
        Self::new(self.width.max(1), self.height.max(1))
    }
}

fn scale_axis(logical: f64, scale: f64) -> u32 {
    let physical = (logical * scale).round();
    if physical.is_nan() || physical <= 0.0 {
        0
    } else if physical >= u32::MAX as f64 {
        u32::MAX
    } else {
        physical as u32
    }
}
