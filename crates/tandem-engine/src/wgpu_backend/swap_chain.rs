use anyhow::{Context, Result, bail};

use crate::layer::FrameSize;

use super::GpuInit;
use super::error::SurfaceErrorAction;

/// Window surface plus its active configuration.
///
/// Unconfigured until [`SwapChain::configure`] runs. wgpu rejects 0x0
/// configurations, so a zero-sized resize is recorded and deferred.
pub(crate) struct SwapChain {
    surface: wgpu::Surface<'static>,
    config: Option<wgpu::SurfaceConfiguration>,
    size: FrameSize,
}

impl SwapChain {
    pub fn new(surface: wgpu::Surface<'static>) -> Self {
        Self {
            surface,
            config: None,
            size: FrameSize::ZERO,
        }
    }

    pub fn surface(&self) -> &wgpu::Surface<'static> {
        &self.surface
    }

    pub fn format(&self) -> Option<wgpu::TextureFormat> {
        self.config.as_ref().map(|c| c.format)
    }

    /// First configuration of the surface.
    pub fn configure(
        &mut self,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        init: &GpuInit,
        size: FrameSize,
    ) -> Result<()> {
        let caps = self.surface.get_capabilities(adapter);
        anyhow::ensure!(
            caps.usages.contains(wgpu::TextureUsages::COPY_DST),
            "surface images cannot be used as a copy destination"
        );

        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);
        let extent = size.at_least_one();

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: extent.width,
            height: extent.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        self.surface.configure(device, &config);
        log::debug!("swap chain configured: {format:?} {}x{}", extent.width, extent.height);

        self.config = Some(config);
        self.size = size;
        Ok(())
    }

    /// Reallocates the swap chain images at `size`.
    pub fn resize(&mut self, device: &wgpu::Device, size: FrameSize) -> Result<()> {
        let Some(config) = self.config.as_mut() else {
            bail!("swap chain resized before initialization");
        };

        self.size = size;
        if size.is_empty() {
            return Ok(());
        }

        config.width = size.width;
        config.height = size.height;
        self.surface.configure(device, config);
        Ok(())
    }

    /// Acquires the next swap chain image.
    ///
    /// Returns `Ok(None)` when the frame has to be dropped.
    pub fn acquire(&mut self, device: &wgpu::Device) -> Result<Option<wgpu::SurfaceTexture>> {
        let err = match self.surface.get_current_texture() {
            Ok(texture) => return Ok(Some(texture)),
            Err(err) => err,
        };

        match SurfaceErrorAction::classify(&err) {
            SurfaceErrorAction::Reconfigure => {
                if let Some(config) = &self.config {
                    if !self.size.is_empty() {
                        self.surface.configure(device, config);
                    }
                }
                log::debug!("swap chain reconfigured after {err}");
                Ok(None)
            }
            SurfaceErrorAction::SkipFrame => {
                log::debug!("skipping frame: {err}");
                Ok(None)
            }
            SurfaceErrorAction::Fatal => Err(err).context("failed to acquire swap chain image"),
        }
    }
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as Alpha, TextureFormat as Fmt};

    #[test]
    fn srgb_format_preferred_when_available() {
        let formats = [Fmt::Rgba8Unorm, Fmt::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(Fmt::Rgba8UnormSrgb));
    }

    #[test]
    fn first_format_used_without_srgb_preference() {
        let formats = [Fmt::Bgra8Unorm, Fmt::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, false), Some(Fmt::Bgra8Unorm));
    }

    #[test]
    fn no_formats_yields_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let supported = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(choose_alpha_mode(&supported, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&supported, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
        assert_eq!(choose_alpha_mode(&[], None), Alpha::Auto);
    }
}
