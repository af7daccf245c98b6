use anyhow::Result;

use crate::device::GpuContext;

/// Device and queue handed to the context handler.
pub struct WgpuContext {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
}

impl WgpuContext {
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

impl GpuContext for WgpuContext {
    /// wgpu hands work to the driver on `Queue::submit`; this only drives
    /// completion callbacks so finished frames release their slots.
    fn flush(&self) -> Result<()> {
        let _ = self.device.poll(wgpu::PollType::Poll);
        Ok(())
    }
}
