use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::BUFFER_COUNT;

/// Per-backbuffer in-flight tracking.
///
/// A slot is marked when its frame is submitted and cleared from the queue's
/// work-done callback. The buffer-index oracle waits on the slot before handing
/// it back to the CPU.
pub(crate) struct FrameFence {
    in_flight: [Arc<AtomicBool>; BUFFER_COUNT],
}

impl FrameFence {
    pub fn new() -> Self {
        Self {
            in_flight: std::array::from_fn(|_| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn is_in_flight(&self, index: usize) -> bool {
        self.in_flight[index].load(Ordering::Acquire)
    }

    /// Marks `index` busy and returns the callback that releases it.
    pub fn begin(&self, index: usize) -> impl FnOnce() + Send + 'static {
        let flag = Arc::clone(&self.in_flight[index]);
        flag.store(true, Ordering::Release);
        move || flag.store(false, Ordering::Release)
    }

    /// Marks `index` busy until the work submitted so far on `queue` completes.
    pub fn signal_after_submit(&self, index: usize, queue: &wgpu::Queue) {
        queue.on_submitted_work_done(self.begin(index));
    }

    /// Blocks until the slot's last submission has completed.
    ///
    /// The device poll parks the thread until the queue drains, which also
    /// runs the completion callbacks that release the slot.
    pub fn wait(&self, index: usize, device: &wgpu::Device) {
        self.wait_with(index, || {
            device.poll(wgpu::PollType::wait_indefinitely()).map(drop)
        });
    }

    pub fn wait_idle(&self, device: &wgpu::Device) {
        if !self.any_in_flight() {
            return;
        }
        if let Err(e) = device.poll(wgpu::PollType::wait_indefinitely()) {
            log::warn!("draining the queue failed: {e}");
        }
    }

    fn any_in_flight(&self) -> bool {
        (0..BUFFER_COUNT).any(|index| self.is_in_flight(index))
    }

    /// Runs `block` until `index` is released. A failed `block` gives up.
    fn wait_with<E: std::fmt::Display>(
        &self,
        index: usize,
        mut block: impl FnMut() -> Result<(), E>,
    ) {
        while self.is_in_flight(index) {
            if let Err(e) = block() {
                log::warn!("waiting for backbuffer {index} failed: {e}");
                break;
            }
        }
    }
}
