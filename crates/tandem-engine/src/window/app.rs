use winit::event::WindowEvent;

use crate::layer::FrameSize;
use crate::wgpu_backend::Canvas;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Per-frame metadata passed to [`App::on_frame`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameInfo {
    /// Count of frames presented so far.
    pub index: u64,
    /// Backbuffer size in physical pixels.
    pub size: FrameSize,
}

/// Application contract implemented by users of the runtime.
pub trait App {
    /// Called for every event on the runtime's window.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Records the frame into `canvas`. Presentation happens after return.
    fn on_frame(&mut self, canvas: &Canvas, frame: FrameInfo) -> AppControl;
}
