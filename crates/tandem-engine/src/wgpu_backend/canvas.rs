use std::cell::RefCell;
use std::rc::Rc;

use crate::layer::FrameSize;

/// Linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    #[inline]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum CanvasOp {
    Clear(Color),
}

#[derive(Debug)]
struct CanvasState {
    size: FrameSize,
    ops: Vec<CanvasOp>,
}

/// Recording handle for one backbuffer.
///
/// Clones share the same command list. Commands are replayed into the
/// backbuffer when the frame is presented.
#[derive(Debug, Clone)]
pub struct Canvas {
    state: Rc<RefCell<CanvasState>>,
}

impl Canvas {
    pub(crate) fn new(size: FrameSize) -> Self {
        Self {
            state: Rc::new(RefCell::new(CanvasState {
                size,
                ops: Vec::new(),
            })),
        }
    }

    /// Backbuffer size in physical pixels.
    pub fn size(&self) -> FrameSize {
        self.state.borrow().size
    }

    /// Fills the whole backbuffer. Anything recorded before is discarded.
    pub fn clear(&self, color: Color) {
        let mut state = self.state.borrow_mut();
        state.ops.clear();
        state.ops.push(CanvasOp::Clear(color));
    }

    pub fn pending_ops(&self) -> usize {
        self.state.borrow().ops.len()
    }

    pub(crate) fn take_ops(&self) -> Vec<CanvasOp> {
        std::mem::take(&mut self.state.borrow_mut().ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_replaces_earlier_ops() {
        let canvas = Canvas::new(FrameSize::new(4, 4));
        canvas.clear(Color::WHITE);
        canvas.clear(Color::BLACK);
        assert_eq!(canvas.take_ops(), vec![CanvasOp::Clear(Color::BLACK)]);
    }

    #[test]
    fn take_ops_drains() {
        let canvas = Canvas::new(FrameSize::new(4, 4));
        canvas.clear(Color::TRANSPARENT);
        assert_eq!(canvas.pending_ops(), 1);
        let _ = canvas.take_ops();
        assert_eq!(canvas.pending_ops(), 0);
    }

    #[test]
    fn clones_share_commands() {
        let canvas = Canvas::new(FrameSize::new(8, 2));
        let other = canvas.clone();
        other.clear(Color::rgb(0.2, 0.4, 0.6));
        assert_eq!(canvas.pending_ops(), 1);
        assert_eq!(canvas.size(), FrameSize::new(8, 2));
    }

    #[test]
    fn color_converts_to_wgpu() {
        let c: wgpu::Color = Color::rgba(0.1, 0.2, 0.3, 0.4).into();
        assert_eq!((c.r, c.g, c.b, c.a), (0.1, 0.2, 0.3, 0.4));
    }
}
