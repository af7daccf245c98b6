//! Recording device used by the handler tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{Result, bail};

use super::buffers::BUFFER_COUNT;
use crate::device::{DrawingSurface, GpuContext, Redrawer, SurfaceProps};
use crate::layer::FrameSize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    MakeContext,
    Flush,
    InitSwapChain,
    Resize(FrameSize),
    MakeSurface { index: usize, size: FrameSize, generation: u32 },
    InitFence,
    Close { index: usize, generation: u32 },
    Present { index: usize, generation: u32 },
}

pub(crate) type Journal = Rc<RefCell<Vec<Call>>>;

pub(crate) struct MockContext {
    journal: Journal,
}

impl GpuContext for MockContext {
    fn flush(&self) -> Result<()> {
        self.journal.borrow_mut().push(Call::Flush);
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct MockCanvas {
    pub index: usize,
    pub generation: u32,
    pub size: FrameSize,
    pub props: SurfaceProps,
}

pub(crate) struct MockSurface {
    canvas: MockCanvas,
    closed: Cell<bool>,
    journal: Journal,
}

impl DrawingSurface for MockSurface {
    type Canvas = MockCanvas;

    fn canvas(&self) -> MockCanvas {
        self.canvas
    }

    fn close(&self) {
        if !self.closed.replace(true) {
            self.journal.borrow_mut().push(Call::Close {
                index: self.canvas.index,
                generation: self.canvas.generation,
            });
        }
    }
}

#[derive(Default)]
pub(crate) struct MockRedrawer {
    pub journal: Journal,
    pub fail_context: bool,
    /// Fails the next `make_surface` for this slot, then clears itself.
    pub fail_surface_at: Option<usize>,
    /// One-shot failures of the next matching call.
    pub fail_init: bool,
    pub fail_resize: bool,
    pub fail_fence: bool,
    /// Forces the oracle to return this index.
    pub index_override: Option<usize>,
    cursor: usize,
    generation: u32,
}

impl MockRedrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.journal.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.journal.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }
}

impl Redrawer for MockRedrawer {
    type Context = MockContext;
    type Surface = MockSurface;

    fn make_context(&mut self) -> Result<MockContext> {
        self.record(Call::MakeContext);
        if self.fail_context {
            bail!("device removed");
        }
        Ok(MockContext {
            journal: Rc::clone(&self.journal),
        })
    }

    fn init_swap_chain(&mut self) -> Result<()> {
        self.record(Call::InitSwapChain);
        if std::mem::take(&mut self.fail_init) {
            bail!("swap chain creation rejected");
        }
        self.generation += 1;
        Ok(())
    }

    fn resize_buffers(&mut self, size: FrameSize) -> Result<()> {
        self.record(Call::Resize(size));
        if std::mem::take(&mut self.fail_resize) {
            bail!("buffer resize rejected");
        }
        self.generation += 1;
        Ok(())
    }

    fn make_surface(
        &mut self,
        _context: &MockContext,
        size: FrameSize,
        props: SurfaceProps,
        buffer_index: usize,
    ) -> Result<MockSurface> {
        if self.fail_surface_at == Some(buffer_index) {
            self.fail_surface_at = None;
            bail!("backbuffer {buffer_index} unavailable");
        }
        self.record(Call::MakeSurface {
            index: buffer_index,
            size,
            generation: self.generation,
        });
        Ok(MockSurface {
            canvas: MockCanvas {
                index: buffer_index,
                generation: self.generation,
                size,
                props,
            },
            closed: Cell::new(false),
            journal: Rc::clone(&self.journal),
        })
    }

    fn buffer_index(&mut self) -> usize {
        self.index_override.unwrap_or(self.cursor)
    }

    fn init_fence(&mut self) -> Result<()> {
        self.record(Call::InitFence);
        if std::mem::take(&mut self.fail_fence) {
            bail!("fence creation rejected");
        }
        Ok(())
    }

    fn present(&mut self, _context: &MockContext, surface: &MockSurface) -> Result<()> {
        self.record(Call::Present {
            index: surface.canvas.index,
            generation: surface.canvas.generation,
        });
        self.cursor = (self.cursor + 1) % BUFFER_COUNT;
        Ok(())
    }

    fn graphics_api(&self) -> String {
        "Mock".to_string()
    }

    fn adapter_name(&self) -> String {
        "Mock Adapter 9000".to_string()
    }

    fn adapter_memory_size(&self) -> Option<u64> {
        Some(4 * 1024 * 1024 * 1024)
    }
}
