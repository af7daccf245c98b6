use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::context::{ContextHandler, HandlerConfig};
use crate::layer::LayerMetrics;
use crate::wgpu_backend::{GpuInit, WgpuRedrawer};

use super::app::{App, AppControl, FrameInfo};

/// Consecutive failed frames after which the runtime gives up.
pub const MAX_FAILED_FRAMES: u32 = 8;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub handler: HandlerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tandem".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
            handler: HandlerConfig::from_env(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and renders `app` into it until the window closes.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct WindowEntry {
    handler: ContextHandler<WgpuRedrawer>,
    window: Arc<Window>,
    frame_index: u64,
    failed_frames: u32,
}

impl WindowEntry {
    /// Drives one ensure/prepare/draw/flush cycle.
    ///
    /// A failed frame is logged and skipped; repeated failures end the run.
    fn render<A: App>(&mut self, app: &mut A) -> Result<AppControl> {
        if !self.handler.ensure_context() {
            return self.frame_failed();
        }

        let metrics = LayerMetrics::from_window(&self.window);
        let canvas = match self.handler.prepare_frame(&metrics) {
            Ok(canvas) => canvas,
            Err(e) => {
                log::error!("frame {} failed: {:#}", self.frame_index, anyhow::Error::from(e));
                self.handler.dispose_buffers();
                return self.frame_failed();
            }
        };

        let frame = FrameInfo {
            index: self.frame_index,
            size: self.handler.frame_size(),
        };
        let control = app.on_frame(&canvas, frame);

        if let Err(e) = self.handler.flush() {
            log::error!(
                "present of frame {} failed: {:#}",
                self.frame_index,
                anyhow::Error::from(e)
            );
            return self.frame_failed();
        }

        self.failed_frames = 0;
        self.frame_index += 1;
        Ok(control)
    }

    fn frame_failed(&mut self) -> Result<AppControl> {
        self.failed_frames += 1;
        if self.failed_frames >= MAX_FAILED_FRAMES {
            return Err(anyhow!(
                "giving up after {} consecutive failed frames",
                self.failed_frames
            ));
        }
        Ok(AppControl::Continue)
    }
}

struct RuntimeState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,

    entry: Option<WindowEntry>,
    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> RuntimeState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            entry: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let redrawer = WgpuRedrawer::new(Arc::clone(&window), self.config.gpu.clone())?;

        Ok(WindowEntry {
            handler: ContextHandler::new(redrawer, self.config.handler),
            window,
            frame_index: 0,
            failed_frames: 0,
        })
    }

    fn close_window(&mut self) {
        if let Some(mut entry) = self.entry.take() {
            entry.handler.dispose_buffers();
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.close_window();
        self.request_exit(event_loop);
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => self.entry = Some(entry),
            Err(e) => self.fail(event_loop, e.context("failed to create initial window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = &self.entry {
            entry.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let ours = self
            .entry
            .as_ref()
            .is_some_and(|e| e.window.id() == window_id);
        if !ours {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.close_window();
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.close_window();
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                // The handler picks up the new size on the next prepare_frame.
                if let Some(entry) = &self.entry {
                    entry.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                // Split borrows so the app and the window entry can both be used.
                let (app, entry) = (&mut self.app, &mut self.entry);
                let Some(entry) = entry.as_mut() else {
                    return;
                };

                match entry.render(app) {
                    Ok(AppControl::Continue) => {}
                    Ok(AppControl::Exit) => {
                        self.close_window();
                        self.request_exit(event_loop);
                    }
                    Err(e) => self.fail(event_loop, e),
                }
            }

            _ => {}
        }
    }
}
