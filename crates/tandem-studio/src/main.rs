use anyhow::Result;
use tandem_engine::logging::{LoggingConfig, init_logging};
use tandem_engine::wgpu_backend::{Canvas, Color};
use tandem_engine::window::{App, AppControl, FrameInfo, Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Cycles the clear color so buffer rotation and resizes are visible.
struct Studio {
    last_size: Option<(u32, u32)>,
}

impl App for Studio {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed
                && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
            {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, canvas: &Canvas, frame: FrameInfo) -> AppControl {
        let size = (frame.size.width, frame.size.height);
        if self.last_size != Some(size) {
            log::info!("backbuffers now {}x{}", size.0, size.1);
            self.last_size = Some(size);
        }

        let t = (frame.index % 240) as f64 / 240.0;
        let wave = |phase: f64| 0.5 + 0.5 * (std::f64::consts::TAU * (t + phase)).sin();
        canvas.clear(Color::rgb(wave(0.0) * 0.3, wave(1.0 / 3.0) * 0.3, wave(2.0 / 3.0) * 0.3));

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Tandem Studio".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, Studio { last_size: None })
}
