//! Draws two gray squares and a spinning colored square through the ember
//! shader cache and batchers.

mod scene;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ember_engine::coords::ColorRgba;
use ember_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use ember_engine::logging::{LogSink, LoggingConfig, init_logging};

use scene::Scene;

/// Demo settings.
#[derive(Debug, Clone)]
struct DemoConfig {
    title: String,
    initial_size: LogicalSize<f64>,
    log_file: PathBuf,
    clear_color: ColorRgba,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "ember demo".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
            log_file: PathBuf::from("ember_demo_logs.txt"),
            clear_color: ColorRgba::gray(0.1),
        }
    }
}

#[self_referencing]
struct DemoWindow {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct DemoApp {
    config: DemoConfig,
    started: Instant,

    // `scene` holds GPU objects from `window`'s device; declared first so it drops first.
    scene: Option<Scene>,
    window: Option<DemoWindow>,

    failure: Option<anyhow::Error>,
}

impl DemoApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            scene: None,
            window: None,
            failure: None,
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let window = DemoWindowTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, GpuInit::default())),
        }
        .try_build()?;

        let scene = window
            .with_gpu(|gpu| Scene::create(gpu))
            .context("failed to build shader cache")?;

        window.with_window(|w| w.request_redraw());
        self.scene = Some(scene);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(scene)) = (self.window.as_mut(), self.scene.as_mut()) else {
            return Ok(());
        };
        let angle = self.started.elapsed().as_secs_f32();
        let clear_color = self.config.clear_color;

        window.with_mut(|fields| -> Result<()> {
            let mut frame = match fields.gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    log::warn!("surface error: {err}");
                    return match fields.gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => {
                            Err(anyhow::anyhow!("surface is out of memory"))
                        }
                        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(()),
                    };
                }
            };

            frame.clear(clear_color);
            let stats = scene.render(fields.gpu, &mut frame, angle)?;
            log::trace!("frame: {stats:?}");

            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
            Ok(())
        })
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the center square is animated.
        if let Some(window) = &self.window {
            window.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("closing");
                self.scene = None;
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(window) = self.window.as_mut() {
                    window.with_gpu_mut(|gpu| gpu.resize(new_size));
                    window.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let config = DemoConfig::default();

    init_logging(LoggingConfig {
        sinks: vec![
            LogSink::console("debug"),
            LogSink::file(config.log_file.clone(), "info"),
        ],
        ..Default::default()
    });

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = DemoApp::new(config);
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
