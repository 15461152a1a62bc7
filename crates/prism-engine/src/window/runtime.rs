use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::core::{App, AppControl, FrameCtx};
use crate::time::{FrameClock, FrameTime};

use super::HostSurface;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub inner_size: LogicalSize<f64>,
    pub position: LogicalPosition<f64>,
    pub resizable: bool,

    /// Frame callbacks per second. `0` redraws as fast as the loop spins.
    pub target_fps: u32,

    /// Graphics backends the wgpu instance may pick from.
    pub backends: wgpu::Backends,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            inner_size: LogicalSize::new(918.0, 1118.0),
            position: LogicalPosition::new(985.0, 18.0),
            resizable: false,
            target_fps: 60,
            backends: wgpu::Backends::all(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs the event loop until the window closes.
    ///
    /// `factory` builds the application once the surface exists. An error
    /// from it is fatal: the loop exits before any frame is drawn and the
    /// error is returned here.
    pub fn run<A, F>(config: RuntimeConfig, factory: F) -> Result<()>
    where
        A: App + 'static,
        F: FnOnce(&HostSurface) -> Result<A> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, factory);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct AppState<A, F> {
    config: RuntimeConfig,
    factory: Option<F>,

    // Dropped before `host`: the app's GPU resources go first.
    app: Option<A>,
    host: Option<HostSurface>,

    clock: FrameClock,
    startup_error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A, F> AppState<A, F>
where
    A: App + 'static,
    F: FnOnce(&HostSurface) -> Result<A>,
{
    fn new(config: RuntimeConfig, factory: F) -> Self {
        let clock = FrameClock::with_target_fps(config.target_fps);
        Self {
            config,
            factory: Some(factory),
            app: None,
            host: None,
            clock,
            startup_error: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail_startup(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("startup failed: {err:#}");
        self.startup_error = Some(err);
        self.request_exit(event_loop);
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let host = HostSurface::create(event_loop, &self.config)?;

        let factory = self
            .factory
            .take()
            .context("application factory already consumed")?;
        let app = factory(&host)?;

        self.app = Some(app);
        self.host = Some(host);
        Ok(())
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("window closed; shutting down");
        self.app = None;
        self.host = None;
        self.request_exit(event_loop);
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(app), Some(host)) = (self.app.as_mut(), self.host.as_mut()) else {
            return;
        };

        let time: FrameTime = self.clock.tick();
        let mut ctx = FrameCtx { surface: host, time };

        if app.on_frame(&mut ctx) == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A, F> ApplicationHandler for AppState<A, F>
where
    A: App + 'static,
    F: FnOnce(&HostSurface) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail_startup(event_loop, err);
            return;
        }

        self.clock.reset();
        if let Some(host) = &self.host {
            host.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(host) = &self.host else { return };

        if self.clock.is_due(std::time::Instant::now()) {
            host.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_deadline()));
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

        if self.host.as_ref().map(HostSurface::window_id) != Some(window_id) {
            return;
        }

        if let Some(app) = self.app.as_mut() {
            if app.on_window_event(&event) == AppControl::Exit {
                self.request_exit(event_loop);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            // The surface is re-sized lazily when the renderer attaches to it.
            WindowEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}
