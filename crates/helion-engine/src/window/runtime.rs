use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::InputState;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "helion".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
        }
    }
}

/// Runtime commands buffered during a callback and applied after it returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Grabs or releases the cursor for mouse-look.
    pub fn capture_cursor(&mut self, captured: bool) {
        self.commands.push(Command::CaptureCursor(captured));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    CaptureCursor(bool),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the app exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        // Real-time renderer: redraw continuously rather than on demand.
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState::new(config, app);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.init_error.take() {
            return Err(err);
        }
        Ok(())
    }
}

struct WindowEntry {
    window: Arc<Window>,
    gpu: Gpu,
    input: InputState,
    clock: FrameClock,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    app: A,
    entry: Option<WindowEntry>,
    exit_requested: bool,
    init_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            entry: None,
            exit_requested: false,
            init_error: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), self.config.gpu.clone()))
            .context("GPU initialization failed")?;

        self.entry = Some(WindowEntry {
            window,
            gpu,
            input: InputState::default(),
            clock: FrameClock::default(),
        });
        Ok(())
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::CaptureCursor(captured) => self.set_cursor_captured(captured),
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        let Some(entry) = self.entry.as_mut() else { return };

        if captured {
            // Locked is not available everywhere; Confined is the fallback.
            let grabbed = entry
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| entry.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                log::warn!("cursor grab unavailable: {err}");
                return;
            }
            entry.window.set_cursor_visible(false);
        } else {
            let _ = entry.window.set_cursor_grab(CursorGrabMode::None);
            entry.window.set_cursor_visible(true);
        }
        entry.input.set_captured(captured);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("startup failed: {e:#}");
            self.init_error = Some(e);
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        if let Some(entry) = self.entry.as_ref() {
            entry.window.request_redraw();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        // Mouse-look uses raw motion; window-space cursor positions stall at
        // the edges once the cursor is grabbed.
        if let DeviceEvent::MouseMotion { delta } = event
            && let Some(entry) = self.entry.as_mut()
        {
            entry.input.apply_pointer_motion(delta);
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

        let Some(entry) = self.entry.as_mut() else { return };
        if entry.window.id() != window_id {
            return;
        }

        entry.input.apply_window_event(&event);
        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.gpu.resize(new_size);
                entry.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.window.inner_size();
                entry.gpu.resize(new_size);
                entry.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();

                let ft = entry.clock.tick();
                let control = {
                    let mut ctx = FrameCtx {
                        gpu: &mut entry.gpu,
                        input: &entry.input,
                        time: ft,
                        runtime: &mut runtime_ctx,
                    };
                    self.app.on_frame(&mut ctx)
                };

                entry.input.end_frame();
                entry.window.request_redraw();

                if control == AppControl::Exit {
                    runtime_ctx.exit();
                }
                self.apply_commands(event_loop, runtime_ctx);
            }

            _ => {}
        }
    }
}
