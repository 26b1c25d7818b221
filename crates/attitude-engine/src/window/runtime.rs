use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "attitude".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit_requested: bool,
    error: Option<anyhow::Error>,
}

impl RuntimeCtx {
    /// Ends the loop after the current frame is presented.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    /// Ends the loop and makes `Runtime::run` return `err`.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.error = Some(err);
        self.exit_requested = true;
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `app` until exit, and shuts down.
    ///
    /// Window or GPU initialization failures, and failures the app reports
    /// through `RuntimeCtx::fail`, end the loop and are returned as the error.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    shut_down: bool,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            shut_down: false,
            error: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntry::try_new(
            InputState::default(),
            InputFrame::default(),
            FrameClock::default(),
            window,
            |w| pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed"),
        )
    }

    /// Applies the requests made through `ctx`; returns true when the loop
    /// should end. The first reported error wins.
    fn absorb(&mut self, ctx: RuntimeCtx) -> bool {
        let exit = ctx.exit_requested();
        if let Some(err) = ctx.error {
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
        exit
    }

    /// Shuts down (covers platforms that return from run_app without
    /// `exiting`) and yields the recorded error, if any.
    fn finish(mut self) -> Result<()> {
        self.shutdown();
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Lets the app release its resources, then drops the window and GPU.
    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        self.app.on_exit();

        if let Some(entry) = self.window.take() {
            let frames = entry.with_clock(|c| c.frames());
            log::debug!("window closed after {frames} frames");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;

        let Some(entry) = self.window.as_mut() else { return };
        let app = &mut self.app;

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            {
                let mut ctx = FrameCtx {
                    window: fields.window,
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time: ft,
                    runtime: &mut runtime_ctx,
                };

                app_control = app.on_frame(&mut ctx);
            }

            // Per-frame deltas are consumed; held keys persist.
            fields.input_frame.clear();
        });

        let exit = self.absorb(runtime_ctx);
        if exit || app_control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(mut entry) => {
                // Window and GPU setup block; start frame timing afterwards.
                entry.with_clock_mut(|c| c.reset());
                log::info!(
                    "window \"{}\" opened at {}x{}",
                    self.config.title,
                    self.config.initial_size.width,
                    self.config.initial_size.height
                );
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(err) => {
                self.error = Some(err);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces the loop.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
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

        let Some(entry) = self.window.as_mut() else { return };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(&event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested by window system");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_800_by_600() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.initial_size, LogicalSize::new(800.0, 600.0));
        assert!(cfg.resizable);
    }

    #[derive(Default)]
    struct Recorder {
        exits: u32,
    }

    impl CoreApp for Recorder {
        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }

        fn on_exit(&mut self) {
            self.exits += 1;
        }
    }

    fn state() -> AppState<Recorder> {
        AppState::new(RuntimeConfig::default(), GpuInit::default(), Recorder::default())
    }

    #[test]
    fn runtime_ctx_records_exit() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.exit_requested());
        ctx.exit();
        assert!(ctx.exit_requested());
    }

    #[test]
    fn untouched_ctx_keeps_running() {
        let mut state = state();
        assert!(!state.absorb(RuntimeCtx::default()));
        assert!(state.finish().is_ok());
    }

    #[test]
    fn exit_request_ends_loop_without_error() {
        let mut state = state();
        let mut ctx = RuntimeCtx::default();
        ctx.exit();
        assert!(state.absorb(ctx));
        assert!(state.finish().is_ok());
    }

    #[test]
    fn app_failure_ends_loop_and_is_returned() {
        let mut state = state();
        let mut ctx = RuntimeCtx::default();
        ctx.fail(anyhow::anyhow!("renderer build failed"));
        assert!(ctx.exit_requested());
        assert!(state.absorb(ctx));

        let err = state.finish().unwrap_err();
        assert_eq!(err.to_string(), "renderer build failed");
    }

    #[test]
    fn first_failure_is_kept() {
        let mut state = state();
        for msg in ["first", "second"] {
            let mut ctx = RuntimeCtx::default();
            ctx.fail(anyhow::anyhow!(msg));
            state.absorb(ctx);
        }
        assert_eq!(state.finish().unwrap_err().to_string(), "first");
    }

    #[test]
    fn shutdown_notifies_app_once() {
        let mut state = state();
        state.shutdown();
        state.shutdown();
        assert_eq!(state.app.exits, 1);
    }
}
