use winit::event::WindowEvent;
use winit::window::WindowId;

use attitude_core::{ControlKeys, LoopEvent, LoopState, Orientation, SampleOutcome, Transform};
use attitude_engine::core::{App, AppControl, FrameCtx};
use attitude_engine::input::{InputFrame, InputState, Key};
use attitude_engine::window::RuntimeCtx;

use crate::config::IndicatorConfig;
use crate::horizon::HorizonRenderer;

/// The indicator's frame loop.
///
/// Each frame: sample held keys into the orientation, build the transform,
/// draw sky and ground, present. The runtime polls events between frames.
pub struct IndicatorApp {
    config: IndicatorConfig,
    orientation: Orientation,
    state: LoopState,
    horizon: Option<HorizonRenderer>,
}

impl IndicatorApp {
    pub fn new(config: IndicatorConfig) -> Self {
        Self {
            config,
            orientation: Orientation::LEVEL,
            state: LoopState::Running,
            horizon: None,
        }
    }

    fn terminate(&mut self, event: LoopEvent) {
        let next = self.state.transition(event);
        if next != self.state {
            log::info!("{:?} -> {:?} ({event:?})", self.state, next);
        }
        self.state = next;
    }

    /// Input sampler step: applies held keys, reports the exit key.
    fn sample(&mut self, input: &InputState) {
        let keys = control_keys(input);
        let before = self.orientation;

        if self.orientation.sample(keys, self.config.step_degrees) == SampleOutcome::ExitRequested {
            self.terminate(LoopEvent::ExitKey);
        }

        if self.orientation != before {
            log::trace!(
                "pitch {:.1} roll {:.1}",
                self.orientation.pitch,
                self.orientation.roll
            );
        }
    }

    fn transform(&self) -> Transform {
        Transform::with_pitch_scale(self.orientation, self.config.pitch_full_scale)
    }

    /// Runs the sampler and returns the transform to draw this frame, or
    /// `None` once the loop is terminating.
    ///
    /// Leaving `Running` asks the runtime to exit; the frame in which that
    /// happens is still drawn.
    fn step(&mut self, input: &InputState, runtime: &mut RuntimeCtx) -> Option<Transform> {
        if !self.state.is_running() {
            runtime.exit();
            return None;
        }

        self.sample(input);
        if !self.state.is_running() {
            runtime.exit();
        }
        Some(self.transform())
    }
}

impl App for IndicatorApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if matches!(event, WindowEvent::CloseRequested) {
            self.terminate(LoopEvent::CloseRequested);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        log_key_changes(ctx.input_frame);

        let Some(transform) = self.step(ctx.input, ctx.runtime) else {
            return AppControl::Continue;
        };

        log::trace!(
            "frame {} ({:.2} ms)",
            ctx.time.frame_index,
            ctx.time.dt * 1000.0
        );

        let config = &self.config;
        let horizon = &mut self.horizon;
        let mut build_error = None;

        let control = ctx.render(config.clear, |rctx, target| {
            match HorizonRenderer::ensure(horizon, rctx, config) {
                Ok(h) => h.draw(rctx, target, &transform),
                Err(err) => build_error = Some(err),
            }
        });

        if let Some(err) = build_error {
            ctx.runtime.fail(err);
        }
        control
    }

    fn on_exit(&mut self) {
        if self.horizon.take().is_some() {
            log::debug!("horizon renderer released");
        }
        log::info!(
            "final attitude: pitch {:.1} roll {:.1}",
            self.orientation.pitch,
            self.orientation.roll
        );
    }
}

fn log_key_changes(frame: &InputFrame) {
    for key in &frame.keys_pressed {
        log::debug!("{key} pressed");
    }
    for key in &frame.keys_released {
        log::debug!("{key} released");
    }
}

/// Arrow keys steer, Escape exits.
fn control_keys(input: &InputState) -> ControlKeys {
    ControlKeys {
        up: input.key_down(Key::ArrowUp),
        down: input.key_down(Key::ArrowDown),
        left: input.key_down(Key::ArrowLeft),
        right: input.key_down(Key::ArrowRight),
        exit: input.key_down(Key::Escape),
    }
}
