/// Degrees applied per frame while a direction key is held.
pub const DEFAULT_STEP_DEGREES: f32 = 0.5;

/// Aircraft orientation in degrees.
///
/// Both angles are unbounded and never wrap. Roll periodicity is left to
/// sine/cosine in the transform.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Orientation {
    pub pitch: f32,
    pub roll: f32,
}

/// Snapshot of the keys the sampler cares about, taken once per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ControlKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub exit: bool,
}

/// Result of one sampling step.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SampleOutcome {
    Continue,
    ExitRequested,
}

impl Orientation {
    /// Wings level, nose on the horizon.
    pub const LEVEL: Self = Self { pitch: 0.0, roll: 0.0 };

    #[inline]
    pub const fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }

    /// Applies every held key for one frame.
    ///
    /// Keys are level-triggered: holding a key for N frames applies its
    /// effect N times. Opposing keys cancel within the same frame.
    pub fn sample(&mut self, keys: ControlKeys, step: f32) -> SampleOutcome {
        if keys.up {
            self.pitch += step;
        }
        if keys.down {
            self.pitch -= step;
        }
        if keys.left {
            self.roll -= step;
        }
        if keys.right {
            self.roll += step;
        }

        if keys.exit {
            SampleOutcome::ExitRequested
        } else {
            SampleOutcome::Continue
        }
    }
}
