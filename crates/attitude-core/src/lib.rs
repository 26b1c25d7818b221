//! Attitude indicator core.
//!
//! Pure state and math shared by the indicator binary:
//! - `orientation`: pitch/roll state and the level-triggered key policy
//! - `transform`: (pitch, roll) to a column-major 4x4 horizon transform
//! - `mesh`: the sky and ground quads
//! - `frame_loop`: the Running/Terminating loop state machine
//!
//! Nothing here touches a window or a GPU.

pub mod frame_loop;
pub mod mesh;
pub mod orientation;
pub mod transform;

pub use frame_loop::{LoopEvent, LoopState};
pub use mesh::{QuadMesh, GROUND, QUAD_INDICES, SKY};
pub use orientation::{ControlKeys, Orientation, SampleOutcome, DEFAULT_STEP_DEGREES};
pub use transform::{Transform, PITCH_FULL_SCALE_DEGREES};
