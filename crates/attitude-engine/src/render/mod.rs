//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and records
//! into a `RenderTarget` supplied by `FrameCtx::render`.
//!
//! Convention: CPU geometry is already in NDC (+Y up); vertex shaders only
//! apply the uploaded transform.

mod ctx;
pub mod flat;

pub use ctx::{RenderCtx, RenderTarget};
pub use flat::{FlatDraw, FlatMeshDesc, FlatRenderer, FlatRendererDesc, MeshId};
