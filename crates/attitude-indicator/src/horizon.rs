use anyhow::{Context, Result};

use attitude_core::{QuadMesh, Transform, GROUND, QUAD_INDICES, SKY};
use attitude_engine::paint::Color;
use attitude_engine::render::{
    FlatDraw, FlatMeshDesc, FlatRenderer, FlatRendererDesc, MeshId, RenderCtx, RenderTarget,
};

use crate::config::IndicatorConfig;

const SKY_MESH: MeshId = MeshId(0);
const GROUND_MESH: MeshId = MeshId(1);

/// Sky and ground quads drawn with one program.
///
/// Meshes are uploaded once; each frame only the transform and the two fill
/// colors are written.
pub struct HorizonRenderer {
    flat: FlatRenderer,
    draws: [FlatDraw; 2],
}

impl HorizonRenderer {
    fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &IndicatorConfig,
    ) -> Result<Self> {
        let meshes = [mesh_desc(&SKY), mesh_desc(&GROUND)];
        let flat = FlatRenderer::new(
            device,
            surface_format,
            &FlatRendererDesc {
                indices: &QUAD_INDICES,
                meshes: &meshes,
            },
        )?;

        log::debug!("horizon meshes uploaded for {surface_format:?}");

        Ok(Self {
            flat,
            draws: draw_list(config.sky, config.ground),
        })
    }

    /// Returns the renderer in `slot`, building it for the surface format in
    /// `ctx` when the slot is empty or holds one built for another format.
    pub fn ensure<'h>(
        slot: &'h mut Option<Self>,
        ctx: &RenderCtx<'_>,
        config: &IndicatorConfig,
    ) -> Result<&'h mut Self> {
        let horizon = match slot.take() {
            Some(h) if h.flat.format() == ctx.surface_format => h,
            stale => {
                // Old pipeline targets a different format; release it first.
                drop(stale);
                Self::new(ctx.device, ctx.surface_format, config)
                    .context("failed to build horizon renderer")?
            }
        };
        Ok(slot.insert(horizon))
    }

    /// Uploads `transform`, then draws sky and ground in that order.
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, transform: &Transform) {
        self.flat
            .render(ctx, target, &transform.to_cols_array(), &self.draws);
    }
}

fn mesh_desc(mesh: &QuadMesh) -> FlatMeshDesc<'_> {
    FlatMeshDesc {
        label: mesh.label,
        positions: &mesh.vertices,
    }
}

/// Sky first, ground second; both share the transform.
fn draw_list(sky: Color, ground: Color) -> [FlatDraw; 2] {
    [
        FlatDraw { mesh: SKY_MESH, color: sky },
        FlatDraw { mesh: GROUND_MESH, color: ground },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_is_drawn_before_ground() {
        let cfg = IndicatorConfig::default();
        let draws = draw_list(cfg.sky, cfg.ground);
        assert_eq!(draws[0], FlatDraw { mesh: SKY_MESH, color: cfg.sky });
        assert_eq!(draws[1], FlatDraw { mesh: GROUND_MESH, color: cfg.ground });
    }

    #[test]
    fn mesh_descs_keep_four_vertices() {
        let sky = mesh_desc(&SKY);
        let ground = mesh_desc(&GROUND);
        assert_eq!(sky.label, "sky");
        assert_eq!(ground.label, "ground");
        assert_eq!(sky.positions.len(), 4);
        assert_eq!(ground.positions.len(), 4);
    }
}
