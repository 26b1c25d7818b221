use std::num::NonZeroU64;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

/// Handle to a mesh uploaded by [`FlatRenderer::new`], in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(pub usize);

/// Static 2D mesh description: positions only, 2 floats per vertex.
#[derive(Debug, Copy, Clone)]
pub struct FlatMeshDesc<'a> {
    pub label: &'a str,
    pub positions: &'a [[f32; 2]],
}

/// Construction parameters. All meshes share `indices`.
#[derive(Debug, Copy, Clone)]
pub struct FlatRendererDesc<'a> {
    pub indices: &'a [u32],
    pub meshes: &'a [FlatMeshDesc<'a>],
}

/// One draw call: a mesh filled with a single color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlatDraw {
    pub mesh: MeshId,
    pub color: Color,
}

/// Renders static flat-colored meshes under one shared transform.
///
/// One pipeline, one transform uniform and one fill uniform buffer exist for
/// the renderer's lifetime. The fill buffer holds one slot per mesh; each draw
/// selects its slot with a dynamic offset, so colors can differ per draw
/// inside a single pass. Bindings are resolved once at construction.
pub struct FlatRenderer {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    transform_ubo: wgpu::Buffer,
    fill_ubo: wgpu::Buffer,
    fill_stride: u64,
    fill_slots: usize,

    ibo: wgpu::Buffer,
    index_count: u32,
    meshes: Vec<GpuMesh>,
}

struct GpuMesh {
    vbo: wgpu::Buffer,
}

impl FlatRenderer {
    /// Builds the pipeline and uploads every mesh.
    ///
    /// Fails if an index references a vertex that some mesh does not have.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        desc: &FlatRendererDesc<'_>,
    ) -> Result<Self> {
        anyhow::ensure!(!desc.indices.is_empty(), "flat renderer needs at least one index");
        let max_index = desc.indices.iter().copied().max().unwrap_or(0) as usize;
        for mesh in desc.meshes {
            anyhow::ensure!(
                max_index < mesh.positions.len(),
                "mesh `{}` has {} vertices but index {} is used",
                mesh.label,
                mesh.positions.len(),
                max_index
            );
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("attitude flat shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/flat.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("attitude flat bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_size::<TransformUniform>(),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: uniform_size::<FillUniform>(),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("attitude flat pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("attitude flat pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Ground quad winds clockwise.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let transform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("attitude flat transform ubo"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let fill_stride = aligned_stride(
            std::mem::size_of::<FillUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let fill_slots = desc.meshes.len().max(1);

        let fill_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("attitude flat fill ubo"),
            size: fill_stride * fill_slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("attitude flat bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &fill_ubo,
                        offset: 0,
                        size: uniform_size::<FillUniform>(),
                    }),
                },
            ],
        });

        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("attitude flat ibo"),
            contents: bytemuck::cast_slice(desc.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let meshes = desc
            .meshes
            .iter()
            .map(|m| GpuMesh {
                vbo: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(m.label),
                    contents: bytemuck::cast_slice(m.positions),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "flat renderer ready: {} meshes, {} indices, fill stride {}",
            meshes.len(),
            desc.indices.len(),
            fill_stride
        );

        Ok(Self {
            format: surface_format,
            pipeline,
            bind_group,
            transform_ubo,
            fill_ubo,
            fill_stride,
            fill_slots,
            ibo,
            index_count: desc.indices.len() as u32,
            meshes,
        })
    }

    /// Surface format the pipeline was built for.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Uploads `transform` (16 floats, column-major) and records `draws` in
    /// order, each as one indexed draw over the shared index buffer.
    ///
    /// The target is loaded, not cleared. `draws` may not outnumber the
    /// meshes; draws naming an unknown mesh are skipped.
    pub fn render(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        transform: &[f32; 16],
        draws: &[FlatDraw],
    ) {
        let t = TransformUniform { matrix: *transform };
        ctx.queue.write_buffer(&self.transform_ubo, 0, bytemuck::bytes_of(&t));

        for (offset, draw) in fill_offsets(self.fill_stride, self.fill_slots, draws.len()).zip(draws) {
            let f = FillUniform { color: draw.color.to_array() };
            ctx.queue.write_buffer(&self.fill_ubo, offset, bytemuck::bytes_of(&f));
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("attitude flat pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint32);

        for (offset, draw) in fill_offsets(self.fill_stride, self.fill_slots, draws.len()).zip(draws) {
            let Some(mesh) = self.meshes.get(draw.mesh.0) else { continue };

            rpass.set_bind_group(0, &self.bind_group, &[offset as u32]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}

impl Drop for FlatRenderer {
    fn drop(&mut self) {
        for mesh in &self.meshes {
            mesh.vbo.destroy();
        }
        self.ibo.destroy();
        self.transform_ubo.destroy();
        self.fill_ubo.destroy();
        log::debug!("flat renderer released {} meshes", self.meshes.len());
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TransformUniform {
    matrix: [f32; 16],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FillUniform {
    color: [f32; 4],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

fn uniform_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

/// Byte offsets of the fill slots for `draw_count` draws, one slot each.
fn fill_offsets(stride: u64, slots: usize, draw_count: usize) -> impl Iterator<Item = u64> {
    debug_assert!(
        draw_count <= slots,
        "{draw_count} draws for {slots} fill slots"
    );
    (0..draw_count.min(slots) as u64).map(move |slot| slot * stride)
}

/// Rounds `size` up to a multiple of `alignment` (dynamic offset rule).
pub(crate) fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_wgsl() {
        // mat4x4<f32> and vec4<f32>.
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
        assert_eq!(std::mem::size_of::<FillUniform>(), 16);
    }

    #[test]
    fn vertex_stride_is_two_tightly_packed_floats() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(layout.attributes[0].offset, 0);
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(16, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(16, 64), 64);
    }

    #[test]
    fn stride_tolerates_zero_alignment() {
        assert_eq!(aligned_stride(16, 0), 16);
    }

    #[test]
    fn each_draw_gets_its_own_slot() {
        let offsets: Vec<u64> = fill_offsets(256, 2, 2).collect();
        assert_eq!(offsets, vec![0, 256]);
    }

    #[test]
    fn fewer_draws_use_leading_slots() {
        let offsets: Vec<u64> = fill_offsets(256, 3, 1).collect();
        assert_eq!(offsets, vec![0]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "3 draws for 2 fill slots")]
    fn more_draws_than_slots_is_a_bug() {
        let _ = fill_offsets(256, 2, 3).count();
    }
}
