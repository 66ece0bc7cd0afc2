//! Batched 2D mesh renderer.
//!
//! Draws a list of scene draw items (`scene::DrawItem2D`) with a single solid-color
//! pipeline. Work is split in two phases so every queue write lands before the pass that
//! reads it:
//! - `prepare()`: bake each item's `world_from_local` and fill color into one vertex
//!   stream, upload it with the camera matrix.
//! - `draw()`: one `draw_indexed` call inside the caller's render pass.
//!
//! Items are emitted in the given order; the caller sorts by `z` (painter's order, no depth
//! buffer).

use std::{borrow::Cow, mem};

use anyhow::Context as _;

use crate::render::gpu::Gpu;
use crate::scene::{Camera2D, DrawItem2D};

const INITIAL_BUFFER_BYTES: u64 = 4096;

fn round_up_to(v: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (v + (align - 1)) & !(align - 1)
}

/// GPU vertex format: world-space position plus straight-alpha color.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2D {
    pub const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    #[inline]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex2D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    clip_from_world: [[f32; 4]; 4],
}

/// CPU-side batch: all items flattened into world space.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshBatch {
    pub vertices: Vec<Vertex2D>,
    pub indices: Vec<u32>,
}

impl MeshBatch {
    /// Concatenate items in order, transforming positions to world space.
    pub fn from_items(items: &[DrawItem2D]) -> Self {
        let mut batch = Self::default();
        for item in items.iter().filter(|it| !it.mesh.is_empty()) {
            let base = batch.vertices.len() as u32;
            let color = item.fill.to_array();
            batch
                .vertices
                .extend(item.mesh.positions.iter().map(|&[x, y]| {
                    let (wx, wy) = item.world_from_local.transform_point(x, y);
                    Vertex2D {
                        position: [wx, wy],
                        color,
                    }
                }));
            batch
                .indices
                .extend(item.mesh.indices.iter().map(|&i| base + u32::from(i)));
        }
        batch
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Grow-only GPU buffer with padded uploads.
struct DynamicBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl DynamicBuffer {
    fn new(gpu: &Gpu, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: INITIAL_BUFFER_BYTES,
            usage,
            mapped_at_creation: false,
        });
        Self {
            label,
            usage,
            buffer,
            capacity: INITIAL_BUFFER_BYTES,
        }
    }

    /// Upload `bytes`, padded to `COPY_BUFFER_ALIGNMENT`, growing the buffer if needed.
    fn upload(&mut self, gpu: &Gpu, bytes: &[u8]) {
        let len = bytes.len() as u64;
        let padded_len = round_up_to(len, wgpu::COPY_BUFFER_ALIGNMENT);

        if padded_len > self.capacity {
            let new_size = padded_len.next_power_of_two().max(INITIAL_BUFFER_BYTES);
            log::debug!("mesh renderer: growing {} to {new_size} bytes", self.label);
            self.buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: new_size,
                usage: self.usage,
                mapped_at_creation: false,
            });
            self.capacity = new_size;
        }

        if padded_len == len {
            gpu.queue.write_buffer(&self.buffer, 0, bytes);
        } else {
            let mut padded = Vec::with_capacity(padded_len as usize);
            padded.extend_from_slice(bytes);
            padded.resize(padded_len as usize, 0);
            gpu.queue.write_buffer(&self.buffer, 0, &padded);
        }
    }
}

/// Draws solid-colored scene meshes in one batch per frame.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    vertices: DynamicBuffer,
    indices: DynamicBuffer,

    vertex_bytes: u64,
    index_count: u32,
}

impl MeshRenderer {
    /// Create the pipeline targeting `gpu.target_format()`.
    pub fn new(gpu: &Gpu) -> anyhow::Result<Self> {
        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("MeshRenderer Shader"),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "shaders/solid_mesh.wgsl"
                ))),
            });

        let uniform_size = wgpu::BufferSize::new(mem::size_of::<CameraUniforms>() as u64)
            .context("mesh renderer: zero-sized uniform block")?;

        let uniform_bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("MeshRenderer Uniform BGL"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(uniform_size),
                        },
                        count: None,
                    }],
                });

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("MeshRenderer Uniform Buffer"),
            size: uniform_size.get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("MeshRenderer Uniform BG"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("MeshRenderer Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("MeshRenderer Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex2D::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.target_format(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    // Tessellated outlines mix windings (y-flip, glyph contours).
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertices: DynamicBuffer::new(gpu, "MeshRenderer Vertex Buffer", wgpu::BufferUsages::VERTEX),
            indices: DynamicBuffer::new(gpu, "MeshRenderer Index Buffer", wgpu::BufferUsages::INDEX),
            vertex_bytes: 0,
            index_count: 0,
        })
    }

    /// Upload the camera and all items for the next `draw()`.
    pub fn prepare(&mut self, gpu: &Gpu, camera: &Camera2D, items: &[DrawItem2D]) {
        let uniforms = CameraUniforms {
            clip_from_world: camera.clip_from_world().to_mat4().to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let batch = MeshBatch::from_items(items);
        if batch.is_empty() {
            self.vertex_bytes = 0;
            self.index_count = 0;
            return;
        }

        let v_raw: &[u8] = bytemuck::cast_slice(&batch.vertices);
        let i_raw: &[u8] = bytemuck::cast_slice(&batch.indices);
        self.vertices.upload(gpu, v_raw);
        self.indices.upload(gpu, i_raw);

        self.vertex_bytes = v_raw.len() as u64;
        self.index_count = batch.indices.len() as u32;
    }

    /// Record the prepared batch into `pass`. Does nothing if nothing was prepared.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer.slice(..self.vertex_bytes));
        pass.set_index_buffer(
            self.indices
                .buffer
                .slice(..u64::from(self.index_count) * mem::size_of::<u32>() as u64),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Affine2, Mesh2D, Rgba};

    fn tri(fill: Rgba, world_from_local: Affine2, z: i32) -> DrawItem2D {
        DrawItem2D {
            mesh: Mesh2D {
                positions: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                indices: vec![0, 1, 2],
            },
            fill,
            world_from_local,
            z,
        }
    }

    #[test]
    fn batch_offsets_indices_and_bakes_transforms() {
        let items = [
            tri(Rgba::RED, Affine2::IDENTITY, 0),
            tri(Rgba::BLUE, Affine2::translate(10.0, 5.0), 1),
        ];
        let batch = MeshBatch::from_items(&items);

        assert_eq!(batch.vertices.len(), 6);
        assert_eq!(batch.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(batch.vertices[3].position, [10.0, 5.0]);
        assert_eq!(batch.vertices[4].position, [11.0, 5.0]);
        assert_eq!(batch.vertices[0].color, Rgba::RED.to_array());
        assert_eq!(batch.vertices[5].color, Rgba::BLUE.to_array());
    }

    #[test]
    fn empty_meshes_are_skipped() {
        let mut empty = tri(Rgba::WHITE, Affine2::IDENTITY, 0);
        empty.mesh = Mesh2D::default();
        let items = [empty, tri(Rgba::BLACK, Affine2::IDENTITY, 0)];
        let batch = MeshBatch::from_items(&items);
        assert_eq!(batch.vertices.len(), 3);
        assert_eq!(batch.indices, vec![0, 1, 2]);
        assert!(MeshBatch::from_items(&[]).is_empty());
    }

    #[test]
    fn padding_rounds_to_copy_alignment() {
        assert_eq!(round_up_to(0, 4), 0);
        assert_eq!(round_up_to(6, 4), 8);
        assert_eq!(round_up_to(8, 4), 8);
    }
}
