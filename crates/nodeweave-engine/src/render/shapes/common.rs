//! Shared GPU types and utilities used by all shape renderers.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn from_viewport(vp: Viewport) -> Self {
        Self { viewport: vp.clamped(), _pad: [0.0; 2] }
    }
}

pub(super) const VIEWPORT_UBO_SIZE: wgpu::BufferSize =
    match wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64) {
        Some(size) => size,
        None => panic!("ViewportUniform must not be zero-sized"),
    };

pub(super) fn viewport_bgl_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(VIEWPORT_UBO_SIZE),
        },
        count: None,
    }
}

pub(super) fn create_viewport_ubo(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: VIEWPORT_UBO_SIZE.get(),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Unit quad shared by every instanced shape.
pub(super) struct QuadBuffers {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
}

impl QuadBuffers {
    pub(super) fn new(device: &wgpu::Device, label: &str) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad vbo")),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad ibo")),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vbo, ibo }
    }

    pub(super) const INDEX_COUNT: u32 = QUAD_INDICES.len() as u32;
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Per-instance vertex data for a quad-expanded shape.
pub(super) trait QuadInstance: Pod {
    fn layout() -> wgpu::VertexBufferLayout<'static>;
}

/// Builds the alpha-blended triangle-list pipeline every shape uses.
pub(super) fn create_instanced_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    label: &str,
    shader_src: &str,
    bgl: &wgpu::BindGroupLayout,
    instance_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} shader")),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} pipeline layout")),
        bind_group_layouts: &[bgl],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ── instance buffer ───────────────────────────────────────────────────────

/// Growable GPU vertex buffer for per-instance data.
pub(super) struct InstanceBuffer<I> {
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
    _marker: PhantomData<I>,
}

impl<I> Default for InstanceBuffer<I> {
    fn default() -> Self {
        Self { buffer: None, capacity: 0, _marker: PhantomData }
    }
}

impl<I: Pod> InstanceBuffer<I> {
    /// Uploads `instances`, growing to the next power of two when needed.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, label: &str, instances: &[I]) -> Option<&wgpu::Buffer> {
        if instances.len() > self.capacity || self.buffer.is_none() {
            let cap = instances.len().next_power_of_two().max(64);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} instance vbo")),
                size: (cap * std::mem::size_of::<I>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = cap;
        }

        let buffer = self.buffer.as_ref()?;
        ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        Some(buffer)
    }
}

// ── solid quad batch ──────────────────────────────────────────────────────

/// GPU state for a shape that needs only the viewport uniform.
///
/// Rect, circle and line renderers differ only in their instance type and
/// shader; this owns everything else.
pub(super) struct QuadBatch<I> {
    label: &'static str,
    shader_src: &'static str,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<I>,
}

impl<I: QuadInstance> QuadBatch<I> {
    pub(super) fn new(label: &'static str, shader_src: &'static str) -> Self {
        Self {
            label,
            shader_src,
            pipeline_format: None,
            pipeline: None,
            bind_group: None,
            viewport_ubo: None,
            quad: None,
            instances: InstanceBuffer::default(),
        }
    }

    /// Draws `instances` in order in a single instanced call.
    pub(super) fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, instances: &[I]) {
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx.device, self.label));
        }

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_viewport(ctx.viewport)));

        let Some(instance_vbo) = self.instances.upload(ctx, self.label, instances) else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad) = self.quad.as_ref() else { return };

        let mut rpass = target.begin_overlay_pass(self.label);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QuadBuffers::INDEX_COUNT, 0, 0..instances.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} bgl", self.label)),
            entries: &[viewport_bgl_entry()],
        });

        let pipeline = create_instanced_pipeline(
            ctx.device,
            ctx.surface_format,
            self.label,
            self.shader_src,
            &bgl,
            I::layout(),
        );

        let viewport_ubo = create_viewport_ubo(ctx.device, &format!("{} viewport ubo", self.label));
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bind group", self.label)),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        log::debug!("{}: pipeline built for {:?}", self.label, ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}
