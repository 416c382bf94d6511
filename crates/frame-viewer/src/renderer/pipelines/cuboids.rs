use crate::camera::Camera;
use crate::data::cuboids::{EDGES, FACES, UNIT_CORNERS};
use crate::data::types::{CameraUniformStd140 as CameraUniform, CuboidInstance, InstanceBuffer};
use wgpu::util::DeviceExt;

/// Draws every cuboid twice from one unit cube: edge lines, then
/// translucent faces on top.
pub struct CuboidPipeline {
    edges: wgpu::RenderPipeline,
    faces: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    bind: wgpu::BindGroup,
    corner_vb: wgpu::Buffer,
    edge_ib: wgpu::Buffer,
    face_ib: wgpu::Buffer,
}

impl CuboidPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cuboid Camera Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cuboid Camera UBO"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cuboid Camera BindGroup"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let corner_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Cube VB"),
            contents: bytemuck::cast_slice(&UNIT_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let edge_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Cube Edge IB"),
            contents: bytemuck::cast_slice(&EDGES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let face_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Cube Face IB"),
            contents: bytemuck::cast_slice(&FACES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/cuboids.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/cuboids.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cuboid PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let instance_attrs = wgpu::vertex_attr_array![
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        let vbuf_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CuboidInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &instance_attrs,
            },
        ];

        let make = |label: &str,
                    entry_point: &str,
                    topology: wgpu::PrimitiveTopology,
                    depth_write_enabled: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point,
                    buffers: &vbuf_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_fmt,
                    depth_write_enabled,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_fmt,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let edges = make(
            "Cuboid Edge Pipeline",
            "vs_edges",
            wgpu::PrimitiveTopology::LineList,
            true,
        );
        // Faces are translucent: test against depth but never occlude.
        let faces = make(
            "Cuboid Face Pipeline",
            "vs_faces",
            wgpu::PrimitiveTopology::TriangleList,
            false,
        );

        Self {
            edges,
            faces,
            ubo,
            bind,
            corner_vb,
            edge_ib,
            face_ib,
        }
    }

    pub fn prepare(&self, queue: &wgpu::Queue, camera: &Camera) {
        let uniform = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, cuboids: &'a InstanceBuffer) {
        rpass.set_bind_group(0, &self.bind, &[]);
        rpass.set_vertex_buffer(0, self.corner_vb.slice(..));
        rpass.set_vertex_buffer(1, cuboids.buf.slice(..));

        rpass.set_pipeline(&self.edges);
        rpass.set_index_buffer(self.edge_ib.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..(EDGES.len() * 2) as u32, 0, 0..cuboids.len);

        rpass.set_pipeline(&self.faces);
        rpass.set_index_buffer(self.face_ib.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..(FACES.len() * 3) as u32, 0, 0..cuboids.len);
    }
}
