use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::{GpuErrorScope, PointBuffer};

const SHADER_SOURCE: &str = include_str!("shaders/point_cloud.wgsl");

/// Uniform block: the combined model-view-projection matrix, column-major.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub matrix: [[f32; 4]; 4],
}

impl From<Mat4> for TransformUniform {
    fn from(m: Mat4) -> Self {
        Self {
            matrix: m.to_cols_array_2d(),
        }
    }
}

/// Linked vertex + fragment stages for the sphere point cloud, plus the
/// uniform buffer holding the transform.
///
/// Draws line lists with depth testing against `depth_format`.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform: wgpu::Buffer,
}

impl ShaderProgram {
    /// Compiles the embedded WGSL and builds the pipeline.
    ///
    /// Shader compilation and pipeline validation errors are returned;
    /// warnings are logged.
    pub fn build(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        Self::from_wgsl(device, SHADER_SOURCE, color_format, depth_format)
    }

    fn from_wgsl(
        device: &wgpu::Device,
        source: &str,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let scope = GpuErrorScope::start(device);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line-sphere point cloud shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        check_compilation(&shader).context("point cloud shader failed to compile")?;
        scope
            .finish()
            .context("point cloud shader failed validation")?;

        let scope = GpuErrorScope::start(device);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("line-sphere transform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<TransformUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line-sphere pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line-sphere point cloud pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PointBuffer::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line-sphere transform ubo"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("line-sphere transform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        scope
            .finish()
            .context("point cloud pipeline failed validation")?;

        log::debug!("point cloud program built for {color_format:?} / {depth_format:?}");

        Ok(Self {
            pipeline,
            bind_group,
            uniform,
        })
    }

    /// Writes the transform uniform. Takes effect for the next submitted draw.
    pub fn set_matrix(&self, queue: &wgpu::Queue, mvp: &Mat4) {
        queue.write_buffer(
            &self.uniform,
            0,
            bytemuck::bytes_of(&TransformUniform::from(*mvp)),
        );
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

fn check_compilation(shader: &wgpu::ShaderModule) -> Result<()> {
    let info = pollster::block_on(shader.get_compilation_info());

    let mut errors = Vec::new();
    for msg in &info.messages {
        match msg.message_type {
            wgpu::CompilationMessageType::Error => errors.push(msg.message.clone()),
            wgpu::CompilationMessageType::Warning => log::warn!("shader: {}", msg.message),
            _ => log::debug!("shader: {}", msg.message),
        }
    }

    anyhow::ensure!(errors.is_empty(), "{}", errors.join("\n"));
    Ok(())
}
