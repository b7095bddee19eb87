use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::geometry::{Point, flatten};

/// Static vertex buffer holding a point set.
///
/// The buffer is created initialized and has no `COPY_DST` usage, so its
/// contents never change after upload.
pub struct PointBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl PointBuffer {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    /// Fails when the point set does not fit a `u32` vertex range.
    pub fn upload(device: &wgpu::Device, points: &[Point]) -> Result<Self> {
        let vertex_count = vertex_count(points.len())?;
        let scalars = flatten(points);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line-sphere point vbo"),
            contents: bytemuck::cast_slice(scalars),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!(
            "uploaded {} points ({} bytes)",
            points.len(),
            std::mem::size_of_val(scalars)
        );

        Ok(Self {
            buffer,
            vertex_count,
        })
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// One `vec3<f32>` position per vertex at location 0.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Point>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

fn vertex_count(len: usize) -> Result<u32> {
    u32::try_from(len).with_context(|| format!("{len} points exceed the u32 vertex range"))
}
