use anyhow::Result;
use glam::Mat4;

use crate::geometry::Point;
use crate::render::{PointBuffer, RenderCtx, RenderTarget, ShaderProgram};

/// Draws a static point set as a line list with one transform uniform.
///
/// GPU resources are created once in [`new`](Self::new); per frame only the
/// uniform is written.
pub struct PointCloudRenderer {
    program: ShaderProgram,
    points: PointBuffer,
}

impl PointCloudRenderer {
    /// Uploads `points` and builds the program for the context's target formats.
    pub fn new(ctx: &RenderCtx<'_>, points: &[Point]) -> Result<Self> {
        let points = PointBuffer::upload(ctx.device, points)?;
        let program = ShaderProgram::build(ctx.device, ctx.surface_format, ctx.depth_format)?;
        Ok(Self { program, points })
    }

    pub fn vertex_count(&self) -> u32 {
        self.points.vertex_count()
    }

    /// Uploads `mvp` and records the draw over every uploaded vertex.
    ///
    /// Color is loaded (the frame clear happens before); depth is cleared here.
    pub fn render(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mvp: &Mat4) {
        self.program.set_matrix(ctx.queue, mvp);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("line-sphere point cloud pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.program.pipeline());
        rpass.set_bind_group(0, self.program.bind_group(), &[]);
        rpass.set_vertex_buffer(0, self.points.slice());
        rpass.draw(0..self.points.vertex_count(), 0..1);
    }
}
