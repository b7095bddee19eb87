//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and records its
//! passes into the frame's encoder.
//!
//! Convention:
//! - Geometry is in object space; the vertex shader applies one combined
//!   model-view-projection uniform.
//! - Color is cleared by the frame, depth by each renderer's pass.

mod ctx;
mod error_scope;
mod point_buffer;
mod point_cloud;
mod program;
mod viewport;

pub use ctx::{RenderCtx, RenderTarget};
pub use error_scope::GpuErrorScope;
pub use point_buffer::PointBuffer;
pub use point_cloud::PointCloudRenderer;
pub use program::{ShaderProgram, TransformUniform};
pub use viewport::Viewport;
