//! Model/view/projection transform state.
//!
//! Matrices follow the column-vector convention: a vertex is transformed by
//! `projection * view * model * v`, so the model transform applies first.

mod pipeline;

pub use pipeline::{Transform, TransformConfig, model_view_projection};
