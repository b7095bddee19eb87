//! CPU-side geometry.
//!
//! Produces the point sets that renderers upload once and draw every frame.

mod sphere;

pub use sphere::{Point, flatten, make_sphere};
