//! Line sphere engine crate.
//!
//! Owns the platform + GPU runtime pieces and the sphere point-cloud scene
//! building blocks: geometry, transforms, the render loop and the renderer.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod geometry;
pub mod transform;
pub mod animation;
pub mod render;
