use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// A point on the unit sphere.
///
/// Layout is three tightly packed `f32`, so a `&[Point]` is also the flat
/// `x, y, z, x, y, z, ...` scalar sequence uploaded to the vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Point {
    pub position: [f32; 3],
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.position[0]
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.position[1]
    }

    #[inline]
    pub fn z(self) -> f32 {
        self.position[2]
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.to_vec3().length()
    }
}

impl From<Vec3> for Point {
    fn from(v: Vec3) -> Self {
        Self { position: v.to_array() }
    }
}

/// Generates `count` points on the unit sphere.
///
/// Each coordinate is drawn uniformly from `[-0.5, 0.5)` and the vector is then
/// normalized. This is cheaper than exact uniform spherical sampling and biases
/// density toward the cube's corner directions.
///
/// A sample of exactly zero has no direction; it comes out as the origin.
pub fn make_sphere<R: Rng>(count: usize, rng: &mut R) -> Vec<Point> {
    let mut r = || rng.random::<f32>() - 0.5;

    (0..count)
        .map(|_| {
            let v = Vec3::new(r(), r(), r());
            Point::from(v.normalize_or_zero())
        })
        .collect()
}

/// Views a point slice as its flat scalar sequence (3 scalars per point).
#[inline]
pub fn flatten(points: &[Point]) -> &[f32] {
    bytemuck::cast_slice(points)
}
