use glam::{Mat4, Vec3};

/// Camera and animation constants.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformConfig {
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,

    /// Near clip distance. Geometry closer than this is culled.
    pub z_near: f32,

    /// Far clip distance.
    pub z_far: f32,

    /// Camera position in world space. The view matrix is its inverse.
    pub camera_offset: Vec3,

    /// Rotation about +Y applied to the model on every tick, in radians.
    pub rotation_step: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            z_near: 1e-4,
            z_far: 1e4,
            camera_offset: Vec3::new(0.0, 0.1, 2.0),
            rotation_step: 0.02,
        }
    }
}

impl TransformConfig {
    /// Builds the projection matrix for `aspect` (width / height).
    ///
    /// Depth maps to `[0, 1]` as wgpu expects.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            aspect,
            self.z_near,
            self.z_far,
        )
    }

    /// Builds the view matrix: the inverse of the camera's world transform.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(self.camera_offset).inverse()
    }
}

/// Composes `projection * (view * model)`.
///
/// Returns `(model_view, model_view_projection)`.
#[inline]
pub fn model_view_projection(projection: Mat4, view: Mat4, model: Mat4) -> (Mat4, Mat4) {
    let model_view = view * model;
    (model_view, projection * model_view)
}

/// Transform state for a single rotating object.
///
/// View and projection are fixed at construction. The model matrix accumulates
/// one rotation step per [`advance`](Self::advance).
#[derive(Debug, Clone)]
pub struct Transform {
    model: Mat4,
    view: Mat4,
    projection: Mat4,

    model_view: Mat4,
    mvp: Mat4,

    rotation_step: f32,
}

impl Transform {
    pub fn new(config: &TransformConfig, aspect: f32) -> Self {
        let model = Mat4::IDENTITY * Mat4::from_translation(Vec3::ZERO);
        let view = config.view();
        let projection = config.projection(aspect);
        let (model_view, mvp) = model_view_projection(projection, view, model);

        Self {
            model,
            view,
            projection,
            model_view,
            mvp,
            rotation_step: config.rotation_step,
        }
    }

    /// Rotates the model by one step about +Y, in object space.
    pub fn advance(&mut self) {
        self.model *= Mat4::from_rotation_y(self.rotation_step);
    }

    /// Recomputes the derived matrices and returns the new model-view-projection.
    pub fn update(&mut self) -> Mat4 {
        let (model_view, mvp) = model_view_projection(self.projection, self.view, self.model);
        self.model_view = model_view;
        self.mvp = mvp;
        mvp
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    /// Model-view-projection as of the last [`update`](Self::update).
    pub fn mvp(&self) -> Mat4 {
        self.mvp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const ASPECT: f32 = 16.0 / 9.0;

    fn transform() -> Transform {
        Transform::new(&TransformConfig::default(), ASPECT)
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_is_bit_identical_for_same_aspect() {
        let cfg = TransformConfig::default();
        let a = cfg.projection(ASPECT);
        let b = cfg.projection(ASPECT);
        assert_eq!(a.to_cols_array().map(f32::to_bits), b.to_cols_array().map(f32::to_bits));
    }

    #[test]
    fn projection_unaffected_by_ticks() {
        let mut t = transform();
        let before = t.projection();
        for _ in 0..50 {
            t.advance();
            t.update();
        }
        assert_eq!(t.projection(), before);
        assert_eq!(t.projection(), TransformConfig::default().projection(ASPECT));
    }

    #[test]
    fn projection_maps_near_and_far_to_wgpu_depth_range() {
        let cfg = TransformConfig::default();
        let p = cfg.projection(1.0);

        let near = p * Vec4::new(0.0, 0.0, -cfg.z_near, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -cfg.z_far, 1.0);

        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    // ── view ──────────────────────────────────────────────────────────────

    #[test]
    fn view_moves_camera_to_origin() {
        let cfg = TransformConfig::default();
        let cam = cfg.view().transform_point3(cfg.camera_offset);
        assert!(cam.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn origin_is_in_front_of_camera() {
        let origin = TransformConfig::default().view().transform_point3(Vec3::ZERO);
        // Right-handed: the camera looks down -Z.
        assert!(origin.z < 0.0);
        assert!(origin.y < 0.0);
    }

    // ── model ─────────────────────────────────────────────────────────────

    #[test]
    fn zero_ticks_leaves_initial_model() {
        let t = transform();
        assert_eq!(t.model(), Mat4::from_translation(Vec3::ZERO));
        assert_eq!(t.model(), Mat4::IDENTITY);
    }

    #[test]
    fn k_ticks_match_single_rotation() {
        let mut t = transform();
        let k = 250;
        for _ in 0..k {
            t.advance();
        }
        let direct = Mat4::from_rotation_y(0.02 * k as f32);
        assert!(t.model().abs_diff_eq(direct, 1e-4), "{:?} vs {direct:?}", t.model());
    }

    #[test]
    fn rotation_wraps_past_full_turn() {
        let mut t = transform();
        // 0.02 * 315 ≈ 6.3 > 2π
        for _ in 0..315 {
            t.advance();
        }
        let direct = Mat4::from_rotation_y(0.02 * 315.0);
        assert!(t.model().abs_diff_eq(direct, 1e-4));
        assert!(t.model().is_finite());
    }

    #[test]
    fn advance_does_not_touch_derived_until_update() {
        let mut t = transform();
        let mvp = t.mvp();
        t.advance();
        assert_eq!(t.mvp(), mvp);
        assert_ne!(t.update(), mvp);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn mvp_is_projection_times_view_times_model() {
        let m = Mat4::from_rotation_y(0.7) * Mat4::from_translation(Vec3::new(0.3, -0.2, 0.1));
        let v = Mat4::from_translation(Vec3::new(0.0, 0.1, 2.0)).inverse();
        let p = Mat4::perspective_rh(1.2, 1.5, 0.1, 100.0);

        let (mv, mvp) = model_view_projection(p, v, m);

        assert_eq!(mv, v * m);
        assert_eq!(mvp, p * (v * m));
        assert!(!mvp.abs_diff_eq(m * v * p, 1e-3));
        assert!(!mvp.abs_diff_eq(p * (m * v), 1e-3));
    }

    #[test]
    fn update_uses_current_state() {
        let mut t = transform();
        t.advance();
        t.advance();
        let mvp = t.update();

        assert_eq!(mvp, t.projection() * (t.view() * t.model()));
        assert_eq!(t.model_view(), t.view() * t.model());
        assert_eq!(t.mvp(), mvp);
    }
}
