use anyhow::{Context, Result};
use glam::Mat4;
use rand::Rng;

use line_sphere_engine::animation::{FramePresenter, RenderLoop};
use line_sphere_engine::core::{App, AppControl, FrameCtx};
use line_sphere_engine::geometry::{Point, make_sphere};
use line_sphere_engine::render::{PointCloudRenderer, RenderCtx};
use line_sphere_engine::transform::{Transform, TransformConfig};

/// Scene settings. Defaults reproduce the classic line sphere.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub point_count: usize,
    pub clear: wgpu::Color,
    pub transform: TransformConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            point_count: 1000,
            clear: wgpu::Color::TRANSPARENT,
            transform: TransformConfig::default(),
        }
    }
}

/// GPU-side state, created on the first frame once the surface exists.
struct Scene {
    renderer: PointCloudRenderer,
    render_loop: RenderLoop,
}

impl Scene {
    fn new(rctx: &RenderCtx<'_>, points: &[Point], config: &TransformConfig) -> Result<Self> {
        let renderer = PointCloudRenderer::new(rctx, points)?;

        let aspect = rctx.viewport.aspect_ratio();
        let mut render_loop = RenderLoop::new(Transform::new(config, aspect));
        render_loop.start();

        log::info!(
            "scene ready: {} vertices, aspect {aspect:.3}",
            renderer.vertex_count()
        );

        Ok(Self {
            renderer,
            render_loop,
        })
    }
}

pub struct SphereApp {
    config: SceneConfig,
    points: Vec<Point>,
    scene: Option<Scene>,
}

impl SphereApp {
    pub fn new<R: Rng>(config: SceneConfig, rng: &mut R) -> Self {
        let points = make_sphere(config.point_count, rng);
        log::info!("generated {} sphere points", points.len());

        Self {
            config,
            points,
            scene: None,
        }
    }
}

impl App for SphereApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if self.scene.is_none() {
            let scene = Scene::new(&ctx.render_ctx(), &self.points, &self.config.transform)
                .context("failed to set up scene")?;
            self.scene = Some(scene);
        }
        let Some(scene) = self.scene.as_mut() else {
            return Ok(AppControl::Exit);
        };

        let drawable = ctx.is_drawable();
        let mut presenter = WindowPresenter {
            ctx,
            renderer: &scene.renderer,
            clear: self.config.clear,
            control: AppControl::Continue,
        };
        scene.render_loop.tick_if_drawable(drawable, &mut presenter);

        Ok(presenter.control)
    }
}

/// Presents render-loop ticks into the window.
struct WindowPresenter<'f, 'a, 'w> {
    ctx: &'f mut FrameCtx<'a, 'w>,
    renderer: &'f PointCloudRenderer,
    clear: wgpu::Color,
    control: AppControl,
}

impl FramePresenter for WindowPresenter<'_, '_, '_> {
    fn request_next_frame(&mut self) {
        self.ctx.window.request_redraw();
    }

    fn present(&mut self, mvp: &Mat4) {
        let renderer = self.renderer;
        self.control = self
            .ctx
            .render(self.clear, |rctx, target| renderer.render(rctx, target, mvp));
    }
}
