mod app;

use anyhow::Result;
use winit::dpi::LogicalSize;

use line_sphere_engine::device::GpuInit;
use line_sphere_engine::logging::{LoggingConfig, init_logging};
use line_sphere_engine::window::{Runtime, RuntimeConfig};

use app::{SceneConfig, SphereApp};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = SceneConfig::default();
    let app = SphereApp::new(config, &mut rand::rng());

    let runtime = RuntimeConfig {
        title: "Line Sphere".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };

    Runtime::run(runtime, GpuInit::default(), app)
}
