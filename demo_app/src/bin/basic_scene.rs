//! Box on a plane, rendered once
//!
//! Usage: `basic_scene [settings.toml|settings.ron]`

use demo_app::headless::LogRenderer;
use demo_app::{bootstrap, finish, scenes, DemoError};
use scene_engine::render::Renderer;

fn run() -> Result<(), DemoError> {
    let settings = bootstrap("basic scene")?;
    let stage = scenes::basic_scene(&settings)?;
    log::info!(
        "Scene holds {} nodes, camera at {:?}",
        stage.scene.graph.node_count(),
        stage.camera.position.as_slice()
    );

    let mut renderer = LogRenderer::new(1);
    renderer.render(&stage.scene, &stage.camera)?;
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let result = run();
    finish("basic scene", result)
}
