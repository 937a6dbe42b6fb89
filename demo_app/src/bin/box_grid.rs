//! Rippling grid of boxes
//!
//! Every box in the grid runs a wave mutator and the whole grid slowly spins.
//!
//! Usage: `box_grid [settings.toml|settings.ron]`

use demo_app::headless::LogRenderer;
use demo_app::input::SimulatedDrag;
use demo_app::{bootstrap, finish, scenes, DemoError};
use scene_engine::animation::{mutators, predicate, AnimationLoop, FixedRateScheduler};
use scene_engine::foundation::math::Vec3;
use scene_engine::render::OrbitController;

const GRID_COUNT: u32 = 6;
const GRID_SPACING: f32 = 1.5;
const DEFAULT_TICKS: u64 = 900;

fn run() -> Result<(), DemoError> {
    let settings = bootstrap("box grid")?;
    let (mut stage, grid) = scenes::box_grid_scene(&settings, GRID_COUNT, GRID_SPACING)?;
    let boxes = stage.scene.graph.children(grid).to_vec();
    log::info!("Grid holds {} boxes", boxes.len());

    let max_ticks = settings.loop_settings.max_ticks.unwrap_or(DEFAULT_TICKS);
    let mut animation = AnimationLoop::new(FixedRateScheduler::new(settings.loop_settings.target_fps))
        .with_max_ticks(Some(max_ticks));

    animation
        .mutators_mut()
        .register(predicate::ids(boxes), mutators::wave(0.5, 0.05));
    animation
        .mutators_mut()
        .register(predicate::ids([grid]), mutators::spin(Vec3::new(0.0, 0.002, 0.0)));

    let mut controller = SimulatedDrag::new(OrbitController::new(Vec3::zeros()).with_damping(0.2), 42);
    let mut renderer = LogRenderer::new(120);

    let stats = animation.start(&mut stage, &mut controller, &mut renderer, |_| {})?;
    log::info!(
        "Ran {} ticks, {} mutations applied, {} rolled back",
        stats.ticks,
        stats.mutations_applied,
        stats.mutator_failures
    );
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let result = run();
    finish("box grid", result)
}
