//! Spot-lit scene with live parameters and an orbiting camera
//!
//! Binds the spot light and fog to a [`BindingTable`] and sweeps the bound
//! values from the tick callback, as a control panel would.
//!
//! Usage: `lit_scene [settings.toml|settings.ron]`

use demo_app::headless::LogRenderer;
use demo_app::input::SimulatedDrag;
use demo_app::{bootstrap, finish, scenes, DemoError};
use scene_engine::animation::{AnimationLoop, FixedRateScheduler};
use scene_engine::foundation::math::Vec3;
use scene_engine::params::{BindingTable, ParamTarget};
use scene_engine::render::OrbitController;

const DEFAULT_TICKS: u64 = 600;

fn run() -> Result<(), DemoError> {
    let settings = bootstrap("lit scene")?;
    let (mut stage, spot) = scenes::lit_scene(&settings)?;
    let spot = ParamTarget::Node(spot);

    let mut panel = BindingTable::new();
    stage.bind_param(&mut panel, spot, "intensity", 0.0, 10.0)?;
    stage.bind_param(&mut panel, spot, "penumbra", 0.0, 1.0)?;
    stage.bind_param(&mut panel, spot, "position.x", -5.0, 5.0)?;
    stage.bind_param(&mut panel, spot, "position.y", 0.0, 10.0)?;
    stage.bind_param(&mut panel, spot, "position.z", -5.0, 5.0)?;
    if stage.scene.fog.is_some() {
        stage.bind_param(&mut panel, ParamTarget::Fog, "density", 0.0, 0.5)?;
    }
    log::info!("Bound {} parameters", panel.bindings().len());

    let orbit = OrbitController::new(Vec3::zeros())
        .with_distance_limits(2.0, 30.0)
        .with_polar_limits(0.1, 1.5)
        .with_damping(0.25);
    let mut controller = SimulatedDrag::new(orbit, 7);
    let mut renderer = LogRenderer::new(60);

    let max_ticks = settings.loop_settings.max_ticks.unwrap_or(DEFAULT_TICKS);
    let mut animation = AnimationLoop::new(FixedRateScheduler::new(settings.loop_settings.target_fps))
        .with_max_ticks(Some(max_ticks));

    let mut panel_error = None;
    let stats = animation.start(&mut stage, &mut controller, &mut renderer, |ctx| {
        // Sweep past the bound range on purpose; the panel clamps
        let phase = ctx.tick as f32 * 0.02;
        let edits = [
            ("intensity", 6.0 + 6.0 * phase.sin()),
            ("position.x", 6.0 * phase.cos()),
            ("penumbra", 0.5 + 0.5 * (phase * 0.5).sin()),
        ];
        for (field, value) in edits {
            if let Err(e) = panel.set(ctx.stage, spot, field, value) {
                panel_error = Some(e);
                ctx.stop();
                return;
            }
        }
    })?;
    if let Some(e) = panel_error {
        return Err(e.into());
    }

    log::info!(
        "Ran {} ticks at {:.1} fps, spot intensity ended at {:.2}",
        stats.ticks,
        stats.average_fps(),
        stage.read_param(spot, "intensity")?
    );
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let result = run();
    finish("lit scene", result)
}
