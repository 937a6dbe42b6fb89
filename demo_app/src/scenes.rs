//! Scene builders shared by the demo binaries

use scene_engine::config::EngineSettings;
use scene_engine::foundation::math::{constants, Color, Transform, Vec3};
use scene_engine::geometry::{GeometryFactory, Material, Side};
use scene_engine::lighting::{Light, LightRig};
use scene_engine::render::Camera;
use scene_engine::scene::{NodeId, NodeTree, Scene, Stage};
use scene_engine::SceneResult;

/// Name of the spot light in [`lit_scene`]
pub const SPOT_LIGHT: &str = "spot-light";

/// Name of the ground plane in every scene
pub const GROUND: &str = "ground";

fn base_scene(settings: &EngineSettings) -> Scene {
    let scene = Scene::new();
    match &settings.fog {
        Some(fog) => scene.with_fog(fog.clone()),
        None => scene,
    }
}

fn ground(size: f32, material: Option<Material>) -> SceneResult<NodeTree> {
    let plane = match material {
        Some(material) => GeometryFactory::plane_with_material(size, size, material)?,
        None => GeometryFactory::plane(size, size)?,
    };
    Ok(plane
        .with_name(GROUND)
        .with_transform(Transform::identity().with_rotation(Vec3::new(constants::HALF_PI, 0.0, 0.0))))
}

/// A green box resting on a red plane, viewed once
pub fn basic_scene(settings: &EngineSettings) -> SceneResult<Stage> {
    let mut scene = base_scene(settings);

    let cube = GeometryFactory::box_mesh(1.0, 1.0, 1.0)?;
    let rest_height = cube.node().geometry().map_or(0.0, |geometry| geometry.height() / 2.0);
    scene.add_to_root(cube.with_name("box").with_position(Vec3::new(0.0, rest_height, 0.0)))?;
    scene.add_to_root(ground(4.0, None)?)?;

    Ok(Stage::new(scene, Camera::from_settings(&settings.camera)))
}

/// Lit box on a lit plane under a shadow-casting spot light
///
/// Returns the stage and the spot light's node id.
pub fn lit_scene(settings: &EngineSettings) -> SceneResult<(Stage, NodeId)> {
    let mut scene = base_scene(settings).with_background(Color::from_hex(0x202020));

    let lit_ground = Material::standard(Color::from_hex(0x787878)).with_side(Side::Double);
    scene.add_to_root(ground(20.0, Some(lit_ground))?.with_shadows(false, true))?;

    let cube = GeometryFactory::box_with_material(1.0, 1.0, 1.0, Material::phong(Color::from_hex(0x78c878)))?
        .with_name("box")
        .with_position(Vec3::new(0.0, 0.5, 0.0))
        .with_shadows(true, false);
    scene.add_to_root(cube)?;

    let spot = Light::spot(Color::WHITE, 1.0)
        .with_cone(constants::QUARTER_PI, 0.2)
        .with_default_shadow()?;
    let spot_node = scene.add_to_root(
        LightRig::with_marker(spot, Vec3::new(0.0, 4.0, 0.0), 0.05)?.with_name(SPOT_LIGHT),
    )?;
    scene.add_to_root(LightRig::named("ambient", Light::ambient(Color::WHITE, 0.2), Vec3::zeros()))?;

    Ok((Stage::new(scene, Camera::from_settings(&settings.camera)), spot_node))
}

/// A grid of boxes on a plane, lit from above
///
/// Returns the stage and the grid group's node id.
pub fn box_grid_scene(settings: &EngineSettings, count: u32, spacing: f32) -> SceneResult<(Stage, NodeId)> {
    let mut scene = base_scene(settings);

    let extent = count as f32 * spacing + spacing;
    let floor = Material::standard(Color::from_hex(0x787878)).with_side(Side::Double);
    scene.add_to_root(ground(extent, Some(floor))?.with_shadows(false, true))?;

    let grid = GeometryFactory::box_grid_with_material(count, spacing, Material::standard(Color::from_hex(0x78c8c8)))?;
    let grid_node = scene.add_to_root(grid)?;

    let sun = Light::directional(Color::WHITE, 1.0).with_default_shadow()?;
    scene.add_to_root(LightRig::named("sun", sun, Vec3::new(5.0, 10.0, 5.0)))?;

    Ok((Stage::new(scene, Camera::from_settings(&settings.camera)), grid_node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::foundation::math::matrix_translation;

    #[test]
    fn test_basic_scene_layout() {
        let stage = basic_scene(&EngineSettings::default()).unwrap();
        let graph = &stage.scene.graph;
        let cube = graph.find_by_name("box").unwrap();
        assert_eq!(graph.world_matrix(cube).unwrap().m24, 0.5);
        let plane = graph.get(graph.find_by_name(GROUND).unwrap()).unwrap();
        assert_eq!(plane.transform.rotation.x, constants::HALF_PI);
        assert_eq!(stage.camera.position, Vec3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_lit_scene_has_shadowed_spot() {
        let (stage, spot) = lit_scene(&EngineSettings::default()).unwrap();
        let node = stage.scene.graph.get(spot).unwrap();
        assert!(node.cast_shadow);
        assert!(node.light().unwrap().shadow().is_some());
        let marker = stage.scene.graph.children(spot)[0];
        let world = stage.scene.graph.world_matrix(marker).unwrap();
        assert_eq!(matrix_translation(&world), Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_grid_scene_counts() {
        let (stage, grid) = box_grid_scene(&EngineSettings::default(), 3, 1.5).unwrap();
        assert_eq!(stage.scene.graph.children(grid).len(), 12);
    }
}
