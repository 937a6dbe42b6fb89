//! End-to-end scenarios across the graph, panel, loop and renderer boundary

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use scene_engine::config::LoopSettings;
use scene_engine::prelude::*;

/// Records what each render call observed
struct Probe {
    seen: Rc<RefCell<Vec<f32>>>,
    light: NodeId,
}

impl Renderer for Probe {
    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
        let intensity = scene
            .graph
            .get(self.light)
            .and_then(Node::light)
            .map(|light| light.intensity)
            .ok_or_else(|| RenderError::Backend("probe light missing".to_string()))?;
        self.seen.borrow_mut().push(intensity);
        Ok(())
    }
}

fn stage_with_light() -> (Stage, NodeId) {
    let mut scene = Scene::new();
    let light = scene
        .add_to_root(LightRig::node(Light::point(Color::WHITE, 1.0), Vec3::new(0.0, 2.0, 0.0)))
        .unwrap();
    (Stage::new(scene, Camera::default()), light)
}

#[test]
fn test_panel_write_is_visible_to_next_render() {
    let (mut stage, light) = stage_with_light();
    let target = ParamTarget::Node(light);

    let mut panel = BindingTable::new();
    stage.bind_param(&mut panel, target, "intensity", 0.0, 10.0).unwrap();
    panel.set(&mut stage, target, "intensity", 5.0).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut probe = Probe {
        seen: Rc::clone(&seen),
        light,
    };
    probe.render(&stage.scene, &stage.camera).unwrap();
    assert_eq!(*seen.borrow(), vec![5.0]);
}

#[test]
fn test_panel_edits_inside_the_loop() {
    let (mut stage, light) = stage_with_light();
    let target = ParamTarget::Node(light);
    let mut panel = BindingTable::new();
    stage.bind_param(&mut panel, target, "intensity", 0.0, 10.0).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut probe = Probe {
        seen: Rc::clone(&seen),
        light,
    };
    let mut animation = AnimationLoop::from_settings(
        ImmediateScheduler,
        &LoopSettings {
            target_fps: 60.0,
            max_ticks: Some(3),
        },
    );
    animation
        .start(&mut stage, &mut FixedCamera, &mut probe, |ctx| {
            let requested = ctx.tick as f32 * 8.0;
            panel.set(ctx.stage, target, "intensity", requested).unwrap();
        })
        .unwrap();

    assert_eq!(*seen.borrow(), vec![0.0, 8.0, 10.0]);
}

#[test]
fn test_stop_inside_tick_prevents_further_ticks() {
    let (mut stage, light) = stage_with_light();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut probe = Probe {
        seen: Rc::clone(&seen),
        light,
    };
    let mut animation = AnimationLoop::new(ImmediateScheduler);
    let handle = animation.handle();
    let mut ticks_after_stop = 0;
    let mut stopped = false;

    let stats = animation
        .start(&mut stage, &mut FixedCamera, &mut probe, |ctx| {
            if stopped {
                ticks_after_stop += 1;
            }
            if ctx.tick == 4 {
                ctx.stop();
                stopped = true;
            }
        })
        .unwrap();

    assert_eq!(ticks_after_stop, 0);
    assert_eq!(stats.ticks, 5);
    assert_eq!(seen.borrow().len(), 5);
    assert!(!handle.is_running());

    handle.stop();
    assert!(!handle.is_running());
}

#[test]
fn test_orbiting_camera_and_spinning_grid() {
    let mut scene = Scene::new();
    let grid = scene.add_to_root(GeometryFactory::box_grid(3, 2.0).unwrap()).unwrap();
    let mut stage = Stage::new(scene, Camera::default());
    let distance = stage.camera.distance_to_target();

    let mut orbit = OrbitController::new(Vec3::zeros());
    orbit.rotate(1.0, 0.0);
    let mut animation = AnimationLoop::new(ImmediateScheduler).with_max_ticks(Some(8));
    animation
        .mutators_mut()
        .register(predicate::named(GeometryFactory::GRID_NAME), mutators::spin(Vec3::new(0.0, 0.125, 0.0)));

    struct Nothing;
    impl Renderer for Nothing {
        fn render(&mut self, _: &Scene, _: &Camera) -> Result<(), RenderError> {
            Ok(())
        }
    }

    let stats = animation.start(&mut stage, &mut orbit, &mut Nothing, |_| {}).unwrap();
    assert_eq!(stats.mutations_applied, 8);
    assert_eq!(stage.scene.graph.get(grid).unwrap().transform.rotation.y, 1.0);
    assert_relative_eq!(stage.camera.distance_to_target(), distance, epsilon = 1e-4);

    let first_box = stage.scene.graph.children(grid)[0];
    let mut visited_world = None;
    stage.scene.graph.traverse(|id, _, world| {
        if id == first_box {
            visited_world = Some(*world);
        }
    });
    assert_eq!(visited_world, Some(stage.scene.graph.world_matrix(first_box).unwrap()));
}
