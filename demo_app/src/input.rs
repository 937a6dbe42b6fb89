//! Simulated pointer input for the orbit camera
//!
//! Stands in for mouse plumbing: every frame it may start a drag or a wheel
//! step and feeds the decoded deltas to an [`OrbitController`].

use rand::prelude::*;
use rand::rngs::StdRng;
use scene_engine::render::{Camera, CameraController, OrbitController};

/// Random drags and zoom steps driving an orbit controller
#[derive(Debug)]
pub struct SimulatedDrag {
    orbit: OrbitController,
    rng: StdRng,
    drag_frames_left: u32,
    drag_velocity: (f32, f32),
}

impl SimulatedDrag {
    /// Drive `orbit` with input drawn from a seeded generator
    pub fn new(orbit: OrbitController, seed: u64) -> Self {
        Self {
            orbit,
            rng: StdRng::seed_from_u64(seed),
            drag_frames_left: 0,
            drag_velocity: (0.0, 0.0),
        }
    }

    /// The controller being driven
    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    fn feed_input(&mut self) {
        if self.drag_frames_left == 0 && self.rng.gen_bool(0.05) {
            self.drag_frames_left = self.rng.gen_range(10..40);
            self.drag_velocity = (self.rng.gen_range(-0.03..0.03), self.rng.gen_range(-0.01..0.01));
            log::debug!("Simulated drag for {} frames", self.drag_frames_left);
        }
        if self.drag_frames_left > 0 {
            self.drag_frames_left -= 1;
            self.orbit.rotate(self.drag_velocity.0, self.drag_velocity.1);
        }
        if self.rng.gen_bool(0.02) {
            self.orbit.zoom(self.rng.gen_range(-0.2..0.2));
        }
    }
}

impl CameraController for SimulatedDrag {
    fn update(&mut self, camera: &mut Camera) {
        self.feed_input();
        self.orbit.update(camera);
    }
}
