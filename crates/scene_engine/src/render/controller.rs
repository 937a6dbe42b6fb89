//! Camera controllers
//!
//! A controller owns whatever input state it needs and rewrites the camera
//! once per frame from [`CameraController::update`]. Input plumbing stays
//! outside the crate: hosts feed already-decoded deltas into the controller.

use super::Camera;
use crate::foundation::math::{constants, Vec3};

/// Mutates the camera once per frame
pub trait CameraController {
    /// Apply pending input to the camera
    fn update(&mut self, camera: &mut Camera);
}

impl<C: CameraController + ?Sized> CameraController for Box<C> {
    fn update(&mut self, camera: &mut Camera) {
        (**self).update(camera);
    }
}

/// Controller that leaves the camera untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCamera;

impl CameraController for FixedCamera {
    fn update(&mut self, _camera: &mut Camera) {}
}

/// Orbits the camera around a target point
///
/// Rotation and zoom requests are queued and consumed on the next
/// [`update`](CameraController::update). With damping below 1.0 only that
/// fraction of the pending motion is applied per frame, the rest carries
/// over so the camera eases to a stop.
#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Vec3,
    min_distance: f32,
    max_distance: f32,
    min_polar: f32,
    max_polar: f32,
    damping: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
}

impl OrbitController {
    /// Keeps the polar angle off the poles where the up vector degenerates
    const POLE_MARGIN: f32 = 1e-3;

    /// Orbit around `target` with no damping and no distance limits
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: Self::POLE_MARGIN,
            max_polar: constants::PI - Self::POLE_MARGIN,
            damping: 1.0,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 0.0,
        }
    }

    /// Clamp the eye distance to `[min, max]`
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }

    /// Clamp the polar angle, measured from +Y, to `[min, max]` radians
    pub fn with_polar_limits(mut self, min: f32, max: f32) -> Self {
        self.min_polar = min.max(Self::POLE_MARGIN);
        self.max_polar = max.min(constants::PI - Self::POLE_MARGIN).max(self.min_polar);
        self
    }

    /// Fraction of pending motion applied per frame, in `(0, 1]`
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(f32::EPSILON, 1.0);
        self
    }

    /// Orbit center
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Move the orbit center
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Queue a rotation: `azimuth` around +Y, `polar` towards -Y
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_azimuth += azimuth;
        self.pending_polar += polar;
    }

    /// Queue a zoom step; positive values move closer
    ///
    /// Each unit scales the distance by `e^-1`, so steps compose
    /// multiplicatively and never cross the target.
    pub fn zoom(&mut self, amount: f32) {
        self.pending_zoom += amount;
    }

    /// Whether any queued motion is left
    pub fn is_settled(&self) -> bool {
        self.pending_azimuth.abs() < f32::EPSILON
            && self.pending_polar.abs() < f32::EPSILON
            && self.pending_zoom.abs() < f32::EPSILON
    }

    fn take_pending(&mut self) -> (f32, f32, f32) {
        let step = (
            self.pending_azimuth * self.damping,
            self.pending_polar * self.damping,
            self.pending_zoom * self.damping,
        );
        self.pending_azimuth -= step.0;
        self.pending_polar -= step.1;
        self.pending_zoom -= step.2;
        step
    }
}

impl CameraController for OrbitController {
    fn update(&mut self, camera: &mut Camera) {
        let (azimuth_step, polar_step, zoom_step) = self.take_pending();

        let offset = camera.position - self.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            camera.look_at(self.target);
            return;
        }

        let azimuth = offset.x.atan2(offset.z) + azimuth_step;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + polar_step)
            .clamp(self.min_polar, self.max_polar);
        let radius = (radius * (-zoom_step).exp()).clamp(self.min_distance, self.max_distance);

        let (sin_polar, cos_polar) = polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
        let offset = Vec3::new(
            radius * sin_polar * sin_azimuth,
            radius * cos_polar,
            radius * sin_polar * cos_azimuth,
        );

        camera.set_position(self.target + offset);
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_camera_is_inert() {
        let mut camera = Camera::default();
        let before = camera.clone();
        FixedCamera.update(&mut camera);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_rotation_keeps_distance() {
        let mut camera = Camera::default();
        let distance = camera.distance_to_target();
        let mut orbit = OrbitController::new(Vec3::zeros());

        for step in 0..20 {
            orbit.rotate(0.3, if step % 2 == 0 { 0.1 } else { -0.05 });
            orbit.update(&mut camera);
            assert_relative_eq!(camera.distance_to_target(), distance, epsilon = 1e-4);
        }
        assert_eq!(camera.target, Vec3::zeros());
        assert!(orbit.is_settled());
    }

    #[test]
    fn test_quarter_turn_around_y() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 4.0), 45.0, 1.0, 0.1, 100.0);
        let mut orbit = OrbitController::new(Vec3::zeros());
        orbit.rotate(constants::HALF_PI, 0.0);
        orbit.update(&mut camera);
        assert_relative_eq!(camera.position, Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut camera = Camera::default();
        let mut orbit = OrbitController::new(Vec3::zeros()).with_distance_limits(2.0, 8.0);
        orbit.zoom(10.0);
        orbit.update(&mut camera);
        assert_relative_eq!(camera.distance_to_target(), 2.0, epsilon = 1e-5);

        orbit.zoom(-10.0);
        orbit.update(&mut camera);
        assert_relative_eq!(camera.distance_to_target(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = Camera::default();
        let mut orbit = OrbitController::new(Vec3::zeros()).with_polar_limits(0.2, constants::HALF_PI);
        orbit.rotate(0.0, 10.0);
        orbit.update(&mut camera);
        assert!(camera.position.y >= -1e-5);

        orbit.rotate(0.0, -10.0);
        orbit.update(&mut camera);
        let polar = (camera.position.y / camera.distance_to_target()).acos();
        assert_relative_eq!(polar, 0.2, epsilon = 1e-4);
    }

    #[test]
    fn test_damping_spreads_motion() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 4.0), 45.0, 1.0, 0.1, 100.0);
        let mut orbit = OrbitController::new(Vec3::zeros()).with_damping(0.5);
        orbit.rotate(1.0, 0.0);
        orbit.update(&mut camera);
        assert!(!orbit.is_settled());
        assert_relative_eq!(camera.position.x.atan2(camera.position.z), 0.5, epsilon = 1e-5);
    }
}
