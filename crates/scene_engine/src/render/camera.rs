//! # Perspective camera
//!
//! The viewing camera the renderer draws from. Matrices are computed on
//! demand from the public fields, so controllers and parameter panels may
//! write the fields directly between frames.

use crate::config::CameraSettings;
use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Perspective camera looking from `position` towards `target`
///
/// Uses a right-handed Y-up coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Camera described by loaded settings
    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::perspective(
            settings.position,
            settings.fov_degrees,
            settings.aspect,
            settings.near,
            settings.far,
        );
        camera.target = settings.target;
        camera
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target`, keeping the current up vector
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Update the aspect ratio after a viewport change
    ///
    /// Only changes larger than 0.01 are logged.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Distance from the camera to its target
    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined `projection * view` matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    /// 45 degree camera at (1, 2, 5) looking at the origin, clipping at 1..1000
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 5.0));
        assert_eq!(camera.target, Vec3::zeros());
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_4);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        let eye = camera.view_matrix() * Vector4::new(0.0, 0.0, 5.0, 1.0);
        assert_relative_eq!(eye, Vector4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-6);

        let origin = camera.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.z, -5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_aspect_ratio_update() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(4.0 / 3.0);
        assert_relative_eq!(camera.aspect, 4.0 / 3.0);
        assert_relative_eq!(camera.distance_to_target(), 30.0f32.sqrt());
    }
}
