//! Math utilities and types
//!
//! Provides fundamental math types for the scene graph: vector and matrix
//! aliases over `nalgebra`, the local [`Transform`] of a node and RGB [`Color`].

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Rotation3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Local transform of a scene node: position, rotation and scale
///
/// Rotation is stored as XYZ Euler angles in radians so single components can
/// be animated and bound to parameter controls. The rotation matrix is
/// `Rx * Ry * Rz`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Euler angles in radians (XYZ order)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation (Euler angles, radians)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix (translate, then rotate, then scale)
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = Rotation3::from_axis_angle(&Vec3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vec3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vec3::z_axis(), self.rotation.z);

        Mat4::new_translation(&self.position)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        [self.position, self.rotation, self.scale]
            .iter()
            .all(|v| v.iter().all(|c| c.is_finite()))
    }
}

/// Translation column of an affine matrix
pub fn matrix_translation(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Linear RGB color with components in `0.0..=1.0`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Pure white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a `0xRRGGBB` hex value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}
