//! Procedural geometry
//!
//! Immutable mesh descriptors ([`Geometry`]), surface descriptors
//! ([`Material`]) and the [`GeometryFactory`] that turns them into detached
//! node subtrees ready for insertion into a scene.

mod factory;
mod material;

pub use factory::GeometryFactory;
pub use material::{Material, ShadingModel, Side};

use crate::error::{SceneError, SceneResult};

/// Shape and dimensions of a mesh
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centred on the local origin
    Box {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
        /// Extent along Z
        depth: f32,
    },
    /// Flat rectangle in the local XY plane
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
    },
    /// UV sphere
    Sphere {
        /// Sphere radius
        radius: f32,
        /// Horizontal segment count
        width_segments: u32,
        /// Vertical segment count
        height_segments: u32,
    },
}

/// Validated mesh descriptor
///
/// Only the constructors below can produce a `Geometry`, so every instance
/// has positive, finite dimensions. Renderers tessellate it; the core never
/// does.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: Shape,
}

impl Geometry {
    /// Minimum horizontal segments for a sphere
    pub const MIN_WIDTH_SEGMENTS: u32 = 3;
    /// Minimum vertical segments for a sphere
    pub const MIN_HEIGHT_SEGMENTS: u32 = 2;

    /// Box descriptor
    pub fn cuboid(width: f32, height: f32, depth: f32) -> SceneResult<Self> {
        ensure_positive("box width", width)?;
        ensure_positive("box height", height)?;
        ensure_positive("box depth", depth)?;
        Ok(Self { shape: Shape::Box { width, height, depth } })
    }

    /// Plane descriptor
    pub fn plane(width: f32, height: f32) -> SceneResult<Self> {
        ensure_positive("plane width", width)?;
        ensure_positive("plane height", height)?;
        Ok(Self { shape: Shape::Plane { width, height } })
    }

    /// Sphere descriptor
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> SceneResult<Self> {
        ensure_positive("sphere radius", radius)?;
        if width_segments < Self::MIN_WIDTH_SEGMENTS || height_segments < Self::MIN_HEIGHT_SEGMENTS {
            return Err(SceneError::InvalidGeometry(format!(
                "sphere needs at least {}x{} segments, got {width_segments}x{height_segments}",
                Self::MIN_WIDTH_SEGMENTS,
                Self::MIN_HEIGHT_SEGMENTS,
            )));
        }
        Ok(Self {
            shape: Shape::Sphere { radius, width_segments, height_segments },
        })
    }

    /// The underlying shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Extent along local X
    pub fn width(&self) -> f32 {
        match self.shape {
            Shape::Box { width, .. } | Shape::Plane { width, .. } => width,
            Shape::Sphere { radius, .. } => radius * 2.0,
        }
    }

    /// Extent along local Y
    pub fn height(&self) -> f32 {
        match self.shape {
            Shape::Box { height, .. } | Shape::Plane { height, .. } => height,
            Shape::Sphere { radius, .. } => radius * 2.0,
        }
    }

    /// Extent along local Z (zero for planes)
    pub fn depth(&self) -> f32 {
        match self.shape {
            Shape::Box { depth, .. } => depth,
            Shape::Plane { .. } => 0.0,
            Shape::Sphere { radius, .. } => radius * 2.0,
        }
    }

    /// Short shape name for logs
    pub fn kind_name(&self) -> &'static str {
        match self.shape {
            Shape::Box { .. } => "box",
            Shape::Plane { .. } => "plane",
            Shape::Sphere { .. } => "sphere",
        }
    }
}

fn ensure_positive(what: &str, value: f32) -> SceneResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidGeometry(format!("{what} must be positive and finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_reports_dimensions() {
        let geometry = Geometry::cuboid(1.5, 2.25, 0.75).unwrap();
        assert_eq!(geometry.width(), 1.5);
        assert_eq!(geometry.height(), 2.25);
        assert_eq!(geometry.depth(), 0.75);
        assert_eq!(geometry.kind_name(), "box");
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(matches!(Geometry::cuboid(0.0, 1.0, 1.0), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(Geometry::plane(4.0, -1.0), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(Geometry::sphere(f32::NAN, 8, 8), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(Geometry::cuboid(1.0, f32::INFINITY, 1.0), Err(SceneError::InvalidGeometry(_))));
    }

    #[test]
    fn test_sphere_segment_minimum() {
        assert!(Geometry::sphere(1.0, 3, 2).is_ok());
        assert!(matches!(Geometry::sphere(1.0, 2, 8), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(Geometry::sphere(1.0, 8, 1), Err(SceneError::InvalidGeometry(_))));
    }

    #[test]
    fn test_plane_has_no_depth() {
        let plane = Geometry::plane(4.0, 4.0).unwrap();
        assert_eq!(plane.depth(), 0.0);
        assert_eq!(plane.height(), 4.0);
    }
}
