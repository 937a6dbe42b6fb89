//! Mesh node generators
//!
//! Every generator is a pure function of its parameters: it validates them,
//! builds a detached [`NodeTree`] and never touches a scene.

use super::{Geometry, Material, Side};
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{Color, Vec3};
use crate::scene::{Node, NodeTree};

/// Factory functions for mesh nodes and composite groupings
pub struct GeometryFactory;

impl GeometryFactory {
    /// Default box color (green)
    pub const BOX_COLOR: u32 = 0x00ff00;
    /// Default plane color (red)
    pub const PLANE_COLOR: u32 = 0xff0000;
    /// Default sphere segment count along both axes
    pub const SPHERE_SEGMENTS: u32 = 24;
    /// Name given to grids built by [`GeometryFactory::box_grid`]
    pub const GRID_NAME: &'static str = "box-grid";

    /// Unlit green box
    pub fn box_mesh(width: f32, height: f32, depth: f32) -> SceneResult<NodeTree> {
        Self::box_with_material(width, height, depth, Material::basic(Color::from_hex(Self::BOX_COLOR)))
    }

    /// Box with a custom material
    pub fn box_with_material(
        width: f32,
        height: f32,
        depth: f32,
        material: Material,
    ) -> SceneResult<NodeTree> {
        let geometry = Geometry::cuboid(width, height, depth)?;
        Ok(NodeTree::new(Node::mesh(geometry, material)))
    }

    /// Unlit red double-sided plane
    pub fn plane(width: f32, height: f32) -> SceneResult<NodeTree> {
        let material = Material::basic(Color::from_hex(Self::PLANE_COLOR)).with_side(Side::Double);
        Self::plane_with_material(width, height, material)
    }

    /// Plane with a custom material
    pub fn plane_with_material(width: f32, height: f32, material: Material) -> SceneResult<NodeTree> {
        let geometry = Geometry::plane(width, height)?;
        Ok(NodeTree::new(Node::mesh(geometry, material)))
    }

    /// Unlit white sphere
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> SceneResult<NodeTree> {
        Self::sphere_with_material(radius, width_segments, height_segments, Material::basic(Color::WHITE))
    }

    /// Sphere with explicit tessellation and material
    pub fn sphere_with_material(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        material: Material,
    ) -> SceneResult<NodeTree> {
        let geometry = Geometry::sphere(radius, width_segments, height_segments)?;
        Ok(NodeTree::new(Node::mesh(geometry, material)))
    }

    /// Grid of unit boxes with the default material
    pub fn box_grid(count: u32, spacing: f32) -> SceneResult<NodeTree> {
        Self::box_grid_with_material(count, spacing, Material::basic(Color::from_hex(Self::BOX_COLOR)))
    }

    /// Grid of unit boxes resting on the local XZ plane
    ///
    /// Each of the `count` columns holds a base box at `z = 0` followed by
    /// `count` row boxes at `z = row * spacing`, so the group owns
    /// `count * count + count` boxes. The group itself is offset by
    /// `-((count - 1) * spacing) / 2` on X and Z, centring the grid on the
    /// group's local origin so it can be moved as a unit.
    pub fn box_grid_with_material(count: u32, spacing: f32, material: Material) -> SceneResult<NodeTree> {
        if count == 0 {
            return Err(SceneError::InvalidGeometry("grid count must be at least 1".to_string()));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SceneError::InvalidGeometry(format!(
                "grid spacing must be positive and finite, got {spacing}"
            )));
        }

        let geometry = Geometry::cuboid(1.0, 1.0, 1.0)?;
        let rest_height = geometry.height() / 2.0;
        let unit_box = |x: f32, z: f32| {
            NodeTree::new(
                Node::mesh(geometry.clone(), material.clone())
                    .with_position(Vec3::new(x, rest_height, z)),
            )
        };

        let offset = -((count - 1) as f32 * spacing) / 2.0;
        let mut grid = NodeTree::new(Node::group().with_name(Self::GRID_NAME))
            .with_position(Vec3::new(offset, 0.0, offset));

        for column in 0..count {
            let x = column as f32 * spacing;
            grid.push_child(unit_box(x, 0.0));
            for row in 0..count {
                grid.push_child(unit_box(x, row as f32 * spacing));
            }
        }

        log::debug!("Built {count}x{count} box grid with spacing {spacing}");
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ShadingModel;

    #[test]
    fn test_box_height_is_exact() {
        for &(w, h, d) in &[(1.0, 1.0, 1.0), (0.25, 3.75, 2.0), (10.0, 0.001, 5.5)] {
            let tree = GeometryFactory::box_mesh(w, h, d).unwrap();
            let geometry = tree.node().geometry().unwrap();
            assert_eq!(geometry.height(), h);
            assert_eq!(geometry.width(), w);
            assert_eq!(geometry.depth(), d);
            assert!(tree.children().is_empty());
        }
    }

    #[test]
    fn test_default_materials() {
        let plane = GeometryFactory::plane(4.0, 4.0).unwrap();
        let material = plane.node().material().unwrap();
        assert_eq!(material.side, Side::Double);
        assert_eq!(material.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(material.shading, ShadingModel::Basic);

        let cube = GeometryFactory::box_mesh(1.0, 1.0, 1.0).unwrap();
        assert_eq!(cube.node().material().unwrap().color, Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_invalid_dimensions_create_nothing() {
        assert!(matches!(GeometryFactory::box_mesh(1.0, -1.0, 1.0), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(GeometryFactory::plane(0.0, 1.0), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(GeometryFactory::sphere(-0.5, 24, 16), Err(SceneError::InvalidGeometry(_))));
    }

    #[test]
    fn test_grid_centering_and_count() {
        for count in 1..=6u32 {
            for &spacing in &[0.5f32, 1.0, 1.5, 3.0] {
                let grid = GeometryFactory::box_grid(count, spacing).unwrap();
                let expected = -((count - 1) as f32 * spacing) / 2.0;
                let position = grid.node().transform.position;
                assert_eq!(position.x, expected);
                assert_eq!(position.z, expected);
                assert_eq!(position.y, 0.0);

                let boxes = grid.children();
                assert_eq!(boxes.len(), (count * count + count) as usize);
                assert!(boxes.iter().all(|b| b.children().is_empty() && b.node().is_mesh()));
                assert_eq!(grid.leaf_count(), (count * count + count) as usize);
            }
        }
    }

    #[test]
    fn test_grid_is_deterministic_and_rests_on_ground() {
        let a = GeometryFactory::box_grid(4, 1.5).unwrap();
        let b = GeometryFactory::box_grid(4, 1.5).unwrap();
        assert_eq!(a, b);
        assert!(a.children().iter().all(|b| b.node().transform.position.y == 0.5));

        let last = a.children().last().unwrap().node().transform.position;
        assert_eq!(last.x, 4.5);
        assert_eq!(last.z, 4.5);
        assert_eq!(a.node().name(), Some(GeometryFactory::GRID_NAME));
    }

    #[test]
    fn test_grid_rejects_bad_parameters() {
        assert!(matches!(GeometryFactory::box_grid(0, 1.0), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(GeometryFactory::box_grid(3, 0.0), Err(SceneError::InvalidGeometry(_))));
        assert!(matches!(GeometryFactory::box_grid(3, f32::NAN), Err(SceneError::InvalidGeometry(_))));
    }
}
