//! Light nodes ready for insertion into a scene

use super::Light;
use crate::error::SceneResult;
use crate::foundation::math::Vec3;
use crate::geometry::{GeometryFactory, Material};
use crate::scene::{Node, NodeTree};

/// Builds light subtrees
///
/// A light is an ordinary transform node; the rig only wraps it in a
/// [`NodeTree`] and optionally hangs a visual marker below it.
pub struct LightRig;

impl LightRig {
    /// Light node at `position`
    ///
    /// Lights with a shadow camera get `cast_shadow` set so renderers can
    /// find shadow casters by flag alone.
    pub fn node(light: Light, position: Vec3) -> NodeTree {
        let casts = light.shadow().is_some();
        NodeTree::new(Node::from_light(light).with_position(position).with_shadows(casts, false))
    }

    /// Named light node at `position`
    pub fn named(name: &str, light: Light, position: Vec3) -> NodeTree {
        Self::node(light, position).with_name(name)
    }

    /// Light node with a small unlit sphere child tinted by the light color
    ///
    /// The marker moves with the light because it is a child, and it does
    /// not cast shadows that would block its own light.
    pub fn with_marker(light: Light, position: Vec3, radius: f32) -> SceneResult<NodeTree> {
        let segments = GeometryFactory::SPHERE_SEGMENTS;
        let marker = GeometryFactory::sphere_with_material(radius, segments, segments, Material::basic(light.color))?
            .with_name("light-marker");
        Ok(Self::node(light, position).with_child(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::foundation::math::Color;
    use crate::scene::SceneGraph;

    #[test]
    fn test_shadowed_light_casts() {
        let light = Light::spot(Color::WHITE, 1.0).with_default_shadow().unwrap();
        let tree = LightRig::node(light, Vec3::new(0.0, 2.0, 0.0));
        assert!(tree.node().cast_shadow);
        assert_eq!(tree.node().transform.position.y, 2.0);

        let plain = LightRig::node(Light::point(Color::WHITE, 1.0), Vec3::zeros());
        assert!(!plain.node().cast_shadow);
    }

    #[test]
    fn test_marker_follows_light() {
        let light = Light::point(Color::from_hex(0xff0000), 1.0);
        let tree = LightRig::with_marker(light, Vec3::new(1.0, 2.0, 3.0), 0.05).unwrap();
        assert_eq!(tree.children().len(), 1);

        let marker = tree.children()[0].node();
        assert_eq!(marker.material().unwrap().color, Color::new(1.0, 0.0, 0.0));
        assert!(!marker.cast_shadow);

        let mut graph = SceneGraph::new();
        graph.add_to_root(tree).unwrap();
        let marker_id = graph.find_by_name("light-marker").unwrap();
        let world = graph.world_matrix(marker_id).unwrap();
        assert_eq!(world.m24, 2.0);
    }

    #[test]
    fn test_marker_rejects_bad_radius() {
        let light = Light::point(Color::WHITE, 1.0);
        assert!(matches!(
            LightRig::with_marker(light, Vec3::zeros(), 0.0),
            Err(SceneError::InvalidGeometry(_))
        ));
    }
}
