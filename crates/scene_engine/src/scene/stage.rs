//! Scene and stage handles

use serde::{Deserialize, Serialize};

use super::node::NodeTree;
use super::scene_graph::{NodeId, SceneGraph};
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::Color;
use crate::params::{ParamBinding, ParamTarget, ParameterPanel, Tunable};
use crate::render::Camera;

/// Exponential distance fog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    /// Fog color
    pub color: Color,
    /// Density of the exponential falloff
    pub density: f32,
}

impl Fog {
    /// Create a fog descriptor
    pub fn new(color: Color, density: f32) -> Self {
        Self { color, density }
    }
}

/// A renderable scene: the node hierarchy plus scene-wide settings
#[derive(Debug, Clone)]
pub struct Scene {
    /// Node hierarchy
    pub graph: SceneGraph,

    /// Optional fog; renderers check for presence
    pub fog: Option<Fog>,

    /// Clear color
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene without fog on a black background
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            fog: None,
            background: Color::BLACK,
        }
    }

    /// Enable fog
    pub fn with_fog(mut self, fog: Fog) -> Self {
        self.fog = Some(fog);
        self
    }

    /// Set the clear color
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Insert a subtree directly under the root
    pub fn add_to_root(&mut self, tree: NodeTree) -> SceneResult<NodeId> {
        self.graph.add_to_root(tree)
    }
}

/// Explicit handle to everything one render loop operates on
///
/// Scene construction returns a `Stage`; the animation loop, renderers,
/// inspectors and parameter panels receive it by reference. There is no
/// process-wide current scene.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Scene contents
    pub scene: Scene,
    /// Viewing camera
    pub camera: Camera,
}

impl Stage {
    /// Bundle a scene and a camera
    pub fn new(scene: Scene, camera: Camera) -> Self {
        Self { scene, camera }
    }

    fn target(&self, target: ParamTarget) -> SceneResult<&dyn Tunable> {
        match target {
            ParamTarget::Node(id) => self
                .scene
                .graph
                .get(id)
                .map(|node| node as &dyn Tunable)
                .ok_or(SceneError::UnknownNode(id)),
            ParamTarget::Camera => Ok(&self.camera as &dyn Tunable),
            ParamTarget::Fog => self
                .scene
                .fog
                .as_ref()
                .map(|fog| fog as &dyn Tunable)
                .ok_or_else(|| SceneError::UnknownField {
                    target: target.to_string(),
                    field: "fog is disabled".to_string(),
                }),
        }
    }

    fn target_mut(&mut self, target: ParamTarget) -> SceneResult<&mut dyn Tunable> {
        match target {
            ParamTarget::Node(id) => self
                .scene
                .graph
                .get_mut(id)
                .map(|node| node as &mut dyn Tunable)
                .ok_or(SceneError::UnknownNode(id)),
            ParamTarget::Camera => Ok(&mut self.camera as &mut dyn Tunable),
            ParamTarget::Fog => self
                .scene
                .fog
                .as_mut()
                .map(|fog| fog as &mut dyn Tunable)
                .ok_or_else(|| SceneError::UnknownField {
                    target: target.to_string(),
                    field: "fog is disabled".to_string(),
                }),
        }
    }

    /// Current value of a tunable field
    pub fn read_param(&self, target: ParamTarget, field: &str) -> SceneResult<f32> {
        self.target(target)?
            .param(field)
            .ok_or_else(|| SceneError::UnknownField {
                target: target.to_string(),
                field: field.to_string(),
            })
    }

    /// Write a tunable field
    ///
    /// No range check happens here: clamping is the panel's job. Values
    /// outside a binding's declared range reach the renderer as written.
    pub fn write_param(&mut self, target: ParamTarget, field: &str, value: f32) -> SceneResult<()> {
        let slot = self
            .target_mut(target)?
            .param_mut(field)
            .ok_or_else(|| SceneError::UnknownField {
                target: target.to_string(),
                field: field.to_string(),
            })?;
        *slot = value;
        log::trace!("Parameter {target}.{field} set to {value}");
        Ok(())
    }

    /// Register a live control for a field with a panel
    ///
    /// Fails if the field does not resolve on the target right now, or if
    /// either bound is not finite.
    pub fn bind_param<P>(
        &self,
        panel: &mut P,
        target: ParamTarget,
        field: &str,
        min: f32,
        max: f32,
    ) -> SceneResult<()>
    where
        P: ParameterPanel + ?Sized,
    {
        self.read_param(target, field)?;
        let binding = ParamBinding::new(target, field, min, max)?;
        log::debug!("Binding {target}.{field} to range [{min}, {max}]");
        panel.bind(binding);
        Ok(())
    }
}
