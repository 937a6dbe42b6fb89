//! Live parameter binding
//!
//! Numeric state that external control surfaces may edit while the loop
//! runs: node transforms, light settings, camera projection and fog. Fields
//! are addressed by dotted paths such as `position.y` or `color.r`.
//!
//! The core only resolves and writes fields. Keeping values inside a
//! binding's range is the panel's responsibility; [`BindingTable`] is the
//! in-process panel that does so.

use std::fmt;

use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{Color, Vec3};
use crate::lighting::{Light, LightKind};
use crate::render::Camera;
use crate::scene::{Fog, Node, NodeId, Stage};

/// State with numeric fields addressable by name
pub trait Tunable {
    /// Current value of `field`, or `None` if it is not exposed
    fn param(&self, field: &str) -> Option<f32>;

    /// Writable slot for `field`, or `None` if it is not exposed
    fn param_mut(&mut self, field: &str) -> Option<&mut f32>;
}

fn vec3_component(vector: &Vec3, axis: &str) -> Option<f32> {
    match axis {
        "x" => Some(vector.x),
        "y" => Some(vector.y),
        "z" => Some(vector.z),
        _ => None,
    }
}

fn vec3_component_mut<'a>(vector: &'a mut Vec3, axis: &str) -> Option<&'a mut f32> {
    match axis {
        "x" => Some(&mut vector.x),
        "y" => Some(&mut vector.y),
        "z" => Some(&mut vector.z),
        _ => None,
    }
}

fn color_channel(color: &Color, channel: &str) -> Option<f32> {
    match channel {
        "r" => Some(color.r),
        "g" => Some(color.g),
        "b" => Some(color.b),
        _ => None,
    }
}

fn color_channel_mut<'a>(color: &'a mut Color, channel: &str) -> Option<&'a mut f32> {
    match channel {
        "r" => Some(&mut color.r),
        "g" => Some(&mut color.g),
        "b" => Some(&mut color.b),
        _ => None,
    }
}

impl Tunable for Node {
    fn param(&self, field: &str) -> Option<f32> {
        let transform = &self.transform;
        match field.split_once('.') {
            Some(("position", axis)) => vec3_component(&transform.position, axis),
            Some(("rotation", axis)) => vec3_component(&transform.rotation, axis),
            Some(("scale", axis)) => vec3_component(&transform.scale, axis),
            _ => self.light().and_then(|light| light.param(field)),
        }
    }

    fn param_mut(&mut self, field: &str) -> Option<&mut f32> {
        match field.split_once('.') {
            Some(("position", axis)) => vec3_component_mut(&mut self.transform.position, axis),
            Some(("rotation", axis)) => vec3_component_mut(&mut self.transform.rotation, axis),
            Some(("scale", axis)) => vec3_component_mut(&mut self.transform.scale, axis),
            _ => self.light_mut().and_then(|light| light.param_mut(field)),
        }
    }
}

impl Light {
    fn exposes(&self, field: &str) -> bool {
        let kind = self.kind();
        match field {
            "intensity" => true,
            "distance" | "decay" => kind.is_positional(),
            "angle" | "penumbra" => kind == LightKind::Spot,
            _ if field.starts_with("color.") => true,
            _ if field.starts_with("target.") => {
                matches!(kind, LightKind::Spot | LightKind::Directional)
            }
            _ => false,
        }
    }
}

impl Tunable for Light {
    fn param(&self, field: &str) -> Option<f32> {
        if !self.exposes(field) {
            return None;
        }
        match field.split_once('.') {
            Some(("color", channel)) => color_channel(&self.color, channel),
            Some(("target", axis)) => vec3_component(&self.target, axis),
            Some(_) => None,
            None => match field {
                "intensity" => Some(self.intensity),
                "distance" => Some(self.distance),
                "decay" => Some(self.decay),
                "angle" => Some(self.angle),
                "penumbra" => Some(self.penumbra),
                _ => None,
            },
        }
    }

    fn param_mut(&mut self, field: &str) -> Option<&mut f32> {
        if !self.exposes(field) {
            return None;
        }
        match field.split_once('.') {
            Some(("color", channel)) => color_channel_mut(&mut self.color, channel),
            Some(("target", axis)) => vec3_component_mut(&mut self.target, axis),
            Some(_) => None,
            None => match field {
                "intensity" => Some(&mut self.intensity),
                "distance" => Some(&mut self.distance),
                "decay" => Some(&mut self.decay),
                "angle" => Some(&mut self.angle),
                "penumbra" => Some(&mut self.penumbra),
                _ => None,
            },
        }
    }
}

impl Tunable for Camera {
    fn param(&self, field: &str) -> Option<f32> {
        match field.split_once('.') {
            Some(("position", axis)) => vec3_component(&self.position, axis),
            Some(("target", axis)) => vec3_component(&self.target, axis),
            Some(_) => None,
            None => match field {
                "fov" => Some(self.fov),
                "aspect" => Some(self.aspect),
                "near" => Some(self.near),
                "far" => Some(self.far),
                _ => None,
            },
        }
    }

    fn param_mut(&mut self, field: &str) -> Option<&mut f32> {
        match field.split_once('.') {
            Some(("position", axis)) => vec3_component_mut(&mut self.position, axis),
            Some(("target", axis)) => vec3_component_mut(&mut self.target, axis),
            Some(_) => None,
            None => match field {
                "fov" => Some(&mut self.fov),
                "aspect" => Some(&mut self.aspect),
                "near" => Some(&mut self.near),
                "far" => Some(&mut self.far),
                _ => None,
            },
        }
    }
}

impl Tunable for Fog {
    fn param(&self, field: &str) -> Option<f32> {
        match field.split_once('.') {
            Some(("color", channel)) => color_channel(&self.color, channel),
            Some(_) => None,
            None => (field == "density").then_some(self.density),
        }
    }

    fn param_mut(&mut self, field: &str) -> Option<&mut f32> {
        match field.split_once('.') {
            Some(("color", channel)) => color_channel_mut(&mut self.color, channel),
            Some(_) => None,
            None => (field == "density").then_some(&mut self.density),
        }
    }
}

/// Object a binding points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamTarget {
    /// A node in the stage's scene graph
    Node(NodeId),
    /// The stage camera
    Camera,
    /// The scene fog
    Fog,
}

impl fmt::Display for ParamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id:?}"),
            Self::Camera => f.write_str("camera"),
            Self::Fog => f.write_str("fog"),
        }
    }
}

/// Declared valid range of a bound field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl ParamRange {
    /// Range `[min, max]`; the bounds are swapped if given in reverse
    ///
    /// Fails with [`SceneError::InvalidRange`] if either bound is NaN or infinite.
    pub fn new(min: f32, max: f32) -> SceneResult<Self> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(SceneError::InvalidRange { min, max });
        }
        Ok(if min <= max { Self { min, max } } else { Self { min: max, max: min } })
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Whether a value lies inside the range
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A `(target, field, range)` triple registered with a panel
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBinding {
    /// Bound object
    pub target: ParamTarget,
    /// Dotted field path
    pub field: String,
    /// Declared valid range
    pub range: ParamRange,
}

impl ParamBinding {
    /// Create a binding, rejecting non-finite bounds
    pub fn new(target: ParamTarget, field: impl Into<String>, min: f32, max: f32) -> SceneResult<Self> {
        Ok(Self {
            target,
            field: field.into(),
            range: ParamRange::new(min, max)?,
        })
    }
}

/// External control surface that edits bound fields
///
/// Implementations own the widgets and must keep written values inside each
/// binding's range. Any number of bindings may share a field.
pub trait ParameterPanel {
    /// Register a live control
    fn bind(&mut self, binding: ParamBinding);
}

/// In-process panel that records bindings and clamps writes
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<ParamBinding>,
}

impl BindingTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered bindings in registration order
    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// First binding for `(target, field)`
    pub fn find(&self, target: ParamTarget, field: &str) -> Option<&ParamBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.target == target && binding.field == field)
    }

    /// Write a user value through the first matching binding
    ///
    /// The value is clamped to the binding's range before it reaches the
    /// stage. Returns the value actually written.
    pub fn set(&self, stage: &mut Stage, target: ParamTarget, field: &str, value: f32) -> SceneResult<f32> {
        let binding = self.find(target, field).ok_or_else(|| SceneError::UnknownField {
            target: target.to_string(),
            field: field.to_string(),
        })?;
        let clamped = binding.range.clamp(value);
        if clamped != value {
            log::debug!("Clamped {target}.{field} from {value} to {clamped}");
        }
        stage.write_param(target, field, clamped)?;
        Ok(clamped)
    }
}

impl ParameterPanel for BindingTable {
    fn bind(&mut self, binding: ParamBinding) {
        self.bindings.push(binding);
    }
}
