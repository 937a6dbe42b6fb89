//! Surface descriptors for meshes

use crate::foundation::math::Color;

/// Lighting model a renderer should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingModel {
    /// Unlit flat color
    #[default]
    Basic,
    /// Diffuse-only
    Lambert,
    /// Diffuse plus specular highlight
    Phong,
    /// Physically based metallic/roughness
    Standard,
}

/// Which faces are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Front faces only
    #[default]
    Front,
    /// Back faces only
    Back,
    /// Both faces
    Double,
}

/// Material properties for a mesh
///
/// Materials are plain values. Once attached to a node they cannot be
/// changed, the node only hands out shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color
    pub color: Color,

    /// Shading model
    pub shading: ShadingModel,

    /// Face culling mode
    pub side: Side,

    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: f32,

    /// Draw edges only
    pub wireframe: bool,
}

impl Material {
    /// Create a new unlit white material
    pub fn new() -> Self {
        Self {
            color: Color::WHITE,
            shading: ShadingModel::Basic,
            side: Side::Front,
            opacity: 1.0,
            wireframe: false,
        }
    }

    /// Unlit material with the given color
    pub fn basic(color: Color) -> Self {
        Self::new().with_color(color)
    }

    /// Phong material with the given color
    pub fn phong(color: Color) -> Self {
        Self::new().with_color(color).with_shading(ShadingModel::Phong)
    }

    /// Physically based material with the given color
    pub fn standard(color: Color) -> Self {
        Self::new().with_color(color).with_shading(ShadingModel::Standard)
    }

    /// Set the base color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the shading model
    pub fn with_shading(mut self, shading: ShadingModel) -> Self {
        self.shading = shading;
        self
    }

    /// Set which faces are drawn
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Toggle wireframe drawing
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Whether the renderer must blend this material
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
