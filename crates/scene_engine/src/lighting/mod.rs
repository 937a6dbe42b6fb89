//! Lighting
//!
//! Light parameters carried by light nodes, plus the shadow camera
//! configuration that shadow-casting lights hand to the renderer. The core
//! stores this configuration only; it never computes shading or shadow maps.

mod rig;

pub use rig::LightRig;

use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{constants, Color, Vec3};

/// Types of lights supported by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Omnidirectional light radiating from the node position
    Point,
    /// Cone of light from the node position towards its target
    Spot,
    /// Parallel rays, as if infinitely distant, from the node towards its target
    Directional,
    /// Uniform light with no position or direction
    Ambient,
}

impl LightKind {
    /// Whether the node position affects the lighting
    pub fn is_positional(self) -> bool {
        matches!(self, Self::Point | Self::Spot)
    }

    /// Whether this kind may own a shadow camera
    pub fn supports_shadows(self) -> bool {
        matches!(self, Self::Spot | Self::Directional)
    }
}

/// Projection used when rendering a light's shadow map
#[derive(Debug, Clone, PartialEq)]
pub enum ShadowProjection {
    /// Box-shaped volume, used by directional lights
    Orthographic {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Top plane
        top: f32,
        /// Bottom plane
        bottom: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
    },
    /// Cone-shaped volume, used by spot lights
    Perspective {
        /// Full cone angle in radians
        fov: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
    },
}

/// Shadow configuration consumed by the renderer
///
/// Opaque to the core: it is validated when built and then handed out
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowCamera {
    projection: ShadowProjection,
    map_size: u32,
    bias: f32,
}

impl ShadowCamera {
    /// Default shadow map resolution
    pub const DEFAULT_MAP_SIZE: u32 = 512;

    /// Orthographic shadow volume of the given half extent
    pub fn orthographic(half_extent: f32, near: f32, far: f32) -> Self {
        Self {
            projection: ShadowProjection::Orthographic {
                left: -half_extent,
                right: half_extent,
                top: half_extent,
                bottom: -half_extent,
                near,
                far,
            },
            map_size: Self::DEFAULT_MAP_SIZE,
            bias: 0.0,
        }
    }

    /// Perspective shadow volume
    pub fn perspective(fov: f32, near: f32, far: f32) -> Self {
        Self {
            projection: ShadowProjection::Perspective { fov, near, far },
            map_size: Self::DEFAULT_MAP_SIZE,
            bias: 0.0,
        }
    }

    /// Set the shadow map resolution
    pub fn with_map_size(mut self, map_size: u32) -> Self {
        self.map_size = map_size;
        self
    }

    /// Set the depth bias
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Projection volume
    pub fn projection(&self) -> &ShadowProjection {
        &self.projection
    }

    /// Shadow map resolution in texels per side
    pub fn map_size(&self) -> u32 {
        self.map_size
    }

    /// Depth bias
    pub fn bias(&self) -> f32 {
        self.bias
    }

    fn validate(&self) -> SceneResult<()> {
        let (near, far) = match self.projection {
            ShadowProjection::Orthographic { left, right, top, bottom, near, far } => {
                if left >= right || bottom >= top {
                    return Err(SceneError::InvalidLight(format!(
                        "shadow volume is empty: left {left}, right {right}, bottom {bottom}, top {top}"
                    )));
                }
                (near, far)
            }
            ShadowProjection::Perspective { fov, near, far } => {
                if !(fov > 0.0 && fov < constants::PI) {
                    return Err(SceneError::InvalidLight(format!(
                        "shadow fov must lie in (0, pi), got {fov}"
                    )));
                }
                (near, far)
            }
        };
        if !(near >= 0.0 && far > near) {
            return Err(SceneError::InvalidLight(format!(
                "shadow clip range must satisfy 0 <= near < far, got {near}..{far}"
            )));
        }
        if self.map_size == 0 {
            return Err(SceneError::InvalidLight("shadow map size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Light source parameters
///
/// All fields except the kind and the shadow camera are tunable at any time.
/// Fields that do not apply to a kind keep their defaults and are ignored by
/// renderers (and not exposed to parameter panels).
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    kind: LightKind,
    /// Light color
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
    /// Cut-off distance for point/spot lights (0 = unlimited)
    pub distance: f32,
    /// Falloff exponent for point/spot lights
    pub decay: f32,
    /// Spot cone half-angle in radians
    pub angle: f32,
    /// Spot cone softness in `0.0..=1.0`
    pub penumbra: f32,
    /// World-space point spot and directional lights aim at
    pub target: Vec3,
    shadow: Option<ShadowCamera>,
}

impl Light {
    /// Default falloff exponent
    pub const DEFAULT_DECAY: f32 = 2.0;
    /// Default spot cone half-angle
    pub const DEFAULT_SPOT_ANGLE: f32 = constants::PI / 3.0;

    fn new(kind: LightKind, color: Color, intensity: f32) -> Self {
        Self {
            kind,
            color,
            intensity,
            distance: 0.0,
            decay: Self::DEFAULT_DECAY,
            angle: Self::DEFAULT_SPOT_ANGLE,
            penumbra: 0.0,
            target: Vec3::zeros(),
            shadow: None,
        }
    }

    /// Point light
    pub fn point(color: Color, intensity: f32) -> Self {
        Self::new(LightKind::Point, color, intensity)
    }

    /// Spot light aimed at the origin
    pub fn spot(color: Color, intensity: f32) -> Self {
        Self::new(LightKind::Spot, color, intensity)
    }

    /// Directional light shining towards the origin
    pub fn directional(color: Color, intensity: f32) -> Self {
        Self::new(LightKind::Directional, color, intensity)
    }

    /// Ambient light
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self::new(LightKind::Ambient, color, intensity)
    }

    /// Set the cut-off distance
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set the spot cone
    pub fn with_cone(mut self, angle: f32, penumbra: f32) -> Self {
        self.angle = angle;
        self.penumbra = penumbra;
        self
    }

    /// Set the aim point
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Attach a shadow camera
    ///
    /// Only spot and directional lights cast shadow maps.
    pub fn with_shadow(mut self, shadow: ShadowCamera) -> SceneResult<Self> {
        if !self.kind.supports_shadows() {
            return Err(SceneError::InvalidLight(format!(
                "{:?} lights cannot own a shadow camera",
                self.kind
            )));
        }
        shadow.validate()?;
        self.shadow = Some(shadow);
        Ok(self)
    }

    /// Attach the default shadow camera for this kind
    pub fn with_default_shadow(self) -> SceneResult<Self> {
        let shadow = match self.kind {
            LightKind::Directional => ShadowCamera::orthographic(5.0, 0.5, 500.0),
            _ => ShadowCamera::perspective(constants::PI * 50.0 / 180.0, 0.5, 500.0),
        };
        self.with_shadow(shadow)
    }

    /// Light kind
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Shadow camera, if the light casts shadow maps
    pub fn shadow(&self) -> Option<&ShadowCamera> {
        self.shadow.as_ref()
    }

    /// Direction the light travels, for a light node at `world_position`
    ///
    /// `None` for point and ambient lights, or when the light sits on its
    /// target.
    pub fn direction_from(&self, world_position: Vec3) -> Option<Vec3> {
        if !matches!(self.kind, LightKind::Spot | LightKind::Directional) {
            return None;
        }
        (self.target - world_position).try_normalize(f32::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kind_traits() {
        assert!(LightKind::Point.is_positional());
        assert!(LightKind::Spot.is_positional());
        assert!(!LightKind::Directional.is_positional());
        assert!(!LightKind::Ambient.is_positional());
        assert!(LightKind::Directional.supports_shadows());
        assert!(!LightKind::Point.supports_shadows());
    }

    #[test]
    fn test_only_spot_and_directional_accept_shadows() {
        let shadow = ShadowCamera::orthographic(10.0, 1.0, 100.0);
        assert!(Light::directional(Color::WHITE, 1.0).with_shadow(shadow.clone()).is_ok());
        assert!(Light::spot(Color::WHITE, 1.0).with_default_shadow().is_ok());
        assert!(matches!(
            Light::point(Color::WHITE, 1.0).with_shadow(shadow.clone()),
            Err(SceneError::InvalidLight(_))
        ));
        assert!(matches!(
            Light::ambient(Color::WHITE, 1.0).with_shadow(shadow),
            Err(SceneError::InvalidLight(_))
        ));
    }

    #[test]
    fn test_shadow_camera_is_stored_unchanged() {
        let shadow = ShadowCamera::orthographic(10.0, 1.0, 100.0)
            .with_map_size(2048)
            .with_bias(0.001);
        let light = Light::directional(Color::WHITE, 2.0)
            .with_shadow(shadow.clone())
            .unwrap();
        assert_eq!(light.shadow(), Some(&shadow));
        assert_eq!(light.shadow().unwrap().map_size(), 2048);
    }

    #[test]
    fn test_invalid_shadow_volumes() {
        let light = Light::spot(Color::WHITE, 1.0);
        assert!(light.clone().with_shadow(ShadowCamera::perspective(0.0, 1.0, 10.0)).is_err());
        assert!(light.clone().with_shadow(ShadowCamera::perspective(1.0, 10.0, 1.0)).is_err());
        assert!(light
            .with_shadow(ShadowCamera::perspective(1.0, 1.0, 10.0).with_map_size(0))
            .is_err());
        assert!(Light::directional(Color::WHITE, 1.0)
            .with_shadow(ShadowCamera::orthographic(0.0, 1.0, 10.0))
            .is_err());
    }

    #[test]
    fn test_direction_from_position() {
        let light = Light::directional(Color::WHITE, 1.0);
        let direction = light.direction_from(Vec3::new(0.0, 4.0, 0.0)).unwrap();
        assert_relative_eq!(direction, Vec3::new(0.0, -1.0, 0.0));
        assert!(Light::point(Color::WHITE, 1.0).direction_from(Vec3::y()).is_none());
        assert!(light.direction_from(Vec3::zeros()).is_none());
    }
}
