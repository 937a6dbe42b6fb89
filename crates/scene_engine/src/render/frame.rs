//! # Frame extraction
//!
//! Flattens a scene into the per-frame lists a renderer backend consumes:
//! draw items split into opaque and transparent passes, and the active lights
//! with their world placement.
//!
//! - Opaque items are sorted front-to-back for early depth rejection
//! - Transparent items are sorted back-to-front for alpha blending
//! - Invisible subtrees are skipped entirely
//! - Lights are also available as packed [`LightUniform`] blocks ready for
//!   a uniform or storage buffer upload

use std::cmp::Ordering;

use bytemuck::{Pod, Zeroable};

use super::Camera;
use crate::foundation::math::{matrix_translation, Color, Mat4, Vec3};
use crate::geometry::{Geometry, Material};
use crate::lighting::{Light, LightKind, ShadowCamera};
use crate::scene::{Fog, NodeContent, NodeId, Scene};

/// Which pass a draw item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPass {
    /// Depth-tested, no blending
    Opaque,
    /// Blended after the opaque pass
    Transparent,
}

/// One mesh to draw this frame
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Source node
    pub node: NodeId,
    /// Composed world transform
    pub world: Mat4,
    /// Shape to draw
    pub geometry: Geometry,
    /// Surface to draw it with
    pub material: Material,
    /// Whether the mesh is drawn into shadow maps
    pub cast_shadow: bool,
    /// Whether the mesh samples shadow maps
    pub receive_shadow: bool,
    /// Distance from the camera, used for sorting
    pub depth: f32,
}

impl DrawItem {
    /// Pass this item is drawn in
    pub fn pass(&self) -> DrawPass {
        if self.material.is_transparent() {
            DrawPass::Transparent
        } else {
            DrawPass::Opaque
        }
    }
}

/// One light contributing to this frame
#[derive(Debug, Clone)]
pub struct LightItem {
    /// Source node
    pub node: NodeId,
    /// Light parameters
    pub light: Light,
    /// World position of the light node
    pub position: Vec3,
    /// Direction of travel for spot and directional lights
    pub direction: Option<Vec3>,
}

impl LightItem {
    /// Shadow camera, if this light renders a shadow map
    pub fn shadow(&self) -> Option<&ShadowCamera> {
        self.light.shadow()
    }

    /// GPU layout of this light
    pub fn uniform(&self) -> LightUniform {
        let light = &self.light;
        LightUniform {
            position: self.position.into(),
            kind: LightUniform::kind_code(light.kind()),
            direction: self.direction.unwrap_or_else(Vec3::zeros).into(),
            cos_angle: light.angle.cos(),
            color: bytemuck::cast(light.color),
            intensity: light.intensity,
            distance: light.distance,
            decay: light.decay,
            penumbra: light.penumbra,
            shadowed: u32::from(self.shadow().is_some()),
        }
    }
}

/// Packed light block, 64 bytes with no padding
///
/// Field order matches a std140/std430 `vec4`-aligned struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// World position
    pub position: [f32; 3],
    /// 0 point, 1 spot, 2 directional, 3 ambient
    pub kind: u32,
    /// Normalized direction of travel, zero for point and ambient lights
    pub direction: [f32; 3],
    /// Cosine of the spot cone half-angle
    pub cos_angle: f32,
    /// Linear RGB
    pub color: [f32; 3],
    /// Intensity multiplier
    pub intensity: f32,
    /// Cut-off distance (0 = unlimited)
    pub distance: f32,
    /// Falloff exponent
    pub decay: f32,
    /// Spot cone softness
    pub penumbra: f32,
    /// 1 if the light renders a shadow map
    pub shadowed: u32,
}

impl LightUniform {
    fn kind_code(kind: LightKind) -> u32 {
        match kind {
            LightKind::Point => 0,
            LightKind::Spot => 1,
            LightKind::Directional => 2,
            LightKind::Ambient => 3,
        }
    }

    /// Raw bytes of a block array, for copying into a mapped buffer
    pub fn as_bytes(uniforms: &[Self]) -> &[u8] {
        bytemuck::cast_slice(uniforms)
    }
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone)]
pub struct FramePacket {
    /// Camera view matrix
    pub view: Mat4,
    /// Camera projection matrix
    pub projection: Mat4,
    /// Camera position
    pub eye: Vec3,
    /// Clear color
    pub background: Color,
    /// Fog, when enabled
    pub fog: Option<Fog>,
    opaque: Vec<DrawItem>,
    transparent: Vec<DrawItem>,
    lights: Vec<LightItem>,
}

impl FramePacket {
    /// Walk the visible part of `scene` as seen from `camera`
    pub fn extract(scene: &Scene, camera: &Camera) -> Self {
        let mut packet = Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            eye: camera.position,
            background: scene.background,
            fog: scene.fog.clone(),
            opaque: Vec::new(),
            transparent: Vec::new(),
            lights: Vec::new(),
        };

        scene.graph.traverse_visible(|id, node, world| {
            let position = matrix_translation(world);
            match node.content() {
                NodeContent::Group => {}
                NodeContent::Mesh { geometry, material } => {
                    let item = DrawItem {
                        node: id,
                        world: *world,
                        geometry: geometry.clone(),
                        material: material.clone(),
                        cast_shadow: node.cast_shadow,
                        receive_shadow: node.receive_shadow,
                        depth: (position - camera.position).norm(),
                    };
                    match item.pass() {
                        DrawPass::Opaque => packet.opaque.push(item),
                        DrawPass::Transparent => packet.transparent.push(item),
                    }
                }
                NodeContent::Light(light) => packet.lights.push(LightItem {
                    node: id,
                    light: light.clone(),
                    position,
                    direction: light.direction_from(position),
                }),
            }
        });

        packet
            .opaque
            .sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(Ordering::Equal));
        packet
            .transparent
            .sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));

        log::trace!(
            "Extracted frame: {} opaque, {} transparent, {} lights",
            packet.opaque.len(),
            packet.transparent.len(),
            packet.lights.len()
        );
        packet
    }

    /// Opaque items, nearest first
    pub fn opaque(&self) -> &[DrawItem] {
        &self.opaque
    }

    /// Transparent items, farthest first
    pub fn transparent(&self) -> &[DrawItem] {
        &self.transparent
    }

    /// Active lights in scene order
    pub fn lights(&self) -> &[LightItem] {
        &self.lights
    }

    /// Lights that render a shadow map
    pub fn shadow_casters(&self) -> impl Iterator<Item = &LightItem> {
        self.lights.iter().filter(|item| item.shadow().is_some())
    }

    /// Lights packed for upload, in scene order
    pub fn light_uniforms(&self) -> Vec<LightUniform> {
        self.lights.iter().map(LightItem::uniform).collect()
    }

    /// Total number of draw items
    pub fn draw_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }
}
