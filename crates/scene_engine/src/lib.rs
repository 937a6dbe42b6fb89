//! # Scene Engine
//!
//! A real-time 3D scene graph and render-loop core.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed transform hierarchy with cycle-checked re-parenting
//! - **Procedural Geometry**: Boxes, planes, spheres and box grids as detached subtrees
//! - **Lighting**: Point, spot, directional and ambient lights with optional shadow cameras
//! - **Animation Loop**: Per-frame driver with registered node mutators
//! - **Live Parameters**: Named numeric fields bindable to external control panels
//!
//! Drawing is delegated to a [`Renderer`](render::Renderer) supplied by the host.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct NullRenderer;
//!
//! impl Renderer for NullRenderer {
//!     fn render(&mut self, _scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     scene.add_to_root(GeometryFactory::box_mesh(1.0, 1.0, 1.0)?)?;
//!     let mut stage = Stage::new(scene, Camera::default());
//!
//!     let mut animation = AnimationLoop::new(FixedRateScheduler::new(60.0)).with_max_ticks(Some(120));
//!     animation.start(&mut stage, &mut FixedCamera, &mut NullRenderer, |_| {})?;
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod foundation;
pub mod geometry;
pub mod lighting;
pub mod params;
pub mod render;
pub mod scene;

pub use error::{SceneError, SceneResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{
            mutators, predicate, AnimationLoop, FixedRateScheduler, FrameScheduler, ImmediateScheduler,
            LoopError, LoopHandle, LoopStats, MutatorError, MutatorRegistry, TickContext,
        },
        config::{Config, EngineSettings},
        error::{SceneError, SceneResult},
        foundation::math::{Color, Mat4, Transform, Vec3},
        geometry::{GeometryFactory, Material, Side},
        lighting::{Light, LightKind, LightRig, ShadowCamera},
        params::{BindingTable, ParamTarget, ParameterPanel},
        render::{Camera, CameraController, FixedCamera, OrbitController, RenderError, Renderer},
        scene::{Fog, Node, NodeId, NodeTree, Scene, SceneGraph, Stage},
    };
}
