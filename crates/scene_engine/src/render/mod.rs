//! Rendering boundary
//!
//! The crate does not draw anything itself. This module holds the pieces a
//! renderer needs from the scene side: the [`Camera`], the [`Renderer`] and
//! [`CameraController`] traits the frame driver calls into, and
//! [`FramePacket`], a flattened per-frame view of the visible scene.

mod camera;
mod controller;
mod frame;
mod renderer;

pub use camera::Camera;
pub use controller::{CameraController, FixedCamera, OrbitController};
pub use frame::{DrawItem, DrawPass, FramePacket, LightItem, LightUniform};
pub use renderer::{RenderError, Renderer};
