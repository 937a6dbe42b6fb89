//! Renderer boundary

use thiserror::Error;

use super::Camera;
use crate::scene::Scene;

/// Failures a renderer reports back to the frame driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The graphics context went away (device lost, surface destroyed)
    #[error("Rendering context lost")]
    ContextLost,

    /// The backend ran out of memory
    #[error("Out of memory")]
    OutOfMemory,

    /// Any other backend failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Consumes a scene and a camera and produces a frame
///
/// Implementations read the graph through [`SceneGraph::traverse_visible`]
/// (or [`FramePacket::extract`](super::FramePacket::extract)) and must not
/// keep references past the call.
///
/// [`SceneGraph::traverse_visible`]: crate::scene::SceneGraph::traverse_visible
pub trait Renderer {
    /// Draw one frame
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        (**self).render(scene, camera)
    }
}
