//! Scene management
//!
//! The transform hierarchy and the handles built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! GeometryFactory / LightRig  ->  NodeTree (owned, detached)
//!                                     |
//!                              SceneGraph::insert
//!                                     v
//! Stage { Scene { SceneGraph, Fog }, Camera }  ->  Renderer
//! ```
//!
//! World transforms are composed on every traversal from local transforms,
//! which are the only spatial state that animation and panels mutate.

mod node;
mod scene_graph;
mod stage;

pub use node::{Node, NodeContent, NodeTree};
pub use scene_graph::{NodeId, SceneGraph};
pub use stage::{Fog, Scene, Stage};
