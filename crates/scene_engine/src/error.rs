//! Error types for scene construction and mutation

use crate::scene::NodeId;
use thiserror::Error;

/// Errors raised by scene graph, geometry, lighting and parameter operations
///
/// All variants are local and recoverable: the operation that produced them
/// left the scene unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Re-parenting would make a node its own ancestor
    #[error("Cycle error: node {child:?} is an ancestor of {parent:?}")]
    Cycle {
        /// Requested new parent
        parent: NodeId,
        /// Node that was being attached
        child: NodeId,
    },

    /// Name lookup found no match
    #[error("Node not found: '{0}'")]
    NotFound(String),

    /// Node id does not refer to a node in this graph
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The root node can be neither detached nor re-parented
    #[error("The root node cannot be detached")]
    DetachRoot,

    /// Geometry generator received invalid dimensions
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Light configuration is not valid for its kind
    #[error("Invalid light: {0}")]
    InvalidLight(String),

    /// Parameter range has a NaN or infinite bound
    #[error("Invalid parameter range [{min}, {max}]")]
    InvalidRange {
        /// Requested lower bound
        min: f32,
        /// Requested upper bound
        max: f32,
    },

    /// Parameter binding names a field the target does not expose
    #[error("Unknown field '{field}' on {target}")]
    UnknownField {
        /// Description of the bound target
        target: String,
        /// Field path that failed to resolve
        field: String,
    },
}

/// Result type alias using the scene error type
pub type SceneResult<T> = std::result::Result<T, SceneError>;
