//! Scene nodes and detached node subtrees

use crate::foundation::math::{Transform, Vec3};
use crate::geometry::{Geometry, Material};
use crate::lighting::Light;

/// What a node carries besides its transform
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Pure transform node used to group children
    Group,
    /// Drawable mesh
    Mesh {
        /// Shape descriptor
        geometry: Geometry,
        /// Surface descriptor
        material: Material,
    },
    /// Light source
    Light(Light),
}

/// A spatial entity in the scene hierarchy
///
/// The transform, visibility and shadow flags are plain fields so the
/// animation loop and parameter panels can write them directly. Name and
/// content are fixed at construction; a light's tunable fields are reached
/// through [`Node::light_mut`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: Option<String>,

    /// Local transform relative to the parent
    pub transform: Transform,

    /// Whether this node and its descendants are drawn
    pub visible: bool,

    /// Whether the node casts shadows
    pub cast_shadow: bool,

    /// Whether the node receives shadows
    pub receive_shadow: bool,

    content: NodeContent,
}

impl Node {
    fn with_content(content: NodeContent) -> Self {
        Self {
            name: None,
            transform: Transform::identity(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            content,
        }
    }

    /// Empty group node
    pub fn group() -> Self {
        Self::with_content(NodeContent::Group)
    }

    /// Mesh node
    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self::with_content(NodeContent::Mesh { geometry, material })
    }

    /// Light node
    pub fn from_light(light: Light) -> Self {
        Self::with_content(NodeContent::Light(light))
    }

    /// Set the node name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the local position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Set both shadow flags
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// Node name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Node content
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Mesh geometry, if this is a mesh node
    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.content {
            NodeContent::Mesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    /// Mesh material, if this is a mesh node
    pub fn material(&self) -> Option<&Material> {
        match &self.content {
            NodeContent::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Light parameters, if this is a light node
    pub fn light(&self) -> Option<&Light> {
        match &self.content {
            NodeContent::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light parameters, if this is a light node
    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.content {
            NodeContent::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Whether this node is a mesh
    pub fn is_mesh(&self) -> bool {
        matches!(self.content, NodeContent::Mesh { .. })
    }

    /// Whether this node is a light
    pub fn is_light(&self) -> bool {
        matches!(self.content, NodeContent::Light(_))
    }

    /// Capture every field that may change after construction
    pub(crate) fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            transform: self.transform.clone(),
            visible: self.visible,
            cast_shadow: self.cast_shadow,
            receive_shadow: self.receive_shadow,
            light: self.light().cloned(),
        }
    }

    /// Put back state captured by [`Node::snapshot`]
    pub(crate) fn restore(&mut self, snapshot: NodeSnapshot) {
        self.transform = snapshot.transform;
        self.visible = snapshot.visible;
        self.cast_shadow = snapshot.cast_shadow;
        self.receive_shadow = snapshot.receive_shadow;
        if let (Some(light), Some(saved)) = (self.light_mut(), snapshot.light) {
            *light = saved;
        }
    }
}

/// Mutable state of a node at one point in time
#[derive(Debug, Clone)]
pub(crate) struct NodeSnapshot {
    transform: Transform,
    visible: bool,
    cast_shadow: bool,
    receive_shadow: bool,
    light: Option<Light>,
}

/// An owned node subtree that is not part of any scene graph
///
/// Factories return `NodeTree`s; [`SceneGraph::insert`](super::SceneGraph::insert)
/// moves them into a graph and [`SceneGraph::detach`](super::SceneGraph::detach)
/// hands them back. Dropping a tree drops every descendant.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTree {
    node: Node,
    children: Vec<NodeTree>,
}

impl NodeTree {
    /// Leaf tree around a node
    pub fn new(node: Node) -> Self {
        Self { node, children: Vec::new() }
    }

    /// Append a child subtree
    pub fn with_child(mut self, child: NodeTree) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child subtree in place
    pub fn push_child(&mut self, child: NodeTree) {
        self.children.push(child);
    }

    /// Set the root node's name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.node = self.node.with_name(name);
        self
    }

    /// Set the root node's local position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.node.transform.position = position;
        self
    }

    /// Set the root node's local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.node.transform = transform;
        self
    }

    /// Set the root node's shadow flags
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.node = self.node.with_shadows(cast, receive);
        self
    }

    /// Root node of the subtree
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Mutable root node of the subtree
    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Direct children in insertion order
    pub fn children(&self) -> &[NodeTree] {
        &self.children
    }

    /// Total number of nodes in the subtree, root included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeTree::node_count).sum::<usize>()
    }

    /// Number of nodes without children
    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(NodeTree::leaf_count).sum()
        }
    }

    /// Split into the root node and its children
    pub fn into_parts(self) -> (Node, Vec<NodeTree>) {
        (self.node, self.children)
    }
}

impl From<Node> for NodeTree {
    fn from(node: Node) -> Self {
        Self::new(node)
    }
}
