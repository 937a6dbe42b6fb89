//! Arena-backed transform hierarchy
//!
//! Nodes live in a slot map keyed by [`NodeId`]. Each slot records its parent
//! and its ordered children, so ownership is strictly top-down: removing a
//! slot removes its whole subtree, and parent links are only used for lookups
//! and cycle checks.

use slotmap::{new_key_type, SlotMap};

use super::node::{Node, NodeTree};
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::Mat4;

new_key_type! {
    /// Stable handle to a node inside a [`SceneGraph`]
    pub struct NodeId;
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Tree of transform nodes under a single root
///
/// World transforms are never cached: [`SceneGraph::traverse`] composes them
/// from the current local transforms every time it runs.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Slot>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only an unnamed root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Slot {
            node: Node::group(),
            parent: None,
            children: Vec::new(),
        });
        Self { nodes, root }
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `id` refers to a node in this graph
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Shared access to a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).map(|slot| &slot.node)
    }

    /// Mutable access to a node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).map(|slot| &mut slot.node)
    }

    /// Parent of a node (`None` for the root or unknown ids)
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|slot| slot.parent)
    }

    /// Children of a node in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    fn slot(&self, id: NodeId) -> SceneResult<&Slot> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Move an owned subtree into the graph under `parent`
    ///
    /// Children keep their order. Returns the id of the subtree's root.
    pub fn insert(&mut self, parent: NodeId, tree: NodeTree) -> SceneResult<NodeId> {
        self.slot(parent)?;

        let mut pending = vec![(parent, tree)];
        let mut subtree_root = None;
        while let Some((parent_id, tree)) = pending.pop() {
            let (node, children) = tree.into_parts();
            let id = self.nodes.insert(Slot {
                node,
                parent: Some(parent_id),
                children: Vec::with_capacity(children.len()),
            });
            if let Some(parent_slot) = self.nodes.get_mut(parent_id) {
                parent_slot.children.push(id);
            }
            subtree_root.get_or_insert(id);
            pending.extend(children.into_iter().rev().map(|child| (id, child)));
        }

        let id = subtree_root.ok_or(SceneError::UnknownNode(parent))?;
        log::debug!("Inserted subtree {:?} under {:?}", id, parent);
        Ok(id)
    }

    /// Move an owned subtree into the graph under the root
    pub fn add_to_root(&mut self, tree: NodeTree) -> SceneResult<NodeId> {
        self.insert(self.root, tree)
    }

    /// Re-parent an existing node under `parent`
    ///
    /// The child is unlinked from its previous parent and appended to the
    /// end of `parent`'s children. Its local transform is left untouched.
    /// Fails with [`SceneError::Cycle`] if `child` is `parent` itself or one
    /// of its ancestors; the graph is not modified in that case.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.slot(parent)?;
        self.slot(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.unlink(child);
        if let Some(slot) = self.nodes.get_mut(child) {
            slot.parent = Some(parent);
        }
        if let Some(slot) = self.nodes.get_mut(parent) {
            slot.children.push(child);
        }
        log::debug!("Re-parented {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Whether `ancestor` lies on the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.is_ancestor(ancestor, node)
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(old_parent) = self.parent(child) else {
            return;
        };
        if let Some(slot) = self.nodes.get_mut(old_parent) {
            slot.children.retain(|&id| id != child);
        }
        if let Some(slot) = self.nodes.get_mut(child) {
            slot.parent = None;
        }
    }

    /// Take a subtree out of the graph and return it as an owned tree
    pub fn detach(&mut self, id: NodeId) -> SceneResult<NodeTree> {
        if id == self.root {
            return Err(SceneError::DetachRoot);
        }
        self.slot(id)?;
        self.unlink(id);
        let tree = self.take_subtree(id);
        log::debug!("Detached subtree {:?} ({} nodes)", id, tree.node_count());
        Ok(tree)
    }

    /// Detach a subtree and drop it, returning how many nodes were destroyed
    pub fn remove(&mut self, id: NodeId) -> SceneResult<usize> {
        self.detach(id).map(|tree| tree.node_count())
    }

    fn take_subtree(&mut self, id: NodeId) -> NodeTree {
        let Some(slot) = self.nodes.remove(id) else {
            return NodeTree::new(Node::group());
        };
        let mut tree = NodeTree::new(slot.node);
        for child in slot.children {
            let subtree = self.take_subtree(child);
            tree.push_child(subtree);
        }
        tree
    }

    /// Ids of the subtree rooted at `start` in pre-order
    pub fn pre_order(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(start) {
            return order;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// First node named `name` in pre-order depth-first order
    ///
    /// Names are not unique. When several nodes share a name, the one
    /// reached first in pre-order wins, which is also the earliest inserted
    /// among siblings.
    pub fn find_by_name(&self, name: &str) -> SceneResult<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.get(id).and_then(Node::name) == Some(name) {
                return Ok(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        Err(SceneError::NotFound(name.to_string()))
    }

    /// Every node named `name`, in pre-order
    pub fn find_all_by_name(&self, name: &str) -> Vec<NodeId> {
        self.pre_order(self.root)
            .into_iter()
            .filter(|&id| self.get(id).and_then(Node::name) == Some(name))
            .collect()
    }

    /// Visit every node in pre-order with its composed world transform
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &Node, &Mat4),
    {
        self.walk(false, &mut visitor);
    }

    /// Like [`SceneGraph::traverse`] but skips invisible nodes and everything below them
    pub fn traverse_visible<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &Node, &Mat4),
    {
        self.walk(true, &mut visitor);
    }

    fn walk<F>(&self, visible_only: bool, visitor: &mut F)
    where
        F: FnMut(NodeId, &Node, &Mat4),
    {
        let mut stack = vec![(self.root, Mat4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(slot) = self.nodes.get(id) else {
                continue;
            };
            if visible_only && !slot.node.visible {
                continue;
            }
            let world = parent_world * slot.node.transform.to_matrix();
            visitor(id, &slot.node, &world);
            stack.extend(slot.children.iter().rev().map(|&child| (child, world)));
        }
    }

    /// Mutate every node in pre-order
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(NodeId, &mut Node),
    {
        for id in self.pre_order(self.root) {
            if let Some(node) = self.get_mut(id) {
                f(id, node);
            }
        }
    }

    /// World transform of a single node
    ///
    /// Composes from the root down in the same order as
    /// [`SceneGraph::traverse`], so both produce identical matrices.
    pub fn world_matrix(&self, id: NodeId) -> SceneResult<Mat4> {
        self.slot(id)?;
        let mut chain = vec![id];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }

        let mut world = Mat4::identity();
        for &link in chain.iter().rev() {
            world = world * self.slot(link)?.node.transform.to_matrix();
        }
        Ok(world)
    }
}
