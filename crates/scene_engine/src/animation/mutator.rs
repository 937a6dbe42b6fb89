//! Per-node procedural animation
//!
//! A mutator is a `(predicate, mutator)` pair. Every tick the registry walks
//! the graph in pre-order and, for each node, runs every registered mutator
//! whose predicate accepts that node. Registration order decides the order
//! of mutators on the same node.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::scene::{Node, NodeId, SceneGraph};

/// Failure reported by a single mutation
///
/// Never fatal: the node is restored and the tick continues.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Mutator failed: {0}")]
pub struct MutatorError(pub String);

impl MutatorError {
    /// Create an error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Selects the nodes a mutator applies to
pub type Predicate = Box<dyn Fn(NodeId, &Node) -> bool>;

/// Updates one node given the number of ticks elapsed before this one
pub type Mutator = Box<dyn FnMut(&mut Node, u64) -> Result<(), MutatorError>>;

/// Handle returned by [`MutatorRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutatorId(u64);

impl fmt::Display for MutatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mutator#{}", self.0)
    }
}

struct Entry {
    id: MutatorId,
    predicate: Predicate,
    mutator: Mutator,
}

/// Outcome of one pass over the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationReport {
    /// Mutations that completed
    pub applied: u64,
    /// Mutations that failed and were rolled back
    pub failed: u64,
}

/// Ordered set of registered mutators
#[derive(Default)]
pub struct MutatorRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl fmt::Debug for MutatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorRegistry")
            .field("mutators", &self.entries.iter().map(|entry| entry.id).collect::<Vec<_>>())
            .finish()
    }
}

impl MutatorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mutator that runs on every node `predicate` accepts
    pub fn register<P, M>(&mut self, predicate: P, mutator: M) -> MutatorId
    where
        P: Fn(NodeId, &Node) -> bool + 'static,
        M: FnMut(&mut Node, u64) -> Result<(), MutatorError> + 'static,
    {
        let id = MutatorId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            predicate: Box::new(predicate),
            mutator: Box::new(mutator),
        });
        log::debug!("Registered {id}");
        id
    }

    /// Remove a mutator; returns whether it was registered
    pub fn unregister(&mut self, id: MutatorId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            log::debug!("Unregistered {id}");
        }
        removed
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: MutatorId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Number of registered mutators
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no mutators are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every matching mutator over the graph in pre-order
    ///
    /// A mutation that returns an error, panics, or leaves a non-finite
    /// transform is undone by restoring the node's state from just before that
    /// mutation. Other mutations, including earlier ones on the same node,
    /// are kept.
    pub fn apply(&mut self, graph: &mut SceneGraph, elapsed_ticks: u64) -> MutationReport {
        let mut report = MutationReport::default();
        if self.entries.is_empty() {
            return report;
        }

        for id in graph.pre_order(graph.root()) {
            let Some(node) = graph.get_mut(id) else {
                continue;
            };
            for entry in &mut self.entries {
                if !(entry.predicate)(id, &*node) {
                    continue;
                }
                let snapshot = node.snapshot();
                let mutator = &mut entry.mutator;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| mutator(&mut *node, elapsed_ticks)))
                    .unwrap_or_else(|payload| Err(MutatorError::new(panic_message(payload.as_ref()))))
                    .and_then(|()| {
                        if node.transform.is_finite() {
                            Ok(())
                        } else {
                            Err(MutatorError::new("transform is not finite"))
                        }
                    });
                match outcome {
                    Ok(()) => report.applied += 1,
                    Err(error) => {
                        node.restore(snapshot);
                        report.failed += 1;
                        log::warn!("{} on node {id:?} rolled back: {error}", entry.id);
                    }
                }
            }
        }
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("panicked: {detail}")
}

/// Common node predicates
pub mod predicate {
    use std::collections::HashSet;

    use crate::scene::{Node, NodeId};

    /// Every node, the root included
    pub fn any() -> impl Fn(NodeId, &Node) -> bool {
        |_, _| true
    }

    /// Mesh nodes
    pub fn meshes() -> impl Fn(NodeId, &Node) -> bool {
        |_, node| node.is_mesh()
    }

    /// Light nodes
    pub fn lights() -> impl Fn(NodeId, &Node) -> bool {
        |_, node| node.is_light()
    }

    /// Nodes carrying `name`
    pub fn named(name: impl Into<String>) -> impl Fn(NodeId, &Node) -> bool {
        let name = name.into();
        move |_, node| node.name() == Some(name.as_str())
    }

    /// Exactly the given nodes
    pub fn ids(ids: impl IntoIterator<Item = NodeId>) -> impl Fn(NodeId, &Node) -> bool {
        let ids: HashSet<NodeId> = ids.into_iter().collect();
        move |id, _| ids.contains(&id)
    }
}

/// Ready-made mutators
pub mod mutators {
    use super::MutatorError;
    use crate::foundation::math::Vec3;
    use crate::scene::Node;

    /// Add `rate` radians per tick to the node's Euler rotation
    pub fn spin(rate: Vec3) -> impl FnMut(&mut Node, u64) -> Result<(), MutatorError> {
        move |node, _| {
            node.transform.rotation += rate;
            Ok(())
        }
    }

    /// Multiply the node's scale by `factor` every tick
    pub fn scale_by(factor: Vec3) -> impl FnMut(&mut Node, u64) -> Result<(), MutatorError> {
        move |node, _| {
            node.transform.scale.component_mul_assign(&factor);
            Ok(())
        }
    }

    /// Oscillate the Y scale around 1.0
    ///
    /// The phase depends on the node's own X and Z position, so a grid of
    /// boxes ripples as a wave.
    pub fn wave(amplitude: f32, speed: f32) -> impl FnMut(&mut Node, u64) -> Result<(), MutatorError> {
        move |node, ticks| {
            let position = node.transform.position;
            let phase = ticks as f32 * speed + position.x + position.z;
            let height = 1.0 + amplitude * phase.sin();
            if height <= 0.0 {
                return Err(MutatorError::new(format!("wave collapsed the node to height {height}")));
            }
            node.transform.scale.y = height;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants, Color, Vec3};
    use crate::geometry::GeometryFactory;
    use crate::lighting::{Light, LightRig};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn graph_with_grid() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let grid = graph.add_to_root(GeometryFactory::box_grid(2, 1.0).unwrap()).unwrap();
        graph
            .add_to_root(LightRig::named("sun", Light::directional(Color::WHITE, 1.0), Vec3::y()))
            .unwrap();
        (graph, grid)
    }

    #[test]
    fn test_mutators_visit_in_pre_order() {
        let (mut graph, grid) = graph_with_grid();
        let visited = Rc::new(RefCell::new(Vec::new()));
        let mut registry = MutatorRegistry::new();
        let seen = Rc::clone(&visited);
        registry.register(predicate::any(), move |node: &mut Node, _| {
            seen.borrow_mut().push(node.name().map(str::to_string));
            Ok(())
        });

        let report = registry.apply(&mut graph, 0);
        assert_eq!(report, MutationReport { applied: 9, failed: 0 });
        let visited = visited.borrow();
        assert_eq!(visited[0], None);
        assert_eq!(visited[1].as_deref(), Some(GeometryFactory::GRID_NAME));
        assert_eq!(visited.last().unwrap().as_deref(), Some("sun"));
        assert_eq!(graph.children(grid).len(), 6);
    }

    #[test]
    fn test_failed_mutation_is_rolled_back() {
        let (mut graph, _) = graph_with_grid();
        let sun = graph.find_by_name("sun").unwrap();
        let mut registry = MutatorRegistry::new();
        registry.register(predicate::lights(), mutators::spin(Vec3::new(0.0, 0.5, 0.0)));
        registry.register(predicate::lights(), |node: &mut Node, _| {
            node.transform.position.x = 99.0;
            if let Some(light) = node.light_mut() {
                light.intensity = 0.0;
            }
            Err(MutatorError::new("boom"))
        });

        let report = registry.apply(&mut graph, 3);
        assert_eq!(report, MutationReport { applied: 1, failed: 1 });

        let node = graph.get(sun).unwrap();
        assert_eq!(node.transform.rotation.y, 0.5);
        assert_eq!(node.transform.position.x, 0.0);
        assert_eq!(node.light().unwrap().intensity, 1.0);
    }

    #[test]
    fn test_panicking_mutation_counts_as_failure() {
        let (mut graph, grid) = graph_with_grid();
        let mut registry = MutatorRegistry::new();
        registry.register(predicate::ids([grid]), |node: &mut Node, _| {
            node.transform.position.y = 3.0;
            panic!("lost track of {}", node.transform.position.y);
        });
        registry.register(predicate::ids([grid]), mutators::spin(Vec3::new(0.0, 1.0, 0.0)));

        let report = registry.apply(&mut graph, 0);
        assert_eq!(report, MutationReport { applied: 1, failed: 1 });
        let node = graph.get(grid).unwrap();
        assert_eq!(node.transform.position.y, 0.0);
        assert_eq!(node.transform.rotation.y, 1.0);
    }

    #[test]
    fn test_panic_message_is_kept() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("bad input"));
        assert_eq!(panic_message(payload.as_ref()), "panicked: bad input");
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "panicked: non-string payload");
    }

    #[test]
    fn test_non_finite_result_is_rejected() {
        let (mut graph, _) = graph_with_grid();
        let mut registry = MutatorRegistry::new();
        registry.register(predicate::meshes(), mutators::scale_by(Vec3::new(f32::NAN, 1.0, 1.0)));
        let report = registry.apply(&mut graph, 0);
        assert_eq!(report.failed, 6);
        let mut scales_ok = true;
        graph.traverse(|_, node, _| scales_ok &= node.transform.scale == Vec3::new(1.0, 1.0, 1.0));
        assert!(scales_ok);
    }

    #[test]
    fn test_unregister_stops_mutation() {
        let (mut graph, grid) = graph_with_grid();
        let mut registry = MutatorRegistry::new();
        let id = registry.register(predicate::ids([grid]), mutators::spin(Vec3::new(0.1, 0.0, 0.0)));
        registry.apply(&mut graph, 0);
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());
        registry.apply(&mut graph, 1);
        assert_eq!(graph.get(grid).unwrap().transform.rotation.x, 0.1);
    }

    #[test]
    fn test_wave_depends_on_position() {
        let mut node = Node::group().with_position(Vec3::new(1.0, 0.0, 0.0));
        let mut wave = mutators::wave(0.5, 0.0);
        wave(&mut node, 10).unwrap();
        assert_eq!(node.transform.scale.y, 1.0 + 0.5 * 1.0f32.sin());

        let mut collapse = mutators::wave(2.0, 0.0);
        let mut low = Node::group().with_position(Vec3::new(-constants::HALF_PI, 0.0, 0.0));
        assert!(collapse(&mut low, 0).is_err());
        assert_eq!(low.transform.scale.y, 1.0);
    }

    #[test]
    fn test_named_predicate() {
        let (graph, _) = graph_with_grid();
        let is_sun = predicate::named("sun");
        let sun = graph.find_by_name("sun").unwrap();
        assert!(is_sun(sun, graph.get(sun).unwrap()));
        assert!(!is_sun(graph.root(), graph.get(graph.root()).unwrap()));
    }
}
