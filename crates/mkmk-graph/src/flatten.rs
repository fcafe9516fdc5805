use crate::annotation::Annotations;
use crate::edge::Edge;
use crate::node::NodeId;
use crate::registry::Registry;
use std::slice;

/// Lazy depth-first walk over a node's edges with groups inlined.
///
/// An edge into a group is replaced by the group's own (flattened) edges;
/// the group edge itself is never yielded. Every other edge is yielded if it
/// matches the query. A node reachable along several group paths is yielded
/// once per path.
#[derive(Debug)]
pub struct FlatEdges<'a> {
    registry: &'a Registry,
    query: &'a Annotations,
    stack: Vec<(NodeId, slice::Iter<'a, Edge>)>,
}

impl<'a> FlatEdges<'a> {
    pub(crate) fn new(registry: &'a Registry, node: NodeId, query: &'a Annotations) -> Self {
        let edges = registry.node(node).direct_edges().iter();
        Self {
            registry,
            query,
            stack: vec![(node, edges)],
        }
    }
}

impl<'a> Iterator for FlatEdges<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<&'a Edge> {
        loop {
            let (_, edges) = self.stack.last_mut()?;
            let Some(edge) = edges.next() else {
                self.stack.pop();
                continue;
            };

            let target = self.registry.node(edge.target());
            if !target.is_group() {
                if edge.matches(self.query) {
                    return Some(edge);
                }
                continue;
            }

            // Re-entering a group that is already being expanded would never
            // terminate.
            if self.stack.iter().any(|(id, _)| *id == target.id()) {
                tracing::warn!(group = %target.full_name(), "group includes itself, skipping");
                continue;
            }
            self.stack.push((target.id(), target.direct_edges().iter()));
        }
    }
}
