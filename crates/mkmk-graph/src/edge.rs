use crate::annotation::Annotations;
use crate::node::NodeId;

/// A directed dependency from the owning node to `target`.
///
/// The annotations say what the dependency means. An object file may depend
/// on a source file and on headers, but only the source goes on the compile
/// command line; the two edges are annotated differently so the action can
/// tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    target: NodeId,
    annotations: Annotations,
}

impl Edge {
    pub fn new(target: NodeId, annotations: Annotations) -> Self {
        Self { target, annotations }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// True if every key in `query` is present on this edge with the same
    /// value. Extra annotations on the edge are ignored, so the empty query
    /// matches everything.
    pub fn matches(&self, query: &Annotations) -> bool {
        query
            .iter()
            .all(|(key, value)| self.annotations.get(key) == Some(value))
    }
}
