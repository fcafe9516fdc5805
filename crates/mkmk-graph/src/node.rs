use crate::annotation::Annotations;
use crate::edge::Edge;
use crate::error::{GraphError, Result};
use crate::platform::Platform;
use crate::registry::Registry;
use mkmk_common::{FileHandle, Identifier};
use std::fmt;

/// Handle to a node owned by a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// The thing to do to produce a node's output from its inputs.
pub trait Action: fmt::Debug {
    /// Returns the shell commands that build `output` for `node`. The parent
    /// folder of `output` exists by the time they run. `graph` gives access to
    /// the node's (flattened) inputs.
    fn commands(
        &self,
        platform: &dyn Platform,
        output: &str,
        node: NodeId,
        graph: &Registry,
    ) -> Result<Vec<String>>;
}

/// What a node stands for.
#[derive(Debug)]
pub enum NodeKind {
    /// Stand-in for its members; inlined when dependencies are flattened.
    Group,
    /// An existing file in the source tree. Usable as an input, produces
    /// nothing.
    Source { file: FileHandle },
    /// A file produced by running `action`.
    Artifact {
        output: FileHandle,
        action: Box<dyn Action>,
    },
}

/// A unit of the dependency graph.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    full_name: Identifier,
    /// Prefix of the script context that created the node.
    context: Identifier,
    edges: Vec<Edge>,
    kind: NodeKind,
}

impl Node {
    pub(crate) fn new(id: NodeId, full_name: Identifier, context: Identifier, kind: NodeKind) -> Self {
        Self {
            id,
            full_name,
            context,
            edges: Vec::new(),
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The local name, i.e. the last segment of the full name.
    pub fn name(&self) -> &str {
        self.full_name.last_segment().unwrap_or_default()
    }

    pub fn full_name(&self) -> &Identifier {
        &self.full_name
    }

    pub fn context(&self) -> &Identifier {
        &self.context
    }

    /// Name used when describing the node in output.
    pub fn display_name(&self) -> String {
        self.full_name.to_string()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub(crate) fn add_dependency(&mut self, target: NodeId, annotations: Annotations) {
        self.edges.push(Edge::new(target, annotations));
    }

    /// The edges as they were added, groups not expanded.
    pub fn direct_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The file this node produces, if it produces one.
    pub fn output_artifact(&self) -> Option<&FileHandle> {
        match &self.kind {
            NodeKind::Artifact { output, .. } => Some(output),
            NodeKind::Group | NodeKind::Source { .. } => None,
        }
    }

    /// The file that represents this node when it is used as an input.
    pub fn input_artifact(&self) -> Result<&FileHandle> {
        match &self.kind {
            NodeKind::Artifact { output, .. } => Ok(output),
            NodeKind::Source { file } => Ok(file),
            NodeKind::Group => Err(GraphError::NotAnArtifact {
                identifier: self.full_name.clone(),
            }),
        }
    }

    pub fn action(&self) -> Option<&dyn Action> {
        match &self.kind {
            NodeKind::Artifact { action, .. } => Some(action.as_ref()),
            NodeKind::Group | NodeKind::Source { .. } => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            NodeKind::Group => "Group",
            NodeKind::Source { .. } => "Source",
            NodeKind::Artifact { .. } => "Artifact",
        };
        write!(f, "{}({})", kind, self.full_name)
    }
}
