use crate::annotation::Annotations;
use crate::error::{GraphError, Result};
use crate::flatten::FlatEdges;
use crate::node::{Node, NodeId, NodeKind};
use crate::platform::Platform;
use mkmk_common::{FileHandle, Identifier};
use rustc_hash::FxHashMap;

/// The single authority mapping identifiers to nodes for one run.
///
/// Also holds the run-wide, read-only settings: the source root, the output
/// folder and the platform.
#[derive(Debug)]
pub struct Registry {
    nodes: Vec<Node>,
    by_name: FxHashMap<Identifier, NodeId>,
    root: FileHandle,
    bindir: FileHandle,
    platform: Box<dyn Platform>,
}

impl Registry {
    pub fn new(root: FileHandle, bindir: FileHandle, platform: impl Platform + 'static) -> Self {
        Self::with_platform(root, bindir, Box::new(platform))
    }

    pub fn with_platform(root: FileHandle, bindir: FileHandle, platform: Box<dyn Platform>) -> Self {
        Self {
            nodes: Vec::new(),
            by_name: FxHashMap::default(),
            root,
            bindir,
            platform,
        }
    }

    /// Returns the node registered under `full_name`, creating it from
    /// `make()` if there is none.
    ///
    /// On a hit `make` is not called, so whatever it would have built has no
    /// effect: the first creator wins.
    pub fn get_or_create(
        &mut self,
        full_name: Identifier,
        context: &Identifier,
        make: impl FnOnce() -> NodeKind,
    ) -> NodeId {
        if let Some(&id) = self.by_name.get(&full_name) {
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        tracing::debug!(node = %full_name, "creating node");
        self.by_name.insert(full_name.clone(), id);
        self.nodes.push(Node::new(id, full_name, context.clone(), make()));
        id
    }

    /// Returns the node registered under `full_name`, which must exist.
    pub fn get(&self, full_name: &Identifier) -> Result<NodeId> {
        self.lookup(full_name)
            .ok_or_else(|| GraphError::UnresolvedReference {
                identifier: full_name.clone(),
            })
    }

    pub fn lookup(&self, full_name: &Identifier) -> Option<NodeId> {
        self.by_name.get(full_name).copied()
    }

    /// Panics if `id` didn't come from this registry.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Adds an edge `from -> to` annotated with `annotations`.
    pub fn add_dependency(&mut self, from: NodeId, to: NodeId, annotations: Annotations) {
        tracing::trace!(
            from = %self.nodes[from.index()].full_name(),
            to = %self.nodes[to.index()].full_name(),
            "adding dependency"
        );
        self.nodes[from.index()].add_dependency(to, annotations);
    }

    /// Adds `member` to `group`: a plain, unannotated dependency.
    pub fn add_member(&mut self, group: NodeId, member: NodeId) {
        self.add_dependency(group, member, Annotations::new());
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The edges out of `node` with groups expanded, filtered by `query`.
    pub fn flattened_edges<'a>(&'a self, node: NodeId, query: &'a Annotations) -> FlatEdges<'a> {
        FlatEdges::new(self, node, query)
    }

    /// Input paths of the flattened dependencies of `node` matching `query`.
    pub fn input_paths(&self, node: NodeId, query: &Annotations) -> Result<Vec<String>> {
        self.flattened_edges(node, query)
            .map(|edge| {
                self.node(edge.target())
                    .input_artifact()
                    .map(FileHandle::path_string)
            })
            .collect()
    }

    /// The folder holding the root script.
    pub fn root(&self) -> &FileHandle {
        &self.root
    }

    /// The output folder.
    pub fn bindir(&self) -> &FileHandle {
        &self.bindir
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::platform::CommandRequest;

    #[derive(Debug)]
    pub(crate) struct EchoPlatform;

    impl Platform for EchoPlatform {
        fn name(&self) -> &str {
            "echo"
        }

        fn ensure_folder_command(&self, folder: &str) -> Vec<String> {
            vec![format!("mkdir -p {}", folder)]
        }

        fn compile_object(&self, request: &CommandRequest<'_>) -> Vec<String> {
            vec![format!("cc -c {} -o {}", request.inputs.join(" "), request.output)]
        }

        fn archive(&self, request: &CommandRequest<'_>) -> Vec<String> {
            vec![format!("ar rcs {} {}", request.output, request.inputs.join(" "))]
        }

        fn link_executable(&self, request: &CommandRequest<'_>) -> Vec<String> {
            vec![format!("cc -o {} {}", request.output, request.inputs.join(" "))]
        }
    }

    pub(crate) fn registry() -> Registry {
        Registry::new(FileHandle::at("src"), FileHandle::at("out"), EchoPlatform)
    }

    pub(crate) fn source(registry: &mut Registry, name: &str) -> NodeId {
        let root = Identifier::root();
        registry.get_or_create(root.append([name]), &root, || NodeKind::Source {
            file: FileHandle::at(format!("src/{}", name)),
        })
    }

    pub(crate) fn group(registry: &mut Registry, name: &str) -> NodeId {
        let root = Identifier::root();
        registry.get_or_create(root.append([name]), &root, || NodeKind::Group)
    }

    #[test]
    fn test_get_or_create_returns_same_node() {
        let mut registry = registry();
        let root = Identifier::root();
        let name = Identifier::of(["lib", "core"]);

        let first = registry.get_or_create(name.clone(), &root, || NodeKind::Group);
        let second = registry.get_or_create(name.clone(), &root, || NodeKind::Source {
            file: FileHandle::at("ignored.c"),
        });

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        // The second constructor never ran.
        assert!(registry.node(second).is_group());
    }

    #[test]
    fn test_get_or_create_skips_constructor_on_hit() {
        let mut registry = registry();
        let root = Identifier::root();
        let name = root.append(["g"]);
        registry.get_or_create(name.clone(), &root, || NodeKind::Group);

        let mut called = false;
        registry.get_or_create(name, &root, || {
            called = true;
            NodeKind::Group
        });
        assert!(!called);
    }

    #[test]
    fn test_get_unknown_fails() {
        let mut registry = registry();
        source(&mut registry, "a.c");

        let missing = Identifier::of(["nope"]);
        match registry.get(&missing) {
            Err(GraphError::UnresolvedReference { identifier }) => assert_eq!(identifier, missing),
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
        assert!(registry.get(&Identifier::of(["a.c"])).is_ok());
    }

    #[test]
    fn test_node_names() {
        let mut registry = registry();
        let context = Identifier::of(["lib"]);
        let id = registry.get_or_create(context.append(["core"]), &context, || NodeKind::Group);

        let node = registry.node(id);
        assert_eq!(node.name(), "core");
        assert_eq!(node.display_name(), "lib|core");
        assert_eq!(node.context(), &context);
        assert_eq!(node.id(), id);
    }

    #[test]
    fn test_input_artifact_of_group_fails() {
        let mut registry = registry();
        let g = group(&mut registry, "g");
        let a = source(&mut registry, "a.c");

        assert!(matches!(
            registry.node(g).input_artifact(),
            Err(GraphError::NotAnArtifact { .. })
        ));
        assert!(registry.node(g).output_artifact().is_none());
        assert_eq!(
            registry.node(a).input_artifact().unwrap().path_string(),
            "src/a.c"
        );
        assert!(registry.node(a).output_artifact().is_none());
    }

    #[test]
    fn test_input_paths_resolve_through_groups() {
        let mut registry = registry();
        let g = group(&mut registry, "g");
        let a = source(&mut registry, "a.c");
        let b = source(&mut registry, "b.c");
        let consumer = group(&mut registry, "consumer");
        registry.add_member(g, a);
        registry.add_member(g, b);
        registry.add_dependency(consumer, g, Annotations::new());

        let paths = registry.input_paths(consumer, &Annotations::new()).unwrap();
        assert_eq!(paths, vec!["src/a.c", "src/b.c"]);
    }

    #[test]
    fn test_nodes_in_creation_order() {
        let mut registry = registry();
        source(&mut registry, "z.c");
        source(&mut registry, "a.c");

        let names: Vec<_> = registry.nodes().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["z.c", "a.c"]);
    }
}
