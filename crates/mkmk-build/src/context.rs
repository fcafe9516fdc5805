//! Evaluation scope of a single build script.

use crate::error::{BuildError, Result};
use crate::script::{
    annotations_from_table, parse_args, split_segments, DependArgs, GroupArgs, IncludeArgs, Script,
    Step,
};
use crate::tools::ToolSet;
use mkmk_common::{FileHandle, Identifier};
use mkmk_graph::{Annotations, NodeId, NodeKind, Platform, Registry};
use std::path::{Path, PathBuf};

/// Prefix marking a reference as absolute (from the source root or the
/// identifier root) rather than relative to the current script.
const ABSOLUTE_PREFIX: &str = "//";

/// The context a build script runs in.
///
/// Each script gets its own context: `home` is the folder holding the
/// script and is what relative file references resolve against, and
/// `full_name` is the identifier prefix of every node the script creates.
/// All contexts of a run share one [`Registry`] and one [`ToolSet`].
pub struct ScriptContext<'a> {
    registry: &'a mut Registry,
    tools: &'a ToolSet,
    home: FileHandle,
    full_name: Identifier,
    /// Scripts currently being loaded, outermost first.
    loading: Vec<PathBuf>,
}

impl<'a> ScriptContext<'a> {
    pub fn new(
        registry: &'a mut Registry,
        tools: &'a ToolSet,
        home: FileHandle,
        full_name: Identifier,
    ) -> Self {
        Self {
            registry,
            tools,
            home,
            full_name,
            loading: Vec::new(),
        }
    }

    /// The context for the root script: its folder is the home and the
    /// identifier prefix is empty.
    pub fn for_root(registry: &'a mut Registry, tools: &'a ToolSet, root_script: &FileHandle) -> Self {
        Self::new(registry, tools, root_script.parent(), Identifier::root())
    }

    /// The identifier prefix of this script.
    pub fn full_name(&self) -> &Identifier {
        &self.full_name
    }

    /// The folder containing this script.
    pub fn home(&self) -> &FileHandle {
        &self.home
    }

    pub fn registry(&self) -> &Registry {
        &*self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut *self.registry
    }

    pub fn platform(&self) -> &dyn Platform {
        self.registry.platform()
    }

    /// The root of the source tree, i.e. the folder of the root script.
    pub fn root(&self) -> &FileHandle {
        self.registry.root()
    }

    /// The root of the build output folder.
    pub fn bindir(&self) -> &FileHandle {
        self.registry.bindir()
    }

    /// The file at `segments` under this script's folder.
    pub fn get_file<I, S>(&self, segments: I) -> FileHandle
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        self.home.child(segments)
    }

    /// Resolves a file reference: `//a/b` from the source root, absolute
    /// paths as they are, anything else from this script's folder.
    pub fn resolve_file(&self, reference: &str) -> FileHandle {
        if let Some(rest) = reference.strip_prefix(ABSOLUTE_PREFIX) {
            self.root().child(split_segments(rest))
        } else if Path::new(reference).is_absolute() {
            FileHandle::at(reference)
        } else {
            self.get_file(split_segments(reference))
        }
    }

    /// The group `name` in this context, created if it doesn't exist.
    pub fn get_group(&mut self, name: &str) -> NodeId {
        self.get_or_create_node(name, || NodeKind::Group)
    }

    /// A node defined elsewhere, by absolute identifier.
    ///
    /// The node must already exist: scripts have to be included in an order
    /// where nodes are created before they're needed. As a consequence there
    /// can be no cycles between scripts.
    pub fn get_external<I, S>(&self, segments: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.registry.get(&Identifier::of(segments))?)
    }

    /// The identifier a reference names: `//a/b` is `a|b`, and `x/y` in a
    /// context with prefix `p` is `p|x|y`.
    ///
    /// Nodes are created and looked up through this, so whatever string
    /// created a node also finds it again, as do the equivalent spellings
    /// from other contexts.
    pub fn node_identifier(&self, reference: &str) -> Identifier {
        match reference.strip_prefix(ABSOLUTE_PREFIX) {
            Some(rest) => Identifier::of(split_segments(rest)),
            None => self.full_name.append(split_segments(reference)),
        }
    }

    /// Resolves a node reference: `//a/b` through
    /// [`get_external`](Self::get_external), anything else as a node of this
    /// context. Either way the node must already exist.
    pub fn resolve_node(&self, reference: &str) -> Result<NodeId> {
        Ok(self.registry.get(&self.node_identifier(reference))?)
    }

    /// Resolves every reference in `references`.
    pub fn resolve_nodes(&self, references: &[String]) -> Result<Vec<NodeId>> {
        references.iter().map(|r| self.resolve_node(r)).collect()
    }

    /// The node `name` names (see [`node_identifier`](Self::node_identifier)).
    /// If there isn't one yet it is created from `make()`; otherwise `make`
    /// is ignored.
    pub fn get_or_create_node(&mut self, name: &str, make: impl FnOnce() -> NodeKind) -> NodeId {
        let node_name = self.node_identifier(name);
        self.registry.get_or_create(node_name, &self.full_name, make)
    }

    pub fn add_dependency(&mut self, from: NodeId, to: NodeId, annotations: Annotations) {
        self.registry.add_dependency(from, to, annotations);
    }

    /// A file in the output folder, `<bindir>/<prefix...>/<name>[.<ext>]`.
    pub fn outdir_file(&self, name: &str, ext: Option<&str>) -> FileHandle {
        let file_name = match ext {
            Some(ext) if !ext.is_empty() => format!("{}.{}", name, ext),
            _ => name.to_string(),
        };
        let full_out_name = self.full_name.append([file_name]);
        self.bindir().child(full_out_name.segments())
    }

    /// Loads the script at `path` (relative to this one) in a child context
    /// and runs it to completion before returning.
    ///
    /// The child's prefix is this prefix plus the folders of `path`, and its
    /// home is the folder holding the script.
    pub fn include(&mut self, path: &str) -> Result<()> {
        let segments = split_segments(path);
        let Some((_, folders)) = segments.split_last() else {
            return Err(BuildError::invalid_step("include", "empty script path"));
        };
        let script = self.get_file(&segments);
        let full_name = self.full_name.append(folders);
        let home = script.parent();

        tracing::debug!(script = %script.path().display(), prefix = %full_name, "including");
        let mut child = ScriptContext::new(&mut *self.registry, self.tools, home, full_name);
        child.loading = self.loading.clone();
        child.load(&script)
    }

    /// Reads, parses and runs `script` in this context.
    ///
    /// Fails with [`BuildError::IncludeCycle`] if `script` is already being
    /// loaded further up the include chain.
    pub fn load(&mut self, script: &FileHandle) -> Result<()> {
        tracing::debug!(script = %script.path().display(), "loading build script");
        // `a/../a/x.toml` and `a/x.toml` are the same script.
        let key = std::fs::canonicalize(script.path())
            .unwrap_or_else(|_| script.path().to_path_buf());
        if self.loading.contains(&key) {
            return Err(BuildError::IncludeCycle {
                path: script.path().to_path_buf(),
            });
        }

        let parsed = Script::from_file(script.path())?;
        self.loading.push(key);
        let result = self.evaluate(parsed);
        self.loading.pop();
        result
    }

    /// Runs the steps of `script` in order.
    pub fn evaluate(&mut self, script: Script) -> Result<()> {
        for step in script.steps {
            self.run_step(step)?;
        }
        Ok(())
    }

    fn run_step(&mut self, step: Step) -> Result<()> {
        tracing::trace!(op = %step.op, prefix = %self.full_name, "running step");
        match step.op.split_once('.') {
            Some((namespace, op)) => {
                let tools = self.tools;
                let module = tools.get(namespace).ok_or_else(|| BuildError::UnknownTool {
                    namespace: namespace.to_string(),
                })?;
                module.evaluate(self, op, step.args)
            }
            None => self.run_core_step(&step.op, step.args),
        }
    }

    fn run_core_step(&mut self, op: &str, args: toml::Table) -> Result<()> {
        match op {
            "include" => {
                let args: IncludeArgs = parse_args(op, args)?;
                self.include(&args.path)
            }
            "group" => {
                let args: GroupArgs = parse_args(op, args)?;
                let members = self.resolve_nodes(&args.members)?;
                let group = self.get_group(&args.name);
                for member in members {
                    self.registry.add_member(group, member);
                }
                Ok(())
            }
            "depend" => {
                let args: DependArgs = parse_args(op, args)?;
                let node = self.resolve_node(&args.node)?;
                let targets = self.resolve_nodes(&args.on)?;
                let annotations = annotations_from_table(&args.annotations)?;
                for target in targets {
                    self.add_dependency(node, target, annotations.clone());
                }
                Ok(())
            }
            _ => Err(BuildError::UnknownOperation { op: op.to_string() }),
        }
    }
}

impl std::fmt::Debug for ScriptContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("home", &self.home)
            .field("full_name", &self.full_name)
            .finish()
    }
}
