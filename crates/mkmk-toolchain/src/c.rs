//! The `c` tool module: C sources, objects, static libraries and
//! executables.

use mkmk_build::{parse_args, BuildError, Result, ScriptContext, ToolModule};
use mkmk_common::FileHandle;
use mkmk_graph::{Action, Annotations, CommandRequest, NodeId, NodeKind, Platform, Registry};
use serde::Deserialize;

/// Annotation key marking an edge to a header. Headers are tracked as inputs
/// but never passed to the compiler.
pub const HEADER: &str = "header";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceArgs {
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourcesArgs {
    paths: Vec<String>,
    /// Group the new sources are added to.
    #[serde(default)]
    group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectArgs {
    name: String,
    sources: Vec<String>,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    defines: Vec<String>,
    #[serde(default)]
    flags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LibraryArgs {
    name: String,
    objects: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExecutableArgs {
    name: String,
    objects: Vec<String>,
    /// System libraries, passed as `-l<lib>`.
    #[serde(default)]
    libs: Vec<String>,
    #[serde(default)]
    flags: Vec<String>,
}

/// Input paths of `node`, skipping header edges if `skip_headers` is set.
fn inputs(graph: &Registry, node: NodeId, skip_headers: bool) -> mkmk_graph::Result<Vec<String>> {
    let all = Annotations::new();
    let header = Annotations::new().with(HEADER, true);
    graph
        .flattened_edges(node, &all)
        .filter(|edge| !(skip_headers && edge.matches(&header)))
        .map(|edge| {
            graph
                .node(edge.target())
                .input_artifact()
                .map(FileHandle::path_string)
        })
        .collect()
}

/// Compiles every non-header input into one object file.
#[derive(Debug, Clone, Default)]
pub struct CompileObject {
    pub includes: Vec<String>,
    pub defines: Vec<String>,
    pub flags: Vec<String>,
}

impl Action for CompileObject {
    fn commands(
        &self,
        platform: &dyn Platform,
        output: &str,
        node: NodeId,
        graph: &Registry,
    ) -> mkmk_graph::Result<Vec<String>> {
        let sources = inputs(graph, node, true)?;
        let request = CommandRequest {
            includes: &self.includes,
            defines: &self.defines,
            flags: &self.flags,
            ..CommandRequest::new(output, &sources)
        };
        Ok(platform.compile_object(&request))
    }
}

/// Archives all inputs into a static library.
#[derive(Debug, Clone, Default)]
pub struct ArchiveLibrary;

impl Action for ArchiveLibrary {
    fn commands(
        &self,
        platform: &dyn Platform,
        output: &str,
        node: NodeId,
        graph: &Registry,
    ) -> mkmk_graph::Result<Vec<String>> {
        let objects = inputs(graph, node, false)?;
        Ok(platform.archive(&CommandRequest::new(output, &objects)))
    }
}

/// Links all inputs into an executable.
#[derive(Debug, Clone, Default)]
pub struct LinkExecutable {
    pub libs: Vec<String>,
    pub flags: Vec<String>,
}

impl Action for LinkExecutable {
    fn commands(
        &self,
        platform: &dyn Platform,
        output: &str,
        node: NodeId,
        graph: &Registry,
    ) -> mkmk_graph::Result<Vec<String>> {
        let objects = inputs(graph, node, false)?;
        let request = CommandRequest {
            libs: &self.libs,
            flags: &self.flags,
            ..CommandRequest::new(output, &objects)
        };
        Ok(platform.link_executable(&request))
    }
}

/// The `c` namespace.
///
/// | op           | creates                                          |
/// |--------------|--------------------------------------------------|
/// | `source`     | a source node named by its path                  |
/// | `sources`    | several source nodes, optionally grouped         |
/// | `object`     | `<name>.o`, compiled from `sources`              |
/// | `library`    | `<name>.a`, archived from `objects`              |
/// | `executable` | `<name>`, linked from `objects`                  |
#[derive(Debug, Clone, Copy, Default)]
pub struct CTools;

impl CTools {
    fn source(context: &mut ScriptContext<'_>, path: &str) -> NodeId {
        let file = context.resolve_file(path);
        context.get_or_create_node(path, || NodeKind::Source { file })
    }

    fn object(context: &mut ScriptContext<'_>, args: ObjectArgs) -> Result<()> {
        let sources = context.resolve_nodes(&args.sources)?;
        let headers = context.resolve_nodes(&args.headers)?;
        let includes = args
            .includes
            .iter()
            .map(|dir| context.resolve_file(dir).path_string())
            .collect();
        let action = CompileObject {
            includes,
            defines: args.defines,
            flags: args.flags,
        };

        let output = context.outdir_file(&args.name, Some("o"));
        let node_name = output_name(&args.name, Some("o"));
        let object = context.get_or_create_node(&node_name, || NodeKind::Artifact {
            output,
            action: Box::new(action),
        });
        for source in sources {
            context.add_dependency(object, source, Annotations::new());
        }
        for header in headers {
            context.add_dependency(object, header, Annotations::new().with(HEADER, true));
        }
        Ok(())
    }

    fn linked(
        context: &mut ScriptContext<'_>,
        name: &str,
        ext: Option<&str>,
        objects: &[String],
        action: Box<dyn Action>,
    ) -> Result<()> {
        let objects = context.resolve_nodes(objects)?;
        let output = context.outdir_file(name, ext);
        let node_name = output_name(name, ext);
        let node = context.get_or_create_node(&node_name, || NodeKind::Artifact { output, action });
        for object in objects {
            context.add_dependency(node, object, Annotations::new());
        }
        Ok(())
    }
}

/// Nodes are named after the file they produce, `main.o` rather than `main`,
/// so an object and an executable of the same name don't collide.
fn output_name(name: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

impl ToolModule for CTools {
    fn name(&self) -> &str {
        "c"
    }

    fn evaluate(&self, context: &mut ScriptContext<'_>, op: &str, args: toml::Table) -> Result<()> {
        match op {
            "source" => {
                let args: SourceArgs = parse_args("c.source", args)?;
                Self::source(context, &args.path);
                Ok(())
            }
            "sources" => {
                let args: SourcesArgs = parse_args("c.sources", args)?;
                let group = args.group.as_deref().map(|name| context.get_group(name));
                for path in &args.paths {
                    let source = Self::source(context, path);
                    if let Some(group) = group {
                        context.registry_mut().add_member(group, source);
                    }
                }
                Ok(())
            }
            "object" => {
                let args: ObjectArgs = parse_args("c.object", args)?;
                Self::object(context, args)
            }
            "library" => {
                let args: LibraryArgs = parse_args("c.library", args)?;
                Self::linked(
                    context,
                    &args.name,
                    Some("a"),
                    &args.objects,
                    Box::new(ArchiveLibrary),
                )
            }
            "executable" => {
                let args: ExecutableArgs = parse_args("c.executable", args)?;
                let action = LinkExecutable {
                    libs: args.libs,
                    flags: args.flags,
                };
                Self::linked(context, &args.name, None, &args.objects, Box::new(action))
            }
            _ => Err(BuildError::UnknownOperation {
                op: format!("c.{}", op),
            }),
        }
    }
}
