//! The `sh` tool module: outputs produced by a hand-written command.

use mkmk_build::{parse_args, BuildError, Result, ScriptContext, ToolModule};
use mkmk_common::FileHandle;
use mkmk_graph::{Action, Annotations, NodeId, NodeKind, Platform, Registry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandArgs {
    name: String,
    /// Output file name, defaults to `name`.
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    inputs: Vec<String>,
    command: String,
}

/// Runs a command template. `{output}` expands to the output path and
/// `{inputs}` to the space-separated input paths.
#[derive(Debug, Clone)]
pub struct RunCommand {
    template: String,
}

impl RunCommand {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Action for RunCommand {
    fn commands(
        &self,
        _platform: &dyn Platform,
        output: &str,
        node: NodeId,
        graph: &Registry,
    ) -> mkmk_graph::Result<Vec<String>> {
        let inputs = graph.input_paths(node, &Annotations::new())?;
        let command = self
            .template
            .replace("{output}", output)
            .replace("{inputs}", &inputs.join(" "));
        Ok(vec![command])
    }
}

/// The `sh` namespace; its only operation is `command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShTools;

impl ToolModule for ShTools {
    fn name(&self) -> &str {
        "sh"
    }

    fn evaluate(&self, context: &mut ScriptContext<'_>, op: &str, args: toml::Table) -> Result<()> {
        if op != "command" {
            return Err(BuildError::UnknownOperation {
                op: format!("sh.{}", op),
            });
        }
        let args: CommandArgs = parse_args("sh.command", args)?;
        if args.command.trim().is_empty() {
            return Err(BuildError::invalid_step("sh.command", "empty command"));
        }

        let inputs = context.resolve_nodes(&args.inputs)?;
        let output: FileHandle = context.outdir_file(args.output.as_deref().unwrap_or(&args.name), None);
        let action = RunCommand::new(args.command);
        let node = context.get_or_create_node(&args.name, || NodeKind::Artifact {
            output,
            action: Box::new(action),
        });
        for input in inputs {
            context.add_dependency(node, input, Annotations::new());
        }
        Ok(())
    }
}
