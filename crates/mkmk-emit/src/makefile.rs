//! Build recipe output in Makefile syntax.

use crate::error::Result;
use mkmk_graph::{shell_escape, Annotations, Registry};
use std::collections::BTreeMap;
use std::io::Write;

/// One target: build `output` from `inputs` by running `commands` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakefileTarget {
    output: String,
    inputs: Vec<String>,
    commands: Vec<String>,
}

impl MakefileTarget {
    pub fn new(output: String, inputs: Vec<String>, commands: Vec<String>) -> Self {
        Self {
            output,
            inputs,
            commands,
        }
    }

    pub fn output_path(&self) -> &str {
        &self.output
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn write(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let inputs: Vec<String> = self.inputs.iter().map(|p| shell_escape(p)).collect();
        write!(
            out,
            "{}: {}\n\t{}\n\n",
            shell_escape(&self.output),
            inputs.join(" "),
            self.commands.join("\n\t")
        )
    }
}

/// The targets of a complete Makefile, kept sorted by output path.
///
/// This is only concerned with accumulating and printing targets; working out
/// what the targets are is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct Makefile {
    targets: BTreeMap<String, MakefileTarget>,
}

impl Makefile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target. A later target for the same output replaces the earlier.
    pub fn add_target(&mut self, output: String, inputs: Vec<String>, commands: Vec<String>) {
        let target = MakefileTarget::new(output.clone(), inputs, commands);
        self.targets.insert(output, target);
    }

    pub fn targets(&self) -> impl Iterator<Item = &MakefileTarget> + '_ {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn write(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for target in self.targets.values() {
            target.write(out)?;
        }
        Ok(())
    }
}

/// Builds the Makefile for every node in `registry` that produces a file.
pub fn build_makefile(registry: &Registry) -> Result<Makefile> {
    let platform = registry.platform();
    let all = Annotations::new();
    let mut makefile = Makefile::new();

    for node in registry.nodes() {
        let (Some(output), Some(action)) = (node.output_artifact(), node.action()) else {
            continue;
        };
        let mut inputs = registry.input_paths(node.id(), &all)?;
        inputs.sort();

        let output_path = output.path_string();
        let output_parent = output.parent().path_string();
        let mut commands = platform.ensure_folder_command(&output_parent);
        commands.extend(action.commands(platform, &output_path, node.id(), registry)?);

        tracing::trace!(output = %output_path, inputs = inputs.len(), "recipe entry");
        makefile.add_target(output_path, inputs, commands);
    }

    Ok(makefile)
}

/// Writes the recipe for `registry` to `out`.
pub fn write_makefile(registry: &Registry, out: &mut dyn Write) -> Result<()> {
    let makefile = build_makefile(registry)?;
    tracing::debug!(targets = makefile.len(), "writing makefile");
    makefile.write(out)?;
    Ok(())
}

/// [`write_makefile`] into a string.
pub fn render_makefile(registry: &Registry) -> Result<String> {
    let mut buf = Vec::new();
    write_makefile(registry, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
