use miette::{miette, IntoDiagnostic, Result};
use mkmk_build::{ScriptContext, ToolSet};
use mkmk_common::FileHandle;
use mkmk_graph::Registry;
use mkmk_toolchain::{default_tools, Toolchain};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default name of the root build script.
pub const DEFAULT_SCRIPT: &str = "mkmk.toml";

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// The root build script.
    pub script: PathBuf,
    /// Output folder for build products.
    pub bindir: PathBuf,
    /// Where to write the dot graph, if anywhere.
    pub dot: Option<PathBuf>,
    /// Where to write the Makefile, if anywhere.
    pub makefile: Option<PathBuf>,
    /// Toolchain selector, `gcc` or `clang`.
    pub toolchain: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from(DEFAULT_SCRIPT),
            bindir: PathBuf::from("out"),
            dot: None,
            makefile: None,
            toolchain: "gcc".to_string(),
        }
    }
}

impl DriverConfig {
    pub fn new(script: impl Into<PathBuf>, bindir: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            bindir: bindir.into(),
            ..Self::default()
        }
    }

    pub fn dot(mut self, path: impl Into<PathBuf>) -> Self {
        self.dot = Some(path.into());
        self
    }

    pub fn makefile(mut self, path: impl Into<PathBuf>) -> Self {
        self.makefile = Some(path.into());
        self
    }

    pub fn toolchain(mut self, name: impl Into<String>) -> Self {
        self.toolchain = name.into();
        self
    }
}

/// Runs the pipeline: evaluate scripts into a graph, then write outputs.
pub struct Driver {
    config: DriverConfig,
    tools: ToolSet,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        Self::with_tools(config, default_tools())
    }

    /// A driver whose scripts see `tools` instead of the default modules.
    pub fn with_tools(config: DriverConfig, tools: ToolSet) -> Self {
        Self { config, tools }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Evaluate the root script (and everything it includes) into a fresh
    /// registry.
    pub fn load(&self) -> Result<Registry> {
        let toolchain = Toolchain::named(&self.config.toolchain)?;
        let script = FileHandle::at(&self.config.script);
        if !script.exists() {
            return Err(miette!(
                "Build script not found: {}",
                self.config.script.display()
            ));
        }

        let root = script.parent();
        let bindir = FileHandle::at(&self.config.bindir);
        tracing::info!(
            script = %script.path().display(),
            bindir = %bindir.path().display(),
            toolchain = %self.config.toolchain,
            "loading build graph"
        );

        let mut registry = Registry::new(root, bindir, toolchain);
        ScriptContext::for_root(&mut registry, &self.tools, &script).load(&script)?;
        tracing::info!(nodes = registry.len(), "build graph loaded");
        Ok(registry)
    }

    /// Load the graph and write whichever outputs were requested.
    pub fn run(&self) -> Result<Registry> {
        let registry = self.load()?;
        if let Some(path) = &self.config.dot {
            write_output(path, |out| Ok(mkmk_emit::write_dot_graph(&registry, out)?))?;
        }
        if let Some(path) = &self.config.makefile {
            write_output(path, |out| Ok(mkmk_emit::write_makefile(&registry, out)?))?;
        }
        Ok(registry)
    }
}

/// Creates `path` and hands a buffered writer for it to `write`.
fn write_output(path: &Path, write: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    tracing::debug!(path = %path.display(), "writing output");
    let file = File::create(path)
        .map_err(|e| miette!("Failed to create {}: {}", path.display(), e))?;
    let mut out = BufWriter::new(file);
    write(&mut out)?;
    out.flush().into_diagnostic()?;
    Ok(())
}
