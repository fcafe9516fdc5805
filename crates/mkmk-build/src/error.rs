//! Error types for mkmk-build.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for script evaluation.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that can occur while evaluating build scripts.
#[derive(Error, Diagnostic, Debug)]
pub enum BuildError {
    /// Failed to read a script file.
    #[error("Failed to read build script {}: {source}", .path.display())]
    #[diagnostic(code(mkmk::build::read))]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse a script as TOML.
    #[error("Failed to parse build script {}: {source}", .path.display())]
    #[diagnostic(code(mkmk::build::parse))]
    ParseScript {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A script includes itself, directly or through other scripts.
    #[error("Include cycle: {} is already being loaded", .path.display())]
    #[diagnostic(
        code(mkmk::build::include_cycle),
        help("a script may include another only if that one doesn't include it back")
    )]
    IncludeCycle { path: PathBuf },

    /// A step names an operation nobody provides.
    #[error("Unknown operation '{op}'")]
    #[diagnostic(
        code(mkmk::build::unknown_op),
        help("core operations are include, group and depend; tool operations are written <tool>.<operation>")
    )]
    UnknownOperation { op: String },

    /// A step names a tool namespace that isn't registered.
    #[error("Unknown tool '{namespace}'")]
    #[diagnostic(code(mkmk::build::unknown_tool))]
    UnknownTool { namespace: String },

    /// A step's arguments don't fit its operation.
    #[error("Invalid arguments for '{op}': {message}")]
    #[diagnostic(code(mkmk::build::invalid_step))]
    InvalidStep { op: String, message: String },

    /// An annotation value that is neither a boolean nor a string.
    #[error("Annotation '{key}' must be a boolean or a string")]
    #[diagnostic(code(mkmk::build::invalid_annotation))]
    InvalidAnnotation { key: String },

    /// A graph error raised while running a step.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] mkmk_graph::GraphError),
}

impl BuildError {
    /// Create an invalid step error
    pub fn invalid_step(op: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidStep {
            op: op.into(),
            message: message.to_string(),
        }
    }
}
