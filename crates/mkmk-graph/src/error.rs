//! Error types for mkmk-graph.

use miette::Diagnostic;
use mkmk_common::Identifier;
use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by the graph model.
#[derive(Error, Diagnostic, Debug)]
pub enum GraphError {
    /// A lookup for a node that hasn't been created (yet).
    #[error("Unresolved reference: no node named '{identifier}'")]
    #[diagnostic(
        code(mkmk::graph::unresolved),
        help("nodes defined by another script must be loaded before they are referenced; include the defining script earlier")
    )]
    UnresolvedReference { identifier: Identifier },

    /// A node without a file was used where a concrete input is required.
    #[error("Node '{identifier}' has no artifact and can't be used as an input")]
    #[diagnostic(code(mkmk::graph::not_an_artifact))]
    NotAnArtifact { identifier: Identifier },

    /// An action couldn't produce its commands.
    #[error("Action for '{identifier}' failed: {message}")]
    #[diagnostic(code(mkmk::graph::action))]
    Action { identifier: Identifier, message: String },
}
