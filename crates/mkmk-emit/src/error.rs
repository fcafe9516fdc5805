//! Error types for mkmk-emit.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for serializer operations.
pub type Result<T> = std::result::Result<T, EmitError>;

/// Errors that can occur while writing output documents.
#[derive(Error, Diagnostic, Debug)]
pub enum EmitError {
    /// Failed to write the document.
    #[error("Failed to write output: {0}")]
    #[diagnostic(code(mkmk::emit::io))]
    Io(#[from] std::io::Error),

    /// The graph couldn't be turned into a recipe.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] mkmk_graph::GraphError),
}
