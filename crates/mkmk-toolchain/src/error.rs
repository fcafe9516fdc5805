//! Error types for mkmk-toolchain.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for toolchain selection.
pub type Result<T> = std::result::Result<T, ToolchainError>;

#[derive(Error, Diagnostic, Debug)]
pub enum ToolchainError {
    /// No toolchain with this name.
    #[error("Unknown toolchain '{name}'")]
    #[diagnostic(code(mkmk::toolchain::unknown), help("supported toolchains: gcc, clang"))]
    UnknownToolchain { name: String },
}
