//! Toolchains and the tool modules shipped with mkmk.
//!
//! - [`Toolchain`]: the [`Platform`](mkmk_graph::Platform) for gcc and clang
//! - [`CTools`]: the `c` namespace (sources, objects, libraries, executables)
//! - [`ShTools`]: the `sh` namespace (arbitrary commands)

mod c;
mod error;
mod platform;
mod sh;

pub use c::{ArchiveLibrary, CTools, CompileObject, LinkExecutable, HEADER};
pub use error::{Result, ToolchainError};
pub use platform::{Toolchain, ToolchainKind};
pub use sh::{RunCommand, ShTools};

use mkmk_build::ToolSet;

/// The tool modules available to build scripts by default.
pub fn default_tools() -> ToolSet {
    ToolSet::new().with(CTools).with(ShTools)
}
