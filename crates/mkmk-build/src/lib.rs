//! Build script evaluation for mkmk.
//!
//! This crate provides:
//! - The build script format (`mkmk.toml`)
//! - [`ScriptContext`], the scope a script runs in
//! - [`ToolModule`], the hook for toolchain-specific operations
//!
//! # Example
//!
//! ```toml
//! # mkmk.toml
//! [[step]]
//! op = "include"
//! path = "lib/mkmk.toml"
//!
//! [[step]]
//! op = "c.sources"
//! paths = ["main.c", "util.c"]
//! group = "srcs"
//!
//! [[step]]
//! op = "c.object"
//! name = "main"
//! sources = ["srcs"]
//! headers = ["//lib/api"]
//! ```
//!
//! Steps run in order and an `include` finishes, including everything it
//! includes in turn, before the next step runs. A script can only refer to
//! another script's nodes once that script has been loaded.

mod context;
mod error;
mod script;
mod tools;

pub use context::ScriptContext;
pub use error::{BuildError, Result};
pub use script::{
    annotations_from_table, parse_args, DependArgs, GroupArgs, IncludeArgs, Script, Step,
};
pub use tools::{ToolModule, ToolSet};
