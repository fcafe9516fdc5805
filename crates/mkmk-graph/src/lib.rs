//! The build graph: nodes, annotated edges and the registry that owns them.
//!
//! Nodes are created through a [`Registry`], which guarantees that there is at
//! most one node per [`Identifier`](mkmk_common::Identifier). Nodes refer to
//! each other by [`NodeId`]; edges are owned by their source node and carry
//! [`Annotations`] that later consumers query to tell different kinds of
//! dependencies apart.
//!
//! # Example
//!
//! ```
//! use mkmk_common::{FileHandle, Identifier};
//! use mkmk_graph::{Annotations, NodeKind, Registry};
//! # use mkmk_graph::{CommandRequest, Platform};
//! # #[derive(Debug)]
//! # struct Sh;
//! # impl Platform for Sh {
//! #     fn name(&self) -> &str { "sh" }
//! #     fn ensure_folder_command(&self, f: &str) -> Vec<String> { vec![format!("mkdir -p {f}")] }
//! #     fn compile_object(&self, _: &CommandRequest<'_>) -> Vec<String> { vec![] }
//! #     fn archive(&self, _: &CommandRequest<'_>) -> Vec<String> { vec![] }
//! #     fn link_executable(&self, _: &CommandRequest<'_>) -> Vec<String> { vec![] }
//! # }
//!
//! let mut registry = Registry::new(FileHandle::at("src"), FileHandle::at("out"), Sh);
//! let root = Identifier::root();
//! let group = registry.get_or_create(root.append(["g"]), &root, || NodeKind::Group);
//! let file = registry.get_or_create(root.append(["a.c"]), &root, || NodeKind::Source {
//!     file: FileHandle::at("src/a.c"),
//! });
//! registry.add_member(group, file);
//!
//! let no_filter = Annotations::new();
//! let flat: Vec<_> = registry.flattened_edges(group, &no_filter).collect();
//! assert_eq!(flat.len(), 1);
//! ```

mod annotation;
mod edge;
mod error;
mod flatten;
mod node;
mod platform;
mod registry;

pub use annotation::{AnnotationValue, Annotations};
pub use edge::Edge;
pub use error::{GraphError, Result};
pub use flatten::FlatEdges;
pub use node::{Action, Node, NodeId, NodeKind};
pub use platform::{shell_escape, CommandRequest, Platform};
pub use registry::Registry;
