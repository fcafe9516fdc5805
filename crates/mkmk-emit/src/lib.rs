//! Serializers for a finished build graph.
//!
//! - [`write_makefile`]: the build recipe, one Makefile target per node that
//!   produces a file
//! - [`write_dot_graph`]: the graph as authored, in Graphviz dot syntax

mod dot;
mod error;
mod makefile;

pub use dot::{render_dot_graph, write_dot_graph};
pub use error::{EmitError, Result};
pub use makefile::{build_makefile, render_makefile, write_makefile, Makefile, MakefileTarget};
