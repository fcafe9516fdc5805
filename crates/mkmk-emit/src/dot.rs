//! Graphviz output of the graph as authored (groups not expanded).

use crate::error::Result;
use mkmk_graph::{AnnotationValue, Annotations, Registry};
use std::io::Write;

/// Replaces everything but letters, digits and `_` so the result is a valid
/// dot identifier.
fn dot_escape(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escapes a string for use inside a quoted dot label.
fn quote_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn annotation_to_string(key: &str, value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Bool(true) => dot_escape(key),
        AnnotationValue::Bool(false) => format!("!{}", dot_escape(key)),
        AnnotationValue::Str(s) => format!("{}: {}", dot_escape(key), dot_escape(s)),
    }
}

fn annotations_to_string(annotations: &Annotations) -> String {
    annotations
        .iter()
        .map(|(key, value)| annotation_to_string(key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the graph in `registry` to `out` in dot format.
pub fn write_dot_graph(registry: &Registry, out: &mut dyn Write) -> Result<()> {
    tracing::debug!(nodes = registry.len(), "writing dot graph");
    writeln!(out, "digraph G {{")?;
    writeln!(out, "  rankdir=LR;")?;
    for node in registry.nodes() {
        let escaped = dot_escape(&node.full_name().to_string());
        writeln!(
            out,
            "  {} [label=\"{}\"];",
            escaped,
            quote_escape(&node.display_name())
        )?;
        for edge in node.direct_edges() {
            let target = registry.node(edge.target());
            let escaped_target = dot_escape(&target.full_name().to_string());
            let annotations = edge.annotations();
            let label = if annotations.is_empty() {
                String::new()
            } else {
                format!(" [label=\"{}\"]", annotations_to_string(annotations))
            };
            writeln!(out, "    {} -> {}{};", escaped, escaped_target, label)?;
        }
    }
    writeln!(out, "}}")?;
    Ok(())
}

/// [`write_dot_graph`] into a string.
pub fn render_dot_graph(registry: &Registry) -> Result<String> {
    let mut buf = Vec::new();
    write_dot_graph(registry, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
