//! Build script documents (`mkmk.toml` format).

use crate::error::{BuildError, Result};
use mkmk_graph::{AnnotationValue, Annotations};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// A parsed build script: an ordered list of steps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Steps, in the order they run.
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// One step. `op` selects the operation, everything else is its arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// `include`, `group`, `depend`, or `<tool>.<operation>`.
    pub op: String,

    /// The remaining keys of the step table.
    #[serde(flatten)]
    pub args: toml::Table,
}

impl Script {
    /// Load a script from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BuildError::ReadScript {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| BuildError::ParseScript {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a script from a TOML string.
    pub fn from_str(source: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Arguments of `include`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeArgs {
    /// `/`-separated path of the script, relative to the including one.
    pub path: String,
}

/// Arguments of `group`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupArgs {
    pub name: String,

    /// Node references added as members.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Arguments of `depend`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependArgs {
    /// The node that gets the new edges.
    pub node: String,

    /// Targets of the new edges.
    pub on: Vec<String>,

    /// Annotations put on every new edge.
    #[serde(default)]
    pub annotations: toml::Table,
}

/// Deserializes the arguments of `op` into `T`.
pub fn parse_args<T: DeserializeOwned>(op: &str, args: toml::Table) -> Result<T> {
    toml::Value::Table(args)
        .try_into()
        .map_err(|e| BuildError::invalid_step(op, e))
}

/// Converts a TOML table into edge annotations, keeping the order the keys
/// were written in. Only booleans and strings are allowed as values.
pub fn annotations_from_table(table: &toml::Table) -> Result<Annotations> {
    let mut annotations = Annotations::new();
    for (key, value) in table {
        let value = match value {
            toml::Value::Boolean(b) => AnnotationValue::Bool(*b),
            toml::Value::String(s) => AnnotationValue::from(s.as_str()),
            _ => return Err(BuildError::InvalidAnnotation { key: key.clone() }),
        };
        annotations.insert(key, value);
    }
    Ok(annotations)
}

/// Splits a `/`-separated reference into its non-empty segments.
pub(crate) fn split_segments(reference: &str) -> Vec<&str> {
    reference.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let toml = r#"
[[step]]
op = "include"
path = "lib/mkmk.toml"

[[step]]
op = "group"
name = "g"
members = ["a.c", "b.c"]

[[step]]
op = "c.object"
name = "main"
sources = ["g"]
        "#;

        let script = Script::from_str(toml).unwrap();
        let ops: Vec<_> = script.steps.iter().map(|s| s.op.as_str()).collect();
        assert_eq!(ops, vec!["include", "group", "c.object"]);

        // `op` itself is not part of the arguments.
        assert!(!script.steps[1].args.contains_key("op"));

        let group: GroupArgs = parse_args("group", script.steps[1].args.clone()).unwrap();
        assert_eq!(group.name, "g");
        assert_eq!(group.members, vec!["a.c", "b.c"]);
    }

    #[test]
    fn test_empty_script() {
        let script = Script::from_str("").unwrap();
        assert!(script.steps.is_empty());
    }

    #[test]
    fn test_invalid_args() {
        let script = Script::from_str("[[step]]\nop = \"include\"\nfile = \"x\"\n").unwrap();
        let result: Result<IncludeArgs> = parse_args("include", script.steps[0].args.clone());
        match result {
            Err(BuildError::InvalidStep { op, .. }) => assert_eq!(op, "include"),
            other => panic!("Expected InvalidStep, got {:?}", other),
        }
    }

    #[test]
    fn test_annotations_from_table() {
        let table: toml::Table = toml::from_str("header = true\nkind = \"src\"").unwrap();
        let annotations = annotations_from_table(&table).unwrap();
        assert_eq!(annotations.get("header"), Some(&AnnotationValue::Bool(true)));
        assert_eq!(annotations.get("kind"), Some(&AnnotationValue::from("src")));

        let bad: toml::Table = toml::from_str("level = 3").unwrap();
        assert!(matches!(
            annotations_from_table(&bad),
            Err(BuildError::InvalidAnnotation { .. })
        ));
    }

    #[test]
    fn test_annotations_keep_script_order() {
        let table: toml::Table = toml::from_str("z = true\na = \"x\"\nm = false").unwrap();
        let annotations = annotations_from_table(&table).unwrap();
        let keys: Vec<_> = annotations.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("lib/core"), vec!["lib", "core"]);
        assert_eq!(split_segments("//lib//core/"), vec!["lib", "core"]);
        assert!(split_segments("").is_empty());
    }
}
