//! End-to-end tests: script trees on disk in, Makefile and dot out.

use mkmk_build::ScriptContext;
use mkmk_common::{FileHandle, Identifier};
use mkmk_driver::{Driver, DriverConfig};
use mkmk_graph::{Annotations, NodeKind, Registry};
use mkmk_toolchain::{default_tools, Toolchain};
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Replaces the temp dir prefix so output can be compared literally.
fn normalize(text: &str, dir: &Path) -> String {
    text.replace(dir.to_str().unwrap(), "<root>")
}

fn project(dir: &Path) {
    write(
        dir,
        "mkmk.toml",
        r#"
[[step]]
op = "include"
path = "lib/mkmk.toml"

[[step]]
op = "c.sources"
paths = ["b.c", "a.c"]
group = "g"

[[step]]
op = "c.object"
name = "main"
sources = ["g"]
headers = ["//lib/api.h"]

[[step]]
op = "c.executable"
name = "app"
objects = ["main.o", "//lib/core.a"]
"#,
    );
    write(
        dir,
        "lib/mkmk.toml",
        r#"
[[step]]
op = "c.source"
path = "api.h"

[[step]]
op = "c.source"
path = "core.c"

[[step]]
op = "c.object"
name = "core"
sources = ["core.c"]
headers = ["api.h"]

[[step]]
op = "c.library"
name = "core"
objects = ["core.o"]
"#,
    );
}

#[test]
fn test_group_inputs_in_recipe() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "mkmk.toml",
        r#"
[[step]]
op = "c.source"
path = "b.c"

[[step]]
op = "c.source"
path = "a.c"

[[step]]
op = "group"
name = "g"
members = ["b.c", "a.c"]

[[step]]
op = "c.object"
name = "obj"
sources = ["g"]
"#,
    );

    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"));
    let registry = Driver::new(config).load().unwrap();
    let makefile = mkmk_emit::build_makefile(&registry).unwrap();

    let targets: Vec<_> = makefile.targets().collect();
    assert_eq!(targets.len(), 1);
    let target = targets[0];
    let root = dir.path();
    assert_eq!(
        target.inputs(),
        &[
            root.join("a.c").to_string_lossy().into_owned(),
            root.join("b.c").to_string_lossy().into_owned(),
        ]
    );
    let commands = target.commands();
    assert!(commands[0].starts_with("mkdir -p "));
    assert_eq!(commands.len(), 4);
    // One compile per source, then the parts are combined.
    assert!(commands[1].starts_with("gcc -c -o ") && commands[1].ends_with("b.c"));
    assert!(commands[2].starts_with("gcc -c -o ") && commands[2].ends_with("a.c"));
    assert!(commands[3].starts_with("ld -r -o "));
}

#[test]
fn test_external_lookups_share_one_node() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "mkmk.toml",
        r#"
[[step]]
op = "include"
path = "lib/mkmk.toml"

[[step]]
op = "include"
path = "app1/mkmk.toml"

[[step]]
op = "include"
path = "app2/mkmk.toml"
"#,
    );
    write(
        dir.path(),
        "lib/mkmk.toml",
        "[[step]]\nop = \"group\"\nname = \"core\"\n",
    );
    let consumer = "[[step]]\nop = \"group\"\nname = \"uses\"\nmembers = [\"//lib/core\"]\n";
    write(dir.path(), "app1/mkmk.toml", consumer);
    write(dir.path(), "app2/mkmk.toml", consumer);

    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"));
    let registry = Driver::new(config).load().unwrap();

    let core = registry.get(&Identifier::of(["lib", "core"])).unwrap();
    for app in ["app1", "app2"] {
        let uses = registry.get(&Identifier::of([app, "uses"])).unwrap();
        assert_eq!(registry.node(uses).direct_edges()[0].target(), core);
    }
}

#[test]
fn test_get_external_from_two_contexts() {
    let dir = TempDir::new().unwrap();
    let mut registry = Registry::new(
        FileHandle::at(dir.path()),
        FileHandle::at(dir.path().join("out")),
        Toolchain::named("gcc").unwrap(),
    );
    let tools = default_tools();
    let lib = Identifier::of(["lib"]);
    let made = registry.get_or_create(lib.append(["core"]), &lib, || NodeKind::Group);

    let first = ScriptContext::new(
        &mut registry,
        &tools,
        FileHandle::at(dir.path().join("a")),
        Identifier::of(["a"]),
    )
    .get_external(["lib", "core"])
    .unwrap();
    let second = ScriptContext::new(
        &mut registry,
        &tools,
        FileHandle::at(dir.path().join("b")),
        Identifier::of(["b"]),
    )
    .get_external(["lib", "core"])
    .unwrap();

    assert_eq!(first, made);
    assert_eq!(second, made);
}

#[test]
fn test_makefile_output() {
    let dir = TempDir::new().unwrap();
    project(dir.path());
    let makefile_path = dir.path().join("Makefile");

    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"))
        .makefile(&makefile_path);
    Driver::new(config).run().unwrap();

    let makefile = std::fs::read_to_string(&makefile_path).unwrap();
    insta::assert_snapshot!(normalize(&makefile, dir.path()), @r"
    <root>/out/app: <root>/out/lib/core.a <root>/out/main.o
    	mkdir -p <root>/out
    	gcc -o <root>/out/app <root>/out/main.o <root>/out/lib/core.a

    <root>/out/lib/core.a: <root>/out/lib/core.o
    	mkdir -p <root>/out/lib
    	ar rcs <root>/out/lib/core.a <root>/out/lib/core.o

    <root>/out/lib/core.o: <root>/lib/api.h <root>/lib/core.c
    	mkdir -p <root>/out/lib
    	gcc -c -o <root>/out/lib/core.o <root>/lib/core.c

    <root>/out/main.o: <root>/a.c <root>/b.c <root>/lib/api.h
    	mkdir -p <root>/out
    	gcc -c -o <root>/out/main.part0.o <root>/b.c
    	gcc -c -o <root>/out/main.part1.o <root>/a.c
    	ld -r -o <root>/out/main.o <root>/out/main.part0.o <root>/out/main.part1.o
    ");
}

#[test]
fn test_recipe_is_reproducible() {
    let dir = TempDir::new().unwrap();
    project(dir.path());
    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"));

    let first = mkmk_emit::render_makefile(&Driver::new(config.clone()).load().unwrap()).unwrap();
    let second = mkmk_emit::render_makefile(&Driver::new(config).load().unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_dot_output() {
    let dir = TempDir::new().unwrap();
    project(dir.path());
    let dot_path = dir.path().join("graph.dot");

    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"))
        .dot(&dot_path)
        .toolchain("clang");
    let registry = Driver::new(config).run().unwrap();

    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.starts_with("digraph G {\n  rankdir=LR;\n"));
    assert!(dot.contains("  lib_core_o [label=\"lib|core.o\"];\n"));
    assert!(dot.contains("    lib_core_o -> lib_api_h [label=\"header\"];\n"));
    // Direct edges: the group is shown, not its members.
    assert!(dot.contains("    main_o -> g;\n"));
    assert_eq!(dot.matches(" [label=").count(), registry.len() + 2);
}

#[test]
fn test_flattening_through_scripts() {
    let dir = TempDir::new().unwrap();
    project(dir.path());
    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"));
    let registry = Driver::new(config).load().unwrap();

    let main = registry.get(&Identifier::of(["main.o"])).unwrap();
    let headers = Annotations::new().with("header", true);
    let header_targets: Vec<_> = registry
        .flattened_edges(main, &headers)
        .map(|e| registry.node(e.target()).display_name())
        .collect();
    assert_eq!(header_targets, vec!["lib|api.h"]);
    assert_eq!(registry.flattened_edges(main, &Annotations::new()).count(), 3);
}

#[test]
fn test_load_order_violation() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "mkmk.toml",
        r#"
[[step]]
op = "c.object"
name = "main"
sources = ["//lib/core.c"]

[[step]]
op = "include"
path = "lib/mkmk.toml"
"#,
    );
    write(
        dir.path(),
        "lib/mkmk.toml",
        "[[step]]\nop = \"c.source\"\npath = \"core.c\"\n",
    );

    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"));
    let err = Driver::new(config).load().unwrap_err();
    assert!(err.to_string().contains("Unresolved reference"));
    assert!(err.to_string().contains("lib|core.c"));
}

#[test]
fn test_script_syntax_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "mkmk.toml", "[[step]\nop = \n");

    let config = DriverConfig::new(dir.path().join("mkmk.toml"), dir.path().join("out"));
    let err = Driver::new(config).load().unwrap_err();
    assert!(err.to_string().contains("Failed to parse build script"));
}
