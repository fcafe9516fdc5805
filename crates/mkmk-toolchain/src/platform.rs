//! Command lines for gcc-style toolchains.
//!
//! Nothing here runs a command; the strings end up in the generated
//! Makefile.

use crate::error::{Result, ToolchainError};
use mkmk_graph::{shell_escape, CommandRequest, Platform};

/// Which compiler family a [`Toolchain`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainKind {
    Gcc,
    Clang,
}

impl ToolchainKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gcc" => Some(ToolchainKind::Gcc),
            "clang" => Some(ToolchainKind::Clang),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolchainKind::Gcc => "gcc",
            ToolchainKind::Clang => "clang",
        }
    }
}

/// A gcc-compatible compiler plus archiver.
#[derive(Debug, Clone)]
pub struct Toolchain {
    kind: ToolchainKind,
    /// Compiler and linker driver.
    cc: String,
    /// Static archiver.
    ar: String,
    /// Combines partial objects into one relocatable object.
    ld: String,
}

impl Toolchain {
    pub fn new(kind: ToolchainKind) -> Self {
        Self {
            kind,
            cc: kind.name().to_string(),
            ar: "ar".to_string(),
            ld: "ld".to_string(),
        }
    }

    /// The toolchain selected by `name` (`gcc` or `clang`).
    pub fn named(name: &str) -> Result<Self> {
        ToolchainKind::from_name(name)
            .map(Self::new)
            .ok_or_else(|| ToolchainError::UnknownToolchain {
                name: name.to_string(),
            })
    }

    /// Use `cc` instead of the default compiler driver.
    pub fn compiler(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Use `ar` instead of the default archiver.
    pub fn archiver(mut self, ar: impl Into<String>) -> Self {
        self.ar = ar.into();
        self
    }

    /// Use `ld` instead of the default for combining partial objects.
    pub fn partial_linker(mut self, ld: impl Into<String>) -> Self {
        self.ld = ld.into();
        self
    }

    pub fn kind(&self) -> ToolchainKind {
        self.kind
    }
}

/// The object an input at `index` compiles to when an object has several
/// sources: `out/main.o` gets `out/main.part0.o`, `out/main.part1.o`, ...
fn partial_object(output: &str, index: usize) -> String {
    let stem = output.strip_suffix(".o").unwrap_or(output);
    format!("{}.part{}.o", stem, index)
}

impl Toolchain {
    fn compile_one(&self, request: &CommandRequest<'_>, output: &str, input: Option<&str>) -> String {
        let mut args = vec![
            self.cc.clone(),
            "-c".to_string(),
            "-o".to_string(),
            shell_escape(output),
        ];
        args.extend(request.flags.iter().cloned());
        args.extend(request.includes.iter().map(|dir| format!("-I{}", shell_escape(dir))));
        args.extend(request.defines.iter().map(|def| format!("-D{}", shell_escape(def))));
        args.extend(input.map(shell_escape));
        args.join(" ")
    }
}

impl Platform for Toolchain {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn ensure_folder_command(&self, folder: &str) -> Vec<String> {
        if folder.is_empty() {
            return Vec::new();
        }
        vec![format!("mkdir -p {}", shell_escape(folder))]
    }

    /// One source compiles straight to the output. Several sources are
    /// compiled one by one and then combined with `ld -r`, since `-c -o`
    /// takes a single input.
    fn compile_object(&self, request: &CommandRequest<'_>) -> Vec<String> {
        if request.inputs.len() <= 1 {
            let input = request.inputs.first().map(String::as_str);
            return vec![self.compile_one(request, request.output, input)];
        }

        let parts: Vec<String> = (0..request.inputs.len())
            .map(|i| partial_object(request.output, i))
            .collect();
        let mut commands: Vec<String> = request
            .inputs
            .iter()
            .zip(&parts)
            .map(|(input, part)| self.compile_one(request, part, Some(input)))
            .collect();

        let mut combine = vec![
            self.ld.clone(),
            "-r".to_string(),
            "-o".to_string(),
            shell_escape(request.output),
        ];
        combine.extend(parts.iter().map(|part| shell_escape(part)));
        commands.push(combine.join(" "));
        commands
    }

    fn archive(&self, request: &CommandRequest<'_>) -> Vec<String> {
        let mut args = vec![self.ar.clone(), "rcs".to_string(), shell_escape(request.output)];
        args.extend(request.inputs.iter().map(|input| shell_escape(input)));
        vec![args.join(" ")]
    }

    fn link_executable(&self, request: &CommandRequest<'_>) -> Vec<String> {
        let mut args = vec![self.cc.clone(), "-o".to_string(), shell_escape(request.output)];
        args.extend(request.flags.iter().cloned());
        args.extend(request.inputs.iter().map(|input| shell_escape(input)));
        args.extend(request.libs.iter().map(|lib| format!("-l{}", lib)));
        vec![args.join(" ")]
    }
}
