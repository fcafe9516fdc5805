use std::fmt;

/// Backslash-escapes whitespace and `:` so `s` stays one word when written
/// into a recipe, whether as a target, a prerequisite or a command argument.
pub fn shell_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_whitespace() || c == ':' {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Inputs for one toolchain command line.
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest<'a> {
    pub output: &'a str,
    pub inputs: &'a [String],
    pub includes: &'a [String],
    pub defines: &'a [String],
    pub flags: &'a [String],
    pub libs: &'a [String],
}

impl<'a> CommandRequest<'a> {
    pub fn new(output: &'a str, inputs: &'a [String]) -> Self {
        Self {
            output,
            inputs,
            includes: &[],
            defines: &[],
            flags: &[],
            libs: &[],
        }
    }
}

/// The platform/toolchain the generated recipe targets.
///
/// The graph itself only ever asks for [`ensure_folder_command`]; the
/// remaining operations are there for actions.
///
/// [`ensure_folder_command`]: Platform::ensure_folder_command
pub trait Platform: fmt::Debug {
    /// Selector name, e.g. `gcc`.
    fn name(&self) -> &str;

    /// Commands that create `folder` (and its parents) if it doesn't exist.
    fn ensure_folder_command(&self, folder: &str) -> Vec<String>;

    /// Compile `request.inputs` into the object file `request.output`.
    fn compile_object(&self, request: &CommandRequest<'_>) -> Vec<String>;

    /// Archive `request.inputs` into the static library `request.output`.
    fn archive(&self, request: &CommandRequest<'_>) -> Vec<String>;

    /// Link `request.inputs` into the executable `request.output`.
    fn link_executable(&self, request: &CommandRequest<'_>) -> Vec<String>;
}
