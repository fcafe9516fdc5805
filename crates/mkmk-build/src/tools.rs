use crate::context::ScriptContext;
use crate::error::Result;
use indexmap::IndexMap;

/// A namespace of operations contributed to build scripts, e.g. `c`.
///
/// A step `op = "c.object"` is handed to the module registered as `c` with
/// `op` set to `object`.
pub trait ToolModule {
    /// The namespace the module is exposed under.
    fn name(&self) -> &str;

    /// Runs `op` with `args` in `context`.
    fn evaluate(&self, context: &mut ScriptContext<'_>, op: &str, args: toml::Table) -> Result<()>;
}

/// The tool modules available to every script of a run.
#[derive(Default)]
pub struct ToolSet {
    modules: IndexMap<String, Box<dyn ToolModule>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module` under its name, replacing any earlier module with
    /// the same name.
    pub fn register(&mut self, module: impl ToolModule + 'static) {
        self.modules.insert(module.name().to_string(), Box::new(module));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, module: impl ToolModule + 'static) -> Self {
        self.register(module);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ToolModule> {
        self.modules.get(name).map(|m| m.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.modules.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
