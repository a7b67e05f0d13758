//! `ScriptBuilder` for compiling scripts with non-default evaluation settings.

use rill_ir::Program;

use super::{compile_root, Script};
use crate::errors::CompileError;

/// Builder for `Script`.
///
/// ```ignore
/// let script = Script::builder().write_back(false).compile(&program)?;
/// ```
#[derive(Clone, Debug)]
pub struct ScriptBuilder {
    write_back: bool,
    globals: bool,
}

impl ScriptBuilder {
    /// Create a new builder: write-back on, globals on.
    pub fn new() -> Self {
        ScriptBuilder {
            write_back: true,
            globals: true,
        }
    }

    /// Copy the bindings a run defines at top level into its context.
    #[must_use]
    pub fn write_back(mut self, enabled: bool) -> Self {
        self.write_back = enabled;
        self
    }

    /// Predefine `undefined`, `NaN` and `Infinity` in the root frame.
    ///
    /// With this off, those names resolve only if the context binds them.
    #[must_use]
    pub fn globals(mut self, enabled: bool) -> Self {
        self.globals = enabled;
        self
    }

    /// Compile `program` with these settings.
    pub fn compile(self, program: &Program) -> Result<Script, CompileError> {
        Ok(Script {
            root: compile_root(program)?,
            write_back: self.write_back,
            globals: self.globals,
        })
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
