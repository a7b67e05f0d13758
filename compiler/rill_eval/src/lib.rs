//! Rill Eval - closure-compiling evaluator for ESTree script trees.
//!
//! A script is compiled once into a tree of closures and can then be run any
//! number of times against a host `Context`.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `compile`: a single pass over the tree, one closure per node
//! - `Env`: chained binding frames with an explicit unknown (`None`)
//! - `Completion`: `return`/`break`/`continue` as values, not unwinding
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator dispatch
//! - `Script` / `ScriptBuilder`: compile-then-run with root-frame seeding and
//!   copy-back into the host context
//!
//! # Example
//!
//! ```ignore
//! let mut ctx = Context::new();
//! ctx.register_fn("add", |_, args| {
//!     Ok(Value::from(nth_arg(args, 0).to_number() + nth_arg(args, 1).to_number()))
//! });
//! let script = rill_eval::compile_json(&estree_json)?;
//! let value = script.evaluate(&mut ctx)?;
//! ```

mod compile;
mod context;
mod environment;
pub mod errors;
mod operators;
mod script;
mod shared;
mod signal;
mod tracing_setup;
mod unary_operators;
mod value;

#[cfg(test)]
mod tests;

pub use context::Context;
pub use environment::{Bindings, Env, Scope};
pub use errors::{CompileError, EvalError, EvalResult, LoadError};
pub use operators::{evaluate_binary, evaluate_logical, loose_equals, strict_equals};
pub use script::{Script, ScriptBuilder};
pub use shared::Shared;
pub use signal::{Completion, ControlSignal, ExecResult};
pub use rill_stack::ensure_sufficient_stack;
pub use tracing_setup::init_tracing;
pub use unary_operators::evaluate_unary;
pub use value::{nth_arg, FunctionValue, NativeFn, NativeFunction, ObjectMap, Value};

/// Load an ESTree `Program` from JSON and compile it.
pub fn compile_json(json: &str) -> Result<Script, LoadError> {
    let program = rill_ir::Program::from_json(json)?;
    Ok(Script::compile(&program)?)
}
