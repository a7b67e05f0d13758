//! Compiled scripts and the evaluation driver.
//!
//! `Script::compile` walks the tree once. `Script::evaluate` then:
//! 1. builds the host layer of a fresh root frame (the globals `undefined`,
//!    `NaN` and `Infinity`, overridden by the context's entries),
//! 2. runs the root closure in it,
//! 3. copies every binding the script defined at top level back into the
//!    context,
//! 4. empties the frames and values of the run that nothing outside holds
//!    any more, so closures stored in the frames they capture do not keep
//!    each other alive.
//!
//! A failed run leaves the context untouched.

mod builder;

pub use builder::ScriptBuilder;

use std::fmt;
use std::rc::Rc;

use rill_ir::Program;
use rill_stack::ensure_sufficient_stack;

use crate::compile::{compile_program, StmtFn};
use crate::context::Context;
use crate::environment::{reclaim, Bindings, Env};
use crate::errors::{CompileError, EvalResult};
use crate::signal::{Completion, ControlSignal};
use crate::Value;

/// A compiled program, ready to run any number of times.
pub struct Script {
    root: StmtFn,
    write_back: bool,
    globals: bool,
}

impl Script {
    /// Compile with the default configuration.
    pub fn compile(program: &Program) -> Result<Script, CompileError> {
        ScriptBuilder::new().compile(program)
    }

    pub fn builder() -> ScriptBuilder {
        ScriptBuilder::new()
    }

    /// Run the script against `ctx`.
    ///
    /// The value is that of the last top-level statement executed, or the
    /// payload of a top-level `return`.
    ///
    /// Frames and values of the run stay alive only while something outside
    /// the run holds them: the context (written-back bindings), the result,
    /// or a host closure. A host that keeps functions from every run keeps
    /// their frames too.
    pub fn evaluate(&self, ctx: &mut Context) -> EvalResult {
        tracing::debug!(bindings = ctx.len(), "evaluating script");
        let env = Env::new_root(self.host_layer(ctx));
        let outcome = ensure_sufficient_stack(|| (self.root)(&env));
        let mut released = env.prune_shadowed_host();

        let result = outcome.map(|completion| {
            let value = match completion {
                Completion::Normal(value) | Completion::Signal(ControlSignal::Return(value)) => {
                    value
                }
                Completion::Signal(signal) => {
                    tracing::warn!(
                        ?signal,
                        "loop control signal reached the program root; result is undefined"
                    );
                    Value::Undefined
                }
            };
            if self.write_back {
                let defined = env.root_bindings();
                tracing::debug!(count = defined.len(), "writing root bindings back");
                for (name, value) in defined {
                    released.extend(ctx.set(name, value));
                }
            }
            tracing::debug!(result = ?value, "script finished");
            value
        });

        reclaim(env, released);
        result
    }

    /// Run the script, logging a failure instead of returning it.
    ///
    /// A failed run yields `null`, which cannot be told apart from a script
    /// whose value is `null`; prefer `evaluate` where that matters.
    pub fn evaluate_or_log(&self, ctx: &mut Context) -> Value {
        match self.evaluate(ctx) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "script evaluation failed");
                Value::Null
            }
        }
    }

    fn host_layer(&self, ctx: &Context) -> Bindings {
        let mut host = Bindings::default();
        if self.globals {
            host.insert(Rc::from("undefined"), Value::Undefined);
            host.insert(Rc::from("NaN"), Value::Number(f64::NAN));
            host.insert(Rc::from("Infinity"), Value::Number(f64::INFINITY));
        }
        for (name, value) in ctx.bindings() {
            host.insert(Rc::clone(name), value.clone());
        }
        host
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("write_back", &self.write_back)
            .field("globals", &self.globals)
            .finish_non_exhaustive()
    }
}

fn compile_root(program: &Program) -> Result<StmtFn, CompileError> {
    let root = compile_program(program);
    match &root {
        Ok(_) => tracing::debug!(statements = program.body.len(), "compiled script"),
        Err(error) => tracing::debug!(%error, "script failed to compile"),
    }
    root
}
