//! Evaluation test suites.
//!
//! Operator suites are relocated from their implementation files; the rest
//! compile small trees built with `rill_ir::build` and run them end to end.

#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

mod assign_tests;
mod function_tests;
mod unary_operators_tests;

use rill_ir::{build, Node};

use crate::{CompileError, Context, EvalResult, Script};

/// Compile and run `body` against `ctx`.
fn eval_in(ctx: &mut Context, body: Vec<Node>) -> EvalResult {
    Script::compile(&build::program(body)).unwrap().evaluate(ctx)
}

/// Compile and run `body` against an empty context.
fn eval(body: Vec<Node>) -> EvalResult {
    eval_in(&mut Context::new(), body)
}

/// Compile `body`, expecting failure.
fn compile_err(body: Vec<Node>) -> CompileError {
    Script::compile(&build::program(body)).unwrap_err()
}
