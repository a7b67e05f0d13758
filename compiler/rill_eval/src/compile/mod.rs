//! Compiler from syntax trees to closures.
//!
//! The tree is walked once. Each node becomes a closure that captures only
//! what that node needs at run time (names, keys, literal values, and the
//! closures of its children) and takes the environment to run in. Running a
//! script is then a call of the root closure with a fresh root frame.
//!
//! Expressions compile to `ExprFn` and produce a value. Statements compile to
//! `StmtFn` and produce a `Completion`, which is how `return`, `break` and
//! `continue` travel outward without unwinding.
//!
//! Dispatch is an exhaustive match on `NodeKind`. A kind that cannot appear
//! in the position being compiled, an `Unsupported` kind, or an operator
//! outside its table fails the whole compilation before anything runs.

mod assign;
mod call;
mod control;
mod expr;
pub(crate) mod function;
mod member;
mod stmt;

use rill_ir::Program;

use crate::environment::Env;
use crate::errors::{CompileError, EvalResult};
use crate::signal::ExecResult;

/// A compiled expression.
pub(crate) type ExprFn = Box<dyn Fn(&Env) -> EvalResult>;

/// A compiled statement.
pub(crate) type StmtFn = Box<dyn Fn(&Env) -> ExecResult>;

pub(crate) use expr::compile_expr;
pub(crate) use stmt::{compile_statements, compile_stmt};

/// Compile a whole program into its root closure.
pub(crate) fn compile_program(program: &Program) -> Result<StmtFn, CompileError> {
    compile_statements(&program.body)
}

/// Compile an optional child expression.
pub(crate) fn compile_opt_expr(
    node: Option<&rill_ir::Node>,
) -> Result<Option<ExprFn>, CompileError> {
    node.map(compile_expr).transpose()
}
