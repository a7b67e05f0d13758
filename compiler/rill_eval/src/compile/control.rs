//! Loops and `switch`.
//!
//! Each loop enters one child frame before its first iteration and runs
//! every iteration in it; `for` runs its initializer there too. The body's
//! completion is classified with `LoopAction`: `continue` and normal
//! completion go on to the next iteration, `break` leaves the loop, and
//! `return` leaves the loop and keeps propagating.

use std::rc::Rc;

use rill_ir::{Node, NodeKind, SwitchCase};

use super::assign::{compile_place, PlaceFn};
use super::stmt::declarator_name;
use super::{compile_expr, compile_opt_expr, compile_stmt, ExprFn, StmtFn};
use crate::environment::Env;
use crate::errors::{unsupported_node, CompileError, EvalError};
use crate::operators::strict_equals;
use crate::signal::{Completion, ControlSignal, LoopAction};
use crate::Value;

pub(super) fn compile_while(test: &Node, body: &Node) -> Result<StmtFn, CompileError> {
    let test = compile_expr(test)?;
    let body = compile_stmt(body)?;
    Ok(Box::new(move |env| {
        let frame = env.enter();
        while test(&frame)?.truthy() {
            match body(&frame)?.into_loop_action() {
                LoopAction::Next => {}
                action => return Ok(action.finish()),
            }
        }
        Ok(Completion::undefined())
    }))
}

pub(super) fn compile_for(
    init: Option<&Node>,
    test: Option<&Node>,
    update: Option<&Node>,
    body: &Node,
) -> Result<StmtFn, CompileError> {
    let init = init.map(compile_for_init).transpose()?;
    let test = compile_opt_expr(test)?;
    let update = compile_opt_expr(update)?;
    let body = compile_stmt(body)?;
    Ok(Box::new(move |env| {
        let frame = env.enter();
        if let Some(init) = &init {
            init(&frame)?;
        }
        loop {
            if let Some(test) = &test {
                if !test(&frame)?.truthy() {
                    break;
                }
            }
            match body(&frame)?.into_loop_action() {
                LoopAction::Next => {}
                action => return Ok(action.finish()),
            }
            if let Some(update) = &update {
                update(&frame)?;
            }
        }
        Ok(Completion::undefined())
    }))
}

/// A `for` initializer is either a declaration or a bare expression.
fn compile_for_init(init: &Node) -> Result<StmtFn, CompileError> {
    if let NodeKind::VariableDeclaration { .. } = init.kind {
        return compile_stmt(init);
    }
    let init = compile_expr(init)?;
    Ok(Box::new(move |env| Ok(Completion::Normal(init(env)?))))
}

/// Where `for (left in ...)` stores each key.
enum ForInTarget {
    /// `for (let k in ...)`: define in the loop frame.
    Declare(Rc<str>),
    /// `for (k in ...)` / `for (o.k in ...)`: assign like `=` would.
    Assign(PlaceFn),
}

impl ForInTarget {
    fn bind(&self, frame: &Env, key: Rc<str>) -> Result<(), EvalError> {
        match self {
            ForInTarget::Declare(name) => {
                frame.define(Rc::clone(name), Value::Str(key));
                Ok(())
            }
            ForInTarget::Assign(place) => place(frame)?.write(Value::Str(key)),
        }
    }
}

pub(super) fn compile_for_in(
    left: &Node,
    right: &Node,
    body: &Node,
) -> Result<StmtFn, CompileError> {
    let target = match &left.kind {
        NodeKind::VariableDeclaration { declarations, .. } => match declarations.as_slice() {
            [declarator] if declarator.init.is_none() => {
                ForInTarget::Declare(declarator_name(declarator)?)
            }
            _ => return Err(unsupported_node(left)),
        },
        _ => ForInTarget::Assign(compile_place(left)?),
    };
    let right = compile_expr(right)?;
    let body = compile_stmt(body)?;
    Ok(Box::new(move |env| {
        let object = right(env)?;
        let frame = env.enter();
        for key in object.enumerable_keys() {
            target.bind(&frame, key)?;
            match body(&frame)?.into_loop_action() {
                LoopAction::Next => {}
                action => return Ok(action.finish()),
            }
        }
        Ok(Completion::undefined())
    }))
}

/// One compiled `case`/`default` clause.
struct Clause {
    /// `None` for `default`, which matches wherever it sits.
    test: Option<ExprFn>,
    /// The clause's first statement; later statements are not run.
    body: Option<StmtFn>,
}

/// `switch`: the discriminant is evaluated once, then every clause is tested
/// in source order against it with `===`. Each matching clause runs its first
/// statement in a fresh child frame, and testing continues with the next
/// clause. `break` ends the switch; other signals propagate.
pub(super) fn compile_switch(
    discriminant: &Node,
    cases: &[SwitchCase],
) -> Result<StmtFn, CompileError> {
    let discriminant = compile_expr(discriminant)?;
    let clauses = cases
        .iter()
        .map(|case| {
            // Every statement must compile, even though only the first runs.
            let consequent = case
                .consequent
                .iter()
                .map(compile_stmt)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Clause {
                test: compile_opt_expr(case.test.as_deref())?,
                body: consequent.into_iter().next(),
            })
        })
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok(Box::new(move |env| {
        let value = discriminant(env)?;
        for clause in &clauses {
            let matched = match &clause.test {
                Some(test) => strict_equals(&value, &test(env)?),
                None => true,
            };
            if !matched {
                continue;
            }
            let Some(body) = &clause.body else {
                continue;
            };
            match body(&env.enter())? {
                Completion::Normal(_) => {}
                Completion::Signal(ControlSignal::Break) => break,
                signal @ Completion::Signal(_) => return Ok(signal),
            }
        }
        Ok(Completion::undefined())
    }))
}
