//! Assignment targets, assignment and update expressions.
//!
//! Every write goes through a `Place`: either a binding in a specific frame
//! or a property of a specific object. Identifier targets resolve to the
//! frame that currently binds the name, falling back to the current frame,
//! so assigning an undeclared name declares it where the assignment runs.

use std::rc::Rc;

use rill_ir::{AssignOp, Node, NodeKind, UpdateOp};

use super::member::compile_member_place;
use super::{compile_expr, ExprFn};
use crate::environment::Env;
use crate::errors::{
    unresolved_identifier, unsupported_node, unsupported_operator, CompileError, EvalError,
    EvalResult,
};
use crate::operators::evaluate_binary;
use crate::Value;

/// A resolved assignment target.
#[derive(Clone, Debug)]
pub(crate) enum Place {
    Binding { frame: Env, name: Rc<str> },
    Property { object: Value, key: Rc<str> },
}

impl Place {
    /// Resolve an identifier target in `env`.
    pub(crate) fn binding(env: &Env, name: &Rc<str>) -> Place {
        Place::Binding {
            frame: env.owner_of(name).unwrap_or_else(|| env.clone()),
            name: Rc::clone(name),
        }
    }

    pub(crate) fn read(&self) -> EvalResult {
        match self {
            Place::Binding { frame, name } => frame
                .resolve(name)
                .ok_or_else(|| unresolved_identifier(name)),
            Place::Property { object, key } => object.get_property(key),
        }
    }

    pub(crate) fn write(&self, value: Value) -> Result<(), EvalError> {
        match self {
            Place::Binding { frame, name } => {
                frame.define(Rc::clone(name), value);
                Ok(())
            }
            Place::Property { object, key } => object.set_property(Rc::clone(key), value),
        }
    }
}

/// A compiled assignment target: evaluates to a `Place`.
pub(crate) type PlaceFn = Box<dyn Fn(&Env) -> Result<Place, EvalError>>;

/// Compile an expression in address mode.
pub(crate) fn compile_place(node: &Node) -> Result<PlaceFn, CompileError> {
    match &node.kind {
        NodeKind::Identifier { name } => {
            let name: Rc<str> = Rc::from(name.as_str());
            Ok(Box::new(move |env| Ok(Place::binding(env, &name))))
        }
        NodeKind::MemberExpression {
            object,
            property,
            computed,
        } => compile_member_place(object, property, *computed),
        _ => Err(unsupported_node(node)),
    }
}

/// `target = value` and the compound forms `target op= value`.
///
/// The target is resolved first, a compound form then reads its current
/// value, and only then is the right-hand side evaluated. The expression
/// yields the value written.
pub(super) fn compile_assignment(
    node: &Node,
    operator: &str,
    target: &Node,
    value: &Node,
) -> Result<ExprFn, CompileError> {
    let op = AssignOp::from_symbol(operator).ok_or_else(|| unsupported_operator(node, operator))?;
    let place = compile_place(target)?;
    let value = compile_expr(value)?;
    let compiled: ExprFn = match op.binary() {
        None => Box::new(move |env| {
            let place = place(env)?;
            let value = value(env)?;
            place.write(value.clone())?;
            Ok(value)
        }),
        Some(binary) => Box::new(move |env| {
            let place = place(env)?;
            let current = place.read()?;
            let result = evaluate_binary(binary, &current, &value(env)?)?;
            place.write(result.clone())?;
            Ok(result)
        }),
    };
    Ok(compiled)
}

/// Apply an update to a place: returns `(old, new)` as numbers.
fn apply_update(place: &Place, op: UpdateOp) -> Result<(f64, f64), EvalError> {
    let old = place.read()?.to_number();
    let new = old + op.delta();
    place.write(Value::Number(new))?;
    Ok((old, new))
}

/// `++x`, `--x`, `x++`, `x--` outside a binary operand: the write happens
/// immediately. Prefix yields the new value, postfix the old one.
pub(super) fn compile_update(
    node: &Node,
    operator: &str,
    prefix: bool,
    argument: &Node,
) -> Result<ExprFn, CompileError> {
    let op = UpdateOp::from_symbol(operator).ok_or_else(|| unsupported_operator(node, operator))?;
    let place = compile_place(argument)?;
    Ok(Box::new(move |env| {
        let (old, new) = apply_update(&place(env)?, op)?;
        Ok(Value::Number(if prefix { new } else { old }))
    }))
}

/// A postfix update whose write is held back until its enclosing binary
/// operator has produced a result.
pub(super) struct DeferredUpdate {
    place: PlaceFn,
    op: UpdateOp,
}

impl DeferredUpdate {
    /// Compile `node` as a deferred update if it is a postfix update.
    pub(super) fn compile(node: &Node) -> Result<Option<Self>, CompileError> {
        let NodeKind::UpdateExpression {
            operator,
            prefix: false,
            argument,
        } = &node.kind
        else {
            return Ok(None);
        };
        let op =
            UpdateOp::from_symbol(operator).ok_or_else(|| unsupported_operator(node, operator))?;
        Ok(Some(DeferredUpdate {
            place: compile_place(argument)?,
            op,
        }))
    }

    /// Resolve the target and read its current value; the write is returned
    /// as a `PendingUpdate` for the caller to run later.
    pub(super) fn read(&self, env: &Env) -> Result<(Value, PendingUpdate), EvalError> {
        let place = (self.place)(env)?;
        let old = place.read()?.to_number();
        Ok((Value::Number(old), PendingUpdate { place, op: self.op }))
    }
}

/// The held-back write of a deferred postfix update.
pub(super) struct PendingUpdate {
    place: Place,
    op: UpdateOp,
}

impl PendingUpdate {
    /// Apply the update to the place's value at this moment.
    pub(super) fn run(self) -> Result<(), EvalError> {
        apply_update(&self.place, self.op).map(|_| ())
    }
}
