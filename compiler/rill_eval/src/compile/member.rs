//! Member access: `object.name` and `object[expr]`.
//!
//! The same node compiles in value mode (read the property) or address mode
//! (produce a `Place` to assign through or call on). The object is always
//! evaluated before a computed key.

use std::rc::Rc;

use rill_ir::{LiteralValue, Node, NodeKind};

use super::assign::{Place, PlaceFn};
use super::{compile_expr, ExprFn};
use crate::environment::Env;
use crate::errors::{unsupported_node, CompileError, EvalError};
use crate::value::format_number;

/// The key part of a member expression.
pub(super) enum Key {
    Static(Rc<str>),
    Computed(ExprFn),
}

impl Key {
    pub(super) fn compile(property: &Node, computed: bool) -> Result<Self, CompileError> {
        if computed {
            return Ok(Key::Computed(compile_expr(property)?));
        }
        match &property.kind {
            NodeKind::Identifier { name } => Ok(Key::Static(Rc::from(name.as_str()))),
            _ => Err(unsupported_node(property)),
        }
    }

    pub(super) fn eval(&self, env: &Env) -> Result<Rc<str>, EvalError> {
        match self {
            Key::Static(key) => Ok(Rc::clone(key)),
            Key::Computed(key) => Ok(key(env)?.to_property_key()),
        }
    }
}

/// Value mode: read `object[key]`.
pub(super) fn compile_member_value(
    object: &Node,
    property: &Node,
    computed: bool,
) -> Result<ExprFn, CompileError> {
    let object = compile_expr(object)?;
    let key = Key::compile(property, computed)?;
    Ok(Box::new(move |env| {
        let object = object(env)?;
        let key = key.eval(env)?;
        object.get_property(&key)
    }))
}

/// Address mode: resolve `object[key]` to a place without reading it.
pub(crate) fn compile_member_place(
    object: &Node,
    property: &Node,
    computed: bool,
) -> Result<PlaceFn, CompileError> {
    let object = compile_expr(object)?;
    let key = Key::compile(property, computed)?;
    Ok(Box::new(move |env| {
        let object = object(env)?;
        let key = key.eval(env)?;
        Ok(Place::Property { object, key })
    }))
}

/// The key of a non-computed object literal property: an identifier, a
/// string literal or a numeric literal.
pub(super) fn literal_key(key: &Node) -> Result<Rc<str>, CompileError> {
    match &key.kind {
        NodeKind::Identifier { name } => Ok(Rc::from(name.as_str())),
        NodeKind::Literal {
            value: LiteralValue::String(s),
        } => Ok(Rc::from(s.as_str())),
        NodeKind::Literal {
            value: LiteralValue::Number(n),
        } => Ok(Rc::from(format_number(*n))),
        _ => Err(unsupported_node(key)),
    }
}
