//! Function declarations, function expressions and arrow functions.
//!
//! Compiling a function produces a `FunctionTemplate` (parameters and body,
//! compiled once) and a creating closure. Each time the creating closure
//! runs it pairs the template with the current environment, yielding a
//! `FunctionValue`; a named function also binds its name in that
//! environment, so the body can call itself by name.

use std::rc::Rc;

use rill_ir::{Function, Node, NodeKind};

use super::{compile_expr, compile_statements, ExprFn, StmtFn};
use crate::errors::{unsupported_node, CompileError, EvalResult};
use crate::signal::{Completion, ControlSignal};
use crate::value::FunctionValue;
use crate::Value;

/// Name of the receiver binding in a call frame.
const THIS: &str = "this";

/// The compiled, environment-independent part of a function.
pub(crate) struct FunctionTemplate {
    pub(crate) name: Option<Rc<str>>,
    pub(crate) params: Vec<Param>,
    body: FunctionBody,
    /// Arrows do not bind `this`; it resolves lexically.
    is_arrow: bool,
}

/// A positional parameter, optionally with a default value expression.
pub(crate) struct Param {
    name: Rc<str>,
    default: Option<ExprFn>,
}

enum FunctionBody {
    Block(StmtFn),
    /// Arrow function with an expression body.
    Expression(ExprFn),
}

/// Compile a function node into its creating closure.
pub(crate) fn compile_function(
    node: &Node,
    function: &Function,
    is_arrow: bool,
) -> Result<ExprFn, CompileError> {
    if function.generator || function.is_async {
        return Err(unsupported_node(node));
    }
    let params = function
        .params
        .iter()
        .map(compile_param)
        .collect::<Result<Vec<_>, _>>()?;
    let body = match &function.body.kind {
        NodeKind::BlockStatement { body } => FunctionBody::Block(compile_statements(body)?),
        _ if is_arrow => FunctionBody::Expression(compile_expr(&function.body)?),
        _ => return Err(unsupported_node(&function.body)),
    };
    let name: Option<Rc<str>> = function.id.as_ref().map(|id| Rc::from(id.name.as_str()));
    let template = Rc::new(FunctionTemplate {
        name: name.clone(),
        params,
        body,
        is_arrow,
    });

    Ok(Box::new(move |env| {
        let function = Value::Function(FunctionValue::new(Rc::clone(&template), env.clone()));
        if let Some(name) = &name {
            env.define(Rc::clone(name), function.clone());
        }
        Ok(function)
    }))
}

/// `name` or `name = default`; destructuring and rest parameters are
/// unsupported.
fn compile_param(param: &Node) -> Result<Param, CompileError> {
    match &param.kind {
        NodeKind::Identifier { name } => Ok(Param {
            name: Rc::from(name.as_str()),
            default: None,
        }),
        NodeKind::AssignmentPattern { left, right } => match &left.kind {
            NodeKind::Identifier { name } => Ok(Param {
                name: Rc::from(name.as_str()),
                default: Some(compile_expr(right)?),
            }),
            _ => Err(unsupported_node(left)),
        },
        _ => Err(unsupported_node(param)),
    }
}

/// Call a script function.
///
/// The call gets one fresh child frame of the defining environment. Missing
/// arguments take their parameter's default (evaluated in the call frame)
/// or `undefined`; extra arguments are ignored. A `return` signal's payload
/// is the result, otherwise the value of the last statement executed.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(function = function.name().unwrap_or("<anonymous>"), argc = args.len())
)]
pub(crate) fn invoke(function: &FunctionValue, this: &Value, args: &[Value]) -> EvalResult {
    let closure = function.closure();
    let template = &closure.template;
    let frame = closure.env.enter();

    if !template.is_arrow {
        frame.define(Rc::from(THIS), this.clone());
    }
    for (index, param) in template.params.iter().enumerate() {
        let value = match (args.get(index), &param.default) {
            (Some(arg), _) => arg.clone(),
            (None, Some(default)) => default(&frame)?,
            (None, None) => Value::Undefined,
        };
        frame.define(Rc::clone(&param.name), value);
    }

    match &template.body {
        FunctionBody::Expression(body) => body(&frame),
        FunctionBody::Block(body) => match body(&frame)? {
            Completion::Normal(value) | Completion::Signal(ControlSignal::Return(value)) => {
                Ok(value)
            }
            Completion::Signal(signal) => {
                tracing::warn!(
                    ?signal,
                    function = function.name().unwrap_or("<anonymous>"),
                    "loop control signal reached a function boundary; call yields undefined"
                );
                Ok(Value::Undefined)
            }
        },
    }
}
