//! Call expressions.
//!
//! A member callee is compiled in address mode so the object becomes the
//! receiver: `o.f(x)` calls `o.f` with `this = o`. Any other callee is
//! called with `this = undefined`. Arguments are evaluated left to right,
//! after the callee.

use rill_ir::{Node, NodeKind};
use rill_stack::ensure_sufficient_stack;

use super::member::Key;
use super::{compile_expr, ExprFn};
use crate::environment::Env;
use crate::errors::{not_callable, CompileError, EvalError};
use crate::Value;

pub(super) fn compile_call(callee: &Node, arguments: &[Node]) -> Result<ExprFn, CompileError> {
    let arguments = arguments
        .iter()
        .map(compile_expr)
        .collect::<Result<Vec<_>, _>>()?;
    let description = describe_callee(callee);

    if let NodeKind::MemberExpression {
        object,
        property,
        computed,
    } = &callee.kind
    {
        let object = compile_expr(object)?;
        let key = Key::compile(property, *computed)?;
        return Ok(Box::new(move |env| {
            let receiver = object(env)?;
            let key = key.eval(env)?;
            let function = receiver.get_property(&key)?;
            let args = eval_arguments(&arguments, env)?;
            invoke(&function, &receiver, &args, &description)
        }));
    }

    let callee = compile_expr(callee)?;
    Ok(Box::new(move |env| {
        let function = callee(env)?;
        let args = eval_arguments(&arguments, env)?;
        invoke(&function, &Value::Undefined, &args, &description)
    }))
}

/// Nested calls in argument position recurse here before reaching
/// `Value::call`, so this checks the stack too.
fn eval_arguments(arguments: &[ExprFn], env: &Env) -> Result<Vec<Value>, EvalError> {
    ensure_sufficient_stack(|| arguments.iter().map(|argument| argument(env)).collect())
}

fn invoke(
    function: &Value,
    this: &Value,
    args: &[Value],
    description: &str,
) -> Result<Value, EvalError> {
    if !function.is_callable() {
        return Err(not_callable(description));
    }
    function.call(this, args)
}

/// Source-like text of a callee for error messages (`a.b`, `f`, `o[...]`).
fn describe_callee(callee: &Node) -> String {
    match &callee.kind {
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::ThisExpression => "this".to_string(),
        NodeKind::MemberExpression {
            object,
            property,
            computed: false,
        } => match &property.kind {
            NodeKind::Identifier { name } => format!("{}.{name}", describe_callee(object)),
            _ => format!("{}[...]", describe_callee(object)),
        },
        NodeKind::MemberExpression { object, .. } => format!("{}[...]", describe_callee(object)),
        _ => "expression".to_string(),
    }
}
