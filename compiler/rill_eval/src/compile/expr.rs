//! Expression compilation.

use std::rc::Rc;

use rill_ir::{BinaryOp, LiteralValue, LogicalOp, Node, NodeKind, PropertyKind, UnaryOp};
use rill_stack::ensure_sufficient_stack;

use super::assign::{compile_assignment, compile_update, DeferredUpdate, PendingUpdate};
use super::call::compile_call;
use super::function::compile_function;
use super::member::{compile_member_value, literal_key, Key};
use super::ExprFn;
use crate::environment::Env;
use crate::errors::{
    unresolved_identifier, unsupported_node, unsupported_operator, CompileError, EvalError,
};
use crate::operators::{evaluate_binary, evaluate_logical};
use crate::unary_operators::evaluate_unary;
use crate::Value;

/// Compile one expression.
pub(crate) fn compile_expr(node: &Node) -> Result<ExprFn, CompileError> {
    ensure_sufficient_stack(|| compile_expr_kind(node))
}

fn compile_expr_kind(node: &Node) -> Result<ExprFn, CompileError> {
    let compiled: ExprFn = match &node.kind {
        NodeKind::Identifier { name } => {
            let name: Rc<str> = Rc::from(name.as_str());
            Box::new(move |env| env.resolve(&name).ok_or_else(|| unresolved_identifier(&name)))
        }
        NodeKind::Literal { value } => {
            let value = match value {
                LiteralValue::Null => Value::Null,
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::String(s) => Value::string(s.as_str()),
                LiteralValue::Other(_) => return Err(unsupported_node(node)),
            };
            Box::new(move |_| Ok(value.clone()))
        }
        NodeKind::ThisExpression => Box::new(|env| Ok(env.resolve("this").unwrap_or_default())),

        NodeKind::ArrayExpression { elements } => compile_array(elements)?,
        NodeKind::ObjectExpression { properties } => compile_object(properties)?,
        NodeKind::TemplateLiteral {
            quasis,
            expressions,
        } => {
            let quasis: Vec<Rc<str>> = quasis.iter().map(|q| Rc::from(q.text())).collect();
            let expressions = compile_all(expressions)?;
            compile_template(quasis, expressions)
        }

        NodeKind::FunctionExpression(function) => compile_function(node, function, false)?,
        NodeKind::ArrowFunctionExpression(function) => compile_function(node, function, true)?,

        NodeKind::UnaryExpression { operator, argument } => {
            let op = UnaryOp::from_symbol(operator)
                .ok_or_else(|| unsupported_operator(node, operator))?;
            compile_unary(op, argument)?
        }
        NodeKind::UpdateExpression {
            operator,
            prefix,
            argument,
        } => compile_update(node, operator, *prefix, argument)?,
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
        } => {
            let op = BinaryOp::from_symbol(operator)
                .ok_or_else(|| unsupported_operator(node, operator))?;
            compile_binary(op, left, right)?
        }
        NodeKind::LogicalExpression {
            operator,
            left,
            right,
        } => {
            let op = LogicalOp::from_symbol(operator)
                .ok_or_else(|| unsupported_operator(node, operator))?;
            let left = compile_expr(left)?;
            let right = compile_expr(right)?;
            Box::new(move |env| {
                ensure_sufficient_stack(|| Ok(evaluate_logical(op, left(env)?, right(env)?)))
            })
        }
        NodeKind::AssignmentExpression {
            operator,
            left,
            right,
        } => compile_assignment(node, operator, left, right)?,

        NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            let test = compile_expr(test)?;
            let consequent = compile_expr(consequent)?;
            let alternate = compile_expr(alternate)?;
            Box::new(move |env| {
                if test(env)?.truthy() {
                    consequent(env)
                } else {
                    alternate(env)
                }
            })
        }
        NodeKind::SequenceExpression { expressions } => {
            let expressions = compile_all(expressions)?;
            Box::new(move |env| {
                let mut last = Value::Undefined;
                for expression in &expressions {
                    last = expression(env)?;
                }
                Ok(last)
            })
        }
        NodeKind::CallExpression { callee, arguments } => compile_call(callee, arguments)?,
        NodeKind::MemberExpression {
            object,
            property,
            computed,
        } => compile_member_value(object, property, *computed)?,

        NodeKind::ExpressionStatement { .. }
        | NodeKind::BlockStatement { .. }
        | NodeKind::EmptyStatement
        | NodeKind::DebuggerStatement
        | NodeKind::ReturnStatement { .. }
        | NodeKind::BreakStatement { .. }
        | NodeKind::ContinueStatement { .. }
        | NodeKind::IfStatement { .. }
        | NodeKind::SwitchStatement { .. }
        | NodeKind::WhileStatement { .. }
        | NodeKind::ForStatement { .. }
        | NodeKind::ForInStatement { .. }
        | NodeKind::VariableDeclaration { .. }
        | NodeKind::FunctionDeclaration(_)
        | NodeKind::Property { .. }
        | NodeKind::AssignmentPattern { .. }
        | NodeKind::Unsupported { .. } => return Err(unsupported_node(node)),
    };
    Ok(compiled)
}

fn compile_all(nodes: &[Node]) -> Result<Vec<ExprFn>, CompileError> {
    nodes.iter().map(compile_expr).collect()
}

fn compile_unary(op: UnaryOp, argument: &Node) -> Result<ExprFn, CompileError> {
    // `typeof name` on an unbound name is "undefined", not an error.
    if let (UnaryOp::TypeOf, NodeKind::Identifier { name }) = (op, &argument.kind) {
        let name: Rc<str> = Rc::from(name.as_str());
        return Ok(Box::new(move |env| {
            let value = env.resolve(&name).unwrap_or_default();
            Ok(evaluate_unary(op, &value))
        }));
    }
    let argument = compile_expr(argument)?;
    Ok(Box::new(move |env| Ok(evaluate_unary(op, &argument(env)?))))
}

/// One operand of a binary expression.
enum Operand {
    Plain(ExprFn),
    /// A postfix update whose write waits for the operator's result.
    Deferred(DeferredUpdate),
}

impl Operand {
    fn compile(node: &Node) -> Result<Self, CompileError> {
        Ok(match DeferredUpdate::compile(node)? {
            Some(update) => Operand::Deferred(update),
            None => Operand::Plain(compile_expr(node)?),
        })
    }

    fn eval(&self, env: &Env, pending: &mut Vec<PendingUpdate>) -> Result<Value, EvalError> {
        match self {
            Operand::Plain(expr) => expr(env),
            Operand::Deferred(update) => {
                let (value, write) = update.read(env)?;
                pending.push(write);
                Ok(value)
            }
        }
    }
}

/// Binary expressions. A direct operand that is a postfix update yields the
/// old value, and its write runs after the operator has produced its
/// result, in source order.
///
/// Operator chains nest one closure per operator, so evaluation checks the
/// stack at each level.
fn compile_binary(op: BinaryOp, left: &Node, right: &Node) -> Result<ExprFn, CompileError> {
    let left = Operand::compile(left)?;
    let right = Operand::compile(right)?;
    Ok(Box::new(move |env| {
        ensure_sufficient_stack(|| {
            let mut pending = Vec::new();
            let lhs = left.eval(env, &mut pending)?;
            let rhs = right.eval(env, &mut pending)?;
            let result = evaluate_binary(op, &lhs, &rhs)?;
            for write in pending {
                write.run()?;
            }
            Ok(result)
        })
    }))
}

fn compile_array(elements: &[Option<Node>]) -> Result<ExprFn, CompileError> {
    let elements = elements
        .iter()
        .map(|element| element.as_ref().map(compile_expr).transpose())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(move |env| {
        let values = elements
            .iter()
            .map(|element| match element {
                Some(element) => element(env),
                None => Ok(Value::Undefined),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(values))
    }))
}

/// Object literals. Keys come from identifiers, string or numeric literals,
/// or computed expressions; shorthand and method properties are ordinary
/// `init` properties in the tree. Accessors are rejected.
fn compile_object(properties: &[Node]) -> Result<ExprFn, CompileError> {
    let properties = properties
        .iter()
        .map(|property| match &property.kind {
            NodeKind::Property {
                key,
                value,
                computed,
                kind: PropertyKind::Init,
            } => {
                let key = if *computed {
                    Key::Computed(compile_expr(key)?)
                } else {
                    Key::Static(literal_key(key)?)
                };
                Ok((key, compile_expr(value)?))
            }
            _ => Err(unsupported_node(property)),
        })
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok(Box::new(move |env| {
        let object = Value::object();
        for (key, value) in &properties {
            let key = key.eval(env)?;
            let value = value(env)?;
            object.set_property(key, value)?;
        }
        Ok(object)
    }))
}

/// Template literals interleave text and values, text first.
fn compile_template(quasis: Vec<Rc<str>>, expressions: Vec<ExprFn>) -> ExprFn {
    Box::new(move |env| {
        let mut out = String::new();
        for (index, text) in quasis.iter().enumerate() {
            out.push_str(text);
            if let Some(expression) = expressions.get(index) {
                out.push_str(&expression(env)?.to_string());
            }
        }
        Ok(Value::string(out))
    })
}
