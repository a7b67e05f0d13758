//! Statement compilation: blocks, declarations, `if`, and the statements
//! that raise control signals. Loops and `switch` live in `control`.

use std::rc::Rc;

use rill_ir::{Node, NodeKind, VariableDeclarator};
use rill_stack::ensure_sufficient_stack;

use super::control::{compile_for, compile_for_in, compile_switch, compile_while};
use super::function::compile_function;
use super::{compile_expr, compile_opt_expr, StmtFn};
use crate::environment::Env;
use crate::errors::{unsupported_node, CompileError};
use crate::signal::{Completion, ControlSignal, ExecResult};
use crate::Value;

/// Compile a statement list (block or program body).
///
/// Statements run in order in the caller's frame. A signal stops the list
/// and propagates; otherwise the list's value is the last statement's value.
pub(crate) fn compile_statements(nodes: &[Node]) -> Result<StmtFn, CompileError> {
    let statements = nodes
        .iter()
        .map(compile_stmt)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(move |env| run_statements(&statements, env)))
}

fn run_statements(statements: &[StmtFn], env: &Env) -> ExecResult {
    let mut last = Value::Undefined;
    for statement in statements {
        match statement(env)? {
            Completion::Normal(value) => last = value,
            signal @ Completion::Signal(_) => return Ok(signal),
        }
    }
    Ok(Completion::Normal(last))
}

/// Compile one statement.
pub(crate) fn compile_stmt(node: &Node) -> Result<StmtFn, CompileError> {
    ensure_sufficient_stack(|| compile_stmt_kind(node))
}

fn compile_stmt_kind(node: &Node) -> Result<StmtFn, CompileError> {
    let compiled: StmtFn = match &node.kind {
        NodeKind::ExpressionStatement { expression } => {
            let expression = compile_expr(expression)?;
            Box::new(move |env| Ok(Completion::Normal(expression(env)?)))
        }
        NodeKind::BlockStatement { body } => compile_statements(body)?,
        NodeKind::EmptyStatement | NodeKind::DebuggerStatement => {
            Box::new(|_| Ok(Completion::undefined()))
        }

        NodeKind::ReturnStatement { argument } => {
            let argument = compile_opt_expr(argument.as_deref())?;
            Box::new(move |env| {
                let value = match &argument {
                    Some(argument) => argument(env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Signal(ControlSignal::Return(value)))
            })
        }
        NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label }
            if label.is_some() =>
        {
            return Err(unsupported_node(node));
        }
        NodeKind::BreakStatement { .. } => {
            Box::new(|_| Ok(Completion::Signal(ControlSignal::Break)))
        }
        NodeKind::ContinueStatement { .. } => {
            Box::new(|_| Ok(Completion::Signal(ControlSignal::Continue)))
        }

        NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        } => compile_if(test, consequent, alternate.as_deref())?,
        NodeKind::SwitchStatement {
            discriminant,
            cases,
        } => compile_switch(discriminant, cases)?,
        NodeKind::WhileStatement { test, body } => compile_while(test, body)?,
        NodeKind::ForStatement {
            init,
            test,
            update,
            body,
        } => compile_for(init.as_deref(), test.as_deref(), update.as_deref(), body)?,
        NodeKind::ForInStatement { left, right, body } => compile_for_in(left, right, body)?,

        NodeKind::VariableDeclaration { declarations, .. } => {
            compile_declarations(declarations)?
        }
        NodeKind::FunctionDeclaration(function) => {
            let create = compile_function(node, function, false)?;
            Box::new(move |env| Ok(Completion::Normal(create(env)?)))
        }

        NodeKind::Identifier { .. }
        | NodeKind::Literal { .. }
        | NodeKind::ThisExpression
        | NodeKind::ArrayExpression { .. }
        | NodeKind::ObjectExpression { .. }
        | NodeKind::Property { .. }
        | NodeKind::FunctionExpression(_)
        | NodeKind::ArrowFunctionExpression(_)
        | NodeKind::UnaryExpression { .. }
        | NodeKind::UpdateExpression { .. }
        | NodeKind::BinaryExpression { .. }
        | NodeKind::LogicalExpression { .. }
        | NodeKind::AssignmentExpression { .. }
        | NodeKind::AssignmentPattern { .. }
        | NodeKind::ConditionalExpression { .. }
        | NodeKind::CallExpression { .. }
        | NodeKind::MemberExpression { .. }
        | NodeKind::SequenceExpression { .. }
        | NodeKind::TemplateLiteral { .. }
        | NodeKind::Unsupported { .. } => return Err(unsupported_node(node)),
    };
    Ok(compiled)
}

/// `if`: whichever branch runs gets a fresh child frame.
fn compile_if(
    test: &Node,
    consequent: &Node,
    alternate: Option<&Node>,
) -> Result<StmtFn, CompileError> {
    let test = compile_expr(test)?;
    let consequent = compile_stmt(consequent)?;
    let alternate = alternate.map(compile_stmt).transpose()?;
    Ok(Box::new(move |env| {
        if test(env)?.truthy() {
            consequent(&env.enter())
        } else if let Some(alternate) = &alternate {
            alternate(&env.enter())
        } else {
            Ok(Completion::undefined())
        }
    }))
}

/// The bound name of a declarator. Destructuring patterns are unsupported.
pub(super) fn declarator_name(declarator: &VariableDeclarator) -> Result<Rc<str>, CompileError> {
    match &declarator.id.kind {
        NodeKind::Identifier { name } => Ok(Rc::from(name.as_str())),
        _ => Err(unsupported_node(&declarator.id)),
    }
}

/// `var`, `let` and `const` all define in the current frame.
fn compile_declarations(declarations: &[VariableDeclarator]) -> Result<StmtFn, CompileError> {
    let declarations = declarations
        .iter()
        .map(|declarator| {
            Ok((
                declarator_name(declarator)?,
                compile_opt_expr(declarator.init.as_deref())?,
            ))
        })
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok(Box::new(move |env| {
        for (name, init) in &declarations {
            let value = match init {
                Some(init) => init(env)?,
                None => Value::Undefined,
            };
            env.define(Rc::clone(name), value);
        }
        Ok(Completion::undefined())
    }))
}
