//! Constructors for building syntax trees in Rust.
//!
//! Hosts that generate scripts programmatically (and the test suites) use
//! these instead of going through a parser and JSON. Nodes built here carry no
//! span.

use crate::{
    DeclarationKind, Function, Identifier, LiteralValue, Node, NodeKind, Program, PropertyKind,
    SwitchCase, TemplateElement, TemplateElementValue, VariableDeclarator,
};

pub fn program(body: Vec<Node>) -> Program {
    Program::new(body)
}

// Expressions

pub fn ident(name: &str) -> Node {
    NodeKind::Identifier {
        name: name.to_string(),
    }
    .into()
}

pub fn num(value: f64) -> Node {
    NodeKind::Literal {
        value: LiteralValue::Number(value),
    }
    .into()
}

pub fn string(value: &str) -> Node {
    NodeKind::Literal {
        value: LiteralValue::String(value.to_string()),
    }
    .into()
}

pub fn boolean(value: bool) -> Node {
    NodeKind::Literal {
        value: LiteralValue::Bool(value),
    }
    .into()
}

pub fn null() -> Node {
    NodeKind::Literal {
        value: LiteralValue::Null,
    }
    .into()
}

pub fn this() -> Node {
    NodeKind::ThisExpression.into()
}

pub fn binary(operator: &str, left: Node, right: Node) -> Node {
    NodeKind::BinaryExpression {
        operator: operator.to_string(),
        left: Box::new(left),
        right: Box::new(right),
    }
    .into()
}

pub fn logical(operator: &str, left: Node, right: Node) -> Node {
    NodeKind::LogicalExpression {
        operator: operator.to_string(),
        left: Box::new(left),
        right: Box::new(right),
    }
    .into()
}

pub fn unary(operator: &str, argument: Node) -> Node {
    NodeKind::UnaryExpression {
        operator: operator.to_string(),
        argument: Box::new(argument),
    }
    .into()
}

/// `++x` / `--x` when `prefix`, otherwise `x++` / `x--`.
pub fn update(operator: &str, prefix: bool, argument: Node) -> Node {
    NodeKind::UpdateExpression {
        operator: operator.to_string(),
        prefix,
        argument: Box::new(argument),
    }
    .into()
}

pub fn assign(operator: &str, target: Node, value: Node) -> Node {
    NodeKind::AssignmentExpression {
        operator: operator.to_string(),
        left: Box::new(target),
        right: Box::new(value),
    }
    .into()
}

/// Static member access: `object.name`.
pub fn member(object: Node, name: &str) -> Node {
    NodeKind::MemberExpression {
        object: Box::new(object),
        property: Box::new(ident(name)),
        computed: false,
    }
    .into()
}

/// Computed member access: `object[property]`.
pub fn index(object: Node, property: Node) -> Node {
    NodeKind::MemberExpression {
        object: Box::new(object),
        property: Box::new(property),
        computed: true,
    }
    .into()
}

pub fn call(callee: Node, arguments: Vec<Node>) -> Node {
    NodeKind::CallExpression {
        callee: Box::new(callee),
        arguments,
    }
    .into()
}

pub fn array(elements: Vec<Node>) -> Node {
    NodeKind::ArrayExpression {
        elements: elements.into_iter().map(Some).collect(),
    }
    .into()
}

pub fn object(properties: Vec<Node>) -> Node {
    NodeKind::ObjectExpression { properties }.into()
}

/// `key: value` with an identifier key.
pub fn prop(key: &str, value: Node) -> Node {
    NodeKind::Property {
        key: Box::new(ident(key)),
        value: Box::new(value),
        computed: false,
        kind: PropertyKind::Init,
    }
    .into()
}

/// `[key]: value`.
pub fn computed_prop(key: Node, value: Node) -> Node {
    NodeKind::Property {
        key: Box::new(key),
        value: Box::new(value),
        computed: true,
        kind: PropertyKind::Init,
    }
    .into()
}

pub fn conditional(test: Node, consequent: Node, alternate: Node) -> Node {
    NodeKind::ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    }
    .into()
}

pub fn sequence(expressions: Vec<Node>) -> Node {
    NodeKind::SequenceExpression { expressions }.into()
}

/// A template literal; `quasis` must have one more entry than `expressions`.
pub fn template(quasis: &[&str], expressions: Vec<Node>) -> Node {
    let last = quasis.len().saturating_sub(1);
    let quasis = quasis
        .iter()
        .enumerate()
        .map(|(i, text)| TemplateElement {
            value: TemplateElementValue {
                raw: (*text).to_string(),
                cooked: Some((*text).to_string()),
            },
            tail: i == last,
        })
        .collect();
    NodeKind::TemplateLiteral {
        quasis,
        expressions,
    }
    .into()
}

// Functions

fn function(name: Option<&str>, params: Vec<Node>, body: Node) -> Function {
    Function {
        id: name.map(|name| Identifier {
            name: name.to_string(),
        }),
        params,
        body: Box::new(body),
        generator: false,
        is_async: false,
    }
}

/// A plain parameter.
pub fn param(name: &str) -> Node {
    ident(name)
}

/// A parameter with a default value: `name = default`.
pub fn param_default(name: &str, default: Node) -> Node {
    NodeKind::AssignmentPattern {
        left: Box::new(ident(name)),
        right: Box::new(default),
    }
    .into()
}

pub fn function_decl(name: &str, params: Vec<Node>, body: Vec<Node>) -> Node {
    NodeKind::FunctionDeclaration(function(Some(name), params, block(body))).into()
}

pub fn function_expr(name: Option<&str>, params: Vec<Node>, body: Vec<Node>) -> Node {
    NodeKind::FunctionExpression(function(name, params, block(body))).into()
}

/// An arrow function; `body` is either a block or an expression.
pub fn arrow(params: Vec<Node>, body: Node) -> Node {
    NodeKind::ArrowFunctionExpression(function(None, params, body)).into()
}

// Statements

pub fn expr_stmt(expression: Node) -> Node {
    NodeKind::ExpressionStatement {
        expression: Box::new(expression),
    }
    .into()
}

pub fn block(body: Vec<Node>) -> Node {
    NodeKind::BlockStatement { body }.into()
}

pub fn empty() -> Node {
    NodeKind::EmptyStatement.into()
}

pub fn declare(kind: DeclarationKind, declarations: Vec<(&str, Option<Node>)>) -> Node {
    let declarations = declarations
        .into_iter()
        .map(|(name, init)| VariableDeclarator {
            id: Box::new(ident(name)),
            init: init.map(Box::new),
        })
        .collect();
    NodeKind::VariableDeclaration { declarations, kind }.into()
}

/// `let name = init;`
pub fn let_(name: &str, init: Node) -> Node {
    declare(DeclarationKind::Let, vec![(name, Some(init))])
}

pub fn if_(test: Node, consequent: Node, alternate: Option<Node>) -> Node {
    NodeKind::IfStatement {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    }
    .into()
}

pub fn while_(test: Node, body: Node) -> Node {
    NodeKind::WhileStatement {
        test: Box::new(test),
        body: Box::new(body),
    }
    .into()
}

pub fn for_(init: Option<Node>, test: Option<Node>, update: Option<Node>, body: Node) -> Node {
    NodeKind::ForStatement {
        init: init.map(Box::new),
        test: test.map(Box::new),
        update: update.map(Box::new),
        body: Box::new(body),
    }
    .into()
}

/// `for (let name in right) body`
pub fn for_in(name: &str, right: Node, body: Node) -> Node {
    NodeKind::ForInStatement {
        left: Box::new(declare(DeclarationKind::Let, vec![(name, None)])),
        right: Box::new(right),
        body: Box::new(body),
    }
    .into()
}

pub fn switch(discriminant: Node, cases: Vec<SwitchCase>) -> Node {
    NodeKind::SwitchStatement {
        discriminant: Box::new(discriminant),
        cases,
    }
    .into()
}

pub fn case(test: Node, consequent: Vec<Node>) -> SwitchCase {
    SwitchCase {
        test: Some(Box::new(test)),
        consequent,
    }
}

pub fn default_case(consequent: Vec<Node>) -> SwitchCase {
    SwitchCase {
        test: None,
        consequent,
    }
}

pub fn ret(argument: Option<Node>) -> Node {
    NodeKind::ReturnStatement {
        argument: argument.map(Box::new),
    }
    .into()
}

pub fn brk() -> Node {
    NodeKind::BreakStatement { label: None }.into()
}

pub fn cont() -> Node {
    NodeKind::ContinueStatement { label: None }.into()
}

/// A node of a kind the evaluator does not support.
pub fn unsupported(kind: &str) -> Node {
    Node::new(NodeKind::Unsupported {
        kind: kind.to_string(),
    })
}

