//! Conversion of decoded ESTree JSON into `Node` trees.
//!
//! Each record is taken apart by moving its fields out, so every JSON value
//! is visited once no matter how deep the tree is. Only leaf records
//! (identifiers, template text, literal values, declaration kinds) go through
//! serde.

use rill_stack::ensure_sufficient_stack;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Function, Node, NodeKind, SwitchCase, VariableDeclarator};
use crate::{Span, TreeError};

impl Node {
    /// Convert one decoded ESTree node.
    ///
    /// A record of an unknown `type` becomes `NodeKind::Unsupported`; its
    /// fields are not inspected. A known record with a missing or
    /// ill-typed field is a `TreeError::Malformed`.
    pub fn from_estree(value: Value) -> Result<Node, TreeError> {
        ensure_sufficient_stack(|| convert(value))
    }
}

fn convert(value: Value) -> Result<Node, TreeError> {
    let mut r = Record::open(value, None)?;
    let span = r.span;
    let kind = match r.kind.as_str() {
        // Statements
        "ExpressionStatement" => NodeKind::ExpressionStatement {
            expression: r.node("expression")?,
        },
        "BlockStatement" => NodeKind::BlockStatement {
            body: r.nodes("body")?,
        },
        "EmptyStatement" => NodeKind::EmptyStatement,
        "DebuggerStatement" => NodeKind::DebuggerStatement,
        "ReturnStatement" => NodeKind::ReturnStatement {
            argument: r.opt_node("argument")?,
        },
        "BreakStatement" => NodeKind::BreakStatement {
            label: r.opt_node("label")?,
        },
        "ContinueStatement" => NodeKind::ContinueStatement {
            label: r.opt_node("label")?,
        },
        "IfStatement" => NodeKind::IfStatement {
            test: r.node("test")?,
            consequent: r.node("consequent")?,
            alternate: r.opt_node("alternate")?,
        },
        "SwitchStatement" => NodeKind::SwitchStatement {
            discriminant: r.node("discriminant")?,
            cases: r.list("cases", switch_case)?,
        },
        "WhileStatement" => NodeKind::WhileStatement {
            test: r.node("test")?,
            body: r.node("body")?,
        },
        "ForStatement" => NodeKind::ForStatement {
            init: r.opt_node("init")?,
            test: r.opt_node("test")?,
            update: r.opt_node("update")?,
            body: r.node("body")?,
        },
        "ForInStatement" => NodeKind::ForInStatement {
            left: r.node("left")?,
            right: r.node("right")?,
            body: r.node("body")?,
        },
        "VariableDeclaration" => NodeKind::VariableDeclaration {
            declarations: r.list("declarations", declarator)?,
            kind: r.decode("kind")?,
        },
        "FunctionDeclaration" => NodeKind::FunctionDeclaration(function(&mut r)?),

        // Expressions
        "Identifier" => NodeKind::Identifier {
            name: r.string("name")?,
        },
        "Literal" => NodeKind::Literal {
            value: r.decode("value")?,
        },
        "ThisExpression" => NodeKind::ThisExpression,
        "ArrayExpression" => NodeKind::ArrayExpression {
            elements: r.list("elements", |element| match element {
                Value::Null => Ok(None),
                element => Node::from_estree(element).map(Some),
            })?,
        },
        "ObjectExpression" => NodeKind::ObjectExpression {
            properties: r.nodes("properties")?,
        },
        "Property" => NodeKind::Property {
            key: r.node("key")?,
            value: r.node("value")?,
            computed: r.flag("computed")?,
            kind: r.decode_or_default("kind")?,
        },
        "FunctionExpression" => NodeKind::FunctionExpression(function(&mut r)?),
        "ArrowFunctionExpression" => NodeKind::ArrowFunctionExpression(function(&mut r)?),
        "UnaryExpression" => NodeKind::UnaryExpression {
            operator: r.string("operator")?,
            argument: r.node("argument")?,
        },
        "UpdateExpression" => NodeKind::UpdateExpression {
            operator: r.string("operator")?,
            prefix: r.flag("prefix")?,
            argument: r.node("argument")?,
        },
        "BinaryExpression" => NodeKind::BinaryExpression {
            operator: r.string("operator")?,
            left: r.node("left")?,
            right: r.node("right")?,
        },
        "LogicalExpression" => NodeKind::LogicalExpression {
            operator: r.string("operator")?,
            left: r.node("left")?,
            right: r.node("right")?,
        },
        "AssignmentExpression" => NodeKind::AssignmentExpression {
            operator: r.string("operator")?,
            left: r.node("left")?,
            right: r.node("right")?,
        },
        "AssignmentPattern" => NodeKind::AssignmentPattern {
            left: r.node("left")?,
            right: r.node("right")?,
        },
        "ConditionalExpression" => NodeKind::ConditionalExpression {
            test: r.node("test")?,
            consequent: r.node("consequent")?,
            alternate: r.node("alternate")?,
        },
        "CallExpression" => NodeKind::CallExpression {
            callee: r.node("callee")?,
            arguments: r.nodes("arguments")?,
        },
        "MemberExpression" => NodeKind::MemberExpression {
            object: r.node("object")?,
            property: r.node("property")?,
            computed: r.flag("computed")?,
        },
        "SequenceExpression" => NodeKind::SequenceExpression {
            expressions: r.nodes("expressions")?,
        },
        "TemplateLiteral" => NodeKind::TemplateLiteral {
            quasis: r.list("quasis", |quasi| {
                serde_json::from_value(quasi)
                    .map_err(|e| TreeError::malformed("TemplateElement", e.to_string()))
            })?,
            expressions: r.nodes("expressions")?,
        },

        _ => NodeKind::Unsupported { kind: r.kind },
    };
    Ok(Node { kind, span })
}

fn function(r: &mut Record) -> Result<Function, TreeError> {
    Ok(Function {
        id: r.decode_or_default("id")?,
        params: r.nodes("params")?,
        body: r.node("body")?,
        generator: r.flag("generator")?,
        is_async: r.flag("async")?,
    })
}

fn declarator(value: Value) -> Result<VariableDeclarator, TreeError> {
    let mut r = Record::open(value, Some("VariableDeclarator"))?;
    Ok(VariableDeclarator {
        id: r.node("id")?,
        init: r.opt_node("init")?,
    })
}

fn switch_case(value: Value) -> Result<SwitchCase, TreeError> {
    let mut r = Record::open(value, Some("SwitchCase"))?;
    Ok(SwitchCase {
        test: r.opt_node("test")?,
        consequent: r.nodes("consequent")?,
    })
}

/// The fields of one ESTree record, consumed as they are read.
///
/// A missing field and an explicit `null` are the same thing.
struct Record {
    kind: String,
    span: Option<Span>,
    fields: Map<String, Value>,
}

impl Record {
    /// A record without a `type` takes `default_kind`, and is an error when
    /// there is none.
    fn open(value: Value, default_kind: Option<&str>) -> Result<Self, TreeError> {
        let what = default_kind.unwrap_or("<untyped>");
        let Value::Object(fields) = value else {
            return Err(TreeError::malformed(what, "expected a node object"));
        };
        let kind = match (fields.get("type"), default_kind) {
            (Some(Value::String(kind)), _) => kind.clone(),
            (_, Some(kind)) => kind.to_string(),
            (_, None) => return Err(TreeError::malformed(what, "missing field `type`")),
        };
        Ok(Record {
            kind,
            span: Span::from_estree(&fields),
            fields,
        })
    }

    fn take(&mut self, field: &str) -> Value {
        self.fields.remove(field).unwrap_or(Value::Null)
    }

    fn node(&mut self, field: &'static str) -> Result<Box<Node>, TreeError> {
        self.opt_node(field)?
            .ok_or_else(|| self.malformed(field, "is missing"))
    }

    fn opt_node(&mut self, field: &str) -> Result<Option<Box<Node>>, TreeError> {
        match self.take(field) {
            Value::Null => Ok(None),
            value => Node::from_estree(value).map(|node| Some(Box::new(node))),
        }
    }

    fn nodes(&mut self, field: &'static str) -> Result<Vec<Node>, TreeError> {
        self.list(field, Node::from_estree)
    }

    fn list<T>(
        &mut self,
        field: &'static str,
        item: impl FnMut(Value) -> Result<T, TreeError>,
    ) -> Result<Vec<T>, TreeError> {
        match self.take(field) {
            Value::Array(items) => items.into_iter().map(item).collect(),
            _ => Err(self.malformed(field, "must be an array")),
        }
    }

    fn string(&mut self, field: &'static str) -> Result<String, TreeError> {
        match self.take(field) {
            Value::String(s) => Ok(s),
            _ => Err(self.malformed(field, "must be a string")),
        }
    }

    /// Boolean flags default to `false` when absent.
    fn flag(&mut self, field: &'static str) -> Result<bool, TreeError> {
        match self.take(field) {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            _ => Err(self.malformed(field, "must be a boolean")),
        }
    }

    fn decode<T: DeserializeOwned>(&mut self, field: &'static str) -> Result<T, TreeError> {
        serde_json::from_value(self.take(field))
            .map_err(|e| self.malformed(field, &e.to_string()))
    }

    fn decode_or_default<T: DeserializeOwned + Default>(
        &mut self,
        field: &'static str,
    ) -> Result<T, TreeError> {
        match self.take(field) {
            Value::Null => Ok(T::default()),
            value => {
                serde_json::from_value(value).map_err(|e| self.malformed(field, &e.to_string()))
            }
        }
    }

    #[cold]
    fn malformed(&self, field: &str, problem: &str) -> TreeError {
        TreeError::malformed(&self.kind, format!("field `{field}` {problem}"))
    }
}
