//! Syntax tree nodes.
//!
//! The tree follows the ESTree layout produced by off-the-shelf parsers
//! (acorn, espree, esprima, the ESTree output of oxc and swc): every node is a
//! record whose `type` field is the discriminant. `NodeKind` is the closed set
//! of kinds the evaluator understands. Any other kind is still accepted by the
//! loader and lands in `NodeKind::Unsupported`, so the compiler can report it
//! by name instead of the loader failing on unfamiliar input.
//!
//! Operator fields stay as the symbol text. Mapping a symbol onto the
//! operator tables in `crate::operators` is the compiler's job, which is
//! where an unsupported operator is reported.

mod estree;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::Span;

/// A syntax tree node: its kind plus the source span, when the parser
/// recorded one.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Option<Span>,
}

impl Node {
    /// Create a node without a source span.
    pub fn new(kind: NodeKind) -> Self {
        Node { kind, span: None }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// The ESTree `type` of this node.
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Node::new(kind)
    }
}

/// Decodes one ESTree value, then converts it with `Node::from_estree`.
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Node::from_estree(raw).map_err(D::Error::custom)
    }
}

/// Node kinds understood by the evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Statements
    ExpressionStatement {
        expression: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    BreakStatement {
        label: Option<Box<Node>>,
    },
    ContinueStatement {
        label: Option<Box<Node>>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<SwitchCase>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    VariableDeclaration {
        declarations: Vec<VariableDeclarator>,
        kind: DeclarationKind,
    },
    FunctionDeclaration(Function),

    // Expressions
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
    },
    ThisExpression,
    ArrayExpression {
        elements: Vec<Option<Node>>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        computed: bool,
        kind: PropertyKind,
    },
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentPattern {
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },
    TemplateLiteral {
        quasis: Vec<TemplateElement>,
        expressions: Vec<Node>,
    },

    /// A kind the evaluator has no compiler for.
    Unsupported {
        kind: String,
    },
}

impl NodeKind {
    /// The ESTree `type` of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::ExpressionStatement { .. } => "ExpressionStatement",
            Self::BlockStatement { .. } => "BlockStatement",
            Self::EmptyStatement => "EmptyStatement",
            Self::DebuggerStatement => "DebuggerStatement",
            Self::ReturnStatement { .. } => "ReturnStatement",
            Self::BreakStatement { .. } => "BreakStatement",
            Self::ContinueStatement { .. } => "ContinueStatement",
            Self::IfStatement { .. } => "IfStatement",
            Self::SwitchStatement { .. } => "SwitchStatement",
            Self::WhileStatement { .. } => "WhileStatement",
            Self::ForStatement { .. } => "ForStatement",
            Self::ForInStatement { .. } => "ForInStatement",
            Self::VariableDeclaration { .. } => "VariableDeclaration",
            Self::FunctionDeclaration(_) => "FunctionDeclaration",
            Self::Identifier { .. } => "Identifier",
            Self::Literal { .. } => "Literal",
            Self::ThisExpression => "ThisExpression",
            Self::ArrayExpression { .. } => "ArrayExpression",
            Self::ObjectExpression { .. } => "ObjectExpression",
            Self::Property { .. } => "Property",
            Self::FunctionExpression(_) => "FunctionExpression",
            Self::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            Self::UnaryExpression { .. } => "UnaryExpression",
            Self::UpdateExpression { .. } => "UpdateExpression",
            Self::BinaryExpression { .. } => "BinaryExpression",
            Self::LogicalExpression { .. } => "LogicalExpression",
            Self::AssignmentExpression { .. } => "AssignmentExpression",
            Self::AssignmentPattern { .. } => "AssignmentPattern",
            Self::ConditionalExpression { .. } => "ConditionalExpression",
            Self::CallExpression { .. } => "CallExpression",
            Self::MemberExpression { .. } => "MemberExpression",
            Self::SequenceExpression { .. } => "SequenceExpression",
            Self::TemplateLiteral { .. } => "TemplateLiteral",
            Self::Unsupported { kind } => kind.as_str(),
        }
    }
}

/// Shared shape of function declarations, function expressions and arrows.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub id: Option<Identifier>,
    pub params: Vec<Node>,
    /// A `BlockStatement`, or any expression for an arrow with an
    /// expression body.
    pub body: Box<Node>,
    pub generator: bool,
    /// ESTree `async`.
    pub is_async: bool,
}

/// A bare identifier record (function names).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Identifier {
    pub name: String,
}

/// One `name = init` entry of a variable declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclarator {
    pub id: Box<Node>,
    pub init: Option<Box<Node>>,
}

/// A `case test:` or `default:` clause.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    /// `None` for the `default` clause.
    pub test: Option<Box<Node>>,
    pub consequent: Vec<Node>,
}

/// Literal text segment of a template literal.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TemplateElement {
    pub value: TemplateElementValue,
    #[serde(default)]
    pub tail: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TemplateElementValue {
    pub raw: String,
    /// `None` when the segment contains an invalid escape.
    pub cooked: Option<String>,
}

impl TemplateElement {
    /// The segment text with escapes interpreted, falling back to raw text.
    pub fn text(&self) -> &str {
        self.value.cooked.as_deref().unwrap_or(&self.value.raw)
    }
}

/// Value of a `Literal` node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Regular expression and other literal payloads the evaluator does not
    /// model.
    Other(serde_json::Value),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Init,
    Get,
    Set,
}
