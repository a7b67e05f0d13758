//! Rill IR - syntax tree types for the rill evaluator.
//!
//! This crate contains the input side of the evaluator:
//! - `Node` / `NodeKind`: the ESTree-shaped syntax tree, a closed set of kinds
//!   plus an `Unsupported` catch-all
//! - `Program`: the root, loadable from ESTree JSON
//! - Operator tables (`BinaryOp`, `LogicalOp`, `UnaryOp`, `AssignOp`, `UpdateOp`)
//! - `build`: constructors for assembling trees in Rust
//!
//! Parsing source text is not done here. Any parser that emits ESTree JSON
//! (acorn, espree, esprima, ...) produces input this crate accepts unmodified.

pub mod build;
mod node;
mod operators;
mod program;
mod span;

pub use node::{
    DeclarationKind, Function, Identifier, LiteralValue, Node, NodeKind, PropertyKind, SwitchCase,
    TemplateElement, TemplateElementValue, VariableDeclarator,
};
pub use operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use program::{Program, TreeError};
pub use span::Span;
