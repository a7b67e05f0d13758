//! Error types and centralized error constructors.
//!
//! Three failure channels:
//! - `CompileError`: the tree contains a node kind or operator the compiler
//!   does not support. Detected before anything runs.
//! - `EvalError`: a failure while running compiled closures.
//! - `LoadError`: loading ESTree JSON or compiling it, for the one-step entry
//!   point.
//!
//! Construct runtime errors through the factory functions below rather than
//! building variants inline, so messages stay uniform.

use rill_ir::{Node, Span, TreeError};
use thiserror::Error;

use crate::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// The tree cannot be compiled.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A node kind that is unknown, or known but not valid where it appears.
    #[error("unsupported node kind `{kind}`")]
    UnsupportedNodeKind { kind: String, span: Option<Span> },
    /// An operator symbol outside the fixed table of its node kind.
    #[error("unsupported operator `{operator}` in {kind}")]
    UnsupportedOperator {
        kind: String,
        operator: String,
        span: Option<Span>,
    },
}

impl CompileError {
    /// Source span of the offending node, when the tree carried positions.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::UnsupportedNodeKind { span, .. }
            | CompileError::UnsupportedOperator { span, .. } => *span,
        }
    }
}

/// A failure while running a compiled script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A name that no frame (and no host binding) defines.
    #[error("`{name}` is not defined")]
    UnresolvedIdentifier { name: String },
    /// An operation applied to a value that cannot support it.
    #[error("type error: {message}")]
    TypeError { message: String },
    /// A host function reported a failure.
    #[error("host function failed: {message}")]
    Host { message: String },
}

/// Failure of the one-step `compile_json` entry point.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

// Compile Errors

/// A node that cannot be compiled where it appears.
#[cold]
pub fn unsupported_node(node: &Node) -> CompileError {
    CompileError::UnsupportedNodeKind {
        kind: node.kind_name().to_string(),
        span: node.span,
    }
}

/// An operator symbol the node's operator table does not contain.
#[cold]
pub fn unsupported_operator(node: &Node, operator: &str) -> CompileError {
    CompileError::UnsupportedOperator {
        kind: node.kind_name().to_string(),
        operator: operator.to_string(),
        span: node.span,
    }
}

// Name Errors

/// Reading a name no frame binds.
#[cold]
pub fn unresolved_identifier(name: &str) -> EvalError {
    EvalError::UnresolvedIdentifier {
        name: name.to_string(),
    }
}

// Type Errors

/// Calling a value that is not a function.
#[cold]
pub fn not_callable(description: &str) -> EvalError {
    EvalError::TypeError {
        message: format!("{description} is not a function"),
    }
}

/// Reading a property of `null` or `undefined`.
#[cold]
pub fn cannot_read_property(key: &str, base: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!("cannot read property `{key}` of {base}"),
    }
}

/// Writing a property on a value that holds no properties.
#[cold]
pub fn cannot_set_property(key: &str, base: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!("cannot set property `{key}` on {}", base.type_of()),
    }
}

/// Assigning a non-integer or negative `length` to an array.
#[cold]
pub fn invalid_array_length(length: f64) -> EvalError {
    EvalError::TypeError {
        message: format!("invalid array length {length}"),
    }
}

/// An array write that would add more holes than one write may allocate.
#[cold]
pub fn array_growth_too_large(current: usize, requested: usize) -> EvalError {
    EvalError::TypeError {
        message: format!("cannot grow array from length {current} to {requested}"),
    }
}

/// Right-hand side of `in` that is not an object.
#[cold]
pub fn in_requires_object(right: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!("cannot use `in` to search in {}", right.type_of()),
    }
}

// Host Errors

/// A host function failure, carrying the host's message.
#[cold]
pub fn host_error(message: impl Into<String>) -> EvalError {
    EvalError::Host {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests;
