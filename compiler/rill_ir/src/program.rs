//! Program root and ESTree JSON loading.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::Node;

/// Failure to load a syntax tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input is not valid JSON.
    #[error("invalid syntax tree: {0}")]
    Json(#[from] serde_json::Error),
    /// The root node is not a `Program`.
    #[error("expected a Program root node, found `{found}`")]
    NotAProgram { found: String },
    /// A node of a known kind is missing a field or has one of the wrong
    /// shape.
    #[error("malformed `{kind}` node: {message}")]
    Malformed { kind: String, message: String },
}

impl TreeError {
    #[cold]
    pub(crate) fn malformed(kind: &str, message: impl Into<String>) -> Self {
        TreeError::Malformed {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

/// The root of a parsed script: its top-level statements in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    /// Create a program from top-level statements.
    pub fn new(body: Vec<Node>) -> Self {
        Program { body }
    }

    /// Load a program from ESTree JSON text.
    ///
    /// Nesting depth is unbounded: every operator adds a level, so long
    /// expressions produce deep trees.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let raw = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Self::from_value(raw)
    }

    /// Load a program from an already-decoded ESTree JSON value.
    pub fn from_value(raw: Value) -> Result<Self, TreeError> {
        let Value::Object(mut fields) = raw else {
            return Err(TreeError::NotAProgram {
                found: "<untyped>".to_string(),
            });
        };
        match fields.get("type").and_then(Value::as_str) {
            Some("Program") => {}
            Some(other) => {
                return Err(TreeError::NotAProgram {
                    found: other.to_string(),
                })
            }
            None => {
                return Err(TreeError::NotAProgram {
                    found: "<untyped>".to_string(),
                })
            }
        }
        match fields.remove("body") {
            Some(Value::Array(body)) => Ok(Program {
                body: body
                    .into_iter()
                    .map(Node::from_estree)
                    .collect::<Result<_, _>>()?,
            }),
            _ => Err(TreeError::malformed("Program", "field `body` must be an array")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests {
    use super::*;
    use crate::NodeKind;
    use serde_json::json;

    #[test]
    fn loads_program_from_json_text() {
        let program = Program::from_json(
            r#"{"type":"Program","start":0,"end":2,"sourceType":"script","body":[
                {"type":"ExpressionStatement","start":0,"end":2,
                 "expression":{"type":"Literal","start":0,"end":1,"value":1,"raw":"1"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(program.body.len(), 1);
        assert_eq!(program.body[0].kind_name(), "ExpressionStatement");
    }

    #[test]
    fn rejects_non_program_root() {
        let err = Program::from_value(json!({ "type": "Identifier", "name": "x" })).unwrap_err();
        assert!(matches!(err, TreeError::NotAProgram { ref found } if found == "Identifier"));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            Program::from_json("{not json"),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn malformed_node_names_kind_and_field() {
        let err = Program::from_value(json!({
            "type": "Program",
            "body": [{ "type": "ExpressionStatement", "expression": { "type": "Identifier" } }]
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed `Identifier` node: field `name` must be a string"
        );
    }

    #[test]
    fn deeply_nested_json_loads() {
        // 1 + 1 + ... + 1, left-associative: one JSON level per operator.
        let one = r#"{"type":"Literal","value":1}"#;
        let expr = format!(
            "{}{one}{}",
            r#"{"type":"BinaryExpression","operator":"+","left":"#.repeat(5_000),
            format!(r#","right":{one}}}"#).repeat(5_000),
        );
        let json = format!(
            r#"{{"type":"Program","body":[{{"type":"ExpressionStatement","expression":{expr}}}]}}"#
        );
        let program = Program::from_json(&json).unwrap();

        let NodeKind::ExpressionStatement { expression } = &program.body[0].kind else {
            panic!("expected expression statement");
        };
        let mut depth = 0;
        let mut node = &**expression;
        while let NodeKind::BinaryExpression { left, .. } = &node.kind {
            depth += 1;
            node = left;
        }
        assert_eq!(depth, 5_000);
    }

    #[test]
    fn trailing_input_is_rejected() {
        assert!(matches!(
            Program::from_json(r#"{"type":"Program","body":[]} {}"#),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn unsupported_statements_survive_loading() {
        let program = Program::from_value(json!({
            "type": "Program",
            "body": [{ "type": "ClassDeclaration", "id": null, "body": { "type": "ClassBody", "body": [] } }]
        }))
        .unwrap();
        assert!(matches!(
            program.body[0].kind,
            NodeKind::Unsupported { ref kind } if kind == "ClassDeclaration"
        ));
    }
}
