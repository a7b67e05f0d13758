use super::*;
use rill_ir::build;

#[test]
fn unsupported_node_records_kind_and_span() {
    let node = build::unsupported("ClassDeclaration").with_span(Span::new(3, 9));
    let err = unsupported_node(&node);
    assert_eq!(
        err,
        CompileError::UnsupportedNodeKind {
            kind: "ClassDeclaration".to_string(),
            span: Some(Span::new(3, 9)),
        }
    );
    assert_eq!(err.to_string(), "unsupported node kind `ClassDeclaration`");
    assert_eq!(err.span(), Some(Span::new(3, 9)));
}

#[test]
fn unsupported_operator_message_names_kind() {
    let node = build::binary("instanceof", build::ident("a"), build::ident("b"));
    let err = unsupported_operator(&node, "instanceof");
    assert_eq!(
        err.to_string(),
        "unsupported operator `instanceof` in BinaryExpression"
    );
    assert_eq!(err.span(), None);
}

#[test]
fn eval_error_messages() {
    assert_eq!(unresolved_identifier("foo").to_string(), "`foo` is not defined");
    assert_eq!(
        not_callable("x").to_string(),
        "type error: x is not a function"
    );
    assert_eq!(
        cannot_read_property("a", &Value::Undefined).to_string(),
        "type error: cannot read property `a` of undefined"
    );
    assert_eq!(
        cannot_set_property("a", &Value::Number(1.0)).to_string(),
        "type error: cannot set property `a` on number"
    );
    assert_eq!(
        host_error("disk full").to_string(),
        "host function failed: disk full"
    );
}

#[test]
fn load_error_is_transparent() {
    let err = LoadError::from(CompileError::UnsupportedNodeKind {
        kind: "WithStatement".to_string(),
        span: None,
    });
    assert_eq!(err.to_string(), "unsupported node kind `WithStatement`");
}
