//! Tests for unary operator implementations.

use pretty_assertions::assert_eq;
use rill_ir::UnaryOp;

use crate::unary_operators::evaluate_unary;
use crate::Value;

#[test]
fn negation_and_plus() {
    assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::from(5)), Value::from(-5));
    assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::from("2")), Value::from(-2));
    assert_eq!(evaluate_unary(UnaryOp::Plus, &Value::from("42")), Value::from(42));
    assert_eq!(evaluate_unary(UnaryOp::Plus, &Value::Bool(true)), Value::from(1));
    assert_eq!(evaluate_unary(UnaryOp::Plus, &Value::Null), Value::from(0));
    assert!(evaluate_unary(UnaryOp::Plus, &Value::Undefined)
        .to_number()
        .is_nan());
}

#[test]
fn logical_not() {
    assert_eq!(evaluate_unary(UnaryOp::Not, &Value::from(0)), Value::Bool(true));
    assert_eq!(evaluate_unary(UnaryOp::Not, &Value::from("")), Value::Bool(true));
    assert_eq!(evaluate_unary(UnaryOp::Not, &Value::object()), Value::Bool(false));
    assert_eq!(evaluate_unary(UnaryOp::Not, &Value::array(vec![])), Value::Bool(false));
}

#[test]
fn bitwise_not() {
    assert_eq!(evaluate_unary(UnaryOp::BitNot, &Value::from(5)), Value::from(-6));
    assert_eq!(evaluate_unary(UnaryOp::BitNot, &Value::from(-1)), Value::from(0));
    assert_eq!(evaluate_unary(UnaryOp::BitNot, &Value::Undefined), Value::from(-1));
}

#[test]
fn type_of() {
    let cases = [
        (Value::Undefined, "undefined"),
        (Value::Null, "object"),
        (Value::Bool(false), "boolean"),
        (Value::from(1), "number"),
        (Value::from("s"), "string"),
        (Value::object(), "object"),
        (Value::array(vec![]), "object"),
        (Value::native("f", |_, _| Ok(Value::Undefined)), "function"),
    ];
    for (value, expected) in cases {
        assert_eq!(evaluate_unary(UnaryOp::TypeOf, &value), Value::from(expected));
    }
}

#[test]
fn void_discards() {
    assert_eq!(evaluate_unary(UnaryOp::Void, &Value::from(1)), Value::Undefined);
}
