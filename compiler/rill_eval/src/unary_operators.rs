//! Unary operator implementations.

use rill_ir::UnaryOp;

use crate::Value;

/// Evaluate a unary operation. Unary operators never fail.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
        UnaryOp::Not => Value::Bool(!operand.truthy()),
        UnaryOp::BitNot => Value::from(!operand.to_int32()),
        UnaryOp::TypeOf => Value::string(operand.type_of()),
        UnaryOp::Void => Value::Undefined,
    }
}
