//! Binary and logical operator implementations.
//!
//! Operators dispatch on the fixed operator enums from `rill_ir` with plain
//! `match`es. Operand coercions follow the script language: `+` concatenates
//! when either primitive operand is a string, relational operators compare
//! strings lexicographically and everything else numerically, and the
//! bitwise family works on 32-bit integers.

use std::cmp::Ordering;

use rill_ir::{BinaryOp, LogicalOp};

use crate::errors::EvalResult;
use crate::Value;

/// Evaluate a binary operation.
///
/// Only `in` can fail (its right operand must hold properties).
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        // `%` on f64 truncates toward zero and keeps the dividend's sign.
        BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Pow => Value::Number(power(left.to_number(), right.to_number())),

        BinaryOp::LooseEq => Value::Bool(loose_equals(left, right)),
        BinaryOp::LooseNotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),

        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),

        BinaryOp::BitAnd => Value::from(left.to_int32() & right.to_int32()),
        BinaryOp::BitOr => Value::from(left.to_int32() | right.to_int32()),
        BinaryOp::BitXor => Value::from(left.to_int32() ^ right.to_int32()),
        BinaryOp::Shl => Value::from(left.to_int32().wrapping_shl(shift_count(right))),
        BinaryOp::Shr => Value::from(left.to_int32().wrapping_shr(shift_count(right))),
        BinaryOp::UShr => Value::Number(f64::from(
            left.to_uint32().wrapping_shr(shift_count(right)),
        )),

        BinaryOp::In => Value::Bool(right.has_property(&left.to_property_key())?),
    };
    Ok(value)
}

/// Evaluate a logical operation on two already-evaluated operands.
///
/// Both operands are always evaluated by the caller; the result is the
/// selected operand itself, not a boolean.
pub fn evaluate_logical(op: LogicalOp, left: Value, right: Value) -> Value {
    let take_left = match op {
        LogicalOp::And => !left.truthy(),
        LogicalOp::Or => left.truthy(),
        LogicalOp::Coalesce => !left.is_nullish(),
    };
    if take_left {
        left
    } else {
        right
    }
}

fn add(left: &Value, right: &Value) -> Value {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        Value::string(format!("{left}{right}"))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Exponentiation. Differs from `f64::powf` where the script language
/// leaves the result undefined (`1 ** NaN`, `(-1) ** Infinity`).
fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

#[inline]
fn shift_count(right: &Value) -> u32 {
    right.to_uint32() & 31
}

/// Relational comparison; `None` when either side converts to `NaN`.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }
    left.to_number().partial_cmp(&right.to_number())
}

/// `===`: same type and same value; compound values by identity.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
        (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
        (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// `==`: `null` and `undefined` equal each other, and mixed primitive
/// types are compared after numeric conversion.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(_), Value::Str(_)) | (Value::Str(_), Value::Number(_)) => {
            left.to_number() == right.to_number()
        }
        (Value::Bool(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Bool(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (compound, primitive) | (primitive, compound)
            if is_compound(compound) && !is_compound(primitive) =>
        {
            loose_equals(&compound.to_primitive(), primitive)
        }
        _ => strict_equals(left, right),
    }
}

fn is_compound(value: &Value) -> bool {
    matches!(
        value,
        Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_)
    )
}
