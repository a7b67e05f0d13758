//! Property access on values.

use std::rc::Rc;

use crate::errors::{
    array_growth_too_large, cannot_read_property, cannot_set_property, in_requires_object,
    invalid_array_length, EvalError, EvalResult,
};
use crate::Value;

/// Largest valid array length plus one.
const MAX_ARRAY_LENGTH: f64 = 4_294_967_295.0;

/// Most elements a single write may add to an array. Arrays are dense, so a
/// far index or a large `length` would otherwise allocate every hole.
pub(crate) const MAX_ARRAY_GROWTH: usize = 1 << 16;

/// Parse a canonical array index (`"0"`, `"17"`, never `"017"` or `"1.0"`).
pub(crate) fn array_index(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    let canonical = match bytes {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => bytes.iter().all(u8::is_ascii_digit),
    };
    if !canonical {
        return None;
    }
    let index = key.parse::<u32>().ok()?;
    (index < u32::MAX).then_some(index as usize)
}

impl Value {
    /// Read `self[key]`.
    ///
    /// Missing properties are `undefined`; reading any property of `null` or
    /// `undefined` is a type error.
    pub fn get_property(&self, key: &str) -> EvalResult {
        let value = match self {
            Value::Undefined | Value::Null => return Err(cannot_read_property(key, self)),
            Value::Str(s) => string_property(s, key),
            Value::Array(elements) => {
                let elements = elements.borrow();
                if key == "length" {
                    Value::Number(elements.len() as f64)
                } else {
                    array_index(key)
                        .and_then(|i| elements.get(i).cloned())
                        .unwrap_or_default()
                }
            }
            Value::Object(map) => map.borrow().get(key).cloned().unwrap_or_default(),
            Value::Function(func) if key == "name" => Value::string(func.name().unwrap_or("")),
            Value::Native(native) if key == "name" => Value::string(native.name()),
            Value::Bool(_) | Value::Number(_) | Value::Function(_) | Value::Native(_) => {
                Value::Undefined
            }
        };
        Ok(value)
    }

    /// Write `self[key] = value`.
    ///
    /// Objects insert or overwrite the key. Arrays accept index keys (growing
    /// with `undefined` holes) and `length` (truncating or extending). One
    /// write may add at most `MAX_ARRAY_GROWTH` elements. Every other write is
    /// a type error.
    pub fn set_property(&self, key: Rc<str>, value: Value) -> Result<(), EvalError> {
        match self {
            Value::Object(map) => {
                map.borrow_mut().insert(key, value);
                Ok(())
            }
            Value::Array(elements) => {
                if let Some(index) = array_index(&key) {
                    let mut elements = elements.borrow_mut();
                    if index >= elements.len() {
                        grow_to(&mut elements, index + 1)?;
                    }
                    elements[index] = value;
                    return Ok(());
                }
                if &*key == "length" {
                    let length = value.to_number();
                    if length < 0.0 || length.fract() != 0.0 || length > MAX_ARRAY_LENGTH {
                        return Err(invalid_array_length(length));
                    }
                    let mut elements = elements.borrow_mut();
                    let length = length as usize;
                    if length > elements.len() {
                        grow_to(&mut elements, length)?;
                    } else {
                        elements.truncate(length);
                    }
                    return Ok(());
                }
                Err(cannot_set_property(&key, self))
            }
            _ => Err(cannot_set_property(&key, self)),
        }
    }

    /// The `in` operator: whether `key` names a property of `self`.
    pub fn has_property(&self, key: &str) -> Result<bool, EvalError> {
        match self {
            Value::Object(map) => Ok(map.borrow().contains_key(key)),
            Value::Array(elements) => Ok(key == "length"
                || array_index(key).is_some_and(|i| i < elements.borrow().len())),
            Value::Function(_) | Value::Native(_) => Ok(key == "name"),
            _ => Err(in_requires_object(self)),
        }
    }

    /// Keys visited by `for (k in value)`.
    ///
    /// Integer-like keys come first in ascending order, then the remaining
    /// keys in insertion order. Arrays and strings yield their indices;
    /// every other value yields nothing.
    pub fn enumerable_keys(&self) -> Vec<Rc<str>> {
        match self {
            Value::Object(map) => {
                let map = map.borrow();
                let mut indexed: Vec<(usize, Rc<str>)> = Vec::new();
                let mut named: Vec<Rc<str>> = Vec::new();
                for key in map.keys() {
                    match array_index(key) {
                        Some(i) => indexed.push((i, Rc::clone(key))),
                        None => named.push(Rc::clone(key)),
                    }
                }
                indexed.sort_unstable_by_key(|(i, _)| *i);
                indexed.into_iter().map(|(_, key)| key).chain(named).collect()
            }
            Value::Array(elements) => index_keys(elements.borrow().len()),
            Value::Str(s) => index_keys(s.encode_utf16().count()),
            _ => Vec::new(),
        }
    }
}

fn grow_to(elements: &mut Vec<Value>, length: usize) -> Result<(), EvalError> {
    if length - elements.len() > MAX_ARRAY_GROWTH {
        return Err(array_growth_too_large(elements.len(), length));
    }
    elements.resize(length, Value::Undefined);
    Ok(())
}

fn index_keys(len: usize) -> Vec<Rc<str>> {
    (0..len).map(|i| Rc::from(i.to_string())).collect()
}

/// `length` and single-unit indexing on strings. Indices count UTF-16 code
/// units.
fn string_property(s: &str, key: &str) -> Value {
    if key == "length" {
        return Value::Number(s.encode_utf16().count() as f64);
    }
    match array_index(key).and_then(|i| s.encode_utf16().nth(i)) {
        Some(unit) => Value::string(String::from_utf16_lossy(&[unit])),
        None => Value::Undefined,
    }
}
