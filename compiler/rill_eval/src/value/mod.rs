//! Runtime values.
//!
//! Primitives are held inline. Arrays and objects are shared, mutable
//! allocations: copying a `Value::Object` copies the handle, so a mutation
//! through one copy is visible through every other. Functions are either
//! compiled script functions or host closures.
//!
//! Coercions follow the conventions of the script language: `truthy`,
//! `to_number`, `to_property_key` and the `Display` impl (which is the
//! language's string conversion).

mod function;
mod number;
mod property;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rill_stack::ensure_sufficient_stack;
use rustc_hash::FxBuildHasher;

use crate::errors::{not_callable, EvalResult};
use crate::shared::Shared;

pub use function::{FunctionValue, NativeFn, NativeFunction};
pub(crate) use number::{format_number, parse_number};
pub(crate) use property::{array_index, MAX_ARRAY_GROWTH};

/// Property storage of an object, in insertion order.
pub type ObjectMap = IndexMap<Rc<str>, Value, FxBuildHasher>;

/// A runtime value.
///
/// `PartialEq` is structural (arrays and objects compare by contents,
/// functions by identity). It is meant for hosts and tests; the script's own
/// `==` and `===` live in `crate::operators`.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Shared<Vec<Value>>),
    Object(Shared<ObjectMap>),
    /// A function compiled from the script.
    Function(FunctionValue),
    /// A function supplied by the host.
    Native(NativeFunction),
}

// Factory methods

impl Value {
    /// A string value.
    #[inline]
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    /// A fresh array holding `elements`.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Shared::new(elements))
    }

    /// A fresh, empty object.
    pub fn object() -> Self {
        Value::Object(Shared::new(ObjectMap::default()))
    }

    /// A fresh object holding `entries`, in iteration order.
    pub fn object_from<K, I>(entries: I) -> Self
    where
        K: Into<Rc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect::<ObjectMap>();
        Value::Object(Shared::new(map))
    }

    /// A host function.
    ///
    /// The closure receives the call receiver (`undefined` for plain calls,
    /// the object for method calls) and the evaluated arguments.
    pub fn native<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> EvalResult + 'static,
    {
        Value::Native(NativeFunction::new(name, func))
    }
}

// Inspection and coercion

impl Value {
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `null` or `undefined`.
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    /// The number payload, without coercion.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, without coercion.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean conversion.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_) => true,
        }
    }

    /// Numeric conversion.
    ///
    /// Arrays convert through their string form (`[]` is 0, `[7]` is 7);
    /// objects and functions are `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => parse_number(s),
            Value::Array(_) => parse_number(&self.to_string()),
            Value::Object(_) | Value::Function(_) | Value::Native(_) => f64::NAN,
        }
    }

    /// Signed 32-bit integer conversion used by the bitwise operators.
    pub fn to_int32(&self) -> i32 {
        self.to_uint32() as i32
    }

    /// Unsigned 32-bit integer conversion used by `>>>` and shift counts.
    pub fn to_uint32(&self) -> u32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        n.trunc().rem_euclid(4_294_967_296.0) as u32
    }

    /// Primitive conversion: arrays, objects and functions become their
    /// string form, primitives are returned as-is.
    pub fn to_primitive(&self) -> Value {
        match self {
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_) => {
                Value::string(self.to_string())
            }
            _ => self.clone(),
        }
    }

    /// Property key conversion for computed member access.
    pub fn to_property_key(&self) -> Rc<str> {
        match self {
            Value::Str(s) => Rc::clone(s),
            other => Rc::from(other.to_string()),
        }
    }

    /// Result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
        }
    }

    /// Call this value as a function.
    ///
    /// `this` is the receiver bound inside non-arrow script functions. Host
    /// code uses this to invoke script functions it received as arguments.
    pub fn call(&self, this: &Value, args: &[Value]) -> EvalResult {
        match self {
            Value::Function(func) => ensure_sufficient_stack(|| func.call(this, args)),
            Value::Native(native) => ensure_sufficient_stack(|| native.call(this, args)),
            other => Err(not_callable(&other.describe())),
        }
    }

    /// Short description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{s}\""),
            Value::Array(_) | Value::Object(_) => self.type_of().to_string(),
            other => other.to_string(),
        }
    }
}

/// The argument at `index`, or `undefined` when the caller passed fewer.
///
/// Convenience for host functions, whose argument slices are not padded.
pub fn nth_arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

// Conversions

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

// Trait impls

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Array(elements) => f.debug_list().entries(elements.borrow().iter()).finish(),
            Value::Object(map) => f.debug_map().entries(map.borrow().iter()).finish(),
            Value::Function(func) => write!(f, "Function({})", func.name().unwrap_or("anonymous")),
            Value::Native(native) => write!(f, "Native({})", native.name()),
        }
    }
}

/// String conversion as the script language performs it (`String(v)`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Array(elements) => {
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !element.is_nullish() {
                        write!(f, "{element}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Function(func) => {
                write!(f, "function {}() {{ [script code] }}", func.name().unwrap_or(""))
            }
            Value::Native(native) => {
                write!(f, "function {}() {{ [native code] }}", native.name())
            }
        }
    }
}
