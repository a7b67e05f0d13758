//! Function values: script closures and host functions.

use std::fmt;
use std::rc::Rc;

use crate::compile::function::{invoke, FunctionTemplate};
use crate::environment::Env;
use crate::errors::EvalResult;
use crate::Value;

/// A function compiled from the script, closed over its defining
/// environment.
///
/// Cloning shares the closure. The defining environment stays alive as long
/// as any copy of the function does.
#[derive(Clone)]
pub struct FunctionValue(Rc<Closure>);

pub(crate) struct Closure {
    pub(crate) template: Rc<FunctionTemplate>,
    pub(crate) env: Env,
}

impl FunctionValue {
    pub(crate) fn new(template: Rc<FunctionTemplate>, env: Env) -> Self {
        FunctionValue(Rc::new(Closure { template, env }))
    }

    /// The declared name, if the function has one.
    pub fn name(&self) -> Option<&str> {
        self.0.template.name.as_deref()
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.0.template.params.len()
    }

    /// Whether both handles refer to the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn closure(&self) -> &Closure {
        &self.0
    }

    pub(crate) fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Invoke with the given receiver and arguments.
    pub fn call(&self, this: &Value, args: &[Value]) -> EvalResult {
        invoke(self, this, args)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

/// Signature of host functions: receiver, then arguments.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> EvalResult;

/// A function implemented by the host.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> EvalResult + 'static,
    {
        NativeFunction {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(name = %self.name))]
    pub fn call(&self, this: &Value, args: &[Value]) -> EvalResult {
        (self.func)(this, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeFunction").field(&self.name).finish()
    }
}
