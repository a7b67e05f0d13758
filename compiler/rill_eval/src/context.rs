//! The host namespace a script runs against.

use std::rc::Rc;

use crate::environment::Bindings;
use crate::errors::EvalResult;
use crate::Value;

/// Ordered name to value map handed to `Script::evaluate`.
///
/// Its entries seed the root frame of each run. After a successful run the
/// bindings the script defined at top level are written back, so a context
/// carries state from one evaluation to the next.
#[derive(Clone, Debug, Default)]
pub struct Context {
    bindings: Bindings,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the value it replaced.
    pub fn set(&mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Option<Value> {
        self.bindings.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Remove `name`, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bound names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(AsRef::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_ref(), value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind a host function under `name`.
    ///
    /// The closure receives the call receiver and the evaluated arguments.
    pub fn register_fn<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&Value, &[Value]) -> EvalResult + 'static,
    {
        self.bindings.insert(Rc::from(name), Value::native(name, func));
    }

    pub(crate) fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

impl<K: Into<Rc<str>>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Context {
            bindings: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl<K: Into<Rc<str>>> Extend<(K, Value)> for Context {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        self.bindings
            .extend(iter.into_iter().map(|(name, value)| (name.into(), value)));
    }
}
