//! Lexical environments for compiled closures.
//!
//! A frame (`Scope`) holds the bindings of one lexical level and a link to
//! its parent. Frames are shared: a function value keeps its defining frame
//! alive, and a loop reuses one frame across iterations. `Env` is a handle to
//! one frame plus the root frame of its chain.
//!
//! The root frame carries a second, read-only layer: the host bindings the
//! evaluation was seeded with. Lookups consult it after the root's own
//! bindings. Definitions never touch it, so after a run the root's own
//! bindings are exactly what the script defined at top level.

mod reclaim;

use std::mem;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::shared::Shared;
use crate::Value;

pub(crate) use reclaim::reclaim;

/// Name to value map of one frame, in definition order.
pub type Bindings = IndexMap<Rc<str>, Value, FxBuildHasher>;

/// A single frame of bindings.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: Bindings,
    /// Host layer; only ever present on a root frame.
    host: Option<Bindings>,
    parent: Option<Shared<Scope>>,
}

impl Scope {
    /// A root frame over the given host bindings.
    pub fn root(host: Bindings) -> Self {
        Scope {
            bindings: Bindings::default(),
            host: Some(host),
            parent: None,
        }
    }

    /// A child frame of `parent`.
    pub fn with_parent(parent: Shared<Scope>) -> Self {
        Scope {
            bindings: Bindings::default(),
            host: None,
            parent: Some(parent),
        }
    }

    /// Look a name up in this frame only (own bindings, then host layer).
    #[inline]
    fn lookup_local(&self, name: &str) -> Option<&Value> {
        self.bindings
            .get(name)
            .or_else(|| self.host.as_ref().and_then(|host| host.get(name)))
    }

    #[inline]
    fn binds(&self, name: &str) -> bool {
        self.lookup_local(name).is_some()
    }
}

/// Handle to a frame and the root of its chain.
#[derive(Clone, Debug)]
pub struct Env {
    frame: Shared<Scope>,
    root: Shared<Scope>,
}

impl Env {
    /// A fresh root environment seeded with host bindings.
    pub fn new_root(host: Bindings) -> Self {
        let root = Shared::new(Scope::root(host));
        Env {
            frame: root.clone(),
            root,
        }
    }

    /// Resolve a name, innermost frame first.
    ///
    /// `None` means no frame binds the name. That is distinct from every
    /// script value, `undefined` included.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        let mut frame = self.frame.clone();
        loop {
            let parent = {
                let scope = frame.borrow();
                if let Some(value) = scope.lookup_local(name) {
                    return Some(value.clone());
                }
                scope.parent.clone()
            };
            frame = parent?;
        }
    }

    /// Bind `name` in the current frame, replacing any previous binding
    /// there. Ancestor frames are never touched.
    #[inline]
    pub fn define(&self, name: Rc<str>, value: Value) {
        self.frame.borrow_mut().bindings.insert(name, value);
    }

    /// A new child frame of the current one.
    #[must_use]
    pub fn enter(&self) -> Env {
        Env {
            frame: Shared::new(Scope::with_parent(self.frame.clone())),
            root: self.root.clone(),
        }
    }

    /// The parent frame, or this frame when it is the root.
    #[must_use]
    pub fn exit(&self) -> Env {
        let parent = self.frame.borrow().parent.clone();
        match parent {
            Some(frame) => Env {
                frame,
                root: self.root.clone(),
            },
            None => self.clone(),
        }
    }

    /// The frame that currently binds `name`, if any.
    pub fn owner_of(&self, name: &str) -> Option<Env> {
        let mut frame = self.frame.clone();
        loop {
            let parent = {
                let scope = frame.borrow();
                if scope.binds(name) {
                    None
                } else {
                    Some(scope.parent.clone())
                }
            };
            match parent {
                None => {
                    return Some(Env {
                        frame,
                        root: self.root.clone(),
                    })
                }
                Some(next) => frame = next?,
            }
        }
    }

    /// The root frame of this chain.
    #[must_use]
    pub fn root(&self) -> Env {
        Env {
            frame: self.root.clone(),
            root: self.root.clone(),
        }
    }

    /// Whether this handle points at the root frame.
    pub fn is_root(&self) -> bool {
        self.frame.ptr_eq(&self.root)
    }

    /// Whether both handles point at the same frame.
    pub fn same_frame(&self, other: &Env) -> bool {
        self.frame.ptr_eq(&other.frame)
    }

    /// Remove the host entries that the root frame's own bindings shadow and
    /// return their values. Lookups can never reach them again.
    pub(crate) fn prune_shadowed_host(&self) -> Vec<Value> {
        let mut released = Vec::new();
        let mut root = self.root.borrow_mut();
        let Scope { bindings, host, .. } = &mut *root;
        if let Some(host) = host {
            host.retain(|name, value| {
                if bindings.contains_key(name) {
                    released.push(mem::take(value));
                    false
                } else {
                    true
                }
            });
        }
        released
    }

    /// Bindings the root frame defines itself (not the host layer), in
    /// definition order.
    pub fn root_bindings(&self) -> Vec<(Rc<str>, Value)> {
        self.root
            .borrow()
            .bindings
            .iter()
            .map(|(name, value)| (Rc::clone(name), value.clone()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
