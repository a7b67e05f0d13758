//! Breaking the reference cycles a finished run leaves behind.
//!
//! A function value holds its defining frame, and a frame holds the values
//! bound in it, so any function stored in the frame it captures is an `Rc`
//! cycle. When a run ends, `reclaim` walks everything reachable from the
//! run's root frame and from the values the run released (replaced context
//! entries, shadowed host entries), counting the strong references each
//! allocation receives from inside that graph. An allocation with more
//! strong references than the graph accounts for is held from outside: by
//! the host context, the run's result, or a host closure. It stays, along
//! with everything it reaches. Whatever is left is unreachable, and
//! emptying it breaks the cycles.
//!
//! Host layers are not walked. Their values are held by the context that
//! seeded them, so skipping them can only keep more alive.

use std::mem;

use rustc_hash::FxHashMap;

use super::{Env, Scope};
use crate::shared::Shared;
use crate::value::{FunctionValue, ObjectMap};
use crate::Value;

/// An allocation that can take part in a cycle.
enum Alloc {
    Frame(Shared<Scope>),
    Array(Shared<Vec<Value>>),
    Object(Shared<ObjectMap>),
    Function(FunctionValue),
}

impl Alloc {
    fn of(value: &Value) -> Option<Alloc> {
        match value {
            Value::Array(elements) => Some(Alloc::Array(elements.clone())),
            Value::Object(map) => Some(Alloc::Object(map.clone())),
            Value::Function(function) => Some(Alloc::Function(function.clone())),
            _ => None,
        }
    }

    fn addr(&self) -> usize {
        match self {
            Alloc::Frame(frame) => frame.addr(),
            Alloc::Array(elements) => elements.addr(),
            Alloc::Object(map) => map.addr(),
            Alloc::Function(function) => function.addr(),
        }
    }

    fn strong_count(&self) -> usize {
        match self {
            Alloc::Frame(frame) => frame.strong_count(),
            Alloc::Array(elements) => elements.strong_count(),
            Alloc::Object(map) => map.strong_count(),
            Alloc::Function(function) => function.strong_count(),
        }
    }

    /// One entry per strong reference this allocation holds.
    fn children(&self) -> Vec<Alloc> {
        match self {
            Alloc::Frame(frame) => {
                let scope = frame.borrow();
                scope
                    .parent
                    .iter()
                    .map(|parent| Alloc::Frame(parent.clone()))
                    .chain(scope.bindings.values().filter_map(Alloc::of))
                    .collect()
            }
            Alloc::Array(elements) => elements.borrow().iter().filter_map(Alloc::of).collect(),
            Alloc::Object(map) => map.borrow().values().filter_map(Alloc::of).collect(),
            Alloc::Function(function) => {
                let Env { frame, root } = &function.closure().env;
                vec![Alloc::Frame(frame.clone()), Alloc::Frame(root.clone())]
            }
        }
    }

    /// Empty the allocation. Function values are left alone; emptying the
    /// frames they capture is enough.
    fn clear(&self) {
        match self {
            Alloc::Frame(frame) => {
                let scope = mem::take(&mut *frame.borrow_mut());
                drop(scope);
            }
            Alloc::Array(elements) => {
                let elements = mem::take(&mut *elements.borrow_mut());
                drop(elements);
            }
            Alloc::Object(map) => {
                let map = mem::take(&mut *map.borrow_mut());
                drop(map);
            }
            Alloc::Function(_) => {}
        }
    }
}

/// Allocations found so far, with the strong references the graph itself
/// holds to each: its own handle plus one per edge.
#[derive(Default)]
struct Graph {
    allocs: Vec<Alloc>,
    held: Vec<usize>,
    edges: Vec<Vec<usize>>,
    index: FxHashMap<usize, usize>,
}

impl Graph {
    /// Track `alloc`, keeping this handle if it is new.
    fn insert(&mut self, alloc: Alloc) -> usize {
        let addr = alloc.addr();
        if let Some(&index) = self.index.get(&addr) {
            return index;
        }
        let index = self.allocs.len();
        self.allocs.push(alloc);
        self.held.push(1);
        self.index.insert(addr, index);
        index
    }

    fn walk(&mut self) {
        let mut next = 0;
        while next < self.allocs.len() {
            let children = self.allocs[next].children();
            let mut edges = Vec::with_capacity(children.len());
            for child in children {
                let index = self.insert(child);
                self.held[index] += 1;
                edges.push(index);
            }
            self.edges.push(edges);
            next += 1;
        }
    }

    /// Allocations reachable from one held from outside the graph.
    fn live(&self) -> Vec<bool> {
        let mut live = vec![false; self.allocs.len()];
        let mut pending: Vec<usize> = (0..self.allocs.len())
            .filter(|&i| self.allocs[i].strong_count() > self.held[i])
            .collect();
        while let Some(i) = pending.pop() {
            if !mem::replace(&mut live[i], true) {
                pending.extend(&self.edges[i]);
            }
        }
        live
    }
}

/// Break the cycles among allocations reachable from `env`'s root frame or
/// from `released` that nothing outside them still holds.
pub(crate) fn reclaim(env: Env, released: Vec<Value>) {
    let Env { frame, root } = env;
    drop(frame);

    let mut graph = Graph::default();
    graph.insert(Alloc::Frame(root));
    for value in released {
        if let Some(alloc) = Alloc::of(&value) {
            graph.insert(alloc);
        }
    }
    graph.walk();

    let live = graph.live();
    let mut reclaimed = 0;
    for (alloc, live) in graph.allocs.iter().zip(live) {
        if !live {
            alloc.clear();
            reclaimed += 1;
        }
    }
    if reclaimed > 0 {
        tracing::debug!(reclaimed, "emptied unreachable frames and values");
    }
}
