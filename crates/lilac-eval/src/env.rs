//! Lexically scoped variable environments for the Lilac evaluator.

use crate::object::{Function, Object};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Shared handle to an environment frame. Closures and child frames keep
/// their enclosing frame alive through it.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Clone)]
enum Binding {
    Value(Object),
    /// A function's own name inside a closure environment other than the
    /// one it was bound in. Held weakly so the two do not keep each other
    /// alive.
    SelfRef(Weak<Function>),
}

/// One frame of bindings plus an optional enclosing frame.
///
/// Variables are looked up from this frame outward. `set` always writes
/// to this frame and never touches an outer one.
#[derive(Debug, Default)]
pub struct Environment {
    store: BTreeMap<String, Binding>,
    outer: Option<Env>,
}

impl Environment {
    /// Create a root (global) environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame that encloses `outer`.
    pub fn enclosed(outer: Env) -> Self {
        Self {
            store: BTreeMap::new(),
            outer: Some(outer),
        }
    }

    /// Wrap this frame in a shared handle.
    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Look up a variable, searching from innermost to outermost frame.
    /// Returns a copy of the bound value.
    pub fn get(&self, name: &str) -> Option<Object> {
        let local = match self.store.get(name) {
            Some(Binding::Value(value)) => Some(value.clone()),
            Some(Binding::SelfRef(func)) => func.upgrade().map(Object::Function),
            None => None,
        };
        match local {
            Some(value) => Some(value),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Bind `name` in this frame, replacing any existing local binding.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), Binding::Value(value));
    }

    /// Bind `name` to `func` without keeping `func` alive.
    pub fn set_self(&mut self, name: impl Into<String>, func: &Rc<Function>) {
        self.store
            .insert(name.into(), Binding::SelfRef(Rc::downgrade(func)));
    }

    /// Drop every binding in this frame.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Returns `true` if `name` is bound in this frame itself.
    pub fn has_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Names bound in this frame, in sorted order.
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// Copy the whole chain into an independent environment. Later writes to
    /// either side are invisible to the other. Function values inside are
    /// still shared.
    pub fn snapshot(&self) -> Env {
        Environment {
            store: self.store.clone(),
            outer: self.outer.as_ref().map(|outer| outer.borrow().snapshot()),
        }
        .into_shared()
    }
}

/// Drop a finished call frame.
///
/// A function defined in `frame` and bound there closes over `frame`, so
/// the two form a cycle. When those functions are the only holders of
/// `frame` and `frame` is their only holder, the bindings are cleared so
/// the whole group is freed.
pub(crate) fn release_frame(frame: Env) {
    let unreachable = {
        let env = frame.borrow();
        let mut closures: Vec<(&Rc<Function>, usize)> = Vec::new();
        for binding in env.store.values() {
            let Binding::Value(Object::Function(func)) = binding else {
                continue;
            };
            if !Rc::ptr_eq(&func.env, &frame) {
                continue;
            }
            match closures.iter_mut().find(|(seen, _)| Rc::ptr_eq(*seen, func)) {
                Some((_, uses)) => *uses += 1,
                None => closures.push((func, 1)),
            }
        }
        !closures.is_empty()
            && Rc::strong_count(&frame) == 1 + closures.len()
            && closures
                .iter()
                .all(|(func, uses)| Rc::strong_count(*func) == *uses)
    };
    if unreachable {
        frame.borrow_mut().clear();
    }
}
