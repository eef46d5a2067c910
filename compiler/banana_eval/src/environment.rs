//! Lexical environments.
//!
//! An `Environment` is a shared handle to one scope. Scopes are chained to
//! their parent for lookup; a child never copies its parent's bindings.
//! The global scope and every closure's defining scope live as long as
//! something still refers to them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use banana_ir::Name;
use rustc_hash::FxHashMap;

use crate::Value;

/// Returned by [`Environment::define`] when the name is already bound in
/// that same scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlreadyDefined;

/// Shared handle to a scope.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

#[derive(Default)]
struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<Environment>,
}

impl Environment {
    /// Create an empty root scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root scope pre-populated with `bindings`.
    pub fn root(bindings: impl IntoIterator<Item = (Name, Value)>) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: bindings.into_iter().collect(),
            parent: None,
        })))
    }

    /// Create a child scope of `self` holding `bindings`.
    ///
    /// If a name appears twice in `bindings` the last pair wins.
    pub fn child_with(&self, bindings: impl IntoIterator<Item = (Name, Value)>) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: bindings.into_iter().collect(),
            parent: Some(self.clone()),
        })))
    }

    /// Resolve `name` here or in the nearest ancestor that binds it.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.0.borrow();
                if let Some(value) = scope.bindings.get(&name) {
                    return Some(value.clone());
                }
                scope.parent.clone()
            };
            current = parent?;
        }
    }

    /// Bind `name` in this scope. Ancestors are not consulted, so shadowing
    /// an outer binding is allowed but rebinding a local one is not.
    pub fn define(&self, name: Name, value: Value) -> Result<(), AlreadyDefined> {
        let mut scope = self.0.borrow_mut();
        if scope.bindings.contains_key(&name) {
            return Err(AlreadyDefined);
        }
        scope.bindings.insert(name, value);
        Ok(())
    }

    /// Whether `name` is bound directly in this scope.
    pub fn is_defined_locally(&self, name: Name) -> bool {
        self.0.borrow().bindings.contains_key(&name)
    }

    /// Number of scopes from here to the root, counting this one.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut parent = self.0.borrow().parent.clone();
        while let Some(env) = parent {
            depth += 1;
            parent = env.0.borrow().parent.clone();
        }
        depth
    }

    /// Whether both handles point at the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Environment")
            .field("bindings", &scope.bindings.len())
            .field("depth", &self.depth())
            .finish()
    }
}
