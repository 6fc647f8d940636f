//! Lexically-scoped variable storage.
//!
//! Scopes live in a single arena (`Vec<Frame>`) owned by the interpreter;
//! a [`ScopeId`] is an index into it.  Child frames point at their parent
//! by id, and function values capture the id of their declaration scope,
//! so closures need no shared-ownership cycle between environments and
//! values.  Frames are never reclaimed: a frame stays addressable for as
//! long as the interpreter lives, which is exactly the lifetime a captured
//! closure scope needs.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::error::{QuillError, Result};
use crate::value::Value;

/// Index of a scope frame inside the interpreter's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// One lexical scope: its bindings plus per-name metadata.
#[derive(Debug)]
struct Frame {
    parent: Option<ScopeId>,
    values: HashMap<String, Value>,
    /// Names declared `const`; reassignment is an error.
    constants: HashSet<String>,
    /// Names exempt from type enforcement (`let`, `const`, `any`).
    untyped: HashSet<String>,
}

impl Frame {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            values: HashMap::new(),
            constants: HashSet::new(),
            untyped: HashSet::new(),
        }
    }
}

/// The arena of all scope frames created during a run.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an environment holding only the root (global) frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(None)],
        }
    }

    /// Id of the root frame.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Allocate a fresh child frame of `parent` and return its id.
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.frames.len());

        trace!("push_scope: {:?} (parent {:?})", id, parent);

        self.frames.push(Frame::new(Some(parent)));

        id
    }

    /// Bind `name` in exactly the frame `scope`.  Fails if the frame
    /// already holds a binding for `name`.
    ///
    /// `constant` forbids later reassignment; `untyped` exempts the name
    /// from tag enforcement on reassignment.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: Value,
        constant: bool,
        untyped: bool,
    ) -> Result<Value> {
        let frame = &mut self.frames[scope.0];

        if frame.values.contains_key(name) {
            return Err(QuillError::runtime(format!(
                "Cannot declare variable '{name}'. It is already defined"
            )));
        }

        trace!("declare '{}' = {:?} in {:?}", name, value, scope);

        frame.values.insert(name.to_string(), value.clone());

        if constant {
            frame.constants.insert(name.to_string());
        }

        if untyped {
            frame.untyped.insert(name.to_string());
        }

        Ok(value)
    }

    /// Reassign `name` in the nearest enclosing frame that declares it.
    ///
    /// Fails when the name is unresolvable, declared `const`, or typed and
    /// the new value's tag differs from the current one.  An `unassigned`
    /// current value accepts any tag: the sentinel means the variable has
    /// not been given a value yet.
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> Result<Value> {
        let owner = self.resolve(scope, name)?;
        let frame = &mut self.frames[owner.0];

        if frame.constants.contains(name) {
            return Err(QuillError::runtime(format!(
                "Cannot reassign '{name}': it was declared constant"
            )));
        }

        if !frame.untyped.contains(name) {
            // Unwrap is fine: resolve() proved the binding exists.
            let current = &frame.values[name];

            if !matches!(current, Value::Unassigned) && current.tag() != value.tag() {
                return Err(QuillError::runtime(format!(
                    "Cannot assign a {} value to '{name}', which holds a {}",
                    value.tag(),
                    current.tag()
                )));
            }
        }

        trace!("assign '{}' = {:?} in {:?}", name, value, owner);

        frame.values.insert(name.to_string(), value.clone());

        Ok(value)
    }

    /// Read the value of `name` from the nearest enclosing frame declaring
    /// it.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<Value> {
        let owner = self.resolve(scope, name)?;

        Ok(self.frames[owner.0].values[name].clone())
    }

    /// Walk the parent chain from `scope` to the frame that declares
    /// `name`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<ScopeId> {
        let mut current = scope;

        loop {
            let frame = &self.frames[current.0];

            if frame.values.contains_key(name) {
                return Ok(current);
            }

            match frame.parent {
                Some(parent) => current = parent,
                None => {
                    return Err(QuillError::runtime(format!(
                        "Cannot resolve '{name}' as it does not exist"
                    )))
                }
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_lookup() {
        let mut env = Environment::new();
        let root = env.root();

        env.declare(root, "x", Value::Number(5.0), false, true)
            .unwrap();

        assert_eq!(env.lookup(root, "x").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn duplicate_declaration_fails() {
        let mut env = Environment::new();
        let root = env.root();

        env.declare(root, "x", Value::Null, false, true).unwrap();

        assert!(env.declare(root, "x", Value::Null, false, true).is_err());
    }

    #[test]
    fn assignment_resolves_to_declaring_frame() {
        let mut env = Environment::new();
        let root = env.root();
        let child = env.push_scope(root);

        env.declare(root, "x", Value::Number(1.0), false, true)
            .unwrap();
        env.assign(child, "x", Value::Number(2.0)).unwrap();

        assert_eq!(env.lookup(root, "x").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn shadowing_leaves_outer_binding_alone() {
        let mut env = Environment::new();
        let root = env.root();
        let child = env.push_scope(root);

        env.declare(root, "x", Value::Number(1.0), false, true)
            .unwrap();
        env.declare(child, "x", Value::Number(9.0), false, true)
            .unwrap();

        assert_eq!(env.lookup(child, "x").unwrap(), Value::Number(9.0));
        assert_eq!(env.lookup(root, "x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn constant_reassignment_fails() {
        let mut env = Environment::new();
        let root = env.root();

        env.declare(root, "k", Value::Number(1.0), true, true)
            .unwrap();

        assert!(env.assign(root, "k", Value::Number(2.0)).is_err());
    }

    #[test]
    fn typed_binding_rejects_mismatched_tag() {
        let mut env = Environment::new();
        let root = env.root();

        env.declare(root, "n", Value::Number(1.0), false, false)
            .unwrap();

        assert!(env.assign(root, "n", Value::string("no")).is_err());
        assert!(env.assign(root, "n", Value::Number(2.0)).is_ok());
    }

    #[test]
    fn unresolvable_name_fails() {
        let env = Environment::new();

        assert!(env.lookup(env.root(), "ghost").is_err());
    }
}
