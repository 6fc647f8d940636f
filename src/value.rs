//! Runtime values and the evaluator's control-flow result type.
//!
//! `Value` is the closed tagged union every evaluation step produces.
//! Strings, objects, and arrays are *reference* values: cloning a `Value`
//! clones an `Rc` handle, so mutation through one alias is visible through
//! every other.  Member-expression assignment and the built-in array/string
//! methods rely on this.
//!
//! Control flow (`break` / `continue` / `return`) is deliberately **not**
//! part of `Value`.  The evaluator returns [`Flow`], which wraps either a
//! normal value or an early-exit signal; loop and call boundaries match on
//! it, and a signal escaping the program root is unrepresentable rather
//! than a runtime default-case.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Stmt;
use crate::environment::ScopeId;
use crate::error::Result;

/// Host-provided function: receives the evaluated arguments, returns a
/// value or a runtime error.  Built-in methods are natives that close over
/// their receiver's backing storage.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value>>;

/// A user-defined function: parameter names, retained body statements, and
/// the scope it closed over at declaration time.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Stmt>,
    pub declaration_scope: ScopeId,
}

/// A fully-formed runtime value.
#[derive(Clone)]
pub enum Value {
    Null,

    Bool(bool),

    Number(f64),

    /// Shared, mutable backing text (`concat` mutates it in place).
    Str(Rc<RefCell<String>>),

    /// String key → value mapping; insertion order is irrelevant.
    Object(Rc<RefCell<HashMap<String, Value>>>),

    /// Shared, mutable element sequence (`push`/`pop`/`shift` mutate it).
    Array(Rc<RefCell<Vec<Value>>>),

    Function(Rc<Function>),

    NativeFunction { name: String, func: NativeFn },

    /// The `unassigned` sentinel: declared-but-valueless variables, empty
    /// `pop`/`shift` results, missing call arguments.
    Unassigned,
}

impl Value {
    /// Build a string value with fresh backing storage.
    pub fn string<S: Into<String>>(text: S) -> Self {
        Value::Str(Rc::new(RefCell::new(text.into())))
    }

    /// Build an array value with fresh backing storage.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Build an object value from a key → value map.
    pub fn object(properties: HashMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(properties)))
    }

    /// Build a native-function value.
    pub fn native<S, F>(name: S, func: F) -> Self
    where
        S: Into<String>,
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Value::NativeFunction {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// The value's tag name, used in diagnostics and for type enforcement
    /// on typed declarations.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
            Value::NativeFunction { .. } => "native-fn",
            Value::Unassigned => "unassigned",
        }
    }
}

impl PartialEq for Value {
    /// Primitives and strings compare by value; objects, arrays, and
    /// functions compare by identity; differing tags are never equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Unassigned, Value::Unassigned) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction { func: a, .. }, Value::NativeFunction { func: b, .. }) => {
                Rc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({:?})", s.borrow()),
            Value::Object(o) => write!(f, "Object({:?})", o.borrow()),
            Value::Array(a) => write!(f, "Array({:?})", a.borrow()),
            Value::Function(func) => write!(f, "Function({})", func.name),
            Value::NativeFunction { name, .. } => write!(f, "NativeFunction({name})"),
            Value::Unassigned => write!(f, "Unassigned"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => {
                // 15 → "15", 3.14 → "3.14" (itoa avoids an allocation)
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 9e15 {
                    let mut buf = itoa::Buffer::new();
                    f.write_str(buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::Str(s) => write!(f, "{}", s.borrow()),

            Value::Object(o) => {
                write!(f, "{{")?;

                for (i, (key, value)) in o.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }

                write!(f, "}}")
            }

            Value::Array(a) => {
                write!(f, "[")?;

                for (i, value) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }

                write!(f, "]")
            }

            Value::Function(func) => write!(f, "<fn {}>", func.name),

            Value::NativeFunction { name, .. } => write!(f, "<native fn {}>", name),

            Value::Unassigned => write!(f, "unassigned"),
        }
    }
}

/// Result of one evaluation step: a normal value, or an early-exit signal
/// threaded up to the nearest loop (`Break`/`Continue`) or call boundary
/// (`Return`).
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Value(Value),
    Break,
    Continue,
    Return(Value),
}
