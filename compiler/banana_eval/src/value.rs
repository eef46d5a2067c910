//! Runtime values.

use std::fmt;
use std::rc::Rc;

use banana_ir::{Expr, Name};

use crate::{Environment, Primitive};

/// A value produced by evaluation.
///
/// Cloning is cheap: strings and closures are reference counted.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    /// Result of side-effecting forms (`define`, `print`) and of an `if`
    /// whose condition is false and has no else branch.
    Undefined,
    Primitive(Primitive),
    Closure(Rc<Closure>),
}

/// A `lambda` value: parameters, body and the environment it was created in.
pub struct Closure {
    pub params: Vec<Name>,
    /// One or more expressions, evaluated in order on each call.
    pub body: Rc<[Expr]>,
    pub env: Environment,
}

impl Value {
    /// Only `false` is falsy. `0`, `""` and `undefined` are all truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Undefined => "undefined",
            Value::Primitive(_) => "primitive",
            Value::Closure(_) => "lambda",
        }
    }

    /// Render for error messages. Strings are quoted, everything else is
    /// shown as `print` would show it.
    pub fn describe(&self) -> String {
        match self {
            Value::Str(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    /// Structural on plain data, identity on closures. Values of different
    /// kinds are never equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Undefined => f.write_str("undefined"),
            Value::Primitive(p) => write!(f, "#<primitive {}>", p.symbol()),
            Value::Closure(c) => write!(f, "#<lambda/{}>", c.params.len()),
        }
    }
}

// Closures capture environments that may reach back to the closure itself,
// so Debug never walks into `env`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Undefined => f.write_str("Undefined"),
            Value::Primitive(p) => write!(f, "Primitive({p:?})"),
            Value::Closure(c) => write!(f, "{c:?}"),
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}
