//! Primitive functions: `+ - * = print`.
//!
//! Primitives receive fully evaluated arguments and return a value
//! synchronously; they never touch the queue.

use banana_ir::{Name, StringInterner};

use crate::errors::{arity_mismatch, integer_overflow, type_mismatch};
use crate::{ArgCount, EvalResult, PrintHandlerImpl, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Add,
    Sub,
    Mul,
    Eq,
    Print,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Add,
        Primitive::Sub,
        Primitive::Mul,
        Primitive::Eq,
        Primitive::Print,
    ];

    /// The global name this primitive is bound to.
    pub fn symbol(self) -> &'static str {
        match self {
            Primitive::Add => "+",
            Primitive::Sub => "-",
            Primitive::Mul => "*",
            Primitive::Eq => "=",
            Primitive::Print => "print",
        }
    }

    pub fn arg_count(self) -> ArgCount {
        match self {
            Primitive::Add | Primitive::Mul | Primitive::Print => ArgCount::AtLeast(0),
            Primitive::Sub | Primitive::Eq => ArgCount::AtLeast(1),
        }
    }

    fn arity_error(self, got: usize) -> crate::EvalError {
        arity_mismatch(self.symbol(), self.arg_count(), got)
    }

    pub fn call(self, args: &[Value], out: &PrintHandlerImpl) -> EvalResult {
        if !self.arg_count().accepts(args.len()) {
            return Err(self.arity_error(args.len()));
        }
        match self {
            Primitive::Add => fold_ints(self, 0, args, i64::checked_add),
            Primitive::Mul => fold_ints(self, 1, args, i64::checked_mul),
            Primitive::Sub => {
                // Unary `-` returns its argument unchanged; it does not negate.
                let (first, rest) = args
                    .split_first()
                    .ok_or_else(|| self.arity_error(0))?;
                let start = int_arg(self, first)?;
                fold_ints(self, start, rest, i64::checked_sub)
            }
            Primitive::Eq => {
                let (first, rest) = args
                    .split_first()
                    .ok_or_else(|| self.arity_error(0))?;
                Ok(Value::Bool(rest.iter().all(|arg| arg == first)))
            }
            Primitive::Print => {
                let line = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                out.println(&line);
                Ok(Value::Undefined)
            }
        }
    }
}

/// Intern every primitive's symbol and pair it with its value, ready to
/// seed a global environment.
pub fn builtin_bindings(interner: &StringInterner) -> impl Iterator<Item = (Name, Value)> + '_ {
    Primitive::ALL
        .into_iter()
        .map(|p| (interner.intern(p.symbol()), Value::Primitive(p)))
}

fn int_arg(op: Primitive, value: &Value) -> Result<i64, crate::EvalError> {
    value
        .as_int()
        .ok_or_else(|| type_mismatch(op.symbol(), "an integer", value))
}

fn fold_ints(
    op: Primitive,
    init: i64,
    args: &[Value],
    f: fn(i64, i64) -> Option<i64>,
) -> EvalResult {
    let mut acc = init;
    for arg in args {
        let n = int_arg(op, arg)?;
        acc = f(acc, n).ok_or_else(|| integer_overflow(op.symbol()))?;
    }
    Ok(Value::Int(acc))
}
