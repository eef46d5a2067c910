//! Runtime errors.
//!
//! `EvalErrorKind` carries the structured data for each failure; the
//! factory functions below are the construction API. Every runtime error
//! is fatal to the thread that raised it and to nothing else.

use std::fmt;

use banana_ir::Span;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// How many arguments a callable or special form accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArgCount {
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl ArgCount {
    pub fn accepts(self, got: usize) -> bool {
        match self {
            ArgCount::Exactly(n) => got == n,
            ArgCount::AtLeast(n) => got >= n,
            ArgCount::Between(lo, hi) => (lo..=hi).contains(&got),
        }
    }
}

impl fmt::Display for ArgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                "argument"
            } else {
                "arguments"
            }
        }
        match *self {
            ArgCount::Exactly(n) => write!(f, "{n} {}", plural(n)),
            ArgCount::AtLeast(n) => write!(f, "at least {n} {}", plural(n)),
            ArgCount::Between(lo, hi) if hi == lo + 1 => write!(f, "{lo} or {hi} arguments"),
            ArgCount::Between(lo, hi) => write!(f, "{lo} to {hi} arguments"),
        }
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("unbound reference `{name}`")]
    UnboundReference { name: String },

    #[error("`{name}` is already defined in this scope")]
    DuplicateDefinition { name: String },

    #[error("`{name}` expects {expected}, got {got}")]
    Arity {
        name: String,
        expected: ArgCount,
        got: usize,
    },

    #[error("{value} is not callable")]
    NotCallable { value: String },

    #[error("`{operation}` expects {expected}, got {got}")]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        got: String,
    },

    #[error("integer overflow in `{operation}`")]
    IntegerOverflow { operation: String },

    #[error("malformed `{form}`: {reason}")]
    MalformedForm { form: &'static str, reason: String },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("thread cancelled")]
    Cancelled,
}

impl EvalErrorKind {
    /// Stable diagnostic code. Syntax errors use `E1xxx`.
    pub fn code(&self) -> &'static str {
        match self {
            EvalErrorKind::UnboundReference { .. } => "E2001",
            EvalErrorKind::DuplicateDefinition { .. } => "E2002",
            EvalErrorKind::Arity { .. } => "E2003",
            EvalErrorKind::NotCallable { .. } => "E2004",
            EvalErrorKind::TypeMismatch { .. } => "E2005",
            EvalErrorKind::IntegerOverflow { .. } => "E2006",
            EvalErrorKind::MalformedForm { .. } => "E2007",
            EvalErrorKind::StepLimitExceeded { .. } => "E2008",
            EvalErrorKind::Cancelled => "E2009",
        }
    }
}

/// Evaluation error with an optional source location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    /// Attach a source span unless one is already present.
    ///
    /// Errors raised deep inside a primitive get the span of the call
    /// that applied it; an inner span is never overwritten.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[inline]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

#[cold]
pub fn unbound_reference(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnboundReference {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_definition(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateDefinition {
        name: name.to_string(),
    })
}

/// Wrong number of arguments to a callable or special form.
#[cold]
pub fn arity_mismatch(name: &str, expected: ArgCount, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Arity {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn not_callable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        value: value.describe(),
    })
}

#[cold]
pub fn type_mismatch(operation: &str, expected: &'static str, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        operation: operation.to_string(),
        expected,
        got: got.describe(),
    })
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn malformed_form(form: &'static str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedForm {
        form,
        reason: reason.into(),
    })
}

#[cold]
pub fn step_limit_exceeded(limit: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StepLimitExceeded { limit })
}

#[cold]
pub fn cancelled() -> EvalError {
    EvalError::from_kind(EvalErrorKind::Cancelled)
}
