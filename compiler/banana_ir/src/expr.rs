//! The expression tree.
//!
//! Parsing produces a `Vec<Expr>` of top-level forms. Trees are immutable
//! once built; compound children sit behind `Rc<[Expr]>` so the evaluator
//! can keep a closure body or a pending `if` branch alive cheaply.

use std::fmt;
use std::mem;
use std::rc::Rc;

use banana_stack::ensure_sufficient_stack;

use crate::{Name, Span, StringInterner};

/// A parsed expression with its source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// Integer literal: `42`, `-7`.
    Number(i64),
    /// String literal, unescaped and interned: `"hello"`.
    Str(Name),
    /// Symbol reference: `x`, `+`, `fac`.
    Reference(Name),
    /// Parenthesized list: a special form or a call. May be empty.
    Compound(Rc<[Expr]>),
}

impl Expr {
    pub fn number(value: i64, span: Span) -> Self {
        Expr {
            kind: ExprKind::Number(value),
            span,
        }
    }

    pub fn string(text: Name, span: Span) -> Self {
        Expr {
            kind: ExprKind::Str(text),
            span,
        }
    }

    pub fn reference(name: Name, span: Span) -> Self {
        Expr {
            kind: ExprKind::Reference(name),
            span,
        }
    }

    pub fn compound(elements: Vec<Expr>, span: Span) -> Self {
        Expr {
            kind: ExprKind::Compound(elements.into()),
            span,
        }
    }

    /// The symbol this expression names, if it is a reference.
    #[inline]
    pub fn as_reference(&self) -> Option<Name> {
        match self.kind {
            ExprKind::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// The shared children of a compound expression.
    #[inline]
    pub fn elements(&self) -> Option<&Rc<[Expr]>> {
        match &self.kind {
            ExprKind::Compound(elements) => Some(elements),
            _ => None,
        }
    }

    /// Short noun for error messages ("expected a symbol, found a number").
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ExprKind::Number(_) => "a number",
            ExprKind::Str(_) => "a string",
            ExprKind::Reference(_) => "a symbol",
            ExprKind::Compound(_) => "a list",
        }
    }

    /// Render this expression back to source text.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ExprDisplay<'a> {
        ExprDisplay {
            expr: self,
            interner,
        }
    }
}

/// Trees are torn down with a worklist; the derived drop would recurse once
/// per nesting level.
impl Drop for Expr {
    fn drop(&mut self) {
        let ExprKind::Compound(elements) = &mut self.kind else {
            return;
        };
        let mut pending = Vec::new();
        detach_children(elements, &mut pending);
        while let Some(mut elements) = pending.pop() {
            detach_children(&mut elements, &mut pending);
        }
    }
}

/// Move the compound children of `elements` onto `pending`, leaving
/// placeholder leaves behind. Shared lists are left alone; their last owner
/// tears them down.
fn detach_children(elements: &mut Rc<[Expr]>, pending: &mut Vec<Rc<[Expr]>>) {
    let Some(children) = Rc::get_mut(elements) else {
        return;
    };
    for child in children {
        if let ExprKind::Compound(inner) = mem::replace(&mut child.kind, ExprKind::Number(0)) {
            pending.push(inner);
        }
    }
}

/// Pretty-printer for a single expression.
pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    interner: &'a StringInterner,
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr.kind {
            ExprKind::Number(value) => write!(f, "{value}"),
            ExprKind::Reference(name) => f.write_str(self.interner.lookup(*name)),
            ExprKind::Str(text) => write_escaped(f, self.interner.lookup(*text)),
            ExprKind::Compound(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    ensure_sufficient_stack(|| write!(f, "{}", element.display(self.interner)))?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Pretty-printer for a whole program, one top-level form per line.
pub struct ProgramDisplay<'a> {
    exprs: &'a [Expr],
    interner: &'a StringInterner,
}

impl<'a> ProgramDisplay<'a> {
    pub fn new(exprs: &'a [Expr], interner: &'a StringInterner) -> Self {
        ProgramDisplay { exprs, interner }
    }
}

impl fmt::Display for ProgramDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for expr in self.exprs {
            writeln!(f, "{}", expr.display(self.interner))?;
        }
        Ok(())
    }
}
