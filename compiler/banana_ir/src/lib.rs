//! Banana IR - shared data types for the Banana interpreter.
//!
//! This crate contains the data produced by the front end and consumed by
//! the evaluator:
//! - Spans for source locations
//! - Names for interned identifiers and string literals
//! - The `Expr` tree produced by the parser
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: symbols and string literals become `Name(u32)`
//! - **Share, don't copy**: compound children live behind `Rc<[Expr]>`, so
//!   the evaluator can hold on to sub-trees (closure bodies, pending
//!   branches) with a reference-count bump instead of a deep clone.

mod expr;
mod interner;
mod name;
mod span;

pub use expr::{Expr, ExprDisplay, ExprKind, ProgramDisplay};
pub use interner::{well_known, SharedInterner, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
