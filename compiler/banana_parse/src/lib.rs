//! Parser for Banana programs.
//!
//! Consumes a `TokenList` and produces the top-level forms of a program as
//! `Expr` trees. A program is a sequence of parenthesized forms; atoms are
//! only legal inside a form.
//!
//! Parsing is all-or-nothing: the first problem aborts with a
//! [`SyntaxError`] and nothing is evaluated.

mod error;
mod parser;

use banana_ir::{Expr, StringInterner};
use banana_lexer::TokenList;

pub use error::SyntaxError;
pub use parser::Parser;

/// Parse a lexed program.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<Vec<Expr>, SyntaxError> {
    Parser::new(tokens, interner).parse_program()
}

/// Lex and parse source text in one go.
pub fn parse_source(source: &str, interner: &StringInterner) -> Result<Vec<Expr>, SyntaxError> {
    let tokens = banana_lexer::lex(source, interner);
    parse(&tokens, interner)
}
