//! Lexer for Banana source text.
//!
//! Turns source into a flat `TokenList`: brackets, integer literals, string
//! literals and symbols, each with a byte span. Lexing never fails as a
//! whole; malformed input becomes a `TokenKind::Error` token and the parser
//! decides how to report it.
//!
//! Atom rules:
//! - `-?[0-9]+` is an integer
//! - anything else starting with a digit is invalid (`12ab`)
//! - everything else is a symbol (`+`, `-`, `fac2`, `set!`)

mod token;

use banana_ir::{Span, StringInterner};
use logos::Logos;

pub use token::{LexError, Token, TokenKind, TokenList};

/// Raw token from logos (before classification and interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|;[^\n]*)")] // whitespace and `;` line comments
enum RawToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // Longest match keeps this from shadowing `String`.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    #[regex(r#"[^ \t\r\n\f()";]+"#)]
    Atom,
}

/// Lex all tokens from `source`, interning symbols and string literals.
///
/// The returned list always ends with an `Eof` token.
pub fn lex(source: &str, interner: &StringInterner) -> TokenList {
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = span_of(logos.span());
        let slice = logos.slice();

        let kind = match result {
            Ok(RawToken::LParen) => TokenKind::LParen,
            Ok(RawToken::RParen) => TokenKind::RParen,
            Ok(RawToken::String) => {
                // Strip the quotes; escapes are resolved before interning.
                match unescape(&slice[1..slice.len() - 1]) {
                    Ok(text) => TokenKind::Str(interner.intern(&text)),
                    Err(error) => TokenKind::Error(error),
                }
            }
            Ok(RawToken::UnterminatedString) => TokenKind::Error(LexError::UnterminatedString),
            Ok(RawToken::Atom) => classify_atom(slice, interner),
            Err(()) => TokenKind::Error(LexError::UnexpectedChar(
                slice.chars().next().unwrap_or('\0'),
            )),
        };
        tokens.push(Token::new(kind, span));
    }

    let eof = span_of(source.len()..source.len());
    tokens.push(Token::new(TokenKind::Eof, eof));
    TokenList::new(tokens)
}

fn span_of(range: std::ops::Range<usize>) -> Span {
    // Sources over 4 GiB collapse to a point at the limit instead of failing.
    Span::try_from_range(range).unwrap_or(Span::point(u32::MAX))
}

fn classify_atom(slice: &str, interner: &StringInterner) -> TokenKind {
    let digits = slice.strip_prefix('-').unwrap_or(slice);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return match slice.parse::<i64>() {
            Ok(value) => TokenKind::Int(value),
            Err(_) => TokenKind::Error(LexError::IntegerOutOfRange),
        };
    }

    if slice.starts_with(|c: char| c.is_ascii_digit()) {
        return TokenKind::Error(LexError::InvalidAtom);
    }

    TokenKind::Symbol(interner.intern(slice))
}

fn unescape(content: &str) -> Result<String, LexError> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => return Err(LexError::InvalidEscape(other)),
            // The string regex never ends on a lone backslash.
            None => return Err(LexError::UnterminatedString),
        }
    }
    Ok(out)
}
