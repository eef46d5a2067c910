//! Token types produced by the lexer.

use std::fmt::Write as _;

use banana_ir::{Name, Span, StringInterner};

/// Why a stretch of source could not be turned into a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown escape sequence `\\{0}`")]
    InvalidEscape(char),
    #[error("integer literal does not fit in 64 bits")]
    IntegerOutOfRange,
    #[error("symbols cannot start with a digit")]
    InvalidAtom,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    Int(i64),
    Str(Name),
    Symbol(Name),
    Error(LexError),
    Eof,
}

impl TokenKind {
    /// Describe the token for diagnostics and the `lex` dump.
    pub fn describe(&self, interner: &StringInterner) -> String {
        match self {
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Int(value) => format!("integer `{value}`"),
            TokenKind::Str(text) => {
                let mut out = String::from("string ");
                let _ = write!(out, "{:?}", interner.lookup(*text));
                out
            }
            TokenKind::Symbol(name) => format!("symbol `{}`", interner.lookup(*name)),
            TokenKind::Error(error) => format!("invalid token ({error})"),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output. The final token is always `Eof`.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenList { tokens }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
