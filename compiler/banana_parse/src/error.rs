//! Syntax errors.

use banana_ir::Span;
use banana_lexer::LexError;

/// A malformed program. Fatal: reported before any evaluation starts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// A top-level form did not start with `(`.
    #[error("expected `(` to start a form, found {found}")]
    ExpectedOpenParen { found: String, span: Span },

    /// Input ended inside an open form.
    #[error("unexpected end of input, expected `)`")]
    UnexpectedEof {
        /// The `(` that was never closed.
        open: Span,
        span: Span,
    },

    /// The lexer could not make sense of this text.
    #[error("{error}")]
    InvalidToken { error: LexError, span: Span },
}

impl SyntaxError {
    /// Primary source location of the error.
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::ExpectedOpenParen { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::InvalidToken { span, .. } => *span,
        }
    }

    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            SyntaxError::ExpectedOpenParen { .. } => "E1001",
            SyntaxError::UnexpectedEof { .. } => "E1002",
            SyntaxError::InvalidToken { .. } => "E1003",
        }
    }

    /// Secondary location worth pointing at, with a label.
    pub fn related(&self) -> Option<(Span, &'static str)> {
        match self {
            SyntaxError::UnexpectedEof { open, .. } => Some((*open, "unclosed `(` opened here")),
            _ => None,
        }
    }
}
