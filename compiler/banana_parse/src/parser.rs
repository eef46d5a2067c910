//! Recursive descent over the token stream.

use banana_ir::{Expr, Span, StringInterner};
use banana_lexer::{Token, TokenKind, TokenList};
use banana_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::SyntaxError;

/// Parser state: a cursor into the token list.
pub struct Parser<'a> {
    tokens: &'a [Token],
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            tokens: tokens.as_slice(),
            interner,
            pos: 0,
        }
    }

    /// Parse every top-level form up to end of input.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse_program(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut forms = Vec::new();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => return Ok(forms),
                TokenKind::LParen => {
                    let form = self.parse_compound(token.span)?;
                    trace!(span = %form.span, "parsed top-level form");
                    forms.push(form);
                }
                TokenKind::Error(error) => {
                    return Err(SyntaxError::InvalidToken {
                        error,
                        span: token.span,
                    })
                }
                other => {
                    return Err(SyntaxError::ExpectedOpenParen {
                        found: other.describe(self.interner),
                        span: token.span,
                    })
                }
            }
        }
    }

    /// Parse the rest of a compound form whose `(` is at `open`.
    fn parse_compound(&mut self, open: Span) -> Result<Expr, SyntaxError> {
        let mut elements = Vec::new();
        loop {
            let token = self.advance();
            let element = match token.kind {
                TokenKind::RParen => {
                    return Ok(Expr::compound(elements, open.merge(token.span)));
                }
                TokenKind::LParen => {
                    ensure_sufficient_stack(|| self.parse_compound(token.span))?
                }
                TokenKind::Int(value) => Expr::number(value, token.span),
                TokenKind::Str(text) => Expr::string(text, token.span),
                TokenKind::Symbol(name) => Expr::reference(name, token.span),
                TokenKind::Error(error) => {
                    return Err(SyntaxError::InvalidToken {
                        error,
                        span: token.span,
                    })
                }
                TokenKind::Eof => {
                    return Err(SyntaxError::UnexpectedEof {
                        open,
                        span: token.span,
                    })
                }
            };
            elements.push(element);
        }
    }

    /// Take the current token and move past it. Sticks at `Eof`.
    fn advance(&mut self) -> Token {
        let token = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }
}
