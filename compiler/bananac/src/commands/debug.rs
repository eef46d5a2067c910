//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::io::{self, Write};

use banana_ir::{ProgramDisplay, StringInterner};
use banana_lexer::TokenKind;

use super::parse_or_report;
use crate::report::SourceFile;
use crate::Options;

/// Dump the token stream of `file`, one token per line.
pub fn lex_source(file: &SourceFile, out: &mut dyn Write) -> io::Result<bool> {
    let interner = StringInterner::new();
    let tokens = banana_lexer::lex(&file.text, &interner);

    writeln!(out, "Tokens for '{}' ({} tokens):", file.path, tokens.len())?;
    let mut ok = true;
    for token in &tokens {
        if matches!(token.kind, TokenKind::Error(_)) {
            ok = false;
        }
        writeln!(out, "  {} @ {}", token.kind.describe(&interner), token.span)?;
    }
    Ok(ok)
}

/// Parse `file` and print it back in canonical form.
pub fn parse_program(
    file: &SourceFile,
    options: &Options,
    out: &mut dyn Write,
    diagnostics: &mut dyn Write,
) -> io::Result<bool> {
    let interner = StringInterner::new();
    let color = options.color.enabled();
    let Some(program) = parse_or_report(file, &interner, color, diagnostics)? else {
        return Ok(false);
    };
    write!(out, "{}", ProgramDisplay::new(&program, &interner))?;
    Ok(true)
}
