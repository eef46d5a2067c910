//! Command handlers for the `banana` binary.
//!
//! Each handler takes already-read sources and the sinks to write to, and
//! returns whether it succeeded. `main` maps that onto the exit code.

mod debug;
mod eval;
mod run;

pub use debug::{lex_source, parse_program};
pub use eval::eval_source;
pub use run::run_sources;

use std::io::{self, Write};

use banana_ir::{Expr, StringInterner};

use crate::report::{render_syntax_error, SourceFile};

/// Parse `file`, rendering a diagnostic to `diagnostics` on failure.
pub(crate) fn parse_or_report(
    file: &SourceFile,
    interner: &StringInterner,
    color: bool,
    diagnostics: &mut dyn Write,
) -> io::Result<Option<Vec<Expr>>> {
    match banana_parse::parse_source(&file.text, interner) {
        Ok(program) => Ok(Some(program)),
        Err(error) => {
            tracing::debug!(path = %file.path, %error, "syntax error");
            diagnostics.write_all(render_syntax_error(file, &error, color).as_bytes())?;
            Ok(None)
        }
    }
}
