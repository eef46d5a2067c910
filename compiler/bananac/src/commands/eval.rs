//! `banana eval`: evaluate inline source.

use std::io::{self, Write};

use banana_eval::{Interpreter, SharedPrintHandler};

use super::parse_or_report;
use crate::report::{render_eval_error, SourceFile};
use crate::Options;

/// Evaluate `source` and write its final value to `out`, unless it is
/// `undefined`.
pub fn eval_source(
    source: &str,
    options: &Options,
    print_handler: SharedPrintHandler,
    out: &mut dyn Write,
    diagnostics: &mut dyn Write,
) -> io::Result<bool> {
    let color = options.color.enabled();
    let file = SourceFile::new("<eval>", source);
    let interp = Interpreter::builder()
        .print_handler(print_handler)
        .step_limit(options.max_steps)
        .build();

    let Some(program) = parse_or_report(&file, interp.interner(), color, diagnostics)? else {
        return Ok(false);
    };

    match interp.eval_program(&program) {
        Ok(value) => {
            if !value.is_undefined() {
                writeln!(out, "{value}")?;
            }
            Ok(true)
        }
        Err(error) => {
            diagnostics.write_all(render_eval_error(&file, &error, None, color).as_bytes())?;
            Ok(false)
        }
    }
}
