//! `banana run`: one interleaved thread per file.

use std::io::{self, Write};

use banana_eval::{Interpreter, SharedPrintHandler, ThreadId};
use crossbeam::channel::unbounded;

use super::parse_or_report;
use crate::report::{render_eval_error, SourceFile};
use crate::Options;

/// Parse every file, then run them concurrently.
///
/// Any syntax error aborts before anything is evaluated; all syntax errors
/// are reported, not just the first. Runtime failures retire only their own
/// thread and are rendered as they are received.
pub fn run_sources(
    files: &[SourceFile],
    options: &Options,
    print_handler: SharedPrintHandler,
    diagnostics: &mut dyn Write,
) -> io::Result<bool> {
    let color = options.color.enabled();
    let (failures_tx, failures_rx) = unbounded();
    let mut interp = Interpreter::builder()
        .print_handler(print_handler)
        .step_limit(options.max_steps)
        .error_channel(failures_tx)
        .build();

    let mut programs = Vec::with_capacity(files.len());
    for file in files {
        programs.push(parse_or_report(file, interp.interner(), color, diagnostics)?);
    }
    let Some(programs) = programs.into_iter().collect::<Option<Vec<_>>>() else {
        return Ok(false);
    };

    let mut owners: Vec<(ThreadId, &SourceFile)> = Vec::with_capacity(files.len());
    for (program, file) in programs.iter().zip(files) {
        let handle = interp.spawn(program);
        owners.push((handle.id, file));
    }

    let outcomes = interp.run();
    tracing::debug!(threads = outcomes.len(), "all threads retired");

    let several = files.len() > 1;
    let mut ok = true;
    for failure in failures_rx.try_iter() {
        ok = false;
        let Some((_, file)) = owners.iter().find(|(id, _)| *id == failure.id) else {
            continue;
        };
        let thread = several.then_some(failure.id);
        let rendered = render_eval_error(file, &failure.error, thread, color);
        diagnostics.write_all(rendered.as_bytes())?;
    }
    Ok(ok)
}
