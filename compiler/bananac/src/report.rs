//! Diagnostic rendering with `ariadne`.

use std::ops::Range;

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use banana_eval::{EvalError, ThreadId};
use banana_ir::Span;
use banana_parse::SyntaxError;

/// A source file as the driver sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read `path`, turning I/O failures into a user-facing message.
    pub fn read(path: &str) -> Result<Self, String> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(SourceFile::new(path, text)),
            Err(e) => Err(match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            }),
        }
    }

    /// Byte range of `span`, clamped to the file.
    fn range(&self, span: Span) -> Range<usize> {
        let len = self.text.len();
        let range = span.to_range();
        range.start.min(len)..range.end.min(len)
    }
}

/// Everything a rendered diagnostic needs.
struct Diagnostic<'a> {
    code: &'static str,
    message: String,
    primary: Option<(Span, String)>,
    secondary: Option<(Span, &'a str)>,
    note: Option<String>,
}

pub fn render_syntax_error(file: &SourceFile, error: &SyntaxError, color: bool) -> String {
    let label = match error {
        SyntaxError::ExpectedOpenParen { .. } => "every top-level form must be a list",
        SyntaxError::UnexpectedEof { .. } => "input ends here",
        SyntaxError::InvalidToken { .. } => "not a valid token",
    };
    render(
        file,
        &Diagnostic {
            code: error.code(),
            message: error.to_string(),
            primary: Some((error.span(), label.to_string())),
            secondary: error.related(),
            note: None,
        },
        color,
    )
}

/// Render a runtime error. `thread` names the failing thread when more than
/// one program was running.
pub fn render_eval_error(
    file: &SourceFile,
    error: &EvalError,
    thread: Option<ThreadId>,
    color: bool,
) -> String {
    render(
        file,
        &Diagnostic {
            code: error.code(),
            message: error.to_string(),
            primary: error.span.map(|span| (span, error.kind.to_string())),
            secondary: None,
            note: thread.map(|id| format!("raised in thread {id}")),
        },
        color,
    )
}

fn render(file: &SourceFile, diag: &Diagnostic<'_>, color: bool) -> String {
    let path = file.path.clone();
    let offset = diag
        .primary
        .as_ref()
        .map_or(0, |(span, _)| file.range(*span).start);

    let mut builder = Report::build(ReportKind::Error, path.clone(), offset)
        .with_code(diag.code)
        .with_message(&diag.message)
        .with_config(
            Config::default()
                .with_color(color)
                .with_index_type(IndexType::Byte),
        );
    if let Some((span, message)) = &diag.primary {
        builder = builder.with_label(
            Label::new((path.clone(), file.range(*span)))
                .with_message(message)
                .with_order(0),
        );
    }
    if let Some((span, message)) = diag.secondary {
        builder = builder.with_label(
            Label::new((path.clone(), file.range(span)))
                .with_message(message)
                .with_order(1),
        );
    }
    if let Some(note) = &diag.note {
        builder = builder.with_note(note);
    }

    let mut out = Vec::new();
    let written = builder
        .finish()
        .write((path, Source::from(file.text.clone())), &mut out);
    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        // Fall back to a plain one-liner if the renderer gives up.
        Err(_) => format!("error[{}]: {}\n", diag.code, diag.message),
    }
}
