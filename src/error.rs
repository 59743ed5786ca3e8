use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lex;

/// The error type for KDL: this is returned when a document fails to
/// parse, or when a conversion hook rejects a value.
///
/// This diagnostic implements [`miette::Diagnostic`] and can be used to
/// display detailed, pretty-printed diagnostic messages when using
/// [`miette::Result`] and the `"fancy"` feature flag for `miette`:
///
/// ```no_run
/// fn main() -> miette::Result<()> {
///     "foo 1.".parse::<kdl_canon::KdlDocument>()?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct KdlParseError {
    /// Original input that this failure came from.
    #[source_code]
    pub input: Arc<String>,

    /// Offset of the error in the input.
    #[label("here")]
    pub span: SourceSpan,

    /// 1-indexed line of the error.
    pub line: usize,

    /// 1-indexed column of the error.
    pub column: usize,

    /// What went wrong.
    pub message: String,
}

impl KdlParseError {
    pub(crate) fn new(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_col(input, offset);
        let len = input[offset.min(input.len())..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        KdlParseError {
            input: Arc::new(input.into()),
            span: SourceSpan::new(offset.into(), len),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Determines the 1-indexed line and column of a byte offset. Every
/// newline form counts as a single break; CRLF counts once.
fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    let mut chars = input[..offset.min(input.len())].chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
        }
        if lex::is_newline_char(c) {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// An opaque handle given to conversion hooks. It exposes the exact
/// source text of the fragment being converted, and acts as a factory
/// for errors positioned at that fragment.
#[derive(Debug, Clone)]
pub struct ParseFragment<'a> {
    pub(crate) fragment: &'a str,
    pub(crate) input: &'a str,
    pub(crate) offset: usize,
}

impl ParseFragment<'_> {
    /// The raw source text of the value or node this fragment refers to.
    pub fn fragment(&self) -> &str {
        self.fragment
    }

    /// Builds a [`KdlParseError`] positioned at this fragment. Returning
    /// it from a conversion hook aborts the parse.
    pub fn error(&self, message: impl Into<String>) -> KdlParseError {
        KdlParseError::new(self.input, self.offset, message)
    }
}
