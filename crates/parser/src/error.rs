use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid character")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("unknown escape sequence")]
    InvalidEscape,
    #[error("string literal not terminated")]
    UnterminatedString,
    #[error("raw string literal not terminated")]
    UnterminatedRawString,
    #[error("rune literal not terminated")]
    UnterminatedRune,
    #[error("comment not terminated")]
    UnterminatedComment,
    #[error("illegal byte order mark")]
    MisplacedBom,
    #[error("illegal UTF-8 encoding")]
    InvalidUtf8,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// One syntax error, positioned in the buffer it was reported against.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub kind: DiagKind,
    pub span: Span,
    /// 1-based line.
    pub line: u32,
    /// 1-based byte column.
    pub column: u32,
    pub message: String,
}

/// Errors of one parse, in source order.
#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{}", render_list(.0))]
pub struct ErrorList(pub Vec<SyntaxError>);

fn render_list(errors: &[SyntaxError]) -> String {
    match errors {
        [] => "no errors".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more errors)", rest.len()),
    }
}

impl ErrorList {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> {
        self.0.iter()
    }

    /// Sorts by position; errors at the same offset keep report order.
    pub fn sort(&mut self) {
        self.0.sort_by_key(|e| (e.span.start, e.span.end));
    }

    /// Keeps only the first error of each line.
    pub fn remove_multiples(&mut self) {
        self.sort();
        self.0.dedup_by_key(|e| e.line);
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a SyntaxError;
    type IntoIter = std::slice::Iter<'a, SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
