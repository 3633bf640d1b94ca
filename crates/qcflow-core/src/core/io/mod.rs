//! Parsers for the file formats this library reads.
//!
//! Two formats are handled: the XYZ positional geometry format ([`xyz`]) and
//! the loosely structured text logs written by the external engine ([`log`]).
//! Both share a two-tier error model: a [`LineFormatError`] describes a
//! single malformed line and never crosses a parser's public boundary on its
//! own; it is always wrapped into a [`FileFormatError`] carrying the filename
//! and line number before being returned to callers.

pub mod log;
pub mod xyz;

use thiserror::Error;

/// A single-line parse failure.
///
/// Internal to the parsers: callers only ever see these wrapped inside a
/// [`FileFormatError`] with line context attached.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LineFormatError {
    #[error("incorrect number of tokens (found {found}, expected {expected})")]
    TokenCount { found: usize, expected: usize },
    #[error("invalid numeric value '{value}'")]
    InvalidNumber { value: String },
    #[error("unknown element symbol '{symbol}'")]
    UnknownElement { symbol: String },
}

/// The file-level classification of a parse failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FileErrorKind {
    /// A malformed line, re-wrapped with file context.
    #[error(transparent)]
    Line(LineFormatError),
    /// The file ended before the mandatory count and comment lines.
    #[error("missing atom count or comment line")]
    MissingHeader,
    /// The declared atom count could not be parsed.
    #[error("invalid atom count '{0}'")]
    InvalidAtomCount(String),
    /// Declared and parsed atom counts disagree.
    #[error("incorrect number of atom lines (found {found}, expected {declared})")]
    AtomCount { found: usize, declared: usize },
    /// No recognizable energy marker anywhere in an engine log.
    #[error("reached end of file without finding an energy")]
    MissingEnergy,
    /// The spin-component section header was not found.
    #[error("no spin component section found")]
    MissingSpinComponents,
    /// The file could not be read at all.
    #[error("{0}")]
    Io(String),
}

/// A file-level parse failure: what went wrong, in which file, at which line.
///
/// This is the only error type the parsers expose. It is `Clone` so that the
/// lazily computed fields of [`log::LogFile`] can cache a failure as a
/// permanent outcome.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("error reading {filename}, line {line}: {kind}")]
pub struct FileFormatError {
    pub filename: String,
    pub line: usize,
    pub kind: FileErrorKind,
}

impl FileFormatError {
    pub(crate) fn new(filename: &str, line: usize, kind: FileErrorKind) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            kind,
        }
    }

    pub(crate) fn io(filename: &str, err: std::io::Error) -> Self {
        Self::new(filename, 0, FileErrorKind::Io(err.to_string()))
    }
}
