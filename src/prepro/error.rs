//! Stage errors and the facade-level wrapper
//!
//! Any stage can raise a [`PpError`]; the pipeline does not catch or retry,
//! so the first error aborts the whole run with no partial output. The
//! facade is the single translation point: it wraps the stage error in a
//! [`PreprocessError`] that names the first root file of the batch while
//! preserving the original kind, path, and line as its cause.

use std::error::Error;
use std::fmt;

/// Classification of a fatal preprocessing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpErrorKind {
    /// An include chain reached a file already being expanded.
    CyclicInclude,
    /// The content provider could not resolve an include target.
    UnresolvedInclude,
    /// A second `#else` inside one conditional block.
    DuplicateElse,
    /// `#endif` (or `#else`) with no open conditional block.
    UnmatchedEndif,
    /// End of file with conditional blocks still open.
    UnterminatedConditional,
    /// `#error` directive reached in a taken branch.
    UserError,
    /// A recognized directive with unparseable syntax.
    MalformedDirective,
}

impl fmt::Display for PpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PpErrorKind::CyclicInclude => "cyclic include",
            PpErrorKind::UnresolvedInclude => "unresolved include",
            PpErrorKind::DuplicateElse => "duplicate #else",
            PpErrorKind::UnmatchedEndif => "unmatched #endif",
            PpErrorKind::UnterminatedConditional => "unterminated conditional",
            PpErrorKind::UserError => "user error",
            PpErrorKind::MalformedDirective => "malformed directive",
        };
        f.write_str(name)
    }
}

/// A fatal error raised by a directive stage, located at the directive's
/// original (path, line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpError {
    pub kind: PpErrorKind,
    pub message: String,
    pub path: String,
    pub line: u32,
}

impl PpError {
    pub fn new(
        kind: PpErrorKind,
        message: impl Into<String>,
        path: impl Into<String>,
        line: u32,
    ) -> Self {
        PpError {
            kind,
            message: message.into(),
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for PpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.path, self.line, self.kind, self.message
        )
    }
}

impl Error for PpError {}

/// The user-facing error returned by the facade: names the first root file
/// of the failed batch and keeps the originating stage error as its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessError {
    pub root: String,
    pub cause: PpError,
}

impl PreprocessError {
    pub fn new(root: impl Into<String>, cause: PpError) -> Self {
        PreprocessError {
            root: root.into(),
            cause,
        }
    }
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to preprocess '{}': {}",
            self.root, self.cause
        )
    }
}

impl Error for PreprocessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}
