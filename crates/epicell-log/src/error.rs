//! Error types for state logging.

use std::fmt;
use std::io;

use epicell_core::CellId;

/// Errors that can occur while writing or reading a state log.
#[derive(Debug)]
pub enum LogError {
    /// An I/O error from the underlying writer or reader.
    Io(io::Error),
    /// The cell id contains a separator or line break and cannot be
    /// written as a single field.
    UnrepresentableId {
        /// The offending id.
        cell: CellId,
    },
    /// The stream does not start with the expected two header lines.
    MalformedHeader {
        /// 1-based line number.
        line: usize,
        /// What was found instead.
        found: String,
    },
    /// A data row could not be parsed.
    MalformedRow {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        detail: String,
    },
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnrepresentableId { cell } => {
                write!(f, "cell id '{cell}' contains a separator or line break")
            }
            Self::MalformedHeader { line, found } => {
                write!(f, "malformed log header at line {line}: found '{found}'")
            }
            Self::MalformedRow { line, detail } => {
                write!(f, "malformed log row at line {line}: {detail}")
            }
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
