use std::io;
use thiserror::Error;

/// File-level failures. Per-line problems are reported as
/// [`ParseWarning`](super::warnings::ParseWarning)s instead and never abort a parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No atoms could be read from the input")]
    EmptyAtomCount,
    #[error("Unsupported structure format: '{extension}'")]
    UnsupportedFormat { extension: String },
    #[error("Parsing was cancelled")]
    Cancelled,
}
