use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarningKind {
    #[error("Line is too short for an atom record ({length} chars, expected at least {expected})")]
    LineTooShort { length: usize, expected: usize },
    #[error("Invalid residue number '{value}'")]
    InvalidResidueNumber { value: String },
    #[error("Invalid {axis} coordinate '{value}'")]
    InvalidCoordinate { axis: char, value: String },
    #[error("Unrecognized residue code '{code}'")]
    UnrecognizedResidue { code: String },
    #[error("Frame does not match the first frame ({found} atoms, expected {expected} with identical elements)")]
    InconsistentFrame { expected: usize, found: usize },
    #[error("Invalid energy value '{value}'")]
    InvalidEnergy { value: String },
}

/// A recoverable problem tied to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseWarning {
    pub line: usize,
    pub kind: ParseWarningKind,
}

impl ParseWarning {
    pub fn new(line: usize, kind: ParseWarningKind) -> Self {
        Self { line, kind }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
