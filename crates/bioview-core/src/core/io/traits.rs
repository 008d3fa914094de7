use super::error::ParseError;
use crate::core::models::file::{ProteinFile, ProteinFileInfo};
use crate::core::models::protein::Protein;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// A classified record tagged with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord<T> {
    pub line: usize,
    pub record: T,
}

impl<T> LineRecord<T> {
    pub fn new(line: usize, record: T) -> Self {
        Self { line, record }
    }
}

/// The models and metadata recovered from one structure text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStructure {
    pub models: Vec<Protein>,
    pub file_info: ProteinFileInfo,
}

impl ParsedStructure {
    /// Wraps the parsed content with file identity information.
    pub fn into_file(self, file_name: &str, file_extension: &str, byte_size: usize) -> ProteinFile {
        ProteinFile {
            file_name: file_name.to_string(),
            file_extension: file_extension.to_string(),
            byte_size,
            file_info: self.file_info,
            models: self.models,
        }
    }
}

/// Defines a line-oriented structure format as two separable stages.
///
/// Parsing is split into a stateless per-line [`classify_line`](Self::classify_line)
/// step, which may run on any thread and in any order, and a single sequential
/// [`assemble`](Self::assemble) pass over the records in line order, which owns
/// every decision that depends on preceding records (residue transitions,
/// chain and model boundaries, trajectory frames).
pub trait StructureFormat {
    /// The classified form of one meaningful input line.
    type Record: Send;

    /// Human-readable format name.
    const NAME: &'static str;

    /// Lower-case file extensions recognized for this format.
    const EXTENSIONS: &'static [&'static str];

    /// Classifies one line. Returns `None` for lines that carry nothing of interest.
    fn classify_line(line: &str) -> Option<Self::Record>;

    /// Builds the models from records sorted by line number.
    ///
    /// # Arguments
    ///
    /// * `records` - Classified records in ascending line order.
    /// * `source_lines` - The raw input lines, retained for re-display.
    /// * `prior_info` - Metadata already known from elsewhere; its populated fields win.
    ///
    /// # Return
    ///
    /// Returns the assembled models and the merged file metadata, including warnings.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyAtomCount`] if no atom survived parsing.
    fn assemble(
        records: Vec<LineRecord<Self::Record>>,
        source_lines: &[&str],
        prior_info: Option<ProteinFileInfo>,
    ) -> Result<ParsedStructure, ParseError>;

    /// Classifies and assembles the whole text on the calling thread.
    fn parse_serial(
        text: &str,
        prior_info: Option<ProteinFileInfo>,
    ) -> Result<ParsedStructure, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let records = lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                Self::classify_line(line).map(|record| LineRecord::new(index + 1, record))
            })
            .collect();
        Self::assemble(records, &lines, prior_info)
    }

    /// Reads the full contents of `reader` and parses them serially.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or if parsing yields no atoms.
    fn read_from(reader: &mut impl BufRead) -> Result<ParsedStructure, ParseError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_serial(&text, None)
    }

    /// Reads and parses a file, filling in its name, extension and size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if parsing yields no atoms.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ProteinFile, ParseError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let (file_name, file_extension) = file_identity(path);
        Ok(Self::parse_serial(&text, None)?.into_file(&file_name, &file_extension, text.len()))
    }
}

/// The supported structure formats, resolved from file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Pdb,
    Xyz,
}

impl FileFormat {
    /// Resolves an extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Result<Self, ParseError> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        if super::pdb::PdbFormat::EXTENSIONS.contains(&normalized.as_str()) {
            Ok(FileFormat::Pdb)
        } else if super::xyz::XyzFormat::EXTENSIONS.contains(&normalized.as_str()) {
            Ok(FileFormat::Xyz)
        } else {
            Err(ParseError::UnsupportedFormat {
                extension: extension.to_string(),
            })
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        Self::from_extension(&file_identity(path).1)
    }

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Pdb => super::pdb::PdbFormat::NAME,
            FileFormat::Xyz => super::xyz::XyzFormat::NAME,
        }
    }
}

/// File stem and extension of `path`, each empty when absent.
pub fn file_identity(path: &Path) -> (String, String) {
    let file_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_extension = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (file_name, file_extension)
}
