use super::protein::Protein;
use crate::core::io::warnings::ParseWarning;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProteinFileType {
    StaticStructure,
    DynamicStructure,
}

impl fmt::Display for ProteinFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProteinFileType::StaticStructure => "static structure",
            ProteinFileType::DynamicStructure => "dynamic structure",
        })
    }
}

/// File-level metadata gathered alongside the atomic model.
///
/// Fields that are already populated (for example from a database fetch made
/// before the file was parsed) are never overwritten by values found in the
/// file itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProteinFileInfo {
    pub pdb_id: Option<String>,
    pub description: Option<String>,
    pub authors: Option<String>,
    pub source_lines: Option<Vec<String>>,
    pub warnings: Vec<ParseWarning>,
}

impl ProteinFileInfo {
    /// Line numbers (1-based) that produced a parse warning, in encounter order.
    pub fn warning_indices(&self) -> Vec<usize> {
        self.warnings.iter().map(|w| w.line).collect()
    }

    /// The author field split on commas, trimmed, without empty entries.
    pub fn author_list(&self) -> Vec<String> {
        self.authors
            .as_deref()
            .map(|authors| {
                authors
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A fully parsed structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinFile {
    pub file_name: String,
    pub file_extension: String,
    pub byte_size: usize,
    pub file_info: ProteinFileInfo,
    pub models: Vec<Protein>,
}

impl ProteinFile {
    /// `DynamicStructure` when any model carries more than one configuration.
    pub fn file_type(&self) -> ProteinFileType {
        if self.models.iter().any(Protein::is_trajectory) {
            ProteinFileType::DynamicStructure
        } else {
            ProteinFileType::StaticStructure
        }
    }

    /// Atoms per configuration summed across models.
    pub fn total_atom_count(&self) -> usize {
        self.models.iter().map(Protein::atom_count).sum()
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.file_info.warnings
    }
}
