use super::error::ParseError;
use super::traits::{LineRecord, ParsedStructure, StructureFormat};
use super::warnings::{ParseWarning, ParseWarningKind};
use crate::core::models::builder::ProteinBuilder;
use crate::core::models::element::AtomElement;
use crate::core::models::file::ProteinFileInfo;
use crate::core::models::protein::{Position, Protein};
use crate::core::models::residue::{Residue, is_solvent};
use std::mem;
use tracing::{debug, trace};

/// Fixed column layout of the PDB records this parser reads (0-based, half-open).
pub mod columns {
    use std::ops::Range;

    /// Atom records shorter than this are rejected: the element symbol ends here.
    pub const MIN_ATOM_LINE_LENGTH: usize = 78;
    /// Width of the record keyword field preceding free text in TITLE/AUTHOR.
    pub const KEYWORD_LENGTH: usize = 10;

    pub const PDB_ID: Range<usize> = 62..66;
    pub const RESIDUE_NAME: Range<usize> = 17..20;
    pub const CHAIN_ID: Range<usize> = 21..22;
    pub const RESIDUE_NUMBER: Range<usize> = 22..26;
    pub const X: Range<usize> = 30..38;
    pub const Y: Range<usize> = 38..46;
    pub const Z: Range<usize> = 46..54;
    pub const ELEMENT: Range<usize> = 76..78;
}

fn slice_and_trim(line: &str, range: std::ops::Range<usize>) -> &str {
    line.get(range).unwrap_or("").trim()
}

/// A decoded ATOM/HETATM line. Field failures are kept so the sequential pass
/// can report them in line order and apply them at the right point.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomLine {
    pub residue_number: Result<i32, String>,
    pub residue_name: String,
    pub element: AtomElement,
    pub position: Result<Position, ParseWarningKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdbRecord {
    Atom(AtomLine),
    TruncatedAtom { length: usize },
    ChainTerminator,
    ModelEnd,
    Header { pdb_id: Option<String> },
    Title(String),
    Author(String),
}

pub struct PdbFormat;

impl PdbFormat {
    fn decode_atom(line: &str) -> PdbRecord {
        if line.len() < columns::MIN_ATOM_LINE_LENGTH {
            return PdbRecord::TruncatedAtom { length: line.len() };
        }

        let residue_number_str = slice_and_trim(line, columns::RESIDUE_NUMBER);
        let residue_number = residue_number_str
            .parse::<i32>()
            .map_err(|_| residue_number_str.to_string());

        PdbRecord::Atom(AtomLine {
            residue_number,
            residue_name: slice_and_trim(line, columns::RESIDUE_NAME).to_string(),
            element: AtomElement::from_symbol(slice_and_trim(line, columns::ELEMENT)),
            position: Self::decode_position(line),
        })
    }

    fn decode_position(line: &str) -> Result<Position, ParseWarningKind> {
        let coordinate = |axis: char, range| {
            let value = slice_and_trim(line, range);
            value
                .parse::<f32>()
                .map_err(|_| ParseWarningKind::InvalidCoordinate {
                    axis,
                    value: value.to_string(),
                })
        };
        let x = coordinate('x', columns::X)?;
        let y = coordinate('y', columns::Y)?;
        let z = coordinate('z', columns::Z)?;
        // Source files are right-handed; consumers use a left-handed frame.
        Ok(Position::new(x, y, -z))
    }

    fn free_text(line: &str) -> String {
        line.get(columns::KEYWORD_LENGTH..)
            .unwrap_or("")
            .trim_end()
            .to_string()
    }
}

impl StructureFormat for PdbFormat {
    type Record = PdbRecord;

    const NAME: &'static str = "PDB";
    const EXTENSIONS: &'static [&'static str] = &["pdb", "ent"];

    fn classify_line(line: &str) -> Option<PdbRecord> {
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            Some(Self::decode_atom(line))
        } else if line.starts_with("TER") {
            Some(PdbRecord::ChainTerminator)
        } else if line.starts_with("ENDMDL") {
            Some(PdbRecord::ModelEnd)
        } else if line.starts_with("HEADER") {
            let pdb_id = slice_and_trim(line, columns::PDB_ID);
            Some(PdbRecord::Header {
                pdb_id: (!pdb_id.is_empty()).then(|| pdb_id.to_string()),
            })
        } else if line.starts_with("TITLE") {
            Some(PdbRecord::Title(Self::free_text(line)))
        } else if line.starts_with("AUTHOR") {
            Some(PdbRecord::Author(Self::free_text(line)))
        } else {
            None
        }
    }

    fn assemble(
        records: Vec<LineRecord<PdbRecord>>,
        source_lines: &[&str],
        prior_info: Option<ProteinFileInfo>,
    ) -> Result<ParsedStructure, ParseError> {
        let mut assembler = PdbAssembler::new(prior_info.unwrap_or_default());
        for LineRecord { line, record } in records {
            assembler.apply(line, record);
        }
        assembler.finish(source_lines)
    }
}

/// Residue state carried from one atom record to the next.
#[derive(Debug, Default)]
struct ResidueCursor {
    number: Option<i32>,
    residue: Option<Residue>,
    is_solvent: bool,
}

struct PdbAssembler {
    builder: ProteinBuilder,
    cursor: ResidueCursor,
    models: Vec<Protein>,
    info: ProteinFileInfo,
    keep_description: bool,
    keep_authors: bool,
    warnings: Vec<ParseWarning>,
}

impl PdbAssembler {
    fn new(prior: ProteinFileInfo) -> Self {
        Self {
            builder: ProteinBuilder::new().track_residues(),
            cursor: ResidueCursor::default(),
            models: Vec::new(),
            keep_description: prior.description.is_some(),
            keep_authors: prior.authors.is_some(),
            warnings: prior.warnings.clone(),
            info: prior,
        }
    }

    fn warn(&mut self, line: usize, kind: ParseWarningKind) {
        trace!(line, "Recoverable PDB line problem: {}", kind);
        self.warnings.push(ParseWarning::new(line, kind));
    }

    fn apply(&mut self, line: usize, record: PdbRecord) {
        match record {
            PdbRecord::Atom(atom) => self.apply_atom(line, atom),
            PdbRecord::TruncatedAtom { length } => self.warn(
                line,
                ParseWarningKind::LineTooShort {
                    length,
                    expected: columns::MIN_ATOM_LINE_LENGTH,
                },
            ),
            PdbRecord::ChainTerminator => {
                self.builder.start_subunit();
            }
            PdbRecord::ModelEnd => self.finish_model(),
            PdbRecord::Header { pdb_id } => {
                if self.info.pdb_id.is_none() {
                    self.info.pdb_id = pdb_id;
                }
            }
            PdbRecord::Title(text) => {
                if !self.keep_description && !text.is_empty() {
                    self.info
                        .description
                        .get_or_insert_with(String::new)
                        .push_str(&text);
                }
            }
            PdbRecord::Author(text) => {
                if !self.keep_authors && !text.is_empty() {
                    self.info
                        .authors
                        .get_or_insert_with(String::new)
                        .push_str(&text);
                }
            }
        }
    }

    fn apply_atom(&mut self, line: usize, atom: AtomLine) {
        let residue = match atom.residue_number {
            Ok(number) => {
                if self.cursor.number != Some(number) {
                    self.enter_residue(line, number, &atom.residue_name);
                }
                if self.cursor.is_solvent {
                    return;
                }
                self.cursor.residue
            }
            Err(value) => {
                self.warn(line, ParseWarningKind::InvalidResidueNumber { value });
                if is_solvent(&atom.residue_name) {
                    return;
                }
                None
            }
        };

        match atom.position {
            Ok(position) => {
                self.builder.push_atom(position, atom.element, residue);
            }
            Err(kind) => self.warn(line, kind),
        }
    }

    fn enter_residue(&mut self, line: usize, number: i32, name: &str) {
        self.cursor.number = Some(number);
        self.cursor.is_solvent = is_solvent(name);
        self.cursor.residue = None;
        if self.cursor.is_solvent {
            return;
        }
        match Residue::from_code(name) {
            Some(residue) => {
                self.cursor.residue = Some(residue);
                self.builder.push_residue(residue);
            }
            None => self.warn(
                line,
                ParseWarningKind::UnrecognizedResidue {
                    code: name.to_string(),
                },
            ),
        }
    }

    fn finish_model(&mut self) {
        let builder = mem::replace(&mut self.builder, ProteinBuilder::new().track_residues());
        self.cursor = ResidueCursor::default();
        if builder.is_empty() {
            debug!(model = self.models.len(), "Skipping model without atoms.");
            return;
        }
        let protein = builder.build();
        debug!(
            model = self.models.len(),
            atoms = protein.atom_count(),
            subunits = protein.subunits().len(),
            "Finalized PDB model."
        );
        self.models.push(protein);
    }

    fn finish(mut self, source_lines: &[&str]) -> Result<ParsedStructure, ParseError> {
        if !self.builder.is_empty() {
            self.finish_model();
        }
        if self.models.is_empty() {
            return Err(ParseError::EmptyAtomCount);
        }

        let mut info = self.info;
        info.warnings = self.warnings;
        if info.source_lines.is_none() {
            info.source_lines = Some(source_lines.iter().map(|l| l.to_string()).collect());
        }
        Ok(ParsedStructure {
            models: self.models,
            file_info: info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::ElementGroup;

    /// Formats an ATOM record with every column at its standard offset.
    fn atom_line(res_name: &str, res_seq: &str, x: f32, y: f32, z: f32, element: &str) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            1, "CA", res_name, "A", res_seq, x, y, z, 1.0, 0.0, element
        )
    }

    fn parse(text: &str) -> ParsedStructure {
        PdbFormat::parse_serial(text, None).expect("parse should succeed")
    }

    #[test]
    fn atom_line_helper_matches_the_column_table() {
        let line = atom_line("ALA", "5", 1.0, 2.0, 3.0, "C");
        assert_eq!(line.len(), columns::MIN_ATOM_LINE_LENGTH);
        assert_eq!(slice_and_trim(&line, columns::RESIDUE_NAME), "ALA");
        assert_eq!(slice_and_trim(&line, columns::CHAIN_ID), "A");
        assert_eq!(slice_and_trim(&line, columns::RESIDUE_NUMBER), "5");
        assert_eq!(slice_and_trim(&line, columns::X), "1.000");
        assert_eq!(slice_and_trim(&line, columns::Z), "3.000");
        assert_eq!(slice_and_trim(&line, columns::ELEMENT), "C");
    }

    #[test]
    fn single_atom_fragment_is_parsed_with_flipped_z() {
        let text = format!(
            "HEADER    TEST{:>52}\n{}\nEND\n",
            "1ABC",
            atom_line("ALA", "1", 1.0, 2.0, 3.0, "C")
        );
        let parsed = parse(&text);

        assert_eq!(parsed.models.len(), 1);
        let protein = &parsed.models[0];
        assert_eq!(protein.atom_count(), 1);
        assert_eq!(protein.element_composition().carbon_count(), 1);
        assert_eq!(protein.atoms()[0], Position::new(1.0, 2.0, -3.0));
        assert_eq!(parsed.file_info.pdb_id.as_deref(), Some("1ABC"));
        assert!(parsed.file_info.warnings.is_empty());
    }

    #[test]
    fn water_after_terminator_is_dropped_from_atoms_and_sequence() {
        let text = [
            atom_line("ALA", "5", 0.0, 0.0, 0.0, "N"),
            atom_line("ALA", "5", 1.0, 0.0, 0.0, "C"),
            "TER".to_string(),
            atom_line("HOH", "6", 5.0, 5.0, 5.0, "O"),
        ]
        .join("\n");
        let parsed = parse(&text);
        let protein = &parsed.models[0];

        assert_eq!(protein.sequence(), Some(&[Residue::Alanine][..]));
        assert_eq!(protein.atom_count(), 2);
        assert_eq!(protein.element_composition().oxygen_count(), 0);
        // The chain opened by TER only held water, so it is discarded as empty.
        assert_eq!(protein.subunits().len(), 1);
        assert!(parsed.file_info.warnings.is_empty());
    }

    #[test]
    fn terminator_splits_atoms_into_subunits() {
        let text = [
            atom_line("ALA", "5", 0.0, 0.0, 0.0, "N"),
            atom_line("ALA", "5", 1.0, 0.0, 0.0, "C"),
            "TER".to_string(),
            atom_line("GLY", "6", 5.0, 5.0, 5.0, "C"),
            "TER".to_string(),
        ]
        .join("\n");
        let protein = &parse(&text).models[0];

        let subunits = protein.subunits();
        assert_eq!(subunits.len(), 2);
        assert_eq!((subunits[0].index_start, subunits[0].atom_count), (0, 2));
        assert_eq!((subunits[1].index_start, subunits[1].atom_count), (2, 1));
        assert_eq!(
            protein.sequence(),
            Some(&[Residue::Alanine, Residue::Glycine][..])
        );
    }

    #[test]
    fn every_atom_of_a_water_residue_is_excluded() {
        let text = [
            atom_line("HOH", "7", 0.0, 0.0, 0.0, "O"),
            atom_line("HOH", "7", 1.0, 0.0, 0.0, "H"),
            atom_line("HOH", "7", 0.0, 1.0, 0.0, "H"),
            atom_line("SER", "8", 3.0, 0.0, 0.0, "O"),
        ]
        .join("\n");
        let protein = &parse(&text).models[0];
        assert_eq!(protein.atom_count(), 1);
        assert_eq!(protein.sequence(), Some(&[Residue::Serine][..]));
    }

    #[test]
    fn truncated_atom_line_is_skipped_with_a_warning() {
        let valid = atom_line("GLY", "1", 0.0, 0.0, 0.0, "C");
        let truncated: String = atom_line("GLY", "1", 1.0, 1.0, 1.0, "C").chars().take(40).collect();
        let text = [valid.clone(), truncated, valid].join("\n");
        let parsed = parse(&text);

        assert_eq!(parsed.models[0].atom_count(), 2);
        assert_eq!(parsed.file_info.warning_indices(), vec![2]);
        assert_eq!(
            parsed.file_info.warnings[0].kind,
            ParseWarningKind::LineTooShort {
                length: 40,
                expected: 78
            }
        );
    }

    #[test]
    fn unparsable_coordinate_drops_only_that_atom() {
        let mut bad = atom_line("GLY", "1", 0.0, 0.0, 0.0, "C");
        bad.replace_range(columns::Y, "  abc.de");
        let text = [bad, atom_line("GLY", "1", 1.0, 0.0, 0.0, "N")].join("\n");
        let parsed = parse(&text);

        assert_eq!(parsed.models[0].atom_count(), 1);
        assert_eq!(
            parsed.file_info.warnings,
            vec![ParseWarning::new(
                1,
                ParseWarningKind::InvalidCoordinate {
                    axis: 'y',
                    value: "abc.de".into()
                }
            )]
        );
        // Residue transition happens before coordinates are decoded.
        assert_eq!(parsed.models[0].sequence(), Some(&[Residue::Glycine][..]));
    }

    #[test]
    fn invalid_residue_number_keeps_the_atom_without_residue_tracking() {
        let mut line = atom_line("LYS", "1", 0.0, 0.0, 0.0, "N");
        line.replace_range(columns::RESIDUE_NUMBER, "  ??");
        let parsed = parse(&line);
        let protein = &parsed.models[0];

        assert_eq!(protein.atom_count(), 1);
        assert_eq!(protein.sequence(), Some(&[][..]));
        assert_eq!(protein.residue_composition().unwrap().total_count(), 0);
        assert_eq!(
            parsed.file_info.warnings[0].kind,
            ParseWarningKind::InvalidResidueNumber { value: "??".into() }
        );
    }

    #[test]
    fn unrecognized_residue_keeps_atoms_but_skips_the_sequence() {
        let text = [
            atom_line("NAG", "1", 0.0, 0.0, 0.0, "C"),
            atom_line("NAG", "1", 1.0, 0.0, 0.0, "O"),
            atom_line("ALA", "2", 2.0, 0.0, 0.0, "C"),
        ]
        .join("\n");
        let parsed = parse(&text);
        let protein = &parsed.models[0];

        assert_eq!(protein.atom_count(), 3);
        assert_eq!(protein.sequence(), Some(&[Residue::Alanine][..]));
        assert_eq!(protein.residue_composition().unwrap().total_count(), 1);
        assert_eq!(parsed.file_info.warnings.len(), 1);
        assert_eq!(
            parsed.file_info.warnings[0].kind,
            ParseWarningKind::UnrecognizedResidue { code: "NAG".into() }
        );
    }

    #[test]
    fn unknown_element_symbol_is_kept_as_unknown() {
        let protein = &parse(&atom_line("ALA", "1", 0.0, 0.0, 0.0, "XX")).models[0];
        assert_eq!(protein.atom_elements(), &[AtomElement::Unknown]);
    }

    #[test]
    fn model_end_records_split_models_and_reset_residue_state() {
        let text = [
            "MODEL        1".to_string(),
            atom_line("ALA", "1", 0.0, 0.0, 0.0, "C"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line("ALA", "1", 0.5, 0.0, 0.0, "C"),
            atom_line("ALA", "1", 0.5, 1.0, 0.0, "N"),
            "ENDMDL".to_string(),
            "END".to_string(),
        ]
        .join("\n");
        let parsed = parse(&text);

        assert_eq!(parsed.models.len(), 2);
        assert_eq!(parsed.models[0].atom_count(), 1);
        assert_eq!(parsed.models[1].atom_count(), 2);
        assert_eq!(parsed.models[1].sequence(), Some(&[Residue::Alanine][..]));
    }

    #[test]
    fn trailing_atoms_after_last_model_end_form_a_model() {
        let text = [
            atom_line("ALA", "1", 0.0, 0.0, 0.0, "C"),
            "ENDMDL".to_string(),
            atom_line("GLY", "2", 0.0, 0.0, 0.0, "C"),
        ]
        .join("\n");
        assert_eq!(parse(&text).models.len(), 2);
    }

    #[test]
    fn input_without_atoms_fails_with_empty_atom_count() {
        let text = "HEADER    NOTHING\nREMARK   1\nENDMDL\nEND\n";
        let err = PdbFormat::parse_serial(text, None).unwrap_err();
        assert!(matches!(err, ParseError::EmptyAtomCount));

        let only_water = atom_line("HOH", "1", 0.0, 0.0, 0.0, "O");
        assert!(matches!(
            PdbFormat::parse_serial(&only_water, None),
            Err(ParseError::EmptyAtomCount)
        ));
    }

    #[test]
    fn title_and_author_continuations_are_concatenated() {
        let text = [
            "TITLE     CRYSTAL STRUCTURE".to_string(),
            "TITLE    2 OF A TEST PROTEIN   ".to_string(),
            "AUTHOR    J.DOE,".to_string(),
            "AUTHOR   2 R.ROE".to_string(),
            atom_line("ALA", "1", 0.0, 0.0, 0.0, "C"),
        ]
        .join("\n");
        let info = parse(&text).file_info;

        assert_eq!(
            info.description.as_deref(),
            Some("CRYSTAL STRUCTURE OF A TEST PROTEIN")
        );
        assert_eq!(info.author_list(), vec!["J.DOE", "R.ROE"]);
        assert_eq!(info.source_lines.as_ref().map(Vec::len), Some(5));
    }

    #[test]
    fn prior_metadata_is_never_overwritten() {
        let prior = ProteinFileInfo {
            pdb_id: Some("9XYZ".into()),
            description: Some("From the database".into()),
            ..Default::default()
        };
        let text = [
            format!("HEADER    TEST{:>52}", "1ABC"),
            "TITLE     FROM THE FILE".to_string(),
            "AUTHOR    J.DOE".to_string(),
            atom_line("ALA", "1", 0.0, 0.0, 0.0, "C"),
        ]
        .join("\n");
        let info = PdbFormat::parse_serial(&text, Some(prior)).unwrap().file_info;

        assert_eq!(info.pdb_id.as_deref(), Some("9XYZ"));
        assert_eq!(info.description.as_deref(), Some("From the database"));
        assert_eq!(info.authors.as_deref(), Some("J.DOE"));
    }

    #[test]
    fn atoms_are_grouped_by_element_in_canonical_order() {
        let text = [
            atom_line("CYS", "1", 0.0, 0.0, 0.0, "S"),
            atom_line("CYS", "1", 1.0, 0.0, 0.0, "O"),
            atom_line("CYS", "1", 2.0, 0.0, 0.0, "H"),
            atom_line("CYS", "1", 3.0, 0.0, 0.0, "C"),
            atom_line("CYS", "1", 4.0, 0.0, 0.0, "N"),
            atom_line("CYS", "1", 5.0, 0.0, 0.0, "C"),
        ]
        .join("\n");
        let protein = &parse(&text).models[0];

        let groups: Vec<ElementGroup> =
            protein.atom_elements().iter().map(|e| e.group()).collect();
        assert_eq!(
            groups,
            vec![
                ElementGroup::Carbon,
                ElementGroup::Carbon,
                ElementGroup::Nitrogen,
                ElementGroup::Hydrogen,
                ElementGroup::Oxygen,
                ElementGroup::Sulfur,
            ]
        );
        assert_eq!(protein.atoms()[0].x, 3.0);
        assert_eq!(protein.atoms()[1].x, 5.0);
    }

    #[test]
    fn classify_ignores_unrelated_records() {
        assert_eq!(PdbFormat::classify_line("REMARK   2 RESOLUTION."), None);
        assert_eq!(PdbFormat::classify_line(""), None);
        assert_eq!(PdbFormat::classify_line("CONECT    1    2"), None);
        assert_eq!(
            PdbFormat::classify_line("TER      10      ALA A   5"),
            Some(PdbRecord::ChainTerminator)
        );
    }

    #[test]
    fn reparsing_yields_the_same_structure() {
        let text = [
            atom_line("HOH", "1", 9.0, 9.0, 9.0, "O"),
            atom_line("MET", "2", 0.0, 0.0, 0.0, "S"),
            atom_line("HOH", "3", 8.0, 8.0, 8.0, "O"),
        ]
        .join("\n");
        assert_eq!(parse(&text), parse(&text));
    }
}
