use super::error::ParseError;
use super::traits::{LineRecord, ParsedStructure, StructureFormat};
use super::warnings::{ParseWarning, ParseWarningKind};
use crate::core::models::builder::ProteinBuilder;
use crate::core::models::element::AtomElement;
use crate::core::models::file::ProteinFileInfo;
use crate::core::models::protein::Position;
use crate::core::models::subunit::SubunitKind;
use std::mem;
use tracing::debug;

const ENERGY_KEY: &str = "energy=";

#[derive(Debug, Clone, PartialEq)]
pub enum XyzRecord {
    Atom {
        element: AtomElement,
        position: Position,
    },
    /// Any line that is not `element x y z`: atom-count lines, comments, blanks.
    Separator {
        energy: Option<Result<f32, String>>,
    },
}

/// Extracts the value following `energy=` (case and whitespace insensitive).
fn parse_energy(line: &str) -> Option<Result<f32, String>> {
    let normalized: String = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let (_, rest) = normalized.split_once(ENERGY_KEY)?;
    let candidate: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e'))
        .collect();

    let parsed = candidate.parse::<f32>().or_else(|_| {
        candidate
            .trim_end_matches(['e', '+', '-'])
            .parse::<f32>()
    });
    Some(parsed.map_err(|_| rest.to_string()))
}

#[derive(Debug, Default)]
struct Frame {
    first_line: usize,
    elements: Vec<AtomElement>,
    positions: Vec<Position>,
    energy: Option<f32>,
}

impl Frame {
    fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub struct XyzFormat;

impl StructureFormat for XyzFormat {
    type Record = XyzRecord;

    const NAME: &'static str = "XYZ";
    const EXTENSIONS: &'static [&'static str] = &["xyz"];

    fn classify_line(line: &str) -> Option<XyzRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() >= 4 {
            let coordinates: Result<Vec<f32>, _> =
                tokens[1..4].iter().map(|t| t.parse::<f32>()).collect();
            if let Ok(xyz) = coordinates {
                return Some(XyzRecord::Atom {
                    element: AtomElement::from_symbol(tokens[0]),
                    position: Position::new(xyz[0], xyz[1], -xyz[2]),
                });
            }
        }
        Some(XyzRecord::Separator {
            energy: parse_energy(line),
        })
    }

    fn assemble(
        records: Vec<LineRecord<XyzRecord>>,
        source_lines: &[&str],
        prior_info: Option<ProteinFileInfo>,
    ) -> Result<ParsedStructure, ParseError> {
        let mut info = prior_info.unwrap_or_default();
        let mut warnings = mem::take(&mut info.warnings);
        let mut frames: Vec<Frame> = Vec::new();
        let mut current = Frame::default();

        for LineRecord { line, record } in records {
            match record {
                XyzRecord::Atom { element, position } => {
                    if current.is_empty() {
                        current.first_line = line;
                    }
                    current.elements.push(element);
                    current.positions.push(position);
                }
                XyzRecord::Separator { energy } => {
                    if !current.is_empty() {
                        frames.push(mem::take(&mut current));
                    }
                    match energy {
                        Some(Ok(value)) => current.energy = Some(value),
                        Some(Err(value)) => warnings.push(ParseWarning::new(
                            line,
                            ParseWarningKind::InvalidEnergy { value },
                        )),
                        None => {}
                    }
                }
            }
        }
        if !current.is_empty() {
            frames.push(current);
        }

        let mut frames = frames.into_iter();
        let template = frames.next().ok_or(ParseError::EmptyAtomCount)?;

        let mut builder = ProteinBuilder::with_subunit_kind(SubunitKind::Unknown);
        for (element, position) in template.elements.iter().zip(&template.positions) {
            builder.push_atom(*position, *element, None);
        }
        let mut energies = vec![template.energy];

        for frame in frames {
            if frame.elements != template.elements {
                warnings.push(ParseWarning::new(
                    frame.first_line,
                    ParseWarningKind::InconsistentFrame {
                        expected: template.elements.len(),
                        found: frame.elements.len(),
                    },
                ));
                continue;
            }
            if builder.push_configuration(frame.positions).is_ok() {
                energies.push(frame.energy);
            }
        }
        builder.configuration_energies(energies);

        let protein = builder.build();
        debug!(
            atoms = protein.atom_count(),
            configurations = protein.configuration_count(),
            "Assembled XYZ trajectory."
        );

        info.warnings = warnings;
        if info.source_lines.is_none() {
            info.source_lines = Some(source_lines.iter().map(|l| l.to_string()).collect());
        }
        Ok(ParsedStructure {
            models: vec![protein],
            file_info: info,
        })
    }
}
