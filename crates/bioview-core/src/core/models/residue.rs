use super::element::Rgb;
use phf::{Map, Set, phf_map, phf_set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResidueKind {
    AminoAcid,
    DnaNucleobase,
    RnaNucleobase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Residue {
    // --- Charged ---
    Arginine,     // ARG
    Histidine,    // HIS
    Lysine,       // LYS
    AsparticAcid, // ASP
    GlutamicAcid, // GLU

    // --- Polar, Uncharged ---
    Serine,         // SER
    Threonine,      // THR
    Asparagine,     // ASN
    Glutamine,      // GLN
    Cysteine,       // CYS
    Selenocysteine, // SEC

    // --- Special ---
    Glycine, // GLY
    Proline, // PRO

    // --- Hydrophobic ---
    Alanine,       // ALA
    Valine,        // VAL
    Isoleucine,    // ILE
    Leucine,       // LEU
    Methionine,    // MET
    Phenylalanine, // PHE
    Tyrosine,      // TYR
    Tryptophan,    // TRP

    // --- DNA ---
    DeoxyAdenosine, // DA
    DeoxyCytidine,  // DC
    DeoxyGuanosine, // DG
    DeoxyThymidine, // DT

    // --- RNA ---
    Adenosine, // A
    Cytidine,  // C
    Guanosine, // G
    Uridine,   // U
}

#[rustfmt::skip]
static RESIDUE_CODES: Map<&'static str, Residue> = phf_map! {
    "ARG" => Residue::Arginine,     "HIS" => Residue::Histidine,
    "LYS" => Residue::Lysine,       "ASP" => Residue::AsparticAcid,
    "GLU" => Residue::GlutamicAcid, "SER" => Residue::Serine,
    "THR" => Residue::Threonine,    "ASN" => Residue::Asparagine,
    "GLN" => Residue::Glutamine,    "CYS" => Residue::Cysteine,
    "SEC" => Residue::Selenocysteine,
    "GLY" => Residue::Glycine,      "PRO" => Residue::Proline,
    "ALA" => Residue::Alanine,      "VAL" => Residue::Valine,
    "ILE" => Residue::Isoleucine,   "LEU" => Residue::Leucine,
    "MET" => Residue::Methionine,   "PHE" => Residue::Phenylalanine,
    "TYR" => Residue::Tyrosine,     "TRP" => Residue::Tryptophan,

    "DA" => Residue::DeoxyAdenosine, "DC" => Residue::DeoxyCytidine,
    "DG" => Residue::DeoxyGuanosine, "DT" => Residue::DeoxyThymidine,

    "A" => Residue::Adenosine, "C" => Residue::Cytidine,
    "G" => Residue::Guanosine, "U" => Residue::Uridine,
};

#[rustfmt::skip]
static SOLVENT_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "SOL", "TIP", "TIP3",
};

/// Returns `true` for residue names that denote solvent water.
///
/// Solvent residues are filtered out of structures during import. The check is
/// exact after trimming, so a ligand such as `"HOA"` is never mistaken for water.
pub fn is_solvent(residue_name: &str) -> bool {
    SOLVENT_RESIDUE_NAMES.contains(residue_name.trim())
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized residue code '{0}'")]
pub struct ParseResidueError(pub String);

impl Residue {
    /// Resolves a residue code by exact, case-sensitive match.
    ///
    /// Unlike element symbols there is no catch-all fallback: an unknown code
    /// yields `None` so callers can decide how to account for it.
    pub fn from_code(code: &str) -> Option<Self> {
        RESIDUE_CODES.get(code).copied()
    }

    pub fn code(self) -> &'static str {
        match self {
            Residue::Arginine => "ARG",
            Residue::Histidine => "HIS",
            Residue::Lysine => "LYS",
            Residue::AsparticAcid => "ASP",
            Residue::GlutamicAcid => "GLU",
            Residue::Serine => "SER",
            Residue::Threonine => "THR",
            Residue::Asparagine => "ASN",
            Residue::Glutamine => "GLN",
            Residue::Cysteine => "CYS",
            Residue::Selenocysteine => "SEC",
            Residue::Glycine => "GLY",
            Residue::Proline => "PRO",
            Residue::Alanine => "ALA",
            Residue::Valine => "VAL",
            Residue::Isoleucine => "ILE",
            Residue::Leucine => "LEU",
            Residue::Methionine => "MET",
            Residue::Phenylalanine => "PHE",
            Residue::Tyrosine => "TYR",
            Residue::Tryptophan => "TRP",
            Residue::DeoxyAdenosine => "DA",
            Residue::DeoxyCytidine => "DC",
            Residue::DeoxyGuanosine => "DG",
            Residue::DeoxyThymidine => "DT",
            Residue::Adenosine => "A",
            Residue::Cytidine => "C",
            Residue::Guanosine => "G",
            Residue::Uridine => "U",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Residue::Arginine => "Arginine",
            Residue::Histidine => "Histidine",
            Residue::Lysine => "Lysine",
            Residue::AsparticAcid => "Aspartic Acid",
            Residue::GlutamicAcid => "Glutamic Acid",
            Residue::Serine => "Serine",
            Residue::Threonine => "Threonine",
            Residue::Asparagine => "Asparagine",
            Residue::Glutamine => "Glutamine",
            Residue::Cysteine => "Cysteine",
            Residue::Selenocysteine => "Selenocysteine",
            Residue::Glycine => "Glycine",
            Residue::Proline => "Proline",
            Residue::Alanine => "Alanine",
            Residue::Valine => "Valine",
            Residue::Isoleucine => "Isoleucine",
            Residue::Leucine => "Leucine",
            Residue::Methionine => "Methionine",
            Residue::Phenylalanine => "Phenylalanine",
            Residue::Tyrosine => "Tyrosine",
            Residue::Tryptophan => "Tryptophan",
            Residue::DeoxyAdenosine => "Deoxyadenosine",
            Residue::DeoxyCytidine => "Deoxycytidine",
            Residue::DeoxyGuanosine => "Deoxyguanosine",
            Residue::DeoxyThymidine => "Deoxythymidine",
            Residue::Adenosine => "Adenosine",
            Residue::Cytidine => "Cytidine",
            Residue::Guanosine => "Guanosine",
            Residue::Uridine => "Uridine",
        }
    }

    pub fn kind(self) -> ResidueKind {
        match self {
            Residue::DeoxyAdenosine
            | Residue::DeoxyCytidine
            | Residue::DeoxyGuanosine
            | Residue::DeoxyThymidine => ResidueKind::DnaNucleobase,
            Residue::Adenosine | Residue::Cytidine | Residue::Guanosine | Residue::Uridine => {
                ResidueKind::RnaNucleobase
            }
            _ => ResidueKind::AminoAcid,
        }
    }

    /// Display color grouped by side-chain chemistry (or by base for nucleotides).
    pub fn default_color(self) -> Rgb {
        match self {
            Residue::Arginine | Residue::Histidine | Residue::Lysine => [0.200, 0.350, 0.900],
            Residue::AsparticAcid | Residue::GlutamicAcid => [0.900, 0.150, 0.150],
            Residue::Serine
            | Residue::Threonine
            | Residue::Asparagine
            | Residue::Glutamine => [0.150, 0.750, 0.700],
            Residue::Cysteine | Residue::Selenocysteine | Residue::Methionine => {
                [0.950, 0.800, 0.200]
            }
            Residue::Glycine | Residue::Proline => [0.700, 0.700, 0.700],
            Residue::Alanine | Residue::Valine | Residue::Isoleucine | Residue::Leucine => {
                [0.400, 0.700, 0.300]
            }
            Residue::Phenylalanine | Residue::Tyrosine | Residue::Tryptophan => {
                [0.550, 0.350, 0.750]
            }
            Residue::DeoxyAdenosine | Residue::Adenosine => [0.960, 0.450, 0.300],
            Residue::DeoxyCytidine | Residue::Cytidine => [0.980, 0.800, 0.300],
            Residue::DeoxyGuanosine | Residue::Guanosine => [0.300, 0.650, 0.400],
            Residue::DeoxyThymidine | Residue::Uridine => [0.350, 0.550, 0.900],
        }
    }
}

impl FromStr for Residue {
    type Err = ParseResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Residue::from_code(s).ok_or_else(|| ParseResidueError(s.to_string()))
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
