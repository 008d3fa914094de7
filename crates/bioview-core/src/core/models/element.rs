use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear RGB triple in the `0.0..=1.0` range.
pub type Rgb = [f32; 3];

/// A chemical element, keyed by atomic number.
///
/// Only the elements commonly found in biomolecular structures are enumerated;
/// anything else resolves to [`AtomElement::Unknown`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum AtomElement {
    #[default]
    Unknown = 0,
    Hydrogen = 1,
    Carbon = 6,
    Nitrogen = 7,
    Oxygen = 8,
    Fluorine = 9,
    Sodium = 11,
    Magnesium = 12,
    Phosphorus = 15,
    Sulfur = 16,
    Chlorine = 17,
    Potassium = 19,
    Calcium = 20,
    Iron = 26,
    Zinc = 30,
    Iodine = 53,
}

// Keys are upper-case; lookups normalize before querying.
#[rustfmt::skip]
static ELEMENT_SYMBOLS: Map<&'static str, AtomElement> = phf_map! {
    "H"  => AtomElement::Hydrogen,
    "C"  => AtomElement::Carbon,
    "N"  => AtomElement::Nitrogen,
    "O"  => AtomElement::Oxygen,
    "F"  => AtomElement::Fluorine,
    "NA" => AtomElement::Sodium,
    "MG" => AtomElement::Magnesium,
    "P"  => AtomElement::Phosphorus,
    "S"  => AtomElement::Sulfur,
    "CL" => AtomElement::Chlorine,
    "K"  => AtomElement::Potassium,
    "CA" => AtomElement::Calcium,
    "FE" => AtomElement::Iron,
    "ZN" => AtomElement::Zinc,
    "I"  => AtomElement::Iodine,
};

/// Elements that are tracked individually in composition summaries.
pub const IMPORTANT_ELEMENTS: [AtomElement; 5] = [
    AtomElement::Carbon,
    AtomElement::Hydrogen,
    AtomElement::Nitrogen,
    AtomElement::Oxygen,
    AtomElement::Sulfur,
];

const NEUTRAL_GREY: Rgb = [0.517, 0.517, 0.517];

impl AtomElement {
    /// Every variant, in atomic-number order.
    pub const ALL: [AtomElement; 16] = [
        AtomElement::Unknown,
        AtomElement::Hydrogen,
        AtomElement::Carbon,
        AtomElement::Nitrogen,
        AtomElement::Oxygen,
        AtomElement::Fluorine,
        AtomElement::Sodium,
        AtomElement::Magnesium,
        AtomElement::Phosphorus,
        AtomElement::Sulfur,
        AtomElement::Chlorine,
        AtomElement::Potassium,
        AtomElement::Calcium,
        AtomElement::Iron,
        AtomElement::Zinc,
        AtomElement::Iodine,
    ];

    /// Resolves a chemical symbol, ignoring case and surrounding whitespace.
    ///
    /// Fixed-column formats right-align the element symbol and write it in
    /// upper case (`" CL"`), while free-form formats tend to use the
    /// conventional capitalization (`"Cl"`); both resolve to the same element.
    /// Unmapped symbols yield [`AtomElement::Unknown`] rather than an error.
    pub fn from_symbol(symbol: &str) -> Self {
        let trimmed = symbol.trim();
        if trimmed.is_empty() || trimmed.len() > 2 {
            return AtomElement::Unknown;
        }
        ELEMENT_SYMBOLS
            .get(trimmed.to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(AtomElement::Unknown)
    }

    pub fn from_atomic_number(number: u8) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|element| element.atomic_number() == number)
    }

    #[inline]
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AtomElement::Unknown => "X",
            AtomElement::Hydrogen => "H",
            AtomElement::Carbon => "C",
            AtomElement::Nitrogen => "N",
            AtomElement::Oxygen => "O",
            AtomElement::Fluorine => "F",
            AtomElement::Sodium => "Na",
            AtomElement::Magnesium => "Mg",
            AtomElement::Phosphorus => "P",
            AtomElement::Sulfur => "S",
            AtomElement::Chlorine => "Cl",
            AtomElement::Potassium => "K",
            AtomElement::Calcium => "Ca",
            AtomElement::Iron => "Fe",
            AtomElement::Zinc => "Zn",
            AtomElement::Iodine => "I",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AtomElement::Unknown => "Unknown",
            AtomElement::Hydrogen => "Hydrogen",
            AtomElement::Carbon => "Carbon",
            AtomElement::Nitrogen => "Nitrogen",
            AtomElement::Oxygen => "Oxygen",
            AtomElement::Fluorine => "Fluorine",
            AtomElement::Sodium => "Sodium",
            AtomElement::Magnesium => "Magnesium",
            AtomElement::Phosphorus => "Phosphorus",
            AtomElement::Sulfur => "Sulfur",
            AtomElement::Chlorine => "Chlorine",
            AtomElement::Potassium => "Potassium",
            AtomElement::Calcium => "Calcium",
            AtomElement::Iron => "Iron",
            AtomElement::Zinc => "Zinc",
            AtomElement::Iodine => "Iodine",
        }
    }

    pub fn default_color(self) -> Rgb {
        match self {
            AtomElement::Hydrogen => [1.0, 1.0, 1.0],
            AtomElement::Carbon => [0.423, 0.733, 0.235],
            AtomElement::Nitrogen => [0.091, 0.148, 0.556],
            AtomElement::Oxygen => [1.0, 0.149, 0.0],
            AtomElement::Sulfur => [1.0, 0.780, 0.349],
            _ => NEUTRAL_GREY,
        }
    }

    /// Van der Waals radius in Ångströms.
    pub fn van_der_waals_radius(self) -> f32 {
        match self {
            AtomElement::Unknown => 1.0,
            AtomElement::Hydrogen => 1.10,
            AtomElement::Carbon => 1.50,
            AtomElement::Nitrogen => 1.55,
            AtomElement::Oxygen => 1.52,
            AtomElement::Fluorine => 1.47,
            AtomElement::Sodium => 2.27,
            AtomElement::Magnesium => 1.73,
            AtomElement::Phosphorus => 1.80,
            AtomElement::Sulfur => 1.80,
            AtomElement::Chlorine => 1.75,
            AtomElement::Potassium => 2.80,
            AtomElement::Calcium => 2.31,
            AtomElement::Iron => 1.94,
            AtomElement::Zinc => 1.39,
            AtomElement::Iodine => 1.98,
        }
    }

    pub fn is_important(self) -> bool {
        IMPORTANT_ELEMENTS.contains(&self)
    }

    /// The block this element occupies in a canonically ordered atom array.
    pub fn group(self) -> ElementGroup {
        match self {
            AtomElement::Carbon => ElementGroup::Carbon,
            AtomElement::Nitrogen => ElementGroup::Nitrogen,
            AtomElement::Hydrogen => ElementGroup::Hydrogen,
            AtomElement::Oxygen => ElementGroup::Oxygen,
            AtomElement::Sulfur => ElementGroup::Sulfur,
            _ => ElementGroup::Other,
        }
    }
}

impl fmt::Display for AtomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Contiguous element blocks of a canonically ordered atom array.
///
/// The derived `Ord` follows declaration order, which is the canonical
/// layout order: carbon, nitrogen, hydrogen, oxygen, sulfur, then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementGroup {
    Carbon,
    Nitrogen,
    Hydrogen,
    Oxygen,
    Sulfur,
    Other,
}

impl ElementGroup {
    pub const CANONICAL_ORDER: [ElementGroup; 6] = [
        ElementGroup::Carbon,
        ElementGroup::Nitrogen,
        ElementGroup::Hydrogen,
        ElementGroup::Oxygen,
        ElementGroup::Sulfur,
        ElementGroup::Other,
    ];
}
