use super::bond::{BondRecord, Connectivity};
use super::composition::{ElementComposition, ResidueComposition};
use super::element::{AtomElement, ElementGroup};
use super::residue::Residue;
use super::subunit::ProteinSubunit;
use nalgebra::Point3;
use std::ops::Range;

pub type Position = Point3<f32>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Position,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    pub fn extent(&self) -> nalgebra::Vector3<f32> {
        self.max - self.min
    }
}

/// Axis-aligned box and enclosing sphere of a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub sphere: BoundingSphere,
    pub bounds: BoundingBox,
}

impl BoundingVolume {
    /// A volume with no extent, centered at the origin.
    pub fn zero() -> Self {
        Self {
            sphere: BoundingSphere {
                center: Position::origin(),
                radius: 0.0,
            },
            bounds: BoundingBox {
                min: Position::origin(),
                max: Position::origin(),
            },
        }
    }

    /// Computes the box from per-axis extremes; the sphere is centered on the box
    /// and reaches the farthest position.
    pub fn enclosing(positions: &[Position]) -> Self {
        let Some(first) = positions.first() else {
            return Self::zero();
        };

        let (min, max) = positions.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        let center = nalgebra::center(&min, &max);
        let radius = positions
            .iter()
            .map(|p| nalgebra::distance(&center, p))
            .fold(0.0_f32, f32::max);

        Self {
            sphere: BoundingSphere { center, radius },
            bounds: BoundingBox { min, max },
        }
    }
}

/// One structural model: a single frame, or the shared topology of a trajectory.
///
/// `atoms` holds `atom_count × configuration_count` positions. Within each
/// configuration block, atoms are grouped by element in the canonical order
/// (carbon, nitrogen, hydrogen, oxygen, sulfur, other), and the blocks follow
/// each other in configuration order. `atom_elements` describes a single block.
///
/// A `Protein` is frozen once built; the only mutation is attaching bond
/// connectivity, which replaces the whole bond set in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Protein {
    pub(crate) atoms: Vec<Position>,
    pub(crate) atom_elements: Vec<AtomElement>,
    pub(crate) configuration_count: usize,
    pub(crate) configuration_energies: Option<Vec<Option<f32>>>,
    pub(crate) subunits: Vec<ProteinSubunit>,
    pub(crate) sequence: Option<Vec<Residue>>,
    pub(crate) element_composition: ElementComposition,
    pub(crate) residue_composition: Option<ResidueComposition>,
    pub(crate) bounding_volume: BoundingVolume,
    pub(crate) connectivity: Option<Connectivity>,
}

impl Protein {
    /// Atoms per configuration.
    pub fn atom_count(&self) -> usize {
        self.atom_elements.len()
    }

    pub fn configuration_count(&self) -> usize {
        self.configuration_count
    }

    pub fn is_trajectory(&self) -> bool {
        self.configuration_count > 1
    }

    pub fn atoms(&self) -> &[Position] {
        &self.atoms
    }

    /// Element of each atom within one configuration block.
    pub fn atom_elements(&self) -> &[AtomElement] {
        &self.atom_elements
    }

    /// The positions of a single configuration, or `None` if out of range.
    pub fn configuration_atoms(&self, configuration: usize) -> Option<&[Position]> {
        if configuration >= self.configuration_count {
            return None;
        }
        let n = self.atom_count();
        self.atoms.get(configuration * n..(configuration + 1) * n)
    }

    pub fn configuration_energies(&self) -> Option<&[Option<f32>]> {
        self.configuration_energies.as_deref()
    }

    pub fn subunits(&self) -> &[ProteinSubunit] {
        &self.subunits
    }

    pub fn sequence(&self) -> Option<&[Residue]> {
        self.sequence.as_deref()
    }

    pub fn element_composition(&self) -> &ElementComposition {
        &self.element_composition
    }

    pub fn residue_composition(&self) -> Option<&ResidueComposition> {
        self.residue_composition.as_ref()
    }

    pub fn bounding_volume(&self) -> &BoundingVolume {
        &self.bounding_volume
    }

    /// Index range of each non-empty element group within one configuration block.
    ///
    /// Derived from the element composition alone; the canonical layout
    /// guarantees the ranges match the actual array contents.
    pub fn element_group_ranges(&self) -> Vec<(ElementGroup, Range<usize>)> {
        let mut group_counts = [0usize; ElementGroup::CANONICAL_ORDER.len()];
        for (element, count) in self.element_composition.iter() {
            group_counts[element.group() as usize] += count;
        }

        let mut start = 0;
        ElementGroup::CANONICAL_ORDER
            .iter()
            .zip(group_counts)
            .filter(|(_, count)| *count > 0)
            .map(|(group, count)| {
                let range = start..start + count;
                start += count;
                (*group, range)
            })
            .collect()
    }

    pub fn connectivity(&self) -> Option<&Connectivity> {
        self.connectivity.as_ref()
    }

    pub fn bonds(&self) -> Option<&[BondRecord]> {
        self.connectivity.as_ref().map(Connectivity::bonds)
    }

    /// Publishes a complete bond set, returning the one it replaces.
    pub fn attach_connectivity(&mut self, connectivity: Connectivity) -> Option<Connectivity> {
        self.connectivity.replace(connectivity)
    }
}
