use super::error::EngineError;
use crate::core::models::bond::BondLayout;
use crate::core::models::protein::Protein;
use std::ops::Range;

/// Four billboard vertices are drawn per atom.
pub const IMPOSTOR_VERTICES_PER_ATOM: usize = 4;
/// Two triangles, three indices each, are drawn per atom.
pub const IMPOSTOR_INDICES_PER_ATOM: usize = 6;

/// A contiguous window into a flattened multi-configuration buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferRegion {
    pub offset: usize,
    pub length: usize,
}

impl BufferRegion {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// The same region in a buffer holding `multiplicity` records per element.
    pub fn scaled(self, multiplicity: usize) -> Self {
        Self {
            offset: self.offset * multiplicity,
            length: self.length * multiplicity,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Tracks the displayed configuration of a trajectory and maps it to buffer regions.
///
/// Moving between configurations wraps around in both directions. Bond regions
/// become available only after a [`BondLayout`] is attached with
/// [`add_bonds`](Self::add_bonds), which may happen once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSelector {
    atoms_per_configuration: usize,
    configuration_count: usize,
    current_configuration: usize,
    bond_layout: Option<BondLayout>,
}

impl ConfigurationSelector {
    /// A selector positioned on configuration 0. A count of zero is treated as one.
    pub fn new(atoms_per_configuration: usize, configuration_count: usize) -> Self {
        Self {
            atoms_per_configuration,
            configuration_count: configuration_count.max(1),
            current_configuration: 0,
            bond_layout: None,
        }
    }

    /// Builds a selector for one protein, attaching its bond layout if already computed.
    pub fn from_protein(protein: &Protein) -> Self {
        let mut selector = Self::new(protein.atom_count(), protein.configuration_count());
        selector.bond_layout = protein.connectivity().map(|c| c.layout().clone());
        selector
    }

    /// Builds a selector over several proteins drawn together.
    ///
    /// Atoms per configuration are summed across the proteins. Bonds are not
    /// carried over; attach a combined layout with [`add_bonds`](Self::add_bonds).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptySelection`] for an empty slice, and
    /// [`EngineError::InconsistentConfigurationCount`] if the proteins disagree
    /// on their configuration count.
    pub fn for_proteins(proteins: &[Protein]) -> Result<Self, EngineError> {
        let first = proteins.first().ok_or(EngineError::EmptySelection)?;
        let configuration_count = first.configuration_count();
        if proteins
            .iter()
            .any(|p| p.configuration_count() != configuration_count)
        {
            return Err(EngineError::InconsistentConfigurationCount);
        }
        let atoms = proteins.iter().map(Protein::atom_count).sum();
        Ok(Self::new(atoms, configuration_count))
    }

    pub fn atoms_per_configuration(&self) -> usize {
        self.atoms_per_configuration
    }

    pub fn configuration_count(&self) -> usize {
        self.configuration_count
    }

    pub fn current_configuration(&self) -> usize {
        self.current_configuration
    }

    /// Moves `step` configurations forward (or backward if negative), wrapping around.
    pub fn advance(&mut self, step: i32) -> usize {
        let count = self.configuration_count as i64;
        let next = (self.current_configuration as i64 + step as i64).rem_euclid(count);
        self.current_configuration = next as usize;
        self.current_configuration
    }

    pub fn set_configuration(&mut self, configuration: usize) -> Result<(), EngineError> {
        self.check_range(configuration)?;
        self.current_configuration = configuration;
        Ok(())
    }

    /// Region of `configuration` in a buffer with `multiplicity` records per atom.
    pub fn region_for_atoms(
        &self,
        configuration: usize,
        multiplicity: usize,
    ) -> Result<BufferRegion, EngineError> {
        self.check_range(configuration)?;
        let n = self.atoms_per_configuration;
        Ok(BufferRegion::new(configuration * n, n).scaled(multiplicity))
    }

    pub fn impostor_vertex_region(&self) -> BufferRegion {
        let n = self.atoms_per_configuration;
        BufferRegion::new(self.current_configuration * n, n).scaled(IMPOSTOR_VERTICES_PER_ATOM)
    }

    pub fn impostor_index_region(&self) -> BufferRegion {
        let n = self.atoms_per_configuration;
        BufferRegion::new(self.current_configuration * n, n).scaled(IMPOSTOR_INDICES_PER_ATOM)
    }

    pub fn has_bonds(&self) -> bool {
        self.bond_layout.is_some()
    }

    /// Region of `configuration`'s bonds in the flattened bond array.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BondsUnavailable`] if no bond layout is attached.
    pub fn region_for_bonds(&self, configuration: usize) -> Result<BufferRegion, EngineError> {
        let layout = self
            .bond_layout
            .as_ref()
            .ok_or(EngineError::BondsUnavailable)?;
        self.check_range(configuration)?;
        Ok(BufferRegion::new(
            layout.bond_array_starts[configuration],
            layout.bonds_per_configuration[configuration],
        ))
    }

    pub fn current_bond_region(&self) -> Result<BufferRegion, EngineError> {
        self.region_for_bonds(self.current_configuration)
    }

    /// Attaches the per-configuration bond layout produced by connectivity generation.
    pub fn add_bonds(&mut self, layout: &BondLayout) -> Result<(), EngineError> {
        if self.bond_layout.is_some() {
            return Err(EngineError::BondsAlreadyAttached);
        }
        let found = layout
            .bonds_per_configuration
            .len()
            .min(layout.bond_array_starts.len());
        if found != self.configuration_count
            || layout.bond_array_starts.len() != layout.bonds_per_configuration.len()
        {
            return Err(EngineError::LayoutMismatch {
                expected: self.configuration_count,
                found,
            });
        }
        self.bond_layout = Some(layout.clone());
        Ok(())
    }

    fn check_range(&self, configuration: usize) -> Result<(), EngineError> {
        if configuration < self.configuration_count {
            Ok(())
        } else {
            Err(EngineError::ConfigurationOutOfRange {
                index: configuration,
                count: self.configuration_count,
            })
        }
    }
}
