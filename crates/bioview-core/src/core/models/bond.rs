use nalgebra::Point3;

/// A detected bond between two atoms of the same configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondRecord {
    pub atom_a: usize,            // Index into the parent's flattened atom array
    pub atom_b: usize,            // Index into the parent's flattened atom array
    pub position_a: Point3<f32>,  // Position of `atom_a`
    pub position_b: Point3<f32>,  // Position of `atom_b`
    pub midpoint: Point3<f32>,    // Arithmetic mean of the two positions
    pub radius: f32,              // Visual radius of the rendered bond
}

impl BondRecord {
    pub fn new(
        atom_a: usize,
        position_a: Point3<f32>,
        atom_b: usize,
        position_b: Point3<f32>,
        radius: f32,
    ) -> Self {
        Self {
            atom_a,
            atom_b,
            position_a,
            position_b,
            midpoint: nalgebra::center(&position_a, &position_b),
            radius,
        }
    }

    pub fn length(&self) -> f32 {
        nalgebra::distance(&self.position_a, &self.position_b)
    }
}

/// Where each configuration's bonds live inside a flattened bond array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BondLayout {
    pub bonds_per_configuration: Vec<usize>,
    pub bond_array_starts: Vec<usize>,
}

impl BondLayout {
    /// Builds a layout from per-configuration counts; starts are the exclusive prefix sum.
    pub fn from_counts(bonds_per_configuration: Vec<usize>) -> Self {
        let bond_array_starts = bonds_per_configuration
            .iter()
            .scan(0, |running, count| {
                let start = *running;
                *running += count;
                Some(start)
            })
            .collect();
        Self {
            bonds_per_configuration,
            bond_array_starts,
        }
    }

    pub fn configuration_count(&self) -> usize {
        self.bonds_per_configuration.len()
    }

    pub fn total_bonds(&self) -> usize {
        self.bonds_per_configuration.iter().sum()
    }
}

/// The complete bond set of a protein, grouped by configuration.
///
/// Bonds of configuration `c` occupy
/// `bonds[layout.bond_array_starts[c]..][..layout.bonds_per_configuration[c]]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Connectivity {
    bonds: Vec<BondRecord>,
    layout: BondLayout,
}

impl Connectivity {
    pub fn from_configurations(per_configuration: Vec<Vec<BondRecord>>) -> Self {
        let layout = BondLayout::from_counts(per_configuration.iter().map(Vec::len).collect());
        let bonds = per_configuration.into_iter().flatten().collect();
        Self { bonds, layout }
    }

    pub fn bonds(&self) -> &[BondRecord] {
        &self.bonds
    }

    pub fn layout(&self) -> &BondLayout {
        &self.layout
    }

    pub fn configuration_bonds(&self, configuration: usize) -> Option<&[BondRecord]> {
        let start = *self.layout.bond_array_starts.get(configuration)?;
        let count = *self.layout.bonds_per_configuration.get(configuration)?;
        self.bonds.get(start..start + count)
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}
