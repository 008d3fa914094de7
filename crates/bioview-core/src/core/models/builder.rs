use super::composition::{ElementComposition, ResidueComposition};
use super::element::AtomElement;
use super::protein::{BoundingVolume, Position, Protein};
use super::residue::Residue;
use super::subunit::{SubunitKind, partition_subunits};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Configuration has {found} atoms but the template has {expected}")]
pub struct TopologyMismatch {
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug, Clone)]
struct PendingAtom {
    position: Position,
    element: AtomElement,
    residue: Option<Residue>,
}

#[derive(Debug, Clone)]
struct PendingSubunit {
    kind: SubunitKind,
    atoms: Vec<PendingAtom>,
}

impl PendingSubunit {
    fn new(kind: SubunitKind) -> Self {
        Self {
            kind,
            atoms: Vec::new(),
        }
    }
}

/// Accumulates one model's atoms and freezes them into a [`Protein`].
///
/// Atoms are pushed in file order into the currently open subunit. Additional
/// trajectory frames are pushed as bare position lists that follow the same
/// per-atom order as the template. [`build`](Self::build) performs the canonical
/// per-element reordering, so callers never need to care about layout.
#[derive(Debug, Clone)]
pub struct ProteinBuilder {
    subunit_kind: SubunitKind,
    subunits: Vec<PendingSubunit>,
    sequence: Option<Vec<Residue>>,
    extra_configurations: Vec<Vec<Position>>,
    configuration_energies: Vec<Option<f32>>,
}

impl Default for ProteinBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProteinBuilder {
    /// A builder with one open [`SubunitKind::Chain`] subunit and no residue tracking.
    pub fn new() -> Self {
        Self::with_subunit_kind(SubunitKind::Chain)
    }

    pub fn with_subunit_kind(kind: SubunitKind) -> Self {
        Self {
            subunit_kind: kind,
            subunits: vec![PendingSubunit::new(kind)],
            sequence: None,
            extra_configurations: Vec::new(),
            configuration_energies: Vec::new(),
        }
    }

    /// Enables sequence and residue-composition tracking for formats that carry residues.
    pub fn track_residues(mut self) -> Self {
        self.sequence.get_or_insert_with(Vec::new);
        self
    }

    pub fn push_atom(
        &mut self,
        position: Position,
        element: AtomElement,
        residue: Option<Residue>,
    ) -> &mut Self {
        let atom = PendingAtom {
            position,
            element,
            residue,
        };
        match self.subunits.last_mut() {
            Some(subunit) => subunit.atoms.push(atom),
            None => {
                let mut subunit = PendingSubunit::new(self.subunit_kind);
                subunit.atoms.push(atom);
                self.subunits.push(subunit);
            }
        }
        self
    }

    /// Records a residue boundary. Ignored unless residue tracking is enabled.
    pub fn push_residue(&mut self, residue: Residue) -> &mut Self {
        if let Some(sequence) = self.sequence.as_mut() {
            sequence.push(residue);
        }
        self
    }

    /// Closes the open subunit and opens a new, empty one.
    pub fn start_subunit(&mut self) -> &mut Self {
        self.subunits.push(PendingSubunit::new(self.subunit_kind));
        self
    }

    /// Appends another trajectory frame whose positions follow the template's atom order.
    pub fn push_configuration(
        &mut self,
        positions: Vec<Position>,
    ) -> Result<&mut Self, TopologyMismatch> {
        let expected = self.atom_count();
        if positions.len() != expected {
            return Err(TopologyMismatch {
                expected,
                found: positions.len(),
            });
        }
        self.extra_configurations.push(positions);
        Ok(self)
    }

    /// Energy for each configuration, in configuration order; missing slots are `None`.
    pub fn configuration_energies(&mut self, energies: Vec<Option<f32>>) -> &mut Self {
        self.configuration_energies = energies;
        self
    }

    /// Atoms accumulated so far in the template configuration.
    pub fn atom_count(&self) -> usize {
        self.subunits.iter().map(|s| s.atoms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_count() == 0
    }

    pub fn build(self) -> Protein {
        let subunit_counts: Vec<_> = self
            .subunits
            .iter()
            .enumerate()
            .map(|(id, subunit)| (id, subunit.kind, subunit.atoms.len()))
            .collect();
        let flattened: Vec<PendingAtom> = self
            .subunits
            .into_iter()
            .flat_map(|subunit| subunit.atoms)
            .collect();

        let element_composition: ElementComposition =
            flattened.iter().map(|atom| atom.element).collect();
        let residue_composition: Option<ResidueComposition> = self
            .sequence
            .as_ref()
            .map(|_| flattened.iter().filter_map(|atom| atom.residue).collect());

        // Stable sort keeps file order within each element group.
        let mut order: Vec<usize> = (0..flattened.len()).collect();
        order.sort_by_key(|&index| flattened[index].element.group());

        let configuration_count = 1 + self.extra_configurations.len();
        let mut atoms = Vec::with_capacity(flattened.len() * configuration_count);
        atoms.extend(order.iter().map(|&index| flattened[index].position));
        for frame in &self.extra_configurations {
            atoms.extend(order.iter().map(|&index| frame[index]));
        }
        let atom_elements = order.iter().map(|&index| flattened[index].element).collect();

        let configuration_energies = if self.configuration_energies.iter().any(Option::is_some) {
            let mut energies = self.configuration_energies;
            energies.resize(configuration_count, None);
            Some(energies)
        } else {
            None
        };

        Protein {
            bounding_volume: BoundingVolume::enclosing(&atoms),
            atoms,
            atom_elements,
            configuration_count,
            configuration_energies,
            subunits: partition_subunits(subunit_counts),
            sequence: self.sequence,
            element_composition,
            residue_composition,
            connectivity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::ElementGroup;

    fn p(x: f32) -> Position {
        Position::new(x, 0.0, 0.0)
    }

    #[test]
    fn build_groups_atoms_by_element_in_canonical_order() {
        let mut builder = ProteinBuilder::new();
        builder
            .push_atom(p(0.0), AtomElement::Sulfur, None)
            .push_atom(p(1.0), AtomElement::Hydrogen, None)
            .push_atom(p(2.0), AtomElement::Carbon, None)
            .push_atom(p(3.0), AtomElement::Phosphorus, None)
            .push_atom(p(4.0), AtomElement::Nitrogen, None)
            .push_atom(p(5.0), AtomElement::Carbon, None)
            .push_atom(p(6.0), AtomElement::Oxygen, None);
        let protein = builder.build();

        let groups: Vec<ElementGroup> = protein.atom_elements().iter().map(|e| e.group()).collect();
        assert!(groups.windows(2).all(|w| w[0] <= w[1]));
        let xs: Vec<f32> = protein.atoms().iter().map(|a| a.x).collect();
        assert_eq!(xs, vec![2.0, 5.0, 4.0, 1.0, 6.0, 0.0, 3.0]);
    }

    #[test]
    fn build_discards_empty_subunits_and_partitions_the_rest() {
        let mut builder = ProteinBuilder::new();
        builder.push_atom(p(0.0), AtomElement::Carbon, None);
        builder.push_atom(p(1.0), AtomElement::Carbon, None);
        builder.start_subunit();
        builder.start_subunit();
        builder.push_atom(p(2.0), AtomElement::Nitrogen, None);
        builder.start_subunit();
        let protein = builder.build();

        let subunits = protein.subunits();
        assert_eq!(subunits.len(), 2);
        assert_eq!((subunits[0].id, subunits[0].index_start, subunits[0].atom_count), (0, 0, 2));
        assert_eq!((subunits[1].id, subunits[1].index_start, subunits[1].atom_count), (2, 2, 1));
        assert_eq!(
            subunits.iter().map(|s| s.atom_count).sum::<usize>(),
            protein.atom_count()
        );
    }

    #[test]
    fn composition_total_matches_atom_count() {
        let mut builder = ProteinBuilder::new();
        for element in [AtomElement::Carbon, AtomElement::Unknown, AtomElement::Iron] {
            builder.push_atom(p(0.0), element, None);
        }
        let protein = builder.build();
        assert_eq!(protein.element_composition().total_count(), protein.atom_count());
        assert!(protein.residue_composition().is_none());
        assert!(protein.sequence().is_none());
    }

    #[test]
    fn residue_tracking_collects_sequence_and_per_atom_composition() {
        let mut builder = ProteinBuilder::new().track_residues();
        builder.push_residue(Residue::Alanine);
        builder.push_atom(p(0.0), AtomElement::Nitrogen, Some(Residue::Alanine));
        builder.push_atom(p(1.0), AtomElement::Carbon, Some(Residue::Alanine));
        builder.push_residue(Residue::Glycine);
        builder.push_atom(p(2.0), AtomElement::Carbon, Some(Residue::Glycine));
        builder.push_atom(p(3.0), AtomElement::Zinc, None);
        let protein = builder.build();

        assert_eq!(protein.sequence(), Some(&[Residue::Alanine, Residue::Glycine][..]));
        let residues = protein.residue_composition().unwrap();
        assert_eq!(residues.count(Residue::Alanine), 2);
        assert_eq!(residues.count(Residue::Glycine), 1);
        assert_eq!(residues.total_count(), 3);
    }

    #[test]
    fn push_residue_without_tracking_is_ignored() {
        let mut builder = ProteinBuilder::new();
        builder.push_residue(Residue::Alanine);
        builder.push_atom(p(0.0), AtomElement::Carbon, Some(Residue::Alanine));
        assert!(builder.build().sequence().is_none());
    }

    #[test]
    fn extra_configurations_share_the_template_permutation() {
        let mut builder = ProteinBuilder::with_subunit_kind(SubunitKind::Unknown);
        builder.push_atom(p(0.0), AtomElement::Oxygen, None);
        builder.push_atom(p(1.0), AtomElement::Carbon, None);
        builder.push_configuration(vec![p(10.0), p(11.0)]).unwrap();
        builder.configuration_energies(vec![Some(-1.5)]);
        let protein = builder.build();

        assert_eq!(protein.configuration_count(), 2);
        assert_eq!(protein.atom_count(), 2);
        let xs: Vec<f32> = protein.atoms().iter().map(|a| a.x).collect();
        assert_eq!(xs, vec![1.0, 0.0, 11.0, 10.0]);
        assert_eq!(protein.configuration_energies(), Some(&[Some(-1.5), None][..]));
    }

    #[test]
    fn push_configuration_rejects_a_different_atom_count() {
        let mut builder = ProteinBuilder::new();
        builder.push_atom(p(0.0), AtomElement::Carbon, None);
        let err = builder.push_configuration(vec![p(1.0), p(2.0)]).unwrap_err();
        assert_eq!(err, TopologyMismatch { expected: 1, found: 2 });
    }

    #[test]
    fn energies_are_dropped_when_none_were_found() {
        let mut builder = ProteinBuilder::new();
        builder.push_atom(p(0.0), AtomElement::Carbon, None);
        builder.configuration_energies(vec![None]);
        assert!(builder.build().configuration_energies().is_none());
    }
}
