use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubunitKind {
    /// A polymer chain delimited by chain-terminator records.
    Chain,
    /// Atoms that belong to no chain (e.g. loose ligands or ions).
    NonChain,
    /// Formats that carry no chain information at all.
    Unknown,
}

/// A contiguous range of a [`Protein`](super::protein::Protein)'s atom array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinSubunit {
    pub id: usize,                 // 0-based, in chain-discovery order
    pub kind: SubunitKind,         // What the range represents
    pub atom_count: usize,         // Number of atoms in the range
    pub index_start: usize,        // Offset of the first atom in the parent's array
}

impl ProteinSubunit {
    pub fn new(id: usize, kind: SubunitKind, atom_count: usize, index_start: usize) -> Self {
        Self {
            id,
            kind,
            atom_count,
            index_start,
        }
    }

    /// One past the last atom index covered by this subunit.
    pub fn index_end(&self) -> usize {
        self.index_start + self.atom_count
    }

    pub fn contains(&self, atom_index: usize) -> bool {
        (self.index_start..self.index_end()).contains(&atom_index)
    }

    /// Label suitable for display: `Subunit A` through `Subunit Z`, then numeric.
    pub fn display_name(&self) -> String {
        match self.kind {
            SubunitKind::NonChain => "Non-chain atoms".to_string(),
            SubunitKind::Chain | SubunitKind::Unknown => match u8::try_from(self.id) {
                Ok(offset) if offset < 26 => format!("Subunit {}", (b'A' + offset) as char),
                _ => format!("Subunit {}", self.id + 1),
            },
        }
    }
}

impl fmt::Display for ProteinSubunit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} atoms @ {})",
            self.display_name(),
            self.atom_count,
            self.index_start
        )
    }
}

/// Lays out subunits back to back from per-subunit atom counts, dropping empty ones.
///
/// Retained subunits keep their discovery id; `index_start` is recomputed so the
/// result is a gap-free partition of `[0, sum(counts))`.
pub(crate) fn partition_subunits(
    counts: impl IntoIterator<Item = (usize, SubunitKind, usize)>,
) -> Vec<ProteinSubunit> {
    let mut next_start = 0;
    counts
        .into_iter()
        .filter(|(_, _, atom_count)| *atom_count > 0)
        .map(|(id, kind, atom_count)| {
            let subunit = ProteinSubunit::new(id, kind, atom_count, next_start);
            next_start += atom_count;
            subunit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_letters_then_numbers() {
        let first = ProteinSubunit::new(0, SubunitKind::Chain, 10, 0);
        let last_letter = ProteinSubunit::new(25, SubunitKind::Chain, 10, 0);
        let numeric = ProteinSubunit::new(26, SubunitKind::Chain, 10, 0);
        assert_eq!(first.display_name(), "Subunit A");
        assert_eq!(last_letter.display_name(), "Subunit Z");
        assert_eq!(numeric.display_name(), "Subunit 27");
    }

    #[test]
    fn non_chain_subunits_have_a_fixed_label() {
        let subunit = ProteinSubunit::new(3, SubunitKind::NonChain, 1, 0);
        assert_eq!(subunit.display_name(), "Non-chain atoms");
    }

    #[test]
    fn contains_respects_half_open_range() {
        let subunit = ProteinSubunit::new(0, SubunitKind::Chain, 3, 5);
        assert!(!subunit.contains(4));
        assert!(subunit.contains(5));
        assert!(subunit.contains(7));
        assert!(!subunit.contains(8));
        assert_eq!(subunit.index_end(), 8);
    }

    #[test]
    fn partition_drops_empty_subunits_and_closes_gaps() {
        let subunits = partition_subunits([
            (0, SubunitKind::Chain, 4),
            (1, SubunitKind::Chain, 0),
            (2, SubunitKind::Chain, 3),
            (3, SubunitKind::Chain, 0),
        ]);

        assert_eq!(subunits.len(), 2);
        assert_eq!(subunits[0].id, 0);
        assert_eq!(subunits[0].index_start, 0);
        assert_eq!(subunits[1].id, 2);
        assert_eq!(subunits[1].index_start, 4);
        assert_eq!(subunits[1].index_end(), 7);
    }

    #[test]
    fn partition_of_nothing_is_empty() {
        assert!(partition_subunits(Vec::new()).is_empty());
    }
}
