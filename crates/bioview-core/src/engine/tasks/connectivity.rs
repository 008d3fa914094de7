use crate::core::models::bond::{BondRecord, Connectivity};
use crate::core::models::protein::{Position, Protein};
use crate::engine::config::{ConnectivityConfig, ConnectivityStrategy};
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use kiddo::{KdTree, SquaredEuclidean};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Finds bonds by a fixed distance threshold, one configuration at a time.
///
/// Every pair of atoms `(i, j)` with `j < i` inside a configuration whose
/// separation is strictly below [`ConnectivityConfig::bond_threshold`] becomes a
/// [`BondRecord`] with `atom_a = j` and `atom_b = i` (both indices into the
/// flattened atom array). Bonds are emitted row by row, so the output order is
/// the same for every strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityGenerator {
    config: ConnectivityConfig,
}

struct RowScan<'a, 'r> {
    positions: &'a [Position],
    base: usize,
    threshold_sq: f32,
    radius: f32,
    reporter: &'a ProgressReporter<'r>,
    cancel: &'a CancellationToken,
}

impl RowScan<'_, '_> {
    fn bond_if_close(&self, j: usize, i: usize) -> Option<BondRecord> {
        let (a, b) = (self.positions[j], self.positions[i]);
        (nalgebra::distance_squared(&a, &b) < self.threshold_sq)
            .then(|| BondRecord::new(self.base + j, a, self.base + i, b, self.radius))
    }

    fn finish_row(&self, i: usize) {
        self.reporter.report(Progress::TaskIncrement { amount: i as u64 });
    }

    fn brute_force(&self) -> Option<Vec<BondRecord>> {
        let mut bonds = Vec::new();
        for i in 0..self.positions.len() {
            if self.cancel.is_cancelled() {
                return None;
            }
            bonds.extend((0..i).filter_map(|j| self.bond_if_close(j, i)));
            self.finish_row(i);
        }
        Some(bonds)
    }

    /// Coincident atoms share one tree entry, so a kiddo leaf never has to hold
    /// more identical points than its bucket size.
    fn spatial_index(&self) -> Option<Vec<BondRecord>> {
        let mut slot_by_position: HashMap<[u32; 3], usize> = HashMap::new();
        let mut unique: Vec<[f64; 3]> = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut slot_of_atom = Vec::with_capacity(self.positions.len());
        for (index, p) in self.positions.iter().enumerate() {
            // `+ 0.0` folds -0.0 into 0.0.
            let key = [p.x, p.y, p.z].map(|c| (c + 0.0).to_bits());
            let slot = *slot_by_position.entry(key).or_insert_with(|| {
                unique.push([p.x as f64, p.y as f64, p.z as f64]);
                members.push(Vec::new());
                unique.len() - 1
            });
            members[slot].push(index);
            slot_of_atom.push(slot);
        }
        let kdtree: KdTree<f64, 3> = (&unique).into();
        // Slightly widened so rounding in the tree never hides a pair the exact test accepts.
        let query_radius = self.threshold_sq as f64 * (1.0 + 1e-4) + 1e-6;

        let mut bonds = Vec::new();
        let mut candidates = Vec::new();
        for (i, &slot) in slot_of_atom.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return None;
            }
            candidates.clear();
            for neighbour in kdtree.within::<SquaredEuclidean>(&unique[slot], query_radius) {
                let atoms = &members[neighbour.item as usize];
                candidates.extend(atoms.iter().copied().take_while(|&j| j < i));
            }
            candidates.sort_unstable();
            bonds.extend(candidates.iter().filter_map(|&j| self.bond_if_close(j, i)));
            self.finish_row(i);
        }
        Some(bonds)
    }
}

impl ConnectivityGenerator {
    pub fn new(config: ConnectivityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectivityConfig {
        &self.config
    }

    /// Computes the bond set of every configuration of `protein`.
    ///
    /// Cancellation is checked before each outer row. Progress is reported in
    /// compared pairs, out of `configurations * n * (n - 1) / 2`.
    ///
    /// # Return
    ///
    /// Returns `None` if `cancel` fired before the scan completed; nothing
    /// partial is ever returned.
    #[instrument(skip_all, name = "connectivity_task", fields(strategy = %self.config.strategy))]
    pub fn generate(
        &self,
        protein: &Protein,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Option<Connectivity> {
        let atom_count = protein.atom_count();
        let pairs_per_configuration = (atom_count * atom_count.saturating_sub(1) / 2) as u64;
        let total_steps = pairs_per_configuration * protein.configuration_count() as u64;

        info!(
            atoms = atom_count,
            configurations = protein.configuration_count(),
            threshold = self.config.bond_threshold,
            "Generating connectivity."
        );
        reporter.report(Progress::PhaseStart {
            name: "Connectivity",
        });
        reporter.report(Progress::TaskStart { total_steps });

        let mut per_configuration = Vec::with_capacity(protein.configuration_count());
        for configuration in 0..protein.configuration_count() {
            let positions = protein.configuration_atoms(configuration)?;
            let scan = RowScan {
                positions,
                base: configuration * atom_count,
                threshold_sq: self.config.bond_threshold * self.config.bond_threshold,
                radius: self.config.bond_radius,
                reporter,
                cancel,
            };
            let bonds = match self.config.strategy {
                ConnectivityStrategy::BruteForce => scan.brute_force(),
                ConnectivityStrategy::SpatialIndex => scan.spatial_index(),
            };
            let Some(bonds) = bonds else {
                info!(configuration, "Connectivity generation cancelled.");
                reporter.report(Progress::Message("Connectivity cancelled".to_string()));
                return None;
            };
            debug!(configuration, bonds = bonds.len(), "Configuration scanned.");
            per_configuration.push(bonds);
        }

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        let connectivity = Connectivity::from_configurations(per_configuration);
        info!(bonds = connectivity.len(), "Connectivity complete.");
        Some(connectivity)
    }

    /// Generates bonds and publishes them on `protein` in one step.
    ///
    /// Returns `false` on cancellation, in which case `protein` is untouched.
    pub fn generate_and_attach(
        &self,
        protein: &mut Protein,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> bool {
        match self.generate(protein, reporter, cancel) {
            Some(connectivity) => {
                protein.attach_connectivity(connectivity);
                true
            }
            None => false,
        }
    }
}
