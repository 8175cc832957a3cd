//! Pairwise energy evaluation.
//!
//! Two interchangeable backends implement [`EnergyEvaluator`]:
//!
//! - [`sequential::SequentialEvaluator`] walks molecule pairs on the calling thread and
//!   is bit-reproducible for a given box.
//! - [`parallel::ParallelEvaluator`] stages a snapshot of the box, fans the atom pairs
//!   out over the rayon pool using the [`triangular`] slot layout and reduces the slots
//!   in index order.
//!
//! Both apply the same interaction rule: atoms of two different molecules interact only
//! when the minimum-image distance between the molecules' primary atoms is below the
//! cutoff; atoms of the same molecule interact only when intramolecular pairs are
//! enabled.

use crate::core::forcefield::pair::PairPotential;
use crate::core::models::atom::Atom;
use crate::core::models::system::{BoxError, SimulationBox};
use crate::core::utils::geometry::minimum_image_distance;
use crate::engine::error::EngineError;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

pub mod parallel;
pub mod sequential;
pub mod triangular;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    Sequential,
    Parallel,
}

impl Backend {
    /// The label used for this backend in results files.
    pub fn label(self) -> &'static str {
        match self {
            Backend::Sequential => "CPU",
            Backend::Parallel => "Parallel",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sequential => write!(f, "sequential"),
            Backend::Parallel => write!(f, "parallel"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Count pairs of atoms that belong to the same molecule.
    pub include_intramolecular: bool,
}

/// Computes total and per-molecule interaction energies of a box.
///
/// Implementations only read the box for the duration of a call and keep no references
/// to it afterwards.
pub trait EnergyEvaluator: Send + Sync {
    fn backend(&self) -> Backend;

    /// Sum of the pair energy over every interacting atom pair `i < j` of the box.
    fn system_energy(&self, sim_box: &SimulationBox) -> f64;

    /// Sum of the pair energy between every atom of molecule `index` and every atom of
    /// every other interacting molecule, plus its internal pairs when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Box`] if `index` does not name a molecule of the box.
    fn molecular_energy_contribution(
        &self,
        sim_box: &SimulationBox,
        index: usize,
    ) -> Result<f64, EngineError>;
}

/// Creates the evaluator for `backend` around `potential`.
pub fn create_evaluator<P>(
    backend: Backend,
    potential: P,
    options: EvaluatorOptions,
) -> Box<dyn EnergyEvaluator>
where
    P: PairPotential + 'static,
{
    match backend {
        Backend::Sequential => Box::new(sequential::SequentialEvaluator::new(potential, options)),
        Backend::Parallel => Box::new(parallel::ParallelEvaluator::new(potential, options)),
    }
}

/// Relative difference of two energies, measured against the larger magnitude.
pub fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

/// Whether two energies agree within the relative `tolerance`.
pub fn agree_within(a: f64, b: f64, tolerance: f64) -> bool {
    relative_difference(a, b) <= tolerance
}

pub(crate) fn check_index(sim_box: &SimulationBox, index: usize) -> Result<(), EngineError> {
    if index < sim_box.molecule_count() {
        Ok(())
    } else {
        Err(BoxError::IndexOutOfRange {
            index,
            count: sim_box.molecule_count(),
        }
        .into())
    }
}

/// Whether two distinct molecules are close enough to interact.
pub(crate) fn molecules_interact(
    anchor_a: &Point3<f64>,
    anchor_b: &Point3<f64>,
    dimensions: &[f64; 3],
    cutoff: f64,
) -> bool {
    minimum_image_distance(anchor_a, anchor_b, dimensions) < cutoff
}

/// Read-only flattened view of a box, staged once per evaluation call.
///
/// Sites are numbered in box order (molecule by molecule, atom by atom), which is the
/// index space of the triangular pair layout.
pub(crate) struct Snapshot<'a> {
    atoms: Vec<&'a Atom>,
    owners: Vec<usize>,
    ranges: Vec<Range<usize>>,
    anchors: Vec<Point3<f64>>,
    dimensions: [f64; 3],
    cutoff: f64,
    include_intramolecular: bool,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn stage(sim_box: &'a SimulationBox, options: EvaluatorOptions) -> Self {
        let env = sim_box.environment();
        let mut atoms = Vec::with_capacity(sim_box.atom_count());
        let mut owners = Vec::with_capacity(sim_box.atom_count());
        let mut ranges = Vec::with_capacity(sim_box.molecule_count());
        let mut anchors = Vec::with_capacity(sim_box.molecule_count());

        for (index, molecule) in sim_box.molecules().iter().enumerate() {
            let start = atoms.len();
            atoms.extend(molecule.atoms());
            owners.extend(std::iter::repeat_n(index, molecule.len()));
            ranges.push(start..atoms.len());
            anchors.push(molecule.atoms()[env.primary_atom_index].position);
        }

        Self {
            atoms,
            owners,
            ranges,
            anchors,
            dimensions: env.dimensions,
            cutoff: env.cutoff,
            include_intramolecular: options.include_intramolecular,
        }
    }

    pub(crate) fn site_count(&self) -> usize {
        self.atoms.len()
    }

    pub(crate) fn range(&self, molecule: usize) -> Range<usize> {
        self.ranges[molecule].clone()
    }

    /// Energy of the site pair `(a, b)`, or zero when the pair does not interact.
    pub(crate) fn pair_energy<P: PairPotential + ?Sized>(&self, potential: &P, a: usize, b: usize) -> f64 {
        let (owner_a, owner_b) = (self.owners[a], self.owners[b]);
        let interacts = if owner_a == owner_b {
            self.include_intramolecular
        } else {
            molecules_interact(
                &self.anchors[owner_a],
                &self.anchors[owner_b],
                &self.dimensions,
                self.cutoff,
            )
        };
        if !interacts {
            return 0.0;
        }
        let (atom_a, atom_b) = (self.atoms[a], self.atoms[b]);
        let distance = minimum_image_distance(&atom_a.position, &atom_b.position, &self.dimensions);
        potential.energy(atom_a, atom_b, distance)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::models::atom::Atom;
    use crate::core::models::environment::Environment;
    use crate::core::models::molecule::Molecule;
    use crate::core::models::system::SimulationBox;
    use nalgebra::Point3;

    pub fn environment(molecule_count: usize, cutoff: f64) -> Environment {
        Environment {
            dimensions: [20.0, 20.0, 20.0],
            temperature: 298.15,
            max_translation: 0.5,
            max_rotation: 10.0,
            cutoff,
            seed: 1,
            molecule_count,
            primary_atom_index: 0,
        }
    }

    /// Four single-atom molecules whose charges carry the values 1, 2, 3 and 4.
    pub fn valued_atoms() -> SimulationBox {
        let molecules = (0..4)
            .map(|i| {
                let atom = Atom::new(i, "X", "X", Point3::new(2.0 + 3.0 * i as f64, 5.0, 5.0))
                    .with_parameters(0.0, 0.0, (i + 1) as f64);
                Molecule::new(i, vec![atom])
            })
            .collect();
        SimulationBox::new(environment(4, 100.0), molecules).unwrap()
    }

    /// Product of the two atoms' values, ignoring distance.
    pub fn product(a: &Atom, b: &Atom, _distance: f64) -> f64 {
        a.charge * b.charge
    }

    /// Three-atom molecules along x with per-atom values; molecule `m` has values
    /// `m + 1`, `m + 2`, `m + 3`.
    pub fn triatomic_box(count: usize, spacing: f64, cutoff: f64) -> SimulationBox {
        let mut next_id = 0;
        let molecules = (0..count)
            .map(|m| {
                let atoms = (0..3)
                    .map(|k| {
                        let atom = Atom::new(
                            next_id,
                            "C",
                            "C",
                            Point3::new(1.0 + spacing * m as f64 + 0.5 * k as f64, 3.0, 3.0),
                        )
                        .with_parameters(0.0, 0.0, (m + k + 1) as f64);
                        next_id += 1;
                        atom
                    })
                    .collect();
                Molecule::new(m, atoms)
            })
            .collect();
        SimulationBox::new(environment(count, cutoff), molecules).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::core::forcefield::pair::LennardJonesCoulomb;

    #[test]
    fn backend_labels_match_results_file_vocabulary() {
        assert_eq!(Backend::Sequential.label(), "CPU");
        assert_eq!(Backend::Parallel.label(), "Parallel");
        assert_eq!(Backend::Parallel.to_string(), "parallel");
    }

    #[test]
    fn relative_difference_handles_zero_and_sign() {
        assert_eq!(relative_difference(0.0, 0.0), 0.0);
        assert!((relative_difference(-100.0, -99.9) - 0.001).abs() < 1e-12);
        assert!(agree_within(10.0, 10.005, 1e-3));
        assert!(!agree_within(10.0, 10.02, 1e-3));
    }

    #[test]
    fn factory_builds_requested_backend() {
        let options = EvaluatorOptions::default();
        assert_eq!(
            create_evaluator(Backend::Sequential, LennardJonesCoulomb, options).backend(),
            Backend::Sequential
        );
        assert_eq!(
            create_evaluator(Backend::Parallel, LennardJonesCoulomb, options).backend(),
            Backend::Parallel
        );
    }

    #[test]
    fn snapshot_flattens_box_in_order() {
        let sim_box = triatomic_box(3, 4.0, 100.0);
        let snapshot = Snapshot::stage(&sim_box, EvaluatorOptions::default());

        assert_eq!(snapshot.site_count(), 9);
        assert_eq!(snapshot.range(1), 3..6);
        assert_eq!(snapshot.pair_energy(&product, 0, 3), 1.0 * 2.0);
        assert_eq!(snapshot.pair_energy(&product, 0, 1), 0.0);
    }

    #[test]
    fn snapshot_honours_cutoff_between_primary_atoms() {
        let sim_box = triatomic_box(3, 4.0, 5.0);
        let snapshot = Snapshot::stage(&sim_box, EvaluatorOptions::default());

        assert_ne!(snapshot.pair_energy(&product, 0, 3), 0.0);
        // Primary atoms 8 A apart: beyond the cutoff.
        assert_eq!(snapshot.pair_energy(&product, 0, 6), 0.0);
    }

    #[test]
    fn both_backends_reject_out_of_range_molecule() {
        let sim_box = valued_atoms();
        for backend in [Backend::Sequential, Backend::Parallel] {
            let evaluator = create_evaluator(backend, product, EvaluatorOptions::default());
            assert!(matches!(
                evaluator.molecular_energy_contribution(&sim_box, 4),
                Err(EngineError::Box {
                    source: BoxError::IndexOutOfRange { index: 4, count: 4 }
                })
            ));
        }
    }
}
