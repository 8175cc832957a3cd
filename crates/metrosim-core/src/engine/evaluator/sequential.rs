use super::{Backend, EnergyEvaluator, EvaluatorOptions, check_index, molecules_interact};
use crate::core::forcefield::pair::PairPotential;
use crate::core::models::molecule::Molecule;
use crate::core::models::system::SimulationBox;
use crate::core::utils::geometry::minimum_image_distance;
use crate::engine::error::EngineError;
use itertools::Itertools;

/// Single-threaded evaluator.
///
/// Walks molecule pairs in index order and skips whole pairs beyond the cutoff. The
/// summation order is fixed, so repeated calls on the same box give bit-identical
/// results.
pub struct SequentialEvaluator<P> {
    potential: P,
    options: EvaluatorOptions,
}

impl<P: PairPotential> SequentialEvaluator<P> {
    pub fn new(potential: P, options: EvaluatorOptions) -> Self {
        Self { potential, options }
    }

    fn intermolecular(&self, a: &Molecule, b: &Molecule, sim_box: &SimulationBox) -> f64 {
        let env = sim_box.environment();
        let primary = env.primary_atom_index;
        if !molecules_interact(
            &a.atoms()[primary].position,
            &b.atoms()[primary].position,
            &env.dimensions,
            env.cutoff,
        ) {
            return 0.0;
        }

        let mut energy = 0.0;
        for atom_a in a.atoms() {
            for atom_b in b.atoms() {
                let distance =
                    minimum_image_distance(&atom_a.position, &atom_b.position, &env.dimensions);
                energy += self.potential.energy(atom_a, atom_b, distance);
            }
        }
        energy
    }

    fn intramolecular(&self, molecule: &Molecule, dimensions: &[f64; 3]) -> f64 {
        if !self.options.include_intramolecular {
            return 0.0;
        }
        molecule
            .atoms()
            .iter()
            .tuple_combinations()
            .map(|(a, b)| {
                let distance = minimum_image_distance(&a.position, &b.position, dimensions);
                self.potential.energy(a, b, distance)
            })
            .sum()
    }
}

impl<P: PairPotential> EnergyEvaluator for SequentialEvaluator<P> {
    fn backend(&self) -> Backend {
        Backend::Sequential
    }

    fn system_energy(&self, sim_box: &SimulationBox) -> f64 {
        let molecules = sim_box.molecules();
        let dimensions = &sim_box.environment().dimensions;

        let internal: f64 = molecules
            .iter()
            .map(|m| self.intramolecular(m, dimensions))
            .sum();
        let external: f64 = molecules
            .iter()
            .tuple_combinations()
            .map(|(a, b)| self.intermolecular(a, b, sim_box))
            .sum();
        internal + external
    }

    fn molecular_energy_contribution(
        &self,
        sim_box: &SimulationBox,
        index: usize,
    ) -> Result<f64, EngineError> {
        check_index(sim_box, index)?;
        let molecules = sim_box.molecules();
        let target = &molecules[index];

        let external: f64 = molecules
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .map(|(_, m)| self.intermolecular(target, m, sim_box))
            .sum();
        Ok(external + self.intramolecular(target, &sim_box.environment().dimensions))
    }
}
