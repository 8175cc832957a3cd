use super::triangular;
use super::{Backend, EnergyEvaluator, EvaluatorOptions, Snapshot, check_index};
use crate::core::forcefield::pair::PairPotential;
use crate::core::models::system::SimulationBox;
use crate::engine::error::EngineError;
use rayon::prelude::*;
use tracing::{instrument, trace};

/// Data-parallel evaluator on the rayon thread pool.
///
/// Every call stages a flattened [`Snapshot`] of the box and distributes pair work over
/// independent tasks that each own a disjoint part of an output buffer. The buffer is
/// reduced in index order, so the result is deterministic for a given box even though
/// it may differ from the sequential backend in the last bits.
pub struct ParallelEvaluator<P> {
    potential: P,
    options: EvaluatorOptions,
}

impl<P: PairPotential> ParallelEvaluator<P> {
    pub fn new(potential: P, options: EvaluatorOptions) -> Self {
        Self { potential, options }
    }
}

impl<P: PairPotential> EnergyEvaluator for ParallelEvaluator<P> {
    fn backend(&self) -> Backend {
        Backend::Parallel
    }

    #[instrument(skip_all, name = "parallel_system_energy")]
    fn system_energy(&self, sim_box: &SimulationBox) -> f64 {
        let snapshot = Snapshot::stage(sim_box, self.options);
        let n = snapshot.site_count();
        trace!(sites = n, pairs = triangular::pair_count(n), "Evaluating all pairs.");

        triangular::parallel_sum(n, |a, b| snapshot.pair_energy(&self.potential, a, b))
    }

    fn molecular_energy_contribution(
        &self,
        sim_box: &SimulationBox,
        index: usize,
    ) -> Result<f64, EngineError> {
        check_index(sim_box, index)?;
        let snapshot = Snapshot::stage(sim_box, self.options);
        let n = snapshot.site_count();
        let target = snapshot.range(index);
        let (start, len) = (target.start, target.len());
        let others = n - len;

        // One row per target atom, one column per atom outside the target molecule.
        let mut slots = vec![0.0; len * others];
        if others > 0 {
            slots
                .par_chunks_mut(others)
                .enumerate()
                .for_each(|(row, out)| {
                    let a = start + row;
                    for (k, slot) in out.iter_mut().enumerate() {
                        let b = if k < start { k } else { k + len };
                        *slot = snapshot.pair_energy(&self.potential, a, b);
                    }
                });
        }
        let external: f64 = slots.iter().sum();

        let internal = if self.options.include_intramolecular {
            triangular::parallel_sum(len, |a, b| {
                snapshot.pair_energy(&self.potential, start + a, start + b)
            })
        } else {
            0.0
        };

        Ok(external + internal)
    }
}
