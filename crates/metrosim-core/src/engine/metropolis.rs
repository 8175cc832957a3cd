use super::config::RunConfig;
use super::error::EngineError;
use super::evaluator::EnergyEvaluator;
use super::progress::{Progress, ProgressReporter};
use super::sink::ReportSink;
use super::state::{RunSummary, StepOutcome};
use crate::core::models::system::SimulationBox;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// The Metropolis acceptance test.
///
/// A proposal that lowers the energy is accepted without consulting `draw`. Otherwise
/// `draw` is called exactly once for a uniform sample in `[0, 1)` and the move is
/// accepted when `exp(-(new - old) / kt)` is at least that sample.
pub fn metropolis_accept<F>(old_energy: f64, new_energy: f64, kt: f64, draw: F) -> bool
where
    F: FnOnce() -> f64,
{
    if new_energy < old_energy {
        return true;
    }
    let probability = (-(new_energy - old_energy) / kt).exp();
    probability >= draw()
}

/// Runs the propose, evaluate, accept-or-rollback loop.
///
/// The driver owns the run's random stream. Within a step, draws are consumed in a
/// fixed order: molecule choice, the six move components, then (only for uphill moves)
/// the acceptance sample. The stream is independent of the evaluator, so both backends
/// see the same sequence of proposals for the same seed.
pub struct MetropolisDriver<'a> {
    evaluator: &'a dyn EnergyEvaluator,
    rng: StdRng,
    kt: f64,
    current_energy: f64,
    accepted: usize,
    rejected: usize,
}

impl<'a> MetropolisDriver<'a> {
    /// Creates a driver seeded from the box's environment and computes the starting
    /// energy with `evaluator`.
    pub fn new(evaluator: &'a dyn EnergyEvaluator, sim_box: &SimulationBox) -> Self {
        let rng = StdRng::seed_from_u64(sim_box.environment().seed);
        Self::with_rng(evaluator, sim_box, rng)
    }

    pub fn with_rng(evaluator: &'a dyn EnergyEvaluator, sim_box: &SimulationBox, rng: StdRng) -> Self {
        let current_energy = evaluator.system_energy(sim_box);
        debug!(energy = current_energy, backend = %evaluator.backend(), "Computed starting energy.");
        Self {
            evaluator,
            rng,
            kt: sim_box.environment().kt(),
            current_energy,
            accepted: 0,
            rejected: 0,
        }
    }

    pub fn current_energy(&self) -> f64 {
        self.current_energy
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Performs one Monte Carlo step on `sim_box`.
    ///
    /// # Errors
    ///
    /// Propagates evaluator and box failures. A failing evaluation after the move has
    /// been applied rolls the move back before returning.
    pub fn step(&mut self, sim_box: &mut SimulationBox) -> Result<StepOutcome, EngineError> {
        let index = sim_box.choose_molecule_index(&mut self.rng);
        let old_energy = self
            .evaluator
            .molecular_energy_contribution(sim_box, index)?;

        sim_box.apply_move(index, &mut self.rng)?;

        let new_energy = match self.evaluator.molecular_energy_contribution(sim_box, index) {
            Ok(energy) => energy,
            Err(e) => {
                sim_box.rollback(index);
                return Err(e);
            }
        };

        let delta = new_energy - old_energy;
        let rng = &mut self.rng;
        let accepted = metropolis_accept(old_energy, new_energy, self.kt, || rng.r#gen::<f64>());

        if accepted {
            sim_box.commit(index);
            self.current_energy += delta;
            self.accepted += 1;
        } else {
            sim_box.rollback(index);
            self.rejected += 1;
        }

        Ok(StepOutcome {
            molecule: index,
            accepted,
            delta,
        })
    }

    /// Runs `config.steps` steps numbered from `step_start`.
    ///
    /// When status reporting is enabled the starting energy is reported at `step_start`
    /// before the first move. After each step the completed step number is compared
    /// against the status and checkpoint intervals, both measured from `step_start`.
    /// Sink failures are logged and do not interrupt the run.
    #[instrument(skip_all, name = "metropolis_run", fields(backend = %self.evaluator.backend()))]
    pub fn run(
        &mut self,
        sim_box: &mut SimulationBox,
        config: &RunConfig,
        step_start: usize,
        sink: &mut dyn ReportSink,
        reporter: &ProgressReporter,
    ) -> Result<RunSummary, EngineError> {
        let initial_energy = self.current_energy;
        let (accepted_before, rejected_before) = (self.accepted, self.rejected);
        let started = Instant::now();

        info!(
            "Running {} steps from step {} (starting energy {:.6}).",
            config.steps, step_start, initial_energy
        );
        reporter.report(Progress::PhaseStart {
            name: "Monte Carlo",
        });
        reporter.report(Progress::TaskStart {
            total_steps: config.steps as u64,
        });
        if config.status_interval > 0 {
            self.report_status(step_start, reporter);
        }

        for step in step_start..step_start + config.steps {
            self.step(sim_box)?;
            reporter.report(Progress::TaskIncrement);

            let completed = step + 1;
            let elapsed = completed - step_start;
            if config.status_interval > 0 && elapsed % config.status_interval == 0 {
                self.report_status(completed, reporter);
            }
            if config.state_interval > 0 && elapsed % config.state_interval == 0 {
                if let Err(e) = sink.checkpoint(completed, sim_box) {
                    warn!("Checkpoint at step {} failed: {}", completed, e);
                }
            }
        }

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        let summary = RunSummary {
            backend: self.evaluator.backend(),
            step_start,
            steps: config.steps,
            molecule_count: sim_box.molecule_count(),
            initial_energy,
            final_energy: self.current_energy,
            accepted: self.accepted - accepted_before,
            rejected: self.rejected - rejected_before,
            run_time: started.elapsed(),
        };
        info!(
            "Finished: final energy {:.6}, {} accepted, {} rejected ({:.2}%).",
            summary.final_energy,
            summary.accepted,
            summary.rejected,
            summary.acceptance_rate()
        );

        if let Err(e) = sink.finish(&summary, sim_box) {
            warn!("Writing the final report failed: {}", e);
        }
        Ok(summary)
    }

    fn report_status(&self, step: usize, reporter: &ProgressReporter) {
        info!("Step {}: current energy {:.6}", step, self.current_energy);
        reporter.report(Progress::Status {
            step,
            energy: self.current_energy,
        });
    }
}
