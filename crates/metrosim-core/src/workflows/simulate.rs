use super::report::ResultsReport;
use crate::core::forcefield::pair::LennardJonesCoulomb;
use crate::core::forcefield::params::ForcefieldParams;
use crate::core::io::pdb::write_pdb_to_path;
use crate::core::io::setup::{MoleculeTemplate, SetupError, build_box};
use crate::core::io::state::{StateFile, StateMetadata};
use crate::core::io::traits::BoxFile;
use crate::core::models::system::SimulationBox;
use crate::engine::config::{BoxSource, OutputConfig, SimulationConfig};
use crate::engine::error::EngineError;
use crate::engine::evaluator::{EvaluatorOptions, create_evaluator, relative_difference};
use crate::engine::metropolis::MetropolisDriver;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sink::ReportSink;
use crate::engine::state::RunSummary;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub summary: RunSummary,
    pub sim_box: SimulationBox,
    /// Relative gap between the running energy and a full recomputation at the end.
    pub energy_drift: f64,
}

/// Writes checkpoints, the trajectory snapshot and the results file into the output
/// directory.
pub struct FileSink<'a> {
    output: &'a OutputConfig,
    save_final_state: bool,
}

impl<'a> FileSink<'a> {
    pub fn new(output: &'a OutputConfig, save_final_state: bool) -> Self {
        Self {
            output,
            save_final_state,
        }
    }

    fn write_state(&self, step: usize, sim_box: &SimulationBox) -> Result<(), EngineError> {
        let path = self.output.state_path(step);
        StateFile::write_to_path(sim_box, &StateMetadata { step }, &path)?;
        info!("Saved state at step {} to '{}'.", step, path.display());
        Ok(())
    }
}

impl ReportSink for FileSink<'_> {
    fn checkpoint(&mut self, step: usize, sim_box: &SimulationBox) -> Result<(), EngineError> {
        self.write_state(step, sim_box)
    }

    fn finish(&mut self, summary: &RunSummary, sim_box: &SimulationBox) -> Result<(), EngineError> {
        let mut first_error: Option<EngineError> = None;
        let mut record = |result: Result<(), EngineError>| {
            if let Err(e) = result {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        };

        let results_path = self.output.results_path();
        record(
            ResultsReport::new(summary, self.output.name.as_deref())
                .write_to_path(&results_path)
                .map_err(EngineError::from),
        );
        record(write_pdb_to_path(sim_box, self.output.trajectory_path()).map_err(EngineError::from));
        if self.save_final_state {
            record(self.write_state(summary.final_step(), sim_box));
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Wrote results to '{}'.", results_path.display());
                Ok(())
            }
        }
    }
}

/// Runs a complete simulation described by `config`.
///
/// # Errors
///
/// Fails if the starting box cannot be built or read. Problems writing checkpoints or
/// reports are logged and do not fail the run.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    config: &SimulationConfig,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    // === Phase 0: Obtain the starting box ===
    reporter.report(Progress::PhaseStart { name: "Setup" });
    let (mut sim_box, step_start, rng) = prepare_box(config)?;
    info!(
        molecules = sim_box.molecule_count(),
        atoms = sim_box.atom_count(),
        "Box ready at step {}.",
        step_start
    );

    if let Err(e) = std::fs::create_dir_all(&config.output.directory) {
        warn!(
            "Could not create output directory '{}': {}",
            config.output.directory.display(),
            e
        );
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Metropolis loop ===
    let evaluator = create_evaluator(
        config.run.backend,
        LennardJonesCoulomb,
        EvaluatorOptions {
            include_intramolecular: config.run.include_intramolecular,
        },
    );
    info!("Using the {} backend.", config.run.backend);

    let mut sink = FileSink::new(&config.output, config.run.save_final_state);
    let mut driver = MetropolisDriver::with_rng(evaluator.as_ref(), &sim_box, rng);
    let summary = driver.run(&mut sim_box, &config.run, step_start, &mut sink, reporter)?;

    // === Phase 2: Verify the running total ===
    let recomputed = evaluator.system_energy(&sim_box);
    let energy_drift = relative_difference(summary.final_energy, recomputed);
    if energy_drift > config.run.energy_tolerance {
        warn!(
            "Running energy {:.6} differs from recomputed energy {:.6} (relative {:.3e}).",
            summary.final_energy, recomputed, energy_drift
        );
    } else {
        info!(drift = energy_drift, "Running energy matches recomputation.");
    }

    Ok(SimulationResult {
        summary,
        sim_box,
        energy_drift,
    })
}

/// Builds or loads the starting box and creates the run's random stream.
///
/// A generated box and the run that follows share one stream seeded from the
/// environment. A resumed run does not reuse the plain environment seed: it seeds from
/// that seed offset by the starting step, so continuing a checkpoint never replays the
/// proposal sequence the original run started with.
fn prepare_box(config: &SimulationConfig) -> Result<(SimulationBox, usize, StdRng), EngineError> {
    match &config.source {
        BoxSource::Generate {
            environment,
            forcefield_path,
            topology_path,
        } => {
            info!("Building a new box from '{}'.", topology_path.display());
            let params = ForcefieldParams::load(forcefield_path).map_err(SetupError::from)?;
            let template = MoleculeTemplate::from_path(topology_path)?;
            let mut rng = StdRng::seed_from_u64(environment.seed);
            let sim_box = build_box(environment.clone(), &template, &params, &mut rng)?;
            Ok((sim_box, 0, rng))
        }
        BoxSource::Resume { state_path } => {
            info!("Resuming from '{}'.", state_path.display());
            let (sim_box, metadata) = StateFile::read_from_path(state_path)?;
            let seed = sim_box
                .environment()
                .seed
                .wrapping_add(metadata.step as u64);
            Ok((sim_box, metadata.step, StdRng::seed_from_u64(seed)))
        }
    }
}
