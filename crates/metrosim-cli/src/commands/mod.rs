pub mod resume;
pub mod run;

use crate::error::Result;
use crate::logging::run_span;
use crate::utils::progress::CliProgressHandler;
use metrosim::engine::config::SimulationConfig;
use metrosim::engine::progress::ProgressReporter;
use metrosim::workflows::{self, simulate::SimulationResult};
use tracing::info;

/// Runs the simulation workflow with a terminal progress bar and prints a summary.
fn execute(config: &SimulationConfig) -> Result<SimulationResult> {
    let _run = run_span(config).entered();
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core simulation workflow...");
    let result = workflows::simulate::run(config, &reporter)?;
    print_summary(&result, config);
    if let Some(warning) = drift_warning(&result, config.run.energy_tolerance) {
        println!("{}", warning);
    }
    Ok(result)
}

fn drift_warning(result: &SimulationResult, tolerance: f64) -> Option<String> {
    (result.energy_drift > tolerance).then(|| {
        format!(
            "Warning: running energy drifted from the recomputed total by {:.3e} (tolerance {:.1e}).",
            result.energy_drift, tolerance
        )
    })
}

fn print_summary(result: &SimulationResult, config: &SimulationConfig) {
    let summary = &result.summary;
    println!(
        "Ran {} steps ({} -> {}) on the {} backend in {:.2}s.",
        summary.steps,
        summary.step_start,
        summary.final_step(),
        summary.backend,
        summary.run_time.as_secs_f64()
    );
    println!(
        "  Energy: {:.6} -> {:.6} kcal/mol",
        summary.initial_energy, summary.final_energy
    );
    println!(
        "  Accepted {} / Rejected {} ({:.2}% acceptance)",
        summary.accepted,
        summary.rejected,
        summary.acceptance_rate()
    );
    println!("  Results written to: {}", config.output.results_path().display());
}
