use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileEnvironmentConfig};
use crate::cli::{ResumeArgs, RunArgs, RunOverrides};
use crate::error::{CliError, Result};
use metrosim::core::models::environment::Environment;
use metrosim::engine::config::{SimulationConfig, SimulationConfigBuilder};
use std::path::PathBuf;
use tracing::debug;

/// Builds the configuration of a fresh run. Precedence is defaults, then the config
/// file, then `--set` values, then dedicated command-line flags.
pub fn build_run_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut file_config = FileConfig::from_file(&args.config)?;
    file_config.apply_set_values(&args.overrides.set_values)?;

    let defaults = DefaultsConfig::default();
    let mut environment = merge_environment(
        file_config.environment.take().unwrap_or_default(),
        &defaults,
    )?;
    if let Some(seed) = args.seed {
        environment.seed = seed;
    }

    let files = file_config.files.clone().unwrap_or_default();
    let forcefield = files.forcefield.ok_or_else(|| required("files.forcefield"))?;
    let topology = files.topology.ok_or_else(|| required("files.topology"))?;

    let builder = SimulationConfigBuilder::new()
        .environment(environment)
        .forcefield_path(forcefield)
        .topology_path(topology);
    finish(builder, &file_config, &args.overrides, &defaults)
}

/// Builds the configuration of a resumed run. The state file supplies the box and its
/// environment, so an `[environment]` section in the config file is ignored.
pub fn build_resume_config(args: &ResumeArgs) -> Result<SimulationConfig> {
    let mut file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    file_config.apply_set_values(&args.overrides.set_values)?;
    if file_config.environment.take().is_some() {
        debug!("Ignoring [environment] settings; the state file defines the box.");
    }

    let defaults = DefaultsConfig::default();
    let builder = SimulationConfigBuilder::new().resume_from(args.state.clone());
    finish(builder, &file_config, &args.overrides, &defaults)
}

fn finish(
    builder: SimulationConfigBuilder,
    file_config: &FileConfig,
    cli: &RunOverrides,
    defaults: &DefaultsConfig,
) -> Result<SimulationConfig> {
    let sim = file_config.simulation.clone().unwrap_or_default();
    let files = file_config.files.clone().unwrap_or_default();

    let backend = cli
        .backend
        .selected()
        .or(sim.backend)
        .unwrap_or(defaults.backend);
    let steps = cli.steps.or(sim.steps).unwrap_or(defaults.steps);
    let status_interval = cli
        .status_interval
        .or(sim.status_interval)
        .unwrap_or(defaults.status_interval);
    let state_interval = cli
        .state_interval
        .or(sim.state_interval)
        .unwrap_or(defaults.state_interval);
    let save_final_state = !cli.no_final_state
        && sim
            .save_final_state
            .unwrap_or(defaults.save_final_state);
    let name = cli.name.clone().or_else(|| file_config.name.clone());
    let output_dir = cli
        .output_dir
        .clone()
        .or(files.output_dir)
        .unwrap_or_else(|| PathBuf::from(defaults.output_dir));

    builder
        .backend(backend)
        .steps(steps)
        .status_interval(status_interval)
        .state_interval(state_interval)
        .save_final_state(save_final_state)
        .energy_tolerance(sim.energy_tolerance.unwrap_or(defaults.energy_tolerance))
        .include_intramolecular(
            sim.include_intramolecular
                .unwrap_or(defaults.include_intramolecular),
        )
        .name(name)
        .output_directory(output_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn merge_environment(
    file: FileEnvironmentConfig,
    defaults: &DefaultsConfig,
) -> Result<Environment> {
    Ok(Environment {
        dimensions: file.dimensions.ok_or_else(|| required("environment.box"))?,
        temperature: file
            .temperature
            .ok_or_else(|| required("environment.temperature"))?,
        max_translation: file
            .max_translation
            .ok_or_else(|| required("environment.max-translation"))?,
        max_rotation: file
            .max_rotation
            .ok_or_else(|| required("environment.max-rotation"))?,
        cutoff: file.cutoff.ok_or_else(|| required("environment.cutoff"))?,
        seed: file.seed.ok_or_else(|| required("environment.seed"))?,
        molecule_count: file
            .molecule_count
            .ok_or_else(|| required("environment.molecule-count"))?,
        primary_atom_index: file
            .primary_atom_index
            .unwrap_or(defaults.primary_atom_index),
    })
}

fn required(key: &str) -> CliError {
    CliError::Config(format!(
        "A value for '{}' is required either in the config file or via --set.",
        key
    ))
}
