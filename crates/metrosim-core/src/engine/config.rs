use super::evaluator::Backend;
use crate::core::models::environment::Environment;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File stem used for results, trajectory and checkpoint files of an unnamed run.
pub const DEFAULT_RUN_NAME: &str = "run";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Where the starting box comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxSource {
    /// Build a fresh box by replicating a molecule template.
    Generate {
        environment: Environment,
        forcefield_path: PathBuf,
        topology_path: PathBuf,
    },
    /// Continue from a checkpoint file.
    Resume { state_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub backend: Backend,
    pub steps: usize,
    /// Emit a status line every this many steps; zero disables status lines.
    pub status_interval: usize,
    /// Write a checkpoint every this many steps; zero disables periodic checkpoints.
    pub state_interval: usize,
    pub save_final_state: bool,
    /// Largest acceptable relative gap between the running energy and a recomputation.
    pub energy_tolerance: f64,
    pub include_intramolecular: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub name: Option<String>,
    pub directory: PathBuf,
}

impl OutputConfig {
    pub fn file_stem(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_RUN_NAME)
    }

    pub fn results_path(&self) -> PathBuf {
        self.directory.join(format!("{}.results", self.file_stem()))
    }

    pub fn trajectory_path(&self) -> PathBuf {
        self.directory.join(format!("{}.pdb", self.file_stem()))
    }

    pub fn state_path(&self, step: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{}.state", self.file_stem(), step))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub source: BoxSource,
    pub run: RunConfig,
    pub output: OutputConfig,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    environment: Option<Environment>,
    forcefield_path: Option<PathBuf>,
    topology_path: Option<PathBuf>,
    resume_from: Option<PathBuf>,
    backend: Option<Backend>,
    steps: Option<usize>,
    status_interval: Option<usize>,
    state_interval: Option<usize>,
    save_final_state: Option<bool>,
    energy_tolerance: Option<f64>,
    include_intramolecular: Option<bool>,
    name: Option<String>,
    output_directory: Option<PathBuf>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }
    pub fn forcefield_path(mut self, path: PathBuf) -> Self {
        self.forcefield_path = Some(path);
        self
    }
    pub fn topology_path(mut self, path: PathBuf) -> Self {
        self.topology_path = Some(path);
        self
    }
    /// Resume from a checkpoint instead of generating a box; environment and file
    /// paths are then ignored.
    pub fn resume_from(mut self, path: PathBuf) -> Self {
        self.resume_from = Some(path);
        self
    }
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
    pub fn status_interval(mut self, interval: usize) -> Self {
        self.status_interval = Some(interval);
        self
    }
    pub fn state_interval(mut self, interval: usize) -> Self {
        self.state_interval = Some(interval);
        self
    }
    pub fn save_final_state(mut self, save: bool) -> Self {
        self.save_final_state = Some(save);
        self
    }
    pub fn energy_tolerance(mut self, tolerance: f64) -> Self {
        self.energy_tolerance = Some(tolerance);
        self
    }
    pub fn include_intramolecular(mut self, include: bool) -> Self {
        self.include_intramolecular = Some(include);
        self
    }
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
    pub fn output_directory(mut self, directory: PathBuf) -> Self {
        self.output_directory = Some(directory);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let source = match self.resume_from {
            Some(state_path) => BoxSource::Resume { state_path },
            None => {
                let environment = self
                    .environment
                    .ok_or(ConfigError::MissingParameter("environment"))?;
                environment
                    .validate()
                    .map_err(|reason| ConfigError::InvalidValue {
                        field: "environment",
                        reason,
                    })?;
                BoxSource::Generate {
                    environment,
                    forcefield_path: self
                        .forcefield_path
                        .ok_or(ConfigError::MissingParameter("forcefield_path"))?,
                    topology_path: self
                        .topology_path
                        .ok_or(ConfigError::MissingParameter("topology_path"))?,
                }
            }
        };

        let energy_tolerance = self
            .energy_tolerance
            .ok_or(ConfigError::MissingParameter("energy_tolerance"))?;
        if !(energy_tolerance.is_finite() && energy_tolerance > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "energy_tolerance",
                reason: format!("must be a positive number, got {}", energy_tolerance),
            });
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }

        let run = RunConfig {
            backend: self
                .backend
                .ok_or(ConfigError::MissingParameter("backend"))?,
            steps: self.steps.ok_or(ConfigError::MissingParameter("steps"))?,
            status_interval: self
                .status_interval
                .ok_or(ConfigError::MissingParameter("status_interval"))?,
            state_interval: self
                .state_interval
                .ok_or(ConfigError::MissingParameter("state_interval"))?,
            save_final_state: self
                .save_final_state
                .ok_or(ConfigError::MissingParameter("save_final_state"))?,
            energy_tolerance,
            include_intramolecular: self.include_intramolecular.unwrap_or(false),
        };

        Ok(SimulationConfig {
            source,
            run,
            output: OutputConfig {
                name: self.name,
                directory: self
                    .output_directory
                    .unwrap_or_else(|| Path::new(".").to_path_buf()),
            },
        })
    }
}
