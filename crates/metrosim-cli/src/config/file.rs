use crate::error::{CliError, Result};
use crate::utils::parser::{self, KeyValue};
use metrosim::engine::evaluator::Backend;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEnvironmentConfig {
    #[serde(rename = "box")]
    pub dimensions: Option<[f64; 3]>,
    pub temperature: Option<f64>,
    pub max_translation: Option<f64>,
    pub max_rotation: Option<f64>,
    pub cutoff: Option<f64>,
    pub seed: Option<u64>,
    pub molecule_count: Option<usize>,
    pub primary_atom_index: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFilesConfig {
    pub forcefield: Option<PathBuf>,
    pub topology: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSimulationConfig {
    pub steps: Option<usize>,
    pub backend: Option<Backend>,
    pub status_interval: Option<usize>,
    pub state_interval: Option<usize>,
    pub save_final_state: Option<bool>,
    pub energy_tolerance: Option<f64>,
    pub include_intramolecular: Option<bool>,
}

/// The on-disk run description. Every field is optional here; requirements are
/// enforced when the file is merged with defaults and command-line overrides.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub name: Option<String>,
    pub environment: Option<FileEnvironmentConfig>,
    pub files: Option<FileFilesConfig>,
    pub simulation: Option<FileSimulationConfig>,
}

impl FileConfig {
    /// Reads a config file. Relative paths under `[files]` are resolved against the
    /// directory containing the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        if let (Some(files), Some(base)) = (config.files.as_mut(), path.parent()) {
            for entry in [&mut files.forcefield, &mut files.topology, &mut files.output_dir] {
                if let Some(p) = entry.as_mut().filter(|p| p.is_relative()) {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }

    /// Applies `KEY=VALUE` overrides given with `--set`.
    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let KeyValue { key, value } =
                parser::split_assignment(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
            let invalid = |e: parser::ParseError| CliError::Config(e.to_string());

            match key {
                "name" => self.name = Some(value.to_string()),
                "environment.box" => {
                    self.environment().dimensions =
                        Some(parser::parse_triple(key, value).map_err(invalid)?);
                }
                "environment.temperature" => {
                    self.environment().temperature =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "environment.max-translation" => {
                    self.environment().max_translation =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "environment.max-rotation" => {
                    self.environment().max_rotation =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "environment.cutoff" => {
                    self.environment().cutoff =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "environment.seed" => {
                    self.environment().seed = Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "environment.molecule-count" => {
                    self.environment().molecule_count =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "environment.primary-atom-index" => {
                    self.environment().primary_atom_index =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "files.forcefield" => self.files().forcefield = Some(PathBuf::from(value)),
                "files.topology" => self.files().topology = Some(PathBuf::from(value)),
                "files.output-dir" => self.files().output_dir = Some(PathBuf::from(value)),
                "simulation.steps" => {
                    self.simulation().steps = Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "simulation.backend" => {
                    self.simulation().backend =
                        Some(parser::parse_backend(value).map_err(invalid)?);
                }
                "simulation.status-interval" => {
                    self.simulation().status_interval =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "simulation.state-interval" => {
                    self.simulation().state_interval =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "simulation.save-final-state" => {
                    self.simulation().save_final_state =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "simulation.energy-tolerance" => {
                    self.simulation().energy_tolerance =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                "simulation.include-intramolecular" => {
                    self.simulation().include_intramolecular =
                        Some(parser::parse_value(key, value).map_err(invalid)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn environment(&mut self) -> &mut FileEnvironmentConfig {
        self.environment.get_or_insert_with(Default::default)
    }

    fn files(&mut self) -> &mut FileFilesConfig {
        self.files.get_or_insert_with(Default::default)
    }

    fn simulation(&mut self) -> &mut FileSimulationConfig {
        self.simulation.get_or_insert_with(Default::default)
    }
}
