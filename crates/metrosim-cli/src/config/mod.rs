//! Layered run configuration: built-in defaults, a TOML file, `--set` overrides and
//! dedicated command-line flags, merged into the core [`SimulationConfig`].
//!
//! [`SimulationConfig`]: metrosim::engine::config::SimulationConfig

mod builder;
mod defaults;
mod file;

pub use builder::{build_resume_config, build_run_config};
