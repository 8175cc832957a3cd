//! File formats read and written by the simulation.
//!
//! - [`setup`] builds a fresh box from a molecule template and a parameter table
//! - [`state`] writes and reads checkpoint files for resuming runs
//! - [`pdb`] writes fixed-column trajectory snapshots

use crate::core::models::system::BoxError;
use thiserror::Error;

pub mod pdb;
pub mod setup;
pub mod state;
pub mod traits;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("File describes an invalid box: {0}")]
    InvalidBox(#[from] BoxError),
}
