use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::IoError;
use crate::core::io::setup::SetupError;
use crate::core::models::system::BoxError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Box error: {source}")]
    Box {
        #[from]
        source: BoxError,
    },

    #[error("Box setup failed: {source}")]
    Setup {
        #[from]
        source: SetupError,
    },

    #[error("File error: {source}")]
    Io {
        #[from]
        source: IoError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io {
            source: IoError::Io(err),
        }
    }
}
