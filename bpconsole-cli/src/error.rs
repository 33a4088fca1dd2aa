//! Errors surfaced by CLI commands.

use std::path::PathBuf;

use bpconsole_client::{ClientError, ConfigError};
use bpconsole_parameters::ParameterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    /// The values file is not a mapping of names to values.
    #[error("{path} must contain a mapping of parameter names to values")]
    NotAMapping { path: PathBuf },

    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
