//! Error types for the BindPlane client.

use std::path::PathBuf;

use bpconsole_parameters::ResourceKind;
use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from applying resources or talking to the BindPlane API.
///
/// A backend-reported `invalid` status is not an error; it arrives as a
/// [`ResourceStatus`](crate::status::ResourceStatus) with a reason.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or protocol failure before a response was read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The apply response did not mention the resource that was sent.
    #[error("no matching update returned for {kind} {name}")]
    NoMatchingUpdate { kind: ResourceKind, name: String },

    #[error("{collection} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    /// The resource document cannot be built from the given input.
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError { source: Box<figment::Error> },

    /// Invalid configuration value
    #[error("Invalid configuration value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}
