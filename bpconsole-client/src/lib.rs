//! BindPlane API client
//!
//! Turns submitted forms into resource documents, applies them, and reads
//! back per-resource statuses. A backend `invalid` status is a normal result
//! carrying a reason; only transport problems and contract violations are
//! errors.

pub mod apply;
pub mod config;
pub mod configuration;
pub mod error;
pub mod http;
pub mod resource;
pub mod status;

pub use apply::{apply_resource, delete_resource, save_form, ResourceApplier};
pub use config::ClientConfig;
pub use configuration::BPConfiguration;
pub use error::{ClientError, ConfigError, Result};
pub use http::BindPlaneClient;
pub use resource::{
    AgentSelector, Metadata, Resource, ResourceConfiguration, ResourceSpec, ResourceType,
    ResourceTypeSpec, API_VERSION,
};
pub use status::{ApplyResponse, ResourceStatus, UpdateStatus};
