//! Apply results.

use std::fmt;

use bpconsole_parameters::SaveOutcome;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// Message used when the backend marks a resource invalid without a reason.
pub const UNSPECIFIED_INVALID_REASON: &str = "The resource is invalid.";

/// What the backend did with one submitted resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Created,
    Configured,
    Unchanged,
    Deleted,
    Invalid,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Created => "created",
            UpdateStatus::Configured => "configured",
            UpdateStatus::Unchanged => "unchanged",
            UpdateStatus::Deleted => "deleted",
            UpdateStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an apply response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatus {
    pub resource: Resource,
    pub status: UpdateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ResourceStatus {
    pub fn is_invalid(&self) -> bool {
        self.status == UpdateStatus::Invalid
    }

    /// Translate into the result a form session expects from its save
    /// callback. `invalid` keeps the form open with the backend's reason.
    pub fn into_save_outcome(self) -> SaveOutcome {
        match self.status {
            UpdateStatus::Invalid => SaveOutcome::Rejected {
                reason: self
                    .reason
                    .unwrap_or_else(|| UNSPECIFIED_INVALID_REASON.to_string()),
            },
            _ => SaveOutcome::Saved,
        }
    }
}

/// Body of `/v1/apply` and `/v1/delete` responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyResponse {
    #[serde(default)]
    pub updates: Vec<ResourceStatus>,
}
