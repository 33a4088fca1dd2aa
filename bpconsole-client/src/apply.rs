//! Applying resources and interpreting the result.

use async_trait::async_trait;
use bpconsole_parameters::{FormValues, ParameterDefinition, ResourceKind, SaveOutcome};
use tracing::{error, info, warn};

use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::status::ResourceStatus;

/// Something that can apply and delete resources in bulk.
///
/// [`BindPlaneClient`](crate::http::BindPlaneClient) is the HTTP
/// implementation; tests substitute their own.
#[async_trait]
pub trait ResourceApplier: Send + Sync {
    /// Create or update `resources`, returning one status per resource.
    async fn apply(&self, resources: Vec<Resource>) -> Result<Vec<ResourceStatus>>;

    /// Delete `resources`, returning one status per resource.
    async fn delete(&self, resources: Vec<Resource>) -> Result<Vec<ResourceStatus>>;
}

/// Apply a single resource and return its status.
///
/// The resource is sent as a one-element list. A response with no entry for
/// it is [`ClientError::NoMatchingUpdate`]; an `invalid` entry is returned
/// as a normal status.
pub async fn apply_resource(
    applier: &dyn ResourceApplier,
    resource: Resource,
) -> Result<ResourceStatus> {
    let kind = resource.kind;
    let name = resource.name().to_string();

    let updates = applier.apply(vec![resource]).await.inspect_err(|e| {
        error!(%kind, %name, error = %e, "apply failed");
    })?;

    let status = find_update(updates, kind, &name)?;
    if status.is_invalid() {
        warn!(
            %kind,
            %name,
            reason = status.reason.as_deref().unwrap_or_default(),
            "resource rejected as invalid"
        );
    } else {
        info!(%kind, %name, status = %status.status, "resource applied");
    }
    Ok(status)
}

/// Delete a single resource and return its status.
pub async fn delete_resource(
    applier: &dyn ResourceApplier,
    resource: Resource,
) -> Result<ResourceStatus> {
    let kind = resource.kind;
    let name = resource.name().to_string();

    let updates = applier.delete(vec![resource]).await.inspect_err(|e| {
        error!(%kind, %name, error = %e, "delete failed");
    })?;

    let status = find_update(updates, kind, &name)?;
    info!(%kind, %name, status = %status.status, "resource delete processed");
    Ok(status)
}

/// Build a resource from a submitted form, apply it, and translate the
/// result for [`FormSession::submit`](bpconsole_parameters::FormSession::submit).
pub async fn save_form(
    applier: &dyn ResourceApplier,
    kind: ResourceKind,
    type_name: &str,
    values: &FormValues,
    definitions: &[ParameterDefinition],
) -> Result<SaveOutcome> {
    let resource = Resource::from_form(kind, type_name, values, definitions)?;
    let status = apply_resource(applier, resource).await?;
    Ok(status.into_save_outcome())
}

fn find_update(updates: Vec<ResourceStatus>, kind: ResourceKind, name: &str) -> Result<ResourceStatus> {
    updates
        .into_iter()
        .find(|update| update.resource.kind == kind && update.resource.name() == name)
        .ok_or_else(|| ClientError::NoMatchingUpdate {
            kind,
            name: name.to_string(),
        })
}
