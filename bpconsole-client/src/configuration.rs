//! Editing a configuration's sources and destinations before applying it.

use std::collections::BTreeMap;

use bpconsole_parameters::ResourceKind;
use tracing::debug;

use crate::apply::{apply_resource, ResourceApplier};
use crate::error::{ClientError, Result};
use crate::resource::{AgentSelector, Resource, ResourceConfiguration};
use crate::status::ResourceStatus;

/// Label key new configurations select their agents by.
pub const CONFIGURATION_LABEL: &str = "configuration";

/// A configuration resource with helpers for its embedded components.
#[derive(Debug, Clone, PartialEq)]
pub struct BPConfiguration {
    resource: Resource,
}

impl BPConfiguration {
    /// Wrap an existing configuration document.
    pub fn new(resource: Resource) -> Result<Self> {
        if resource.kind != ResourceKind::Configuration {
            return Err(ClientError::InvalidResource(format!(
                "expected a configuration, got a {}",
                resource.kind
            )));
        }
        Ok(Self { resource })
    }

    /// A new, empty configuration selecting agents labeled
    /// `configuration=<name>`.
    pub fn create(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut resource = Resource::new(ResourceKind::Configuration, name.clone());
        resource.spec.selector = Some(AgentSelector {
            match_labels: BTreeMap::from([(CONFIGURATION_LABEL.to_string(), name)]),
        });
        Self { resource }
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn into_resource(self) -> Resource {
        self.resource
    }

    pub fn sources(&self) -> &[ResourceConfiguration] {
        self.resource.spec.sources.as_deref().unwrap_or_default()
    }

    pub fn destinations(&self) -> &[ResourceConfiguration] {
        self.resource.spec.destinations.as_deref().unwrap_or_default()
    }

    pub fn match_labels(&self) -> Option<&BTreeMap<String, String>> {
        self.resource
            .spec
            .selector
            .as_ref()
            .map(|selector| &selector.match_labels)
    }

    pub fn add_source(&mut self, source: ResourceConfiguration) {
        self.resource
            .spec
            .sources
            .get_or_insert_with(Vec::new)
            .push(source);
        debug!(configuration = %self.name(), sources = self.sources().len(), "source added");
    }

    pub fn replace_source(&mut self, index: usize, source: ResourceConfiguration) -> Result<()> {
        let slot = slot_mut(&mut self.resource.spec.sources, "sources", index)?;
        *slot = source;
        Ok(())
    }

    /// Remove and return the source at `index`.
    pub fn remove_source(&mut self, index: usize) -> Result<ResourceConfiguration> {
        remove_at(&mut self.resource.spec.sources, "sources", index)
    }

    pub fn add_destination(&mut self, destination: ResourceConfiguration) {
        self.resource
            .spec
            .destinations
            .get_or_insert_with(Vec::new)
            .push(destination);
        debug!(
            configuration = %self.name(),
            destinations = self.destinations().len(),
            "destination added"
        );
    }

    pub fn replace_destination(
        &mut self,
        index: usize,
        destination: ResourceConfiguration,
    ) -> Result<()> {
        let slot = slot_mut(&mut self.resource.spec.destinations, "destinations", index)?;
        *slot = destination;
        Ok(())
    }

    /// Remove and return the destination at `index`.
    pub fn remove_destination(&mut self, index: usize) -> Result<ResourceConfiguration> {
        remove_at(&mut self.resource.spec.destinations, "destinations", index)
    }

    /// Replace the agent selector's labels.
    pub fn set_match_labels(&mut self, labels: BTreeMap<String, String>) {
        self.resource.spec.selector = Some(AgentSelector {
            match_labels: labels,
        });
    }

    /// Apply the configuration as it currently stands.
    pub async fn apply(&self, applier: &dyn ResourceApplier) -> Result<ResourceStatus> {
        apply_resource(applier, self.resource.clone()).await
    }
}

fn slot_mut<'a>(
    items: &'a mut Option<Vec<ResourceConfiguration>>,
    collection: &'static str,
    index: usize,
) -> Result<&'a mut ResourceConfiguration> {
    let len = items.as_ref().map_or(0, Vec::len);
    items
        .as_mut()
        .and_then(|items| items.get_mut(index))
        .ok_or(ClientError::IndexOutOfRange {
            collection,
            index,
            len,
        })
}

fn remove_at(
    items: &mut Option<Vec<ResourceConfiguration>>,
    collection: &'static str,
    index: usize,
) -> Result<ResourceConfiguration> {
    let len = items.as_ref().map_or(0, Vec::len);
    match items.as_mut() {
        Some(list) if index < len => Ok(list.remove(index)),
        _ => Err(ClientError::IndexOutOfRange {
            collection,
            index,
            len,
        }),
    }
}
