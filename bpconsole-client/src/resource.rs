//! Resource documents exchanged with the BindPlane API.

use std::collections::BTreeMap;

use bpconsole_parameters::{
    FormValues, Parameter, ParameterDefinition, ResourceKind, PROCESSORS_KEY,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// The `apiVersion` every resource document carries.
pub const API_VERSION: &str = "bindplane.observiq.com/v1";

fn default_api_version() -> String {
    API_VERSION.to_string()
}

/// A resource as posted to `/v1/apply`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    pub kind: ResourceKind,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: ResourceSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processors: Option<Vec<ResourceConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<ResourceConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<ResourceConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<AgentSelector>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Which agents a configuration applies to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSelector {
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
}

/// A source, destination or processor embedded in a configuration.
///
/// Either `name` refers to a standalone resource or `type_` plus
/// `parameters` describe it inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processors: Option<Vec<ResourceConfiguration>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl ResourceConfiguration {
    /// Refer to an existing standalone resource by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Describe a resource inline from a submitted form.
    pub fn inline_from_form(
        type_name: impl Into<String>,
        values: &FormValues,
        definitions: &[ParameterDefinition],
    ) -> Result<Self> {
        Ok(Self {
            name: None,
            type_: Some(type_name.into()),
            display_name: values.display_name().map(str::to_string),
            parameters: Some(values.to_parameters(definitions)),
            processors: processors_from(values)?,
            disabled: false,
        })
    }
}

/// A source, destination or processor type: the parameter definitions that
/// drive its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub kind: ResourceKind,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: ResourceTypeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeSpec {
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

impl Resource {
    /// An empty document of `kind` named `name`.
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            api_version: default_api_version(),
            kind,
            metadata: Metadata {
                name: name.into(),
                ..Metadata::default()
            },
            spec: ResourceSpec::default(),
        }
    }

    /// Build a source, destination or processor from a submitted form.
    ///
    /// The name comes from the reserved `name` key, the display name from
    /// `displayName` and the processors from `processors`.
    pub fn from_form(
        kind: ResourceKind,
        type_name: impl Into<String>,
        values: &FormValues,
        definitions: &[ParameterDefinition],
    ) -> Result<Self> {
        let name = values
            .name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ClientError::InvalidResource(format!("{kind} has no name")))?;

        let mut resource = Resource::new(kind, name);
        resource.spec.type_ = Some(type_name.into());
        resource.update_from_form(values, definitions)?;
        Ok(resource)
    }

    /// Write a submitted edit form back into this document.
    ///
    /// Only the parameters, the display name and (when the form carries
    /// them) the processors change. Labels, description, id and version are
    /// kept as fetched.
    pub fn update_from_form(
        &mut self,
        values: &FormValues,
        definitions: &[ParameterDefinition],
    ) -> Result<()> {
        self.metadata.display_name = values.display_name().map(str::to_string);
        self.spec.parameters = Some(values.to_parameters(definitions));
        if values.contains(PROCESSORS_KEY) {
            self.spec.processors = processors_from(values)?;
        }
        Ok(())
    }

    /// Processors in wire form, for seeding an edit form.
    pub fn processors_json(&self) -> Option<Value> {
        self.spec
            .processors
            .as_ref()
            .and_then(|processors| serde_json::to_value(processors).ok())
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Existing parameter values, for seeding an edit form.
    pub fn parameters(&self) -> &[Parameter] {
        self.spec.parameters.as_deref().unwrap_or_default()
    }
}

fn processors_from(values: &FormValues) -> Result<Option<Vec<ResourceConfiguration>>> {
    match values.processors() {
        None | Some(Value::Null) => Ok(None),
        Some(processors) => Ok(Some(serde_json::from_value(processors)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpconsole_parameters::{FormValue, ParameterType};
    use serde_json::json;

    fn definitions() -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::new("listen_port", ParameterType::Int),
            ParameterDefinition::new("protocols", ParameterType::Enums),
        ]
    }

    #[test]
    fn test_from_form_builds_document() {
        let values: FormValues = [
            ("name", FormValue::from("otlp-in")),
            ("displayName", FormValue::from("OTLP in")),
            ("listen_port", FormValue::from("4317")),
            ("protocols", FormValue::from(vec!["grpc".to_string()])),
            (
                "processors",
                FormValue::from_json(json!([{"type": "batch", "parameters": []}])),
            ),
        ]
        .into_iter()
        .collect();

        let resource =
            Resource::from_form(ResourceKind::Source, "otlp", &values, &definitions()).unwrap();

        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "apiVersion": "bindplane.observiq.com/v1",
                "kind": "Source",
                "metadata": {"name": "otlp-in", "displayName": "OTLP in"},
                "spec": {
                    "type": "otlp",
                    "parameters": [
                        {"name": "listen_port", "value": 4317},
                        {"name": "protocols", "value": ["grpc"]}
                    ],
                    "processors": [{"type": "batch", "parameters": []}]
                }
            })
        );
    }

    #[test]
    fn test_update_from_form_keeps_metadata_and_processors() {
        let mut resource: Resource = serde_json::from_value(json!({
            "kind": "Destination",
            "metadata": {
                "id": "01HX",
                "name": "prod",
                "description": "primary exporter",
                "labels": {"team": "obs"},
                "version": 4
            },
            "spec": {
                "type": "otlp",
                "parameters": [{"name": "listen_port", "value": 4317}],
                "processors": [{"type": "batch"}]
            }
        }))
        .unwrap();
        let values: FormValues = [("name", "prod"), ("listen_port", "4318")]
            .into_iter()
            .collect();

        resource.update_from_form(&values, &definitions()).unwrap();

        assert_eq!(resource.metadata.labels.get("team").map(String::as_str), Some("obs"));
        assert_eq!(resource.metadata.description.as_deref(), Some("primary exporter"));
        assert_eq!(resource.metadata.id.as_deref(), Some("01HX"));
        assert_eq!(resource.metadata.version, Some(4));
        assert_eq!(resource.processors_json(), Some(json!([{"type": "batch"}])));
        assert_eq!(resource.parameters()[0], Parameter::new("listen_port", 4318));
    }

    #[test]
    fn test_update_from_form_replaces_processors_when_present() {
        let mut resource = Resource::new(ResourceKind::Source, "otlp-in");
        resource.spec.processors = Some(vec![ResourceConfiguration::named("old")]);
        let values: FormValues = [
            ("name", FormValue::from("otlp-in")),
            ("processors", FormValue::from_json(json!([]))),
        ]
        .into_iter()
        .collect();

        resource.update_from_form(&values, &[]).unwrap();

        assert_eq!(resource.spec.processors, Some(vec![]));
    }

    #[test]
    fn test_from_form_requires_name() {
        let values: FormValues = [("name", "")].into_iter().collect();
        let err = Resource::from_form(ResourceKind::Destination, "otlp", &values, &[]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResource(_)));
    }

    #[test]
    fn test_lenient_deserialization() {
        let resource: Resource =
            serde_json::from_value(json!({"kind": "Configuration", "metadata": {"name": "c"}}))
                .unwrap();
        assert_eq!(resource.api_version, API_VERSION);
        assert_eq!(resource.kind, ResourceKind::Configuration);
        assert!(resource.parameters().is_empty());
    }

    #[test]
    fn test_resource_type_parameters() {
        let source_type: ResourceType = serde_json::from_value(json!({
            "kind": "SourceType",
            "metadata": {"name": "otlp"},
            "spec": {"parameters": [{"name": "listen_port", "type": "int", "default": 4317}]}
        }))
        .unwrap();
        assert_eq!(source_type.spec.parameters.len(), 1);
        assert_eq!(source_type.spec.parameters[0].type_, ParameterType::Int);
    }
}
