//! Parameter definition types.
//!
//! A resource type (a source type, destination type or processor type) is
//! described by an ordered list of [`ParameterDefinition`]s. All types
//! serialize to/from the camelCase JSON/YAML shape the backend uses.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ParameterError, Result};
use crate::value::{DISPLAY_NAME_KEY, NAME_KEY, PROCESSORS_KEY};

/// The semantic kind of a parameter — determines the shape of its value and
/// which validation rules apply.
///
/// Tags the backend sends that are not known here are kept verbatim in
/// [`ParameterType::Other`] so they can be routed to a registered validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    String,
    Strings,
    Enum,
    Enums,
    Bool,
    Int,
    Map,
    MapToEnum,
    Yaml,
    Timezone,
    Metrics,
    AwsCloudwatchNamedField,
    FileLogSort,
    Other(String),
}

impl ParameterType {
    /// The wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => "string",
            ParameterType::Strings => "strings",
            ParameterType::Enum => "enum",
            ParameterType::Enums => "enums",
            ParameterType::Bool => "bool",
            ParameterType::Int => "int",
            ParameterType::Map => "map",
            ParameterType::MapToEnum => "mapToEnum",
            ParameterType::Yaml => "yaml",
            ParameterType::Timezone => "timezone",
            ParameterType::Metrics => "metrics",
            ParameterType::AwsCloudwatchNamedField => "awsCloudwatchNamedField",
            ParameterType::FileLogSort => "fileLogSort",
            ParameterType::Other(tag) => tag,
        }
    }

    /// True for types whose value is a list of strings.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ParameterType::Strings | ParameterType::Enums | ParameterType::Metrics
        )
    }
}

impl From<String> for ParameterType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "string" => ParameterType::String,
            "strings" => ParameterType::Strings,
            "enum" => ParameterType::Enum,
            "enums" => ParameterType::Enums,
            "bool" => ParameterType::Bool,
            "int" => ParameterType::Int,
            "map" => ParameterType::Map,
            "mapToEnum" => ParameterType::MapToEnum,
            "yaml" => ParameterType::Yaml,
            "timezone" => ParameterType::Timezone,
            "metrics" => ParameterType::Metrics,
            "awsCloudwatchNamedField" => ParameterType::AwsCloudwatchNamedField,
            "fileLogSort" => ParameterType::FileLogSort,
            _ => ParameterType::Other(tag),
        }
    }
}

impl From<&str> for ParameterType {
    fn from(tag: &str) -> Self {
        ParameterType::from(tag.to_string())
    }
}

impl From<ParameterType> for String {
    fn from(value: ParameterType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison used by a relevance condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelevantIfOperator {
    Equals,
    NotEquals,
    ContainsAny,
}

/// One visibility condition: the parameter is relevant only while the
/// referenced parameter's value satisfies `operator` against `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantIfCondition {
    pub name: String,
    pub operator: RelevantIfOperator,
    pub value: serde_json::Value,
}

impl RelevantIfCondition {
    pub fn equals(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            operator: RelevantIfOperator::Equals,
            value: value.into(),
        }
    }

    pub fn not_equals(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            operator: RelevantIfOperator::NotEquals,
            value: value.into(),
        }
    }

    pub fn contains_any(name: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            operator: RelevantIfOperator::ContainsAny,
            value: serde_json::Value::Array(values),
        }
    }
}

/// Presentation and range hints attached to a definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOptions {
    /// Enum-style fields accept values outside `validValues`.
    #[serde(default)]
    pub creatable: bool,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub section_header: bool,
    /// Inclusive lower bound for `int` parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Inclusive upper bound for `int` parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

/// The complete schema of one configurable field of a resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub type_: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_if: Option<Vec<RelevantIfCondition>>,
    #[serde(default)]
    pub advanced_config: bool,
    #[serde(default)]
    pub options: ParameterOptions,
}

impl ParameterDefinition {
    /// Create an optional, basic (non-advanced) definition with no default.
    pub fn new(name: impl Into<String>, type_: impl Into<ParameterType>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            description: String::new(),
            type_: type_.into(),
            required: false,
            default: None,
            valid_values: None,
            relevant_if: None,
            advanced_config: false,
            options: ParameterOptions::default(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_valid_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.valid_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Append a relevance condition. Conditions are AND-ed.
    pub fn relevant_if(mut self, condition: RelevantIfCondition) -> Self {
        self.relevant_if.get_or_insert_with(Vec::new).push(condition);
        self
    }

    pub fn advanced(mut self, advanced: bool) -> Self {
        self.advanced_config = advanced;
        self
    }

    /// Set inclusive integer bounds.
    pub fn with_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.options.min = min;
        self.options.max = max;
        self
    }

    pub fn creatable(mut self, creatable: bool) -> Self {
        self.options.creatable = creatable;
        self
    }
}

/// An existing `{name, value}` pair of a resource being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: serde_json::Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The kinds of resource a form can create or edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Configuration,
    Source,
    Destination,
    Processor,
    SourceType,
    DestinationType,
    ProcessorType,
}

impl ResourceKind {
    /// Lowercase label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Configuration => "configuration",
            ResourceKind::Source => "source",
            ResourceKind::Destination => "destination",
            ResourceKind::Processor => "processor",
            ResourceKind::SourceType => "source type",
            ResourceKind::DestinationType => "destination type",
            ResourceKind::ProcessorType => "processor type",
        }
    }

    /// Collection segment used in REST paths.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Configuration => "configurations",
            ResourceKind::Source => "sources",
            ResourceKind::Destination => "destinations",
            ResourceKind::Processor => "processors",
            ResourceKind::SourceType => "source-types",
            ResourceKind::DestinationType => "destination-types",
            ResourceKind::ProcessorType => "processor-types",
        }
    }

    /// The type kind that describes parameters for this resource kind.
    pub fn type_kind(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Source => Some(ResourceKind::SourceType),
            ResourceKind::Destination => Some(ResourceKind::DestinationType),
            ResourceKind::Processor => Some(ResourceKind::ProcessorType),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A `relevantIf` condition pointing at a name not present in its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingCondition {
    pub parameter: String,
    pub references: String,
}

/// Check a definition list for structural problems.
///
/// Duplicate or empty names are errors. Conditions that reference unknown
/// parameters are legal (they never match) and are returned as warnings.
pub fn validate_definitions(definitions: &[ParameterDefinition]) -> Result<Vec<DanglingCondition>> {
    let mut seen = HashSet::new();
    for (index, def) in definitions.iter().enumerate() {
        if def.name.is_empty() {
            return Err(ParameterError::EmptyName { index });
        }
        if [NAME_KEY, DISPLAY_NAME_KEY, PROCESSORS_KEY].contains(&def.name.as_str()) {
            return Err(ParameterError::ReservedName {
                name: def.name.clone(),
            });
        }
        if !seen.insert(def.name.as_str()) {
            return Err(ParameterError::DuplicateName {
                name: def.name.clone(),
            });
        }
    }

    let mut dangling = Vec::new();
    for def in definitions {
        for condition in def.relevant_if.iter().flatten() {
            if !seen.contains(condition.name.as_str()) {
                warn!(
                    parameter = %def.name,
                    references = %condition.name,
                    "relevantIf condition references an unknown parameter"
                );
                dangling.push(DanglingCondition {
                    parameter: def.name.clone(),
                    references: condition.name.clone(),
                });
            }
        }
    }
    Ok(dangling)
}

/// Parse a YAML (or JSON) list of parameter definitions and check it.
pub fn load_definitions(source: &str) -> Result<Vec<ParameterDefinition>> {
    let definitions: Vec<ParameterDefinition> = serde_yaml_ng::from_str(source)?;
    validate_definitions(&definitions)?;
    Ok(definitions)
}
