//! Field validation.
//!
//! Validation never fails: each field yields either `None` or a message, and
//! the whole form is valid when every entry of [`FormErrors`] is `None`.
//! Fields that are not currently relevant are always `None`, whatever they
//! hold; making them relevant again brings any latent error back.

mod domain;
mod registry;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::relevance::is_relevant;
use crate::types::{ParameterDefinition, ParameterType, ResourceKind};
use crate::value::{FormValue, FormValues, NAME_KEY};

pub use registry::{FieldValidator, ValidatorRegistry};

/// Message for a required field with no value.
pub const REQUIRED: &str = "Required.";
/// Message for an integer field holding something that is not an integer.
pub const NOT_AN_INTEGER: &str = "Must be an integer.";
/// Message for an enum-style value outside `validValues`.
pub const NOT_ALLOWED: &str = "Must be one of the allowed values.";
/// Message for a resource name with forbidden characters.
pub const INVALID_NAME: &str =
    "Name must contain only letters, numbers, periods, hyphens, and underscores.";

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("name pattern compiles"));

/// Per-field error messages for one form, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(IndexMap<String, Option<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, error: Option<String>) {
        self.0.insert(name.into(), error);
    }

    /// The message for `name`, if it has one.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|e| e.as_deref())
    }

    /// True when no field has a message.
    pub fn is_valid(&self) -> bool {
        self.0.values().all(Option::is_none)
    }

    /// Fields that currently have a message.
    pub fn failing(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(name, error)| error.as_deref().map(|e| (name.as_str(), e)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rules for the reserved `name` field of a new resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFieldRules {
    /// Names already taken by resources of the same kind.
    pub existing_names: Vec<String>,
}

impl NameFieldRules {
    pub fn new<S: Into<String>>(existing_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            existing_names: existing_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Validate a resource name: non-empty, restricted characters, and not
/// already used by another resource of `kind`.
pub fn validate_name(value: Option<&FormValue>, kind: ResourceKind, existing: &[String]) -> Option<String> {
    let name = value.and_then(FormValue::as_str).unwrap_or_default();
    if name.is_empty() {
        return Some(REQUIRED.to_string());
    }
    if !NAME_PATTERN.is_match(name) {
        return Some(INVALID_NAME.to_string());
    }
    if existing.iter().any(|taken| taken == name) {
        return Some(format!("A {} with this name already exists.", kind.label()));
    }
    None
}

/// Validates fields by type, with optional validators for custom type tags.
#[derive(Default)]
pub struct Validator {
    registry: ValidatorRegistry,
}

impl Validator {
    /// A validator with only the built-in rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator that also consults `registry` for unrecognized types.
    pub fn with_registry(registry: ValidatorRegistry) -> Self {
        Self { registry }
    }

    /// Validate one field's value, ignoring relevance.
    pub fn validate_field(
        &self,
        definition: &ParameterDefinition,
        value: Option<&FormValue>,
        values: &FormValues,
    ) -> Option<String> {
        let required = definition.required;
        let empty = value.is_none_or(FormValue::is_empty);

        match &definition.type_ {
            ParameterType::String | ParameterType::Strings => {
                (required && empty).then(|| REQUIRED.to_string())
            }
            ParameterType::Map => {
                (required && keyed_entries(value) == 0).then(|| REQUIRED.to_string())
            }
            ParameterType::Enum => {
                if empty {
                    return required.then(|| REQUIRED.to_string());
                }
                let choice = value.and_then(FormValue::as_str)?;
                (!allowed(definition, choice)).then(|| NOT_ALLOWED.to_string())
            }
            ParameterType::Enums => {
                if empty {
                    return required.then(|| REQUIRED.to_string());
                }
                match value {
                    Some(FormValue::List(items)) => items
                        .iter()
                        .any(|item| !allowed(definition, item))
                        .then(|| NOT_ALLOWED.to_string()),
                    _ => None,
                }
            }
            ParameterType::MapToEnum => {
                if required && keyed_entries(value) == 0 {
                    return Some(REQUIRED.to_string());
                }
                match value {
                    Some(FormValue::Map(entries)) => entries
                        .iter()
                        .filter(|(key, _)| !key.is_empty())
                        .any(|(_, mapped)| !mapped.is_empty() && !allowed(definition, mapped))
                        .then(|| NOT_ALLOWED.to_string()),
                    _ => None,
                }
            }
            ParameterType::Int => validate_int(definition, value),
            ParameterType::Yaml => validate_yaml(required, value),
            ParameterType::Timezone => domain::validate_timezone(required, value),
            ParameterType::AwsCloudwatchNamedField => {
                domain::validate_cloudwatch_named_field(required, value)
            }
            ParameterType::FileLogSort => domain::validate_file_log_sort(required, value),
            ParameterType::Bool | ParameterType::Metrics => None,
            ParameterType::Other(tag) => self
                .registry
                .get(tag)
                .and_then(|validator| validator.validate(definition, value, values)),
        }
    }

    /// Compute the error map for a whole form.
    ///
    /// When `name_rules` is given the reserved `name` field is validated
    /// first. Irrelevant parameters always map to `None`.
    pub fn form_errors(
        &self,
        definitions: &[ParameterDefinition],
        values: &FormValues,
        kind: ResourceKind,
        name_rules: Option<&NameFieldRules>,
    ) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Some(rules) = name_rules {
            errors.insert(
                NAME_KEY,
                validate_name(values.get(NAME_KEY), kind, &rules.existing_names),
            );
        }

        for definition in definitions {
            let error = if is_relevant(values, definition) {
                self.validate_field(definition, values.get(&definition.name), values)
            } else {
                None
            };
            errors.insert(definition.name.clone(), error);
        }

        debug!(
            kind = %kind,
            fields = errors.len(),
            failing = errors.failing().count(),
            "recomputed form errors"
        );
        errors
    }
}

/// Validate one field with the built-in rules.
pub fn validate_field(
    definition: &ParameterDefinition,
    value: Option<&FormValue>,
    values: &FormValues,
) -> Option<String> {
    Validator::new().validate_field(definition, value, values)
}

/// Compute the error map for a whole form with the built-in rules.
pub fn init_form_errors(
    definitions: &[ParameterDefinition],
    values: &FormValues,
    kind: ResourceKind,
    name_rules: Option<&NameFieldRules>,
) -> FormErrors {
    Validator::new().form_errors(definitions, values, kind, name_rules)
}

fn allowed(definition: &ParameterDefinition, choice: &str) -> bool {
    if definition.options.creatable {
        return true;
    }
    match &definition.valid_values {
        Some(valid) => valid.iter().any(|v| v == choice),
        None => true,
    }
}

/// Map entries with a non-empty key.
fn keyed_entries(value: Option<&FormValue>) -> usize {
    match value {
        Some(FormValue::Map(entries)) => entries.keys().filter(|k| !k.is_empty()).count(),
        Some(FormValue::Structured(serde_json::Value::Object(entries))) => {
            entries.keys().filter(|k| !k.is_empty()).count()
        }
        _ => 0,
    }
}

fn validate_int(definition: &ParameterDefinition, value: Option<&FormValue>) -> Option<String> {
    let number = match value {
        None | Some(FormValue::Null) => None,
        Some(FormValue::Int(i)) => Some(*i),
        Some(FormValue::Text(text)) if text.trim().is_empty() => None,
        Some(FormValue::Text(text)) => match text.trim().parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => return Some(NOT_AN_INTEGER.to_string()),
        },
        Some(_) => return Some(NOT_AN_INTEGER.to_string()),
    };

    let Some(number) = number else {
        return definition.required.then(|| REQUIRED.to_string());
    };

    if let Some(min) = definition.options.min {
        if number < min {
            return Some(format!("Must be at least {min}."));
        }
    }
    if let Some(max) = definition.options.max {
        if number > max {
            return Some(format!("Must be at most {max}."));
        }
    }
    None
}

fn validate_yaml(required: bool, value: Option<&FormValue>) -> Option<String> {
    let text = match value {
        Some(FormValue::Text(text)) => text.as_str(),
        None | Some(FormValue::Null) => "",
        Some(_) => return None,
    };
    if text.trim().is_empty() {
        return required.then(|| REQUIRED.to_string());
    }
    match serde_yaml_ng::from_str::<serde_yaml_ng::Value>(text) {
        Ok(_) => None,
        Err(e) => Some(format!("Invalid YAML: {e}")),
    }
}
