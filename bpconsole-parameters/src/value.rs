//! Typed form values.
//!
//! The backend speaks JSON, but a form never holds arbitrary JSON: every
//! value has one of a handful of shapes determined by its parameter type.
//! [`FormValue`] is that closed set of shapes; anything richer (the list of
//! sort rules of a `fileLogSort` field, say) is carried as `Structured`.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Parameter, ParameterDefinition, ParameterType};

/// Reserved key holding the resource name.
pub const NAME_KEY: &str = "name";
/// Reserved key holding the resource display name.
pub const DISPLAY_NAME_KEY: &str = "displayName";
/// Reserved key holding inline processors.
pub const PROCESSORS_KEY: &str = "processors";

/// The current value of one form field.
///
/// Two values are equal when their wire shapes are: an empty list held as
/// `List` equals the same list held as `Structured`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FormValue {
    /// Unset.
    Null,
    Bool(bool),
    Int(i64),
    /// Single-line or multi-line text, enum choices, YAML documents.
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    Structured(Value),
}

impl FormValue {
    /// Convert from the wire shape, picking the narrowest variant that holds
    /// the value without loss.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(b) => FormValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FormValue::Int(i),
                None => FormValue::Structured(Value::Number(n)),
            },
            Value::String(s) => FormValue::Text(s),
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    FormValue::List(
                        items
                            .into_iter()
                            .filter_map(|v| match v {
                                Value::String(s) => Some(s),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    FormValue::Structured(Value::Array(items))
                }
            }
            Value::Object(entries) => {
                if entries.values().all(Value::is_string) {
                    FormValue::Map(
                        entries
                            .into_iter()
                            .filter_map(|(k, v)| match v {
                                Value::String(s) => Some((k, s)),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    FormValue::Structured(Value::Object(entries))
                }
            }
        }
    }

    /// Convert to the wire shape.
    pub fn to_json(&self) -> Value {
        match self {
            FormValue::Null => Value::Null,
            FormValue::Bool(b) => Value::Bool(*b),
            FormValue::Int(i) => Value::from(*i),
            FormValue::Text(s) => Value::String(s.clone()),
            FormValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FormValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            FormValue::Structured(v) => v.clone(),
        }
    }

    /// The value a field of `type_` holds when nothing else is known.
    pub fn empty_for(type_: &ParameterType) -> Self {
        match type_ {
            ParameterType::String
            | ParameterType::Enum
            | ParameterType::Yaml
            | ParameterType::Timezone => FormValue::Text(String::new()),
            ParameterType::Strings | ParameterType::Enums | ParameterType::Metrics => {
                FormValue::List(Vec::new())
            }
            ParameterType::Bool => FormValue::Bool(false),
            ParameterType::Map | ParameterType::MapToEnum => FormValue::Map(BTreeMap::new()),
            ParameterType::AwsCloudwatchNamedField | ParameterType::FileLogSort => {
                FormValue::Structured(Value::Array(Vec::new()))
            }
            ParameterType::Int | ParameterType::Other(_) => FormValue::Null,
        }
    }

    /// True for unset values and empty text, lists and maps.
    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Null => true,
            FormValue::Bool(_) | FormValue::Int(_) => false,
            FormValue::Text(s) => s.is_empty(),
            FormValue::List(items) => items.is_empty(),
            FormValue::Map(entries) => entries.is_empty(),
            FormValue::Structured(v) => match v {
                Value::Null => true,
                Value::Array(items) => items.is_empty(),
                Value::Object(entries) => entries.is_empty(),
                Value::String(s) => s.is_empty(),
                _ => false,
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a list-shaped value, in wire form.
    pub fn list_items(&self) -> Option<Vec<Value>> {
        match self {
            FormValue::List(items) => Some(items.iter().cloned().map(Value::String).collect()),
            FormValue::Structured(Value::Array(items)) => Some(items.clone()),
            _ => None,
        }
    }
}

impl PartialEq for FormValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FormValue::Null, FormValue::Null) => true,
            (FormValue::Bool(a), FormValue::Bool(b)) => a == b,
            (FormValue::Int(a), FormValue::Int(b)) => a == b,
            (FormValue::Text(a), FormValue::Text(b)) => a == b,
            (FormValue::List(a), FormValue::List(b)) => a == b,
            (FormValue::Map(a), FormValue::Map(b)) => a == b,
            (FormValue::Structured(a), FormValue::Structured(b)) => a == b,
            _ => self.to_json() == other.to_json(),
        }
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        FormValue::from_json(value)
    }
}

impl From<FormValue> for Value {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Structured(v) => v,
            other => other.to_json(),
        }
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Int(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(value: Vec<String>) -> Self {
        FormValue::List(value)
    }
}

impl From<BTreeMap<String, String>> for FormValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        FormValue::Map(value)
    }
}

/// All field values of one form, keyed by parameter name.
///
/// Insertion order follows the definition list; equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, FormValue>);

impl FormValues {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.0.get(name)
    }

    /// Replace one entry, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Option<FormValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The reserved resource name, if present.
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_KEY).and_then(FormValue::as_str)
    }

    /// The reserved display name, if present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.get(DISPLAY_NAME_KEY)
            .and_then(FormValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The reserved processors entry in wire form, if present.
    pub fn processors(&self) -> Option<Value> {
        self.get(PROCESSORS_KEY).map(FormValue::to_json)
    }

    /// The whole form as a flat JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Build the typed parameter payload for `definitions`.
    ///
    /// Reserved keys are not parameters and are skipped. Integer fields
    /// entered as text are sent as numbers when they parse.
    pub fn to_parameters(&self, definitions: &[ParameterDefinition]) -> Vec<Parameter> {
        definitions
            .iter()
            .filter_map(|def| {
                let value = self.get(&def.name)?;
                let wire = match (&def.type_, value) {
                    (ParameterType::Int, FormValue::Text(text)) => match text.trim().parse::<i64>() {
                        Ok(i) => Value::from(i),
                        Err(_) => value.to_json(),
                    },
                    _ => value.to_json(),
                };
                Some(Parameter {
                    name: def.name.clone(),
                    value: wire,
                })
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_picks_narrow_variants() {
        assert_eq!(FormValue::from_json(json!(null)), FormValue::Null);
        assert_eq!(FormValue::from_json(json!(true)), FormValue::Bool(true));
        assert_eq!(FormValue::from_json(json!(42)), FormValue::Int(42));
        assert_eq!(FormValue::from_json(json!("x")), FormValue::Text("x".into()));
        assert_eq!(
            FormValue::from_json(json!(["a", "b"])),
            FormValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            FormValue::from_json(json!({"k": "v"})),
            FormValue::Map(BTreeMap::from([("k".to_string(), "v".to_string())]))
        );
    }

    #[test]
    fn from_json_keeps_mixed_shapes_structured() {
        let sort_rules = json!([{ "regexKey": "num", "ascending": true }]);
        assert_eq!(
            FormValue::from_json(sort_rules.clone()),
            FormValue::Structured(sort_rules)
        );
        assert_eq!(
            FormValue::from_json(json!(1.5)),
            FormValue::Structured(json!(1.5))
        );
    }

    #[test]
    fn equality_follows_wire_shape() {
        let empty_rules = FormValue::empty_for(&ParameterType::FileLogSort);
        let parsed = FormValue::from_json(empty_rules.to_json());
        assert_eq!(parsed, FormValue::List(vec![]));
        assert_eq!(parsed, empty_rules);
        assert_eq!(
            FormValue::Structured(json!({"k": "v"})),
            FormValue::from_json(json!({"k": "v"}))
        );
        assert_eq!(FormValue::Structured(json!(null)), FormValue::Null);
        assert_ne!(FormValue::Text("1".into()), FormValue::Int(1));
    }

    #[test]
    fn empty_values_per_type() {
        assert_eq!(
            FormValue::empty_for(&ParameterType::String),
            FormValue::Text(String::new())
        );
        assert_eq!(
            FormValue::empty_for(&ParameterType::Enums),
            FormValue::List(vec![])
        );
        assert_eq!(FormValue::empty_for(&ParameterType::Bool), FormValue::Bool(false));
        assert_eq!(FormValue::empty_for(&ParameterType::Int), FormValue::Null);
        assert!(FormValue::empty_for(&ParameterType::FileLogSort).is_empty());
    }

    #[test]
    fn bool_and_int_are_never_empty() {
        assert!(!FormValue::Bool(false).is_empty());
        assert!(!FormValue::Int(0).is_empty());
        assert!(FormValue::Text(String::new()).is_empty());
    }

    #[test]
    fn form_values_equality_ignores_order() {
        let a: FormValues = [("x", FormValue::Int(1)), ("y", FormValue::Bool(true))]
            .into_iter()
            .collect();
        let b: FormValues = [("y", FormValue::Bool(true)), ("x", FormValue::Int(1))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut values = FormValues::new();
        values.set("a", true);
        values.set("b", "x");
        assert_eq!(serde_json::to_value(&values).unwrap(), json!({"a": true, "b": "x"}));

        let parsed: FormValues = serde_json::from_value(json!({"a": true, "b": "x"})).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn reserved_keys() {
        let mut values = FormValues::new();
        values.set(NAME_KEY, "my-source");
        values.set(DISPLAY_NAME_KEY, "");
        assert_eq!(values.name(), Some("my-source"));
        assert_eq!(values.display_name(), None);
        assert_eq!(values.processors(), None);
    }

    #[test]
    fn to_parameters_coerces_int_text_and_skips_reserved_keys() {
        let defs = vec![
            ParameterDefinition::new("port", ParameterType::Int),
            ParameterDefinition::new("host", ParameterType::String),
        ];
        let mut values = FormValues::new();
        values.set(NAME_KEY, "otlp");
        values.set("port", " 4317 ");
        values.set("host", "0.0.0.0");

        let params = values.to_parameters(&defs);
        assert_eq!(
            params,
            vec![
                Parameter::new("port", 4317),
                Parameter::new("host", "0.0.0.0"),
            ]
        );
    }
}
