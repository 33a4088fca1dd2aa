//! Relevance evaluation for `relevantIf` conditions.
//!
//! A parameter that is not relevant is hidden and exempt from validation.
//! Evaluation is pure, so it is safe to call on every recomputation.

use serde_json::Value;

use crate::types::{ParameterDefinition, RelevantIfCondition, RelevantIfOperator};
use crate::value::FormValues;

/// Decide whether `definition` currently applies given `values`.
///
/// Parameters without conditions are always relevant; otherwise every
/// condition must hold.
pub fn is_relevant(values: &FormValues, definition: &ParameterDefinition) -> bool {
    match &definition.relevant_if {
        None => true,
        Some(conditions) => conditions
            .iter()
            .all(|condition| condition_holds(values, condition)),
    }
}

/// Evaluate a single condition against the form.
pub fn condition_holds(values: &FormValues, condition: &RelevantIfCondition) -> bool {
    let current = values.get(&condition.name);
    match condition.operator {
        RelevantIfOperator::Equals => {
            current.is_some_and(|value| value.to_json() == condition.value)
        }
        RelevantIfOperator::NotEquals => {
            !current.is_some_and(|value| value.to_json() == condition.value)
        }
        RelevantIfOperator::ContainsAny => {
            // A referenced field that is missing or not a list never blocks.
            let Some(items) = current.and_then(|value| value.list_items()) else {
                return true;
            };
            let wanted: &[Value] = match &condition.value {
                Value::Array(wanted) => wanted,
                single => std::slice::from_ref(single),
            };
            items.iter().any(|item| wanted.contains(item))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterType;
    use crate::value::FormValue;
    use serde_json::json;

    fn values(pairs: &[(&str, FormValue)]) -> FormValues {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn no_conditions_is_relevant() {
        let def = ParameterDefinition::new("x", ParameterType::String);
        assert!(is_relevant(&FormValues::new(), &def));
    }

    #[test]
    fn equals_uses_deep_equality() {
        let def = ParameterDefinition::new("x", ParameterType::String).relevant_if(
            RelevantIfCondition::equals("mode", json!(["a", "b"])),
        );
        let matching = values(&[("mode", FormValue::List(vec!["a".into(), "b".into()]))]);
        let reordered = values(&[("mode", FormValue::List(vec!["b".into(), "a".into()]))]);
        assert!(is_relevant(&matching, &def));
        assert!(!is_relevant(&reordered, &def));
    }

    #[test]
    fn not_equals_holds_for_missing_field() {
        let def = ParameterDefinition::new("x", ParameterType::String)
            .relevant_if(RelevantIfCondition::not_equals("protocol", "tcp"));
        assert!(is_relevant(&FormValues::new(), &def));
        assert!(!is_relevant(&values(&[("protocol", "tcp".into())]), &def));
        assert!(is_relevant(&values(&[("protocol", "udp".into())]), &def));
    }

    #[test]
    fn equals_on_missing_field_never_matches() {
        let def = ParameterDefinition::new("x", ParameterType::String)
            .relevant_if(RelevantIfCondition::equals("ghost", json!(null)));
        assert!(!is_relevant(&FormValues::new(), &def));
    }

    #[test]
    fn all_conditions_must_hold() {
        let def = ParameterDefinition::new("x", ParameterType::String)
            .relevant_if(RelevantIfCondition::equals("a", true))
            .relevant_if(RelevantIfCondition::equals("b", "on"));
        assert!(is_relevant(
            &values(&[("a", true.into()), ("b", "on".into())]),
            &def
        ));
        assert!(!is_relevant(
            &values(&[("a", true.into()), ("b", "off".into())]),
            &def
        ));
    }

    #[test]
    fn contains_any_intersects_lists() {
        let def = ParameterDefinition::new("x", ParameterType::String).relevant_if(
            RelevantIfCondition::contains_any("telemetry", vec![json!("Logs"), json!("Traces")]),
        );
        let metrics_only = values(&[("telemetry", FormValue::List(vec!["Metrics".into()]))]);
        let with_logs = values(&[(
            "telemetry",
            FormValue::List(vec!["Metrics".into(), "Logs".into()]),
        )]);
        let none_selected = values(&[("telemetry", FormValue::List(vec![]))]);
        assert!(!is_relevant(&metrics_only, &def));
        assert!(is_relevant(&with_logs, &def));
        assert!(!is_relevant(&none_selected, &def));
    }

    #[test]
    fn contains_any_is_permissive_for_non_list_values() {
        let def = ParameterDefinition::new("x", ParameterType::String).relevant_if(
            RelevantIfCondition::contains_any("telemetry", vec![json!("Logs")]),
        );
        assert!(is_relevant(&FormValues::new(), &def));
        assert!(is_relevant(&values(&[("telemetry", "Metrics".into())]), &def));
        assert!(is_relevant(&values(&[("telemetry", FormValue::Null)]), &def));
    }

    #[test]
    fn contains_any_accepts_scalar_condition_value() {
        let condition = RelevantIfCondition {
            name: "telemetry".into(),
            operator: RelevantIfOperator::ContainsAny,
            value: json!("Logs"),
        };
        let with_logs = values(&[("telemetry", FormValue::List(vec!["Logs".into()]))]);
        assert!(condition_holds(&with_logs, &condition));
    }

    #[test]
    fn contains_any_on_structured_arrays() {
        let condition = RelevantIfCondition::contains_any("ids", vec![json!(2)]);
        let structured = values(&[("ids", FormValue::Structured(json!([1, 2, 3])))]);
        assert!(condition_holds(&structured, &condition));
    }
}
