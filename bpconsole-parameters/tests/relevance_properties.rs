//! Property-based tests for relevance evaluation and error suppression.

use bpconsole_parameters::{
    init_form_errors, is_relevant, FormValue, FormValues, ParameterDefinition, ParameterType,
    RelevantIfCondition, ResourceKind,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const MAX_LIST_LEN: usize = 6;

fn scalar_value() -> impl Strategy<Value = FormValue> {
    prop_oneof![
        Just(FormValue::Null),
        any::<bool>().prop_map(FormValue::Bool),
        any::<i64>().prop_map(FormValue::Int),
        "[a-z]{0,8}".prop_map(FormValue::Text),
    ]
}

fn any_value() -> impl Strategy<Value = FormValue> {
    prop_oneof![
        scalar_value(),
        prop::collection::vec("[a-z]{1,6}", 0..MAX_LIST_LEN).prop_map(FormValue::List),
    ]
}

fn wanted_items() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec("[a-z]{1,6}".prop_map(Value::String), 0..MAX_LIST_LEN)
}

proptest! {
    #[test]
    fn relevance_is_deterministic(
        current in any_value(),
        compared in "[a-z]{0,8}",
        wanted in wanted_items(),
    ) {
        let values: FormValues = [("field", current)].into_iter().collect();
        let def = ParameterDefinition::new("target", ParameterType::String)
            .relevant_if(RelevantIfCondition::not_equals("field", compared))
            .relevant_if(RelevantIfCondition::contains_any("field", wanted));

        let before = values.clone();
        let first = is_relevant(&values, &def);
        let second = is_relevant(&values, &def);

        prop_assert_eq!(first, second);
        prop_assert_eq!(values, before);
    }

    #[test]
    fn contains_any_never_blocks_non_list_values(
        current in scalar_value(),
        wanted in wanted_items(),
    ) {
        let values: FormValues = [("telemetry", current)].into_iter().collect();
        let def = ParameterDefinition::new("target", ParameterType::String)
            .relevant_if(RelevantIfCondition::contains_any("telemetry", wanted));

        prop_assert!(is_relevant(&values, &def));
    }

    #[test]
    fn contains_any_never_blocks_missing_fields(wanted in wanted_items()) {
        let def = ParameterDefinition::new("target", ParameterType::String)
            .relevant_if(RelevantIfCondition::contains_any("absent", wanted));

        prop_assert!(is_relevant(&FormValues::new(), &def));
    }

    #[test]
    fn irrelevant_fields_never_report_errors(
        stored in any_value(),
        mode in "[a-z]{1,8}",
    ) {
        prop_assume!(mode != "custom");
        let defs = vec![
            ParameterDefinition::new("mode", ParameterType::String),
            ParameterDefinition::new("port", ParameterType::Int)
                .required(true)
                .with_range(Some(1), Some(65535))
                .relevant_if(RelevantIfCondition::equals("mode", json!("custom"))),
        ];
        let values: FormValues = [
            ("mode", FormValue::Text(mode)),
            ("port", stored),
        ]
        .into_iter()
        .collect();

        let errors = init_form_errors(&defs, &values, ResourceKind::Source, None);
        prop_assert_eq!(errors.error("port"), None);
        prop_assert!(errors.is_valid());
    }
}
