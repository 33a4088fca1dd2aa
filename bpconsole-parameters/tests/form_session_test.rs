//! Integration tests for form sessions
//!
//! These drive a `FormSession` the way a presentation layer would: build it
//! from definitions, edit values, and submit through a save callback.

use bpconsole_parameters::{
    init_form_errors, init_form_values, load_definitions, FormSession, FormState, FormValue,
    FormValues, NameFieldRules, Parameter, ParameterDefinition, ParameterType,
    RelevantIfCondition, ResourceKind, SaveOutcome, SubmitOutcome,
};
use serde_json::json;
use std::convert::Infallible;

fn toggle_definitions() -> Vec<ParameterDefinition> {
    vec![
        ParameterDefinition::new("a", ParameterType::Bool).with_default(false),
        ParameterDefinition::new("b", ParameterType::String)
            .required(true)
            .relevant_if(RelevantIfCondition::equals("a", true)),
    ]
}

#[tokio::test]
async fn test_toggle_scenario_end_to_end() {
    let mut session = FormSession::builder(ResourceKind::Source, toggle_definitions()).build();

    assert_eq!(session.values().get("a"), Some(&FormValue::Bool(false)));
    assert_eq!(session.values().get("b"), Some(&FormValue::Text(String::new())));
    assert_eq!(session.errors().error("a"), None);
    assert_eq!(session.errors().error("b"), None);
    assert!(session.is_valid());

    session.set_form_value("a", true);
    assert_eq!(session.errors().error("a"), None);
    assert_eq!(session.errors().error("b"), Some("Required."));

    session.set_form_value("b", "x");
    assert!(session.is_valid());

    let mut saved: Option<FormValues> = None;
    let outcome = session
        .submit(|values| {
            saved = Some(values);
            async { Ok::<_, Infallible>(SaveOutcome::Saved) }
        })
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Saved);
    let saved = saved.expect("save callback was called");
    assert_eq!(saved.to_json(), json!({"a": true, "b": "x"}));
}

#[test]
fn test_irrelevant_field_becomes_invalid_again() {
    let mut session = FormSession::builder(ResourceKind::Source, toggle_definitions()).build();
    session.set_form_value("a", true);
    assert_eq!(session.errors().error("b"), Some("Required."));

    session.set_form_value("a", false);
    assert_eq!(session.errors().error("b"), None);

    session.set_form_value("a", true);
    assert_eq!(session.errors().error("b"), Some("Required."));
}

#[tokio::test]
async fn test_required_field_blocks_save() {
    let defs = vec![ParameterDefinition::new("endpoint", ParameterType::String).required(true)];
    let values = init_form_values(&defs, None, false, None);
    let errors = init_form_errors(&defs, &values, ResourceKind::Destination, None);
    assert_eq!(errors.error("endpoint"), Some("Required."));

    let mut session = FormSession::builder(ResourceKind::Destination, defs).build();
    let mut calls = 0;
    let outcome = session
        .submit(|_| {
            calls += 1;
            async { Ok::<_, Infallible>(SaveOutcome::Saved) }
        })
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Blocked);
    assert_eq!(calls, 0);
    assert_eq!(session.state(), FormState::EditingWithErrors);
    assert_eq!(session.visible_error("endpoint"), Some("Required."));
}

#[tokio::test]
async fn test_backend_rejection_keeps_form_open() {
    let defs = vec![ParameterDefinition::new("port", ParameterType::Int).with_default(4317)];
    let mut session = FormSession::builder(ResourceKind::Source, defs)
        .existing_parameters(vec![Parameter::new("port", 4318)])
        .build();
    session.set_form_value("port", 9000_i64);

    let outcome = session
        .submit(|_| async {
            Ok::<_, Infallible>(SaveOutcome::Rejected {
                reason: "REASON_X".to_string(),
            })
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            reason: "REASON_X".to_string()
        }
    );
    assert_eq!(session.rejection(), Some("REASON_X"));
    assert_eq!(session.state(), FormState::Editing);
    assert!(session.is_dirty());
    assert_eq!(session.values().get("port"), Some(&FormValue::Int(9000)));
}

#[test]
fn test_defaults_then_overrides() {
    let defs = vec![
        ParameterDefinition::new("listen_port", ParameterType::Int).with_default(4317),
        ParameterDefinition::new("protocol", ParameterType::Enum)
            .with_valid_values(["grpc", "http"])
            .with_default("grpc"),
        ParameterDefinition::new("headers", ParameterType::Map),
    ];
    let existing = vec![
        Parameter::new("protocol", "http"),
        Parameter::new("headers", json!({"x-tenant": "acme"})),
    ];

    let values = init_form_values(&defs, Some(&existing), true, Some("OTLP in"));

    assert_eq!(values.get("listen_port"), Some(&FormValue::Int(4317)));
    assert_eq!(values.get("protocol"), Some(&FormValue::Text("http".into())));
    assert_eq!(
        values.get("headers").map(FormValue::to_json),
        Some(json!({"x-tenant": "acme"}))
    );
    assert_eq!(values.name(), Some(""));
    assert_eq!(values.display_name(), Some("OTLP in"));
}

#[test]
fn test_name_field_rules() {
    let defs = vec![ParameterDefinition::new("a", ParameterType::String)];
    let mut session = FormSession::builder(ResourceKind::Destination, defs)
        .include_name_field(NameFieldRules::new(["prod-otlp"]))
        .build();

    assert_eq!(session.errors().error("name"), Some("Required."));

    session.set_form_value("name", "has space");
    assert_eq!(
        session.errors().error("name"),
        Some("Name must contain only letters, numbers, periods, hyphens, and underscores.")
    );

    session.set_form_value("name", "prod-otlp");
    assert_eq!(
        session.errors().error("name"),
        Some("A destination with this name already exists.")
    );

    session.set_form_value("name", "prod-otlp-2");
    assert!(session.is_valid());
}

#[test]
fn test_session_from_yaml_definitions() {
    let yaml = r#"
- name: telemetry_types
  label: Telemetry Types
  type: enums
  validValues: [Logs, Metrics, Traces]
  default: [Logs, Metrics, Traces]
- name: log_format
  type: enum
  validValues: [json, text]
  default: json
  relevantIf:
    - name: telemetry_types
      operator: containsAny
      value: [Logs]
- name: retries
  type: int
  default: 3
  advancedConfig: true
  options:
    min: 0
    max: 10
"#;
    let defs = load_definitions(yaml).unwrap();
    let mut session = FormSession::builder(ResourceKind::Source, defs).build();
    assert!(session.is_valid());

    let groups = session.groups();
    assert_eq!(groups.len(), 2);
    assert!(groups[1].advanced);

    session.set_form_value("log_format", "xml");
    assert_eq!(
        session.errors().error("log_format"),
        Some("Must be one of the allowed values.")
    );

    session.set_form_value("telemetry_types", vec!["Metrics".to_string()]);
    assert_eq!(session.errors().error("log_format"), None);

    session.set_form_value("retries", "11");
    assert_eq!(session.errors().error("retries"), Some("Must be at most 10."));
}
